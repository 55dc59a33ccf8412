//! List command - accounts grouped by environment

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use testaccounts_core::Account;

use super::get_context;
use crate::output;

#[derive(Serialize)]
struct Row<'a> {
    section: usize,
    row: usize,
    environment: &'a str,
    user_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip)]
    account: &'a Account,
}

pub fn run(
    file: Option<PathBuf>,
    environment: Option<&str>,
    show_passwords: bool,
    json: bool,
) -> Result<()> {
    let ctx = get_context(file)?;
    let index = ctx.index();

    let rows: Vec<Row> = index
        .sections()
        .enumerate()
        .filter(|(_, (env, _))| environment.map_or(true, |wanted| wanted == *env))
        .flat_map(|(section, (env, accounts))| {
            accounts.iter().enumerate().map(move |(row, account)| Row {
                section,
                row,
                environment: env,
                user_name: account.user_name(),
                password: show_passwords.then(|| account.password()),
                account,
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        match environment {
            Some(env) => output::warning(&format!("No accounts in environment '{}'", env)),
            None => output::warning("No accounts loaded"),
        }
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["#", "Environment", "User name", "Password"]);
    for row in &rows {
        table.add_row(vec![
            format!("{}.{}", row.section, row.row),
            row.environment.to_string(),
            row.user_name.to_string(),
            row.password
                .map(str::to_string)
                .unwrap_or_else(|| output::mask(row.account.password())),
        ]);
    }

    println!("{}", table);
    println!("{}", "Select with 'tam select <ENVIRONMENT> <USER_NAME>' or 'tam pick'".dimmed());
    Ok(())
}
