//! Pick command - interactive account menu

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Select;

use super::{get_context, printing_broadcaster};
use crate::output;

pub fn run(file: Option<PathBuf>, json: bool) -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("'tam pick' needs an interactive terminal; use 'tam select' instead");
    }

    let mut ctx = get_context(file)?;
    ctx.registry.add_broadcaster(printing_broadcaster(json));
    let index = ctx.index();

    if index.section_count() == 0 {
        output::warning("No accounts loaded");
        return Ok(());
    }

    let environments: Vec<String> = index
        .sections()
        .map(|(env, accounts)| format!("{} ({})", env, accounts.len()))
        .collect();
    let Some(section) = Select::new()
        .with_prompt("Environment")
        .items(&environments)
        .default(0)
        .interact_opt()?
    else {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    };

    let row_count = index.row_count(section).unwrap_or_default();
    let accounts: Vec<String> = (0..row_count)
        .filter_map(|row| index.account_at(section, row))
        .map(|pair| pair.account.user_name().to_string())
        .collect();
    let Some(row) = Select::new()
        .with_prompt("Account")
        .items(&accounts)
        .default(0)
        .interact_opt()?
    else {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    };

    if !index.select_at(section, row) {
        output::warning("Selection is no longer available");
    }
    Ok(())
}
