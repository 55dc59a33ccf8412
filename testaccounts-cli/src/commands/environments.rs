//! Environments command - environment names in display order

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use super::get_context;
use crate::output;

#[derive(Serialize)]
struct EnvironmentSummary<'a> {
    name: &'a str,
    accounts: usize,
}

pub fn run(file: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context(file)?;
    let index = ctx.index();

    let summaries: Vec<EnvironmentSummary> = (0..index.section_count())
        .filter_map(|section| {
            Some(EnvironmentSummary {
                name: index.environment_name(section)?,
                accounts: index.row_count(section)?,
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        output::warning("No environments loaded");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Environment", "Accounts"]);
    for summary in &summaries {
        table.add_row(vec![summary.name.to_string(), summary.accounts.to_string()]);
    }
    println!("{}", table);
    Ok(())
}
