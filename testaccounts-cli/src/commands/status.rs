//! Status command - configuration and account summary

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use super::{get_context, get_data_dir};

#[derive(Serialize)]
struct StatusSummary {
    data_dir: String,
    accounts_file: Option<String>,
    section_order: &'static str,
    publish_events: bool,
    total_environments: usize,
    total_accounts: usize,
}

pub fn run(file: Option<PathBuf>, json: bool) -> Result<()> {
    let data_dir = get_data_dir()?;
    let ctx = get_context(file)?;

    let status = StatusSummary {
        data_dir: data_dir.display().to_string(),
        accounts_file: ctx
            .config
            .resolve_accounts_file(&data_dir)
            .map(|p| p.display().to_string()),
        section_order: ctx.config.section_order.as_str(),
        publish_events: ctx.config.publish_events,
        total_environments: ctx.registry.environments().len(),
        total_accounts: ctx.registry.account_count(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Test Account Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Data directory", &status.data_dir]);
    table.add_row(vec![
        "Accounts file",
        status.accounts_file.as_deref().unwrap_or("-"),
    ]);
    table.add_row(vec!["Section order", status.section_order]);
    table.add_row(vec![
        "Publish events",
        if status.publish_events { "on" } else { "off" },
    ]);
    table.add_row(vec!["Environments", &status.total_environments.to_string()]);
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);

    println!("{}", table);
    Ok(())
}
