//! Select command - broadcast an account chosen by name

use std::path::PathBuf;

use anyhow::{bail, Result};
use colored::Colorize;

use super::{get_context, printing_broadcaster};

pub fn run(file: Option<PathBuf>, environment: &str, user_name: &str, json: bool) -> Result<()> {
    let mut ctx = get_context(file)?;
    ctx.registry.add_broadcaster(printing_broadcaster(json));

    // User names may repeat with different passwords; take the first in row order.
    let Some(account) = ctx.registry.accounts_in(environment).and_then(|accounts| {
        let mut matches: Vec<_> = accounts
            .into_iter()
            .filter(|a| a.user_name() == user_name)
            .collect();
        matches.sort();
        matches.into_iter().next()
    }) else {
        let mut environments = ctx.registry.environments();
        if !environments.is_empty() {
            environments.sort();
            eprintln!("{}", format!("Environments: {}", environments.join(", ")).dimmed());
        }
        bail!("No account '{}' in environment '{}'", user_name, environment);
    };

    ctx.registry.select_in(&account, environment);
    Ok(())
}
