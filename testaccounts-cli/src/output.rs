//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use testaccounts_core::AccountSelected;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Mask a password, keeping its length visible
pub fn mask(password: &str) -> String {
    "•".repeat(password.chars().count())
}

/// Print a selected account the way a login form would be filled in
pub fn print_selection(event: &AccountSelected, json: bool) {
    if json {
        match serde_json::to_string_pretty(&event.to_json()) {
            Ok(s) => println!("{}", s),
            Err(e) => error(&format!("Failed to render selection: {}", e)),
        }
        return;
    }

    println!();
    println!("{}  {}", "Environment:".bold(), event.environment.cyan());
    println!("{}    {}", "User name:".bold(), event.account.user_name());
    println!("{}     {}", "Password:".bold(), event.account.password());
}
