//! Check command implementation.
//!
//! Loads configuration and app metadata the same way `serve` does and prints
//! the resulting route table, without binding any port.

use crate::cli::CheckArgs;
use crate::config::DevConfig;
use crate::error::Result;
use crate::ui;
use esmbit_cms::{RouteTable, RuleKind};

/// Execute the check command.
///
/// # Errors
///
/// Returns errors for invalid configuration or app metadata.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let config = DevConfig::load_shared(&args.config)?;
    config.validate()?;
    ui::success("Configuration is valid!");

    let metadata_path = config.metadata_path();
    ui::info(&format!("Checking {}...", metadata_path.display()));
    let table = RouteTable::load(&metadata_path)?;

    for line in describe_table(&table) {
        println!("{}", line);
    }

    ui::success(&format!(
        "{} app(s), {} redirect rule(s)",
        table.apps().len(),
        table.rules().len()
    ));
    Ok(())
}

/// One line per app and per rule, in matching order.
fn describe_table(table: &RouteTable) -> Vec<String> {
    let apps = table
        .apps()
        .iter()
        .map(|app| format!("  app      {:<24} {} ({})", app.route, app.title, app.module));

    let rules = table.rules().iter().map(|rule| {
        let kind = match rule.kind {
            RuleKind::Redirect => "redirect",
            RuleKind::Rewrite => "rewrite",
        };
        format!("  {:<8} {:<24} -> {}", kind, rule.matcher.as_str(), rule.target)
    });

    apps.chain(rules).collect()
}
