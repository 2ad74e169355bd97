//! Scan command implementation
//!
//! Prints scanning status per repository without rendering or sending the report.

use colored::Colorize;
use tabled::Tabled;

use crate::cli::args::{GlobalOptions, OutputFormat};
use crate::cli::context::CommandContext;
use crate::client::ScanKind;
use crate::error::Result;
use crate::output::{json::format_json, table::format_table};
use crate::pipeline::{Aggregate, RepositoryReport};

/// Table row for one repository
#[derive(Debug, Tabled)]
pub struct ScanRow {
    #[tabled(rename = "REPOSITORY")]
    pub repository: String,
    #[tabled(rename = "BRANCHES")]
    pub branches: String,
    #[tabled(rename = "CODE SCANNING")]
    pub code_scanning: String,
    #[tabled(rename = "SECRET SCANNING")]
    pub secret_scanning: String,
}

impl From<&RepositoryReport> for ScanRow {
    fn from(report: &RepositoryReport) -> Self {
        Self {
            repository: report.repository.full_name.clone(),
            branches: report.branch_list(),
            code_scanning: report.status_text(ScanKind::Code),
            secret_scanning: report.status_text(ScanKind::Secret),
        }
    }
}

/// Run the scan command
pub async fn run(opts: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let aggregate = ctx.aggregate().await?;

    println!("{}", render(&aggregate, format)?);

    if format == OutputFormat::Table {
        for failure in &aggregate.failed_organizations {
            eprintln!(
                "{} Could not list {}: {}",
                "⚠".yellow(),
                failure.organization.bold(),
                failure.reason
            );
        }
    }

    Ok(())
}

/// Format an aggregate for the terminal
pub fn render(aggregate: &Aggregate, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ScanRow> = aggregate.repositories.iter().map(ScanRow::from).collect();
            Ok(format_table(&rows))
        }
        OutputFormat::Json => Ok(format_json(aggregate)?),
    }
}
