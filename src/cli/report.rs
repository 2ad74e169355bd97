//! Report command implementation

use std::path::Path;

use chrono::Local;
use colored::Colorize;
use log::{debug, warn};

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::notify::{DeliveryOutcome, MailTransport, ReportMailer, SmtpTransport};
use crate::pipeline::Aggregate;
use crate::report::Report;

/// What happened to the aggregated results
#[derive(Debug, PartialEq, Eq)]
pub enum Publication {
    /// No repositories were aggregated; nothing was rendered or sent
    Skipped,
    /// The report was rendered; `delivery` is `None` when email was not requested
    Rendered { delivery: Option<DeliveryOutcome> },
}

/// Run a full report: aggregate, render, optionally write to a file, and email.
///
/// Mail delivery is best-effort; a failed delivery is reported but does not
/// change the exit status.
pub async fn run(opts: &GlobalOptions, output: Option<&Path>, no_email: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    // Resolve the recipient before doing any work
    let recipient = if no_email {
        None
    } else {
        Some(ctx.config.require_recipient()?.to_string())
    };

    let aggregate = ctx.aggregate().await?;

    eprintln!(
        "{} Scanned {} repositories",
        "✓".green(),
        aggregate.repositories.len()
    );
    let degraded = aggregate.repositories.iter().filter(|r| r.is_failed()).count();
    if degraded > 0 {
        eprintln!(
            "{} {} repositories could not be fully checked",
            "⚠".yellow(),
            degraded
        );
    }
    for failure in &aggregate.failed_organizations {
        eprintln!(
            "{} Could not list {}: {}",
            "⚠".yellow(),
            failure.organization.bold(),
            failure.reason
        );
    }

    let mailer = ReportMailer::new(
        ctx.vault.clone(),
        SmtpTransport::new(&ctx.config.mail),
        &ctx.config.mail,
        &ctx.config.secrets,
    );
    let delivery = recipient.as_deref().map(|to| (&mailer, to));

    match publish(&aggregate, output, delivery).await? {
        Publication::Skipped => {
            eprintln!(
                "{} No repositories found; report not generated",
                "⚠".yellow()
            );
        }
        Publication::Rendered { delivery } => {
            if let Some(path) = output {
                eprintln!("{} Report written to {}", "✓".green(), path.display());
            }
            match (delivery, recipient) {
                (Some(DeliveryOutcome::Sent), Some(to)) => {
                    eprintln!("{} Report sent to {}", "✓".green(), to);
                }
                (Some(DeliveryOutcome::Failed(reason)), _) => {
                    eprintln!("{} Report email not sent: {}", "✗".red(), reason);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Render the aggregate, write it to `output`, and mail it to the recipient.
///
/// The report timestamp is taken here, after aggregation has finished. An
/// aggregate without repositories is neither rendered nor sent.
pub async fn publish<T: MailTransport>(
    aggregate: &Aggregate,
    output: Option<&Path>,
    delivery: Option<(&ReportMailer<T>, &str)>,
) -> Result<Publication> {
    if aggregate.repositories.is_empty() {
        warn!("Aggregation returned no repositories; skipping report delivery");
        return Ok(Publication::Skipped);
    }

    debug!(
        "Rendering report for {} repositories",
        aggregate.repositories.len()
    );
    let generated_at = Local::now().naive_local();
    let html = Report::from_aggregate(aggregate, generated_at).render();

    if let Some(path) = output {
        std::fs::write(path, &html)?;
    }

    let delivery = match delivery {
        Some((mailer, recipient)) => Some(mailer.send(&html, recipient).await),
        None => None,
    };

    Ok(Publication::Rendered { delivery })
}
