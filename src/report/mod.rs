//! HTML security report rendering
//!
//! Rendering is a pure function of the enriched repositories and the
//! timestamp captured when the report was started.

pub mod html;

use chrono::NaiveDateTime;

use crate::client::ScanKind;
use crate::pipeline::{Aggregate, OrganizationFailure, RepositoryReport};
use html::{Element, Node};

/// Report title, also used as the document title
pub const TITLE: &str = "GitHub Repositories Security Report";

/// Format of the "Generated on" timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SUMMARY_NOTE: &str = "This report summarizes the security scanning status (code & secret scanning) for all repositories.";

const COLUMNS: [&str; 5] = [
    "Repository",
    "URL",
    "Branches",
    "Code Scanning Status",
    "Secret Scanning Status",
];

const STYLESHEET: &str = r#"
body { font-family: 'Segoe UI', Arial, sans-serif; background: #f4f6fb; margin: 0; padding: 0; }
.container { max-width: 1100px; margin: 30px auto; background: #fff; border-radius: 12px; box-shadow: 0 4px 24px rgba(44,62,80,0.08); padding: 32px 32px 24px 32px; }
.header { background: linear-gradient(90deg, #007bff 0%, #00c6ff 100%); color: #fff; padding: 24px 32px 16px 32px; border-radius: 12px 12px 0 0; margin: -32px -32px 24px -32px; }
h2 { margin: 0 0 8px 0; font-size: 2.1rem; font-weight: 700; }
.timestamp { color: #e0e0e0; font-size: 1rem; margin-bottom: 0; }
.summary { background: #e9f7ef; color: #1e4620; border-left: 5px solid #28a745; padding: 14px 18px; border-radius: 6px; margin-bottom: 24px; font-size: 1.08rem; }
.warning { background: #fff4e5; color: #663c00; border-left: 5px solid #ff9800; padding: 14px 18px; border-radius: 6px; margin-bottom: 24px; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border: 1px solid #e3e6ed; padding: 13px 10px; text-align: left; }
th { background: #f7fafd; color: #2c3e50; font-weight: 600; font-size: 1.05rem; }
tr:hover { background: #f1f7ff; }
tr:nth-child(even) { background: #f9fbfd; }
a { color: #007bff; text-decoration: none; font-weight: 500; }
a:hover { text-decoration: underline; }
.badge { display: inline-block; padding: 3px 10px; border-radius: 12px; font-size: 0.98em; font-weight: 600; color: #fff; }
.badge-green { background: #28a745; }
.badge-red { background: #dc3545; }
.badge-gray { background: #6c757d; }
"#;

/// Badge color for a status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Scanning enabled
    Green,
    /// Scanning not enabled (or the check was downgraded)
    Red,
    /// Enrichment placeholder
    Gray,
}

impl Badge {
    pub fn for_status(report: &RepositoryReport, kind: ScanKind) -> Self {
        match report.status(kind) {
            Some(status) if status.enabled => Badge::Green,
            Some(_) => Badge::Red,
            None => Badge::Gray,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Badge::Green => "badge badge-green",
            Badge::Red => "badge badge-red",
            Badge::Gray => "badge badge-gray",
        }
    }
}

/// A renderable security report
pub struct Report<'a> {
    repositories: &'a [RepositoryReport],
    failed_organizations: &'a [OrganizationFailure],
    generated_at: NaiveDateTime,
}

impl<'a> Report<'a> {
    pub fn new(repositories: &'a [RepositoryReport], generated_at: NaiveDateTime) -> Self {
        Self {
            repositories,
            failed_organizations: &[],
            generated_at,
        }
    }

    /// Build a report from a full aggregation run
    pub fn from_aggregate(aggregate: &'a Aggregate, generated_at: NaiveDateTime) -> Self {
        Self::new(&aggregate.repositories, generated_at)
            .with_failed_organizations(&aggregate.failed_organizations)
    }

    /// List organizations that could not be listed in a warning block
    pub fn with_failed_organizations(mut self, failures: &'a [OrganizationFailure]) -> Self {
        self.failed_organizations = failures;
        self
    }

    /// Render the complete HTML document
    pub fn render(&self) -> String {
        let head = Element::new("head")
            .child(Element::new("meta").attr("charset", "UTF-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1.0"),
            )
            .child(Element::new("title").text(TITLE))
            .child(Element::new("style").raw(STYLESHEET));

        let mut container = Element::new("div")
            .class("container")
            .child(self.header())
            .child(self.summary());
        if !self.failed_organizations.is_empty() {
            container = container.child(self.warning());
        }
        container = container.child(self.table());

        let document = Element::new("html")
            .child(head)
            .child(Element::new("body").child(container));

        let mut out = String::from("<!DOCTYPE html>\n");
        document.render_into(&mut out);
        out.push('\n');
        out
    }

    fn header(&self) -> Element {
        Element::new("div")
            .class("header")
            .child(Element::new("h2").text(TITLE))
            .child(Element::new("div").class("timestamp").text(format!(
                "Generated on: {}",
                self.generated_at.format(TIMESTAMP_FORMAT)
            )))
    }

    fn summary(&self) -> Element {
        Element::new("div")
            .class("summary")
            .child(Element::new("b").text("Total repositories scanned:"))
            .text(format!(" {}", self.repositories.len()))
            .child(Element::new("br"))
            .child(
                Element::new("span")
                    .attr("style", "font-size:0.98em;")
                    .text(SUMMARY_NOTE),
            )
    }

    fn warning(&self) -> Element {
        let items = self.failed_organizations.iter().map(|failure| {
            Element::new("li")
                .child(Element::new("b").text(failure.organization.as_str()))
                .text(format!(": {}", failure.reason))
        });

        Element::new("div")
            .class("warning")
            .child(Element::new("b").text("Organizations that could not be listed:"))
            .child(Element::new("ul").children(items))
    }

    fn table(&self) -> Element {
        let header_row = Element::new("tr").children(COLUMNS.iter().map(|c| Element::new("th").text(*c)));

        Element::new("table")
            .child(Element::new("thead").child(header_row))
            .child(Element::new("tbody").children(self.repositories.iter().map(row)))
    }
}

/// One table row per repository
fn row(report: &RepositoryReport) -> Element {
    let repo = &report.repository;

    Element::new("tr")
        .child(Element::new("td").text(repo.name.as_str()))
        .child(Element::new("td").child(link(&repo.html_url)))
        .child(Element::new("td").text(report.branch_list()))
        .child(Element::new("td").child(badge(report, ScanKind::Code)))
        .child(Element::new("td").child(badge(report, ScanKind::Secret)))
}

fn badge(report: &RepositoryReport, kind: ScanKind) -> Element {
    Element::new("span")
        .class(Badge::for_status(report, kind).css_class())
        .text(report.status_text(kind))
}

/// Only http(s) URLs become links
fn link(url: &str) -> Node {
    if url.starts_with("https://") || url.starts_with("http://") {
        Element::new("a").attr("href", url).text(url).into()
    } else {
        Node::Text(url.to_string())
    }
}
