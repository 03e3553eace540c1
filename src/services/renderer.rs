//! Turns the outcome of one submission into displayable sections.
//!
//! Sections always come out in the same order: report, chart data, chart
//! image, web insights, sources. Fields are rendered independently, so any
//! combination of charts and chart image is fine.

use pulldown_cmark::{Options, Parser, html};
use pulldown_cmark_escape::{FmtWriter, escape_href, escape_html};
use serde::Serialize;
use serde_json::Value;

use crate::message::{ChartPoint, ReportResponse};
use crate::services::history::ChatHistoryEntry;
use crate::services::report_client::ReportError;

pub const NOTHING_FOUND: &str = "No report or charts found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Report { markdown: String },
    Charts { data: Value },
    ChartTable { points: Vec<ChartPoint> },
    ChartImage { src: String },
    WebInsights { text: String },
    WebLinks { links: Vec<String> },
    NothingFound,
    Error { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedReport {
    pub sections: Vec<Section>,
}

pub fn render(outcome: &Result<ReportResponse, ReportError>) -> RenderedReport {
    match outcome {
        Ok(response) => render_response(response),
        Err(err) => render_failure(err),
    }
}

pub fn render_response(response: &ReportResponse) -> RenderedReport {
    let mut sections = Vec::new();

    if let Some(report) = response.report_text() {
        sections.push(Section::Report {
            markdown: report.to_string(),
        });
    }
    if let Some(data) = response.chart_series() {
        sections.push(Section::Charts { data: data.clone() });
    }
    if let Some(points) = response.chart_points() {
        sections.push(Section::ChartTable {
            points: points.to_vec(),
        });
    }
    if let Some(image) = response.chart_image() {
        sections.push(Section::ChartImage {
            src: image_src(image),
        });
    }
    if let Some(text) = response.insights() {
        sections.push(Section::WebInsights {
            text: text.to_string(),
        });
    }
    if let Some(links) = response.links() {
        sections.push(Section::WebLinks {
            links: links.to_vec(),
        });
    }
    if !response.has_report_or_charts() {
        sections.push(Section::NothingFound);
    }

    RenderedReport { sections }
}

pub fn render_failure(err: &ReportError) -> RenderedReport {
    let messages = match err {
        ReportError::Status { status, body } => vec![
            format!("❌ Failed to generate report. Status code: {status}"),
            format!("Error details: {body}"),
        ],
        ReportError::Transport(e) => vec![format!("❌ Connection error: {e}")],
        ReportError::Decode(detail) => {
            vec![format!("❌ Invalid response from report service: {detail}")]
        }
    };

    RenderedReport {
        sections: messages
            .into_iter()
            .map(|message| Section::Error { message })
            .collect(),
    }
}

impl RenderedReport {
    pub fn is_error(&self) -> bool {
        self.sections.iter().any(|s| matches!(s, Section::Error { .. }))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if !self.is_error() {
            out.push_str("<h2>Generated Research Report</h2>\n");
        }
        for section in &self.sections {
            push_section(&mut out, section);
        }
        out
    }
}

fn push_section(out: &mut String, section: &Section) {
    match section {
        Section::Report { markdown } => {
            out.push_str("<section class=\"report\">\n<h3>📄 Report</h3>\n");
            out.push_str(&markdown_to_html(markdown));
            out.push_str("</section>\n");
        }
        Section::Charts { data } => {
            let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            out.push_str("<section class=\"charts\">\n<h3>📊 Chart Data</h3>\n<pre>");
            out.push_str(&escape_text(&pretty));
            out.push_str("</pre>\n</section>\n");
        }
        Section::ChartTable { points } => {
            out.push_str("<section class=\"charts\">\n<h3>📊 Chart Data</h3>\n<table>\n");
            out.push_str("<tr><th>Metric</th><th>Value</th></tr>\n");
            for point in points {
                let value = point.value_num.map(|v| v.to_string()).unwrap_or_default();
                out.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    escape_text(&point.metric),
                    value
                ));
            }
            out.push_str("</table>\n</section>\n");
        }
        Section::ChartImage { src } => {
            out.push_str("<section class=\"chart-image\">\n<h3>📈 Financial Metrics Chart</h3>\n");
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"Financial metrics chart\">\n</section>\n",
                escape_url(src)
            ));
        }
        Section::WebInsights { text } => {
            out.push_str("<section class=\"web-insights\">\n<h3>🌐 Web Insights</h3>\n<p>");
            out.push_str(&escape_text(text));
            out.push_str("</p>\n</section>\n");
        }
        Section::WebLinks { links } => {
            out.push_str("<section class=\"sources\">\n<h3>🔗 Sources</h3>\n<ul>\n");
            for link in links {
                out.push_str(&format!(
                    "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></li>\n",
                    escape_url(link),
                    escape_text(link)
                ));
            }
            out.push_str("</ul>\n</section>\n");
        }
        Section::NothingFound => {
            out.push_str(&format!("<p class=\"warning\">{NOTHING_FOUND}</p>\n"));
        }
        Section::Error { message } => {
            out.push_str(&format!("<p class=\"error\">{}</p>\n", escape_text(message)));
        }
    }
}

/// Renders the history log, oldest entry first.
pub fn render_history(entries: &[ChatHistoryEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::from("<section class=\"history\">\n<h3>History</h3>\n<ol>\n");
    for entry in entries {
        out.push_str(&format!(
            "<li><p class=\"query\">{}</p>\n{}</li>\n",
            escape_text(&entry.message),
            markdown_to_html(&entry.response)
        ));
    }
    out.push_str("</ol>\n</section>\n");
    out
}

// Raw HTML in the report is passed through.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

// Bare base64 is assumed to be a PNG.
fn image_src(raw: &str) -> String {
    let raw = raw.trim();
    let is_reference = ["http://", "https://", "data:", "/"]
        .iter()
        .any(|prefix| raw.starts_with(prefix));
    if is_reference {
        raw.to_string()
    } else {
        format!("data:image/png;base64,{raw}")
    }
}

// Writing into a String cannot fail.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(FmtWriter(&mut out), s);
    out
}

fn escape_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_href(FmtWriter(&mut out), s);
    out
}
