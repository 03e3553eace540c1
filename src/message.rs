// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::services::history::ChatHistoryEntry;
use crate::services::renderer::Section;
use crate::services::session_manager::SubmissionPhase;

/// Body of `POST /generate_report` on the report service.
///
/// `agent_name` carries the backend token, or `null` when the selected
/// label has no mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub query: String,
    pub year: u16,
    pub quarter: u8,
    pub agent_name: Option<String>,
}

/// One record of the `chart_data` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub metric: String,
    pub value_num: Option<f64>,
}

impl ChartPoint {
    /// Reads a record loosely: `value_num` may be a number or a numeric
    /// string, a missing or null `metric` becomes empty. Non-objects are
    /// not chart points.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let metric = match record.get("metric") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let value_num = match record.get("value_num") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Some(Self { metric, value_num })
    }
}

/// Reply of the report service. Every field is optional and the service
/// may send any subset of them. A field of the wrong shape is dropped on
/// its own; the rest of the reply is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub report: Option<String>,
    #[serde(default)]
    pub charts: Option<Value>,
    #[serde(default, deserialize_with = "lenient_chart_points")]
    pub chart_data: Option<Vec<ChartPoint>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chart_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub web_insights: Option<String>,
    #[serde(default, deserialize_with = "lenient_links")]
    pub web_links: Option<Vec<String>>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_chart_points<'de, D>(deserializer: D) -> Result<Option<Vec<ChartPoint>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.iter().filter_map(ChartPoint::from_value).collect()),
        _ => None,
    })
}

// Non-string entries (nulls included) are skipped; strings are kept verbatim.
fn lenient_links<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

// Empty values count as missing, the same way the service's own UI treats them.
impl ReportResponse {
    pub fn report_text(&self) -> Option<&str> {
        non_empty(self.report.as_deref())
    }

    pub fn chart_series(&self) -> Option<&Value> {
        self.charts.as_ref().filter(|v| is_truthy(v))
    }

    pub fn chart_points(&self) -> Option<&[ChartPoint]> {
        self.chart_data.as_deref().filter(|p| !p.is_empty())
    }

    pub fn chart_image(&self) -> Option<&str> {
        non_empty(self.chart_image.as_deref())
    }

    pub fn insights(&self) -> Option<&str> {
        non_empty(self.web_insights.as_deref())
    }

    pub fn links(&self) -> Option<&[String]> {
        self.web_links.as_deref().filter(|l| !l.is_empty())
    }

    pub fn has_report_or_charts(&self) -> bool {
        self.report_text().is_some() || self.chart_series().is_some() || self.chart_points().is_some()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Form submission sent by the page to `POST /api/report`.
#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub query: String,
    pub year: i32,
    pub quarter: i32,
    #[serde(default)]
    pub agent: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitReportResponse {
    pub session_id: String,
    pub phase: SubmissionPhase,
    pub sections: Vec<Section>,
    pub html: String,
    pub history: Vec<ChatHistoryEntry>,
    pub history_html: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub history: Vec<ChatHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub years: Vec<u16>,
    pub quarters: Vec<u8>,
    pub agents: Vec<&'static str>,
}
