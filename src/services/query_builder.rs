use crate::error::QueryError;
use crate::message::{FormOptions, ReportRequest};

pub const YEARS: [u16; 5] = [2021, 2022, 2023, 2024, 2025];
pub const QUARTERS: [u8; 4] = [1, 2, 3, 4];

/// Backend strategy that produces the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Snowflake,
    Rag,
    WebSearch,
    All,
}

impl Agent {
    pub const ALL: [Agent; 4] = [Agent::Snowflake, Agent::Rag, Agent::WebSearch, Agent::All];

    /// Label shown in the agent selector.
    pub fn label(self) -> &'static str {
        match self {
            Agent::Snowflake => "Snowflake Agent",
            Agent::Rag => "RAG Agent",
            Agent::WebSearch => "Web Search Agent",
            Agent::All => "All Agents",
        }
    }

    /// Identifier the report service expects in `agent_name`.
    pub fn token(self) -> &'static str {
        match self {
            Agent::Snowflake => "snowflake_agent",
            Agent::Rag => "rag_search",
            Agent::WebSearch => "web_search",
            Agent::All => "all_agents",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

/// Maps a selector label to its backend token. Unknown labels yield `None`.
pub fn agent_token(label: &str) -> Option<&'static str> {
    Agent::from_label(label).map(Agent::token)
}

/// Builds the request for one submission.
///
/// The query is sent verbatim, an empty string included. An unmapped agent
/// label produces a request with `agent_name: None` rather than an error.
pub fn build_request(
    query: &str,
    year: i32,
    quarter: i32,
    agent_label: &str,
) -> Result<ReportRequest, QueryError> {
    let year = u16::try_from(year)
        .ok()
        .filter(|y| YEARS.contains(y))
        .ok_or(QueryError::YearOutOfRange(year))?;
    let quarter = u8::try_from(quarter)
        .ok()
        .filter(|q| QUARTERS.contains(q))
        .ok_or(QueryError::QuarterOutOfRange(quarter))?;

    let agent_name = agent_token(agent_label);
    if agent_name.is_none() {
        tracing::debug!(label = agent_label, "agent label has no backend mapping");
    }

    Ok(ReportRequest {
        query: query.to_string(),
        year,
        quarter,
        agent_name: agent_name.map(str::to_string),
    })
}

pub fn form_options() -> FormOptions {
    FormOptions {
        years: YEARS.to_vec(),
        quarters: QUARTERS.to_vec(),
        agents: Agent::ALL.iter().map(|a| a.label()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_table() {
        for agent in Agent::ALL {
            assert_eq!(Agent::from_label(agent.label()), Some(agent));
        }
    }

    #[test]
    fn label_lookup_is_exact() {
        assert_eq!(agent_token("rag agent"), None);
        assert_eq!(agent_token(" RAG Agent"), None);
    }
}
