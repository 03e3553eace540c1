use research_report_client::error::QueryError;
use research_report_client::message::ReportRequest;
use research_report_client::services::query_builder::{
    Agent, QUARTERS, YEARS, agent_token, build_request, form_options,
};
use serde_json::json;

#[test]
fn test_agent_mapping_table() {
    assert_eq!(agent_token("Snowflake Agent"), Some("snowflake_agent"));
    assert_eq!(agent_token("RAG Agent"), Some("rag_search"));
    assert_eq!(agent_token("Web Search Agent"), Some("web_search"));
    assert_eq!(agent_token("All Agents"), Some("all_agents"));
    assert_eq!(agent_token("Crystal Ball Agent"), None);
    assert_eq!(agent_token(""), None);
}

#[test]
fn test_every_valid_tuple_maps_agent() {
    for year in YEARS {
        for quarter in QUARTERS {
            for agent in Agent::ALL {
                let req = build_request("revenue trend", year.into(), quarter.into(), agent.label())
                    .unwrap();
                assert_eq!(req.year, year);
                assert_eq!(req.quarter, quarter);
                assert_eq!(req.agent_name.as_deref(), Some(agent.token()));
            }
        }
    }
}

#[test]
fn test_unknown_agent_yields_null_not_error() {
    let req = build_request("q", 2024, 2, "Mystery Agent").unwrap();
    assert_eq!(req.agent_name, None);
}

#[test]
fn test_empty_query_is_kept() {
    let req = build_request("", 2023, 1, "RAG Agent").unwrap();
    assert_eq!(req.query, "");

    let req = build_request("  padded  ", 2023, 1, "RAG Agent").unwrap();
    assert_eq!(req.query, "  padded  ");
}

#[test]
fn test_out_of_range_year_and_quarter() {
    assert_eq!(
        build_request("q", 2020, 1, "RAG Agent").unwrap_err(),
        QueryError::YearOutOfRange(2020)
    );
    assert_eq!(
        build_request("q", 2026, 1, "RAG Agent").unwrap_err(),
        QueryError::YearOutOfRange(2026)
    );
    assert_eq!(
        build_request("q", 2024, 0, "RAG Agent").unwrap_err(),
        QueryError::QuarterOutOfRange(0)
    );
    assert_eq!(
        build_request("q", 2024, 5, "RAG Agent").unwrap_err(),
        QueryError::QuarterOutOfRange(5)
    );
    assert_eq!(
        build_request("q", -1, 5, "RAG Agent").unwrap_err(),
        QueryError::YearOutOfRange(-1)
    );
}

// The report service reads `agent_name`; the display label must never be sent.
#[test]
fn test_wire_contract_of_request() {
    let req = build_request("NVIDIA data center growth", 2024, 3, "Web Search Agent").unwrap();
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({
            "query": "NVIDIA data center growth",
            "year": 2024,
            "quarter": 3,
            "agent_name": "web_search"
        })
    );

    let unmapped = build_request("q", 2021, 4, "nope").unwrap();
    let value = serde_json::to_value(&unmapped).unwrap();
    assert!(value.get("agent_name").unwrap().is_null());
    assert!(value.get("agent").is_none());

    let back: ReportRequest = serde_json::from_value(value).unwrap();
    assert_eq!(back, unmapped);
}

#[test]
fn test_form_options_match_tables() {
    let opts = form_options();
    assert_eq!(opts.years, vec![2021, 2022, 2023, 2024, 2025]);
    assert_eq!(opts.quarters, vec![1, 2, 3, 4]);
    assert_eq!(
        opts.agents,
        vec!["Snowflake Agent", "RAG Agent", "Web Search Agent", "All Agents"]
    );
}
