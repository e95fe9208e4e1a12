//! Provenance line attached to every answer.

use crate::context::OVERVIEW_ID;

const REPORT: &str = "the 2025 Agreus/KPMG Global Family Office Compensation Benchmark Report";

/// Topic groups checked against the lower-cased answer, in output order.
const TOPICS: &[(&[&str], &str)] = &[
    (
        &["salary", "compensation", "£", "$", "€"],
        "compensation data from the benchmark report",
    ),
    (&["bonus", "ltip", "incentive"], "bonus and incentive structures"),
    (
        &["uk", "usa", "europe", "asia", "middle east", "australia"],
        "regional market analysis",
    ),
    (
        &["governance", "succession", "structure"],
        "governance and organizational data",
    ),
    (
        &["invest", "roi", "allocation", "portfolio"],
        "investment strategy insights",
    ),
    (
        &["hiring", "recruitment", "talent", "team"],
        "recruitment and talent trends",
    ),
];

/// Describe where `answer` came from.
///
/// `loaded` is the assembler's list, overview included. Sources are only
/// listed when more than one entry was loaded.
pub fn explain(answer: &str, loaded: &[String]) -> String {
    if answer.is_empty() {
        return "No response generated.".into();
    }

    let lower = answer.to_lowercase();
    let topics: Vec<&str> = TOPICS
        .iter()
        .filter(|(terms, _)| terms.iter().any(|t| lower.contains(t)))
        .map(|(_, label)| *label)
        .collect();

    let mut text = if topics.is_empty() {
        format!("Response based on {REPORT} data.")
    } else {
        format!(
            "Response derived from {} in {REPORT} (585 survey responses, 20 qualitative interviews).",
            topics.join(", ")
        )
    };

    if loaded.len() > 1 {
        let sources: Vec<&str> = loaded
            .iter()
            .map(String::as_str)
            .filter(|id| *id != OVERVIEW_ID)
            .collect();
        if !sources.is_empty() {
            text.push_str(&format!(" Sources: {}.", sources.join(", ")));
        }
    }

    text
}
