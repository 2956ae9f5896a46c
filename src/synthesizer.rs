//! Response synthesizer
//!
//! Merges per-agent outcomes into the single text response returned to the
//! end user. Pure and deterministic: no I/O, no LLM calls. Degrades
//! gracefully when some or all agents failed.

use crate::models::AgentOutcome;

/// Returned verbatim when every agent call failed.
pub const ALL_AGENTS_UNAVAILABLE: &str =
    "All agents are currently unavailable. Please try again later.";

/// Section labels when a single agent answered.
const SINGLE_LABELS: &[(&str, &str)] = &[
    ("investment_agent", "INVESTMENT ANALYSIS"),
    ("advisor_finder", "ADVISOR RECOMMENDATIONS"),
    ("market_researcher", "MARKET RESEARCH"),
];

/// Section labels inside a combined multi-agent response.
const COMBINED_LABELS: &[(&str, &str)] = &[
    ("investment_agent", "INVESTMENT STRATEGY"),
    ("advisor_finder", "ADVISOR RECOMMENDATIONS"),
    ("market_researcher", "MARKET INSIGHTS"),
];

fn label_for(agent_name: &str, table: &[(&str, &str)]) -> String {
    table
        .iter()
        .find(|(name, _)| *name == agent_name)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| agent_name.to_uppercase())
}

/// Combine outcomes into one user-facing response.
///
/// Sections appear in outcome order, which the dispatcher guarantees is
/// the original decision order.
pub fn combine(outcomes: &[AgentOutcome], _original_query: &str) -> String {
    let successful: Vec<&AgentOutcome> = outcomes.iter().filter(|o| o.succeeded).collect();

    if successful.is_empty() {
        return ALL_AGENTS_UNAVAILABLE.to_string();
    }

    if let [single] = successful.as_slice() {
        let label = label_for(&single.agent_name, SINGLE_LABELS);
        return format!("**{}**\n\n{}", label, single.result_text);
    }

    let mut parts = vec!["**COMPREHENSIVE FINANCIAL ANALYSIS**\n".to_string()];

    for outcome in &successful {
        let label = label_for(&outcome.agent_name, COMBINED_LABELS);
        parts.push(format!("\n**{}:**\n{}", label, outcome.result_text));
    }

    parts.push(format!(
        "\n\n**INTEGRATED GUIDANCE:** This analysis combines insights from {} \
         specialized financial experts to provide comprehensive guidance \
         tailored to your needs.",
        successful.len()
    ));

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_outcomes_yields_unavailable_message() {
        assert_eq!(combine(&[], "any query"), ALL_AGENTS_UNAVAILABLE);
    }

    #[test]
    fn test_all_failed_yields_unavailable_message() {
        let outcomes = vec![
            AgentOutcome::unavailable("investment_agent"),
            AgentOutcome::unavailable("market_researcher"),
        ];
        assert_eq!(combine(&outcomes, "any query"), ALL_AGENTS_UNAVAILABLE);
    }

    #[test]
    fn test_single_success_is_labeled() {
        let outcomes = vec![AgentOutcome::success(
            "market_researcher",
            "Renewable energy is trending up.",
        )];

        let response = combine(&outcomes, "renewable trends?");
        assert!(response.starts_with("**MARKET RESEARCH**\n\n"));
        assert!(response.ends_with("Renewable energy is trending up."));
    }

    #[test]
    fn test_single_success_ignores_failed_siblings() {
        let outcomes = vec![
            AgentOutcome::unavailable("advisor_finder"),
            AgentOutcome::success("investment_agent", "Diversify into bonds."),
        ];

        let response = combine(&outcomes, "what should I do?");
        assert!(response.starts_with("**INVESTMENT ANALYSIS**"));
        assert!(!response.contains("unavailable"));
    }

    #[test]
    fn test_unknown_agent_renders_uppercased_name() {
        let outcomes = vec![AgentOutcome::success("tax_specialist", "Defer gains.")];

        let response = combine(&outcomes, "taxes?");
        assert!(response.starts_with("**TAX_SPECIALIST**"));
    }

    #[test]
    fn test_two_successes_are_combined_in_order_with_trailer() {
        let outcomes = vec![
            AgentOutcome::success("investment_agent", "Allocate 60/40."),
            AgentOutcome::success("market_researcher", "Markets are volatile."),
        ];

        let response = combine(&outcomes, "full picture please");
        assert!(response.starts_with("**COMPREHENSIVE FINANCIAL ANALYSIS**"));

        let strategy_pos = response.find("**INVESTMENT STRATEGY:**").unwrap();
        let insights_pos = response.find("**MARKET INSIGHTS:**").unwrap();
        assert!(strategy_pos < insights_pos);

        assert!(response.contains("insights from 2 specialized financial experts"));
    }
}
