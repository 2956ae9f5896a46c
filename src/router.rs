//! Query router
//!
//! Pure decision logic: given a free-text query and the registry, decide
//! which agent should handle it. Exclusive first-match routing — at most
//! one agent per query, which bounds latency and cost at the expense of
//! queries that genuinely span domains.
//!
//! Rules are data, not control flow: an ordered table of keyword sets is
//! evaluated in strict priority order, and a matched rule whose target is
//! not in the registry falls through to the next rule.

use crate::models::RoutingDecision;
use crate::registry::AgentRegistry;
use tracing::{debug, info};

/// One routing rule: any substring match against the normalized query
/// selects `target`, provided the target is registered.
struct RoutingRule {
    keywords: &'static [&'static str],
    target: &'static str,
    priority: u32,
}

const INVESTMENT_AGENT: &str = "investment_agent";

/// Ordered rule table. Market research is checked first so that e.g.
/// "research renewable energy investments" routes to the researcher even
/// though "invest" also matches the investment rule.
const ROUTING_RULES: &[RoutingRule] = &[
    RoutingRule {
        keywords: &[
            "market", "trend", "research", "analysis", "outlook", "economic",
            "sector", "industry", "current", "news", "performance", "renewable",
            "energy", "tech", "technology",
        ],
        target: "market_researcher",
        priority: 1,
    },
    RoutingRule {
        keywords: &[
            "find advisor", "find adviser", "recommend advisor", "recommend adviser",
            "financial planner", "need advisor", "looking for advisor",
            "advisor in charlotte", "advisor in new york", "advisor in miami",
            "cfp advisor", "cfa advisor", "find financial advisor",
        ],
        target: "advisor_finder",
        priority: 1,
    },
    RoutingRule {
        keywords: &[
            "invest", "portfolio", "allocation", "diversif", "risk", "return",
            "retirement", "savings", "wealth", "401k", "ira", "mutual fund",
            "etf", "stock", "bond", "asset", "financial planning", "money",
        ],
        target: INVESTMENT_AGENT,
        priority: 1,
    },
    // Generic financial terms fall back to the investment agent.
    RoutingRule {
        keywords: &["financial", "finance", "dollar", "$"],
        target: INVESTMENT_AGENT,
        priority: 3,
    },
];

/// Priority assigned to the final catch-all fallback.
const FALLBACK_PRIORITY: u32 = 4;

/// Decide which agent should answer `query`.
///
/// Returns at most one decision. Returns an empty vector only when no rule
/// target is registered and the investment agent itself is absent — the
/// caller must treat that as "no suitable agent".
pub fn decide(query: &str, registry: &AgentRegistry) -> Vec<RoutingDecision> {
    let normalized = query.to_lowercase().trim().to_string();

    for rule in ROUTING_RULES {
        let matched = rule.keywords.iter().any(|kw| normalized.contains(kw));
        if !matched {
            continue;
        }

        if !registry.contains(rule.target) {
            debug!(
                agent = %rule.target,
                "Rule matched but target not registered, falling through"
            );
            continue;
        }

        info!(agent = %rule.target, priority = rule.priority, "Routing decision");
        return vec![RoutingDecision {
            agent_name: rule.target.to_string(),
            query_text: query.to_string(),
            priority: rule.priority,
            rank: 0,
        }];
    }

    // Final fallback: everything else goes to the investment agent, with
    // the lowest priority rank, when it exists at all.
    if registry.contains(INVESTMENT_AGENT) {
        info!(
            agent = INVESTMENT_AGENT,
            priority = FALLBACK_PRIORITY,
            "No rule matched, using fallback agent"
        );
        return vec![RoutingDecision {
            agent_name: INVESTMENT_AGENT.to_string(),
            query_text: query.to_string(),
            priority: FALLBACK_PRIORITY,
            rank: 0,
        }];
    }

    debug!("No suitable agent registered for query");
    Vec::new()
}
