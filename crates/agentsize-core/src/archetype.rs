//! # Archetype Recommender
//!
//! Turns matching archetype triggers into one [`AgentRecommendation`] per
//! archetype id.
//!
//! ## Merge rule
//!
//! Triggers are evaluated in configured order. The first trigger to fire for an
//! archetype fixes its position in the output. A later trigger for the same
//! archetype merges as `necessity = max(existing, new)`; the later trigger's
//! reason is appended (`" Also: <reason>"`) only when that `max` actually
//! raised the necessity. Equal or weaker triggers leave the entry untouched.

use crate::condition::rule_matches;
use crate::dimension::ScoreSet;
use crate::rules::{ArchetypeTriggerRule, Necessity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Separator placed before an upgrading trigger's reason.
pub const UPGRADE_REASON_SEPARATOR: &str = " Also: ";

// =============================================================================
// ROLE TYPES
// =============================================================================

/// Display grouping for archetypes. Has no effect on classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleType {
    Coordinator,
    Specialist,
    Integration,
    Interface,
    Guardrail,
    Operations,
}

impl RoleType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RoleType::Coordinator => "Coordinator Agent",
            RoleType::Specialist => "Specialist Agent",
            RoleType::Integration => "Integration Agent",
            RoleType::Interface => "Interface Agent",
            RoleType::Guardrail => "Guardrail Agent",
            RoleType::Operations => "Operations Agent",
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// A reusable agent-role pattern, referenced by id from triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Archetype {
    pub id: &'static str,
    pub name: &'static str,
    pub role_type: RoleType,
    pub description: &'static str,
}

/// The archetype catalog.
pub static ARCHETYPES: [Archetype; 12] = [
    Archetype {
        id: "orchestrator",
        name: "Orchestrator",
        role_type: RoleType::Coordinator,
        description: "Owns the end-to-end flow and hands work between agents.",
    },
    Archetype {
        id: "planner",
        name: "Planner",
        role_type: RoleType::Coordinator,
        description: "Decomposes goals into ordered tasks and re-plans on failure.",
    },
    Archetype {
        id: "router",
        name: "Router",
        role_type: RoleType::Coordinator,
        description: "Classifies incoming requests and dispatches them to specialists.",
    },
    Archetype {
        id: "domain-specialist",
        name: "Domain Specialist",
        role_type: RoleType::Specialist,
        description: "Performs the core task using domain knowledge and tools.",
    },
    Archetype {
        id: "knowledge-retriever",
        name: "Knowledge Retriever",
        role_type: RoleType::Specialist,
        description: "Finds and summarises relevant documents and records.",
    },
    Archetype {
        id: "integration-adapter",
        name: "Integration Adapter",
        role_type: RoleType::Integration,
        description: "Wraps systems of record behind well-defined tool calls.",
    },
    Archetype {
        id: "conversational-front-door",
        name: "Conversational Front Door",
        role_type: RoleType::Interface,
        description: "Single conversational entry point for users.",
    },
    Archetype {
        id: "human-liaison",
        name: "Human Liaison",
        role_type: RoleType::Interface,
        description: "Packages decisions for human review and relays the outcome.",
    },
    Archetype {
        id: "adoption-coach",
        name: "Adoption Coach",
        role_type: RoleType::Interface,
        description: "Guides users through new ways of working inside the workflow.",
    },
    Archetype {
        id: "compliance-guardian",
        name: "Compliance Guardian",
        role_type: RoleType::Guardrail,
        description: "Enforces data-handling and policy constraints on every step.",
    },
    Archetype {
        id: "quality-reviewer",
        name: "Quality Reviewer",
        role_type: RoleType::Guardrail,
        description: "Checks outputs against acceptance criteria before release.",
    },
    Archetype {
        id: "operations-monitor",
        name: "Operations Monitor",
        role_type: RoleType::Operations,
        description: "Tracks health, cost and drift across agents and platforms.",
    },
];

/// Look up an archetype by id.
#[must_use]
pub fn find_archetype(id: &str) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.id == id)
}

/// Static many-to-one map from archetype id to role type.
///
/// Ids outside the catalog group under [`RoleType::Specialist`].
#[must_use]
pub fn role_type_for(archetype_id: &str) -> RoleType {
    find_archetype(archetype_id)
        .map(|a| a.role_type)
        .unwrap_or(RoleType::Specialist)
}

// =============================================================================
// RECOMMENDATION
// =============================================================================

/// One recommended agent role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecommendation {
    pub role_type: RoleType,
    pub archetype_id: String,
    pub necessity: Necessity,
    pub reason: String,
}

impl AgentRecommendation {
    fn from_trigger(rule: &ArchetypeTriggerRule) -> Self {
        Self {
            role_type: role_type_for(&rule.archetype_id),
            archetype_id: rule.archetype_id.clone(),
            necessity: rule.necessity,
            reason: rule.reason.clone(),
        }
    }

    /// Merge a later trigger into this entry.
    ///
    /// Returns `true` when the necessity was raised.
    fn merge(&mut self, rule: &ArchetypeTriggerRule) -> bool {
        let merged = self.necessity.max(rule.necessity);
        if merged == self.necessity {
            return false;
        }
        self.necessity = merged;
        self.reason.push_str(UPGRADE_REASON_SEPARATOR);
        self.reason.push_str(&rule.reason);
        true
    }
}

/// Recommend agent roles from the trigger list.
///
/// Output holds at most one entry per archetype id, in first-trigger order.
#[must_use]
pub fn recommend_archetypes(
    scores: &ScoreSet,
    triggers: &[ArchetypeTriggerRule],
) -> Vec<AgentRecommendation> {
    let mut recommendations: Vec<AgentRecommendation> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for rule in triggers {
        if !rule_matches(rule, scores, None) {
            continue;
        }

        match index.get(rule.archetype_id.as_str()) {
            Some(&position) => {
                if recommendations[position].merge(rule) {
                    tracing::trace!(
                        rule = %rule.id,
                        archetype = %rule.archetype_id,
                        necessity = %rule.necessity,
                        "archetype necessity upgraded"
                    );
                }
            }
            None => {
                tracing::trace!(rule = %rule.id, archetype = %rule.archetype_id, "archetype recommended");
                index.insert(rule.archetype_id.as_str(), recommendations.len());
                recommendations.push(AgentRecommendation::from_trigger(rule));
            }
        }
    }

    recommendations
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Condition, Operator};
    use crate::dimension::DimensionId;
    use crate::rules::default_archetype_triggers;
    use std::collections::BTreeSet;

    fn trig(id: &str, archetype: &str, necessity: Necessity, reason: &str) -> ArchetypeTriggerRule {
        ArchetypeTriggerRule {
            id: id.to_string(),
            conditions: Vec::new(),
            archetype_id: archetype.to_string(),
            necessity,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn upgrade_appends_reason_only_on_increase() {
        let triggers = vec![
            trig("t1", "planner", Necessity::Recommended, "first"),
            trig("t2", "planner", Necessity::DefinitelyNeeded, "second"),
            trig("t3", "planner", Necessity::Recommended, "third"),
        ];
        let recs = recommend_archetypes(&ScoreSet::new(), &triggers);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].necessity, Necessity::DefinitelyNeeded);
        assert_eq!(recs[0].reason, "first Also: second");
    }

    #[test]
    fn equal_necessity_is_a_noop() {
        let triggers = vec![
            trig("t1", "router", Necessity::Optional, "first"),
            trig("t2", "router", Necessity::Optional, "again"),
        ];
        let recs = recommend_archetypes(&ScoreSet::new(), &triggers);
        assert_eq!(recs[0].reason, "first");
        assert_eq!(recs[0].necessity, Necessity::Optional);
    }

    #[test]
    fn position_follows_first_trigger() {
        let triggers = vec![
            trig("a", "router", Necessity::Optional, "r"),
            trig("b", "planner", Necessity::Recommended, "p"),
            trig("c", "router", Necessity::DefinitelyNeeded, "r2"),
        ];
        let recs = recommend_archetypes(&ScoreSet::new(), &triggers);
        let ids: Vec<&str> = recs.iter().map(|r| r.archetype_id.as_str()).collect();
        assert_eq!(ids, vec!["router", "planner"]);
        assert_eq!(recs[0].necessity, Necessity::DefinitelyNeeded);
    }

    #[test]
    fn non_matching_triggers_are_skipped() {
        let mut gated = trig("g", "compliance-guardian", Necessity::Recommended, "data");
        gated.conditions = vec![Condition::dimension(
            DimensionId::DataSensitivity,
            Operator::Gte,
            2,
        )];
        let recs = recommend_archetypes(&ScoreSet::uniform(1), &[gated]);
        assert!(recs.is_empty());
    }

    #[test]
    fn role_types_come_from_catalog() {
        assert_eq!(role_type_for("orchestrator"), RoleType::Coordinator);
        assert_eq!(role_type_for("compliance-guardian"), RoleType::Guardrail);
        assert_eq!(role_type_for("not-in-catalog"), RoleType::Specialist);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: BTreeSet<&str> = ARCHETYPES.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), ARCHETYPES.len());
    }

    #[test]
    fn default_triggers_deduplicate_on_maxed_scores() {
        let recs = recommend_archetypes(&ScoreSet::uniform(3), &default_archetype_triggers());
        let ids: BTreeSet<&str> = recs.iter().map(|r| r.archetype_id.as_str()).collect();
        assert_eq!(ids.len(), recs.len());
        assert_eq!(recs[0].archetype_id, "domain-specialist");

        let orchestrator = recs.iter().find(|r| r.archetype_id == "orchestrator");
        assert_eq!(
            orchestrator.map(|r| r.necessity),
            Some(Necessity::DefinitelyNeeded)
        );
    }

    #[test]
    fn default_triggers_minimal_scores_yield_baseline_only() {
        let recs = recommend_archetypes(&ScoreSet::uniform(1), &default_archetype_triggers());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].archetype_id, "domain-specialist");
        assert_eq!(recs[0].role_type, RoleType::Specialist);
    }
}
