//! # Governance Selector
//!
//! Two independent pieces:
//!
//! - [`select_governance`] runs the governance rules and returns every
//!   matching requirement verbatim. No deduplication: two rules with the same
//!   title both appear.
//! - [`impact_level`] is a fixed decision table over three raw dimension
//!   reads. It does not go through the rule table, and it alone selects the
//!   oversight points and monitoring cadence.

use crate::condition::rule_matches;
use crate::dimension::{DimensionId, ScoreSet};
use crate::risk::RiskProfile;
use crate::rules::{GovernanceRule, Priority};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// IMPACT LEVEL
// =============================================================================

/// Regulatory and oversight exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactLevel::Low => f.write_str("LOW"),
            ImpactLevel::Moderate => f.write_str("MODERATE"),
            ImpactLevel::High => f.write_str("HIGH"),
        }
    }
}

/// Impact level from data sensitivity, user reach and workflow complexity.
///
/// - HIGH: sensitivity 3 and (reach 3 or complexity 3)
/// - MODERATE: sensitivity 3, or reach 3, or both sensitivity and reach at 2
/// - LOW: otherwise
#[must_use]
pub fn impact_level(scores: &ScoreSet) -> ImpactLevel {
    let sensitivity = scores.get(DimensionId::DataSensitivity);
    let reach = scores.get(DimensionId::UserReach);
    let complexity = scores.get(DimensionId::WorkflowComplexity);

    if sensitivity == 3 && (reach == 3 || complexity == 3) {
        ImpactLevel::High
    } else if sensitivity == 3 || reach == 3 || (sensitivity == 2 && reach == 2) {
        ImpactLevel::Moderate
    } else {
        ImpactLevel::Low
    }
}

/// Human oversight checkpoints for an impact level.
#[must_use]
pub fn oversight_points(impact: ImpactLevel) -> Vec<String> {
    let points: &[&str] = match impact {
        ImpactLevel::Low => &[
            "Owner spot-checks a sample of agent outputs each month.",
            "Users can flag incorrect outputs from within the workflow.",
        ],
        ImpactLevel::Moderate => &[
            "Flagged or low-confidence outputs are routed to a human reviewer.",
            "Owner reviews escalations and user feedback every week.",
            "Governance forum reviews performance and incidents each quarter.",
        ],
        ImpactLevel::High => &[
            "A human approves every consequential action before it executes.",
            "Decisions are independently audited against policy each month.",
            "A named on-call owner runs the incident response runbook.",
            "Material changes to prompts, tools or models pass a formal change review.",
        ],
    };
    points.iter().map(|p| (*p).to_string()).collect()
}

/// Monitoring cadence text for an impact level.
#[must_use]
pub fn monitoring_cadence(impact: ImpactLevel) -> String {
    match impact {
        ImpactLevel::Low => "Monthly spot checks with a quarterly summary.",
        ImpactLevel::Moderate => "Weekly dashboard review with a quarterly audit.",
        ImpactLevel::High => "Continuous monitoring with real-time alerting and a monthly audit.",
    }
    .to_string()
}

// =============================================================================
// REQUIREMENTS
// =============================================================================

/// One governance control, copied from the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceRequirement {
    pub rule_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
}

impl From<&GovernanceRule> for GovernanceRequirement {
    fn from(rule: &GovernanceRule) -> Self {
        Self {
            rule_id: rule.id.clone(),
            title: rule.title.clone(),
            description: rule.description.clone(),
            category: rule.category.clone(),
            priority: rule.priority,
        }
    }
}

/// Every matching governance requirement, in rule order.
///
/// Rules may test `RISK_LEVEL`; the supplied profile answers those.
#[must_use]
pub fn select_governance(
    scores: &ScoreSet,
    rules: &[GovernanceRule],
    risk: &RiskProfile,
) -> Vec<GovernanceRequirement> {
    rules
        .iter()
        .filter(|rule| rule_matches(*rule, scores, Some(risk)))
        .map(GovernanceRequirement::from)
        .collect()
}

// =============================================================================
// GOVERNANCE PACK
// =============================================================================

/// Everything the governance views consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernancePack {
    pub impact_level: ImpactLevel,
    pub risk_profile: RiskProfile,
    pub requirements: Vec<GovernanceRequirement>,
    pub oversight_points: Vec<String>,
    pub monitoring_cadence: String,
}

impl GovernancePack {
    /// Requirements with [`Priority::Mandatory`].
    pub fn mandatory(&self) -> impl Iterator<Item = &GovernanceRequirement> {
        self.requirements
            .iter()
            .filter(|r| r.priority == Priority::Mandatory)
    }
}

/// Assemble the governance pack for an already classified risk profile.
#[must_use]
pub fn build_governance_pack(
    scores: &ScoreSet,
    rules: &[GovernanceRule],
    risk: RiskProfile,
) -> GovernancePack {
    let impact = impact_level(scores);
    let requirements = select_governance(scores, rules, &risk);

    GovernancePack {
        impact_level: impact,
        risk_profile: risk,
        requirements,
        oversight_points: oversight_points(impact),
        monitoring_cadence: monitoring_cadence(impact),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Condition, Operator};
    use crate::risk::{RiskLevel, classify_risk};
    use crate::rules::{default_governance_rules, default_risk_rules};

    fn scores(sensitivity: u8, reach: u8, complexity: u8) -> ScoreSet {
        ScoreSet::from_pairs(&[
            (DimensionId::DataSensitivity, sensitivity),
            (DimensionId::UserReach, reach),
            (DimensionId::WorkflowComplexity, complexity),
        ])
    }

    #[test]
    fn impact_decision_table() {
        assert_eq!(impact_level(&scores(3, 3, 1)), ImpactLevel::High);
        assert_eq!(impact_level(&scores(3, 1, 3)), ImpactLevel::High);
        assert_eq!(impact_level(&scores(3, 1, 1)), ImpactLevel::Moderate);
        assert_eq!(impact_level(&scores(1, 3, 3)), ImpactLevel::Moderate);
        assert_eq!(impact_level(&scores(2, 2, 1)), ImpactLevel::Moderate);
        assert_eq!(impact_level(&scores(2, 1, 3)), ImpactLevel::Low);
        assert_eq!(impact_level(&ScoreSet::new()), ImpactLevel::Low);
    }

    #[test]
    fn oversight_grows_with_impact() {
        assert!(oversight_points(ImpactLevel::Low).len() < oversight_points(ImpactLevel::Moderate).len());
        assert!(
            oversight_points(ImpactLevel::Moderate).len() < oversight_points(ImpactLevel::High).len()
        );
        assert_ne!(
            monitoring_cadence(ImpactLevel::Low),
            monitoring_cadence(ImpactLevel::High)
        );
    }

    #[test]
    fn requirements_are_not_deduplicated() {
        let rule = GovernanceRule {
            id: "dup".to_string(),
            conditions: Vec::new(),
            title: "Same".to_string(),
            description: "Same text".to_string(),
            category: "Oversight".to_string(),
            priority: Priority::Recommended,
        };
        let mut second = rule.clone();
        second.id = "dup-2".to_string();

        let reqs = select_governance(&ScoreSet::new(), &[rule, second], &RiskProfile::default());
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].title, reqs[1].title);
    }

    #[test]
    fn risk_level_conditions_use_supplied_profile() {
        let rule = GovernanceRule {
            id: "hitl".to_string(),
            conditions: vec![Condition::risk_level(Operator::Gte, 3)],
            title: "Human approval".to_string(),
            description: String::new(),
            category: "Oversight".to_string(),
            priority: Priority::Mandatory,
        };
        let high = RiskProfile {
            level: RiskLevel::High,
            reasons: Vec::new(),
        };
        let rules = std::slice::from_ref(&rule);
        assert_eq!(select_governance(&ScoreSet::new(), rules, &high).len(), 1);
        assert!(select_governance(&ScoreSet::new(), rules, &RiskProfile::default()).is_empty());
    }

    #[test]
    fn default_pack_for_regulated_public_solution() {
        let scores = scores(3, 3, 2);
        let risk = classify_risk(&scores, &default_risk_rules());
        let pack = build_governance_pack(&scores, &default_governance_rules(), risk);

        assert_eq!(pack.impact_level, ImpactLevel::High);
        assert_eq!(pack.risk_profile.level, RiskLevel::High);
        let ids: Vec<&str> = pack.requirements.iter().map(|r| r.rule_id.as_str()).collect();
        assert!(ids.contains(&"gov-human-approval"));
        assert!(ids.contains(&"gov-escalation-path"));
        assert!(pack.mandatory().count() >= 4);
    }

    #[test]
    fn default_pack_baseline_only() {
        let scores = ScoreSet::uniform(1);
        let risk = classify_risk(&scores, &default_risk_rules());
        let pack = build_governance_pack(&scores, &default_governance_rules(), risk);

        assert_eq!(pack.impact_level, ImpactLevel::Low);
        assert_eq!(pack.requirements.len(), 2);
    }
}
