//! # Risk Classifier
//!
//! Two strictly sequential passes:
//!
//! 1. [`accumulate_risk`] walks the risk rules in configured order. Every
//!    matching rule appends its reason; the level is max-so-far, so `HIGH`
//!    pins and `MEDIUM` only promotes from `LOW`.
//! 2. [`escalate_risk`] looks at the finished profile. A `MEDIUM` result
//!    carrying three or more reasons becomes `HIGH`, with a synthetic reason.
//!
//! The second pass depends on the final reason count, so it never runs
//! interleaved with the first.

use crate::condition::rule_matches;
use crate::dimension::ScoreSet;
use crate::rules::RiskRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of accumulated reasons at which a MEDIUM profile escalates.
pub const ESCALATION_REASON_COUNT: usize = 3;

/// Reason appended when escalation fires.
pub const ESCALATION_REASON: &str =
    "Multiple medium-risk factors combined raise the overall risk to HIGH.";

// =============================================================================
// RISK LEVEL
// =============================================================================

/// Ordered risk level. `Ord` follows severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Ordinal used by `RISK_LEVEL` conditions: LOW=1, MEDIUM=2, HIGH=3.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RISK PROFILE
// =============================================================================

/// Overall risk level and the reasons that produced it, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub level: RiskLevel,
    pub reasons: Vec<String>,
}

impl RiskProfile {
    /// Whether the escalation pass added its synthetic reason.
    #[must_use]
    pub fn was_escalated(&self) -> bool {
        self.reasons.last().is_some_and(|r| r == ESCALATION_REASON)
    }
}

/// Phase 1: ordered rule pass with max-so-far level.
#[must_use]
pub fn accumulate_risk(scores: &ScoreSet, rules: &[RiskRule]) -> RiskProfile {
    let mut profile = RiskProfile::default();

    for rule in rules {
        if !rule_matches(rule, scores, None) {
            continue;
        }
        tracing::trace!(rule = %rule.id, level = %rule.level, "risk rule fired");
        profile.reasons.push(rule.reason.clone());
        profile.level = profile.level.max(rule.level);
    }

    profile
}

/// Phase 2: meta-escalation of a finished profile.
#[must_use]
pub fn escalate_risk(mut profile: RiskProfile) -> RiskProfile {
    if profile.level == RiskLevel::Medium && profile.reasons.len() >= ESCALATION_REASON_COUNT {
        tracing::debug!(
            reasons = profile.reasons.len(),
            "escalating combined medium risk to HIGH"
        );
        profile.level = RiskLevel::High;
        profile.reasons.push(ESCALATION_REASON.to_string());
    }
    profile
}

/// Classify risk: [`accumulate_risk`] followed by [`escalate_risk`].
///
/// An empty rule list yields `LOW` with no reasons.
#[must_use]
pub fn classify_risk(scores: &ScoreSet, rules: &[RiskRule]) -> RiskProfile {
    escalate_risk(accumulate_risk(scores, rules))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Condition, Operator};
    use crate::dimension::DimensionId;
    use crate::rules::default_risk_rules;

    fn rule(id: &str, dim: DimensionId, level: RiskLevel) -> RiskRule {
        RiskRule {
            id: id.to_string(),
            conditions: vec![Condition::dimension(dim, Operator::Gte, 2)],
            level,
            reason: format!("{id} fired"),
        }
    }

    #[test]
    fn empty_rules_yield_low() {
        let profile = classify_risk(&ScoreSet::uniform(3), &[]);
        assert_eq!(profile.level, RiskLevel::Low);
        assert!(profile.reasons.is_empty());
    }

    #[test]
    fn high_is_not_demoted_by_later_medium() {
        let rules = vec![
            rule("a", DimensionId::DataSensitivity, RiskLevel::High),
            rule("b", DimensionId::UserReach, RiskLevel::Medium),
        ];
        let profile = classify_risk(&ScoreSet::uniform(2), &rules);
        assert_eq!(profile.level, RiskLevel::High);
        assert_eq!(profile.reasons, vec!["a fired", "b fired"]);
    }

    #[test]
    fn low_rule_is_a_level_noop_but_keeps_reason() {
        let rules = vec![
            rule("m", DimensionId::DataSensitivity, RiskLevel::Medium),
            rule("l", DimensionId::UserReach, RiskLevel::Low),
        ];
        let profile = accumulate_risk(&ScoreSet::uniform(2), &rules);
        assert_eq!(profile.level, RiskLevel::Medium);
        assert_eq!(profile.reasons.len(), 2);
    }

    #[test]
    fn three_medium_reasons_escalate() {
        let rules = vec![
            rule("a", DimensionId::DataSensitivity, RiskLevel::Medium),
            rule("b", DimensionId::UserReach, RiskLevel::Medium),
            rule("c", DimensionId::PlatformMix, RiskLevel::Medium),
        ];
        let profile = classify_risk(&ScoreSet::uniform(2), &rules);
        assert_eq!(profile.level, RiskLevel::High);
        assert_eq!(profile.reasons.len(), 4);
        assert!(profile.was_escalated());
    }

    #[test]
    fn two_medium_reasons_do_not_escalate() {
        let rules = vec![
            rule("a", DimensionId::DataSensitivity, RiskLevel::Medium),
            rule("b", DimensionId::UserReach, RiskLevel::Medium),
        ];
        let profile = classify_risk(&ScoreSet::uniform(2), &rules);
        assert_eq!(profile.level, RiskLevel::Medium);
        assert!(!profile.was_escalated());
    }

    #[test]
    fn escalation_never_touches_high() {
        let profile = RiskProfile {
            level: RiskLevel::High,
            reasons: vec!["x".into(), "y".into(), "z".into()],
        };
        let escalated = escalate_risk(profile.clone());
        assert_eq!(escalated, profile);
    }

    #[test]
    fn default_rules_sensitive_and_complex() {
        let scores = ScoreSet::from_pairs(&[
            (DimensionId::WorkflowComplexity, 3),
            (DimensionId::DataSensitivity, 3),
            (DimensionId::SystemsToIntegrate, 1),
            (DimensionId::UserReach, 1),
            (DimensionId::BusinessScope, 1),
            (DimensionId::AgentCountAndTypes, 1),
            (DimensionId::PlatformMix, 1),
            (DimensionId::ChangeAndAdoption, 1),
        ]);
        let profile = classify_risk(&scores, &default_risk_rules());
        assert_eq!(profile.level, RiskLevel::High);
        assert_eq!(profile.reasons.len(), 2);
        assert!(!profile.was_escalated());
    }

    #[test]
    fn default_rules_all_twos_stay_medium() {
        let profile = classify_risk(&ScoreSet::uniform(2), &default_risk_rules());
        assert_eq!(profile.level, RiskLevel::Medium);
        assert_eq!(profile.reasons.len(), 1);
    }

    #[test]
    fn ordinals() {
        assert_eq!(RiskLevel::Low.ordinal(), 1);
        assert_eq!(RiskLevel::Medium.ordinal(), 2);
        assert_eq!(RiskLevel::High.ordinal(), 3);
        assert!(RiskLevel::High > RiskLevel::Medium);
    }
}
