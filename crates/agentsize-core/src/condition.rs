//! # Condition Evaluator & Rule Matcher
//!
//! A [`Condition`] compares one subject against an integer threshold. The
//! subject is either a real dimension or the derived risk level, which must be
//! handed in explicitly as an already computed [`RiskProfile`].
//!
//! ## Matching convention
//!
//! **A rule matches when every one of its conditions holds. A rule with no
//! conditions always matches.** Baseline requirements rely on this: an empty
//! condition list means "always apply", never "never apply". Every selector
//! (risk, governance, archetype) goes through [`rule_matches`] so the
//! convention lives in exactly one place.

use crate::dimension::{DimensionId, ScoreSet};
use crate::risk::RiskProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire name of the derived risk-level subject.
pub const RISK_LEVEL_SUBJECT: &str = "RISK_LEVEL";

// =============================================================================
// OPERATOR
// =============================================================================

/// Comparison operator. Anything outside these six fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    /// Apply `value <op> threshold`.
    #[must_use]
    pub fn compare(self, value: i32, threshold: i32) -> bool {
        match self {
            Operator::Gte => value >= threshold,
            Operator::Gt => value > threshold,
            Operator::Lte => value <= threshold,
            Operator::Lt => value < threshold,
            Operator::Eq => value == threshold,
            Operator::Ne => value != threshold,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Gte => ">=",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Lt => "<",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// What a condition reads: a real dimension or the derived risk level.
///
/// Serialized as a plain string, either the dimension id or `"RISK_LEVEL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConditionSubject {
    Dimension(DimensionId),
    RiskLevel,
}

impl fmt::Display for ConditionSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionSubject::Dimension(id) => f.write_str(id.as_str()),
            ConditionSubject::RiskLevel => f.write_str(RISK_LEVEL_SUBJECT),
        }
    }
}

impl TryFrom<String> for ConditionSubject {
    type Error = crate::AgentSizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == RISK_LEVEL_SUBJECT {
            Ok(ConditionSubject::RiskLevel)
        } else {
            value.parse().map(ConditionSubject::Dimension)
        }
    }
}

impl From<ConditionSubject> for String {
    fn from(subject: ConditionSubject) -> Self {
        subject.to_string()
    }
}

// =============================================================================
// CONDITION
// =============================================================================

/// One `(subject, operator, threshold)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub subject: ConditionSubject,
    pub operator: Operator,
    pub threshold: i32,
}

impl Condition {
    /// Condition on a dimension score.
    #[must_use]
    pub const fn dimension(id: DimensionId, operator: Operator, threshold: i32) -> Self {
        Self {
            subject: ConditionSubject::Dimension(id),
            operator,
            threshold,
        }
    }

    /// Condition on the derived risk level (LOW=1, MEDIUM=2, HIGH=3).
    #[must_use]
    pub const fn risk_level(operator: Operator, threshold: i32) -> Self {
        Self {
            subject: ConditionSubject::RiskLevel,
            operator,
            threshold,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.operator, self.threshold)
    }
}

/// Evaluate a single condition.
///
/// Dimension subjects read `0` when unscored. A `RISK_LEVEL` subject is false
/// when no risk profile is supplied.
#[must_use]
pub fn evaluate_condition(
    condition: &Condition,
    scores: &ScoreSet,
    risk: Option<&RiskProfile>,
) -> bool {
    let value = match condition.subject {
        ConditionSubject::Dimension(id) => scores.get(id) as i32,
        ConditionSubject::RiskLevel => match risk {
            Some(profile) => profile.level.ordinal() as i32,
            None => return false,
        },
    };
    condition.operator.compare(value, condition.threshold)
}

// =============================================================================
// RULE MATCHER
// =============================================================================

/// Anything carrying an id and an AND-ed list of conditions.
pub trait Conditional {
    /// Rule identifier, unique within its list.
    fn id(&self) -> &str;

    /// Conditions that must all hold for the rule to fire.
    fn conditions(&self) -> &[Condition];
}

/// True iff every condition holds, or the list is empty.
#[must_use]
pub fn rule_matches<R: Conditional + ?Sized>(
    rule: &R,
    scores: &ScoreSet,
    risk: Option<&RiskProfile>,
) -> bool {
    rule.conditions()
        .iter()
        .all(|condition| evaluate_condition(condition, scores, risk))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;

    struct Bare(Vec<Condition>);

    impl Conditional for Bare {
        fn id(&self) -> &str {
            "bare"
        }

        fn conditions(&self) -> &[Condition] {
            &self.0
        }
    }

    fn profile(level: RiskLevel) -> RiskProfile {
        RiskProfile {
            level,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn operators_compare_as_documented() {
        assert!(Operator::Gte.compare(3, 3));
        assert!(!Operator::Gt.compare(3, 3));
        assert!(Operator::Lte.compare(2, 3));
        assert!(Operator::Lt.compare(2, 3));
        assert!(Operator::Eq.compare(2, 2));
        assert!(Operator::Ne.compare(1, 2));
        assert!(!Operator::Ne.compare(2, 2));
    }

    #[test]
    fn missing_dimension_compares_as_zero() {
        let scores = ScoreSet::new();
        let eq_zero = Condition::dimension(DimensionId::UserReach, Operator::Eq, 0);
        let gte_one = Condition::dimension(DimensionId::UserReach, Operator::Gte, 1);
        assert!(evaluate_condition(&eq_zero, &scores, None));
        assert!(!evaluate_condition(&gte_one, &scores, None));
    }

    #[test]
    fn risk_level_without_profile_fails_closed() {
        let scores = ScoreSet::uniform(3);
        let cond = Condition::risk_level(Operator::Gte, 0);
        assert!(!evaluate_condition(&cond, &scores, None));
    }

    #[test]
    fn risk_level_maps_to_ordinals() {
        let scores = ScoreSet::new();
        let high_only = Condition::risk_level(Operator::Eq, 3);
        let at_least_medium = Condition::risk_level(Operator::Gte, 2);

        let low = profile(RiskLevel::Low);
        let medium = profile(RiskLevel::Medium);
        let high = profile(RiskLevel::High);

        assert!(!evaluate_condition(&high_only, &scores, Some(&medium)));
        assert!(evaluate_condition(&high_only, &scores, Some(&high)));
        assert!(!evaluate_condition(&at_least_medium, &scores, Some(&low)));
        assert!(evaluate_condition(&at_least_medium, &scores, Some(&medium)));
    }

    #[test]
    fn empty_rule_always_matches() {
        let rule = Bare(Vec::new());
        assert!(rule_matches(&rule, &ScoreSet::new(), None));
        assert!(rule_matches(&rule, &ScoreSet::uniform(3), None));
    }

    #[test]
    fn conditions_are_anded() {
        let rule = Bare(vec![
            Condition::dimension(DimensionId::DataSensitivity, Operator::Gte, 3),
            Condition::dimension(DimensionId::UserReach, Operator::Gte, 3),
        ]);
        let one = ScoreSet::from_pairs(&[(DimensionId::DataSensitivity, 3)]);
        let both = one.with_overrides(&[(DimensionId::UserReach, 3)]);
        assert!(!rule_matches(&rule, &one, None));
        assert!(rule_matches(&rule, &both, None));
    }

    #[test]
    fn subject_wire_form() {
        let risk: Result<ConditionSubject, _> = ConditionSubject::try_from("RISK_LEVEL".to_string());
        assert_eq!(risk.ok(), Some(ConditionSubject::RiskLevel));

        let dim = ConditionSubject::try_from("platformMix".to_string());
        assert_eq!(
            dim.ok(),
            Some(ConditionSubject::Dimension(DimensionId::PlatformMix))
        );

        assert!(ConditionSubject::try_from("risk_level".to_string()).is_err());
        assert_eq!(String::from(ConditionSubject::RiskLevel), "RISK_LEVEL");
    }

    #[test]
    fn condition_display() {
        let cond = Condition::dimension(DimensionId::DataSensitivity, Operator::Gte, 3);
        assert_eq!(cond.to_string(), "dataSensitivity >= 3");
    }
}
