//! # Rules Configuration
//!
//! [`RulesConfig`] is the only configuration the engine reads. It is always
//! passed in explicitly as a snapshot; the engine never looks at globals.
//!
//! [`ConfigHolder`] is the application-boundary "current config". Edits are
//! copy-on-write: a draft is cloned from the live snapshot, mutated, validated,
//! and only then committed. A rejected edit leaves the live snapshot and every
//! outstanding `Arc` handle untouched.

use crate::archetype::find_archetype;
use crate::condition::{Condition, ConditionSubject, Conditional};
use crate::rules::{
    ArchetypeTriggerRule, GovernanceRule, RiskRule, default_archetype_triggers,
    default_governance_rules, default_risk_rules,
};
use crate::{MAX_DIMENSION_SCORE, MAX_TOTAL_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Default lower bound of the MEDIUM tier.
pub const DEFAULT_MEDIUM_THRESHOLD: u32 = 12;

/// Default lower bound of the LARGE tier.
pub const DEFAULT_LARGE_THRESHOLD: u32 = 19;

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Inclusive lower bounds of the MEDIUM and LARGE tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizingThresholds {
    pub medium: u32,
    pub large: u32,
}

impl Default for SizingThresholds {
    fn default() -> Self {
        Self {
            medium: DEFAULT_MEDIUM_THRESHOLD,
            large: DEFAULT_LARGE_THRESHOLD,
        }
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Independently replaceable part of a [`RulesConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigSection {
    SizingThresholds,
    RiskRules,
    GovernanceRules,
    ArchetypeTriggers,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::SizingThresholds,
        ConfigSection::RiskRules,
        ConfigSection::GovernanceRules,
        ConfigSection::ArchetypeTriggers,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigSection::SizingThresholds => "sizing-thresholds",
            ConfigSection::RiskRules => "risk-rules",
            ConfigSection::GovernanceRules => "governance-rules",
            ConfigSection::ArchetypeTriggers => "archetype-triggers",
        }
    }
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigSection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownSection(s.to_string()))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// A configuration edit that would corrupt assessments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("MEDIUM threshold {medium} is above LARGE threshold {large}")]
    ThresholdOrder { medium: u32, large: u32 },

    #[error("{name} threshold {value} exceeds the maximum total score {max}")]
    ThresholdOutOfRange {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("{section}: rule #{index} has an empty id")]
    EmptyRuleId { section: ConfigSection, index: usize },

    #[error("{section}: duplicate rule id '{id}'")]
    DuplicateRuleId { section: ConfigSection, id: String },

    #[error("{section}: rule '{id}' has an empty {field}")]
    EmptyText {
        section: ConfigSection,
        id: String,
        field: &'static str,
    },

    #[error("{section}: rule '{id}' condition '{condition}' has a threshold outside 0..=3")]
    ConditionThreshold {
        section: ConfigSection,
        id: String,
        condition: String,
    },

    #[error("{section}: rule '{id}' tests RISK_LEVEL, which is not available in this section")]
    RiskLevelSubject { section: ConfigSection, id: String },

    #[error("archetype trigger '{id}' references unknown archetype '{archetype_id}'")]
    UnknownArchetype { id: String, archetype_id: String },

    #[error("unknown config section '{0}'")]
    UnknownSection(String),
}

// =============================================================================
// RULES CONFIG
// =============================================================================

/// Every rule list and threshold the engine depends on.
///
/// Missing sections in a loaded document fall back to the built-in defaults.
/// Unknown keys (including the retired `riskThresholds`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfig {
    pub sizing_thresholds: SizingThresholds,
    pub risk_rules: Vec<RiskRule>,
    pub governance_rules: Vec<GovernanceRule>,
    pub archetype_triggers: Vec<ArchetypeTriggerRule>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl RulesConfig {
    /// The built-in configuration.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            sizing_thresholds: SizingThresholds::default(),
            risk_rules: default_risk_rules(),
            governance_rules: default_governance_rules(),
            archetype_triggers: default_archetype_triggers(),
        }
    }

    /// Restore one section to its built-in default.
    pub fn reset_section(&mut self, section: ConfigSection) {
        match section {
            ConfigSection::SizingThresholds => self.sizing_thresholds = SizingThresholds::default(),
            ConfigSection::RiskRules => self.risk_rules = default_risk_rules(),
            ConfigSection::GovernanceRules => self.governance_rules = default_governance_rules(),
            ConfigSection::ArchetypeTriggers => {
                self.archetype_triggers = default_archetype_triggers();
            }
        }
    }

    /// Check every invariant the classifiers rely on.
    ///
    /// Stops at the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_thresholds(&self.sizing_thresholds)?;

        validate_rules(ConfigSection::RiskRules, &self.risk_rules, false)?;
        for rule in &self.risk_rules {
            require_text(ConfigSection::RiskRules, &rule.id, "reason", &rule.reason)?;
        }

        validate_rules(ConfigSection::GovernanceRules, &self.governance_rules, true)?;
        for rule in &self.governance_rules {
            require_text(ConfigSection::GovernanceRules, &rule.id, "title", &rule.title)?;
            require_text(ConfigSection::GovernanceRules, &rule.id, "category", &rule.category)?;
        }

        validate_rules(ConfigSection::ArchetypeTriggers, &self.archetype_triggers, false)?;
        for rule in &self.archetype_triggers {
            require_text(ConfigSection::ArchetypeTriggers, &rule.id, "reason", &rule.reason)?;
            if find_archetype(&rule.archetype_id).is_none() {
                return Err(ConfigError::UnknownArchetype {
                    id: rule.id.clone(),
                    archetype_id: rule.archetype_id.clone(),
                });
            }
        }

        Ok(())
    }
}

fn validate_thresholds(thresholds: &SizingThresholds) -> Result<(), ConfigError> {
    for (name, value) in [("MEDIUM", thresholds.medium), ("LARGE", thresholds.large)] {
        if value > MAX_TOTAL_SCORE {
            return Err(ConfigError::ThresholdOutOfRange {
                name,
                value,
                max: MAX_TOTAL_SCORE,
            });
        }
    }
    if thresholds.medium > thresholds.large {
        return Err(ConfigError::ThresholdOrder {
            medium: thresholds.medium,
            large: thresholds.large,
        });
    }
    Ok(())
}

fn validate_rules<R: Conditional>(
    section: ConfigSection,
    rules: &[R],
    allow_risk_level: bool,
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();

    for (index, rule) in rules.iter().enumerate() {
        let id = rule.id();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyRuleId { section, index });
        }
        if !seen.insert(id) {
            return Err(ConfigError::DuplicateRuleId {
                section,
                id: id.to_string(),
            });
        }
        for condition in rule.conditions() {
            validate_condition(section, id, condition, allow_risk_level)?;
        }
    }

    Ok(())
}

fn validate_condition(
    section: ConfigSection,
    id: &str,
    condition: &Condition,
    allow_risk_level: bool,
) -> Result<(), ConfigError> {
    if condition.subject == ConditionSubject::RiskLevel && !allow_risk_level {
        return Err(ConfigError::RiskLevelSubject {
            section,
            id: id.to_string(),
        });
    }
    if !(0..=MAX_DIMENSION_SCORE as i32).contains(&condition.threshold) {
        return Err(ConfigError::ConditionThreshold {
            section,
            id: id.to_string(),
            condition: condition.to_string(),
        });
    }
    Ok(())
}

fn require_text(
    section: ConfigSection,
    id: &str,
    field: &'static str,
    value: &str,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyText {
            section,
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}

// =============================================================================
// CONFIG HOLDER
// =============================================================================

/// The live, editable configuration with copy-on-write semantics.
///
/// `snapshot()` hands out cheap `Arc` clones; a snapshot never changes after
/// it is taken. Every successful commit bumps `revision`, which is what result
/// caches key on.
#[derive(Debug, Clone)]
pub struct ConfigHolder {
    current: Arc<RulesConfig>,
    revision: u64,
}

impl Default for ConfigHolder {
    fn default() -> Self {
        Self {
            current: Arc::new(RulesConfig::defaults()),
            revision: 0,
        }
    }
}

impl ConfigHolder {
    /// Holder seeded with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Holder seeded with a loaded configuration.
    pub fn from_config(config: RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current: Arc::new(config),
            revision: 0,
        })
    }

    /// Shared handle to the live snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RulesConfig> {
        Arc::clone(&self.current)
    }

    /// Borrow the live snapshot.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.current
    }

    /// Commit counter, starting at 0.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an edit to a private draft and commit it if it validates.
    pub fn edit<F>(&mut self, edit: F) -> Result<u64, ConfigError>
    where
        F: FnOnce(&mut RulesConfig),
    {
        let mut draft = Arc::clone(&self.current);
        edit(Arc::make_mut(&mut draft));

        if let Err(err) = draft.validate() {
            tracing::warn!(error = %err, revision = self.revision, "rejected config edit");
            return Err(err);
        }

        self.current = draft;
        self.revision = self.revision.saturating_add(1);
        tracing::debug!(revision = self.revision, "committed config edit");
        Ok(self.revision)
    }

    /// Replace the whole configuration.
    pub fn replace(&mut self, config: RulesConfig) -> Result<u64, ConfigError> {
        self.edit(|draft| *draft = config)
    }

    /// Replace the sizing thresholds.
    pub fn set_sizing_thresholds(&mut self, thresholds: SizingThresholds) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.sizing_thresholds = thresholds)
    }

    /// Replace the risk rule list.
    pub fn set_risk_rules(&mut self, rules: Vec<RiskRule>) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.risk_rules = rules)
    }

    /// Replace the governance rule list.
    pub fn set_governance_rules(&mut self, rules: Vec<GovernanceRule>) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.governance_rules = rules)
    }

    /// Replace the archetype trigger list.
    pub fn set_archetype_triggers(
        &mut self,
        rules: Vec<ArchetypeTriggerRule>,
    ) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.archetype_triggers = rules)
    }

    /// Restore one section to its built-in default.
    pub fn reset_section(&mut self, section: ConfigSection) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.reset_section(section))
    }

    /// Restore the whole configuration to its built-in defaults.
    pub fn reset(&mut self) -> u64 {
        self.current = Arc::new(RulesConfig::defaults());
        self.revision = self.revision.saturating_add(1);
        tracing::debug!(revision = self.revision, "reset config to defaults");
        self.revision
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Operator;
    use crate::dimension::DimensionId;
    use crate::risk::RiskLevel;
    use crate::rules::Necessity;

    #[test]
    fn defaults_validate() {
        assert_eq!(RulesConfig::defaults().validate(), Ok(()));
    }

    #[test]
    fn threshold_order_is_enforced() {
        let mut config = RulesConfig::defaults();
        config.sizing_thresholds = SizingThresholds {
            medium: 20,
            large: 15,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdOrder {
                medium: 20,
                large: 15
            })
        );
    }

    #[test]
    fn threshold_above_max_total_is_rejected() {
        let mut config = RulesConfig::defaults();
        config.sizing_thresholds.large = 25;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange { name: "LARGE", .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut config = RulesConfig::defaults();
        let first = config.risk_rules[0].clone();
        config.risk_rules.push(first);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateRuleId {
                section: ConfigSection::RiskRules,
                ..
            })
        ));
    }

    #[test]
    fn risk_level_subject_only_allowed_in_governance() {
        let mut config = RulesConfig::defaults();
        config.risk_rules.push(RiskRule {
            id: "circular".to_string(),
            conditions: vec![Condition::risk_level(Operator::Gte, 2)],
            level: RiskLevel::High,
            reason: "depends on itself".to_string(),
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RiskLevelSubject { .. })
        ));
    }

    #[test]
    fn out_of_scale_condition_threshold_is_rejected() {
        let mut config = RulesConfig::defaults();
        config.archetype_triggers[0].conditions =
            vec![Condition::dimension(DimensionId::UserReach, Operator::Gte, 4)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConditionThreshold { .. })
        ));
    }

    #[test]
    fn unknown_archetype_is_rejected() {
        let mut config = RulesConfig::defaults();
        config.archetype_triggers.push(ArchetypeTriggerRule {
            id: "ghost".to_string(),
            conditions: Vec::new(),
            archetype_id: "ghost-writer".to_string(),
            necessity: Necessity::Optional,
            reason: "why not".to_string(),
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownArchetype { .. })
        ));
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut config = RulesConfig::defaults();
        config.governance_rules[0].title = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyText { field: "title", .. })
        ));
    }

    #[test]
    fn section_names_parse() {
        for section in ConfigSection::ALL {
            assert_eq!(section.as_str().parse::<ConfigSection>(), Ok(section));
        }
        assert!("thresholds".parse::<ConfigSection>().is_err());
    }

    #[test]
    fn holder_rejects_invalid_edit_without_side_effects() {
        let mut holder = ConfigHolder::new();
        let before = holder.snapshot();

        let result = holder.set_sizing_thresholds(SizingThresholds {
            medium: 20,
            large: 10,
        });

        assert!(result.is_err());
        assert_eq!(holder.revision(), 0);
        assert_eq!(*holder.snapshot(), *before);
    }

    #[test]
    fn holder_edit_is_copy_on_write() {
        let mut holder = ConfigHolder::new();
        let before = holder.snapshot();

        let revision = holder.set_sizing_thresholds(SizingThresholds {
            medium: 10,
            large: 20,
        });

        assert_eq!(revision, Ok(1));
        assert_eq!(before.sizing_thresholds, SizingThresholds::default());
        assert_eq!(holder.config().sizing_thresholds.medium, 10);
    }

    #[test]
    fn holder_reset_section_restores_defaults() {
        let mut holder = ConfigHolder::new();
        holder.set_risk_rules(Vec::new()).ok();
        holder.set_governance_rules(Vec::new()).ok();
        assert!(holder.config().risk_rules.is_empty());

        holder.reset_section(ConfigSection::RiskRules).ok();
        assert_eq!(holder.config().risk_rules, default_risk_rules());
        assert!(holder.config().governance_rules.is_empty());

        let revision = holder.reset();
        assert_eq!(revision, 4);
        assert_eq!(*holder.config(), RulesConfig::defaults());
    }
}
