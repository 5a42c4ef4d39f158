//! # Engine
//!
//! Glue that runs every classifier against one score set and one config
//! snapshot, in a fixed order:
//!
//! 1. risk (two-phase, needed by governance)
//! 2. governance pack
//! 3. archetype recommendations
//! 4. architecture tiers
//! 5. sizing result
//!
//! [`assess`] and [`simulate`] are pure. [`Assessor`] is the stateful
//! application-boundary wrapper that owns the live config and memoizes
//! reports.

use crate::archetype::recommend_archetypes;
use crate::architecture::map_architecture_tiers;
use crate::cache::{AssessmentCache, AssessmentKey, CacheStats, assessment_cache};
use crate::config::{ConfigError, ConfigHolder, ConfigSection, RulesConfig, SizingThresholds};
use crate::dimension::{DimensionId, ScoreSet};
use crate::governance::{GovernancePack, build_governance_pack};
use crate::risk::{RiskLevel, RiskProfile, classify_risk};
use crate::rules::{ArchetypeTriggerRule, GovernanceRule, RiskRule};
use crate::sizing::{SizeTier, SizingResult, build_sizing_result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// REPORT
// =============================================================================

/// Everything derived from one `(scores, config)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub scores: ScoreSet,
    pub sizing: SizingResult,
    pub governance: GovernancePack,
}

impl AssessmentReport {
    #[must_use]
    pub fn risk(&self) -> &RiskProfile {
        &self.governance.risk_profile
    }

    #[must_use]
    pub fn tier(&self) -> SizeTier {
        self.sizing.tier
    }

    /// Archetype ids in recommendation order.
    pub fn archetype_ids(&self) -> impl Iterator<Item = &str> {
        self.sizing
            .agent_recommendations
            .iter()
            .map(|r| r.archetype_id.as_str())
    }
}

/// Run the full classification pipeline.
#[must_use]
pub fn assess(scores: &ScoreSet, config: &RulesConfig) -> AssessmentReport {
    let risk = classify_risk(scores, &config.risk_rules);
    let governance = build_governance_pack(scores, &config.governance_rules, risk);
    let agents = recommend_archetypes(scores, &config.archetype_triggers);
    let tiers = map_architecture_tiers(scores);
    let sizing = build_sizing_result(scores, &config.sizing_thresholds, agents, tiers);

    tracing::debug!(
        total = sizing.total_score,
        tier = %sizing.tier,
        risk = %governance.risk_profile.level,
        impact = %governance.impact_level,
        agents = sizing.agent_recommendations.len(),
        requirements = governance.requirements.len(),
        "assessment complete"
    );

    AssessmentReport {
        scores: scores.clone(),
        sizing,
        governance,
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

/// What changed between a baseline and a what-if scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDelta {
    /// Scenario total minus baseline total.
    pub score_delta: i64,
    pub tier_before: SizeTier,
    pub tier_after: SizeTier,
    pub risk_before: RiskLevel,
    pub risk_after: RiskLevel,
    pub archetypes_added: Vec<String>,
    pub archetypes_removed: Vec<String>,
    /// Dimensions whose score differs, in catalog order.
    pub changed_dimensions: Vec<DimensionId>,
}

impl SimulationDelta {
    fn between(baseline: &AssessmentReport, scenario: &AssessmentReport) -> Self {
        let before: BTreeSet<&str> = baseline.archetype_ids().collect();
        let after: BTreeSet<&str> = scenario.archetype_ids().collect();

        // Keep recommendation order rather than id order.
        let archetypes_added = scenario
            .archetype_ids()
            .filter(|id| !before.contains(id))
            .map(str::to_string)
            .collect();
        let archetypes_removed = baseline
            .archetype_ids()
            .filter(|id| !after.contains(id))
            .map(str::to_string)
            .collect();

        let changed_dimensions = DimensionId::ALL
            .into_iter()
            .filter(|&id| baseline.scores.get(id) != scenario.scores.get(id))
            .collect();

        Self {
            score_delta: i64::from(scenario.sizing.total_score)
                - i64::from(baseline.sizing.total_score),
            tier_before: baseline.sizing.tier,
            tier_after: scenario.sizing.tier,
            risk_before: baseline.risk().level,
            risk_after: scenario.risk().level,
            archetypes_added,
            archetypes_removed,
            changed_dimensions,
        }
    }

    #[must_use]
    pub fn tier_changed(&self) -> bool {
        self.tier_before != self.tier_after
    }

    #[must_use]
    pub fn risk_changed(&self) -> bool {
        self.risk_before != self.risk_after
    }

    /// True when nothing observable moved.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.score_delta == 0
            && !self.tier_changed()
            && !self.risk_changed()
            && self.archetypes_added.is_empty()
            && self.archetypes_removed.is_empty()
    }
}

/// Baseline and scenario reports side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub baseline: AssessmentReport,
    pub scenario: AssessmentReport,
    pub delta: SimulationDelta,
}

/// Evaluate a what-if copy of `baseline` with `overrides` applied.
///
/// The baseline score set is never touched. Overrides outside `1..=3` are
/// ignored.
#[must_use]
pub fn simulate(
    baseline: &ScoreSet,
    overrides: &[(DimensionId, u8)],
    config: &RulesConfig,
) -> Simulation {
    let scenario_scores = baseline.with_overrides(overrides);
    let baseline = assess(baseline, config);
    let scenario = assess(&scenario_scores, config);
    let delta = SimulationDelta::between(&baseline, &scenario);

    tracing::debug!(
        score_delta = delta.score_delta,
        tier_changed = delta.tier_changed(),
        risk_changed = delta.risk_changed(),
        "simulation complete"
    );

    Simulation {
        baseline,
        scenario,
        delta,
    }
}

// =============================================================================
// ASSESSOR
// =============================================================================

/// Live config plus a memo of reports computed under it.
#[derive(Debug, Clone)]
pub struct Assessor {
    holder: ConfigHolder,
    cache: AssessmentCache,
}

impl Default for Assessor {
    fn default() -> Self {
        Self::new(ConfigHolder::new())
    }
}

impl Assessor {
    #[must_use]
    pub fn new(holder: ConfigHolder) -> Self {
        Self {
            holder,
            cache: assessment_cache(),
        }
    }

    /// Assessor over a loaded configuration.
    pub fn from_config(config: RulesConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(ConfigHolder::from_config(config)?))
    }

    #[must_use]
    pub fn holder(&self) -> &ConfigHolder {
        &self.holder
    }

    /// Apply a validated edit to the live config.
    ///
    /// Memoized reports are dropped on every successful commit; a rejected
    /// edit leaves both the config and the cache untouched.
    pub fn edit<F>(&mut self, edit: F) -> Result<u64, ConfigError>
    where
        F: FnOnce(&mut RulesConfig),
    {
        let revision = self.holder.edit(edit)?;
        self.invalidate(revision);
        Ok(revision)
    }

    pub fn replace(&mut self, config: RulesConfig) -> Result<u64, ConfigError> {
        let revision = self.holder.replace(config)?;
        self.invalidate(revision);
        Ok(revision)
    }

    pub fn set_sizing_thresholds(&mut self, thresholds: SizingThresholds) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.sizing_thresholds = thresholds)
    }

    pub fn set_risk_rules(&mut self, rules: Vec<RiskRule>) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.risk_rules = rules)
    }

    pub fn set_governance_rules(&mut self, rules: Vec<GovernanceRule>) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.governance_rules = rules)
    }

    pub fn set_archetype_triggers(
        &mut self,
        rules: Vec<ArchetypeTriggerRule>,
    ) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.archetype_triggers = rules)
    }

    pub fn reset_section(&mut self, section: ConfigSection) -> Result<u64, ConfigError> {
        self.edit(|draft| draft.reset_section(section))
    }

    pub fn reset(&mut self) -> u64 {
        let revision = self.holder.reset();
        self.invalidate(revision);
        revision
    }

    fn invalidate(&mut self, revision: u64) {
        tracing::debug!(revision, dropped = self.cache.len(), "config changed, clearing report cache");
        self.cache.clear();
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Assess under the live config, reusing a memoized report if present.
    pub fn assess(&mut self, scores: &ScoreSet) -> AssessmentReport {
        let key = AssessmentKey {
            revision: self.holder.revision(),
            scores: scores.clone(),
        };
        let config = self.holder.snapshot();
        self.cache
            .get_or_insert_with(key, || assess(scores, &config))
            .clone()
    }

    /// Simulate under the live config.
    pub fn simulate(&mut self, baseline: &ScoreSet, overrides: &[(DimensionId, u8)]) -> Simulation {
        let scenario_scores = baseline.with_overrides(overrides);
        let baseline = self.assess(baseline);
        let scenario = self.assess(&scenario_scores);
        let delta = SimulationDelta::between(&baseline, &scenario);
        Simulation {
            baseline,
            scenario,
            delta,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::governance::ImpactLevel;
    use crate::rules::Necessity;

    fn regulated_workflow() -> ScoreSet {
        ScoreSet::from_pairs(&[
            (DimensionId::WorkflowComplexity, 3),
            (DimensionId::DataSensitivity, 3),
            (DimensionId::SystemsToIntegrate, 1),
            (DimensionId::UserReach, 1),
            (DimensionId::BusinessScope, 1),
            (DimensionId::AgentCountAndTypes, 1),
            (DimensionId::PlatformMix, 1),
            (DimensionId::ChangeAndAdoption, 1),
        ])
    }

    #[test]
    fn regulated_workflow_is_medium_and_high_risk() {
        let report = assess(&regulated_workflow(), &RulesConfig::defaults());

        assert_eq!(report.sizing.total_score, 12);
        assert_eq!(report.tier(), SizeTier::Medium);
        assert_eq!(report.risk().level, RiskLevel::High);
        assert_eq!(report.risk().reasons.len(), 2);
        assert_eq!(report.governance.impact_level, ImpactLevel::High);
    }

    #[test]
    fn all_twos_is_medium_and_medium_risk() {
        let report = assess(&ScoreSet::uniform(2), &RulesConfig::defaults());

        assert_eq!(report.sizing.total_score, 16);
        assert_eq!(report.tier(), SizeTier::Medium);
        assert_eq!(report.risk().level, RiskLevel::Medium);
        assert_eq!(report.risk().reasons.len(), 1);
    }

    #[test]
    fn assess_is_idempotent() {
        let config = RulesConfig::defaults();
        let scores = regulated_workflow();
        assert_eq!(assess(&scores, &config), assess(&scores, &config));
    }

    #[test]
    fn empty_scores_still_produce_a_report() {
        let report = assess(&ScoreSet::new(), &RulesConfig::defaults());
        assert_eq!(report.sizing.total_score, 0);
        assert_eq!(report.tier(), SizeTier::Small);
        assert_eq!(report.risk().level, RiskLevel::Low);
        // Unconditional rules still fire.
        assert_eq!(
            report.archetype_ids().collect::<Vec<_>>(),
            vec!["domain-specialist"]
        );
        assert_eq!(
            report.sizing.agent_recommendations[0].necessity,
            Necessity::DefinitelyNeeded
        );
    }

    #[test]
    fn simulate_leaves_baseline_untouched() {
        let baseline = ScoreSet::uniform(1);
        let before = baseline.clone();
        let sim = simulate(
            &baseline,
            &[(DimensionId::DataSensitivity, 3)],
            &RulesConfig::defaults(),
        );

        assert_eq!(baseline, before);
        assert_eq!(sim.baseline.scores, before);
        assert_eq!(sim.scenario.scores.get(DimensionId::DataSensitivity), 3);
        assert_eq!(sim.delta.score_delta, 2);
        assert_eq!(sim.delta.risk_before, RiskLevel::Low);
        assert_eq!(sim.delta.risk_after, RiskLevel::High);
        assert_eq!(sim.delta.changed_dimensions, vec![DimensionId::DataSensitivity]);
        assert!(sim.delta.archetypes_added.contains(&"compliance-guardian".to_string()));
        assert!(sim.delta.archetypes_removed.is_empty());
    }

    #[test]
    fn simulate_can_report_removed_archetypes() {
        let baseline = ScoreSet::uniform(3);
        let sim = simulate(
            &baseline,
            &[
                (DimensionId::DataSensitivity, 1),
                (DimensionId::WorkflowComplexity, 1),
            ],
            &RulesConfig::defaults(),
        );

        assert!(sim.delta.score_delta < 0);
        assert!(!sim.delta.archetypes_removed.is_empty());
    }

    #[test]
    fn simulate_without_overrides_is_unchanged() {
        let sim = simulate(&ScoreSet::uniform(2), &[], &RulesConfig::defaults());
        assert!(sim.delta.is_unchanged());
        assert_eq!(sim.baseline, sim.scenario);
    }

    #[test]
    fn assessor_memoizes_per_revision() {
        let mut assessor = Assessor::default();
        let scores = ScoreSet::uniform(2);

        let first = assessor.assess(&scores);
        let second = assessor.assess(&scores);
        assert_eq!(first, second);
        assert_eq!(assessor.cache_stats().hits, 1);
        assert_eq!(assessor.cache_stats().misses, 1);

        assessor
            .set_sizing_thresholds(SizingThresholds {
                medium: 17,
                large: 20,
            })
            .unwrap();
        assert_eq!(assessor.cache_stats().size, 0);

        let third = assessor.assess(&scores);
        assert_eq!(third.tier(), SizeTier::Small);
        assert_eq!(assessor.cache_stats().misses, 2);
    }

    #[test]
    fn replaced_config_never_serves_old_reports() {
        let custom = RulesConfig {
            sizing_thresholds: SizingThresholds { medium: 2, large: 3 },
            ..RulesConfig::defaults()
        };
        let mut assessor = Assessor::from_config(custom).unwrap();
        let scores = ScoreSet::uniform(1);
        assert_eq!(assessor.assess(&scores).tier(), SizeTier::Large);

        assessor.replace(RulesConfig::defaults()).unwrap();
        let after = assessor.assess(&scores);
        assert_eq!(after, assess(&scores, &RulesConfig::defaults()));
        assert_eq!(after.tier(), SizeTier::Small);
    }

    #[test]
    fn reset_drops_memoized_reports() {
        let mut assessor = Assessor::default();
        let scores = ScoreSet::uniform(2);
        assessor
            .set_sizing_thresholds(SizingThresholds {
                medium: 20,
                large: 22,
            })
            .unwrap();
        assert_eq!(assessor.assess(&scores).tier(), SizeTier::Small);

        assessor.reset();
        assert_eq!(assessor.assess(&scores).tier(), SizeTier::Medium);
        assessor
            .reset_section(ConfigSection::SizingThresholds)
            .unwrap();
        assert_eq!(assessor.assess(&scores).tier(), SizeTier::Medium);
    }

    #[test]
    fn rejected_edit_keeps_cache() {
        let mut assessor = Assessor::default();
        let scores = ScoreSet::uniform(2);
        assessor.assess(&scores);

        let rejected = assessor.set_sizing_thresholds(SizingThresholds {
            medium: 20,
            large: 10,
        });
        assert!(rejected.is_err());
        assert_eq!(assessor.holder().revision(), 0);

        assessor.assess(&scores);
        assert_eq!(assessor.cache_stats().hits, 1);
    }

    #[test]
    fn assessor_matches_pure_engine() {
        let mut assessor = Assessor::default();
        let scores = regulated_workflow();
        let overrides = [(DimensionId::UserReach, 3)];

        let pure = simulate(&scores, &overrides, &RulesConfig::defaults());
        assert_eq!(assessor.simulate(&scores, &overrides), pure);
    }
}
