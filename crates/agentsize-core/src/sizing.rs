//! # Sizing Classifier
//!
//! Sums the dimension scores and buckets the total into SMALL, MEDIUM or
//! LARGE. Both thresholds are inclusive lower bounds of their tier.

use crate::archetype::AgentRecommendation;
use crate::architecture::ArchitectureTierSpec;
use crate::config::SizingThresholds;
use crate::dimension::{DimensionId, ScoreSet};
use crate::MAX_DIMENSION_SCORE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// T-shirt size of the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeTier::Small => f.write_str("SMALL"),
            SizeTier::Medium => f.write_str("MEDIUM"),
            SizeTier::Large => f.write_str("LARGE"),
        }
    }
}

/// Total score and tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeClassification {
    pub total_score: u32,
    pub tier: SizeTier,
}

/// Tier for a total, given the two thresholds.
#[must_use]
pub fn tier_for_total(total: u32, thresholds: &SizingThresholds) -> SizeTier {
    if total >= thresholds.large {
        SizeTier::Large
    } else if total >= thresholds.medium {
        SizeTier::Medium
    } else {
        SizeTier::Small
    }
}

/// Sum the catalog scores (missing = 0) and bucket the total.
#[must_use]
pub fn classify_size(scores: &ScoreSet, thresholds: &SizingThresholds) -> SizeClassification {
    let total_score = scores.total();
    SizeClassification {
        total_score,
        tier: tier_for_total(total_score, thresholds),
    }
}

// =============================================================================
// SIZING RESULT
// =============================================================================

/// Full sizing output. Rebuilt from scratch on every assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingResult {
    pub total_score: u32,
    pub tier: SizeTier,
    pub notes: Vec<String>,
    pub recommended_patterns: Vec<String>,
    pub agent_recommendations: Vec<AgentRecommendation>,
    pub architecture_tiers: ArchitectureTierSpec,
    pub test_cases_placeholder: String,
}

fn tier_note(tier: SizeTier) -> &'static str {
    match tier {
        SizeTier::Small => {
            "A single agent with a focused toolset should cover this use case; start with a narrow pilot."
        }
        SizeTier::Medium => {
            "Plan for a small team of cooperating agents under one coordinator, delivered in phases."
        }
        SizeTier::Large => {
            "Treat this as a multi-agent program with layered coordination, shared platform services and staged rollout."
        }
    }
}

/// Architecture patterns suited to a tier.
#[must_use]
pub fn recommended_patterns(tier: SizeTier) -> Vec<String> {
    let patterns: &[&str] = match tier {
        SizeTier::Small => &["Single agent with tools", "Prompt chaining"],
        SizeTier::Medium => &[
            "Orchestrator-worker",
            "Routing to specialists",
            "Evaluator-optimizer loop",
        ],
        SizeTier::Large => &[
            "Hierarchical multi-agent",
            "Event-driven agent mesh",
            "Shared memory and tool registry",
            "Guardrail and audit layer",
        ],
    };
    patterns.iter().map(|p| (*p).to_string()).collect()
}

/// Evaluation planning text for a tier.
#[must_use]
pub fn test_cases_placeholder(tier: SizeTier) -> String {
    match tier {
        SizeTier::Small => "Draft 10-20 evaluation scenarios covering the main task and its most common failure.",
        SizeTier::Medium => {
            "Draft 30-50 evaluation scenarios covering each specialist, every hand-off and the escalation path."
        }
        SizeTier::Large => {
            "Draft 100+ evaluation scenarios per agent layer, including adversarial, cross-system and regression suites."
        }
    }
    .to_string()
}

fn sizing_notes(scores: &ScoreSet, tier: SizeTier) -> Vec<String> {
    let mut notes = vec![tier_note(tier).to_string()];

    for id in DimensionId::ALL {
        if scores.get(id) == MAX_DIMENSION_SCORE {
            let dim = id.dimension();
            notes.push(format!(
                "{} is at its highest level ({}); budget dedicated capacity for it.",
                dim.label,
                dim.option(MAX_DIMENSION_SCORE).map(|o| o.title).unwrap_or("3")
            ));
        }
    }

    let unscored: Vec<&str> = scores.unscored().map(|id| id.dimension().label).collect();
    if !unscored.is_empty() {
        notes.push(format!(
            "Not yet scored, counted as 0: {}.",
            unscored.join(", ")
        ));
    }

    notes
}

/// Assemble the full sizing result from the component outputs.
#[must_use]
pub fn build_sizing_result(
    scores: &ScoreSet,
    thresholds: &SizingThresholds,
    agent_recommendations: Vec<AgentRecommendation>,
    architecture_tiers: ArchitectureTierSpec,
) -> SizingResult {
    let SizeClassification { total_score, tier } = classify_size(scores, thresholds);

    SizingResult {
        total_score,
        tier,
        notes: sizing_notes(scores, tier),
        recommended_patterns: recommended_patterns(tier),
        agent_recommendations,
        architecture_tiers,
        test_cases_placeholder: test_cases_placeholder(tier),
    }
}

// =============================================================================
// TESTS
// =============================================================================
