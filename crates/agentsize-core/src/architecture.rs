//! # Architecture Tier Mapper
//!
//! Maps individual dimension scores to capacity tiers for each layer of the
//! agent architecture. Each layer reads exactly one dimension; there is no
//! cross-dimension interaction.
//!
//! | Layer        | Dimension            |
//! |--------------|----------------------|
//! | experience   | userReach            |
//! | value stream | businessScope        |
//! | function     | agentCountAndTypes   |
//! | process      | workflowComplexity   |
//! | task         | systemsToIntegrate   |
//! | control      | dataSensitivity      |
//! | platform     | platformMix          |

use crate::dimension::{DimensionId, ScoreSet};
use serde::{Deserialize, Serialize};

/// Descriptor used when a dimension was not scored.
pub const NOT_ASSESSED: &str = "Not assessed";

/// Capacity tier for one architecture layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTier {
    /// Dimension the tier was read from.
    pub source: DimensionId,
    /// Raw score, `0` when unscored.
    pub score: u8,
    pub description: String,
}

/// Capacity tiers for every agent layer plus the platform tooling tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureTierSpec {
    pub experience_agents: LayerTier,
    pub value_stream_agents: LayerTier,
    pub function_agents: LayerTier,
    pub process_agents: LayerTier,
    pub task_agents: LayerTier,
    pub control_agents: LayerTier,
    pub platform_tooling: LayerTier,
}

fn layer(scores: &ScoreSet, source: DimensionId, tiers: [&str; 3]) -> LayerTier {
    let score = scores.get(source);
    let description = match score {
        1 => tiers[0],
        2 => tiers[1],
        3 => tiers[2],
        _ => NOT_ASSESSED,
    };
    LayerTier {
        source,
        score,
        description: description.to_string(),
    }
}

/// Map scores to architecture capacity tiers.
#[must_use]
pub fn map_architecture_tiers(scores: &ScoreSet) -> ArchitectureTierSpec {
    ArchitectureTierSpec {
        experience_agents: layer(
            scores,
            DimensionId::UserReach,
            [
                "0 dedicated experience agents; users work through existing tools",
                "1 experience agent shared across internal channels",
                "2-3 experience agents, one per audience or channel",
            ],
        ),
        value_stream_agents: layer(
            scores,
            DimensionId::BusinessScope,
            [
                "0 value-stream agents",
                "0-1 value-stream agent tracking the end-to-end process",
                "1-2 value-stream agents coordinating across functions",
            ],
        ),
        function_agents: layer(
            scores,
            DimensionId::AgentCountAndTypes,
            [
                "1 function agent",
                "2-5 function agents with distinct specializations",
                "6+ function agents grouped by domain",
            ],
        ),
        process_agents: layer(
            scores,
            DimensionId::WorkflowComplexity,
            [
                "0 process agents; a fixed sequence in code",
                "1 process agent managing branches and hand-offs",
                "2+ process agents with dynamic planning",
            ],
        ),
        task_agents: layer(
            scores,
            DimensionId::SystemsToIntegrate,
            [
                "1-2 task agents calling local tools",
                "3-5 task agents wrapping system APIs",
                "6+ task agents, one per integrated system family",
            ],
        ),
        control_agents: layer(
            scores,
            DimensionId::DataSensitivity,
            [
                "0 control agents; standard logging",
                "1 control agent enforcing data policies",
                "2+ control agents for policy enforcement and audit",
            ],
        ),
        platform_tooling: layer(
            scores,
            DimensionId::PlatformMix,
            [
                "Single-vendor agent framework",
                "Shared tool registry and gateway across two platforms",
                "Integration platform with protocol adapters, central registry and tracing",
            ],
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================
