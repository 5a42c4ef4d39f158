//! # Dimension Catalog
//!
//! The eight scorable assessment dimensions and the [`ScoreSet`] that holds
//! one assessment's answers.
//!
//! The catalog is static data. A [`ScoreSet`] only ever contains scores in
//! `1..=3`; anything else is dropped on the way in, and a dimension that is
//! absent reads as `0` everywhere.

use crate::error::{AgentSizeError, Result};
use crate::MAX_DIMENSION_SCORE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// DIMENSION IDS
// =============================================================================

/// Identifier of one assessment dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionId {
    WorkflowComplexity,
    DataSensitivity,
    SystemsToIntegrate,
    UserReach,
    BusinessScope,
    AgentCountAndTypes,
    PlatformMix,
    ChangeAndAdoption,
}

impl DimensionId {
    /// Every dimension, in catalog order.
    pub const ALL: [DimensionId; 8] = [
        DimensionId::WorkflowComplexity,
        DimensionId::DataSensitivity,
        DimensionId::SystemsToIntegrate,
        DimensionId::UserReach,
        DimensionId::BusinessScope,
        DimensionId::AgentCountAndTypes,
        DimensionId::PlatformMix,
        DimensionId::ChangeAndAdoption,
    ];

    /// Wire identifier (camelCase).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DimensionId::WorkflowComplexity => "workflowComplexity",
            DimensionId::DataSensitivity => "dataSensitivity",
            DimensionId::SystemsToIntegrate => "systemsToIntegrate",
            DimensionId::UserReach => "userReach",
            DimensionId::BusinessScope => "businessScope",
            DimensionId::AgentCountAndTypes => "agentCountAndTypes",
            DimensionId::PlatformMix => "platformMix",
            DimensionId::ChangeAndAdoption => "changeAndAdoption",
        }
    }

    /// Catalog entry for this dimension.
    #[must_use]
    pub fn dimension(self) -> &'static Dimension {
        // ALL and DIMENSIONS share the same order.
        &DIMENSIONS[self as usize]
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimensionId {
    type Err = AgentSizeError;

    fn from_str(s: &str) -> Result<Self> {
        DimensionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AgentSizeError::UnknownDimension(s.to_string()))
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// One graded answer for a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionOption {
    pub score: u8,
    pub title: &'static str,
    pub description: &'static str,
}

/// A scorable assessment axis with its three graded options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub label: &'static str,
    pub description: &'static str,
    pub options: [DimensionOption; 3],
}

impl Dimension {
    /// Option for a given score, if the score is in `1..=3`.
    #[must_use]
    pub fn option(&self, score: u8) -> Option<&DimensionOption> {
        self.options.iter().find(|o| o.score == score)
    }
}

const fn opt(score: u8, title: &'static str, description: &'static str) -> DimensionOption {
    DimensionOption {
        score,
        title,
        description,
    }
}

/// The dimension catalog, in the same order as [`DimensionId::ALL`].
pub static DIMENSIONS: [Dimension; 8] = [
    Dimension {
        id: DimensionId::WorkflowComplexity,
        label: "Workflow Complexity",
        description: "How many steps, branches and decisions the target workflow involves.",
        options: [
            opt(1, "Linear", "A short, predictable sequence of steps with no branching."),
            opt(2, "Branching", "Several paths and decision points, mostly rule-based."),
            opt(3, "Adaptive", "Open-ended, multi-stage work that requires planning and judgment."),
        ],
    },
    Dimension {
        id: DimensionId::DataSensitivity,
        label: "Data Sensitivity",
        description: "The classification of the data the agents read or produce.",
        options: [
            opt(1, "Public", "Public or internal data with no confidentiality requirement."),
            opt(2, "Confidential", "Business-confidential or personal data with access controls."),
            opt(3, "Regulated", "Regulated, financial, health or otherwise highly sensitive data."),
        ],
    },
    Dimension {
        id: DimensionId::SystemsToIntegrate,
        label: "Systems to Integrate",
        description: "How many systems of record the agents must read from or write to.",
        options: [
            opt(1, "Standalone", "One system or none; the agent works from its own context."),
            opt(2, "A few", "Two to four systems with documented APIs."),
            opt(3, "Many", "Five or more systems, including legacy or undocumented interfaces."),
        ],
    },
    Dimension {
        id: DimensionId::UserReach,
        label: "User Reach",
        description: "Who interacts with the solution and how many of them.",
        options: [
            opt(1, "Team", "A single team of internal users."),
            opt(2, "Organization", "Several departments or the whole organization."),
            opt(3, "Public", "Customers, partners or the general public."),
        ],
    },
    Dimension {
        id: DimensionId::BusinessScope,
        label: "Business Scope",
        description: "How much of the business the solution spans.",
        options: [
            opt(1, "Single task", "Automates one task inside a single function."),
            opt(2, "Function", "Covers a whole business function or process."),
            opt(3, "Value stream", "Spans several functions end to end."),
        ],
    },
    Dimension {
        id: DimensionId::AgentCountAndTypes,
        label: "Agent Count & Types",
        description: "How many distinct agents and specializations the solution needs.",
        options: [
            opt(1, "Single agent", "One general-purpose agent with tools."),
            opt(2, "A handful", "Two to five agents with distinct specializations."),
            opt(3, "A fleet", "Many agents across several specializations and layers."),
        ],
    },
    Dimension {
        id: DimensionId::PlatformMix,
        label: "Platform Mix",
        description: "How many model providers, runtimes and hosting platforms are involved.",
        options: [
            opt(1, "Single platform", "One model provider on one runtime."),
            opt(2, "Mixed", "Two platforms or providers that must interoperate."),
            opt(3, "Heterogeneous", "Multiple providers, runtimes and hosting environments."),
        ],
    },
    Dimension {
        id: DimensionId::ChangeAndAdoption,
        label: "Change & Adoption",
        description: "How much the solution changes the way people work.",
        options: [
            opt(1, "Minor", "Fits into existing habits with little training."),
            opt(2, "Moderate", "New steps and some retraining for affected roles."),
            opt(3, "Transformational", "Redesigns roles and responsibilities across teams."),
        ],
    },
];

// =============================================================================
// SCORE SET
// =============================================================================

/// One assessment's answers: dimension → score in `1..=3`.
///
/// Deserialization is lenient: unknown dimension ids and out-of-range values
/// are dropped rather than rejected. Cloning gives a fully detached copy,
/// which is what simulation runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct ScoreSet {
    scores: BTreeMap<DimensionId, u8>,
}

impl ScoreSet {
    /// Create an empty score set. Every dimension reads as `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Score every dimension with the same value.
    ///
    /// Out-of-range values produce an empty set.
    #[must_use]
    pub fn uniform(score: u8) -> Self {
        let mut set = Self::new();
        for id in DimensionId::ALL {
            if let Err(err) = set.set(id, score) {
                tracing::debug!(dimension = %id, score, error = %err, "ignoring invalid score");
            }
        }
        set
    }

    /// Build from pairs, dropping out-of-range scores.
    #[must_use]
    pub fn from_pairs(pairs: &[(DimensionId, u8)]) -> Self {
        let mut set = Self::new();
        for &(id, score) in pairs {
            if let Err(err) = set.set(id, score) {
                tracing::debug!(dimension = %id, score, error = %err, "ignoring invalid score");
            }
        }
        set
    }

    /// Score for a dimension, `0` if absent.
    #[must_use]
    pub fn get(&self, id: DimensionId) -> u8 {
        self.scores.get(&id).copied().unwrap_or(0)
    }

    /// Set a dimension's score.
    ///
    /// Only `1..=3` is accepted; the set is left unchanged otherwise.
    pub fn set(&mut self, id: DimensionId, score: u8) -> Result<()> {
        if !(1..=MAX_DIMENSION_SCORE).contains(&score) {
            return Err(AgentSizeError::InvalidScore {
                dimension: id,
                score: score as i64,
            });
        }
        self.scores.insert(id, score);
        Ok(())
    }

    /// Remove a dimension's score, returning it if present.
    pub fn remove(&mut self, id: DimensionId) -> Option<u8> {
        self.scores.remove(&id)
    }

    /// Whether the dimension has been answered.
    #[must_use]
    pub fn is_scored(&self, id: DimensionId) -> bool {
        self.scores.contains_key(&id)
    }

    /// Number of answered dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when nothing has been answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Answered dimensions in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (DimensionId, u8)> + '_ {
        self.scores.iter().map(|(id, score)| (*id, *score))
    }

    /// Dimensions in the catalog that have not been answered.
    pub fn unscored(&self) -> impl Iterator<Item = DimensionId> + '_ {
        DimensionId::ALL.into_iter().filter(|id| !self.is_scored(*id))
    }

    /// Sum of the scores over the catalog.
    #[must_use]
    pub fn total(&self) -> u32 {
        DimensionId::ALL
            .into_iter()
            .map(|id| self.get(id) as u32)
            .sum()
    }

    /// Detached copy with the given overrides applied.
    ///
    /// Invalid override scores are ignored; the receiver is never touched.
    #[must_use]
    pub fn with_overrides(&self, overrides: &[(DimensionId, u8)]) -> Self {
        let mut copy = self.clone();
        for &(id, score) in overrides {
            if copy.set(id, score).is_err() {
                tracing::debug!(dimension = %id, score, "ignoring out-of-range override");
            }
        }
        copy
    }
}

impl From<BTreeMap<String, i64>> for ScoreSet {
    fn from(raw: BTreeMap<String, i64>) -> Self {
        let mut set = Self::new();
        for (key, value) in raw {
            let Ok(id) = key.parse::<DimensionId>() else {
                tracing::debug!(dimension = %key, "dropping unknown dimension");
                continue;
            };
            let accepted = u8::try_from(value)
                .ok()
                .is_some_and(|score| set.set(id, score).is_ok());
            if !accepted {
                tracing::debug!(dimension = %id, value, "dropping out-of-range score");
            }
        }
        set
    }
}

impl From<ScoreSet> for BTreeMap<String, i64> {
    fn from(set: ScoreSet) -> Self {
        set.scores
            .into_iter()
            .map(|(id, score)| (id.as_str().to_string(), i64::from(score)))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
