//! # agentsize-core
//!
//! The deterministic Rule Evaluation & Classification Engine.
//!
//! Converts a [`ScoreSet`] (answers to the eight assessment dimensions) and a
//! [`RulesConfig`] snapshot into a single [`AssessmentReport`]:
//!
//! ```text
//! Dimension Catalog + ScoreSet
//!        │
//!        ├──► Sizing Classifier ─────────┐
//!        ├──► Risk Classifier ──┐        │
//!        │                      ▼        │
//!        ├──► Governance Selector ───────┤
//!        ├──► Archetype Recommender ─────┤
//!        └──► Architecture Tier Mapper ──┴──► AssessmentReport
//! ```
//!
//! ## Design Principles
//!
//! - Every classifier is a pure function of its inputs. No globals, no I/O.
//! - `BTreeMap` only, integer arithmetic only.
//! - Missing or unknown dimensions read as score `0`; classification never fails.
//! - The only failure class is invalid configuration, rejected at edit time
//!   by [`RulesConfig::validate`].

pub mod archetype;
pub mod architecture;
pub mod cache;
pub mod condition;
pub mod config;
pub mod dimension;
pub mod engine;
pub mod error;
pub mod formats;
pub mod governance;
pub mod risk;
pub mod rules;
pub mod sizing;
pub mod storage;

pub use archetype::{AgentRecommendation, Archetype, RoleType, recommend_archetypes};
pub use architecture::{ArchitectureTierSpec, map_architecture_tiers};
pub use condition::{Condition, ConditionSubject, Conditional, Operator, evaluate_condition, rule_matches};
pub use config::{ConfigError, ConfigHolder, ConfigSection, RulesConfig, SizingThresholds};
pub use dimension::{DIMENSIONS, Dimension, DimensionId, ScoreSet};
pub use engine::{AssessmentReport, Assessor, Simulation, SimulationDelta, assess, simulate};
pub use error::{AgentSizeError, Result};
pub use governance::{GovernancePack, GovernanceRequirement, ImpactLevel};
pub use risk::{RiskLevel, RiskProfile, classify_risk};
pub use rules::{ArchetypeTriggerRule, GovernanceRule, Necessity, Priority, RiskRule};
pub use sizing::{SizeTier, SizingResult, classify_size};
pub use storage::ConfigStore;

/// Highest score a single dimension can take.
pub const MAX_DIMENSION_SCORE: u8 = 3;

/// Highest total score across the whole catalog.
pub const MAX_TOTAL_SCORE: u32 = MAX_DIMENSION_SCORE as u32 * DimensionId::ALL.len() as u32;
