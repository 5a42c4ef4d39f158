//! # Rule Types & Built-in Rule Sets
//!
//! The three rule payloads (risk, governance, archetype trigger) and the
//! defaults that ship with the engine. Defaults are plain data returned by
//! functions so any section of a [`RulesConfig`](crate::RulesConfig) can be
//! reset on its own.

use crate::condition::{Condition, Conditional, Operator};
use crate::dimension::DimensionId;
use crate::dimension::DimensionId::{
    AgentCountAndTypes, BusinessScope, ChangeAndAdoption, DataSensitivity, PlatformMix,
    SystemsToIntegrate, UserReach, WorkflowComplexity,
};
use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// PAYLOAD ENUMS
// =============================================================================

/// How strongly an archetype is recommended.
///
/// Ordered `Optional < Recommended < DefinitelyNeeded`; merges only ever move
/// up this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Necessity {
    Optional,
    Recommended,
    #[serde(rename = "Definitely needed")]
    DefinitelyNeeded,
}

impl Necessity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Necessity::Optional => "Optional",
            Necessity::Recommended => "Recommended",
            Necessity::DefinitelyNeeded => "Definitely needed",
        }
    }
}

impl fmt::Display for Necessity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a governance requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Mandatory,
    Recommended,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Mandatory => f.write_str("Mandatory"),
            Priority::Recommended => f.write_str("Recommended"),
        }
    }
}

// =============================================================================
// RULES
// =============================================================================

/// A risk rule: when it matches, its reason is recorded at its level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRule {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub level: RiskLevel,
    pub reason: String,
}

/// A governance rule: when it matches, its requirement is included verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceRule {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
}

/// An archetype trigger: when it matches, the archetype is recommended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeTriggerRule {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub archetype_id: String,
    pub necessity: Necessity,
    pub reason: String,
}

macro_rules! impl_conditional {
    ($($ty:ty),*) => {
        $(
            impl Conditional for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn conditions(&self) -> &[Condition] {
                    &self.conditions
                }
            }
        )*
    };
}

impl_conditional!(RiskRule, GovernanceRule, ArchetypeTriggerRule);

// =============================================================================
// BUILT-IN DEFAULTS
// =============================================================================

fn at_least(id: DimensionId, threshold: i32) -> Condition {
    Condition::dimension(id, Operator::Gte, threshold)
}

fn exactly(id: DimensionId, threshold: i32) -> Condition {
    Condition::dimension(id, Operator::Eq, threshold)
}

fn risk(id: &str, conditions: Vec<Condition>, level: RiskLevel, reason: &str) -> RiskRule {
    RiskRule {
        id: id.to_string(),
        conditions,
        level,
        reason: reason.to_string(),
    }
}

fn gov(
    id: &str,
    conditions: Vec<Condition>,
    title: &str,
    description: &str,
    category: &str,
    priority: Priority,
) -> GovernanceRule {
    GovernanceRule {
        id: id.to_string(),
        conditions,
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        priority,
    }
}

fn trigger(
    id: &str,
    conditions: Vec<Condition>,
    archetype_id: &str,
    necessity: Necessity,
    reason: &str,
) -> ArchetypeTriggerRule {
    ArchetypeTriggerRule {
        id: id.to_string(),
        conditions,
        archetype_id: archetype_id.to_string(),
        necessity,
        reason: reason.to_string(),
    }
}

/// Built-in risk rules, in evaluation order.
#[must_use]
pub fn default_risk_rules() -> Vec<RiskRule> {
    vec![
        risk(
            "risk-regulated-data",
            vec![at_least(DataSensitivity, 3)],
            RiskLevel::High,
            "Regulated or highly sensitive data is in scope.",
        ),
        risk(
            "risk-confidential-data",
            vec![exactly(DataSensitivity, 2)],
            RiskLevel::Medium,
            "Confidential or personal data is in scope.",
        ),
        risk(
            "risk-adaptive-workflow",
            vec![at_least(WorkflowComplexity, 3)],
            RiskLevel::Medium,
            "Adaptive, multi-stage workflows make agent behaviour harder to predict.",
        ),
        risk(
            "risk-public-reach",
            vec![at_least(UserReach, 3)],
            RiskLevel::Medium,
            "Public-facing use widens the impact of any failure.",
        ),
        risk(
            "risk-integration-surface",
            vec![at_least(SystemsToIntegrate, 3)],
            RiskLevel::Medium,
            "Many integrated systems enlarge the attack and failure surface.",
        ),
        risk(
            "risk-autonomous-fleet",
            vec![at_least(AgentCountAndTypes, 3), at_least(WorkflowComplexity, 2)],
            RiskLevel::Medium,
            "A large agent fleet acting on branching workflows needs coordination safeguards.",
        ),
        risk(
            "risk-transformational-change",
            vec![at_least(ChangeAndAdoption, 3)],
            RiskLevel::Medium,
            "Transformational change raises adoption and operating-model risk.",
        ),
    ]
}

/// Built-in governance rules, in output order.
#[must_use]
pub fn default_governance_rules() -> Vec<GovernanceRule> {
    vec![
        gov(
            "gov-accountable-owner",
            Vec::new(),
            "Named accountable owner",
            "Assign a business owner accountable for the solution's outcomes.",
            "Accountability",
            Priority::Mandatory,
        ),
        gov(
            "gov-audit-logging",
            Vec::new(),
            "Audit logging",
            "Log agent inputs, tool calls and outputs with enough context to reconstruct decisions.",
            "Transparency",
            Priority::Mandatory,
        ),
        gov(
            "gov-data-classification",
            vec![at_least(DataSensitivity, 2)],
            "Data classification and access control",
            "Classify every data source the agents touch and restrict access by role.",
            "Data",
            Priority::Mandatory,
        ),
        gov(
            "gov-impact-assessment",
            vec![at_least(DataSensitivity, 3)],
            "Privacy and regulatory impact assessment",
            "Complete a privacy or regulatory impact assessment before go-live.",
            "Data",
            Priority::Mandatory,
        ),
        gov(
            "gov-human-approval",
            vec![Condition::risk_level(Operator::Gte, 3)],
            "Human approval for consequential actions",
            "Require a human to approve any action with financial, legal or customer impact.",
            "Oversight",
            Priority::Mandatory,
        ),
        gov(
            "gov-risk-review",
            vec![Condition::risk_level(Operator::Gte, 2)],
            "Periodic risk review",
            "Review the risk register and agent incidents on a fixed schedule.",
            "Oversight",
            Priority::Recommended,
        ),
        gov(
            "gov-ai-disclosure",
            vec![at_least(UserReach, 2)],
            "AI interaction disclosure",
            "Tell users when they are interacting with an agent and how to reach a person.",
            "Transparency",
            Priority::Recommended,
        ),
        gov(
            "gov-escalation-path",
            vec![at_least(UserReach, 3)],
            "Escalation and fallback path",
            "Provide a documented hand-off to a human when the agent cannot complete a request.",
            "Oversight",
            Priority::Mandatory,
        ),
        gov(
            "gov-least-privilege",
            vec![at_least(SystemsToIntegrate, 2)],
            "Least-privilege tool credentials",
            "Scope every tool and integration credential to the minimum permissions required.",
            "Security",
            Priority::Recommended,
        ),
        gov(
            "gov-evaluation-suite",
            vec![at_least(WorkflowComplexity, 2)],
            "Pre-release evaluation suite",
            "Maintain an evaluation suite that must pass before each release.",
            "Quality",
            Priority::Recommended,
        ),
        gov(
            "gov-cross-platform-observability",
            vec![at_least(PlatformMix, 3)],
            "Cross-platform observability",
            "Trace requests across every provider and runtime with a shared correlation id.",
            "Operations",
            Priority::Recommended,
        ),
        gov(
            "gov-change-management",
            vec![at_least(ChangeAndAdoption, 3)],
            "Change management and training",
            "Run a change programme with training for every affected role.",
            "Adoption",
            Priority::Recommended,
        ),
        gov(
            "gov-value-stream-board",
            vec![at_least(BusinessScope, 3)],
            "Cross-functional steering board",
            "Set up a steering board with representation from every function the solution spans.",
            "Accountability",
            Priority::Recommended,
        ),
    ]
}

/// Built-in archetype triggers, in evaluation order.
#[must_use]
pub fn default_archetype_triggers() -> Vec<ArchetypeTriggerRule> {
    use Necessity::{DefinitelyNeeded, Optional, Recommended};

    vec![
        trigger(
            "arch-specialist-baseline",
            Vec::new(),
            "domain-specialist",
            DefinitelyNeeded,
            "Every solution needs at least one agent that performs the core task.",
        ),
        trigger(
            "arch-orchestrator-team",
            vec![at_least(AgentCountAndTypes, 2)],
            "orchestrator",
            Recommended,
            "Several specialised agents need a coordinator to hand work between them.",
        ),
        trigger(
            "arch-orchestrator-fleet",
            vec![at_least(AgentCountAndTypes, 3)],
            "orchestrator",
            DefinitelyNeeded,
            "A fleet of agents cannot run without central orchestration.",
        ),
        trigger(
            "arch-orchestrator-adaptive",
            vec![at_least(WorkflowComplexity, 3)],
            "orchestrator",
            Recommended,
            "Adaptive workflows benefit from a coordinator that re-plans between steps.",
        ),
        trigger(
            "arch-planner-branching",
            vec![at_least(WorkflowComplexity, 2)],
            "planner",
            Recommended,
            "Branching workflows benefit from explicit task decomposition.",
        ),
        trigger(
            "arch-planner-adaptive",
            vec![at_least(WorkflowComplexity, 3)],
            "planner",
            DefinitelyNeeded,
            "Open-ended workflows require a planner to decompose and sequence work.",
        ),
        trigger(
            "arch-router-broad",
            vec![at_least(UserReach, 2), at_least(BusinessScope, 2)],
            "router",
            Recommended,
            "Requests from many users across a function need routing to the right specialist.",
        ),
        trigger(
            "arch-front-door-org",
            vec![at_least(UserReach, 2)],
            "conversational-front-door",
            Recommended,
            "Organization-wide users benefit from a single conversational entry point.",
        ),
        trigger(
            "arch-front-door-public",
            vec![at_least(UserReach, 3)],
            "conversational-front-door",
            DefinitelyNeeded,
            "Public users need a dedicated, hardened conversational interface.",
        ),
        trigger(
            "arch-adapter-few",
            vec![at_least(SystemsToIntegrate, 2)],
            "integration-adapter",
            Recommended,
            "Several systems of record call for a dedicated integration agent.",
        ),
        trigger(
            "arch-adapter-many",
            vec![at_least(SystemsToIntegrate, 3)],
            "integration-adapter",
            DefinitelyNeeded,
            "Many heterogeneous systems require dedicated integration agents.",
        ),
        trigger(
            "arch-retrieval-function",
            vec![at_least(BusinessScope, 2)],
            "knowledge-retriever",
            Optional,
            "Function-wide scope usually involves a shared knowledge base.",
        ),
        trigger(
            "arch-retrieval-value-stream",
            vec![at_least(BusinessScope, 3)],
            "knowledge-retriever",
            Recommended,
            "Cross-functional work depends on retrieving knowledge from several domains.",
        ),
        trigger(
            "arch-guardian-confidential",
            vec![at_least(DataSensitivity, 2)],
            "compliance-guardian",
            Recommended,
            "Confidential data should pass through a policy-enforcing guardian.",
        ),
        trigger(
            "arch-guardian-regulated",
            vec![at_least(DataSensitivity, 3)],
            "compliance-guardian",
            DefinitelyNeeded,
            "Regulated data must be screened by a compliance guardian.",
        ),
        trigger(
            "arch-reviewer-branching",
            vec![at_least(WorkflowComplexity, 2), at_least(BusinessScope, 2)],
            "quality-reviewer",
            Optional,
            "A reviewer agent can catch errors before outputs leave the workflow.",
        ),
        trigger(
            "arch-reviewer-regulated",
            vec![at_least(DataSensitivity, 3)],
            "quality-reviewer",
            Recommended,
            "Outputs built on regulated data should be checked before release.",
        ),
        trigger(
            "arch-liaison-adaptive",
            vec![at_least(WorkflowComplexity, 3)],
            "human-liaison",
            Recommended,
            "Judgment-heavy steps need a structured hand-off to human reviewers.",
        ),
        trigger(
            "arch-liaison-public-regulated",
            vec![at_least(UserReach, 3), at_least(DataSensitivity, 3)],
            "human-liaison",
            DefinitelyNeeded,
            "Public exposure of regulated data requires a human in the loop.",
        ),
        trigger(
            "arch-monitor-mixed",
            vec![at_least(PlatformMix, 2)],
            "operations-monitor",
            Recommended,
            "Multiple platforms need a monitor that tracks health and cost across them.",
        ),
        trigger(
            "arch-monitor-heterogeneous",
            vec![at_least(PlatformMix, 3)],
            "operations-monitor",
            DefinitelyNeeded,
            "Heterogeneous runtimes cannot be operated without dedicated monitoring.",
        ),
        trigger(
            "arch-coach-moderate",
            vec![at_least(ChangeAndAdoption, 2)],
            "adoption-coach",
            Optional,
            "An in-workflow coach helps users through new steps.",
        ),
        trigger(
            "arch-coach-transformational",
            vec![at_least(ChangeAndAdoption, 3)],
            "adoption-coach",
            Recommended,
            "Redesigned roles benefit from an agent that guides people through the change.",
        ),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
