//! # Report Rendering
//!
//! Plain-text views of engine output. Each view is a stack of boxed sections
//! so the sizing, risk and governance parts read separately on a terminal.
//! JSON output bypasses this module and serializes the core types directly.

use agentsize_core::architecture::LayerTier;
use agentsize_core::{AssessmentReport, DIMENSIONS, RulesConfig, ScoreSet, Simulation};

const RULE: &str = "─────────────────────────────────────────────";

fn open(output: &mut String, title: &str) {
    output.push_str(&format!("┌{RULE}\n"));
    output.push_str(&format!("│ {title}\n"));
    output.push_str(&format!("├{RULE}\n"));
}

fn close(output: &mut String) {
    output.push_str(&format!("└{RULE}\n"));
}

fn line(output: &mut String, text: &str) {
    output.push_str(&format!("│ {text}\n"));
}

fn bullets(output: &mut String, items: &[String]) {
    if items.is_empty() {
        line(output, "- (none)");
    }
    for item in items {
        line(output, &format!("- {item}"));
    }
}

fn layer(output: &mut String, name: &str, tier: &LayerTier) {
    line(output, &format!("{name:<14} {}", tier.description));
}

/// The full assessment as boxed text.
#[must_use]
pub fn render_report(report: &AssessmentReport) -> String {
    let sizing = &report.sizing;
    let governance = &report.governance;
    let risk = report.risk();
    let mut output = String::new();

    open(&mut output, "SIZING");
    line(
        &mut output,
        &format!("Total score: {} -> {}", sizing.total_score, sizing.tier),
    );
    bullets(&mut output, &sizing.notes);
    line(&mut output, "Patterns:");
    bullets(&mut output, &sizing.recommended_patterns);
    line(&mut output, &format!("Testing: {}", sizing.test_cases_placeholder));
    close(&mut output);

    open(&mut output, "AGENTS");
    if sizing.agent_recommendations.is_empty() {
        line(&mut output, "- (none)");
    }
    for rec in &sizing.agent_recommendations {
        line(
            &mut output,
            &format!(
                "- {} [{}] {}",
                rec.archetype_id,
                rec.role_type.label(),
                rec.necessity
            ),
        );
        line(&mut output, &format!("    {}", rec.reason));
    }
    close(&mut output);

    let tiers = &sizing.architecture_tiers;
    open(&mut output, "ARCHITECTURE");
    layer(&mut output, "Experience", &tiers.experience_agents);
    layer(&mut output, "Value stream", &tiers.value_stream_agents);
    layer(&mut output, "Function", &tiers.function_agents);
    layer(&mut output, "Process", &tiers.process_agents);
    layer(&mut output, "Task", &tiers.task_agents);
    layer(&mut output, "Control", &tiers.control_agents);
    layer(&mut output, "Platform", &tiers.platform_tooling);
    close(&mut output);

    open(&mut output, "RISK & GOVERNANCE");
    line(
        &mut output,
        &format!(
            "Risk: {}    Impact: {}",
            risk.level, governance.impact_level
        ),
    );
    bullets(&mut output, &risk.reasons);
    line(&mut output, "Requirements:");
    if governance.requirements.is_empty() {
        line(&mut output, "- (none)");
    }
    for req in &governance.requirements {
        line(
            &mut output,
            &format!("- [{}] {} ({})", req.priority, req.title, req.category),
        );
    }
    line(&mut output, "Oversight:");
    bullets(&mut output, &governance.oversight_points);
    line(
        &mut output,
        &format!("Monitoring: {}", governance.monitoring_cadence),
    );
    close(&mut output);

    output
}

/// Baseline vs scenario summary followed by the scenario report.
#[must_use]
pub fn render_simulation(sim: &Simulation) -> String {
    let delta = &sim.delta;
    let mut output = String::new();

    open(&mut output, "SIMULATION");
    line(
        &mut output,
        &format!(
            "Score: {} -> {} ({:+})",
            sim.baseline.sizing.total_score, sim.scenario.sizing.total_score, delta.score_delta
        ),
    );
    line(
        &mut output,
        &format!("Tier:  {} -> {}", delta.tier_before, delta.tier_after),
    );
    line(
        &mut output,
        &format!("Risk:  {} -> {}", delta.risk_before, delta.risk_after),
    );
    if !delta.changed_dimensions.is_empty() {
        let changed: Vec<String> = delta
            .changed_dimensions
            .iter()
            .map(|&id| {
                format!(
                    "{} {}->{}",
                    id,
                    sim.baseline.scores.get(id),
                    sim.scenario.scores.get(id)
                )
            })
            .collect();
        line(&mut output, &format!("Changed: {}", changed.join(", ")));
    }
    line(&mut output, "Agents added:");
    bullets(&mut output, &delta.archetypes_added);
    line(&mut output, "Agents removed:");
    bullets(&mut output, &delta.archetypes_removed);
    if delta.is_unchanged() {
        line(&mut output, "No observable change.");
    }
    close(&mut output);

    output.push_str(&render_report(&sim.scenario));
    output
}

/// The dimension catalog with every option.
#[must_use]
pub fn render_dimensions() -> String {
    let mut output = String::new();
    for dim in &DIMENSIONS {
        open(&mut output, &format!("{} ({})", dim.label, dim.id));
        line(&mut output, dim.description);
        for option in &dim.options {
            line(
                &mut output,
                &format!("{}. {}: {}", option.score, option.title, option.description),
            );
        }
        close(&mut output);
    }
    output
}

/// Compact summary of a rules configuration.
#[must_use]
pub fn render_config(config: &RulesConfig) -> String {
    let mut output = String::new();
    open(&mut output, "RULES CONFIG");
    line(
        &mut output,
        &format!(
            "Thresholds: MEDIUM >= {}, LARGE >= {}",
            config.sizing_thresholds.medium, config.sizing_thresholds.large
        ),
    );
    line(&mut output, &format!("Risk rules: {}", config.risk_rules.len()));
    for rule in &config.risk_rules {
        line(&mut output, &format!("- {} -> {}", rule.id, rule.level));
    }
    line(
        &mut output,
        &format!("Governance rules: {}", config.governance_rules.len()),
    );
    for rule in &config.governance_rules {
        line(&mut output, &format!("- {} [{}]", rule.id, rule.priority));
    }
    line(
        &mut output,
        &format!("Archetype triggers: {}", config.archetype_triggers.len()),
    );
    for rule in &config.archetype_triggers {
        line(
            &mut output,
            &format!("- {} -> {} ({})", rule.id, rule.archetype_id, rule.necessity),
        );
    }
    close(&mut output);
    output
}

/// One `dimension=score` line per scored dimension, catalog order.
#[must_use]
pub fn render_scores(scores: &ScoreSet) -> String {
    let mut output = String::new();
    for (id, score) in scores.iter() {
        output.push_str(&format!("{id}={score}\n"));
    }
    output
}
