//! # CLI Commands
//!
//! One `cmd_*` function per subcommand. Each takes the database path and the
//! backend name explicitly so the commands can be driven from tests without
//! going through argument parsing.
//!
//! Backends:
//! - `file`: the rules config as a pretty-printed JSON document
//! - `redb`: the [`ConfigStore`] key-value store, which also holds scenarios

use crate::report;
use agentsize_core::formats::{decode_config, encode_config};
use agentsize_core::{
    AgentSizeError, ConfigError, ConfigHolder, ConfigSection, ConfigStore, DIMENSIONS,
    DimensionId, RulesConfig, ScoreSet, assess, simulate,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AgentSizeError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// BACKEND
// =============================================================================

/// Where the rules configuration lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    Redb,
}

impl FromStr for Backend {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Backend::File),
            "redb" => Ok(Backend::Redb),
            other => Err(CliError::Usage(format!(
                "unknown backend '{other}' (expected 'file' or 'redb')"
            ))),
        }
    }
}

fn open_store(db_path: &Path, backend: &str) -> CliResult<ConfigStore> {
    match backend.parse::<Backend>()? {
        Backend::Redb => Ok(ConfigStore::open(db_path)?),
        Backend::File => Err(CliError::Usage(
            "scenarios require the redb backend (--backend redb)".to_string(),
        )),
    }
}

/// Load the stored config, or the built-in defaults if nothing is stored yet.
pub fn load_or_create_config(db_path: &Path, backend: &str) -> CliResult<RulesConfig> {
    match backend.parse::<Backend>()? {
        Backend::File => {
            if !db_path.exists() {
                tracing::debug!(path = %db_path.display(), "no config file, using defaults");
                return Ok(RulesConfig::defaults());
            }
            let content = fs::read_to_string(db_path)?;
            let config: RulesConfig = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        }
        Backend::Redb => Ok(ConfigStore::open(db_path)?.load_or_default()?),
    }
}

/// Persist a config to the chosen backend.
pub fn save_config(config: &RulesConfig, db_path: &Path, backend: &str) -> CliResult<()> {
    match backend.parse::<Backend>()? {
        Backend::File => {
            config.validate()?;
            let json = serde_json::to_string_pretty(config)?;
            fs::write(db_path, json)?;
        }
        Backend::Redb => ConfigStore::open(db_path)?.save_config(config)?,
    }
    tracing::debug!(path = %db_path.display(), backend, "config saved");
    Ok(())
}

fn load_holder(db_path: &Path, backend: &str) -> CliResult<ConfigHolder> {
    Ok(ConfigHolder::from_config(load_or_create_config(db_path, backend)?)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// SCORE INPUT
// =============================================================================

/// Where a command reads its score set from.
#[derive(Debug, Clone)]
pub enum ScoreSource {
    /// A file in `json` or `text` format.
    File { path: PathBuf, format: String },
    /// A scenario saved in the redb store.
    Scenario(String),
}

fn checked_score(id: DimensionId, raw: i64) -> CliResult<u8> {
    u8::try_from(raw).map_err(|_| {
        CliError::Core(AgentSizeError::InvalidScore {
            dimension: id,
            score: raw,
        })
    })
}

/// Parse a score set.
///
/// - `json`: an object of dimension id to score, e.g. `{"userReach": 3}`
/// - `text`: one `dimension=score` per line; blank lines and `#` comments
///   are skipped
///
/// Unlike the engine, which reads unknown dimensions as 0, input files are
/// strict: an unknown dimension or an out-of-range score is an error.
pub fn parse_scores(content: &str, format: &str) -> CliResult<ScoreSet> {
    let mut scores = ScoreSet::new();

    match format {
        "json" => {
            let raw: BTreeMap<String, i64> = serde_json::from_str(content)?;
            for (key, value) in raw {
                let id: DimensionId = key.parse()?;
                scores.set(id, checked_score(id, value)?)?;
            }
        }
        "text" => {
            for (number, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (id, score) = parse_assignment(line)
                    .map_err(|e| CliError::Usage(format!("line {}: {e}", number + 1)))?;
                scores.set(id, score)?;
            }
        }
        other => {
            return Err(CliError::Usage(format!(
                "unknown format '{other}' (expected 'json' or 'text')"
            )));
        }
    }

    Ok(scores)
}

fn parse_assignment(text: &str) -> CliResult<(DimensionId, u8)> {
    let Some((key, value)) = text.split_once('=') else {
        return Err(CliError::Usage(format!(
            "expected 'dimension=score', got '{text}'"
        )));
    };
    let id: DimensionId = key.trim().parse()?;
    let raw: i64 = value
        .trim()
        .parse()
        .map_err(|_| CliError::Usage(format!("score for {id} is not a number: '{}'", value.trim())))?;
    let score = checked_score(id, raw)?;
    if !(1..=agentsize_core::MAX_DIMENSION_SCORE).contains(&score) {
        return Err(AgentSizeError::InvalidScore {
            dimension: id,
            score: raw,
        }
        .into());
    }
    Ok((id, score))
}

/// Parse `dimension=score` pairs separated by commas.
pub fn parse_overrides(text: &str) -> CliResult<Vec<(DimensionId, u8)>> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_assignment)
        .collect()
}

fn read_scores(db_path: &Path, backend: &str, source: &ScoreSource) -> CliResult<ScoreSet> {
    match source {
        ScoreSource::File { path, format } => {
            let content = fs::read_to_string(path)?;
            let scores = parse_scores(&content, format)?;
            tracing::debug!(path = %path.display(), scored = scores.len(), "read scores");
            Ok(scores)
        }
        ScoreSource::Scenario(name) => open_store(db_path, backend)?
            .load_scenario(name)?
            .ok_or_else(|| CliError::ScenarioNotFound(name.clone())),
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Create a database seeded with the default rules.
pub fn cmd_init(db_path: &Path, backend: &str, force: bool) -> CliResult<()> {
    let kind: Backend = backend.parse()?;
    if db_path.exists() {
        if !force {
            return Err(CliError::AlreadyExists(db_path.to_path_buf()));
        }
        fs::remove_file(db_path)?;
    }

    save_config(&RulesConfig::defaults(), db_path, backend)?;
    tracing::info!(path = %db_path.display(), backend = ?kind, "initialized database");
    println!("Initialized {} ({backend} backend)", db_path.display());
    Ok(())
}

/// Print the dimension catalog.
pub fn cmd_dimensions(json_mode: bool) -> CliResult<()> {
    if json_mode {
        return print_json(&DIMENSIONS[..]);
    }
    print!("{}", report::render_dimensions());
    Ok(())
}

/// Assess a score set under the stored config.
pub fn cmd_assess(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    source: &ScoreSource,
) -> CliResult<()> {
    let config = load_or_create_config(db_path, backend)?;
    let scores = read_scores(db_path, backend, source)?;
    let result = assess(&scores, &config);

    tracing::info!(
        total = result.sizing.total_score,
        tier = %result.tier(),
        risk = %result.risk().level,
        "assessed"
    );

    if json_mode {
        return print_json(&result);
    }
    print!("{}", report::render_report(&result));
    Ok(())
}

/// What-if evaluation of a score set with overrides applied.
pub fn cmd_simulate(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    source: &ScoreSource,
    overrides: &str,
) -> CliResult<()> {
    let config = load_or_create_config(db_path, backend)?;
    let baseline = read_scores(db_path, backend, source)?;
    let overrides = parse_overrides(overrides)?;
    let sim = simulate(&baseline, &overrides, &config);

    tracing::info!(
        score_delta = sim.delta.score_delta,
        tier = %sim.delta.tier_after,
        risk = %sim.delta.risk_after,
        "simulated"
    );

    if json_mode {
        return print_json(&sim);
    }
    print!("{}", report::render_simulation(&sim));
    Ok(())
}

// -----------------------------------------------------------------------------
// config
// -----------------------------------------------------------------------------

pub fn cmd_config_show(db_path: &Path, backend: &str, json_mode: bool) -> CliResult<()> {
    let config = load_or_create_config(db_path, backend)?;
    if json_mode {
        return print_json(&config);
    }
    print!("{}", report::render_config(&config));
    Ok(())
}

/// Reset one section, or the whole config when `section` is `None`.
pub fn cmd_config_reset(db_path: &Path, backend: &str, section: Option<&str>) -> CliResult<()> {
    let mut holder = load_holder(db_path, backend)?;

    match section {
        Some(name) => {
            let section: ConfigSection = name.parse()?;
            holder.reset_section(section)?;
            println!("Reset {section} to defaults");
        }
        None => {
            holder.reset();
            println!("Reset all rules to defaults");
        }
    }

    save_config(holder.config(), db_path, backend)
}

/// Replace the stored config with the contents of `input`.
///
/// `format` is `json` or `binary` (an `AGSZCFG1` snapshot).
pub fn cmd_config_import(
    db_path: &Path,
    backend: &str,
    input: &Path,
    format: &str,
) -> CliResult<()> {
    let imported = read_config_file(input, format)?;
    let mut holder = load_holder(db_path, backend)?;
    holder.replace(imported)?;
    save_config(holder.config(), db_path, backend)?;

    tracing::info!(path = %input.display(), "imported config");
    println!("Imported config from {}", input.display());
    Ok(())
}

/// Write the stored config to `output` as `json` or `binary`.
pub fn cmd_config_export(
    db_path: &Path,
    backend: &str,
    output: &Path,
    format: &str,
) -> CliResult<()> {
    let config = load_or_create_config(db_path, backend)?;
    match format {
        "json" => fs::write(output, serde_json::to_string_pretty(&config)?)?,
        "binary" => fs::write(output, encode_config(&config)?)?,
        other => {
            return Err(CliError::Usage(format!(
                "unknown config format '{other}' (expected 'json' or 'binary')"
            )));
        }
    }

    tracing::info!(path = %output.display(), format, "exported config");
    println!("Exported config to {}", output.display());
    Ok(())
}

/// Check a config file without touching the database.
pub fn cmd_config_validate(input: &Path, format: &str) -> CliResult<()> {
    let config = read_config_file(input, format)?;
    println!(
        "Valid: {} risk rules, {} governance rules, {} archetype triggers",
        config.risk_rules.len(),
        config.governance_rules.len(),
        config.archetype_triggers.len()
    );
    Ok(())
}

fn read_config_file(path: &Path, format: &str) -> CliResult<RulesConfig> {
    let config = match format {
        "json" => serde_json::from_str::<RulesConfig>(&fs::read_to_string(path)?)?,
        "binary" => decode_config(&fs::read(path)?)?,
        other => {
            return Err(CliError::Usage(format!(
                "unknown config format '{other}' (expected 'json' or 'binary')"
            )));
        }
    };
    config.validate()?;
    Ok(config)
}

// -----------------------------------------------------------------------------
// scenario
// -----------------------------------------------------------------------------

pub fn cmd_scenario_save(
    db_path: &Path,
    backend: &str,
    name: &str,
    input: &Path,
    format: &str,
) -> CliResult<()> {
    let store = open_store(db_path, backend)?;
    let scores = parse_scores(&fs::read_to_string(input)?, format)?;
    store.save_scenario(name, &scores)?;

    tracing::info!(scenario = name, scored = scores.len(), "saved scenario");
    println!("Saved scenario '{name}' ({} dimensions scored)", scores.len());
    Ok(())
}

pub fn cmd_scenario_list(db_path: &Path, backend: &str, json_mode: bool) -> CliResult<()> {
    let names = open_store(db_path, backend)?.list_scenarios()?;
    if json_mode {
        return print_json(&names);
    }
    if names.is_empty() {
        println!("No saved scenarios");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub fn cmd_scenario_show(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    name: &str,
) -> CliResult<()> {
    let scores = open_store(db_path, backend)?
        .load_scenario(name)?
        .ok_or_else(|| CliError::ScenarioNotFound(name.to_string()))?;
    if json_mode {
        return print_json(&scores);
    }
    print!("{}", report::render_scores(&scores));
    Ok(())
}

pub fn cmd_scenario_delete(db_path: &Path, backend: &str, name: &str) -> CliResult<()> {
    if !open_store(db_path, backend)?.delete_scenario(name)? {
        return Err(CliError::ScenarioNotFound(name.to_string()));
    }
    println!("Deleted scenario '{name}'");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_scores_skip_comments() {
        let scores = parse_scores("# pilot\nuserReach=2\n\n dataSensitivity = 3 \n", "text").unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get(DimensionId::DataSensitivity), 3);
    }

    #[test]
    fn json_scores_are_strict() {
        assert!(parse_scores(r#"{"userReach": 2}"#, "json").is_ok());
        assert!(parse_scores(r#"{"colour": 2}"#, "json").is_err());
        assert!(parse_scores(r#"{"userReach": 7}"#, "json").is_err());
        assert!(parse_scores(r#"{"userReach": -1}"#, "json").is_err());
    }

    #[test]
    fn overrides_parse_in_order() {
        let parsed = parse_overrides("userReach=3, platformMix=1").unwrap();
        assert_eq!(
            parsed,
            vec![(DimensionId::UserReach, 3), (DimensionId::PlatformMix, 1)]
        );
        assert!(parse_overrides("").unwrap().is_empty());
        assert!(parse_overrides("userReach").is_err());
        assert!(parse_overrides("userReach=0").is_err());
        assert!(parse_overrides("userReach=x").is_err());
    }

    #[test]
    fn unknown_backend_is_a_usage_error() {
        assert!(matches!("sqlite".parse::<Backend>(), Err(CliError::Usage(_))));
    }
}
