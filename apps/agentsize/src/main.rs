//! # agentsize
//!
//! Command-line front end for the agent sizing engine.
//!
//! Logs go to stderr so that `--json` output on stdout stays
//! machine-readable.

use agentsize::cli::{
    self, CliResult, ScoreSource, cmd_assess, cmd_config_export, cmd_config_import,
    cmd_config_reset, cmd_config_show, cmd_config_validate, cmd_dimensions, cmd_init,
    cmd_scenario_delete, cmd_scenario_list, cmd_scenario_save, cmd_scenario_show, cmd_simulate,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "agentsize=info,agentsize_core=info";
const VERBOSE_FILTER: &str = "agentsize=debug,agentsize_core=debug";

#[derive(Parser, Debug)]
#[command(name = "agentsize", version, about = "Size, risk-rate and govern agent solutions")]
struct Cli {
    /// Database path
    #[arg(short, long, global = true, env = "AGENTSIZE_DB", default_value = "agentsize.json")]
    db: PathBuf,

    /// Storage backend: file (JSON document) or redb
    #[arg(short, long, global = true, default_value = "file")]
    backend: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a database seeded with the default rules
    Init {
        /// Overwrite an existing database
        #[arg(short, long)]
        force: bool,
    },

    /// List the assessment dimensions and their options
    Dimensions,

    /// Assess a score set
    Assess(ScoreArgs),

    /// Evaluate a what-if scenario against a baseline
    Simulate {
        #[command(flatten)]
        scores: ScoreArgs,

        /// Overrides, e.g. "dataSensitivity=3,userReach=2"
        #[arg(short, long)]
        set: String,
    },

    /// Inspect or edit the rules configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Manage saved score sets (redb backend)
    #[command(subcommand)]
    Scenario(ScenarioCommand),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Score file
    #[arg(short, long, conflicts_with = "scenario", required_unless_present = "scenario")]
    file: Option<PathBuf>,

    /// Score file format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Saved scenario name (redb backend)
    #[arg(long)]
    scenario: Option<String>,
}

impl ScoreArgs {
    fn source(self) -> ScoreSource {
        match (self.file, self.scenario) {
            (_, Some(name)) => ScoreSource::Scenario(name),
            (Some(path), None) => ScoreSource::File {
                path,
                format: self.format,
            },
            // clap enforces one of the two
            (None, None) => ScoreSource::File {
                path: PathBuf::new(),
                format: self.format,
            },
        }
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the current rules
    Show,

    /// Restore defaults for one section or for everything
    Reset {
        /// sizing-thresholds, risk-rules, governance-rules or archetype-triggers
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Replace the rules from a file
    Import {
        file: PathBuf,
        /// json or binary
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Write the rules to a file
    Export {
        file: PathBuf,
        /// json or binary
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Check a rules file without importing it
    Validate {
        file: PathBuf,
        /// json or binary
        #[arg(long, default_value = "json")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
enum ScenarioCommand {
    /// Save a score file under a name
    Save {
        name: String,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// List saved scenarios
    List,
    /// Print a saved scenario
    Show { name: String },
    /// Delete a saved scenario
    Delete { name: String },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let db = cli.db.as_path();
    let backend = cli.backend.as_str();
    let json = cli.json;

    match cli.command {
        Commands::Init { force } => cmd_init(db, backend, force),
        Commands::Dimensions => cmd_dimensions(json),
        Commands::Assess(args) => cmd_assess(db, backend, json, &args.source()),
        Commands::Simulate { scores, set } => {
            cmd_simulate(db, backend, json, &scores.source(), &set)
        }
        Commands::Config(command) => match command {
            ConfigCommand::Show => cmd_config_show(db, backend, json),
            ConfigCommand::Reset { section } => cmd_config_reset(db, backend, section.as_deref()),
            ConfigCommand::Import { file, format } => {
                cmd_config_import(db, backend, &file, &format)
            }
            ConfigCommand::Export { file, format } => {
                cmd_config_export(db, backend, &file, &format)
            }
            ConfigCommand::Validate { file, format } => cmd_config_validate(&file, &format),
        },
        Commands::Scenario(command) => match command {
            ScenarioCommand::Save { name, file, format } => {
                cmd_scenario_save(db, backend, &name, &file, &format)
            }
            ScenarioCommand::List => cmd_scenario_list(db, backend, json),
            ScenarioCommand::Show { name } => cmd_scenario_show(db, backend, json, &name),
            ScenarioCommand::Delete { name } => cmd_scenario_delete(db, backend, &name),
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            if let cli::CliError::Usage(_) = err {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
