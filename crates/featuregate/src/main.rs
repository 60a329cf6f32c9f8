// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! featuregate - decide which feature plugins each build target compiles.
//!
//! This is the binary entry point. Results go to stdout, logs to stderr.

mod output;
mod resolve;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use featuregate_config::{ConfigError, FeatureGateConfig};
use featuregate_core::{BuildEnvironment, TargetKind};

/// featuregate - decide which feature plugins each build target compiles.
#[derive(Parser, Debug)]
#[command(name = "featuregate", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the user and local lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one evaluation pass and print the enable and disable lists.
    Evaluate {
        /// Target kind to evaluate (defaults to `build.target`).
        #[arg(long)]
        target: Option<TargetKind>,
        #[command(flatten)]
        pass: PassArgs,
        /// Print the pass report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Evaluate several targets in parallel, sharing one descriptor cache.
    Matrix {
        /// Comma-separated target kinds (defaults to every kind).
        #[arg(long, value_delimiter = ',')]
        targets: Vec<TargetKind>,
        #[command(flatten)]
        pass: PassArgs,
        #[arg(long)]
        json: bool,
    },
    /// Run a pass and print the plugin reference graph.
    Refs {
        #[arg(long)]
        target: Option<TargetKind>,
        #[command(flatten)]
        pass: PassArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// Overrides applied on top of the loaded configuration.
#[derive(Args, Debug, Default, Clone)]
struct PassArgs {
    /// Current branch name.
    #[arg(long)]
    branch: Option<String>,
    /// Unique or Shared.
    #[arg(long)]
    environment: Option<BuildEnvironment>,
    /// Request every plugin that is not force-disabled.
    #[arg(long)]
    build_all: bool,
    /// Extra descriptor root (repeatable).
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,
    /// Project directory the extension directories are derived from.
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,
}

impl PassArgs {
    fn apply(&self, config: &mut FeatureGateConfig) {
        if let Some(branch) = &self.branch {
            config.build.branch = branch.clone();
        }
        if let Some(environment) = self.environment {
            config.build.environment = environment;
        }
        if self.build_all {
            config.build.build_all_plugins = true;
        }
        if let Some(dir) = &self.project_dir {
            config.plugins.project_dir = dir.display().to_string();
        }
        config
            .plugins
            .roots
            .extend(self.roots.iter().map(|r| r.display().to_string()));
    }
}

impl Commands {
    /// Fold command-line overrides into `config`.
    fn apply_overrides(&self, config: &mut FeatureGateConfig) {
        match self {
            Commands::Evaluate { target, pass, .. } | Commands::Refs { target, pass, .. } => {
                if let Some(target) = target {
                    config.build.target = *target;
                }
                pass.apply(config);
            }
            Commands::Matrix { pass, .. } => pass.apply(config),
            Commands::Config => {}
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), &cli.command) {
        Ok(config) => config,
        Err(errors) => {
            featuregate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let level = if cli.verbose { "debug" } else { config.log.level.as_str() };
    init_tracing(level);

    let use_color = !cli.plain && std::io::stdout().is_terminal();
    let result = match cli.command {
        Commands::Evaluate { json, .. } => resolve::run_evaluate(&config, json, use_color),
        Commands::Matrix { targets, json, .. } => {
            resolve::run_matrix(&config, &targets, json, use_color)
        }
        Commands::Refs { json, .. } => resolve::run_refs(&config, json),
        Commands::Config => output::print_config(&config),
    };

    if let Err(e) = result {
        eprintln!("featuregate: {e}");
        std::process::exit(1);
    }
}

/// Load, override and validate. Overrides are validated like file values.
fn load_config(
    path: Option<&Path>,
    command: &Commands,
) -> Result<FeatureGateConfig, Vec<ConfigError>> {
    let mut config = match path {
        Some(path) => featuregate_config::load_and_validate_path(path)?,
        None => featuregate_config::load_and_validate()?,
    };
    command.apply_overrides(&mut config);
    featuregate_config::validation::validate_config(&config)?;
    Ok(config)
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "featuregate={log_level},featuregate_plugin={log_level},featuregate_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_evaluate_overrides() {
        let cli = Cli::try_parse_from([
            "featuregate",
            "evaluate",
            "--target",
            "editor",
            "--branch",
            "release",
            "--environment",
            "shared",
            "--build-all",
            "--root",
            "/a",
            "--root",
            "/b",
            "--json",
        ])
        .unwrap();

        let mut config = FeatureGateConfig::default();
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.build.target, TargetKind::Editor);
        assert_eq!(config.build.branch, "release");
        assert_eq!(config.build.environment, BuildEnvironment::Shared);
        assert!(config.build.build_all_plugins);
        assert_eq!(config.plugins.roots, vec!["/a", "/b"]);
        assert!(matches!(cli.command, Commands::Evaluate { json: true, .. }));
    }

    #[test]
    fn matrix_targets_are_comma_separated() {
        let cli = Cli::try_parse_from(["featuregate", "matrix", "--targets", "Game,Server"]).unwrap();
        match cli.command {
            Commands::Matrix { targets, .. } => {
                assert_eq!(targets, vec![TargetKind::Game, TargetKind::Server]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["featuregate", "refs", "-v", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("x.toml")));
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(Cli::try_parse_from(["featuregate", "evaluate", "--target", "Console"]).is_err());
    }

    #[test]
    fn config_command_leaves_config_untouched() {
        let cli = Cli::try_parse_from(["featuregate", "config"]).unwrap();
        let mut config = FeatureGateConfig::default();
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.build.branch, FeatureGateConfig::default().build.branch);
        assert!(config.plugins.roots.is_empty());
    }
}
