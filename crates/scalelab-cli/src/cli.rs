use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use scalelab::{LabConfig, LogFormat};

use crate::catalog::{CatalogArgs, VerdictArgs, run_catalog, run_verdict};
use crate::error::Result;
use crate::play::{PlayArgs, run_play};
use crate::session::{RunArgs, run_script_file};

#[derive(Debug, Parser)]
#[command(
    name = "scalelab",
    about = "Balance production forces against production relations",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// TOML config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for conflict phrases; overrides the config.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log filter directive, e.g. `scalelab=debug`; overrides the config.
    #[arg(long = "log", global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl GlobalArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<LabConfig> {
        let mut config = match &self.config {
            Some(path) => LabConfig::from_toml_file(path)?,
            None => LabConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(filter) = &self.log_filter {
            config.logging.filter.clone_from(filter);
        }
        if let Some(format) = self.log_format {
            config.logging.format = format.into();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the factor palette and the informational facts.
    Catalog(CatalogArgs),

    /// Replay a session script on a virtual clock.
    Run(RunArgs),

    /// Interactive session on the wall clock, commands read from stdin.
    Play(PlayArgs),

    /// Weigh a set of catalog ids and print the verdict.
    Verdict(VerdictArgs),

    /// Print the effective configuration as TOML.
    #[command(name = "print-config")]
    PrintConfig,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.global.resolve_config()?;
    scalelab::logging::init(&config.logging)?;
    tracing::debug!(target: "scalelab.cli", command = ?cli.command, "starting");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &config, &mut out)
}

pub fn run(command: Commands, config: &LabConfig, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Catalog(args) => run_catalog(&args, out),
        Commands::Run(args) => run_script_file(&args, config, out),
        Commands::Play(args) => run_play(&args, config, out),
        Commands::Verdict(args) => run_verdict(&args, out),
        Commands::PrintConfig => {
            write!(out, "{}", config.to_toml_string()?)?;
            Ok(())
        }
    }
}
