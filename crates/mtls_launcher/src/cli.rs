use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::command::{Launcher, DEFAULT_INTERPRETER, DEFAULT_SCRIPT};
use crate::config::{DEFAULT_GRID_SIDE, DEFAULT_SAMPLE_COUNT};
use crate::wizard::LaunchOptions;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "MTLS training launcher (seismic multi-task learning)",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask whether to configure interactively, otherwise use defaults (Default)
    Setup(LaunchArgs),

    /// Go straight to the interactive parameter wizard
    Wizard(LaunchArgs),

    /// Launch with detected defaults, no parameter questions
    Run(LaunchArgs),

    /// Print sample count and grid side detected in a directory
    Detect(DetectArgs),
}

/// Options shared by every command that ends in launching the trainer.
#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// Interpreter used to run the trainer
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    pub python: String,

    /// Trainer entry point
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    pub script: String,

    /// JSON parameter file used instead of the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the final parameters to this JSON file
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Start training without asking for confirmation
    #[arg(long, short = 'y', action)]
    pub yes: bool,

    /// Only print the trainer command
    #[arg(long, action)]
    pub dry_run: bool,
}

impl Default for LaunchArgs {
    fn default() -> Self {
        Self {
            python: DEFAULT_INTERPRETER.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
            config: None,
            save_config: None,
            yes: false,
            dry_run: false,
        }
    }
}

impl LaunchArgs {
    pub fn launcher(&self) -> Launcher {
        Launcher {
            interpreter: self.python.clone(),
            script: self.script.clone(),
        }
    }

    pub fn options(&self) -> LaunchOptions {
        LaunchOptions {
            assume_yes: self.yes,
            dry_run: self.dry_run,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    /// Directory holding *_rgt.bin cubes
    #[arg(long)]
    pub dir: PathBuf,

    /// Sample count reported when nothing is found
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub default_count: usize,

    /// Grid side reported when it cannot be inferred
    #[arg(long, default_value_t = DEFAULT_GRID_SIDE)]
    pub default_side: usize,
}
