//! Trainer command line and process dispatch.

use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{error, info};

use crate::config::TrainingParams;

pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_SCRIPT: &str = "src/main3_refine.py";

/// Set while a trainer process runs in the foreground.
static TRAINER_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether a trainer process is currently running.
///
/// Ctrl+C reaches the trainer too, so the interrupt handler leaves the exit
/// to it and lets `run` report the outcome.
pub fn trainer_active() -> bool {
    TRAINER_ACTIVE.load(Ordering::SeqCst)
}

/// Raises a flag for as long as it lives.
struct ActiveFlag<'a>(&'a AtomicBool);

impl<'a> ActiveFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ActiveFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("training failed with exit code {code}")]
    Failed { code: i32 },
    #[error("training was terminated by a signal")]
    Terminated,
}

/// Which program runs the trainer.
#[derive(Debug, Clone, PartialEq)]
pub struct Launcher {
    pub interpreter: String,
    pub script: String,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainCommand {
    program: String,
    args: Vec<String>,
}

impl TrainCommand {
    pub fn build(launcher: &Launcher, params: &TrainingParams) -> Self {
        let mut args = vec![launcher.script.clone()];

        let mut flag = |name: &str, value: String| {
            args.push(format!("--{}", name));
            args.push(value);
        };

        flag("dir_data_train", params.dir_data_train.clone());
        flag("dir_target_train", params.dir_target_train.clone());
        flag("dir_data_valid", params.dir_data_valid.clone());
        flag("dir_target_valid", params.dir_target_valid.clone());
        flag("dir_output", params.dir_output.clone());
        flag("n1", params.n1.to_string());
        flag("n2", params.n2.to_string());
        flag("n3", params.n3.to_string());
        flag("ntrain", params.ntrain.to_string());
        flag("nvalid", params.nvalid.to_string());
        flag("epochs", params.epochs.to_string());
        flag("batch_train", params.batch_train.to_string());
        flag("gpus_per_node", String::from(if params.use_gpu { "1" } else { "0" }));
        flag("rgt", yes_no(params.rgt));
        flag("dhr", yes_no(params.dhr));
        flag("fault", yes_no(params.fault));

        Self {
            program: launcher.interpreter.clone(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Shell-like rendering for the operator, not re-quoted.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Run the trainer in the foreground with inherited stdio.
    pub fn run(&self) -> Result<(), LaunchError> {
        info!("$ {}", self.display());

        let _active = ActiveFlag::raise(&TRAINER_ACTIVE);
        let status = self
            .to_command()
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        check_status(status)
    }
}

fn check_status(status: ExitStatus) -> Result<(), LaunchError> {
    if status.success() {
        info!("Training finished successfully.");
        return Ok(());
    }
    match status.code() {
        Some(code) => {
            error!("Training exited with code {}", code);
            Err(LaunchError::Failed { code })
        }
        None => {
            error!("Training terminated: {}", status);
            Err(LaunchError::Terminated)
        }
    }
}

fn yes_no(flag: bool) -> String {
    let answer = if flag { "y" } else { "n" };
    answer.to_string()
}
