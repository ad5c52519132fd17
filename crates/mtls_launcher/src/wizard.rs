//! Interactive setup: ask for every training parameter, preview the trainer
//! command, then run it or leave it for later.

use anyhow::Result;
use std::io::Write;
use tracing::info;

use crate::cli::LaunchArgs;
use crate::command::{LaunchError, Launcher, TrainCommand};
use crate::config::TrainingParams;
use crate::console::Console;
use crate::prompt::Prompter;

/// Unwraps an answer, bailing out with `Ok(None)` when the prompt was cancelled.
macro_rules! ask {
    ($answer:expr) => {
        match $answer? {
            Some(value) => value,
            None => return Ok(None),
        }
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchOptions {
    /// Start without the "Start now?" confirmation.
    pub assume_yes: bool,
    /// Only print the command.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Setup was aborted before a command was built.
    Cancelled,
    /// Command shown but not executed.
    Deferred,
    Completed,
    Failed(i32),
}

/// Ask for all parameters, offering `defaults` for each.
///
/// Returns `None` if the operator cancels any prompt.
pub fn collect<P: Prompter, W: Write>(
    prompter: &mut P,
    console: &mut Console<W>,
    defaults: &TrainingParams,
) -> Result<Option<TrainingParams>> {
    console.parameter_reference()?;

    let dir_data_train = ask!(prompter.text(
        "Training data directory:",
        &defaults.dir_data_train,
        "Path to the binary cubes for training input.",
    ));
    let dir_target_train = ask!(prompter.text(
        "Training target directory:",
        &defaults.dir_target_train,
        "Path to the ground truth binary cubes.",
    ));
    let dir_data_valid = ask!(prompter.text(
        "Validation data directory:",
        &defaults.dir_data_valid,
        "Path to the binary cubes for validation.",
    ));
    let dir_target_valid = ask!(prompter.text(
        "Validation target directory:",
        &defaults.dir_target_valid,
        "Path to the ground truth binary cubes for validation.",
    ));
    let dir_output = ask!(prompter.text(
        "Output directory for models/plots:",
        &defaults.dir_output,
        "Where to store .ckpt, .pth, and loss plots.",
    ));

    let n1 = ask!(ask_count(
        prompter,
        "Dimension n1 (Z):",
        defaults.n1,
        "Vertical sampling points.",
    ));
    let n2 = ask!(ask_count(
        prompter,
        "Dimension n2 (Y):",
        defaults.n2,
        "Cross-line sampling points.",
    ));
    let n3 = ask!(ask_count(
        prompter,
        "Dimension n3 (X):",
        defaults.n3,
        "In-line sampling points.",
    ));
    let ntrain = ask!(ask_count(
        prompter,
        "Training set size:",
        defaults.ntrain,
        "Number of training samples.",
    ));
    let nvalid = ask!(ask_count(
        prompter,
        "Validation set size:",
        defaults.nvalid,
        "Number of validation samples.",
    ));
    let epochs = ask!(ask_count(
        prompter,
        "Number of epochs:",
        defaults.epochs,
        "Total training cycles.",
    ));
    let batch_train = ask!(ask_count(
        prompter,
        "Batch size:",
        defaults.batch_train,
        "Number of samples per training step.",
    ));

    let use_gpu = ask!(prompter.confirm("Use GPU if available?", defaults.use_gpu));
    let rgt = ask!(prompter.confirm("Enable Relative Geological Time (RGT)?", defaults.rgt));
    let dhr = ask!(prompter.confirm("Enable Denoised Higher-Resolution (DHR)?", defaults.dhr));
    let fault = ask!(prompter.confirm("Enable Fault Attributes?", defaults.fault));

    Ok(Some(TrainingParams {
        dir_data_train,
        dir_target_train,
        dir_data_valid,
        dir_target_valid,
        dir_output,
        n1,
        n2,
        n3,
        ntrain,
        nvalid,
        epochs,
        batch_train,
        use_gpu,
        rgt,
        dhr,
        fault,
    }))
}

/// Positive integer prompt; re-asks until the answer parses.
fn ask_count<P: Prompter>(
    prompter: &mut P,
    message: &str,
    default: usize,
    instruction: &str,
) -> Result<Option<usize>> {
    let default = default.to_string();
    loop {
        let Some(answer) = prompter.text(message, &default, instruction)? else {
            return Ok(None);
        };
        match answer.parse::<usize>() {
            Ok(n) if n > 0 => return Ok(Some(n)),
            _ => prompter.reject(&format!("'{}' is not a positive integer.", answer))?,
        }
    }
}

/// Preview the trainer command for `params` and run it once confirmed.
///
/// A non-zero trainer exit is reported and returned as an outcome; only a
/// failure to start the trainer at all is an error.
pub fn launch<P: Prompter, W: Write>(
    prompter: &mut P,
    console: &mut Console<W>,
    launcher: &Launcher,
    params: Option<&TrainingParams>,
    options: LaunchOptions,
) -> Result<LaunchOutcome> {
    let Some(params) = params else {
        console.error("Training cancelled.")?;
        return Ok(LaunchOutcome::Cancelled);
    };

    let cmd = TrainCommand::build(launcher, params);
    console.command_preview(&cmd)?;

    if options.dry_run {
        console.info("Dry run: command not executed.")?;
        return Ok(LaunchOutcome::Deferred);
    }

    let start = options.assume_yes || prompter.confirm("Start now?", true)? == Some(true);
    if !start {
        console.warn("Command shown above. You can run it manually later.")?;
        return Ok(LaunchOutcome::Deferred);
    }

    info!("Starting training: {}", cmd.display());
    match cmd.run() {
        Ok(()) => {
            console.success("Training finished.")?;
            Ok(LaunchOutcome::Completed)
        }
        Err(LaunchError::Failed { code }) => {
            console.error(&format!("Training failed with exit code {}", code))?;
            Ok(LaunchOutcome::Failed(code))
        }
        Err(e) => Err(e.into()),
    }
}

/// Default entry: offer the wizard, fall back to the defaults when declined.
pub fn setup<P: Prompter, W: Write>(
    prompter: &mut P,
    console: &mut Console<W>,
    args: &LaunchArgs,
) -> Result<LaunchOutcome> {
    console.banner()?;
    match prompter.confirm("Proceed with interactive setup?", true)? {
        Some(true) => interactive(prompter, console, args),
        Some(false) => {
            console.warn("Running with default parameters as requested...")?;
            with_defaults(prompter, console, args)
        }
        None => launch(prompter, console, &args.launcher(), None, args.options()),
    }
}

/// Ask every parameter, then launch.
pub fn interactive<P: Prompter, W: Write>(
    prompter: &mut P,
    console: &mut Console<W>,
    args: &LaunchArgs,
) -> Result<LaunchOutcome> {
    let defaults = starting_params(args)?;
    let params = collect(prompter, console, &defaults)?;
    finish(prompter, console, args, params)
}

/// Launch with the starting parameters as they are.
pub fn with_defaults<P: Prompter, W: Write>(
    prompter: &mut P,
    console: &mut Console<W>,
    args: &LaunchArgs,
) -> Result<LaunchOutcome> {
    let params = starting_params(args)?;
    finish(prompter, console, args, Some(params))
}

/// Parameters from `--config` if given, otherwise detected from disk.
pub fn starting_params(args: &LaunchArgs) -> Result<TrainingParams> {
    match &args.config {
        Some(path) => {
            info!("Loading parameters from {:?}", path);
            TrainingParams::load(path)
        }
        None => Ok(TrainingParams::detected(TrainingParams::default())),
    }
}

fn finish<P: Prompter, W: Write>(
    prompter: &mut P,
    console: &mut Console<W>,
    args: &LaunchArgs,
    params: Option<TrainingParams>,
) -> Result<LaunchOutcome> {
    if let (Some(params), Some(path)) = (&params, &args.save_config) {
        params.save(path)?;
        console.success(&format!("Parameters saved to {}", path.display()))?;
    }
    launch(
        prompter,
        console,
        &args.launcher(),
        params.as_ref(),
        args.options(),
    )
}
