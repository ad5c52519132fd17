use anyhow::Result;
use clap::Parser;
use mtls_launcher::cli::{Cli, Commands, LaunchArgs};
use mtls_launcher::console::Console;
use mtls_launcher::prompt::StdioPrompter;
use mtls_launcher::wizard::{self, LaunchOutcome};
use mtls_launcher::{command, dataset, logging};
use std::sync::{Arc, Mutex};
use tracing_appender::non_blocking::WorkerGuard;

/// Drop the file writer guard so buffered log lines reach disk before exit.
fn flush_logs(guard: &Mutex<Option<WorkerGuard>>) {
    if let Ok(mut guard) = guard.lock() {
        guard.take();
    }
}

fn main() -> Result<()> {
    // 1. Setup Logging (stderr + rolling file)
    let log_guard = Arc::new(Mutex::new(Some(logging::init())));

    // 2. Setup Panic Hook
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic"
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(target: "panic", "🔥 CRASH detected at {}: {}", location, msg);
        eprintln!("🔥 CRASH detected at {}: {}", location, msg);
    }));

    // 3. Ctrl+C: the trainer gets the signal too, so while it runs we wait for it
    let handler_guard = log_guard.clone();
    ctrlc::set_handler(move || {
        if command::trainer_active() {
            tracing::warn!("Ctrl+C received, waiting for the trainer to stop...");
            return;
        }
        println!("\n❌ Interrupted by user.");
        tracing::info!("Interrupted by user.");
        flush_logs(&handler_guard);
        std::process::exit(0);
    })?;

    tracing::info!("🚀 MTLS launcher started.");

    let result = run(Cli::parse());
    match &result {
        Ok(outcome) => tracing::info!("Session finished: {:?}", outcome),
        Err(e) => tracing::error!("Session failed: {:#}", e),
    }
    // The interrupt handler holds a clone, so the guard must be released here.
    flush_logs(&log_guard);

    if let Some(LaunchOutcome::Failed(code)) = result? {
        std::process::exit(code);
    }
    Ok(())
}

/// Dispatch the subcommand; `None` when nothing was launched.
fn run(cli: Cli) -> Result<Option<LaunchOutcome>> {
    let mut console = Console::stdout();
    let mut prompter = StdioPrompter::stdio();

    let outcome = match cli.command {
        None => wizard::setup(&mut prompter, &mut console, &LaunchArgs::default())?,
        Some(Commands::Setup(args)) => wizard::setup(&mut prompter, &mut console, &args)?,
        Some(Commands::Wizard(args)) => {
            console.banner()?;
            wizard::interactive(&mut prompter, &mut console, &args)?
        }
        Some(Commands::Run(args)) => wizard::with_defaults(&mut prompter, &mut console, &args)?,
        Some(Commands::Detect(args)) => {
            let shape = dataset::detect(&args.dir, args.default_count, args.default_side);
            console.dataset_shape(&args.dir, shape)?;
            return Ok(None);
        }
    };
    Ok(Some(outcome))
}
