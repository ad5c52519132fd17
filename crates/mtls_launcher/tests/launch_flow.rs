use anyhow::Result;
use mtls_launcher::command::{Launcher, TrainCommand};
use mtls_launcher::config::TrainingParams;
use mtls_launcher::console::Console;
use mtls_launcher::dataset::{self, DatasetShape};
use mtls_launcher::prompt::StdioPrompter;
use mtls_launcher::wizard::{self, LaunchOptions, LaunchOutcome};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

fn write_cubes(dir: &Path, count: usize, side: u64) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for i in 0..count {
        File::create(dir.join(format!("sample{:03}_rgt.bin", i)))?.set_len(side * side * side * 4)?;
        File::create(dir.join(format!("sample{:03}_seis.bin", i)))?.set_len(side * side * side * 4)?;
    }
    Ok(())
}

#[test]
fn test_detected_dataset_reaches_command_line() -> Result<()> {
    let root = tempfile::tempdir()?;
    let train = root.path().join("data_train");
    let valid = root.path().join("data_valid");
    write_cubes(&train, 6, 32)?;
    write_cubes(&valid, 2, 32)?;

    assert_eq!(dataset::detect(&train, 1, 64), DatasetShape::new(6, 32));

    let base = TrainingParams {
        dir_data_train: train.to_string_lossy().to_string(),
        dir_data_valid: valid.to_string_lossy().to_string(),
        ..TrainingParams::default()
    };
    let defaults = TrainingParams::detected(base);

    // Accept every suggested default.
    let input = "\n".repeat(16);
    let mut prompter = StdioPrompter::new(Cursor::new(input.into_bytes()), Vec::new());
    let mut console = Console::new(Vec::new());

    let params = wizard::collect(&mut prompter, &mut console, &defaults)?
        .expect("wizard should not be cancelled");
    let cmd = TrainCommand::build(&Launcher::default(), &params);
    let line = cmd.display();
    assert!(line.contains("--n1 32 --n2 32 --n3 32 --ntrain 6 --nvalid 2"));

    let options = LaunchOptions {
        dry_run: true,
        ..LaunchOptions::default()
    };
    let outcome = wizard::launch(
        &mut prompter,
        &mut console,
        &Launcher::default(),
        Some(&params),
        options,
    )?;
    assert_eq!(outcome, LaunchOutcome::Deferred);

    let shown = String::from_utf8(console.into_inner())?;
    assert!(shown.contains(&line));
    Ok(())
}

#[test]
fn test_empty_validation_inherits_training_side() -> Result<()> {
    let root = tempfile::tempdir()?;
    let train = root.path().join("data_train");
    let valid = root.path().join("data_valid");
    write_cubes(&train, 3, 16)?;
    std::fs::create_dir_all(&valid)?;

    let params = TrainingParams::detected(TrainingParams {
        dir_data_train: train.to_string_lossy().to_string(),
        dir_data_valid: valid.to_string_lossy().to_string(),
        ..TrainingParams::default()
    });
    assert_eq!((params.n1, params.ntrain, params.nvalid), (16, 3, 1));
    Ok(())
}
