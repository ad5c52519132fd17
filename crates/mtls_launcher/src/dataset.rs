//! Dataset Shape Detection
//!
//! Infers how many labelled cubes a directory holds and their common grid
//! side from the `*_rgt.bin` files in it. Detection never fails: every
//! problem collapses to the defaults supplied by the caller.

use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name suffix shared by every labelled sample volume.
pub const SAMPLE_SUFFIX: &str = "_rgt.bin";

/// Bytes per grid element (raw f32).
const ELEMENT_BYTES: u64 = 4;

/// Sample count and cubic grid side of a dataset directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetShape {
    pub sample_count: usize,
    pub grid_side: usize,
}

impl DatasetShape {
    pub fn new(sample_count: usize, grid_side: usize) -> Self {
        Self {
            sample_count,
            grid_side,
        }
    }
}

impl From<DatasetShape> for (usize, usize) {
    fn from(shape: DatasetShape) -> Self {
        (shape.sample_count, shape.grid_side)
    }
}

/// Detect the shape of the dataset stored in `dir`.
///
/// The sample count is the number of `*_rgt.bin` entries; the grid side is
/// taken from the size of the first one, and only when that size is exactly
/// `n^3 * 4` bytes. Anything else keeps the corresponding default, and any
/// I/O failure while scanning returns both defaults.
pub fn detect(dir: impl AsRef<Path>, default_count: usize, default_side: usize) -> DatasetShape {
    let dir = dir.as_ref();
    let defaults = DatasetShape::new(default_count, default_side);

    if !dir.exists() {
        debug!("Dataset directory {:?} not found, using defaults", dir);
        return defaults;
    }

    match scan(dir, defaults) {
        Ok(shape) => shape,
        Err(e) => {
            debug!("Dataset detection failed for {:?}: {:#}", dir, e);
            defaults
        }
    }
}

fn scan(dir: &Path, defaults: DatasetShape) -> Result<DatasetShape> {
    let files = sample_files(dir)?;
    let Some(first) = files.first() else {
        debug!("No *{} files in {:?}", SAMPLE_SUFFIX, dir);
        return Ok(defaults);
    };

    let size_bytes = std::fs::metadata(first)
        .with_context(|| format!("Failed to stat {:?}", first))?
        .len();

    let grid_side = match cube_side(size_bytes) {
        Some(n) => n,
        None => {
            debug!(
                "{:?} ({} bytes) is not an f32 cube, keeping grid side {}",
                first, size_bytes, defaults.grid_side
            );
            defaults.grid_side
        }
    };

    Ok(DatasetShape::new(files.len(), grid_side))
}

/// List the `*_rgt.bin` entries of `dir` in discovery order.
pub fn sample_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_str = dir
        .to_str()
        .with_context(|| format!("Dataset path {:?} is not valid UTF-8", dir))?;

    // Brackets and wildcards in the directory itself must match literally.
    let pattern = Path::new(&Pattern::escape(dir_str)).join(format!("*{}", SAMPLE_SUFFIX));
    let pattern = pattern.to_string_lossy();

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: true,
    };

    glob_with(&pattern, options)
        .with_context(|| format!("Invalid sample pattern '{}'", pattern))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list samples in {:?}", dir))
}

/// Side length `n` of an f32 cube occupying `size_bytes`, if it is one.
pub fn cube_side(size_bytes: u64) -> Option<usize> {
    if size_bytes % ELEMENT_BYTES != 0 {
        return None;
    }
    let elements = size_bytes / ELEMENT_BYTES;
    if elements == 0 {
        return None;
    }

    // f64 cbrt can be off by one for huge sizes; the exact check settles it.
    let estimate = (elements as f64).cbrt().round() as u64;
    (estimate.saturating_sub(1)..=estimate + 1)
        .find(|&n| n.checked_pow(3) == Some(elements))
        .and_then(|n| usize::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn sample(dir: &Path, name: &str, size: u64) -> Result<()> {
        let file = File::create(dir.join(name))?;
        file.set_len(size)?;
        Ok(())
    }

    #[test]
    fn test_missing_directory_returns_defaults() {
        let shape = detect("/does/not/exist", 5, 32);
        assert_eq!(shape, DatasetShape::new(5, 32));
        assert_eq!(<(usize, usize)>::from(shape), (5, 32));
    }

    #[test]
    fn test_empty_directory_returns_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "notes.txt", 128)?;
        sample(dir.path(), "a_data.bin", 1_048_576)?;

        assert_eq!(detect(dir.path(), 3, 48), DatasetShape::new(3, 48));
        Ok(())
    }

    #[test]
    fn test_single_exact_cube() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "a_rgt.bin", 64 * 64 * 64 * 4)?;

        assert_eq!(detect(dir.path(), 7, 128), DatasetShape::new(1, 64));
        Ok(())
    }

    #[test]
    fn test_many_samples_counted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for i in 0..10 {
            sample(dir.path(), &format!("{}_rgt.bin", i), 32 * 32 * 32 * 4)?;
        }
        // Inputs and targets often share the folder; only *_rgt.bin counts.
        sample(dir.path(), "0_seis.bin", 32 * 32 * 32 * 4)?;

        assert_eq!(detect(dir.path(), 1, 64), DatasetShape::new(10, 32));
        Ok(())
    }

    #[test]
    fn test_non_cubic_size_keeps_default_side() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "a_rgt.bin", 1_000)?;
        sample(dir.path(), "b_rgt.bin", 1_000)?;

        assert_eq!(detect(dir.path(), 1, 64), DatasetShape::new(2, 64));
        Ok(())
    }

    #[test]
    fn test_size_not_multiple_of_element() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "a_rgt.bin", 8 * 8 * 8 * 4 + 2)?;

        assert_eq!(detect(dir.path(), 1, 16), DatasetShape::new(1, 16));
        Ok(())
    }

    #[test]
    fn test_empty_file_keeps_default_side() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "a_rgt.bin", 0)?;

        assert_eq!(detect(dir.path(), 9, 64), DatasetShape::new(1, 64));
        Ok(())
    }

    #[test]
    fn test_detection_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "x_rgt.bin", 16 * 16 * 16 * 4)?;
        sample(dir.path(), "y_rgt.bin", 16 * 16 * 16 * 4)?;

        let first = detect(dir.path(), 1, 64);
        let second = detect(dir.path(), 1, 64);
        assert_eq!(first, second);
        assert_eq!(first, DatasetShape::new(2, 16));
        Ok(())
    }

    #[test]
    fn test_hidden_files_are_ignored() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), ".partial_rgt.bin", 4)?;

        assert_eq!(detect(dir.path(), 2, 64), DatasetShape::new(2, 64));
        Ok(())
    }

    #[test]
    fn test_directory_name_with_glob_metacharacters() -> Result<()> {
        let root = tempfile::tempdir()?;
        let dir = root.path().join("run[1]");
        std::fs::create_dir(&dir)?;
        sample(&dir, "a_rgt.bin", 4 * 4 * 4 * 4)?;

        assert_eq!(detect(&dir, 1, 64), DatasetShape::new(1, 4));
        Ok(())
    }

    #[test]
    fn test_file_path_instead_of_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "a_rgt.bin", 64)?;

        assert_eq!(
            detect(dir.path().join("a_rgt.bin"), 4, 8),
            DatasetShape::new(4, 8)
        );
        Ok(())
    }

    #[test]
    fn test_cube_side() {
        assert_eq!(cube_side(4), Some(1));
        assert_eq!(cube_side(64 * 64 * 64 * 4), Some(64));
        assert_eq!(cube_side(1_000), None);
        assert_eq!(cube_side(0), None);
        assert_eq!(cube_side(3), None);

        let big: u64 = 1_600_000;
        assert_eq!(cube_side(big * big * big * 4), Some(big as usize));
        assert_eq!(cube_side((big * big * big - 1) * 4), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_sample_returns_both_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        sample(dir.path(), "a_rgt.bin", 4 * 4 * 4 * 4)?;
        // Sorts first and cannot be stat'ed.
        std::os::unix::fs::symlink(dir.path().join("gone.bin"), dir.path().join("0_rgt.bin"))?;

        assert_eq!(detect(dir.path(), 9, 77), DatasetShape::new(9, 77));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_returns_both_defaults() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir()?;
        let dir = root.path().join(OsStr::from_bytes(b"cubes\xff"));
        std::fs::create_dir(&dir)?;
        sample(&dir, "a_rgt.bin", 4 * 4 * 4 * 4)?;

        assert_eq!(detect(&dir, 3, 5), DatasetShape::new(3, 5));
        Ok(())
    }
}
