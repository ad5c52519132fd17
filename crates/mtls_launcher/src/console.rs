//! Output sink for everything the launcher shows the operator.
//!
//! Passed explicitly to whoever renders text; tests hand it a `Vec<u8>`.

use std::io::{self, Write};
use std::path::Path;

use crate::command::TrainCommand;
use crate::dataset::DatasetShape;

const BANNER: &str = r"
███╗   ███╗████████╗██╗     ███████╗
████╗ ████║╚══██╔══╝██║     ██╔════╝
██╔████╔██║   ██║   ██║     ███████╗
██║╚██╔╝██║   ██║   ██║     ╚════██║
██║ ╚═╝ ██║   ██║   ███████╗███████║
╚═╝     ╚═╝   ╚═╝   ╚══════╝╚══════╝
";

const TAGLINE: &str = "Multi-task learning and inference from seismic images";

pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out, "{}", TAGLINE)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Short reference for the three trainer outputs.
    pub fn parameter_reference(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "📖 Description of Parameters (Reference: Gao, 2024)")?;
        writeln!(
            self.out,
            "   RGT:   Relative stratigraphic time indicating horizon continuity."
        )?;
        writeln!(
            self.out,
            "   DHR:   Inferred high-frequency seismic with reduced noise."
        )?;
        writeln!(
            self.out,
            "   Fault: Geometrical characterization of discontinuities."
        )?;
        writeln!(self.out, "{}", "-".repeat(50))?;
        self.out.flush()
    }

    pub fn info(&mut self, msg: &str) -> io::Result<()> {
        self.line("ℹ️", msg)
    }

    pub fn success(&mut self, msg: &str) -> io::Result<()> {
        self.line("✅", msg)
    }

    pub fn warn(&mut self, msg: &str) -> io::Result<()> {
        self.line("⚠️", msg)
    }

    pub fn error(&mut self, msg: &str) -> io::Result<()> {
        self.line("❌", msg)
    }

    pub fn command_preview(&mut self, cmd: &TrainCommand) -> io::Result<()> {
        writeln!(self.out)?;
        self.line("🚀", "Ready to start training with the following command:")?;
        writeln!(self.out, "   {}", cmd.display())?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn dataset_shape(&mut self, dir: &Path, shape: DatasetShape) -> io::Result<()> {
        writeln!(self.out, "📂 {}", dir.display())?;
        writeln!(self.out, "   Samples:   {}", shape.sample_count)?;
        writeln!(self.out, "   Grid side: {}", shape.grid_side)?;
        self.out.flush()
    }

    fn line(&mut self, icon: &str, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", icon, msg)?;
        self.out.flush()
    }
}
