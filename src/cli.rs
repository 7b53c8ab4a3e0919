use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "plcer",
	after_long_help = "Set PLC_LOG (e.g. PLC_LOG=debug) to trace the pipeline on stderr."
)]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Run a program, exiting with the value of its main method
	Run { path: PathBuf },
	/// Check a program without running it
	Check { path: PathBuf },
}
