use std::process::ExitCode;

use num_traits::ToPrimitive;
use palc::Parser;
use plcer::{Builtins, Plcer, builtins, cli::*};
use tracing_subscriber::EnvFilter;

const PIPELINE_STACK_SIZE: usize = 64 * 1024 * 1024;

fn main() -> ExitCode {
	// Logging goes to stderr so program output on stdout stays clean.
	if let Ok(filter) = EnvFilter::try_from_env("PLC_LOG") {
		tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
	}

	let mode = Cli::parse().mode;
	// Program methods may nest up to MAX_CALL_DEPTH calls deep.
	let worker = std::thread::Builder::new().stack_size(PIPELINE_STACK_SIZE).spawn(move || dispatch(mode));
	match worker.map(|handle| handle.join()) {
		Ok(Ok(code)) => code,
		Ok(Err(_)) => ExitCode::FAILURE,
		Err(e) => {
			eprintln!("Failed start interpreter thread: {e}");
			ExitCode::FAILURE
		}
	}
}

fn dispatch(mode: Mode) -> ExitCode {
	let mut natives = Builtins::standard();
	natives.register(builtins::range());
	let plcer = Plcer::new(natives);

	match mode {
		Mode::Run { path } => match plcer.run_file(&path) {
			Ok(result) => match result.to_i32() {
				Some(code) => ExitCode::from(code as u8),
				None => {
					eprintln!("Failed run file: main returned {result}, outside the exit code range");
					ExitCode::FAILURE
				}
			},
			Err(e) => {
				eprintln!("Failed run file: {e}");
				ExitCode::FAILURE
			}
		},
		Mode::Check { path } => match plcer.check_file(&path) {
			Ok(_) => {
				println!("ok");
				ExitCode::SUCCESS
			}
			Err(e) => {
				eprintln!("Failed check file: {e}");
				ExitCode::FAILURE
			}
		},
	}
}
