use std::{fs::read_to_string, io::Write, path::Path};

use anyhow::Context;
use num_bigint::BigInt;

use crate::{PlcError, analyzer::{Analyzed, analyze}, builtins::Builtins, interpreter::Interpreter, parser::parse, scanner::lex};

/// Plcer runs the whole pipeline: lex, parse, analyze, execute.
pub struct Plcer {
	builtins: Builtins,
}

impl Default for Plcer {
	fn default() -> Self { Self::new(Builtins::standard()) }
}

impl Plcer {
	/// Create a Plcer whose programs see the given natives.
	pub fn new(builtins: Builtins) -> Self { Self { builtins } }

	/// Run the source file at `path`, printing to stdout.
	pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<BigInt, PlcError> {
		let source = read_to_string(path).context("Failed open source file")?;
		let stdout = std::io::stdout();
		self.run(&source, &mut stdout.lock())
	}

	/// Check the source file at `path` without running it.
	pub fn check_file<P: AsRef<Path>>(&self, path: P) -> Result<Analyzed, PlcError> {
		let source = read_to_string(path).context("Failed open source file")?;
		self.check(&source)
	}

	/// Lex, parse and analyze `source`.
	pub fn check(&self, source: &str) -> Result<Analyzed, PlcError> {
		let tokens = {
			let _span = tracing::info_span!("lex").entered();
			lex(source)?
		};
		tracing::debug!(tokens = tokens.len(), "lexed");
		let parsed = {
			let _span = tracing::info_span!("parse").entered();
			parse(tokens)?
		};
		let _span = tracing::info_span!("analyze").entered();
		Ok(analyze(parsed, &self.builtins)?)
	}

	/// Run `source`, writing program output to `out`, and return the value of
	/// `main`.
	pub fn run<W: Write>(&self, source: &str, out: &mut W) -> Result<BigInt, PlcError> {
		let analyzed = self.check(source)?;
		let _span = tracing::info_span!("execute").entered();
		let result = Interpreter::new(&self.builtins, out)?.execute(&analyzed)?;
		out.flush().context("Failed flush program output")?;
		Ok(result)
	}
}
