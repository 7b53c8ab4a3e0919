pub mod analyzer;
pub mod interpreter;
pub mod parser;
pub mod scanner;

/// PlcError is the top-level error type of the pipeline. Each stage fails fast,
/// so at most one of these is ever produced per run.
#[derive(thiserror::Error, Debug)]
pub enum PlcError {
	/// Failures outside the language itself, such as reading the source file
	#[error("InternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Lexing failed
	#[error("Lex error at {0}")]
	Lex(#[from] scanner::LexError),
	/// Parsing failed
	#[error("Parse error at {0}")]
	Parse(#[from] parser::ParseError),
	/// Static analysis rejected the program
	#[error("Semantic error: {0}")]
	Semantic(#[from] analyzer::SemanticError),
	/// Execution aborted
	#[error("Runtime error: {0}")]
	Runtime(#[from] interpreter::RuntimeError),
}
