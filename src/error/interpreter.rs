use crate::environment::ScopeError;

/// Errors that can occur during interpretation.
///
/// Apart from `DivisionByZero` and `Output`, none of these should surface for a
/// program the analyzer accepted.
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
	/// Integer or decimal division with a zero divisor.
	#[error("Division by zero")]
	DivisionByZero,
	/// Error for operand kinds an operator does not support
	#[error("Invalid binary operation: {left} {operator} {right}")]
	BinaryOperationError { operator: String, left: String, right: String },
	/// A native received argument kinds outside its signature.
	#[error("Invalid arguments to '{name}': {received}")]
	InvalidArguments { name: String, received: String },
	#[error("Expected Boolean, received {0}")]
	ExpectedBoolean(String),
	#[error("Value of type {0} is not iterable")]
	NotIterable(String),
	#[error("Undefined variable '{0}'")]
	UndefinedVariable(String),
	#[error("Undefined function '{name}/{arity}'")]
	UndefinedFunction { name: String, arity: usize },
	#[error("Value of type {ty} has no field '{name}'")]
	UndefinedField { ty: String, name: String },
	#[error("Value of type {ty} has no method '{name}/{arity}'")]
	UndefinedMethod { ty: String, name: String, arity: usize },
	#[error("Cannot assign to {0}")]
	InvalidAssignmentTarget(String),
	/// Program methods nested deeper than the interpreter allows.
	#[error("Calling '{name}' would nest more than {limit} calls")]
	CallDepthExceeded { name: String, limit: usize },
	#[error("main returned {0} instead of an Integer")]
	NonIntegerResult(String),
	#[error("Failed to write program output: {0}")]
	Output(#[from] std::io::Error),
	#[error(transparent)]
	Scope(#[from] ScopeError),
}
