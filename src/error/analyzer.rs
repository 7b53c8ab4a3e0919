use crate::environment::ScopeError;

/// Errors reported by static analysis. The first one aborts the pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
	#[error("Undefined variable '{0}'")]
	UndefinedVariable(String),
	#[error("Undefined function '{name}/{arity}'")]
	UndefinedFunction { name: String, arity: usize },
	#[error("Unknown type '{0}'")]
	UnknownType(String),
	#[error("Type '{ty}' has no field '{name}'")]
	UnknownField { ty: String, name: String },
	/// `arity` counts the receiver, as in the runtime lookup.
	#[error("Type '{ty}' has no method '{name}/{arity}'")]
	UnknownMethod { ty: String, name: String, arity: usize },
	#[error("Expected '{target}', received '{actual}'")]
	NotAssignable { target: String, actual: String },
	#[error("Operator '{operator}' cannot combine '{left}' and '{right}'")]
	InvalidOperands { operator: String, left: String, right: String },
	#[error("Unknown operator '{0}'")]
	UnknownOperator(String),
	#[error("Integer literal {0} does not fit in 32 bits")]
	IntegerOutOfRange(String),
	#[error("Decimal literal {0} does not fit in a 64-bit float")]
	DecimalOutOfRange(String),
	#[error("Grouped expression must be a binary expression")]
	GroupNotBinary,
	#[error("Assignment target must be an access expression")]
	InvalidAssignmentTarget,
	#[error("Expression statement must be a function call")]
	ExpressionStatementNotCall,
	#[error("Body of {0} statement is empty")]
	EmptyBody(&'static str),
	#[error("Declaration of '{0}' needs a type or an initializer")]
	UntypedDeclaration(String),
	#[error("No 'main/0' method defined")]
	MissingMain,
	#[error(transparent)]
	Scope(#[from] ScopeError),
}
