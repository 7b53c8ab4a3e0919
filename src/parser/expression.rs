//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `x.f(1 + 2)` as
//! nested nodes. Nodes are plain data; the analyzer records what it learns about
//! them in a side table keyed by [`NodeId`] instead of writing back into the
//! tree.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// Identity of a node, unique within one parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
	pub id:   NodeId,
	pub kind: ExpressionKind,
}

/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
	Literal(LiteralValue),
	Group(Box<Expression>),
	Binary {
		/// The operator lexeme, e.g. `+` or `AND`.
		operator: String,
		left:     Box<Expression>,
		right:    Box<Expression>,
	},
	/// A variable, or a field when `receiver` is present.
	Access { receiver: Option<Box<Expression>>, name: String },
	/// A function call, or a method call when `receiver` is present.
	Function { receiver: Option<Box<Expression>>, name: String, arguments: Vec<Expression> },
}

/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	Nil,
	Boolean(bool),
	Character(char),
	String(String),
	Integer(BigInt),
	Decimal(BigDecimal),
}

impl Expression {
	pub fn new(id: NodeId, kind: ExpressionKind) -> Self { Self { id, kind } }

	pub fn is_binary(&self) -> bool { matches!(self.kind, ExpressionKind::Binary { .. }) }

	pub fn is_access(&self) -> bool { matches!(self.kind, ExpressionKind::Access { .. }) }

	pub fn is_function(&self) -> bool { matches!(self.kind, ExpressionKind::Function { .. }) }
}

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ExpressionKind::*;
		match &self.kind {
			Literal(lit) => write!(f, "{lit}"),
			Group(expression) => write!(f, "(group {expression})"),
			Binary { operator, left, right } => write!(f, "({operator} {left} {right})"),
			Access { receiver: None, name } => write!(f, "{name}"),
			Access { receiver: Some(receiver), name } => write!(f, "(get {receiver}.{name})"),
			Function { receiver, name, arguments } => {
				write!(f, "(call ")?;
				if let Some(receiver) = receiver {
					write!(f, "{receiver}.")?;
				}
				write!(f, "{name}")?;
				for argument in arguments {
					write!(f, " {argument}")?;
				}
				write!(f, ")")
			}
		}
	}
}

impl std::fmt::Display for LiteralValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralValue::Nil => write!(f, "NIL"),
			LiteralValue::Boolean(true) => write!(f, "TRUE"),
			LiteralValue::Boolean(false) => write!(f, "FALSE"),
			LiteralValue::Character(c) => write!(f, "{c:?}"),
			LiteralValue::String(s) => write!(f, "{s:?}"),
			LiteralValue::Integer(n) => write!(f, "{n}"),
			LiteralValue::Decimal(d) => write!(f, "{d}"),
		}
	}
}
