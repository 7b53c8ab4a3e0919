//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. The body of a `WHILE` loop is always a list of statements.

use std::rc::Rc;

use crate::parser::expression::{Expression, NodeId};

/// A statement in the programming language.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// An expression used as a statement.
	Expression(Expression),
	/// `LET name (: Type)? (= value)?;`
	Declaration(Declaration),
	/// `target = value;`, the target shape is checked by the analyzer.
	Assignment { target: Expression, value: Expression },
	If {
		condition: Expression,
		then_body: Vec<Statement>,
		else_body: Vec<Statement>,
	},
	For {
		name:     String,
		iterable: Expression,
		body:     Vec<Statement>,
	},
	While {
		condition: Expression,
		body:      Vec<Statement>,
	},
	/// A return statement.
	Return(Expression),
}

/// A variable declaration, either local or at the top of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
	pub id:          NodeId,
	pub name:        String,
	pub type_name:   Option<String>,
	pub initializer: Option<Expression>,
}

/// Global variables share the shape of local declarations.
pub type Field = Declaration;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
	pub name:      String,
	pub type_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub id:               NodeId,
	pub name:             String,
	pub parameters:       Vec<Parameter>,
	pub return_type_name: Option<String>,
	pub body:             Rc<Vec<Statement>>,
}

/// A whole program: globals first, then methods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Source {
	pub fields:  Vec<Field>,
	pub methods: Vec<Rc<Method>>,
}
