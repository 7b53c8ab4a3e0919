use std::collections::HashMap;

use crate::{environment::types::{FunctionType, Type}, parser::expression::NodeId, statement::Source};

/// A variable as the analyzer resolved it.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
	pub name: String,
	pub ty:   Type,
}

/// A function as the analyzer resolved it. For methods of object types the
/// receiver is parameter 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBinding {
	pub name: String,
	pub ty:   FunctionType,
}

/// Everything the analyzer learned about a source, keyed by node.
///
/// - every expression has a type
/// - every access, field and declaration has a variable binding
/// - every call and method has a function binding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
	pub(super) types:     HashMap<NodeId, Type>,
	pub(super) variables: HashMap<NodeId, VariableBinding>,
	pub(super) functions: HashMap<NodeId, FunctionBinding>,
}

impl Analysis {
	pub fn type_of(&self, id: NodeId) -> Option<&Type> { self.types.get(&id) }

	pub fn variable(&self, id: NodeId) -> Option<&VariableBinding> { self.variables.get(&id) }

	pub fn function(&self, id: NodeId) -> Option<&FunctionBinding> { self.functions.get(&id) }

	/// Number of expressions that were given a type.
	pub fn typed_expressions(&self) -> usize { self.types.len() }
}

/// A source together with its analysis. Only analyzed sources can be executed.
#[derive(Debug, Clone)]
pub struct Analyzed {
	pub source:   Source,
	pub analysis: Analysis,
}
