//! Scope chains shared by the analyzer and the interpreter.
//!
//! Scopes live in an arena and refer to each other by index. Each frame keeps
//! two links: `parent` is where name lookup continues (the static link) and
//! `previous` is the frame that was current before it was pushed (the dynamic
//! link). For a block both links are the same frame; for a call the parent is
//! the callee's closure scope while `previous` is the caller's frame.
//!
//! Frames are pushed and popped in strict stack order, so popping always
//! discards the last frame of the arena.

pub mod types;

use std::collections::HashMap;

/// Index of a frame in a [`Scopes`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
	#[error("Variable '{0}' is already defined in this scope")]
	VariableAlreadyDefined(String),
	#[error("Function '{name}/{arity}' is already defined in this scope")]
	FunctionAlreadyDefined { name: String, arity: usize },
}

#[derive(Debug)]
struct Frame<V, F> {
	parent:    Option<ScopeId>,
	previous:  Option<ScopeId>,
	variables: HashMap<String, V>,
	/// Functions are overloaded by arity only.
	functions: HashMap<(String, usize), F>,
}

impl<V, F> Frame<V, F> {
	fn new(parent: Option<ScopeId>, previous: Option<ScopeId>) -> Self {
		Self { parent, previous, variables: HashMap::new(), functions: HashMap::new() }
	}
}

/// A stack of scopes holding variables of type `V` and functions of type `F`.
#[derive(Debug)]
pub struct Scopes<V, F> {
	frames:  Vec<Frame<V, F>>,
	current: ScopeId,
}

impl<V, F> Default for Scopes<V, F> {
	fn default() -> Self { Self::new() }
}

impl<V, F> Scopes<V, F> {
	/// Create the arena with only the global scope in it.
	pub fn new() -> Self { Self { frames: vec![Frame::new(None, None)], current: ScopeId(0) } }

	pub fn global(&self) -> ScopeId { ScopeId(0) }

	pub fn current(&self) -> ScopeId { self.current }

	/// Number of live frames, the global one included.
	pub fn depth(&self) -> usize { self.frames.len() }

	/// Enter a block scope nested in the current one.
	pub fn push(&mut self) { self.push_child_of(self.current) }

	/// Enter a scope whose names resolve through `parent`, e.g. a call frame
	/// whose parent is the callee's closure scope.
	pub fn push_child_of(&mut self, parent: ScopeId) {
		self.frames.push(Frame::new(Some(parent), Some(self.current)));
		self.current = ScopeId(self.frames.len() - 1);
		tracing::trace!(depth = self.frames.len(), "push scope");
	}

	/// Leave the current scope and return to the frame that was current before
	/// it. The global scope is never popped.
	pub fn pop(&mut self) {
		debug_assert_eq!(self.current.0, self.frames.len() - 1, "scopes popped out of order");
		if self.frames.len() == 1 {
			return;
		}
		if let Some(frame) = self.frames.pop() {
			self.current = frame.previous.unwrap_or(ScopeId(0));
			tracing::trace!(depth = self.frames.len(), "pop scope");
		}
	}

	/// Define a variable in the current scope. Shadowing an outer scope is
	/// allowed, redefining in the same scope is not.
	pub fn define_variable(&mut self, name: &str, value: V) -> Result<(), ScopeError> {
		let frame = &mut self.frames[self.current.0];
		if frame.variables.contains_key(name) {
			return Err(ScopeError::VariableAlreadyDefined(name.to_string()));
		}
		frame.variables.insert(name.to_string(), value);
		Ok(())
	}

	/// Define a function in the current scope, keyed by name and arity.
	pub fn define_function(&mut self, name: &str, arity: usize, function: F) -> Result<(), ScopeError> {
		let frame = &mut self.frames[self.current.0];
		let key = (name.to_string(), arity);
		if frame.functions.contains_key(&key) {
			return Err(ScopeError::FunctionAlreadyDefined { name: name.to_string(), arity });
		}
		frame.functions.insert(key, function);
		Ok(())
	}

	/// Replace a function already defined in the current scope, or define it.
	pub fn redefine_function(&mut self, name: &str, arity: usize, function: F) {
		self.frames[self.current.0].functions.insert((name.to_string(), arity), function);
	}

	/// Look a variable up through the parent chain.
	pub fn variable(&self, name: &str) -> Option<&V> {
		self.chain().find_map(|index| self.frames[index].variables.get(name))
	}

	pub fn variable_mut(&mut self, name: &str) -> Option<&mut V> {
		let index = self.chain().find(|&index| self.frames[index].variables.contains_key(name))?;
		self.frames[index].variables.get_mut(name)
	}

	/// Look a function up through the parent chain by name and arity.
	pub fn function(&self, name: &str, arity: usize) -> Option<&F> {
		let key = (name.to_string(), arity);
		self.chain().find_map(|index| self.frames[index].functions.get(&key))
	}

	/// Frame indices from the current scope up to the global one.
	fn chain(&self) -> impl Iterator<Item = usize> + '_ {
		std::iter::successors(Some(self.current), |id| self.frames[id.0].parent).map(|id| id.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	type TestScopes = Scopes<i32, &'static str>;

	#[test]
	fn test_define_and_lookup() {
		let mut scopes = TestScopes::new();
		scopes.define_variable("x", 1).unwrap();
		scopes.define_function("f", 0, "f/0").unwrap();
		scopes.define_function("f", 1, "f/1").unwrap();

		assert_eq!(scopes.variable("x"), Some(&1));
		assert_eq!(scopes.variable("y"), None);
		assert_eq!(scopes.function("f", 0), Some(&"f/0"));
		assert_eq!(scopes.function("f", 1), Some(&"f/1"));
		assert_eq!(scopes.function("f", 2), None);
	}

	#[test]
	fn test_redefinition() {
		let mut scopes = TestScopes::new();
		scopes.define_variable("x", 1).unwrap();
		assert_eq!(scopes.define_variable("x", 2), Err(ScopeError::VariableAlreadyDefined("x".into())));
		scopes.define_function("f", 0, "a").unwrap();
		assert_eq!(
			scopes.define_function("f", 0, "b"),
			Err(ScopeError::FunctionAlreadyDefined { name: "f".into(), arity: 0 })
		);
		scopes.redefine_function("f", 0, "b");
		assert_eq!(scopes.function("f", 0), Some(&"b"));
	}

	#[test]
	fn test_shadowing() {
		let mut scopes = TestScopes::new();
		scopes.define_variable("x", 1).unwrap();
		scopes.push();
		scopes.define_variable("x", 2).unwrap();
		assert_eq!(scopes.variable("x"), Some(&2));
		*scopes.variable_mut("x").unwrap() = 3;
		scopes.pop();
		assert_eq!(scopes.variable("x"), Some(&1));
	}

	#[test]
	fn test_assign_through_parent() {
		let mut scopes = TestScopes::new();
		scopes.define_variable("x", 1).unwrap();
		scopes.push();
		scopes.push();
		*scopes.variable_mut("x").unwrap() = 5;
		scopes.pop();
		scopes.pop();
		assert_eq!(scopes.variable("x"), Some(&5));
		assert_eq!(scopes.depth(), 1);
	}

	#[test]
	fn test_call_frame_skips_caller() {
		let mut scopes = TestScopes::new();
		scopes.define_variable("global", 0).unwrap();
		scopes.push();
		scopes.define_variable("local", 1).unwrap();
		let caller = scopes.current();

		// A call frame resolves through the closure scope, not the caller.
		scopes.push_child_of(scopes.global());
		assert_eq!(scopes.variable("global"), Some(&0));
		assert_eq!(scopes.variable("local"), None);
		scopes.pop();

		assert_eq!(scopes.current(), caller);
		assert_eq!(scopes.variable("local"), Some(&1));
	}

	#[test]
	fn test_global_is_never_popped() {
		let mut scopes = TestScopes::new();
		scopes.define_variable("x", 1).unwrap();
		scopes.pop();
		assert_eq!(scopes.current(), scopes.global());
		assert_eq!(scopes.variable("x"), Some(&1));
	}
}
