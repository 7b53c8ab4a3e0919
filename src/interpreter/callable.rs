use std::{fmt::Debug, rc::Rc};

use crate::{builtins::NativeFn, statement::Method};

/// What a name bound in a runtime scope can be called as.
#[derive(Clone)]
pub(crate) enum Callable {
	Native(NativeFn),
	/// A method of the program; its closure scope is the global scope.
	Plc(Rc<Method>),
}

impl Debug for Callable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Native(_) => f.debug_tuple("Native").field(&"Function Pointer").finish(),
			Self::Plc(method) => f.debug_tuple("Plc").field(&method.name).finish(),
		}
	}
}

/// How a statement list finished.
#[derive(Debug)]
pub(crate) enum Completion {
	Normal,
	/// A `RETURN` unwinding to the enclosing call.
	Return(super::value::Value),
}
