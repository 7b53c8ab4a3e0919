//! Native functions and object types made available to programs.
//!
//! This is the only extension seam of the language: everything a program can
//! call besides its own methods is registered here before analysis starts, and
//! both the analyzer and the interpreter read the same registry.

use std::{fmt::Debug, io::Write, rc::Rc};

use crate::{environment::types::{FunctionType, ObjectType, Type}, error::interpreter::RuntimeError, interpreter::value::Value};

/// What a native may touch while it runs.
pub struct NativeContext<'a> {
	/// Where `print` writes.
	pub out: &'a mut dyn Write,
}

pub type NativeFn = Rc<dyn Fn(&mut NativeContext<'_>, &[Value]) -> Result<Value, RuntimeError>>;

/// A function implemented in Rust together with its static signature.
#[derive(Clone)]
pub struct Native {
	pub name: String,
	pub ty:   FunctionType,
	pub call: NativeFn,
}

impl Native {
	pub fn new(
		name: impl Into<String>,
		ty: FunctionType,
		call: impl Fn(&mut NativeContext<'_>, &[Value]) -> Result<Value, RuntimeError> + 'static,
	) -> Self {
		Self { name: name.into(), ty, call: Rc::new(call) }
	}
}

impl Debug for Native {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Native").field("name", &self.name).field("ty", &self.ty).finish_non_exhaustive()
	}
}

/// `print(Any): Nil` writes the textual form of its argument and a newline.
pub fn print() -> Native {
	Native::new("print", FunctionType::new(vec![Type::Any], Type::Nil), |context, arguments| {
		for argument in arguments {
			writeln!(context.out, "{argument}")?;
		}
		Ok(Value::Nil)
	})
}

/// `range(Integer, Integer): IntegerIterable` counts from the first argument
/// up to, but excluding, the second.
pub fn range() -> Native {
	Native::new(
		"range",
		FunctionType::new(vec![Type::Integer, Type::Integer], Type::IntegerIterable),
		|_, arguments| match arguments {
			[Value::Integer(start), Value::Integer(end)] => Ok(Value::Range { start: start.clone(), end: end.clone() }),
			_ => Err(RuntimeError::InvalidArguments {
				name:     "range".into(),
				received: arguments.iter().map(Value::type_name).collect::<Vec<_>>().join(", "),
			}),
		},
	)
}

/// The registry handed to [`crate::Plcer::new`].
#[derive(Debug, Clone, Default)]
pub struct Builtins {
	functions: Vec<Native>,
	types:     Vec<Rc<ObjectType>>,
}

impl Builtins {
	/// No natives at all.
	pub fn empty() -> Self { Self::default() }

	/// The standard global scope: `print` and nothing else.
	pub fn standard() -> Self {
		let mut builtins = Self::empty();
		builtins.register(print());
		builtins
	}

	pub fn register(&mut self, native: Native) -> &mut Self {
		self.functions.push(native);
		self
	}

	/// Make an object type nameable from annotations. Values of the type are
	/// created by natives.
	pub fn register_type(&mut self, object: ObjectType) -> Rc<ObjectType> {
		let object = Rc::new(object);
		self.types.push(object.clone());
		object
	}

	pub fn functions(&self) -> &[Native] { &self.functions }

	pub fn types(&self) -> &[Rc<ObjectType>] { &self.types }
}

#[cfg(test)]
mod tests {
	use num_bigint::BigInt;

	use super::*;

	fn integer(value: i32) -> Value { Value::Integer(BigInt::from(value)) }

	fn call(native: &Native, arguments: &[Value]) -> (Result<Value, RuntimeError>, String) {
		let mut out: Vec<u8> = Vec::new();
		let result = (native.call)(&mut NativeContext { out: &mut out }, arguments);
		(result, String::from_utf8(out).unwrap())
	}

	#[test]
	fn test_standard() {
		let builtins = Builtins::standard();
		let names: Vec<_> = builtins.functions().iter().map(|n| (n.name.as_str(), n.ty.arity())).collect();
		assert_eq!(names, [("print", 1)]);
		assert!(builtins.types().is_empty());
	}

	#[test]
	fn test_print() {
		let (result, out) = call(&print(), &[Value::String("hi".into())]);
		assert!(matches!(result, Ok(Value::Nil)));
		assert_eq!(out, "hi\n");

		let (_, out) = call(&print(), &[integer(5)]);
		assert_eq!(out, "5\n");
	}

	#[test]
	fn test_range() {
		let (result, out) = call(&range(), &[integer(1), integer(3)]);
		assert_eq!(result.unwrap().to_string(), "1..3");
		assert!(out.is_empty());
		assert!(call(&range(), &[Value::Nil, integer(3)]).0.is_err());
	}
}
