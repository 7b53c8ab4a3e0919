//! The nominal type system.
//!
//! Types are compared by name. The only assignability rules besides identity
//! are that `Any` accepts everything and that `Comparable` accepts exactly
//! `Integer`, `Decimal`, `Character` and `String`.

use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::{builtins::{Native, NativeContext}, error::{analyzer::SemanticError, interpreter::RuntimeError}, interpreter::value::Value};

#[derive(Debug, Clone)]
pub enum Type {
	Nil,
	Any,
	Comparable,
	Boolean,
	Integer,
	Decimal,
	Character,
	String,
	IntegerIterable,
	/// A type registered through the builtins, with fields and methods.
	Object(Rc<ObjectType>),
}

impl Type {
	/// The fixed built-in types, in registry order.
	pub const BUILTIN: [Type; 9] = [
		Type::Nil,
		Type::Any,
		Type::Comparable,
		Type::Boolean,
		Type::Integer,
		Type::Decimal,
		Type::Character,
		Type::String,
		Type::IntegerIterable,
	];

	pub fn name(&self) -> &str {
		match self {
			Type::Nil => "Nil",
			Type::Any => "Any",
			Type::Comparable => "Comparable",
			Type::Boolean => "Boolean",
			Type::Integer => "Integer",
			Type::Decimal => "Decimal",
			Type::Character => "Character",
			Type::String => "String",
			Type::IntegerIterable => "IntegerIterable",
			Type::Object(object) => &object.name,
		}
	}

	/// Whether a value of type `actual` may be stored where `self` is expected.
	pub fn is_assignable_from(&self, actual: &Type) -> bool {
		match self {
			_ if self == actual => true,
			Type::Any => true,
			Type::Comparable => {
				matches!(actual, Type::Integer | Type::Character | Type::Decimal | Type::String)
			}
			_ => false,
		}
	}

	/// The field table of an object type, empty for every built-in type.
	pub fn field(&self, name: &str) -> Option<&Type> {
		match self {
			Type::Object(object) => object.field(name),
			_ => None,
		}
	}

	/// The method table of an object type, `arity` counting the receiver.
	pub fn method(&self, name: &str, arity: usize) -> Option<&Native> {
		match self {
			Type::Object(object) => object.method(name, arity),
			_ => None,
		}
	}
}

impl PartialEq for Type {
	fn eq(&self, other: &Self) -> bool { self.name() == other.name() }
}

impl Display for Type {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.name()) }
}

/// Fail unless `actual` is assignable to `target`.
pub fn require_assignable(target: &Type, actual: &Type) -> Result<(), SemanticError> {
	if target.is_assignable_from(actual) {
		Ok(())
	} else {
		Err(SemanticError::NotAssignable { target: target.to_string(), actual: actual.to_string() })
	}
}

/// Parameter and return types of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
	pub parameters: Vec<Type>,
	pub returns:    Type,
}

impl FunctionType {
	pub fn new(parameters: Vec<Type>, returns: Type) -> Self { Self { parameters, returns } }

	pub fn arity(&self) -> usize { self.parameters.len() }
}

/// A registered object type. Methods are natives that receive the receiver as
/// their first argument.
#[derive(Debug)]
pub struct ObjectType {
	pub name: String,
	fields:   HashMap<String, Type>,
	methods:  HashMap<(String, usize), Native>,
}

impl ObjectType {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), fields: HashMap::new(), methods: HashMap::new() }
	}

	pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
		self.fields.insert(name.into(), ty);
		self
	}

	/// Add a method. `parameters` excludes the receiver, which occupies slot 0
	/// of the resulting signature with type `Any`.
	pub fn with_method(
		mut self,
		name: impl Into<String>,
		parameters: Vec<Type>,
		returns: Type,
		call: impl Fn(&mut NativeContext<'_>, &[Value]) -> Result<Value, RuntimeError> + 'static,
	) -> Self {
		let name = name.into();
		let parameters = std::iter::once(Type::Any).chain(parameters).collect();
		let native = Native::new(name.clone(), FunctionType::new(parameters, returns), call);
		self.methods.insert((name, native.ty.arity()), native);
		self
	}

	pub fn field(&self, name: &str) -> Option<&Type> { self.fields.get(name) }

	pub fn fields(&self) -> impl Iterator<Item = &str> { self.fields.keys().map(String::as_str) }

	pub fn method(&self, name: &str, arity: usize) -> Option<&Native> {
		self.methods.get(&(name.to_string(), arity))
	}
}

/// Types reachable by name from type annotations.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
	types: HashMap<String, Type>,
}

impl Default for TypeRegistry {
	fn default() -> Self { Self::new() }
}

impl TypeRegistry {
	/// A registry holding the fixed built-in types.
	pub fn new() -> Self {
		let types = Type::BUILTIN.into_iter().map(|ty| (ty.name().to_string(), ty)).collect();
		Self { types }
	}

	pub fn register(&mut self, object: Rc<ObjectType>) {
		self.types.insert(object.name.clone(), Type::Object(object));
	}

	pub fn resolve(&self, name: &str) -> Result<Type, SemanticError> {
		self.types.get(name).cloned().ok_or_else(|| SemanticError::UnknownType(name.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn point() -> Rc<ObjectType> {
		Rc::new(
			ObjectType::new("Point")
				.with_field("x", Type::Integer)
				.with_method("origin", vec![], Type::Boolean, |_, _| Ok(Value::Boolean(false))),
		)
	}

	#[test]
	fn test_comparable() {
		for actual in [Type::Integer, Type::Character, Type::Decimal, Type::String, Type::Comparable] {
			assert!(Type::Comparable.is_assignable_from(&actual), "{actual}");
		}
		for actual in [Type::Boolean, Type::Nil, Type::Any, Type::IntegerIterable, Type::Object(point())] {
			assert!(!Type::Comparable.is_assignable_from(&actual), "{actual}");
		}
	}

	#[test]
	fn test_any_and_identity() {
		for actual in Type::BUILTIN.into_iter().chain([Type::Object(point())]) {
			assert!(Type::Any.is_assignable_from(&actual));
			assert!(actual.is_assignable_from(&actual));
		}
		assert!(!Type::Integer.is_assignable_from(&Type::Decimal));
		assert!(!Type::Integer.is_assignable_from(&Type::Any));
		assert!(!Type::String.is_assignable_from(&Type::Comparable));
		assert!(!Type::Nil.is_assignable_from(&Type::Boolean));
	}

	#[test]
	fn test_require_assignable() {
		assert_eq!(require_assignable(&Type::Integer, &Type::Integer), Ok(()));
		assert_eq!(
			require_assignable(&Type::Integer, &Type::String),
			Err(SemanticError::NotAssignable { target: "Integer".into(), actual: "String".into() })
		);
	}

	#[test]
	fn test_object_type() {
		let point = point();
		let ty = Type::Object(point.clone());
		assert_eq!(ty.name(), "Point");
		assert_eq!(ty.field("x"), Some(&Type::Integer));
		assert_eq!(ty.field("y"), None);
		let method = ty.method("origin", 1).unwrap();
		assert_eq!(method.ty.parameters, [Type::Any]);
		assert!(ty.method("origin", 0).is_none());
		assert!(Type::Integer.field("x").is_none());
	}

	#[test]
	fn test_registry() {
		let mut registry = TypeRegistry::new();
		assert_eq!(registry.resolve("Integer"), Ok(Type::Integer));
		assert_eq!(registry.resolve("IntegerIterable"), Ok(Type::IntegerIterable));
		assert_eq!(registry.resolve("Point"), Err(SemanticError::UnknownType("Point".into())));
		registry.register(point());
		assert_eq!(registry.resolve("Point").unwrap().name(), "Point");
	}
}
