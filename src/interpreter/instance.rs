use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::{environment::types::ObjectType, error::interpreter::RuntimeError, interpreter::value::Value};

/// A runtime object. Fields are named bits of state stored directly in the
/// instance; methods live on its type and are shared by every instance.
#[derive(Debug)]
pub struct Instance {
	pub ty: Rc<ObjectType>,
	fields: HashMap<String, Value>,
}

impl Instance {
	/// Create an instance with every declared field set to `NIL`.
	pub fn new(ty: Rc<ObjectType>) -> Self {
		let fields = ty.fields().map(|name| (name.to_string(), Value::Nil)).collect();
		Self { ty, fields }
	}

	pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
		self.fields.get(name).cloned().ok_or_else(|| self.undefined(name))
	}

	/// Only fields the type declares can be set.
	pub fn set(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
		let slot = self.fields.get_mut(name).ok_or_else(|| RuntimeError::UndefinedField {
			ty:   self.ty.name.clone(),
			name: name.to_string(),
		})?;
		*slot = value;
		Ok(())
	}

	fn undefined(&self, name: &str) -> RuntimeError {
		RuntimeError::UndefinedField { ty: self.ty.name.clone(), name: name.to_string() }
	}
}

impl Display for Instance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "<{}>", self.ty.name) }
}

#[cfg(test)]
mod tests {
	use num_bigint::BigInt;

	use super::*;
	use crate::environment::types::Type;

	#[test]
	fn test_fields() {
		let ty = Rc::new(ObjectType::new("Point").with_field("x", Type::Integer));
		let mut point = Instance::new(ty);
		assert!(matches!(point.get("x"), Ok(Value::Nil)));
		point.set("x", Value::Integer(BigInt::from(3))).unwrap();
		assert_eq!(point.get("x").unwrap().to_string(), "3");
		assert!(matches!(point.get("y"), Err(RuntimeError::UndefinedField { .. })));
		assert!(point.set("y", Value::Nil).is_err());
		assert_eq!(point.to_string(), "<Point>");
	}
}
