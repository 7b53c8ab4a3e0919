use std::{cmp::Ordering, fmt::Display};

use Value::*;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{builtins::NativeFn, error::interpreter::RuntimeError, interpreter::instance::Instance, parser::expression::LiteralValue, utils::RcCell};

/// Value represents a runtime value of a program.
#[derive(Debug, Clone)]
pub enum Value {
	Nil,
	Boolean(bool),
	Character(char),
	String(std::string::String),
	Integer(BigInt),
	Decimal(BigDecimal),
	/// The integers from `start` up to, but excluding, `end`.
	Range { start: BigInt, end: BigInt },
	/// Objects are shared, assigning one aliases it.
	Object(RcCell<Instance>),
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Nil => write!(f, "NIL"),
			Boolean(true) => write!(f, "TRUE"),
			Boolean(false) => write!(f, "FALSE"),
			Character(c) => write!(f, "{c}"),
			String(s) => write!(f, "{s}"),
			Integer(n) => write!(f, "{n}"),
			Decimal(d) => write!(f, "{d}"),
			Range { start, end } => write!(f, "{start}..{end}"),
			Object(instance) => write!(f, "{}", instance.borrow()),
		}
	}
}

impl From<&LiteralValue> for Value {
	fn from(literal: &LiteralValue) -> Self {
		match literal {
			LiteralValue::Nil => Nil,
			LiteralValue::Boolean(b) => Boolean(*b),
			LiteralValue::Character(c) => Character(*c),
			LiteralValue::String(s) => String(s.clone()),
			LiteralValue::Integer(n) => Integer(n.clone()),
			LiteralValue::Decimal(d) => Decimal(d.clone()),
		}
	}
}

impl Value {
	/// Name of the runtime type, as used in error messages.
	pub fn type_name(&self) -> std::string::String {
		match self {
			Nil => "Nil".into(),
			Boolean(_) => "Boolean".into(),
			Character(_) => "Character".into(),
			String(_) => "String".into(),
			Integer(_) => "Integer".into(),
			Decimal(_) => "Decimal".into(),
			Range { .. } => "IntegerIterable".into(),
			Object(instance) => instance.borrow().ty.name.clone(),
		}
	}

	/// Performs a binary operation between two values. `AND` and `OR` are not
	/// handled here since they must not evaluate both operands.
	pub fn binary_op(&self, operator: &str, right: &Self) -> Result<Value, RuntimeError> {
		let value = match operator {
			"+" => self.plus(right),
			"-" => self.minus(right),
			"*" => self.star(right),
			"/" => return self.slash(right).unwrap_or_else(|| Err(self.operation_error(operator, right))),
			"<" => self.compare(right).map(|o| Boolean(o.is_lt())),
			"<=" => self.compare(right).map(|o| Boolean(o.is_le())),
			">" => self.compare(right).map(|o| Boolean(o.is_gt())),
			">=" => self.compare(right).map(|o| Boolean(o.is_ge())),
			"==" => Some(Boolean(self.equal(right))),
			"!=" => Some(Boolean(!self.equal(right))),
			_ => None,
		};
		value.ok_or_else(|| self.operation_error(operator, right))
	}

	fn operation_error(&self, operator: &str, right: &Self) -> RuntimeError {
		RuntimeError::BinaryOperationError {
			operator: operator.to_string(),
			left:     self.type_name(),
			right:    right.type_name(),
		}
	}

	/// Conditions accept only booleans, there is no truthiness.
	pub fn as_boolean(&self) -> Result<bool, RuntimeError> {
		match self {
			Boolean(b) => Ok(*b),
			other => Err(RuntimeError::ExpectedBoolean(other.type_name())),
		}
	}

	/// Tries to add two values together. A string on either side turns the
	/// addition into concatenation of both textual forms.
	pub fn plus(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(String(_), _) | (_, String(_)) => Some(String(format!("{self}{other}"))),
			(Integer(l), Integer(r)) => Some(Integer(l + r)),
			(Decimal(l), Decimal(r)) => Some(Decimal(l + r)),
			_ => None,
		}
	}

	/// Tries to subtract two values.
	pub fn minus(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Integer(l), Integer(r)) => Some(Integer(l - r)),
			(Decimal(l), Decimal(r)) => Some(Decimal(l - r)),
			_ => None,
		}
	}

	/// Tries to multiply two values together.
	pub fn star(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Integer(l), Integer(r)) => Some(Integer(l * r)),
			(Decimal(l), Decimal(r)) => Some(Decimal(l * r)),
			_ => None,
		}
	}

	/// Tries to divide two values. Integers truncate toward zero, decimals keep
	/// one fractional digit rounded half to even.
	pub fn slash(&self, other: &Self) -> Option<Result<Value, RuntimeError>> {
		match (self, other) {
			(Integer(_), Integer(r)) if r.is_zero() => Some(Err(RuntimeError::DivisionByZero)),
			(Decimal(_), Decimal(r)) if r.is_zero() => Some(Err(RuntimeError::DivisionByZero)),
			(Integer(l), Integer(r)) => Some(Ok(Integer(l / r))),
			(Decimal(l), Decimal(r)) => Some(Ok(Decimal(divide_to_tenths(l, r)))),
			_ => None,
		}
	}

	/// Total ordering within one kind of value.
	pub fn compare(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Integer(l), Integer(r)) => Some(l.cmp(r)),
			(Decimal(l), Decimal(r)) => Some(l.cmp(r)),
			(Character(l), Character(r)) => Some(l.cmp(r)),
			(String(l), String(r)) => Some(l.cmp(r)),
			(Boolean(l), Boolean(r)) => Some(l.cmp(r)),
			_ => None,
		}
	}

	/// Value equality. Values of different kinds are never equal, objects are
	/// equal only to themselves.
	pub fn equal(&self, other: &Self) -> bool {
		match (self, other) {
			(Nil, Nil) => true,
			(Boolean(l), Boolean(r)) => l == r,
			(Character(l), Character(r)) => l == r,
			(String(l), String(r)) => l == r,
			(Integer(l), Integer(r)) => l == r,
			(Decimal(l), Decimal(r)) => l == r,
			(Range { start: ls, end: le }, Range { start: rs, end: re }) => ls == rs && le == re,
			(Object(l), Object(r)) => l.ptr_eq(r),
			_ => false,
		}
	}

	/// The integers produced by iterating this value, if it is iterable.
	pub fn elements(&self) -> Option<impl Iterator<Item = BigInt> + use<>> {
		match self {
			Range { start, end } => {
				let end = end.clone();
				Some(std::iter::successors(Some(start.clone()), |i| Some(i + 1u32)).take_while(move |i| *i < end))
			}
			_ => None,
		}
	}

	/// Look a field up on an object.
	pub fn field(&self, name: &str) -> Result<Value, RuntimeError> {
		match self {
			Object(instance) => instance.borrow().get(name),
			other => Err(RuntimeError::UndefinedField { ty: other.type_name(), name: name.to_string() }),
		}
	}

	/// Look a method up on an object, `arity` counting the receiver.
	pub fn method(&self, name: &str, arity: usize) -> Result<NativeFn, RuntimeError> {
		let found = match self {
			Object(instance) => instance.borrow().ty.method(name, arity).map(|native| native.call.clone()),
			_ => None,
		};
		found.ok_or_else(|| RuntimeError::UndefinedMethod { ty: self.type_name(), name: name.to_string(), arity })
	}
}

/// Exact `l / r` rounded once, half to even, to one fractional digit.
///
/// Both operands are unscaled first, so the quotient of the mantissas is the
/// answer in tenths with nothing lost before the rounding step.
fn divide_to_tenths(l: &BigDecimal, r: &BigDecimal) -> BigDecimal {
	let (l, l_scale) = l.as_bigint_and_exponent();
	let (r, r_scale) = r.as_bigint_and_exponent();
	// l * 10^-ls / (r * 10^-rs) * 10 == l * 10^(rs - ls + 1) / r
	let shift = r_scale + 1 - l_scale;
	let ten = BigInt::from(10u32);
	let (numerator, denominator) = if shift >= 0 {
		(l * ten.pow(shift.unsigned_abs() as u32), r)
	} else {
		(l, r * ten.pow(shift.unsigned_abs() as u32))
	};

	let mut tenths = &numerator / &denominator;
	let remainder = &numerator % &denominator;
	let twice = remainder.abs() * 2u32;
	let away = match twice.cmp(&denominator.abs()) {
		Ordering::Greater => true,
		Ordering::Equal => !(&tenths % 2u32).is_zero(),
		Ordering::Less => false,
	};
	if away {
		if numerator.is_negative() != denominator.is_negative() {
			tenths -= 1u32;
		} else {
			tenths += 1u32;
		}
	}
	BigDecimal::new(tenths, 1)
}
