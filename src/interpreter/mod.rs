//! Tree-walking interpreter.
//!
//! The interpreter walks an analyzed source, keeping a runtime scope chain of
//! its own. Global fields are evaluated in order, methods are bound in the
//! global scope, then `main` is called with no arguments.
//!
//! # Scopes
//!
//! - **Call**: a fresh scope whose parent is the callee's closure scope (the
//!   global scope), never the caller's
//! - **Block**: `IF`, `WHILE` bodies and every `FOR` iteration get their own
//!   scope nested in the current one
//!
//! Every scope is popped on every exit path: normal completion, `RETURN` and
//! runtime errors alike.
//!
//! # Return
//!
//! `RETURN` does not unwind the Rust stack. Statement execution yields a
//! [`Completion`] that is passed up until the enclosing call consumes it.

mod callable;
pub mod instance;
pub mod value;

use std::io::Write;

use callable::{Callable, Completion};
use num_bigint::BigInt;
use value::Value;

use crate::{analyzer::Analyzed, builtins::{Builtins, NativeContext}, environment::{ScopeId, Scopes}, error::interpreter::RuntimeError, parser::expression::{Expression, ExpressionKind}, statement::{Declaration, Statement}};

/// How many calls of program methods may be active at once.
pub const MAX_CALL_DEPTH: usize = 512;

/// Interpreter that executes analyzed programs.
pub struct Interpreter<'w> {
	scopes: Scopes<Value, Callable>,
	/// Where natives such as `print` write.
	out:    &'w mut dyn Write,
	/// Active calls of program methods.
	calls:  usize,
}

impl<'w> Interpreter<'w> {
	/// Create an interpreter whose global scope holds the given natives.
	pub fn new(builtins: &Builtins, out: &'w mut dyn Write) -> Result<Self, RuntimeError> {
		let mut scopes = Scopes::new();
		for native in builtins.functions() {
			scopes.define_function(&native.name, native.ty.arity(), Callable::Native(native.call.clone()))?;
		}
		Ok(Self { scopes, out, calls: 0 })
	}

	/// Run a program and return the value of `main`.
	#[tracing::instrument(skip_all)]
	pub fn execute(&mut self, analyzed: &Analyzed) -> Result<BigInt, RuntimeError> {
		let source = &analyzed.source;
		for field in &source.fields {
			self.declare(field)?;
		}
		for method in &source.methods {
			self.scopes.define_function(&method.name, method.parameters.len(), Callable::Plc(method.clone()))?;
		}

		match self.call("main", Vec::new())? {
			Value::Integer(result) => {
				tracing::debug!(%result, "main returned");
				Ok(result)
			}
			other => Err(RuntimeError::NonIntegerResult(other.type_name())),
		}
	}

	/// Run `body` in a fresh scope whose names resolve through `parent`,
	/// popping it on every exit path.
	fn in_scope<T>(&mut self, parent: ScopeId, body: impl FnOnce(&mut Self) -> T) -> T {
		self.scopes.push_child_of(parent);
		let result = body(self);
		self.scopes.pop();
		result
	}

	/// Execute statements in a block scope nested in the current one.
	fn execute_block(&mut self, statements: &[Statement]) -> Result<Completion, RuntimeError> {
		let current = self.scopes.current();
		self.in_scope(current, |this| this.execute_statements(statements))
	}

	fn execute_statements(&mut self, statements: &[Statement]) -> Result<Completion, RuntimeError> {
		for statement in statements {
			if let Completion::Return(value) = self.execute_statement(statement)? {
				return Ok(Completion::Return(value));
			}
		}
		Ok(Completion::Normal)
	}

	fn execute_statement(&mut self, statement: &Statement) -> Result<Completion, RuntimeError> {
		match statement {
			Statement::Expression(expression) => {
				self.evaluate(expression)?;
			}
			Statement::Declaration(declaration) => self.declare(declaration)?,
			Statement::Assignment { target, value } => self.assign(target, value)?,
			Statement::If { condition, then_body, else_body } => {
				let body = if self.evaluate(condition)?.as_boolean()? { then_body } else { else_body };
				return self.execute_block(body);
			}
			Statement::For { name, iterable, body } => {
				let iterable = self.evaluate(iterable)?;
				let elements = iterable.elements().ok_or_else(|| RuntimeError::NotIterable(iterable.type_name()))?;
				for element in elements {
					// A fresh variable per iteration.
					let current = self.scopes.current();
					let completion = self.in_scope(current, |this| {
						this.scopes.define_variable(name, Value::Integer(element))?;
						this.execute_statements(body)
					})?;
					if let Completion::Return(value) = completion {
						return Ok(Completion::Return(value));
					}
				}
			}
			Statement::While { condition, body } => {
				while self.evaluate(condition)?.as_boolean()? {
					if let Completion::Return(value) = self.execute_block(body)? {
						return Ok(Completion::Return(value));
					}
				}
			}
			Statement::Return(value) => return Ok(Completion::Return(self.evaluate(value)?)),
		}
		Ok(Completion::Normal)
	}

	/// A declaration without an initializer starts out as `NIL`.
	fn declare(&mut self, declaration: &Declaration) -> Result<(), RuntimeError> {
		let value = match &declaration.initializer {
			Some(initializer) => self.evaluate(initializer)?,
			None => Value::Nil,
		};
		tracing::trace!(name = %declaration.name, %value, "define");
		self.scopes.define_variable(&declaration.name, value)?;
		Ok(())
	}

	fn assign(&mut self, target: &Expression, value: &Expression) -> Result<(), RuntimeError> {
		match &target.kind {
			ExpressionKind::Access { receiver: None, name } => {
				let value = self.evaluate(value)?;
				let slot =
					self.scopes.variable_mut(name).ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()))?;
				*slot = value;
			}
			ExpressionKind::Access { receiver: Some(receiver), name } => {
				let receiver = self.evaluate(receiver)?;
				let value = self.evaluate(value)?;
				match receiver {
					Value::Object(instance) => instance.borrow_mut().set(name, value)?,
					other => {
						return Err(RuntimeError::UndefinedField { ty: other.type_name(), name: name.clone() });
					}
				}
			}
			_ => return Err(RuntimeError::InvalidAssignmentTarget(target.to_string())),
		}
		Ok(())
	}

	/// Evaluate the given expression and return its value.
	fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
		Ok(match &expression.kind {
			ExpressionKind::Literal(literal) => Value::from(literal),
			ExpressionKind::Group(inner) => self.evaluate(inner)?,
			ExpressionKind::Binary { operator, left, right } => {
				let left = self.evaluate(left)?;
				match operator.as_str() {
					// The right operand only runs when the left one does not decide.
					"AND" => Value::Boolean(left.as_boolean()? && self.evaluate(right)?.as_boolean()?),
					"OR" => Value::Boolean(left.as_boolean()? || self.evaluate(right)?.as_boolean()?),
					_ => {
						let right = self.evaluate(right)?;
						left.binary_op(operator, &right)?
					}
				}
			}
			ExpressionKind::Access { receiver: None, name } => {
				self.scopes.variable(name).cloned().ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()))?
			}
			ExpressionKind::Access { receiver: Some(receiver), name } => self.evaluate(receiver)?.field(name)?,
			ExpressionKind::Function { receiver: None, name, arguments } => {
				let arguments = self.evaluate_all(arguments)?;
				self.call(name, arguments)?
			}
			ExpressionKind::Function { receiver: Some(receiver), name, arguments } => {
				let receiver = self.evaluate(receiver)?;
				let method = receiver.method(name, arguments.len() + 1)?;
				let mut values = vec![receiver];
				values.extend(self.evaluate_all(arguments)?);
				tracing::trace!(name, arity = values.len(), "call method");
				method(&mut NativeContext { out: &mut *self.out }, &values)?
			}
		})
	}

	fn evaluate_all(&mut self, expressions: &[Expression]) -> Result<Vec<Value>, RuntimeError> {
		expressions.iter().map(|expression| self.evaluate(expression)).collect()
	}

	/// Call a function bound in scope by name and arity.
	fn call(&mut self, name: &str, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
		let callable = self
			.scopes
			.function(name, arguments.len())
			.cloned()
			.ok_or_else(|| RuntimeError::UndefinedFunction { name: name.to_string(), arity: arguments.len() })?;
		tracing::trace!(name, arity = arguments.len(), "call");

		match callable {
			Callable::Native(native) => native(&mut NativeContext { out: &mut *self.out }, &arguments),
			Callable::Plc(method) => {
				if self.calls >= MAX_CALL_DEPTH {
					return Err(RuntimeError::CallDepthExceeded { name: name.to_string(), limit: MAX_CALL_DEPTH });
				}
				let closure = self.scopes.global();
				self.calls += 1;
				let completion = self.in_scope(closure, |this| {
					for (parameter, argument) in method.parameters.iter().zip(arguments) {
						this.scopes.define_variable(&parameter.name, argument)?;
					}
					this.execute_statements(&method.body)
				});
				self.calls -= 1;
				let completion = completion?;
				Ok(match completion {
					Completion::Return(value) => value,
					Completion::Normal => Value::Nil,
				})
			}
		}
	}
}
