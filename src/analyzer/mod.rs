//! Static analysis: scope resolution and type checking.
//!
//! The analyzer walks the tree once, top-down, with its own scope chain. Fields
//! are declared in the global scope in order, then methods. A method is
//! registered in the global scope right before its body is visited, so a body
//! may call itself and any method above it, but not one declared below it.
//!
//! Nothing is written back into the tree. Resolved types and bindings go into
//! an [`Analysis`] keyed by node id, so analyzing the same tree twice yields
//! the same result.

pub mod analysis;

pub use analysis::{Analysis, Analyzed, FunctionBinding, VariableBinding};
use num_traits::ToPrimitive;

use crate::{builtins::Builtins, environment::{Scopes, types::{FunctionType, Type, TypeRegistry, require_assignable}}, error::analyzer::SemanticError, parser::expression::{Expression, ExpressionKind, LiteralValue}, statement::{Declaration, Method, Source, Statement}};

/// Analyze a parsed source against the given builtins.
#[tracing::instrument(skip_all)]
pub fn analyze(source: Source, builtins: &Builtins) -> Result<Analyzed, SemanticError> {
	let analysis = Analyzer::new(builtins)?.analyze_source(&source)?;
	tracing::debug!(expressions = analysis.typed_expressions(), "analyzed source");
	Ok(Analyzed { source, analysis })
}

/// Return types seen so far in the method being analyzed.
struct MethodContext {
	/// The annotated return type, if any.
	declared: Option<Type>,
	/// The type of the first `RETURN`, used when nothing is annotated.
	inferred: Option<Type>,
}

struct Analyzer {
	scopes:   Scopes<VariableBinding, FunctionBinding>,
	types:    TypeRegistry,
	analysis: Analysis,
	method:   Option<MethodContext>,
}

impl Analyzer {
	fn new(builtins: &Builtins) -> Result<Self, SemanticError> {
		let mut scopes = Scopes::new();
		for native in builtins.functions() {
			let binding = FunctionBinding { name: native.name.clone(), ty: native.ty.clone() };
			scopes.define_function(&native.name, native.ty.arity(), binding)?;
		}
		let mut types = TypeRegistry::new();
		for object in builtins.types() {
			types.register(object.clone());
		}
		Ok(Self { scopes, types, analysis: Analysis::default(), method: None })
	}

	fn analyze_source(mut self, source: &Source) -> Result<Analysis, SemanticError> {
		for field in &source.fields {
			self.declaration(field)?;
		}
		for method in &source.methods {
			self.method(method)?;
		}
		let main = self.scopes.function("main", 0).ok_or(SemanticError::MissingMain)?;
		require_assignable(&Type::Integer, &main.ty.returns)?;
		Ok(self.analysis)
	}

	/// Run `body` in a fresh block scope, popping it on every exit path.
	fn in_scope<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
		self.scopes.push();
		let result = body(self);
		self.scopes.pop();
		result
	}

	fn resolve_type(&self, name: Option<&str>) -> Result<Option<Type>, SemanticError> {
		name.map(|name| self.types.resolve(name)).transpose()
	}

	/// Fields and local declarations share one rule: the annotation wins, else
	/// the initializer's type, and at least one of them must be present.
	fn declaration(&mut self, declaration: &Declaration) -> Result<(), SemanticError> {
		let declared = self.resolve_type(declaration.type_name.as_deref())?;
		let actual = declaration.initializer.as_ref().map(|value| self.expression(value)).transpose()?;
		let ty = match (declared, actual) {
			(Some(declared), Some(actual)) => {
				require_assignable(&declared, &actual)?;
				declared
			}
			(Some(ty), None) | (None, Some(ty)) => ty,
			(None, None) => return Err(SemanticError::UntypedDeclaration(declaration.name.clone())),
		};

		let binding = VariableBinding { name: declaration.name.clone(), ty };
		self.scopes.define_variable(&declaration.name, binding.clone())?;
		self.analysis.variables.insert(declaration.id, binding);
		Ok(())
	}

	fn method(&mut self, method: &Method) -> Result<(), SemanticError> {
		let parameters = method
			.parameters
			.iter()
			.map(|parameter| Ok(self.resolve_type(parameter.type_name.as_deref())?.unwrap_or(Type::Any)))
			.collect::<Result<Vec<_>, SemanticError>>()?;
		let declared = self.resolve_type(method.return_type_name.as_deref())?;
		let arity = parameters.len();

		// Visible to its own body; a recursive call sees `Any` until the return
		// type is known.
		let provisional = FunctionType::new(parameters.clone(), declared.clone().unwrap_or(Type::Any));
		self.scopes.define_function(&method.name, arity, FunctionBinding { name: method.name.clone(), ty: provisional })?;

		self.method = Some(MethodContext { declared: declared.clone(), inferred: None });
		let result = self.in_scope(|this| {
			for (parameter, ty) in method.parameters.iter().zip(&parameters) {
				let binding = VariableBinding { name: parameter.name.clone(), ty: ty.clone() };
				this.scopes.define_variable(&parameter.name, binding)?;
			}
			this.block(&method.body)
		});
		let inferred = self.method.take().and_then(|context| context.inferred);
		result?;

		let returns = declared.or(inferred).unwrap_or(Type::Nil);
		let binding = FunctionBinding { name: method.name.clone(), ty: FunctionType::new(parameters, returns) };
		tracing::debug!(method = %method.name, arity, returns = %binding.ty.returns, "analyzed method");
		self.scopes.redefine_function(&method.name, arity, binding.clone());
		self.analysis.functions.insert(method.id, binding);
		Ok(())
	}

	fn block(&mut self, statements: &[Statement]) -> Result<(), SemanticError> {
		statements.iter().try_for_each(|statement| self.statement(statement))
	}

	fn statement(&mut self, statement: &Statement) -> Result<(), SemanticError> {
		match statement {
			Statement::Expression(expression) => {
				if !expression.is_function() {
					return Err(SemanticError::ExpressionStatementNotCall);
				}
				self.expression(expression)?;
			}
			Statement::Declaration(declaration) => self.declaration(declaration)?,
			Statement::Assignment { target, value } => {
				if !target.is_access() {
					return Err(SemanticError::InvalidAssignmentTarget);
				}
				let target = self.expression(target)?;
				let value = self.expression(value)?;
				require_assignable(&target, &value)?;
			}
			Statement::If { condition, then_body, else_body } => {
				let condition = self.expression(condition)?;
				require_assignable(&Type::Boolean, &condition)?;
				if then_body.is_empty() {
					return Err(SemanticError::EmptyBody("IF"));
				}
				self.in_scope(|this| this.block(then_body))?;
				self.in_scope(|this| this.block(else_body))?;
			}
			Statement::For { name, iterable, body } => {
				let iterable = self.expression(iterable)?;
				require_assignable(&Type::IntegerIterable, &iterable)?;
				if body.is_empty() {
					return Err(SemanticError::EmptyBody("FOR"));
				}
				self.in_scope(|this| {
					this.scopes.define_variable(name, VariableBinding { name: name.clone(), ty: Type::Integer })?;
					this.block(body)
				})?;
			}
			Statement::While { condition, body } => {
				let condition = self.expression(condition)?;
				require_assignable(&Type::Boolean, &condition)?;
				if body.is_empty() {
					return Err(SemanticError::EmptyBody("WHILE"));
				}
				self.in_scope(|this| this.block(body))?;
			}
			Statement::Return(value) => {
				let actual = self.expression(value)?;
				if let Some(context) = self.method.as_mut() {
					match (&context.declared, &context.inferred) {
						(Some(expected), _) | (None, Some(expected)) => require_assignable(expected, &actual)?,
						(None, None) => context.inferred = Some(actual),
					}
				}
			}
		}
		Ok(())
	}

	/// Type an expression and record the type in the side table.
	fn expression(&mut self, expression: &Expression) -> Result<Type, SemanticError> {
		let ty = match &expression.kind {
			ExpressionKind::Literal(literal) => literal_type(literal)?,
			ExpressionKind::Group(inner) => {
				if !inner.is_binary() {
					return Err(SemanticError::GroupNotBinary);
				}
				self.expression(inner)?
			}
			ExpressionKind::Binary { operator, left, right } => {
				let left = self.expression(left)?;
				let right = self.expression(right)?;
				binary_type(operator, left, right)?
			}
			ExpressionKind::Access { receiver: None, name } => {
				let binding =
					self.scopes.variable(name).cloned().ok_or_else(|| SemanticError::UndefinedVariable(name.clone()))?;
				let ty = binding.ty.clone();
				self.analysis.variables.insert(expression.id, binding);
				ty
			}
			ExpressionKind::Access { receiver: Some(receiver), name } => {
				let receiver = self.expression(receiver)?;
				let ty = receiver
					.field(name)
					.cloned()
					.ok_or_else(|| SemanticError::UnknownField { ty: receiver.to_string(), name: name.clone() })?;
				self.analysis.variables.insert(expression.id, VariableBinding { name: name.clone(), ty: ty.clone() });
				ty
			}
			ExpressionKind::Function { receiver: None, name, arguments } => {
				let binding = self.scopes.function(name, arguments.len()).cloned().ok_or_else(|| {
					SemanticError::UndefinedFunction { name: name.clone(), arity: arguments.len() }
				})?;
				self.arguments(arguments, &binding.ty.parameters)?;
				let ty = binding.ty.returns.clone();
				self.analysis.functions.insert(expression.id, binding);
				ty
			}
			ExpressionKind::Function { receiver: Some(receiver), name, arguments } => {
				let receiver = self.expression(receiver)?;
				// The receiver fills parameter slot 0.
				let arity = arguments.len() + 1;
				let native = receiver.method(name, arity).ok_or_else(|| SemanticError::UnknownMethod {
					ty:   receiver.to_string(),
					name: name.clone(),
					arity,
				})?;
				let binding = FunctionBinding { name: name.clone(), ty: native.ty.clone() };
				self.arguments(arguments, &binding.ty.parameters[1..])?;
				let ty = binding.ty.returns.clone();
				self.analysis.functions.insert(expression.id, binding);
				ty
			}
		};
		self.analysis.types.insert(expression.id, ty.clone());
		Ok(ty)
	}

	/// Check call arguments positionally against parameter types.
	fn arguments(&mut self, arguments: &[Expression], parameters: &[Type]) -> Result<(), SemanticError> {
		for (argument, parameter) in arguments.iter().zip(parameters) {
			let actual = self.expression(argument)?;
			require_assignable(parameter, &actual)?;
		}
		Ok(())
	}
}

/// Literals map to fixed types. Numbers keep full precision but must fit the
/// ranges of a 32-bit integer and a 64-bit float.
fn literal_type(literal: &LiteralValue) -> Result<Type, SemanticError> {
	Ok(match literal {
		LiteralValue::Nil => Type::Nil,
		LiteralValue::Boolean(_) => Type::Boolean,
		LiteralValue::Character(_) => Type::Character,
		LiteralValue::String(_) => Type::String,
		LiteralValue::Integer(n) => {
			n.to_i32().ok_or_else(|| SemanticError::IntegerOutOfRange(n.to_string()))?;
			Type::Integer
		}
		LiteralValue::Decimal(d) => {
			d.to_f64().filter(|f| f.is_finite()).ok_or_else(|| SemanticError::DecimalOutOfRange(d.to_string()))?;
			Type::Decimal
		}
	})
}

fn binary_type(operator: &str, left: Type, right: Type) -> Result<Type, SemanticError> {
	let invalid = |left: &Type, right: &Type| SemanticError::InvalidOperands {
		operator: operator.to_string(),
		left:     left.to_string(),
		right:    right.to_string(),
	};
	match operator {
		"AND" | "OR" | "<" | "<=" | ">" | ">=" | "==" | "!=" => {
			require_assignable(&Type::Boolean, &left)?;
			require_assignable(&Type::Boolean, &right)?;
			Ok(Type::Boolean)
		}
		"+" if left == Type::String || right == Type::String => Ok(Type::String),
		"+" | "-" | "*" | "/" => match (&left, &right) {
			(Type::Integer, Type::Integer) => Ok(Type::Integer),
			(Type::Decimal, Type::Decimal) => Ok(Type::Decimal),
			_ => Err(invalid(&left, &right)),
		},
		_ => Err(SemanticError::UnknownOperator(operator.to_string())),
	}
}
