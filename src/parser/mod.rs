//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexeme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Source`
//!
//! |Name|Operators|Associates
//! --|--|--
//! Logical|AND OR|Left
//! Equality|< <= > >= == !=|Left
//! Additive|+ -|Left
//! Multiplicative|* /|Left
//! Secondary|. name, . name(args)|Left
//!
//! Grammar:
//!
//! ``` BNF
//! source         → field* method* ;
//! field          → "LET" IDENTIFIER ( ":" IDENTIFIER )? ( "=" expression )? ";" ;
//! method         → "DEF" IDENTIFIER "(" ( parameter ( "," parameter )* )? ")" ( ":" IDENTIFIER )?
//!                  "DO" statement* "END" ;
//! parameter      → IDENTIFIER ( ":" IDENTIFIER )? ;
//! statement      → field | if | for | while | return | expression ( "=" expression )? ";" ;
//! if             → "IF" expression "DO" statement* ( "ELSE" statement* )? "END" ;
//! for            → "FOR" IDENTIFIER "IN" expression "DO" statement* "END" ;
//! while          → "WHILE" expression "DO" statement* "END" ;
//! return         → "RETURN" expression ";" ;
//! expression     → logical ;
//! logical        → equality ( ( "AND" | "OR" ) equality )* ;
//! equality       → additive ( ( "<" | "<=" | ">" | ">=" | "==" | "!=" ) additive )* ;
//! additive       → multiplicative ( ( "+" | "-" ) multiplicative )* ;
//! multiplicative → secondary ( ( "*" | "/" ) secondary )* ;
//! secondary      → primary ( "." IDENTIFIER ( "(" arguments? ")" )? )* ;
//! primary        → "TRUE" | "FALSE" | "NIL" | INTEGER | DECIMAL | CHARACTER | STRING
//!                | IDENTIFIER ( "(" arguments? ")" )? | "(" expression ")" ;
//! arguments      → expression ( "," expression )* ;
//! ```
//!
//! Every decision looks at the current token (two for `IDENTIFIER "("`) with
//! `check`, and consumes only through `match_lexeme` once the check holds.

pub mod expression;

use std::{rc::Rc, str::FromStr};

use bigdecimal::BigDecimal;
use expression::{Expression, ExpressionKind, LiteralValue, NodeId};
use num_bigint::BigInt;

use crate::{error::parser::{ParseError, ParseErrorType}, scanner::{Token, TokenType, unescape}, statement::{Declaration, Method, Parameter, Source, Statement}};

/// How deep expressions and blocks may nest. Every later stage walks the tree
/// recursively, so this also bounds their stack use.
pub const MAX_NESTING: usize = 200;

/// Parse a whole token stream into a [`Source`].
pub fn parse(tokens: Vec<Token<'_>>) -> Result<Source, ParseError> { Parser::new(tokens).parse_source() }

/// Recursive-descent parser over a scanned token list.
pub struct Parser<'a> {
	/// The tokens to parse.
	tokens:  Vec<Token<'a>>,
	/// Index of the next token to consume.
	current: usize,
	/// Next free node id.
	next_id: u32,
	/// Current nesting, see [`MAX_NESTING`].
	depth:   usize,
}

impl<'a> Parser<'a> {
	pub fn new(tokens: Vec<Token<'a>>) -> Self { Self { tokens, current: 0, next_id: 0, depth: 0 } }

	/// Parse the `source` rule, requiring every token to be consumed.
	pub fn parse_source(&mut self) -> Result<Source, ParseError> {
		let mut source = Source::default();
		while self.check("LET") {
			source.fields.push(self.declaration()?);
		}
		while self.check("DEF") {
			source.methods.push(Rc::new(self.method()?));
		}
		if let Some(token) = self.peek() {
			return Err(ParseError::new(token.offset, ParseErrorType::TrailingTokens(token.lexeme.to_string())));
		}
		tracing::debug!(fields = source.fields.len(), methods = source.methods.len(), "parsed source");
		Ok(source)
	}

	/// Parse a `field` or a local declaration; both start with `LET`.
	fn declaration(&mut self) -> Result<Declaration, ParseError> {
		self.expect("LET")?;
		let name = self.expect_identifier()?;
		let type_name = self.type_annotation()?;
		let initializer = if self.match_lexeme("=") { Some(self.expression()?) } else { None };
		self.expect(";")?;
		Ok(Declaration { id: self.next_id(), name, type_name, initializer })
	}

	/// Parse the `method` rule.
	fn method(&mut self) -> Result<Method, ParseError> {
		self.expect("DEF")?;
		let name = self.expect_identifier()?;
		self.expect("(")?;
		let mut parameters = Vec::new();
		if !self.check(")") {
			loop {
				let name = self.expect_identifier()?;
				let type_name = self.type_annotation()?;
				parameters.push(Parameter { name, type_name });
				if !self.match_lexeme(",") {
					break;
				}
			}
		}
		self.expect(")")?;
		let return_type_name = self.type_annotation()?;
		self.expect("DO")?;
		let body = self.block(&["END"])?;
		self.expect("END")?;
		Ok(Method { id: self.next_id(), name, parameters, return_type_name, body: Rc::new(body) })
	}

	/// Parse an optional `: Type`.
	fn type_annotation(&mut self) -> Result<Option<String>, ParseError> {
		if self.match_lexeme(":") { self.expect_identifier().map(Some) } else { Ok(None) }
	}

	/// Parse statements up to, but not including, one of the terminators.
	fn block(&mut self, terminators: &[&'static str]) -> Result<Vec<Statement>, ParseError> {
		let depth = self.depth;
		self.enter()?;
		let mut statements = Vec::new();
		while !terminators.iter().any(|t| self.check(t)) {
			if self.is_at_end() {
				return Err(ParseError::new(self.offset(), ParseErrorType::Expected(terminators[0])));
			}
			statements.push(self.statement()?);
		}
		self.depth = depth;
		Ok(statements)
	}

	/// Parse the `statement` rule.
	fn statement(&mut self) -> Result<Statement, ParseError> {
		if self.check("LET") {
			return Ok(Statement::Declaration(self.declaration()?));
		}
		if self.match_lexeme("IF") {
			let condition = self.expression()?;
			self.expect("DO")?;
			let then_body = self.block(&["ELSE", "END"])?;
			let else_body = if self.match_lexeme("ELSE") { self.block(&["END"])? } else { Vec::new() };
			self.expect("END")?;
			return Ok(Statement::If { condition, then_body, else_body });
		}
		if self.match_lexeme("FOR") {
			let name = self.expect_identifier()?;
			self.expect("IN")?;
			let iterable = self.expression()?;
			self.expect("DO")?;
			let body = self.block(&["END"])?;
			self.expect("END")?;
			return Ok(Statement::For { name, iterable, body });
		}
		if self.match_lexeme("WHILE") {
			let condition = self.expression()?;
			self.expect("DO")?;
			let body = self.block(&["END"])?;
			self.expect("END")?;
			return Ok(Statement::While { condition, body });
		}
		if self.match_lexeme("RETURN") {
			let value = self.expression()?;
			self.expect(";")?;
			return Ok(Statement::Return(value));
		}

		let expression = self.expression()?;
		if self.match_lexeme("=") {
			let value = self.expression()?;
			self.expect(";")?;
			return Ok(Statement::Assignment { target: expression, value });
		}
		self.expect(";")?;
		Ok(Statement::Expression(expression))
	}

	/// Parse the `expression` rule.
	pub fn expression(&mut self) -> Result<Expression, ParseError> {
		let depth = self.depth;
		self.enter()?;
		let expression = self.logical()?;
		self.depth = depth;
		Ok(expression)
	}

	/// Parse logical expressions.
	fn logical(&mut self) -> Result<Expression, ParseError> {
		self.binary_level(&["AND", "OR"], Self::equality)
	}

	/// Parse equality and comparison expressions, they share one level.
	fn equality(&mut self) -> Result<Expression, ParseError> {
		self.binary_level(&["<", "<=", ">", ">=", "==", "!="], Self::additive)
	}

	/// Parse additive expressions.
	fn additive(&mut self) -> Result<Expression, ParseError> { self.binary_level(&["+", "-"], Self::multiplicative) }

	/// Parse multiplicative expressions.
	fn multiplicative(&mut self) -> Result<Expression, ParseError> {
		self.binary_level(&["*", "/"], Self::secondary)
	}

	/// One left-associative precedence level.
	fn binary_level(
		&mut self,
		operators: &[&str],
		operand: fn(&mut Self) -> Result<Expression, ParseError>,
	) -> Result<Expression, ParseError> {
		let depth = self.depth;
		let mut expression = operand(self)?;
		while let Some(operator) = operators.iter().find(|op| self.check(op)) {
			// A left-leaning chain grows the tree one level per operator.
			self.enter()?;
			let operator = operator.to_string();
			self.current += 1;
			let right = operand(self)?;
			expression = self.node(ExpressionKind::Binary { operator, left: Box::new(expression), right: Box::new(right) });
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse field accesses and method calls chained onto a primary.
	fn secondary(&mut self) -> Result<Expression, ParseError> {
		let depth = self.depth;
		let mut expression = self.primary()?;
		while self.match_lexeme(".") {
			self.enter()?;
			let name = self.expect_identifier()?;
			let receiver = Some(Box::new(expression));
			expression = if self.match_lexeme("(") {
				let arguments = self.arguments()?;
				self.node(ExpressionKind::Function { receiver, name, arguments })
			} else {
				self.node(ExpressionKind::Access { receiver, name })
			};
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> Result<Expression, ParseError> {
		let offset = self.offset();
		let Some(token) = self.peek().cloned() else {
			return Err(ParseError::new(offset, ParseErrorType::ExpectedExpression));
		};
		let literal = match (token.r#type, token.lexeme) {
			(TokenType::Identifier, "TRUE") => LiteralValue::Boolean(true),
			(TokenType::Identifier, "FALSE") => LiteralValue::Boolean(false),
			(TokenType::Identifier, "NIL") => LiteralValue::Nil,
			(TokenType::Identifier, name) => {
				self.current += 1;
				let name = name.to_string();
				if self.match_lexeme("(") {
					let arguments = self.arguments()?;
					return Ok(self.node(ExpressionKind::Function { receiver: None, name, arguments }));
				}
				return Ok(self.node(ExpressionKind::Access { receiver: None, name }));
			}
			(TokenType::Integer, lexeme) => LiteralValue::Integer(
				BigInt::from_str(unsigned(lexeme)).map_err(|_| ParseError::new(offset, ParseErrorType::InvalidLiteral))?,
			),
			(TokenType::Decimal, lexeme) => LiteralValue::Decimal(
				BigDecimal::from_str(unsigned(lexeme))
					.map_err(|_| ParseError::new(offset, ParseErrorType::InvalidLiteral))?,
			),
			(TokenType::Character, lexeme) => LiteralValue::Character(
				unescape(unquote(lexeme))
					.chars()
					.next()
					.ok_or_else(|| ParseError::new(offset, ParseErrorType::InvalidLiteral))?,
			),
			(TokenType::String, lexeme) => LiteralValue::String(unescape(unquote(lexeme))),
			(TokenType::Operator, "(") => {
				self.current += 1;
				let inner = self.expression()?;
				if !self.match_lexeme(")") {
					return Err(ParseError::new(self.offset(), ParseErrorType::UnterminatedParenthesis));
				}
				return Ok(self.node(ExpressionKind::Group(Box::new(inner))));
			}
			(TokenType::Operator, _) => return Err(ParseError::new(offset, ParseErrorType::ExpectedExpression)),
		};
		self.current += 1;
		Ok(self.node(ExpressionKind::Literal(literal)))
	}

	/// Parse call arguments, the opening `(` is already consumed.
	fn arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
		let mut arguments = Vec::new();
		if !self.match_lexeme(")") {
			arguments.push(self.expression()?);
			while self.match_lexeme(",") {
				arguments.push(self.expression()?);
			}
			self.expect(")")?;
		}
		Ok(arguments)
	}

	/// Go one nesting level deeper, failing past [`MAX_NESTING`].
	fn enter(&mut self) -> Result<(), ParseError> {
		if self.depth >= MAX_NESTING {
			return Err(ParseError::new(self.offset(), ParseErrorType::TooDeeplyNested(MAX_NESTING)));
		}
		self.depth += 1;
		Ok(())
	}

	fn node(&mut self, kind: ExpressionKind) -> Expression {
		let id = self.next_id();
		Expression::new(id, kind)
	}

	fn next_id(&mut self) -> NodeId {
		let id = NodeId(self.next_id);
		self.next_id += 1;
		id
	}

	/// Peek at the current token.
	fn peek(&self) -> Option<&Token<'a>> { self.tokens.get(self.current) }

	fn is_at_end(&self) -> bool { self.current >= self.tokens.len() }

	/// Whether the current token is a non-literal token with this lexeme.
	fn check(&self, lexeme: &str) -> bool {
		self.peek().is_some_and(|t| {
			matches!(t.r#type, TokenType::Identifier | TokenType::Operator) && t.lexeme == lexeme
		})
	}

	/// Consume the current token if `check` holds.
	fn match_lexeme(&mut self, lexeme: &str) -> bool {
		let matched = self.check(lexeme);
		if matched {
			self.current += 1;
		}
		matched
	}

	fn expect(&mut self, lexeme: &'static str) -> Result<(), ParseError> {
		if self.match_lexeme(lexeme) {
			Ok(())
		} else {
			Err(ParseError::new(self.offset(), ParseErrorType::Expected(lexeme)))
		}
	}

	fn expect_identifier(&mut self) -> Result<String, ParseError> {
		match self.peek() {
			Some(token) if token.r#type == TokenType::Identifier => {
				let name = token.lexeme.to_string();
				self.current += 1;
				Ok(name)
			}
			_ => Err(ParseError::new(self.offset(), ParseErrorType::ExpectedIdentifier)),
		}
	}

	/// Offset of the current token, or just past the last one at end of input.
	fn offset(&self) -> usize {
		match self.peek() {
			Some(token) => token.offset,
			None => self.tokens.last().map_or(0, Token::end),
		}
	}
}

/// Strip the surrounding quotes of a string or character lexeme.
fn unquote(lexeme: &str) -> &str { &lexeme[1..lexeme.len() - 1] }

/// Drop a leading `+`, the big number parsers only agree on `-`.
fn unsigned(lexeme: &str) -> &str { lexeme.strip_prefix('+').unwrap_or(lexeme) }

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::lex;

	fn parse_expression(input: &str, equals: &str) {
		let mut parser = Parser::new(lex(input).unwrap());
		let ast = parser.expression().unwrap();
		assert!(parser.is_at_end(), "{input:?} left tokens behind");
		assert_eq!(ast.to_string(), equals);
	}

	fn parse_error(input: &str) -> ParseError { parse(lex(input).unwrap()).unwrap_err() }

	#[test]
	fn parse_literals() {
		parse_expression("TRUE", "TRUE");
		parse_expression("FALSE", "FALSE");
		parse_expression("NIL", "NIL");
		parse_expression("42", "42");
		parse_expression("-42", "-42");
		parse_expression("+42", "42");
		parse_expression("3.14", "3.14");
		parse_expression("'c'", "'c'");
		parse_expression(r"'\n'", r"'\n'");
		parse_expression(r#""hello""#, r#""hello""#);
		parse_expression(r#""a\tb\"c\"""#, r#""a\tb\"c\"""#);
	}

	#[test]
	fn parse_big_literals() {
		let mut parser = Parser::new(lex("123456789012345678901234567890").unwrap());
		let ExpressionKind::Literal(LiteralValue::Integer(n)) = parser.expression().unwrap().kind else { panic!() };
		assert_eq!(n.to_string(), "123456789012345678901234567890");
	}

	#[test]
	fn parse_binary() {
		parse_expression("1 + 2 * 3", "(+ 1 (* 2 3))");
		parse_expression("1 - 2 - 3", "(- (- 1 2) 3)");
		parse_expression("1 / 2 * 3", "(* (/ 1 2) 3)");
		parse_expression("a AND b OR c", "(OR (AND a b) c)");
		parse_expression("a OR b AND c", "(AND (OR a b) c)");
		parse_expression("1 < 2 == TRUE", "(== (< 1 2) TRUE)");
		parse_expression("x + 1 <= y * 2", "(<= (+ x 1) (* y 2))");
		parse_expression("a == b AND c != d", "(AND (== a b) (!= c d))");
	}

	#[test]
	fn parse_grouping() {
		parse_expression("(1 + 2) * 3", "(* (group (+ 1 2)) 3)");
		parse_expression("(x)", "(group x)");
		parse_expression("((1 + 2))", "(group (group (+ 1 2)))");
	}

	#[test]
	fn parse_access_and_calls() {
		parse_expression("name", "name");
		parse_expression("obj.field", "(get obj.field)");
		parse_expression("obj.a.b", "(get (get obj.a).b)");
		parse_expression("f()", "(call f)");
		parse_expression("f(1, x + 2)", "(call f 1 (+ x 2))");
		parse_expression("obj.method()", "(call obj.method)");
		parse_expression("obj.method(1).next", "(get (call obj.method 1).next)");
		parse_expression("f(x).g(y, z)", "(call (call f x).g y z)");
		parse_expression("a.b + c.d(1)", "(+ (get a.b) (call c.d 1))");
	}

	#[test]
	fn parse_nesting_limit() {
		let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
		assert!(Parser::new(lex(&nested(100)).unwrap()).expression().is_ok());
		let error = Parser::new(lex(&nested(100_000)).unwrap()).expression().unwrap_err();
		assert_eq!(error.r#type, ParseErrorType::TooDeeplyNested(MAX_NESTING));

		let chain = |n: usize| format!("1{}", " + 1".repeat(n));
		assert!(Parser::new(lex(&chain(150)).unwrap()).expression().is_ok());
		assert!(Parser::new(lex(&chain(100_000)).unwrap()).expression().is_err());
		let access = format!("a{}", ".b".repeat(100_000));
		assert!(Parser::new(lex(&access).unwrap()).expression().is_err());

		let ifs = |n: usize| format!("DEF main() DO {}RETURN 0; {}END", "IF TRUE DO ".repeat(n), "END ".repeat(n));
		assert!(parse(lex(&ifs(50)).unwrap()).is_ok());
		assert_eq!(parse_error(&ifs(10_000)).r#type, ParseErrorType::TooDeeplyNested(MAX_NESTING));
	}

	#[test]
	fn parse_node_ids_are_unique() {
		let mut parser = Parser::new(lex("f(a + 1, b.c)").unwrap());
		let expression = parser.expression().unwrap();
		let ExpressionKind::Function { arguments, .. } = &expression.kind else { panic!() };
		let mut ids = vec![expression.id, arguments[0].id, arguments[1].id];
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), 3);
	}

	#[test]
	fn parse_errors() {
		use ParseErrorType::*;

		assert_eq!(parse_error("DEF main() DO RETURN 1 END"), ParseError::new(23, Expected(";")));
		assert_eq!(parse_error("DEF main(1) DO END"), ParseError::new(9, ExpectedIdentifier));
		assert_eq!(parse_error("DEF main() DO"), ParseError::new(13, Expected("END")));
		assert_eq!(parse_error("DEF main() DO f(; END"), ParseError::new(16, ExpectedExpression));
		assert_eq!(parse_error("DEF main() DO f(1 2); END"), ParseError::new(18, Expected(")")));
		assert_eq!(parse_error("DEF main() DO x = (1 + 2; END"), ParseError::new(24, UnterminatedParenthesis));
		assert_eq!(parse_error("DEF main() DO x.1; END"), ParseError::new(16, ExpectedIdentifier));
		assert_eq!(parse_error("DEF main() DO IF x f(); END END"), ParseError::new(19, Expected("DO")));
		assert_eq!(parse_error("DEF f() DO END LET x;"), ParseError::new(15, TrailingTokens("LET".into())));
		assert_eq!(parse_error("LET x = ;"), ParseError::new(8, ExpectedExpression));
		assert_eq!(parse_error("x"), ParseError::new(0, TrailingTokens("x".into())));
	}

	#[test]
	fn parse_empty_source() {
		assert_eq!(parse(Vec::new()).unwrap(), Source::default());
	}
}
