/// A grammar violation at the offending token's source offset.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("offset {offset}: {type}")]
pub struct ParseError {
	pub offset: usize,
	pub r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(offset: usize, r#type: ParseErrorType) -> Self { Self { offset, r#type } }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorType {
	ExpectedExpression,
	ExpectedIdentifier,
	/// A specific token such as `;` or `END` was required.
	Expected(&'static str),
	UnterminatedParenthesis,
	/// A number or character lexeme that does not convert to a value.
	InvalidLiteral,
	/// Tokens left over after the last method.
	TrailingTokens(String),
	/// Expressions or blocks nested beyond the parser's limit.
	TooDeeplyNested(usize),
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			ExpectedExpression => {
				write!(f, "Expected expression")
			}
			ExpectedIdentifier => {
				write!(f, "Expected identifier")
			}
			Expected(token) => {
				write!(f, "Expected '{token}'")
			}
			UnterminatedParenthesis => {
				write!(f, "Unterminated parenthesis")
			}
			InvalidLiteral => {
				write!(f, "Invalid literal")
			}
			TrailingTokens(lexeme) => {
				write!(f, "Unexpected '{lexeme}' after the last method")
			}
			TooDeeplyNested(limit) => {
				write!(f, "Nested deeper than {limit} levels")
			}
		}
	}
}
