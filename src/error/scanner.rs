/// A lexing failure, pinned to the byte offset of the offending character.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("offset {offset}: {type}")]
pub struct LexError {
	/// Byte offset into the source where the error was detected.
	pub offset: usize,
	/// The type of lexing error.
	pub r#type: LexErrorType,
}

impl LexError {
	pub fn new(offset: usize, r#type: LexErrorType) -> Self { Self { offset, r#type } }
}

/// Types of lexing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorType {
	/// A string literal reached end of input before its closing `"`.
	UnterminatedString,
	/// A character literal is missing its closing `'`.
	UnterminatedCharacter,
	/// `''` with nothing between the quotes.
	EmptyCharacter,
	/// A raw newline or carriage return inside a literal.
	LineBreakInLiteral,
	/// An escape sequence other than `\b \n \r \t \' \" \\`.
	InvalidEscape(char),
}

impl std::fmt::Display for LexErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use LexErrorType::*;
		match self {
			UnterminatedString => write!(f, "Unterminated string"),
			UnterminatedCharacter => write!(f, "Unterminated character"),
			EmptyCharacter => write!(f, "Empty character"),
			LineBreakInLiteral => write!(f, "Line break inside literal"),
			InvalidEscape(c) => write!(f, "Invalid escape '\\{c}'"),
		}
	}
}
