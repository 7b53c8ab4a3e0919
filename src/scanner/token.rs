/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
	pub r#type: TokenType,
	/// The raw slice of source text, quotes and escapes included.
	pub lexeme: &'a str,
	/// Byte offset of the first character of `lexeme`.
	pub offset: usize,
}

impl<'a> Token<'a> {
	pub fn new(r#type: TokenType, lexeme: &'a str, offset: usize) -> Self { Self { r#type, lexeme, offset } }

	/// Offset of the first byte after this token.
	pub fn end(&self) -> usize { self.offset + self.lexeme.len() }
}

/// The different types of tokens.
///
/// Keywords such as `LET` or `DO` are plain identifiers here; the parser tells
/// them apart by lexeme. Punctuation is an operator like any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// `[A-Za-z_][A-Za-z0-9_-]*`.
	Identifier,
	/// Optionally signed digits, e.g. `-42`.
	Integer,
	/// Optionally signed digits with a fractional part, e.g. `3.14`.
	Decimal,
	/// Quoted character literal, e.g. `'c'` or `'\n'`.
	Character,
	/// Quoted string literal, e.g. `"hello"`.
	String,
	/// `<= >= != ==` or any other single character.
	Operator,
}

impl std::fmt::Display for TokenType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			TokenType::Identifier => "identifier",
			TokenType::Integer => "integer",
			TokenType::Decimal => "decimal",
			TokenType::Character => "character",
			TokenType::String => "string",
			TokenType::Operator => "operator",
		};
		write!(f, "{name}")
	}
}
