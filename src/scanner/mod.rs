//! Turns source text into a flat list of tokens.
//!
//! The scanner never consults the grammar. It skips whitespace, then decides
//! what the next lexeme is from its first character:
//!
//! |First character|Token
//! --|--
//! `A-Z a-z _`|identifier, continuing with `A-Z a-z 0-9 _ -`
//! `0-9`, or `+`/`-` directly before a digit|integer or decimal
//! `"`|string
//! `'`|character
//! anything else|operator, `<= >= != ==` preferred over their first character
//!
//! Every lexeme is taken by `maximal munch`, except that a `.` only belongs to a
//! number when a digit follows it: `1.` is the integer `1` and the operator `.`.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
pub use token::*;

use crate::error::scanner::{LexError, LexErrorType};

/// Lex a whole source buffer.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, LexError> { Scanner::new(source).scan_tokens() }

/// A scanner for source code
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points just past the character most recently consumed
	cursor:      usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0 }
	}

	/// Scan all tokens from the source code, stopping at the first error.
	pub fn scan_tokens(&mut self) -> Result<Vec<Token<'a>>, LexError> {
		let mut tokens = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			self.scan_token(&mut tokens)?;
		}
		tracing::trace!(count = tokens.len(), "scanned tokens");
		Ok(tokens)
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token<'a>>) -> Result<(), LexError> {
		let Some(next_char) = self.advance() else { return Ok(()) };
		let r#type = match next_char {
			' ' | '\t' | '\n' | '\r' | '\u{8}' => return Ok(()),
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			c if c.is_ascii_digit() => self.number(),
			'+' | '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.number(),
			'"' => self.string()?,
			'\'' => self.character()?,
			'<' | '>' | '!' | '=' => {
				self.match_next('=');
				Operator
			}
			_ => Operator,
		};

		let lexeme = &self.source[self.start..self.cursor];
		tokens.push(Token::new(r#type, lexeme, self.start));
		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Offset of the character `peek` would return, or the end of input.
	fn offset(&mut self) -> usize { self.source_iter.peek().map_or(self.source.len(), |&(i, _)| i) }

	/// Scan an identifier. Keywords are identifiers too.
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
			self.advance();
		}
		Identifier
	}

	/// Scan a number literal, the sign (if any) is already consumed.
	fn number(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		// Look for a fractional part.
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
			return Decimal;
		}
		Integer
	}

	/// Scan a string literal, the opening `"` is already consumed.
	fn string(&mut self) -> Result<TokenType, LexError> {
		loop {
			let offset = self.offset();
			match self.advance() {
				None => return Err(LexError::new(offset, LexErrorType::UnterminatedString)),
				Some('"') => return Ok(String),
				Some('\n' | '\r') => return Err(LexError::new(offset, LexErrorType::LineBreakInLiteral)),
				Some('\\') => self.escape(LexErrorType::UnterminatedString)?,
				Some(_) => {}
			}
		}
	}

	/// Scan a character literal, the opening `'` is already consumed.
	fn character(&mut self) -> Result<TokenType, LexError> {
		let offset = self.offset();
		match self.advance() {
			None => return Err(LexError::new(offset, LexErrorType::UnterminatedCharacter)),
			Some('\'') => return Err(LexError::new(offset, LexErrorType::EmptyCharacter)),
			Some('\n' | '\r') => return Err(LexError::new(offset, LexErrorType::LineBreakInLiteral)),
			Some('\\') => self.escape(LexErrorType::UnterminatedCharacter)?,
			Some(_) => {}
		}

		let offset = self.offset();
		if !self.match_next('\'') {
			return Err(LexError::new(offset, LexErrorType::UnterminatedCharacter));
		}
		Ok(Character)
	}

	/// Validate the character after a `\`.
	fn escape(&mut self, unterminated: LexErrorType) -> Result<(), LexError> {
		let offset = self.offset();
		match self.advance() {
			Some('b' | 'n' | 'r' | 't' | '\'' | '"' | '\\') => Ok(()),
			Some(c) => Err(LexError::new(offset, LexErrorType::InvalidEscape(c))),
			None => Err(LexError::new(offset, unterminated)),
		}
	}
}

/// Replace the escape sequences of an already validated literal body.
pub(crate) fn unescape(body: &str) -> std::string::String {
	let mut result = std::string::String::with_capacity(body.len());
	let mut chars = body.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			result.push(c);
			continue;
		}
		match chars.next() {
			Some('b') => result.push('\u{8}'),
			Some('n') => result.push('\n'),
			Some('r') => result.push('\r'),
			Some('t') => result.push('\t'),
			Some(other) => result.push(other),
			None => {}
		}
	}
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(input: &str, ok: bool) {
		let result = lex(input);
		assert!(result.is_ok() == ok, "{input:?} => {result:?}");
	}

	fn types(input: &str) -> Vec<(TokenType, &str)> {
		lex(input).unwrap().into_iter().map(|t| (t.r#type, t.lexeme)).collect()
	}

	fn error(input: &str) -> LexError { lex(input).unwrap_err() }

	#[test]
	fn scan_tokens() {
		scan("", true);
		scan("(", true);
		scan("()", true);
		scan(" ( ) ", true);
		scan("@", true);
		scan("12345", true);
		scan("user", true);
		scan("LET x = 1;", true);
	}

	#[test]
	fn scan_whitespace() {
		assert!(types(" ").is_empty());
		assert!(types("\t").is_empty());
		assert!(types("\r").is_empty());
		assert!(types("\n").is_empty());
		assert!(types("\u{8}").is_empty());
		assert!(types("  \t\r\n  ").is_empty());
	}

	#[test]
	fn scan_identifiers() {
		assert_eq!(types("x"), [(Identifier, "x")]);
		assert_eq!(types("_name"), [(Identifier, "_name")]);
		assert_eq!(types("kebab-case"), [(Identifier, "kebab-case")]);
		assert_eq!(types("abc123"), [(Identifier, "abc123")]);
		assert_eq!(types("LET DEF"), [(Identifier, "LET"), (Identifier, "DEF")]);
		// A leading hyphen is a sign or an operator, never part of the identifier.
		assert_eq!(types("-x"), [(Operator, "-"), (Identifier, "x")]);
	}

	#[test]
	fn scan_numbers() {
		assert_eq!(types("0"), [(Integer, "0")]);
		assert_eq!(types("42"), [(Integer, "42")]);
		assert_eq!(types("-42"), [(Integer, "-42")]);
		assert_eq!(types("+7"), [(Integer, "+7")]);
		assert_eq!(types("3.14"), [(Decimal, "3.14")]);
		assert_eq!(types("-0.5"), [(Decimal, "-0.5")]);
		assert_eq!(types("1."), [(Integer, "1"), (Operator, ".")]);
		assert_eq!(types(".5"), [(Operator, "."), (Integer, "5")]);
		assert_eq!(types("1..3"), [(Integer, "1"), (Operator, "."), (Operator, "."), (Integer, "3")]);
		assert_eq!(types("- 1"), [(Operator, "-"), (Integer, "1")]);
	}

	#[test]
	fn scan_operators() {
		assert_eq!(types("<="), [(Operator, "<=")]);
		assert_eq!(types(">="), [(Operator, ">=")]);
		assert_eq!(types("!="), [(Operator, "!=")]);
		assert_eq!(types("=="), [(Operator, "==")]);
		assert_eq!(types("==="), [(Operator, "=="), (Operator, "=")]);
		assert_eq!(types("< ="), [(Operator, "<"), (Operator, "=")]);
		assert_eq!(types("(),.;"), [
			(Operator, "("),
			(Operator, ")"),
			(Operator, ","),
			(Operator, "."),
			(Operator, ";"),
		]);
		assert_eq!(types("你"), [(Operator, "你")]);
	}

	#[test]
	fn scan_strings() {
		assert_eq!(types(r#""""#), [(String, r#""""#)]);
		assert_eq!(types(r#""hello world""#), [(String, r#""hello world""#)]);
		assert_eq!(types(r#""a\nb\t\"q\"\\""#), [(String, r#""a\nb\t\"q\"\\""#)]);
		assert_eq!(types(r#""世界""#), [(String, r#""世界""#)]);

		assert_eq!(error(r#""unterminated"#), LexError::new(13, LexErrorType::UnterminatedString));
		assert_eq!(error("\"a\nb\""), LexError::new(2, LexErrorType::LineBreakInLiteral));
		assert_eq!(error(r#""bad\q""#), LexError::new(5, LexErrorType::InvalidEscape('q')));
		assert_eq!(error(r#""ends\"#), LexError::new(6, LexErrorType::UnterminatedString));
	}

	#[test]
	fn scan_characters() {
		assert_eq!(types("'c'"), [(Character, "'c'")]);
		assert_eq!(types(r"'\n'"), [(Character, r"'\n'")]);
		assert_eq!(types(r"'\''"), [(Character, r"'\''")]);
		assert_eq!(types("'\"'"), [(Character, "'\"'")]);

		assert_eq!(error("''"), LexError::new(1, LexErrorType::EmptyCharacter));
		assert_eq!(error("'"), LexError::new(1, LexErrorType::UnterminatedCharacter));
		assert_eq!(error("'ab'"), LexError::new(2, LexErrorType::UnterminatedCharacter));
		assert_eq!(error("'\n'"), LexError::new(1, LexErrorType::LineBreakInLiteral));
		assert_eq!(error(r"'\x'"), LexError::new(2, LexErrorType::InvalidEscape('x')));
	}

	#[test]
	fn scan_offsets() {
		let tokens = lex("LET x = 5;").unwrap();
		let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
		assert_eq!(offsets, [0, 4, 6, 8, 9]);
		assert_eq!(tokens[3].end(), 9);
	}

	#[test]
	fn scan_first_error_wins() {
		// The character error comes first even though the string is also broken.
		assert_eq!(error("'' \"open").r#type, LexErrorType::EmptyCharacter);
	}

	#[test]
	fn unescape_literals() {
		assert_eq!(unescape(r"a\nb"), "a\nb");
		assert_eq!(unescape(r#"\"q\""#), "\"q\"");
		assert_eq!(unescape(r"\\\t\b\r\'"), "\\\t\u{8}\r'");
		assert_eq!(unescape("plain"), "plain");
	}
}
