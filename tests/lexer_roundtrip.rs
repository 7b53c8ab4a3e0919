use plcer::{parser::parse, scanner::{TokenType, lex}};
use proptest::prelude::*;

const MAX_INPUT_BYTES: usize = 256;

fn any_lexeme() -> impl Strategy<Value = (TokenType, String)> {
	prop_oneof![
		"[A-Za-z_][A-Za-z0-9_-]{0,12}".prop_map(|s| (TokenType::Identifier, s)),
		"[+-]?[0-9]{1,12}".prop_map(|s| (TokenType::Integer, s)),
		"[+-]?[0-9]{1,6}\\.[0-9]{1,6}".prop_map(|s| (TokenType::Decimal, s)),
		r#""([^"\\\n\r]|\\[bnrt'"\\]){0,12}""#.prop_map(|s| (TokenType::String, s)),
		r#"'([^'\\\n\r]|\\[bnrt'"\\])'"#.prop_map(|s| (TokenType::Character, s)),
		"<=|>=|!=|==|[(),.;:*/@#%<>!=+-]".prop_map(|s| (TokenType::Operator, s)),
	]
}

proptest! {
	#[test]
	fn single_lexeme_scans_to_itself((kind, lexeme) in any_lexeme()) {
		let tokens = lex(&lexeme).unwrap();
		prop_assert_eq!(tokens.len(), 1, "{:?} => {:?}", lexeme, tokens);
		prop_assert_eq!(tokens[0].r#type, kind);
		prop_assert_eq!(tokens[0].lexeme, lexeme.as_str());
		prop_assert_eq!(tokens[0].offset, 0);
	}

	#[test]
	fn rescanned_lexemes_keep_their_kind(lexemes in proptest::collection::vec(any_lexeme(), 0..16)) {
		let source = lexemes.iter().map(|(_, lexeme)| lexeme.as_str()).collect::<Vec<_>>().join(" ");
		let tokens = lex(&source).unwrap();
		prop_assert_eq!(tokens.len(), lexemes.len());
		for token in &tokens {
			prop_assert_eq!(&source[token.offset..token.end()], token.lexeme);
			let rescanned = lex(token.lexeme).unwrap();
			prop_assert_eq!(rescanned.len(), 1);
			prop_assert_eq!(rescanned[0].r#type, token.r#type);
			prop_assert_eq!(rescanned[0].lexeme, token.lexeme);
		}
	}

	#[test]
	fn lex_and_parse_handle_lossy_utf8_inputs_without_panicking(
		bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
	) {
		let input = String::from_utf8_lossy(&bytes).into_owned();
		if let Ok(tokens) = lex(&input) {
			let _ = parse(tokens);
		}
	}
}
