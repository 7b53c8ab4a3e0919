//! # How program text becomes a result
//!
//! User's source code:
//!
//! ``` plc
//! LET base = 10;
//! DEF main() DO RETURN base * 2 + 1; END
//! ```

//! ## Scanning
//!
//! Also known as `lexing` or `lexical analysis`, takes in the characters and
//! converts them into tokens. The scanner knows only six kinds of token:
//! identifiers, integers, decimals, characters, strings and operators.
//! Keywords like `LET` and `DEF` are plain identifiers at this point, and
//! every punctuation character is an operator.
//!
//! Whitespaces are ignored. So the tokens are
//! `["LET", "base", "=", "10", ";", "DEF", "main", "(", ")", "DO", ...]`.

//! ## Parsing
//!
//! A recursive-descent `parser` builds the `abstract syntax tree` from the
//! tokens and reports the first `syntax error`. Operator precedence is decided
//! here and nowhere else.
//!
//! ``` markdown
//! main (Method)
//! └── RETURN (Statement)
//!     └── + (Binary)
//!         ├── * (Binary)
//!         │   ├── base (Access)
//!         │   └── 10 (Literal)
//!         └── 1 (Literal)
//! ```

//! ## Static analysis
//!
//! Every name is resolved against the scope it appears in and every
//! expression gets a type. The types are nominal; besides identity, `Any`
//! accepts every type and `Comparable` accepts the four ordered ones.
//! Structural rules are checked here too, e.g. an expression statement must be
//! a call and a `main` returning an `Integer` must exist.
//!
//! The tree itself is never changed. What the analyzer learns goes into a side
//! table keyed by node id.

//! ## Tree-walk interpreter
//!
//! Execute the analyzed tree directly. Integers and decimals are arbitrary
//! precision at runtime, `AND` and `OR` short-circuit, and a `RETURN` travels
//! up as a value rather than as a panic. The only effects are the output of
//! natives like `print` and the value `main` returns.
//!
//! Every stage runs to completion before the next one starts, and the first
//! error of any stage ends the run.

pub mod analyzer;
pub mod builtins;
pub mod cli;
pub mod environment;
mod error;
pub mod interpreter;
pub mod parser;
mod plcer;
pub mod scanner;
pub mod statement;
mod utils;

pub use builtins::Builtins;
pub use error::{PlcError, analyzer::SemanticError, interpreter::RuntimeError, parser::{ParseError, ParseErrorType}, scanner::{LexError, LexErrorType}};
pub use plcer::Plcer;
pub use utils::RcCell;
