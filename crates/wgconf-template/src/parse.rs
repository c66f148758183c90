// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Interpolation template parser.
//!
//! Supported syntax:
//!
//! - literal text, with `$${` and `%%{` escaping `${` and `%{`
//! - `${ expr }` interpolation
//!
//! `%{ ... }` directives (`if`, `for`) are rejected rather than copied through
//! as text.
//! - expressions: variables, `"quoted ${strings}"`, numbers, `true`/`false`,
//!   `[list, literals]`, `(parenthesised)` expressions and `func(arg, ...)` calls

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
	pub line: usize,
	pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
	pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
	Literal(String),
	Interpolation(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Variable {
		name: String,
		pos: Pos,
	},
	String(Template),
	Number(f64),
	Bool(bool),
	List(Vec<Expr>),
	Call {
		name: String,
		args: Vec<Expr>,
		pos: Pos,
	},
}

pub fn parse_template(src: &str) -> Result<Template, ParseError> {
	Parser::new(src).template(None)
}

struct Parser {
	chars: Vec<char>,
	idx: usize,
	line: usize,
	column: usize,
}

impl Parser {
	fn new(src: &str) -> Self {
		Self {
			chars: src.chars().collect(),
			idx: 0,
			line: 1,
			column: 1,
		}
	}

	fn peek(&self) -> Option<char> {
		self.chars.get(self.idx).copied()
	}

	fn starts_with(&self, s: &str) -> bool {
		s.chars()
			.enumerate()
			.all(|(i, c)| self.chars.get(self.idx + i) == Some(&c))
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.idx += 1;
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	fn advance(&mut self, n: usize) {
		for _ in 0..n {
			self.bump();
		}
	}

	fn pos(&self) -> Pos {
		Pos {
			line: self.line,
			column: self.column,
		}
	}

	fn skip_ws(&mut self) {
		while matches!(self.peek(), Some(c) if c.is_whitespace()) {
			self.bump();
		}
	}

	fn error(&self, pos: Pos, message: impl Into<String>) -> ParseError {
		ParseError {
			message: message.into(),
			line: pos.line,
			column: pos.column,
		}
	}

	/// Parse template text. `quote` is the position of the opening quote when
	/// parsing a quoted string inside an expression.
	fn template(&mut self, quote: Option<Pos>) -> Result<Template, ParseError> {
		let mut parts = Vec::new();
		let mut literal = String::new();

		loop {
			if self.starts_with("$${") {
				self.advance(3);
				literal.push_str("${");
				continue;
			}
			if self.starts_with("%%{") {
				self.advance(3);
				literal.push_str("%{");
				continue;
			}
			if self.starts_with("${") {
				if !literal.is_empty() {
					parts.push(Part::Literal(std::mem::take(&mut literal)));
				}
				let open = self.pos();
				self.advance(2);
				parts.push(Part::Interpolation(self.interpolation(open)?));
				continue;
			}
			if self.starts_with("%{") {
				return Err(self.error(
					self.pos(),
					"template directives are not supported, use %%{ for a literal %{",
				));
			}

			match (self.peek(), quote) {
				(None, Some(start)) => {
					return Err(self.error(start, "unterminated string literal"));
				}
				(None, None) => break,
				(Some('"'), Some(_)) => {
					self.bump();
					break;
				}
				(Some('\\'), Some(_)) => {
					self.bump();
					literal.push(self.escape()?);
				}
				(Some(c), _) => {
					self.bump();
					literal.push(c);
				}
			}
		}

		if !literal.is_empty() {
			parts.push(Part::Literal(literal));
		}
		Ok(Template { parts })
	}

	fn escape(&mut self) -> Result<char, ParseError> {
		let pos = self.pos();
		match self.bump() {
			Some('n') => Ok('\n'),
			Some('t') => Ok('\t'),
			Some('r') => Ok('\r'),
			Some('"') => Ok('"'),
			Some('\\') => Ok('\\'),
			Some(c) => Err(self.error(pos, format!("invalid escape sequence \\{c}"))),
			None => Err(self.error(pos, "unterminated string literal")),
		}
	}

	fn interpolation(&mut self, open: Pos) -> Result<Expr, ParseError> {
		self.skip_ws();
		if self.peek() == Some('}') {
			return Err(self.error(open, "empty interpolation"));
		}
		let expr = self.expr()?;
		self.skip_ws();
		match self.peek() {
			Some('}') => {
				self.bump();
				Ok(expr)
			}
			None => Err(self.error(open, "unterminated interpolation, expected '}'")),
			Some(c) => Err(self.error(
				self.pos(),
				format!("unexpected character {c:?}, expected '}}'"),
			)),
		}
	}

	fn expr(&mut self) -> Result<Expr, ParseError> {
		self.skip_ws();
		let pos = self.pos();
		match self.peek() {
			None => Err(self.error(pos, "expected expression, found end of template")),
			Some('"') => {
				self.bump();
				Ok(Expr::String(self.template(Some(pos))?))
			}
			Some('[') => {
				self.bump();
				Ok(Expr::List(self.sequence(']')?))
			}
			Some('(') => {
				self.bump();
				let inner = self.expr()?;
				self.skip_ws();
				if self.peek() != Some(')') {
					return Err(self.error(self.pos(), "expected ')'"));
				}
				self.bump();
				Ok(inner)
			}
			Some(c) if c.is_ascii_digit() || c == '-' => self.number(pos),
			Some(c) if c.is_alphabetic() || c == '_' => {
				let name = self.ident();
				self.skip_ws();
				if self.peek() == Some('(') {
					self.bump();
					let args = self.sequence(')')?;
					return Ok(Expr::Call { name, args, pos });
				}
				Ok(match name.as_str() {
					"true" => Expr::Bool(true),
					"false" => Expr::Bool(false),
					_ => Expr::Variable { name, pos },
				})
			}
			Some(c) => Err(self.error(pos, format!("unexpected character {c:?} in expression"))),
		}
	}

	fn sequence(&mut self, close: char) -> Result<Vec<Expr>, ParseError> {
		let mut items = Vec::new();
		loop {
			self.skip_ws();
			if self.peek() == Some(close) {
				self.bump();
				return Ok(items);
			}
			items.push(self.expr()?);
			self.skip_ws();
			match self.peek() {
				Some(',') => {
					self.bump();
				}
				Some(c) if c == close => {
					self.bump();
					return Ok(items);
				}
				None => {
					return Err(self.error(
						self.pos(),
						format!("expected '{close}' before end of template"),
					));
				}
				Some(c) => {
					return Err(self.error(
						self.pos(),
						format!("unexpected character {c:?}, expected ',' or '{close}'"),
					));
				}
			}
		}
	}

	fn number(&mut self, pos: Pos) -> Result<Expr, ParseError> {
		let mut text = String::new();
		if self.peek() == Some('-') {
			self.bump();
			text.push('-');
		}
		while let Some(c) = self.peek() {
			if !(c.is_ascii_digit() || c == '.') {
				break;
			}
			text.push(c);
			self.bump();
		}
		text.parse::<f64>()
			.map(Expr::Number)
			.map_err(|_| self.error(pos, format!("invalid number {text:?}")))
	}

	fn ident(&mut self) -> String {
		let mut name = String::new();
		while let Some(c) = self.peek() {
			if !(c.is_alphanumeric() || c == '_' || c == '-') {
				break;
			}
			name.push(c);
			self.bump();
		}
		name
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn var(name: &str, line: usize, column: usize) -> Expr {
		Expr::Variable {
			name: name.to_string(),
			pos: Pos { line, column },
		}
	}

	#[test]
	fn plain_text_is_single_literal() {
		let t = parse_template("[Interface]\nListenPort = 51820\n").unwrap();
		assert_eq!(
			t.parts,
			vec![Part::Literal("[Interface]\nListenPort = 51820\n".into())]
		);
	}

	#[test]
	fn empty_template_has_no_parts() {
		assert!(parse_template("").unwrap().parts.is_empty());
	}

	#[test]
	fn interpolation_splits_literals() {
		let t = parse_template("Hello ${name}!").unwrap();
		assert_eq!(
			t.parts,
			vec![
				Part::Literal("Hello ".into()),
				Part::Interpolation(var("name", 1, 9)),
				Part::Literal("!".into()),
			]
		);
	}

	#[test]
	fn escapes_produce_literal_markers() {
		let t = parse_template("$${not} %%{this}").unwrap();
		assert_eq!(t.parts, vec![Part::Literal("${not} %{this}".into())]);
	}

	#[test]
	fn function_call_with_nested_args() {
		let t = parse_template(r#"${join(", ", [upper(a), "b-${c}", 3, true])}"#).unwrap();
		let Part::Interpolation(Expr::Call { name, args, .. }) = &t.parts[0] else {
			panic!("expected call, got {:?}", t.parts);
		};
		assert_eq!(name, "join");
		assert_eq!(args.len(), 2);
		let Expr::List(items) = &args[1] else {
			panic!("expected list");
		};
		assert_eq!(items.len(), 4);
		assert_eq!(items[2], Expr::Number(3.0));
		assert_eq!(items[3], Expr::Bool(true));
	}

	#[test]
	fn string_escapes() {
		let t = parse_template(r#"${"a\tb\n\"q\""}"#).unwrap();
		assert_eq!(
			t.parts,
			vec![Part::Interpolation(Expr::String(Template {
				parts: vec![Part::Literal("a\tb\n\"q\"".into())],
			}))]
		);
	}

	#[test]
	fn positions_track_lines() {
		let t = parse_template("line one\n  ${addr}").unwrap();
		assert_eq!(t.parts[1], Part::Interpolation(var("addr", 2, 5)));
	}

	#[test]
	fn unterminated_interpolation_reports_open_position() {
		let err = parse_template("abc ${name").unwrap_err();
		assert_eq!((err.line, err.column), (1, 5));
		assert!(err.message.contains("unterminated interpolation"));
	}

	#[test]
	fn unterminated_string_is_error() {
		let err = parse_template(r#"${"abc}"#).unwrap_err();
		assert!(err.message.contains("unterminated string"));
	}

	#[test]
	fn empty_interpolation_is_error() {
		let err = parse_template("${ }").unwrap_err();
		assert_eq!(err.message, "empty interpolation");
	}

	#[test]
	fn directive_is_rejected_at_its_position() {
		let err = parse_template("[Peer]\n%{ if keepalive }x%{ endif }").unwrap_err();
		assert_eq!((err.line, err.column), (2, 1));
		assert!(err.message.contains("directives are not supported"));
		assert!(parse_template(r#"${"a %{ for x }"}"#).is_err());
	}

	#[test]
	fn lone_percent_is_literal() {
		let t = parse_template("100% {x}").unwrap();
		assert_eq!(t.parts, vec![Part::Literal("100% {x}".into())]);
	}

	#[test]
	fn stray_character_is_error() {
		let err = parse_template("${a b}").unwrap_err();
		assert_eq!((err.line, err.column), (1, 5));
	}

	#[test]
	fn bad_number_is_error() {
		let err = parse_template("${1.2.3}").unwrap_err();
		assert!(err.message.contains("invalid number"));
	}

	#[test]
	fn trailing_comma_in_list() {
		let t = parse_template("${[a, b,]}").unwrap();
		assert!(matches!(&t.parts[0], Part::Interpolation(Expr::List(items)) if items.len() == 2));
	}
}
