// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::EvalError;
use crate::functions::FunctionLibrary;
use crate::parse::{Expr, Part, Template};
use crate::value::Value;
use crate::vars::TemplateVars;

/// Variables and functions visible to an evaluation.
pub struct Scope<'a> {
	vars: &'a TemplateVars,
	functions: &'a FunctionLibrary,
}

impl<'a> Scope<'a> {
	pub fn new(vars: &'a TemplateVars, functions: &'a FunctionLibrary) -> Self {
		Self { vars, functions }
	}

	/// Evaluate a template.
	///
	/// A template made of exactly one interpolation yields that expression's
	/// value unchanged; anything else concatenates the string form of each
	/// part.
	pub fn eval_template(&self, template: &Template) -> Result<Value, EvalError> {
		if let [Part::Interpolation(expr)] = template.parts.as_slice() {
			return self.eval_expr(expr);
		}

		let mut out = String::new();
		for part in &template.parts {
			match part {
				Part::Literal(text) => out.push_str(text),
				Part::Interpolation(expr) => {
					let value = self.eval_expr(expr)?;
					let text = value
						.to_primitive_string()
						.ok_or(EvalError::InvalidInterpolation {
							found: value.type_name(),
						})?;
					out.push_str(&text);
				}
			}
		}
		Ok(Value::String(out))
	}

	fn eval_expr(&self, expr: &Expr) -> Result<Value, EvalError> {
		match expr {
			Expr::Variable { name, pos } => self
				.vars
				.get(name)
				.map(|v| Value::String(v.clone()))
				.ok_or_else(|| EvalError::UndefinedVariable {
					name: name.clone(),
					line: pos.line,
					column: pos.column,
				}),
			Expr::String(template) => self.eval_template(template),
			Expr::Number(n) => Ok(Value::Number(*n)),
			Expr::Bool(b) => Ok(Value::Bool(*b)),
			Expr::List(items) => items
				.iter()
				.map(|item| self.eval_expr(item))
				.collect::<Result<Vec<_>, _>>()
				.map(Value::List),
			Expr::Call { name, args, pos } => {
				let function = self
					.functions
					.get(name)
					.ok_or_else(|| EvalError::UnknownFunction {
						name: name.clone(),
						line: pos.line,
						column: pos.column,
					})?;
				if !function.arity.accepts(args.len()) {
					return Err(EvalError::Arity {
						function: name.clone(),
						expected: function.arity.to_string(),
						got: args.len(),
					});
				}
				let values = args
					.iter()
					.map(|arg| self.eval_expr(arg))
					.collect::<Result<Vec<_>, _>>()?;
				function
					.call(&values)
					.map_err(|message| EvalError::Function {
						function: name.clone(),
						message,
					})
			}
		}
	}
}
