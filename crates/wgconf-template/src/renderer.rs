// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use tracing::{instrument, trace};

use crate::error::RenderError;
use crate::eval::Scope;
use crate::functions::FunctionLibrary;
use crate::parse::parse_template;
use crate::vars::TemplateVars;

/// Renders interpolation templates against string variables.
///
/// The function library is fixed at construction; rendering has no side
/// effects, so one renderer can be shared freely.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
	functions: Arc<FunctionLibrary>,
}

impl TemplateRenderer {
	pub fn new(functions: FunctionLibrary) -> Self {
		Self {
			functions: Arc::new(functions),
		}
	}

	pub fn with_builtins() -> Self {
		Self::new(FunctionLibrary::builtin())
	}

	pub fn functions(&self) -> &FunctionLibrary {
		&self.functions
	}

	/// Parse `template` without evaluating it.
	pub fn check(&self, template: &str) -> Result<(), RenderError> {
		parse_template(template)?;
		Ok(())
	}

	#[instrument(skip_all, fields(template_len = template.len(), vars = vars.len()))]
	pub fn render(&self, template: &str, vars: &TemplateVars) -> Result<String, RenderError> {
		let parsed = parse_template(template)?;
		let value = Scope::new(vars, &self.functions).eval_template(&parsed)?;
		let found = value.type_name();
		let rendered = value
			.into_primitive_string()
			.ok_or(RenderError::Coercion { found })?;
		trace!(rendered_len = rendered.len(), "rendered template");
		Ok(rendered)
	}
}

impl Default for TemplateRenderer {
	fn default() -> Self {
		Self::with_builtins()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::EvalError;
	use crate::functions::Arity;
	use crate::value::Value;
	use proptest::prelude::*;

	fn vars(entries: &[(&str, &str)]) -> TemplateVars {
		entries
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn renders_hello_world() {
		let renderer = TemplateRenderer::with_builtins();
		let out = renderer
			.render("Hello ${name}", &vars(&[("name", "World")]))
			.unwrap();
		assert_eq!(out, "Hello World");
	}

	#[test]
	fn undefined_variable_is_evaluation_error() {
		let renderer = TemplateRenderer::with_builtins();
		let err = renderer.render("${undefined_var}", &vars(&[])).unwrap_err();
		assert!(matches!(
			err,
			RenderError::Evaluation(EvalError::UndefinedVariable { .. })
		));
	}

	#[test]
	fn parse_failure_is_parse_error() {
		let renderer = TemplateRenderer::with_builtins();
		let err = renderer.render("${", &vars(&[])).unwrap_err();
		assert!(matches!(err, RenderError::Parse(_)));
		assert!(renderer.check("${").is_err());
		assert!(renderer.check("${ok}").is_ok());
	}

	#[test]
	fn directive_template_is_parse_error() {
		let renderer = TemplateRenderer::with_builtins();
		let err = renderer
			.render(
				"[Peer]\n%{ if keepalive == \"true\" }PersistentKeepalive = 25%{ endif }\n",
				&vars(&[("keepalive", "true")]),
			)
			.unwrap_err();
		assert!(matches!(err, RenderError::Parse(_)));
		assert_eq!(
			renderer.render("%%{ if x }", &vars(&[])).unwrap(),
			"%{ if x }"
		);
	}

	#[test]
	fn oversized_indent_is_evaluation_error() {
		let renderer = TemplateRenderer::with_builtins();
		let err = renderer
			.render("${indent(99999999999999999999, \"a\")}", &vars(&[]))
			.unwrap_err();
		assert!(matches!(
			err,
			RenderError::Evaluation(EvalError::Function { .. })
		));
	}

	#[test]
	fn list_result_is_coercion_error() {
		let renderer = TemplateRenderer::with_builtins();
		let err = renderer
			.render("${split(\",\", peers)}", &vars(&[("peers", "a,b")]))
			.unwrap_err();
		assert_eq!(err, RenderError::Coercion { found: "list" });
		assert_eq!(
			err.to_string(),
			"invalid template result: cannot convert list to string"
		);
	}

	#[test]
	fn number_result_is_coerced() {
		let renderer = TemplateRenderer::with_builtins();
		let out = renderer.render("${length(peers)}", &vars(&[("peers", "abc")])).unwrap();
		assert_eq!(out, "3");
	}

	#[test]
	fn renders_wireguard_interface() {
		let renderer = TemplateRenderer::with_builtins();
		let template = "[Interface]\nPrivateKey = ${private_key}\nAddress = ${address}\nDNS = ${join(\", \", split(\" \", dns))}\n";
		let out = renderer
			.render(
				template,
				&vars(&[
					("private_key", "cHJpdg=="),
					("address", "10.8.0.2/24"),
					("dns", "1.1.1.1 9.9.9.9"),
				]),
			)
			.unwrap();
		assert_eq!(
			out,
			"[Interface]\nPrivateKey = cHJpdg==\nAddress = 10.8.0.2/24\nDNS = 1.1.1.1, 9.9.9.9\n"
		);
	}

	#[test]
	fn injected_library_replaces_builtins() {
		let mut lib = FunctionLibrary::empty();
		lib.register("shout", Arity::Exact(1), |args| {
			Ok(Value::String(format!(
				"{}!",
				args[0].to_primitive_string().unwrap_or_default()
			)))
		});
		let renderer = TemplateRenderer::new(lib);
		assert_eq!(renderer.functions().names(), vec!["shout"]);
		assert_eq!(
			renderer.render("${shout(\"hi\")}", &vars(&[])).unwrap(),
			"hi!"
		);
		let err = renderer.render("${upper(\"hi\")}", &vars(&[])).unwrap_err();
		assert!(matches!(
			err,
			RenderError::Evaluation(EvalError::UnknownFunction { .. })
		));
	}

	#[test]
	fn renderer_is_shareable_across_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<TemplateRenderer>();
	}

	proptest! {
		#[test]
		fn plain_text_renders_unchanged(text in "[A-Za-z0-9 =/.,:\\[\\]\n-]{0,80}") {
			let renderer = TemplateRenderer::with_builtins();
			prop_assert_eq!(renderer.render(&text, &vars(&[])).unwrap(), text);
		}

		#[test]
		fn variable_substitution_is_verbatim(value in "[^$%]{0,40}") {
			let renderer = TemplateRenderer::with_builtins();
			let out = renderer.render("<${v}>", &vars(&[("v", value.as_str())])).unwrap();
			prop_assert_eq!(out, format!("<{value}>"));
		}
	}
}
