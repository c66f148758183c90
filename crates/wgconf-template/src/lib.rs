// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Interpolation templates for WireGuard configuration sections.
//!
//! Templates use `${ expr }` interpolation over string variables and an
//! injected [`FunctionLibrary`]:
//!
//! ```
//! use wgconf_template::{TemplateRenderer, TemplateVars};
//!
//! let renderer = TemplateRenderer::with_builtins();
//! let mut vars = TemplateVars::new();
//! vars.insert("name".into(), "World".into());
//! assert_eq!(renderer.render("Hello ${name}", &vars)?, "Hello World");
//! # Ok::<(), wgconf_template::RenderError>(())
//! ```
//!
//! User-supplied variables go through [`validate_vars`] first, which rejects
//! list and map values before any rendering happens.

pub mod error;
pub mod eval;
pub mod functions;
pub mod parse;
pub mod renderer;
pub mod value;
pub mod vars;

pub use error::{EvalError, ParseError, RenderError, ValidationError};
pub use functions::{Arity, FunctionLibrary, MAX_INDENT};
pub use parse::{parse_template, Template};
pub use renderer::TemplateRenderer;
pub use value::Value;
pub use vars::{validate_vars, BadVar, CompositeKind, RawVar, RawVars, TemplateVars};
