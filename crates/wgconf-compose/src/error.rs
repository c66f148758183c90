// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use thiserror::Error;
use wgconf_template::{RenderError, ValidationError};

/// Which peer template a render error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateField {
	Interface,
	Peer,
}

impl TemplateField {
	pub fn as_str(&self) -> &'static str {
		match self {
			TemplateField::Interface => "interface_template",
			TemplateField::Peer => "peer_template",
		}
	}
}

impl fmt::Display for TemplateField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Error, Debug)]
pub enum ComposeError {
	#[error("failed to render {field}: {source}")]
	Render {
		field: TemplateField,
		#[source]
		source: RenderError,
	},

	#[error(transparent)]
	Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
