// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Generate HTML tooltip modules from JSDoc parameter metadata.
//!
//! This crate reads the parameter records a JSDoc parser emits for a single
//! configuration object and produces a JavaScript module mapping each
//! parameter name to a ready-to-display HTML tooltip.
//!
//! # Overview
//!
//! The pipeline is linear:
//!
//! 1. Parse the JSDoc output and check its shape
//! 2. Render every parameter as a tooltip fragment
//! 3. Merge the fragments into one mapping
//! 4. Serialize the mapping as a module and strip fenced code blocks
//!
//! # Example
//!
//! ```
//! use jsdoc_tooltips::{generate, renderer::RenderOptions};
//!
//! let json = r#"[{
//!     "params": [{
//!         "name": "a.b",
//!         "type": { "names": ["number"] },
//!         "optional": false,
//!         "defaultvalue": 0,
//!         "description": "x"
//!     }]
//! }]"#;
//!
//! let module = generate(json, &RenderOptions::default()).unwrap();
//! assert!(module.contains("<h4>a.b</h4>"));
//! ```
//!
//! # Modules
//!
//! - [`parser`]: input model and shape validation for JSDoc output
//! - [`renderer`]: tooltip markup, merging, and module serialization

#![deny(missing_docs)]

pub mod parser;
pub mod renderer;

/// Runs the whole pipeline on raw JSDoc output and returns the module text.
///
/// # Errors
///
/// Returns an error if the input is not a well-formed JSDoc parser result.
pub fn generate(
    json_str: &str,
    opts: &renderer::RenderOptions,
) -> Result<String, parser::ParseError> {
    let params = parser::parse_params(json_str)?;
    let tooltips = renderer::merge_all(&params, opts);
    Ok(renderer::render_module(&tooltips, opts))
}
