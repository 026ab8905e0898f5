// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for JSDoc parameter metadata.
//!
//! This module reads the output of a JSDoc-style parser and extracts the
//! parameter records of the first documented symbol. Only `data[0].params`
//! is ever looked at; everything else in the document is ignored.
//!
//! # Format Overview
//!
//! The parser output is an array of doc entries. The first entry must carry a
//! `params` array, where each element describes one configuration parameter:
//! - `name`: dotted path such as `node.labelProperty` (required)
//! - `type.names`: ordered list of type names (optional)
//! - `optional`: whether the parameter may be omitted (optional)
//! - `defaultvalue`: the default, of any JSON type (optional)
//! - `description`: HTML description text (required)
//!
//! # Example
//!
//! ```
//! use jsdoc_tooltips::parser::parse_params;
//!
//! let json = r##"[{
//!     "params": [{
//!         "name": "node.color",
//!         "type": { "names": ["string"] },
//!         "optional": true,
//!         "defaultvalue": "#d3d3d3",
//!         "description": "The node fill color."
//!     }]
//! }]"##;
//!
//! let params = parse_params(json).unwrap();
//! assert_eq!(params.len(), 1);
//! assert_eq!(params[0].name, "node.color");
//! ```

use serde::{Deserialize, Deserializer};
use snafu::prelude::*;

/// Error type for malformed parser output.
///
/// Every variant is fatal: nothing is rendered once one of these is raised.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// The input is not valid JSON.
    #[snafu(display("invalid JSON provided from jsdoc parser: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },

    /// The input is not an array, or the array is empty.
    #[snafu(display("invalid JSON provided from jsdoc parser: expected a non-empty array of doc entries"))]
    NoEntries,

    /// The first doc entry has no `params` array.
    #[snafu(display("invalid JSON provided from jsdoc parser: first doc entry has no `params` array"))]
    MissingParams,

    /// A `params` element could not be read as a parameter record.
    #[snafu(display("invalid JSON provided from jsdoc parser: param #{index}: {source}"))]
    InvalidParam {
        /// Zero-based position of the offending record in `params`.
        index: usize,
        /// The underlying deserialization error.
        source: serde_json::Error,
    },
}

/// A single documented configuration parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParamDescriptor {
    /// Dotted path identifying the parameter (e.g. `link.strokeWidth`).
    pub name: String,

    /// The declared type, if the parser emitted one.
    #[serde(default, rename = "type")]
    pub param_type: Option<ParamType>,

    /// Whether the parameter may be omitted.
    ///
    /// `None` when the parser did not say either way.
    #[serde(default)]
    pub optional: Option<bool>,

    /// The documented default value, exactly as the parser emitted it.
    ///
    /// An explicit `null` is kept as `Some(Value::Null)`; only a missing
    /// field maps to `None`.
    #[serde(default, deserialize_with = "present_value")]
    pub defaultvalue: Option<serde_json::Value>,

    /// Description text, possibly containing inline HTML.
    pub description: String,
}

/// The type annotation of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ParamType {
    /// Type names in declaration order, e.g. `["string", "function"]`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub names: Vec<String>,
}

/// Deserializes a list, treating `null` like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserializes a field that is present, keeping `null` as a value.
fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Checks the shape of the parser output and returns the raw `params` array.
///
/// This is the only validation performed on the input: the document must be a
/// non-empty array whose first element has a `params` array. The individual
/// records are not inspected here.
///
/// # Errors
///
/// Returns [`ParseError::NoEntries`] if `data` is not an array or is empty,
/// and [`ParseError::MissingParams`] if the first entry lacks `params`.
pub fn validate_input(data: &serde_json::Value) -> Result<&[serde_json::Value], ParseError> {
    let first = data
        .as_array()
        .and_then(|entries| entries.first())
        .context(NoEntriesSnafu)?;

    first
        .get("params")
        .and_then(serde_json::Value::as_array)
        .map(Vec::as_slice)
        .context(MissingParamsSnafu)
}

/// Parses JSDoc parser output into its parameter records.
///
/// This is the main entry point for reading input. Records keep their input
/// order, duplicates included; resolving duplicate names is left to
/// [`crate::renderer::merge_all`].
///
/// # Arguments
///
/// * `json_str` - The raw JSON emitted by the JSDoc parser
///
/// # Errors
///
/// Returns an error if the JSON is malformed, fails [`validate_input`], or a
/// record lacks its `name` or `description`.
///
/// # Example
///
/// ```
/// use jsdoc_tooltips::parser::{ParseError, parse_params};
///
/// let err = parse_params("[]").unwrap_err();
/// assert!(matches!(err, ParseError::NoEntries));
/// ```
pub fn parse_params(json_str: &str) -> Result<Vec<ParamDescriptor>, ParseError> {
    let data: serde_json::Value = serde_json::from_str(json_str).context(JsonSnafu)?;

    validate_input(&data)?
        .iter()
        .enumerate()
        .map(|(index, param)| {
            serde_json::from_value::<ParamDescriptor>(param.clone())
                .context(InvalidParamSnafu { index })
        })
        .collect()
}
