// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Tooltip markup rendering for parsed JSDoc parameters.
//!
//! This module turns [`ParamDescriptor`] records into HTML tooltip fragments
//! and serializes the merged set as a JavaScript module that a documentation
//! site can import directly.
//!
//! # Output Format
//!
//! Each tooltip fragment contains:
//! - An `<h4>` heading with the parameter name
//! - A summary line with the type union, default value and optionality
//! - A `Description` section wrapped in a width-constrained `<div>`
//! - A trailing link to the full documentation
//!
//! The module text is a lint-disable comment followed by
//! `export const tooltips = { ... };`, with the mapping pretty-printed as JSON.
//!
//! # Example
//!
//! ```
//! use jsdoc_tooltips::parser::{ParamDescriptor, ParamType};
//! use jsdoc_tooltips::renderer::{RenderOptions, merge_all, render_module};
//!
//! let params = vec![ParamDescriptor {
//!     name: "link.color".into(),
//!     param_type: Some(ParamType { names: vec!["string".into()] }),
//!     optional: Some(true),
//!     defaultvalue: Some("#d3d3d3".into()),
//!     description: "The link stroke color.".into(),
//! }];
//!
//! let opts = RenderOptions::default();
//! let tooltips = merge_all(&params, &opts);
//! let module = render_module(&tooltips, &opts);
//!
//! assert!(module.starts_with("/*eslint-disable*/\nexport const tooltips = {"));
//! assert!(module.contains("<h4>link.color</h4>"));
//! ```

use crate::parser::{ParamDescriptor, ParamType};
use regex::{NoExpand, Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Documentation site linked from every tooltip by default.
pub const DEFAULT_DOCS_LINK: &str = "https://goodguydaniel.com/react-d3-graph/docs/index.html";

static WIDTH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)width="[0-9]+""#).expect("valid regex"));
static HEIGHT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)height="[0-9]+""#).expect("valid regex"));

/// How to resolve two parameters that share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The first record in input order is kept.
    #[default]
    FirstWins,
    /// The last record in input order is kept, at the position of the first.
    LastWins,
}

/// How fenced code blocks are removed from the serialized module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    /// Remove everything from the first opening fence on a line to the last
    /// closing fence on that same line, swallowing any text between blocks.
    #[default]
    Greedy,
    /// Remove each fenced block separately, keeping text between blocks.
    PerBlock,
}

/// Configuration options for tooltip rendering.
///
/// The defaults reproduce the markup expected by the react-d3-graph docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// URL of the full documentation, linked at the bottom of each tooltip.
    pub docs_link: String,

    /// Name of the exported JavaScript constant.
    pub export_name: String,

    /// Maximum width in pixels of the description container.
    pub max_width: u32,

    /// Value forced onto every `width="…"` attribute in descriptions.
    pub image_width: u32,

    /// Value forced onto every `height="…"` attribute in descriptions.
    pub image_height: u32,

    /// Tie-break applied to duplicate parameter names.
    pub merge: MergePolicy,

    /// Fenced code block removal behaviour.
    pub strip: StripMode,

    /// Language tag of the fenced code blocks to remove.
    pub code_language: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            docs_link: DEFAULT_DOCS_LINK.to_owned(),
            export_name: "tooltips".to_owned(),
            max_width: 400,
            image_width: 400,
            image_height: 200,
            merge: MergePolicy::FirstWins,
            strip: StripMode::Greedy,
            code_language: "javascript".to_owned(),
        }
    }
}

/// The rendered tooltip for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipEntry {
    /// The parameter name, used as the mapping key.
    pub name: String,
    /// The HTML fragment shown in the tooltip.
    pub markup: String,
}

/// An ordered name-to-markup mapping with unique keys.
///
/// Keys appear in the order their name was first seen in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tooltips {
    entries: Vec<TooltipEntry>,
    duplicates: Vec<String>,
}

impl Tooltips {
    /// Returns the number of tooltips.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no tooltips.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the markup for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.markup.as_str())
    }

    /// Iterates over the entries in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, TooltipEntry> {
        self.entries.iter()
    }

    /// Names that occurred more than once in the input, in order of first
    /// repetition.
    #[must_use]
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Converts the mapping into a JSON object, preserving entry order.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.name.clone(),
                    serde_json::Value::String(entry.markup.clone()),
                )
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

impl<'a> IntoIterator for &'a Tooltips {
    type Item = &'a TooltipEntry;
    type IntoIter = std::slice::Iter<'a, TooltipEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Renders one parameter as a tooltip entry.
///
/// The result depends only on `param` and `opts`.
#[must_use]
pub fn describe_param(param: &ParamDescriptor, opts: &RenderOptions) -> TooltipEntry {
    let markup = format!(
        "<h4>{name}</h4>\
         <b>type</b>: {types} | <b>default value</b>: {default} | <b>optional</b>: {optional}\
         <h5>Description</h5>\
         <div style=\"max-width: {max_width}px;\">{description}</div>\
         {docs}",
        name = param.name,
        types = format_types(param.param_type.as_ref()),
        default = format_default(param.defaultvalue.as_ref()),
        optional = param
            .optional
            .map_or_else(|| "undefined".to_owned(), |o| o.to_string()),
        max_width = opts.max_width,
        description = normalize_image_sizes(&param.description, opts),
        docs = docs_link_markup(&opts.docs_link),
    );

    TooltipEntry {
        name: param.name.clone(),
        markup,
    }
}

/// Joins the type names with `|`, or returns `*` when there are none.
///
/// Order is kept as declared.
#[must_use]
pub fn format_types(param_type: Option<&ParamType>) -> String {
    match param_type {
        Some(ParamType { names }) if !names.is_empty() => names.join("|"),
        _ => "*".to_owned(),
    }
}

/// Renders a default value the way it reads in the source docs.
///
/// Strings are printed without quotes, a missing default as `undefined`, and
/// anything else as its JSON text.
fn format_default(value: Option<&serde_json::Value>) -> String {
    match value {
        None => "undefined".to_owned(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Forces every `width="<digits>"` and `height="<digits>"` attribute to the
/// configured image size. Only ASCII digits count.
///
/// This is a plain text substitution: it also rewrites the attributes of
/// non-image elements, and the attribute name is matched case-insensitively.
#[must_use]
pub fn normalize_image_sizes(description: &str, opts: &RenderOptions) -> String {
    let width = format!("width='{}'", opts.image_width);
    let height = format!("height='{}'", opts.image_height);

    let resized = WIDTH_ATTR.replace_all(description, NoExpand(&width));
    HEIGHT_ATTR
        .replace_all(&resized, NoExpand(&height))
        .into_owned()
}

fn docs_link_markup(link: &str) -> String {
    format!(
        "<small>for more details check the \
         <a target=\"_blank\" href=\"{link}\">official documentation</a></small>"
    )
}

/// Renders every parameter and merges the results into one mapping.
///
/// Duplicate names are resolved by [`RenderOptions::merge`] and recorded in
/// [`Tooltips::duplicates`].
#[must_use]
pub fn merge_all(params: &[ParamDescriptor], opts: &RenderOptions) -> Tooltips {
    let mut tooltips = Tooltips::default();
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(params.len());

    for param in params {
        if let Some(&index) = positions.get(param.name.as_str()) {
            if !tooltips.duplicates.contains(&param.name) {
                tooltips.duplicates.push(param.name.clone());
            }
            if opts.merge == MergePolicy::LastWins {
                tooltips.entries[index] = describe_param(param, opts);
            }
            continue;
        }

        positions.insert(&param.name, tooltips.entries.len());
        tooltips.entries.push(describe_param(param, opts));
    }

    tooltips
}

/// Removes fenced code blocks tagged with `language` from `text`.
///
/// The language tag is matched case-insensitively and a block never spans a
/// line break. In [`StripMode::Greedy`] a match runs from the first opening
/// fence on a line to the last closing fence on that line.
#[must_use]
pub fn strip_code_blocks(text: &str, language: &str, mode: StripMode) -> String {
    let body = match mode {
        StripMode::Greedy => "(.*)",
        StripMode::PerBlock => "(.*?)",
    };
    let pattern = format!("```{}{body}```", regex::escape(language));
    let fence = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .expect("escaped language forms a valid pattern");

    fence.replace_all(text, "").into_owned()
}

/// Serializes the tooltips as a JavaScript module.
///
/// The result is terminated by a newline and already has fenced code blocks
/// stripped. Rendering the same mapping twice gives identical text.
#[must_use]
pub fn render_module(tooltips: &Tooltips, opts: &RenderOptions) -> String {
    let module = format!(
        "/*eslint-disable*/\nexport const {} = {:#};",
        opts.export_name,
        tooltips.to_json()
    );

    let mut out = strip_code_blocks(&module, &opts.code_language, opts.strip);
    out.push('\n');
    out
}
