//! Formatter registry and render results.
//!
//! Formatters are looked up by `(key, format)`: a cell names its formatter by
//! key (e.g. `"Normal"`, `"ErrorBars"`) and the row is rendered for one
//! [`OutputFormat`]. A cell without a formatter falls back to the registry's
//! default for that format, or to [`PlainFormatter`] when none is registered.
//!
//! A formatter returns a [`Rendered`]: either one fragment or several adjacent
//! fragments. Splitting a value and its error bar into two table cells is the
//! typical use of the multi-fragment form.
//!
//! ## Example
//!
//! ```rust
//! use reportrow::{FormatterRegistry, OutputFormat, RenderSpecs, Rendered, ReportableQty};
//!
//! let registry = FormatterRegistry::new().with_formatter(
//!     "ErrorBars",
//!     OutputFormat::Text,
//!     |qty: &ReportableQty, _label: &ReportableQty, _specs: &RenderSpecs| {
//!         let err = qty.errbar().map(|e| e.to_string()).unwrap_or_default();
//!         Ok(Rendered::multiple([qty.value().to_string(), err]))
//!     },
//! );
//!
//! let formatter = registry.resolve(Some("ErrorBars"), &OutputFormat::Text).unwrap();
//! let qty = ReportableQty::from_val((0.5, 0.25));
//! let out = formatter.format(&qty, &qty, &RenderSpecs::new()).unwrap();
//! assert_eq!(out.into_fragments(), vec!["0.5", "0.25"]);
//! ```

use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::options::RenderSpecs;
use crate::quantity::ReportableQty;
use crate::Result;

/// Target output representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// HTML markup
    Html,
    /// LaTeX markup
    Latex,
    /// Any other format name known to the registered formatters
    Custom(String),
}

impl OutputFormat {
    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Html => "html",
            OutputFormat::Latex => "latex",
            OutputFormat::Custom(name) => name.as_str(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => OutputFormat::Text,
            "html" => OutputFormat::Html,
            "latex" | "tex" => OutputFormat::Latex,
            _ => OutputFormat::Custom(s.to_string()),
        })
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(format) => format,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a formatter produced for one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rendered {
    /// One output fragment
    Single(String),
    /// Several adjacent fragments, spliced into the row in order
    Multiple(Vec<String>),
}

impl Rendered {
    pub fn single(fragment: impl Into<String>) -> Self {
        Rendered::Single(fragment.into())
    }

    pub fn multiple<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rendered::Multiple(fragments.into_iter().map(Into::into).collect())
    }

    /// Number of fragments this result occupies in a row
    pub fn len(&self) -> usize {
        match self {
            Rendered::Single(_) => 1,
            Rendered::Multiple(fragments) => fragments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Rendered::Multiple(_))
    }

    pub fn into_fragments(self) -> Vec<String> {
        match self {
            Rendered::Single(fragment) => vec![fragment],
            Rendered::Multiple(fragments) => fragments,
        }
    }
}

impl From<String> for Rendered {
    fn from(fragment: String) -> Self {
        Rendered::Single(fragment)
    }
}

impl From<&str> for Rendered {
    fn from(fragment: &str) -> Self {
        Rendered::Single(fragment.to_string())
    }
}

impl From<Vec<String>> for Rendered {
    fn from(fragments: Vec<String>) -> Self {
        Rendered::Multiple(fragments)
    }
}

impl IntoIterator for Rendered {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_fragments().into_iter()
    }
}

/// Turns a normalized value into output for one format.
///
/// `label` is the cell's display label (the value itself when the cell has
/// none). `specs` is passed through untouched from the render call.
pub trait Formatter: Send + Sync {
    fn format(
        &self,
        value: &ReportableQty,
        label: &ReportableQty,
        specs: &RenderSpecs,
    ) -> Result<Rendered>;
}

impl<F> Formatter for F
where
    F: Fn(&ReportableQty, &ReportableQty, &RenderSpecs) -> Result<Rendered> + Send + Sync,
{
    fn format(
        &self,
        value: &ReportableQty,
        label: &ReportableQty,
        specs: &RenderSpecs,
    ) -> Result<Rendered> {
        self(value, label, specs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    Plain,
    Html,
    Latex,
}

/// Built-in rendering for cells without a formatter.
///
/// Produces a single fragment: the value, followed by its error bar when it
/// has one. Floats honor `specs.precision`. Text is escaped for HTML and LaTeX;
/// custom formats are treated as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainFormatter {
    markup: Markup,
}

static PLAIN_TEXT: PlainFormatter = PlainFormatter {
    markup: Markup::Plain,
};
static PLAIN_HTML: PlainFormatter = PlainFormatter {
    markup: Markup::Html,
};
static PLAIN_LATEX: PlainFormatter = PlainFormatter {
    markup: Markup::Latex,
};

impl PlainFormatter {
    /// The plain renderer for a given output format
    pub fn for_format(format: &OutputFormat) -> &'static PlainFormatter {
        match format {
            OutputFormat::Html => &PLAIN_HTML,
            OutputFormat::Latex => &PLAIN_LATEX,
            OutputFormat::Text | OutputFormat::Custom(_) => &PLAIN_TEXT,
        }
    }

    fn plus_minus(&self) -> &'static str {
        match self.markup {
            Markup::Plain => " +/- ",
            Markup::Html => " &plusmn; ",
            Markup::Latex => r" $\pm$ ",
        }
    }

    fn escape(&self, text: &str) -> String {
        match self.markup {
            Markup::Plain => text.to_string(),
            Markup::Html => escape_html(text),
            Markup::Latex => escape_latex(text),
        }
    }
}

impl Formatter for PlainFormatter {
    fn format(
        &self,
        value: &ReportableQty,
        _label: &ReportableQty,
        specs: &RenderSpecs,
    ) -> Result<Rendered> {
        let mut fragment = self.escape(&value.value().to_string_with_precision(specs.precision));
        if let Some(err) = value.errbar() {
            fragment.push_str(self.plus_minus());
            fragment.push_str(&self.escape(&err.to_string_with_precision(specs.precision)));
        }
        Ok(Rendered::Single(fragment))
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

type FormatterMap = HashMap<OutputFormat, Box<dyn Formatter>>;

/// Formatters keyed by name, then by output format.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, FormatterMap>,
    defaults: FormatterMap,
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.formatters.keys().collect();
        keys.sort();
        let mut defaults: Vec<&OutputFormat> = self.defaults.keys().collect();
        defaults.sort();
        f.debug_struct("FormatterRegistry")
            .field("formatters", &keys)
            .field("defaults", &defaults)
            .finish()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure under `key` for one output format
    pub fn register<F>(
        &mut self,
        key: impl Into<String>,
        format: impl Into<OutputFormat>,
        formatter: F,
    ) -> &mut Self
    where
        F: Fn(&ReportableQty, &ReportableQty, &RenderSpecs) -> Result<Rendered>
            + Send
            + Sync
            + 'static,
    {
        self.register_formatter(key, format, formatter)
    }

    /// Register any [`Formatter`] implementation under `key` for one output format.
    ///
    /// An existing entry for the same key and format is replaced.
    pub fn register_formatter(
        &mut self,
        key: impl Into<String>,
        format: impl Into<OutputFormat>,
        formatter: impl Formatter + 'static,
    ) -> &mut Self {
        let key = key.into();
        let format = format.into();
        let by_format = self.formatters.entry(key.clone()).or_default();
        if by_format.insert(format.clone(), Box::new(formatter)).is_some() {
            log::debug!("replaced formatter '{}' for format '{}'", key, format);
        }
        self
    }

    /// Builder: register a closure and return the registry
    pub fn with_formatter<F>(
        mut self,
        key: impl Into<String>,
        format: impl Into<OutputFormat>,
        formatter: F,
    ) -> Self
    where
        F: Fn(&ReportableQty, &ReportableQty, &RenderSpecs) -> Result<Rendered>
            + Send
            + Sync
            + 'static,
    {
        self.register(key, format, formatter);
        self
    }

    /// Formatter used for cells without one, for the given format
    pub fn set_default<F>(&mut self, format: impl Into<OutputFormat>, formatter: F) -> &mut Self
    where
        F: Fn(&ReportableQty, &ReportableQty, &RenderSpecs) -> Result<Rendered>
            + Send
            + Sync
            + 'static,
    {
        let format = format.into();
        if self
            .defaults
            .insert(format.clone(), Box::new(formatter))
            .is_some()
        {
            log::debug!("replaced default formatter for format '{}'", format);
        }
        self
    }

    /// Whether any format is registered under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.formatters.contains_key(key)
    }

    /// Formats registered under `key`, sorted
    pub fn formats_for(&self, key: &str) -> Vec<OutputFormat> {
        let mut formats: Vec<OutputFormat> = self
            .formatters
            .get(key)
            .map(|by_format| by_format.keys().cloned().collect())
            .unwrap_or_default();
        formats.sort();
        formats
    }

    /// Find the formatter for a cell.
    ///
    /// `None` means the cell has no formatter: the registered default for
    /// `format` is used, else [`PlainFormatter`].
    pub fn resolve(&self, key: Option<&str>, format: &OutputFormat) -> Result<&dyn Formatter> {
        let Some(key) = key else {
            return match self.defaults.get(format) {
                Some(formatter) => Ok(&**formatter),
                None => {
                    let plain: &dyn Formatter = PlainFormatter::for_format(format);
                    Ok(plain)
                }
            };
        };

        let by_format = self
            .formatters
            .get(key)
            .ok_or_else(|| ReportError::UnknownFormatter {
                key: key.to_string(),
            })?;

        match by_format.get(format) {
            Some(formatter) => Ok(&**formatter),
            None => Err(ReportError::UnsupportedFormat {
                key: key.to_string(),
                format: format.to_string(),
            }),
        }
    }
}
