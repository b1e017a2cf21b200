//! # reportrow
//!
//! Turn a logical report row into presentation-ready cells for one output format.
//!
//! ## Overview
//!
//! A report row is a sequence of heterogeneous values, each with an optional
//! formatter key and an optional label. This library:
//!
//! - **Normalizes** every value into a [`ReportableQty`] (a value plus an optional error bar)
//! - **Resolves** each cell's formatter by `(key, format)` in a [`FormatterRegistry`]
//! - **Flattens** formatter output: a formatter may split one value into several
//!   adjacent cells (e.g. value and error bar), and the row splices them in place
//!
//! Rows and cells do not interpret [`RenderSpecs`]; they forward them to the formatters.
//! No I/O happens here: assembling the rendered rows into an HTML, LaTeX or text
//! table is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use reportrow::{FormatterRegistry, OutputFormat, RenderSpecs, Rendered, ReportableQty, Row};
//!
//! let registry = FormatterRegistry::new().with_formatter(
//!     "Normal",
//!     OutputFormat::Text,
//!     |qty: &ReportableQty, _label: &ReportableQty, specs: &RenderSpecs| {
//!         Ok(Rendered::single(format!("{:.*}", specs.precision.unwrap_or(2), qty)))
//!     },
//! );
//!
//! let mut row = Row::new(vec![1.0, 2.0], Some(vec![Some("Normal".to_string())]), None);
//! row.add(3.0, None, None);
//!
//! let out = row.render(&registry, &"text".into(), &RenderSpecs::new()).unwrap();
//! assert_eq!(out, vec!["1.00", "2", "3"]);
//! ```

pub mod cell;
pub mod error;
pub mod formatter;
pub mod options;
pub mod quantity;
pub mod row;

pub use cell::Cell;
pub use error::ReportError;
pub use formatter::{Formatter, FormatterRegistry, OutputFormat, PlainFormatter, Rendered};
pub use options::RenderSpecs;
pub use quantity::{QtyValue, ReportableQty};
pub use row::Row;

/// Result type for reportrow operations
pub type Result<T> = std::result::Result<T, ReportError>;
