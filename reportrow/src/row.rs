//! Rows of cells and their rendering.
//!
//! A [`Row`] is built from three parallel sequences (values, formatter keys
//! and labels) that do not need to have the same length:
//!
//! - missing formatters are padded with `None` (plain rendering)
//! - missing labels are padded with `None` (the value labels itself)
//! - omitting labels entirely labels every cell with its own value
//! - formatters or labels beyond the number of values are ignored
//!
//! Rendering walks the cells left to right and flattens cells that expand
//! into several fragments, so the output can be wider than the row.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cell::Cell;
use crate::formatter::{FormatterRegistry, OutputFormat, Rendered};
use crate::options::RenderSpecs;
use crate::quantity::ReportableQty;
use crate::Result;

/// An ordered sequence of cells; order defines output column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<Cell>,
}

/// Right-pad `items` with `None` up to `len`. Longer sequences are left alone.
fn pad_to<T: Clone>(items: &mut Vec<Option<T>>, len: usize, what: &str) {
    if items.len() > len {
        log::debug!(
            "row has {} {} but only {} values; extra entries are ignored",
            items.len(),
            what,
            len
        );
    }
    if items.len() < len {
        items.resize(len, None);
    }
}

impl Row {
    /// Build a row from values, formatter keys and labels.
    ///
    /// ```rust
    /// use reportrow::Row;
    ///
    /// let row = Row::new(vec![1.0, 2.0], Some(vec![Some("Normal".to_string())]), None);
    /// assert_eq!(row.len(), 2);
    /// assert_eq!(row.cells()[0].formatter(), Some("Normal"));
    /// assert_eq!(row.cells()[1].formatter(), None);
    /// ```
    pub fn new<I, T>(
        row_data: I,
        formatters: Option<Vec<Option<String>>>,
        labels: Option<Vec<Option<ReportableQty>>>,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ReportableQty>,
    {
        let data: Vec<ReportableQty> = row_data.into_iter().map(ReportableQty::from_val).collect();
        Self::from_normalized(data, formatters, labels)
    }

    /// Like [`Row::new`], for loosely typed input that may fail to normalize.
    ///
    /// The first value that cannot be normalized aborts construction.
    pub fn from_json(
        row_data: Vec<Value>,
        formatters: Option<Vec<Option<String>>>,
        labels: Option<Vec<Option<ReportableQty>>>,
    ) -> Result<Self> {
        let data = row_data
            .into_iter()
            .map(ReportableQty::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_normalized(data, formatters, labels))
    }

    fn from_normalized(
        data: Vec<ReportableQty>,
        formatters: Option<Vec<Option<String>>>,
        labels: Option<Vec<Option<ReportableQty>>>,
    ) -> Self {
        let len = data.len();
        let mut formatters = formatters.unwrap_or_default();
        let mut labels = labels.unwrap_or_else(|| data.iter().cloned().map(Some).collect());

        pad_to(&mut formatters, len, "formatters");
        pad_to(&mut labels, len, "labels");

        let cells = data
            .into_iter()
            .zip(formatters)
            .zip(labels)
            .map(|((item, formatter), label)| Cell::new(item, formatter, label))
            .collect();

        Row { cells }
    }

    /// A row with no cells
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append one cell at the end of the row
    pub fn add(
        &mut self,
        data: impl Into<ReportableQty>,
        formatter: Option<String>,
        label: Option<ReportableQty>,
    ) {
        self.cells.push(Cell::new(data, formatter, label));
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Render every cell for `format` and flatten the results into one row of fragments.
    ///
    /// The first failing cell aborts the whole row.
    pub fn render(
        &self,
        registry: &FormatterRegistry,
        format: &OutputFormat,
        specs: &RenderSpecs,
    ) -> Result<Vec<String>> {
        log::trace!("rendering row of {} cells as {}", self.cells.len(), format);

        let mut fragments = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            match cell.render(registry, format, specs)? {
                Rendered::Single(fragment) => fragments.push(fragment),
                Rendered::Multiple(expanded) => fragments.extend(expanded),
            }
        }
        Ok(fragments)
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn split_registry() -> FormatterRegistry {
        FormatterRegistry::new().with_formatter(
            "Split",
            "text",
            |v: &ReportableQty, _l: &ReportableQty, _s: &RenderSpecs| {
                Ok(Rendered::multiple([
                    format!("{}a", v.value()),
                    format!("{}b", v.value()),
                ]))
            },
        )
    }

    proptest! {
        #[test]
        fn cell_count_matches_value_count(
            values in proptest::collection::vec(-1000i64..1000, 0..12),
            n_formatters in 0usize..16,
            n_labels in proptest::option::of(0usize..16),
        ) {
            let formatters = vec![Some("Split".to_string()); n_formatters];
            let labels = n_labels.map(|n| vec![Some(ReportableQty::from_val("l")); n]);
            let row = Row::new(values.clone(), Some(formatters), labels);

            prop_assert_eq!(row.len(), values.len());
            for (i, (cell, value)) in row.iter().zip(&values).enumerate() {
                prop_assert_eq!(cell.data(), &ReportableQty::from_val(*value));
                let expected_formatter = if i < n_formatters { Some("Split") } else { None };
                prop_assert_eq!(cell.formatter(), expected_formatter);
                match n_labels {
                    None => {
                        prop_assert_eq!(cell.label(), Some(cell.data()));
                    }
                    Some(n) if i < n => {
                        prop_assert_eq!(cell.label(), Some(&ReportableQty::from_val("l")));
                    }
                    Some(_) => {
                        prop_assert_eq!(cell.label(), None);
                    }
                }
            }
        }

        #[test]
        fn render_width_counts_expansions(
            split in proptest::collection::vec(any::<bool>(), 0..12),
        ) {
            let values: Vec<i64> = (0..split.len() as i64).collect();
            let formatters = split
                .iter()
                .map(|s| s.then(|| "Split".to_string()))
                .collect();
            let row = Row::new(values.clone(), Some(formatters), None);

            let out = row
                .render(&split_registry(), &OutputFormat::Text, &RenderSpecs::new())
                .unwrap();

            let expanded = split.iter().filter(|s| **s).count();
            prop_assert_eq!(out.len(), row.len() + expanded);
            prop_assert!(out.len() >= row.len());

            let mut expected = Vec::new();
            for (value, s) in values.iter().zip(&split) {
                if *s {
                    expected.push(format!("{}a", value));
                    expected.push(format!("{}b", value));
                } else {
                    expected.push(value.to_string());
                }
            }
            prop_assert_eq!(out, expected);
        }
    }
}
