//! A single table cell: one normalized value, its formatter key and label.

use serde::{Deserialize, Serialize};

use crate::formatter::{FormatterRegistry, OutputFormat, Rendered};
use crate::options::RenderSpecs;
use crate::quantity::ReportableQty;
use crate::Result;

/// One value in a row, together with how it should be presented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    data: ReportableQty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    formatter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<ReportableQty>,
}

impl Cell {
    /// Create a cell. `data` is normalized; `formatter` and `label` are stored as given.
    pub fn new(
        data: impl Into<ReportableQty>,
        formatter: Option<String>,
        label: Option<ReportableQty>,
    ) -> Self {
        Self {
            data: ReportableQty::from_val(data),
            formatter,
            label,
        }
    }

    pub fn data(&self) -> &ReportableQty {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ReportableQty {
        &mut self.data
    }

    pub fn formatter(&self) -> Option<&str> {
        self.formatter.as_deref()
    }

    /// The label exactly as stored
    pub fn label(&self) -> Option<&ReportableQty> {
        self.label.as_ref()
    }

    /// The label handed to formatters: the stored label, or the data itself
    pub fn display_label(&self) -> &ReportableQty {
        self.label.as_ref().unwrap_or(&self.data)
    }

    /// Render this cell for `format`.
    ///
    /// Whatever the resolved formatter returns is returned as is, including
    /// errors. Whether the cell expands into several fragments is entirely up
    /// to the formatter.
    pub fn render(
        &self,
        registry: &FormatterRegistry,
        format: &OutputFormat,
        specs: &RenderSpecs,
    ) -> Result<Rendered> {
        registry
            .resolve(self.formatter(), format)?
            .format(&self.data, self.display_label(), specs)
    }
}
