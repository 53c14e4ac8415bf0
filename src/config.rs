//! Engine configuration.

/// Default number of records per page.
pub const DEFAULT_PAGE_CAPACITY: usize = 2;

/// Engine configuration.
///
/// Values are captured into a table's metadata when the table is created, so
/// changing them later does not affect existing tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of records stored on one page.
    pub page_capacity: usize,
    /// Maximum number of trace entries kept per table (None = unbounded).
    pub trace_retention: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            page_capacity: DEFAULT_PAGE_CAPACITY,
            trace_retention: None,
        }
    }
}

impl EngineConfig {
    /// Sets the page capacity. Values below 1 are raised to 1.
    pub fn with_page_capacity(mut self, page_capacity: usize) -> Self {
        self.page_capacity = page_capacity.max(1);
        self
    }

    pub fn with_trace_retention(mut self, trace_retention: Option<usize>) -> Self {
        self.trace_retention = trace_retention;
        self
    }
}
