//! Equality conditions used by column-filtered scans.

use crate::access::record::Record;

/// A per-column equality filter. Each slot lines up with a table column and
/// either requires an exact value or is a wildcard (`None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    slots: Vec<Option<String>>,
}

impl Condition {
    /// A condition with `width` wildcard slots; matches every record.
    pub fn any(width: usize) -> Self {
        Self {
            slots: vec![None; width],
        }
    }

    /// Requires `value` at `position`. A later call for the same position wins.
    pub fn require(&mut self, position: usize, value: impl Into<String>) {
        if position >= self.slots.len() {
            self.slots.resize(position + 1, None);
        }
        self.slots[position] = Some(value.into());
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// A record matches when every non-wildcard slot equals its field.
    pub fn matches(&self, record: &Record) -> bool {
        self.slots.iter().enumerate().all(|(position, slot)| match slot {
            Some(expected) => record.field(position) == Some(expected.as_str()),
            None => true,
        })
    }
}
