use crate::error::CoreError;

/// Immutable, non-empty list of payloads cycled with wraparound.
#[derive(Debug, Clone)]
pub struct PayloadCycle {
    items: Vec<String>,
}

impl PayloadCycle {
    pub fn new(items: Vec<String>) -> Result<Self, CoreError> {
        if items.is_empty() {
            return Err(CoreError::InvalidSpec("payload list must not be empty".into()));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Payload at `cursor mod len` and the next cursor.
    pub fn next(&self, cursor: u64) -> (&str, u64) {
        let idx = (cursor % self.items.len() as u64) as usize;
        (&self.items[idx], cursor.wrapping_add(1))
    }
}
