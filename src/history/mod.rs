// src/history/mod.rs

/// Append-only record of completed user actions.
#[derive(Default, Debug)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: &str) {
        self.entries.push(entry.to_string());
    }

    /// Read-only view of every entry, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_entries_in_order() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.push("Ran text summarization.");
        history.push("Ran image classification.");
        assert_eq!(
            history.entries(),
            ["Ran text summarization.", "Ran image classification."]
        );
        assert_eq!(history.len(), 2);
    }
}
