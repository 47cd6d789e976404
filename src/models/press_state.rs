//! Per-label pressed/released state used for highlighting.

use std::collections::HashMap;

/// Mapping from canonical label to pressed flag.
///
/// Entries are only ever added (by draw passes and key events) or flipped;
/// the map shrinks only through [`PressState::reset`], which backs the
/// explicit "reload layout" action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressState {
    keys: HashMap<String, bool>,
}

impl PressState {
    /// Creates an empty press state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `label` as released if it has no entry yet. Never overwrites.
    pub fn ensure(&mut self, label: &str) {
        if !self.keys.contains_key(label) {
            self.keys.insert(label.to_string(), false);
        }
    }

    /// Records a press or release for `label`.
    pub fn set(&mut self, label: &str, pressed: bool) {
        self.keys.insert(label.to_string(), pressed);
    }

    /// Returns true if `label` is currently held.
    #[must_use]
    pub fn is_pressed(&self, label: &str) -> bool {
        self.keys.get(label).copied().unwrap_or(false)
    }

    /// Returns the stored flag, or `None` if the label was never seen.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<bool> {
        self.keys.get(label).copied()
    }

    /// Marks every known label as released (focus loss). Keeps the entries.
    pub fn release_all(&mut self) {
        for pressed in self.keys.values_mut() {
            *pressed = false;
        }
    }

    /// Drops every entry.
    pub fn reset(&mut self) {
        self.keys.clear();
    }

    /// Number of known labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when no label has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Labels currently held, sorted for stable output.
    #[must_use]
    pub fn pressed_labels(&self) -> Vec<&str> {
        let mut held: Vec<&str> = self
            .keys
            .iter()
            .filter(|(_, pressed)| **pressed)
            .map(|(label, _)| label.as_str())
            .collect();
        held.sort_unstable();
        held
    }
}
