//! Keymap layers and the document that groups them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named, ordered set of key labels selectable at runtime on the device.
///
/// `keys` holds one raw binding token per rendered key slot (for example
/// `"N1"`, `"LSHFT"`, `"TRANS"`, `"?"`). Display spelling is applied by the
/// label normalizer at draw time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer identifier (e.g., "default" for `default_layer`, "BASE" for `[_BASE]`)
    pub name: String,
    /// Human display string, may be empty
    pub label: String,
    /// One token per key slot, in source order
    pub keys: Vec<String>,
}

impl Layer {
    /// Creates an empty layer with no label.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            keys: Vec::new(),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the key tokens.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Text shown in a layer selector: `"<label or name> (<name>)"`.
    #[must_use]
    pub fn selector_text(&self) -> String {
        let shown = if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        };
        format!("{} ({})", shown, self.name)
    }
}

/// Mapping from layer name to [`Layer`], in source declaration order.
///
/// Order only drives selector listing. Re-declaring a layer name replaces
/// the earlier layer instead of merging into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeymapDocument {
    layers: IndexMap<String, Layer>,
}

impl KeymapDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a layer, replacing any earlier layer with the same name.
    pub fn insert(&mut self, layer: Layer) {
        self.layers.insert(layer.name.clone(), layer);
    }

    /// Gets a layer by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Gets a mutable layer by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.get_mut(name)
    }

    /// Returns the first declared layer.
    #[must_use]
    pub fn first(&self) -> Option<&Layer> {
        self.layers.values().next()
    }

    /// Returns true if the document holds a layer with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true when no layers were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterates layers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Layer names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// `(name, selector text)` pairs for a layer picker, in declaration order.
    #[must_use]
    pub fn selector_entries(&self) -> Vec<(String, String)> {
        self.layers
            .values()
            .map(|layer| (layer.name.clone(), layer.selector_text()))
            .collect()
    }
}
