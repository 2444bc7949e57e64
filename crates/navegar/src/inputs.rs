//! Pending form-input accumulation.
//!
//! Values typed, checked, or selected by the test author are held here until
//! the next dispatched request, then cleared. First write wins: values
//! scraped from the rendered page are stored without `overwrite` and never
//! displace values the test author set explicitly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value of a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free-text value (text, hidden, password, textarea, ...)
    Text(String),
    /// Checkbox or radio state
    Checked(bool),
    /// Selected option value of a select element
    Selected(String),
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The textual content, if this value carries one
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Selected(s) => Some(s),
            Self::Checked(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Checked(value)
    }
}

/// Form field values accumulated between dispatched requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInputs {
    fields: HashMap<String, FieldValue>,
}

impl PendingInputs {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value for a field name.
    ///
    /// A name that is already present is left untouched unless `overwrite`
    /// is set. Never fails.
    pub fn store(&mut self, name: impl Into<String>, value: impl Into<FieldValue>, overwrite: bool) {
        let name = name.into();
        if overwrite || !self.fields.contains_key(&name) {
            let _ = self.fields.insert(name, value.into());
        }
    }

    /// Look up a stored value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Copy out the current mapping
    #[must_use]
    pub fn values(&self) -> HashMap<String, FieldValue> {
        self.fields.clone()
    }

    /// Clear the store, discarding values not yet submitted
    pub fn reset(&mut self) {
        self.fields.clear();
    }

    /// Take the current contents, leaving the store empty
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Merge page-scraped defaults: each entry is stored without overwrite,
    /// so already-present values win
    pub fn absorb<I>(&mut self, scraped: I)
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        for (name, value) in scraped {
            self.store(name, value, false);
        }
    }

    /// Number of stored fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over stored name/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FieldValue)> for PendingInputs {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (name, value) in iter {
            inputs.store(name, value, false);
        }
        inputs
    }
}
