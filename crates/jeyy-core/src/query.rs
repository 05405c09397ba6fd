//! Convenience builder for HTTP query parameters.
//!
//! Every value sent to the API goes through [`QueryParams`], which owns the
//! wire coercion rules: booleans become `True`/`False`, numbers become their
//! decimal text, lists become repeated keys, and absent values are dropped
//! instead of being sent as a placeholder string.

use std::fmt::Display;

/// Wire spelling of `true`.
pub const TRUE: &str = "True";

/// Wire spelling of `false`.
pub const FALSE: &str = "False";

/// Convert a boolean into its wire representation.
#[must_use]
pub const fn bool_str(value: bool) -> &'static str {
    if value {
        TRUE
    } else {
        FALSE
    }
}

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append a boolean flag.
    pub fn push_bool(&mut self, key: &'static str, value: bool) {
        self.pairs.push((key, bool_str(value).to_string()));
    }

    /// Append one pair per item, repeating the key.
    pub fn push_all<I, T>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for value in values {
            self.push(key, value);
        }
    }

    /// Chainable form of [`QueryParams::push`].
    #[must_use]
    pub fn with<T>(mut self, key: &'static str, value: T) -> Self
    where
        T: Display,
    {
        self.push(key, value);
        self
    }

    /// Chainable form of [`QueryParams::push_opt`].
    #[must_use]
    pub fn with_opt<T>(mut self, key: &'static str, value: Option<T>) -> Self
    where
        T: Display,
    {
        self.push_opt(key, value);
        self
    }

    /// Chainable form of [`QueryParams::push_bool`].
    #[must_use]
    pub fn with_bool(mut self, key: &'static str, value: bool) -> Self {
        self.push_bool(key, value);
        self
    }

    /// Chainable form of [`QueryParams::push_all`].
    #[must_use]
    pub fn with_all<I, T>(mut self, key: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.push_all(key, values);
        self
    }

    /// Look up the first value recorded for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Number of collected pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
