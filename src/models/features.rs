//! Feature vector model
//!
//! A feature vector is a fixed, ordered mapping from feature name to value.
//! The structured (EHR) features come first in a fixed order, followed by one
//! keyphrase count per dictionary group in dictionary order.

use std::fmt;

/// Prior CT more than the interval threshold ago (or first scan)
pub const PRIOR_CT_6MON: &str = "priorCT_6mon";
/// Ordering provider is a medicine department
pub const PROVIDER_MED: &str = "provider_med";
/// Ordering provider is an oncology department
pub const PROVIDER_ONC: &str = "provider_onc";
/// Any symptom diagnosis recorded
pub const SYMPTOM_BINARY: &str = "symptom_binary";
/// Any lung disease diagnosis recorded
pub const LUNG_DISEASE_BINARY: &str = "LungDis_binary";
/// Number of prior chest X-rays
pub const XRAY_COUNT: &str = "Xray_count";

/// Structured features in output order
pub const EHR_FEATURES: [&str; 6] = [
    PRIOR_CT_6MON,
    PROVIDER_MED,
    PROVIDER_ONC,
    SYMPTOM_BINARY,
    LUNG_DISEASE_BINARY,
    XRAY_COUNT,
];

/// Ordered feature name to value mapping for one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set a feature value, replacing any existing value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a feature value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Feature names in schema order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut vector = Self::new();
        for (name, value) in iter {
            vector.insert(name, value);
        }
        vector
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.entries {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
