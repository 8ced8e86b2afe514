//! Dictionary-driven keyphrase frequency features
//!
//! A keyphrase dictionary is an ordered list of named groups, each a set of
//! pattern variants. For every group the featurizer counts how many of its
//! variants occur anywhere in a report's text of interest.

pub mod dictionary;

pub use dictionary::{KeyphraseDictionary, KeyphraseGroup};

use crate::models::FeatureVector;

/// Produces one count per dictionary group
#[derive(Debug, Clone)]
pub struct KeyphraseFeaturizer<'a> {
    dictionary: &'a KeyphraseDictionary,
}

impl<'a> KeyphraseFeaturizer<'a> {
    #[must_use]
    pub const fn new(dictionary: &'a KeyphraseDictionary) -> Self {
        Self { dictionary }
    }

    /// Count matching variants per group, in dictionary order
    #[must_use]
    pub fn counts(&self, text: &str) -> Vec<(&'a str, u32)> {
        self.dictionary
            .groups()
            .iter()
            .map(|group| (group.name(), group.count_matches(text)))
            .collect()
    }

    /// Append the counts to a feature vector
    pub fn extend(&self, text: &str, features: &mut FeatureVector) {
        for (name, count) in self.counts(text) {
            features.insert(name, f64::from(count));
        }
    }
}
