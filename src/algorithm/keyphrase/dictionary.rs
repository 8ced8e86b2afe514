//! Keyphrase dictionary artifact
//!
//! The artifact is a JSON object mapping feature name to a list of patterns:
//!
//! ```json
//! { "Surveillance": ["surveillance", "restaging"], "Recurrence": ["recurren"] }
//! ```
//!
//! Key order is kept and becomes the order of the NLP features. Patterns are
//! regular expression fragments matched case-insensitively.

use std::path::Path;

use regex::{RegexSet, RegexSetBuilder};
use serde_json::Value;

use crate::error::util::safe_read_to_string;
use crate::error::{IndicationError, Result};
use crate::utils::logging::log_artifact_loaded;

/// A named group of pattern variants
#[derive(Debug, Clone)]
pub struct KeyphraseGroup {
    name: String,
    patterns: Vec<String>,
    matcher: RegexSet,
}

impl KeyphraseGroup {
    /// Compile a group from its pattern variants
    pub fn new(name: impl Into<String>, patterns: Vec<String>) -> Result<Self> {
        let name = name.into();
        if patterns.is_empty() {
            return Err(IndicationError::config(format!(
                "Keyphrase group '{name}' has no patterns"
            )));
        }

        let matcher = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|source| IndicationError::Pattern {
                group: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            patterns,
            matcher,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Number of variants found anywhere in `text`
    ///
    /// Each variant counts at most once however often it occurs.
    #[must_use]
    pub fn count_matches(&self, text: &str) -> u32 {
        self.matcher.matches(text).iter().count() as u32
    }
}

/// Ordered collection of keyphrase groups, shared read-only across a run
#[derive(Debug, Clone)]
pub struct KeyphraseDictionary {
    groups: Vec<KeyphraseGroup>,
}

impl KeyphraseDictionary {
    /// Build a dictionary from `(name, patterns)` pairs
    pub fn from_groups<I, N, P>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut compiled: Vec<KeyphraseGroup> = Vec::new();
        for (name, patterns) in groups {
            let group =
                KeyphraseGroup::new(name, patterns.into_iter().map(Into::into).collect())?;
            if compiled.iter().any(|g| g.name == group.name) {
                return Err(IndicationError::config(format!(
                    "Duplicate keyphrase group '{}'",
                    group.name
                )));
            }
            compiled.push(group);
        }

        if compiled.is_empty() {
            return Err(IndicationError::config("Keyphrase dictionary is empty"));
        }

        Ok(Self { groups: compiled })
    }

    /// Parse a dictionary from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(entries) = value else {
            return Err(IndicationError::config(
                "Keyphrase dictionary must be a JSON object of feature name to patterns",
            ));
        };

        let mut groups = Vec::with_capacity(entries.len());
        for (name, patterns) in entries {
            let Value::Array(items) = patterns else {
                return Err(IndicationError::config(format!(
                    "Patterns for '{name}' must be a list of strings"
                )));
            };
            let patterns = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(IndicationError::config(format!(
                        "Pattern {other} in '{name}' is not a string"
                    ))),
                })
                .collect::<Result<Vec<String>>>()?;
            groups.push((name, patterns));
        }

        Self::from_groups(groups)
    }

    /// Load a dictionary artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "keyphrase dictionary")?;
        let dictionary = Self::from_json_str(&content).map_err(|e| match e {
            IndicationError::Json(source) => IndicationError::config_at(
                format!("Keyphrase dictionary is not valid JSON: {source}"),
                path,
            ),
            IndicationError::Config { message, .. } => IndicationError::config_at(message, path),
            other => other,
        })?;

        log_artifact_loaded(
            "keyphrase dictionary",
            path,
            &format!(
                "{} groups, {} patterns",
                dictionary.len(),
                dictionary.pattern_count()
            ),
        );
        Ok(dictionary)
    }

    /// Dictionary for lung cancer surveillance imaging
    pub fn lung_cancer_default() -> Result<Self> {
        let groups: [(&str, &[&str]); 7] = [
            (
                "DefinitiveTreat",
                &[
                    r"lobectomy",
                    r"pneumonectomy",
                    r"wedge resection",
                    r"segmentectomy",
                    r"\bSBRT\b",
                    r"stereotactic body radiation",
                    r"chemoradiation",
                    r"radiation therapy",
                ],
            ),
            (
                "Surveillance",
                &[
                    r"surveillance",
                    r"restaging",
                    r"no evidence of (recurrent|residual|metastatic) disease",
                    r"status post",
                    r"post[- ]?treatment",
                ],
            ),
            (
                "Recurrence",
                &[
                    r"recurren(ce|t)",
                    r"new (nodule|mass|lesion|opacity)",
                    r"progression",
                    r"enlarging",
                ],
            ),
            (
                "FollowUp",
                &[
                    r"follow[- ]?up",
                    r"interval (change|increase|decrease|development)",
                    r"compared (to|with) (the )?prior",
                    r"\bstable\b",
                ],
            ),
            (
                "Metastasis",
                &[
                    r"metasta",
                    r"osseous lesion",
                    r"adrenal (nodule|mass)",
                    r"lymphadenopathy",
                ],
            ),
            (
                "Symptom",
                &[
                    r"\bcough",
                    r"hemoptysis",
                    r"dyspnea",
                    r"shortness of breath",
                    r"chest pain",
                    r"weight loss",
                    r"\bfever",
                ],
            ),
            (
                "LC_Treat_Drug",
                &[
                    r"pembrolizumab|keytruda",
                    r"nivolumab|opdivo",
                    r"durvalumab|imfinzi",
                    r"atezolizumab",
                    r"osimertinib|tagrisso",
                    r"carboplatin",
                    r"cisplatin",
                    r"pemetrexed",
                    r"docetaxel",
                ],
            ),
        ];

        let groups = groups.into_iter().map(|(name, patterns)| {
            let patterns = patterns.iter().map(|p| (*p).to_string()).collect::<Vec<_>>();
            (name, patterns)
        });

        Self::from_groups(groups)
    }

    #[must_use]
    pub fn groups(&self) -> &[KeyphraseGroup] {
        &self.groups
    }

    /// Feature names in dictionary order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(KeyphraseGroup::name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KeyphraseGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of pattern variants across groups
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.groups.iter().map(|g| g.patterns.len()).sum()
    }
}
