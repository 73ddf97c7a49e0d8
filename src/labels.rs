//! Category label resolution.
//!
//! The trained model was fitted with an integer encoding of category names.
//! At serving time that encoding must stay stable: a category resolves to the
//! same integer it was fitted with, and a category the fitting never saw
//! resolves to the `UNKNOWN` sentinel, a warning-level signal rather than a
//! failure.
//!
//! # Normalization
//!
//! Lookups are case- and whitespace-insensitive: `" beauty "` and `"BEAUTY"`
//! resolve identically. [`normalize`] is the single normalization rule, used
//! both here and by the loader so dataset filtering and label lookups agree.
//!
//! # Concurrency
//!
//! The vocabulary is the only mutable state shared across concurrent
//! requests. [`CategoryResolver`] is an explicitly owned service object whose
//! single entry point serializes every read and the one permitted mutation
//! (appending `UNKNOWN`), so two racing never-seen categories cannot
//! double-append the sentinel or observe different encodings for it.
//!
//! The vocabulary only ever grows: the serving-time resolver appends nothing
//! but `UNKNOWN`, and that at most once.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Sentinel class assigned to categories absent from the fitted vocabulary.
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

/// Canonical form used for vocabulary lookups and dataset filtering.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The fitted, ordered mapping from category name to integer label.
///
/// Serialized as a plain JSON array of class names, index = label, which is
/// the on-disk format the surrounding service loads at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryVocabulary {
    classes: Vec<String>,
}

impl CategoryVocabulary {
    /// Build a vocabulary from fitted class names, normalizing each and
    /// dropping duplicates while preserving first-seen order.
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = CategoryVocabulary::default();
        for class in classes {
            let normalized = normalize(class.as_ref());
            if !vocab.classes.contains(&normalized) {
                vocab.classes.push(normalized);
            }
        }
        vocab
    }

    /// The ordered class names.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Integer label of an already-normalized category, if known.
    pub fn index_of(&self, normalized: &str) -> Option<i64> {
        self.classes
            .iter()
            .position(|c| c == normalized)
            .map(|i| i as i64)
    }

    /// Whether a normalized category is present.
    pub fn contains(&self, normalized: &str) -> bool {
        self.index_of(normalized).is_some()
    }
}

/// Outcome of resolving one category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The stable integer label
    pub label: i64,

    /// The normalized form of the requested category
    pub category: String,

    /// False when the category fell back to [`UNKNOWN_CATEGORY`]
    pub recognized: bool,

    /// Warning naming the unrecognized category, when applicable
    pub warning: Option<String>,
}

/// Serialized access point for the shared vocabulary.
///
/// Owns the vocabulary behind a mutex; every resolution, read or
/// sentinel-appending, passes through [`CategoryResolver::resolve`], the
/// single critical section required by the pipeline's concurrency model.
#[derive(Debug)]
pub struct CategoryResolver {
    vocab: Mutex<VocabularyState>,
}

#[derive(Debug)]
struct VocabularyState {
    classes: Vec<String>,
    index: AHashMap<String, i64>,
}

impl VocabularyState {
    fn from_vocabulary(vocab: CategoryVocabulary) -> Self {
        let index = vocab
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i as i64))
            .collect();
        Self {
            classes: vocab.classes,
            index,
        }
    }

    fn append(&mut self, class: String) -> i64 {
        let label = self.classes.len() as i64;
        self.index.insert(class.clone(), label);
        self.classes.push(class);
        label
    }
}

impl CategoryResolver {
    /// Create a resolver over a fitted vocabulary.
    pub fn new(vocab: CategoryVocabulary) -> Self {
        Self {
            vocab: Mutex::new(VocabularyState::from_vocabulary(vocab)),
        }
    }

    /// Resolve a raw category string to its stable integer label.
    ///
    /// Known categories return their fitted position. Unseen categories
    /// resolve to [`UNKNOWN_CATEGORY`], appending it first if this is the
    /// first unseen resolution, and carry a warning naming the category.
    /// Resolution never fails.
    pub fn resolve(&self, raw: &str) -> Resolution {
        let normalized = normalize(raw);

        // A poisoned lock still holds a usable vocabulary.
        let mut state = self.vocab.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(&label) = state.index.get(&normalized) {
            return Resolution {
                label,
                category: normalized,
                recognized: true,
                warning: None,
            };
        }

        let label = match state.index.get(UNKNOWN_CATEGORY) {
            Some(&label) => label,
            None => state.append(UNKNOWN_CATEGORY.to_string()),
        };

        let warning = format!(
            "category '{normalized}' not found in vocabulary; resolved to '{UNKNOWN_CATEGORY}'"
        );
        log::warn!("{warning}");

        Resolution {
            label,
            category: normalized,
            recognized: false,
            warning: Some(warning),
        }
    }

    /// A copy of the current vocabulary, for persistence by the caller.
    pub fn snapshot(&self) -> CategoryVocabulary {
        let state = self.vocab.lock().unwrap_or_else(|e| e.into_inner());
        CategoryVocabulary {
            classes: state.classes.clone(),
        }
    }

    /// Current number of classes, sentinel included once present.
    pub fn len(&self) -> usize {
        self.vocab
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .classes
            .len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
