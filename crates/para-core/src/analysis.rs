/// Tokenizer/tagger adapter: one pass over a paragraph producing everything the
/// rest of the pipeline consumes.
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AnalysisError, ResourceError};
use crate::resources::LanguageResources;
use crate::tagger::{TaggedToken, Tagger};
use crate::tokenize;

/// Lower-cased, alphanumeric, non-stopword word → occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencies {
    counts: HashMap<String, usize>,
}

impl WordFrequencies {
    pub fn count<'w>(
        words: impl IntoIterator<Item = &'w str>,
        resources: &LanguageResources,
    ) -> Self {
        let mut counts = HashMap::new();
        for word in words {
            let lower = word.to_lowercase();
            if tokenize::is_alphanumeric(&lower) && !resources.is_stopword(&lower) {
                *counts.entry(lower).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn get(&self, lowercase_word: &str) -> Option<usize> {
        self.counts.get(lowercase_word).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TextAnalysis<'a> {
    pub text: &'a str,
    pub sentences: Vec<&'a str>,
    pub tokens: Vec<TaggedToken<'a>>,
    pub frequencies: WordFrequencies,
}

/// Holds the tagging capability. Built without resources it reports
/// `ResourceUnavailable` on every call.
#[derive(Clone)]
pub struct Analyzer {
    resources: Option<Arc<LanguageResources>>,
}

impl Analyzer {
    pub fn new(resources: Option<Arc<LanguageResources>>) -> Self {
        Self { resources }
    }

    pub fn analyze<'a>(&self, text: &'a str) -> Result<TextAnalysis<'a>, AnalysisError> {
        let resources = self
            .resources
            .as_ref()
            .ok_or(ResourceError::NotLoaded)?;

        let sentences = tokenize::split_sentences(text);
        let words = tokenize::words(text);
        let tokens = Tagger::new(Arc::clone(resources)).tag(&words);
        if tokens.len() != words.len() {
            return Err(AnalysisError::Internal(format!(
                "tagger returned {} tags for {} tokens",
                tokens.len(),
                words.len()
            )));
        }
        let frequencies = WordFrequencies::count(words.iter().copied(), resources);

        Ok(TextAnalysis {
            text,
            sentences,
            tokens,
            frequencies,
        })
    }
}
