/// Linguistic resources used by the tagger and the frequency table.
///
/// Two resources ship with the crate (embedded at compile time):
/// - `data/lexicon.tsv`: `word<whitespace>TAG` lines with Penn-style tags
/// - `data/stopwords.txt`: one English stopword per line
///
/// The lexicon can be replaced by a file on disk. Resources are loaded once per
/// process through [`LanguageResources::shared`]; repeated calls return the
/// already-loaded instance.
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::ResourceError;

const EMBEDDED_LEXICON: &str = include_str!("../data/lexicon.tsv");
const EMBEDDED_STOPWORDS: &str = include_str!("../data/stopwords.txt");

/// Tags accepted in a lexicon file.
const KNOWN_TAGS: &[&str] = &[
    "CC", "CD", "DT", "EX", "IN", "JJ", "JJR", "JJS", "MD", "NN", "NNS", "NNP", "NNPS", "PRP",
    "PRP$", "RB", "TO", "VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "WP", "WRB",
];

static SHARED: OnceCell<Arc<LanguageResources>> = OnceCell::new();

/// Lower-cased word → Penn-style tag.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    pub fn parse(content: &str) -> Result<Self, ResourceError> {
        let mut entries = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(word), Some(tag), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(ResourceError::Malformed {
                    resource: "lexicon",
                    line: idx + 1,
                    message: "expected `word TAG`".to_string(),
                });
            };
            if !KNOWN_TAGS.contains(&tag) {
                return Err(ResourceError::Malformed {
                    resource: "lexicon",
                    line: idx + 1,
                    message: format!("unknown tag {tag:?}"),
                });
            }
            // First entry wins so a file can list a word's dominant reading first.
            entries
                .entry(word.to_lowercase())
                .or_insert_with(|| tag.to_string());
        }
        if entries.is_empty() {
            return Err(ResourceError::Empty("lexicon"));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, lowercase_word: &str) -> Option<&str> {
        self.entries.get(lowercase_word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LanguageResources {
    lexicon: Lexicon,
    stopwords: HashSet<String>,
}

impl LanguageResources {
    /// Resources bundled with the crate.
    pub fn embedded() -> Result<Self, ResourceError> {
        Ok(Self {
            lexicon: Lexicon::parse(EMBEDDED_LEXICON)?,
            stopwords: parse_stopwords(EMBEDDED_STOPWORDS)?,
        })
    }

    /// Bundled stopwords with a lexicon read from `path`.
    pub fn with_lexicon_file(path: &Path) -> Result<Self, ResourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            lexicon: Lexicon::parse(&content)?,
            stopwords: parse_stopwords(EMBEDDED_STOPWORDS)?,
        })
    }

    pub fn load(lexicon_path: Option<&Path>) -> Result<Self, ResourceError> {
        match lexicon_path {
            Some(path) => Self::with_lexicon_file(path),
            None => Self::embedded(),
        }
    }

    /// Process-wide resources, loaded on the first successful call.
    ///
    /// Later calls return the same instance and ignore `lexicon_path`. A failed
    /// load leaves the cell empty so the next call tries again.
    pub fn shared(lexicon_path: Option<&Path>) -> Result<Arc<Self>, ResourceError> {
        SHARED
            .get_or_try_init(|| {
                let resources = Self::load(lexicon_path)?;
                info!(
                    lexicon_entries = resources.lexicon.len(),
                    stopwords = resources.stopwords.len(),
                    custom_lexicon = lexicon_path.is_some(),
                    "linguistic resources loaded"
                );
                Ok(Arc::new(resources))
            })
            .map(Arc::clone)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn is_stopword(&self, lowercase_word: &str) -> bool {
        self.stopwords.contains(lowercase_word)
    }
}

fn parse_stopwords(content: &str) -> Result<HashSet<String>, ResourceError> {
    let words: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        return Err(ResourceError::Empty("stopword list"));
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_resources_load() {
        let resources = LanguageResources::embedded().expect("embedded resources");
        assert_eq!(resources.lexicon().get("the"), Some("DT"));
        assert_eq!(resources.lexicon().get("flew"), Some("VBD"));
        assert!(resources.is_stopword("the"));
        assert!(resources.is_stopword("wouldn't"));
        assert!(!resources.is_stopword("birds"));
    }

    #[test]
    fn lexicon_rejects_unknown_tag() {
        let err = Lexicon::parse("cat NN\ndog XYZ\n").unwrap_err();
        match err {
            ResourceError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lexicon_rejects_empty_content() {
        let err = Lexicon::parse("# only a comment\n\n").unwrap_err();
        assert!(matches!(err, ResourceError::Empty("lexicon")));
    }

    #[test]
    fn lexicon_keeps_first_reading_and_lowercases() {
        let lexicon = Lexicon::parse("Open VB\nopen JJ\n").expect("lexicon");
        assert_eq!(lexicon.get("open"), Some("VB"));
        assert_eq!(lexicon.len(), 1);
    }

    #[test]
    fn missing_lexicon_file_is_io_error() {
        let err = LanguageResources::load(Some(Path::new("/nonexistent/lexicon.tsv")))
            .unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }

    #[test]
    fn shared_is_idempotent() {
        let a = LanguageResources::shared(None).expect("first load");
        let b = LanguageResources::shared(None).expect("second load");
        assert!(Arc::ptr_eq(&a, &b));
    }
}
