/// Rule-based part-of-speech tagger.
///
/// Each token is tagged in three steps:
/// 1. lexicon lookup on the lower-cased word
/// 2. capitalization and suffix rules for words the lexicon does not know
/// 3. a contextual rule: an unknown word after `to` or a modal is a verb
///
/// Internally tokens carry Penn-style tags; callers only see the coarse [`Tag`].
use std::sync::Arc;

use crate::resources::LanguageResources;
use crate::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Noun,
    NounPlural,
    ProperNoun,
    ProperNounPlural,
    Adjective,
    Other,
}

impl Tag {
    pub fn from_penn(tag: &str) -> Self {
        match tag {
            "NN" => Self::Noun,
            "NNS" => Self::NounPlural,
            "NNP" => Self::ProperNoun,
            "NNPS" => Self::ProperNounPlural,
            "JJ" => Self::Adjective,
            _ => Self::Other,
        }
    }

    pub fn is_noun(self) -> bool {
        matches!(
            self,
            Self::Noun | Self::NounPlural | Self::ProperNoun | Self::ProperNounPlural
        )
    }

    /// Nouns of any kind and plain adjectives.
    pub fn is_content(self) -> bool {
        self.is_noun() || self == Self::Adjective
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedToken<'a> {
    pub text: &'a str,
    pub tag: Tag,
}

/// Closed-class tags that still apply when the word is capitalized mid-sentence.
const FUNCTION_TAGS: &[&str] = &[
    "CC", "DT", "EX", "IN", "MD", "PRP", "PRP$", "TO", "WP", "WRB",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "less", "ical", "ic", "al", "ish",
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ism", "ist", "ship", "hood", "ance", "ence", "er",
    "or", "age", "ure",
];

#[derive(Clone)]
pub struct Tagger {
    resources: Arc<LanguageResources>,
}

impl Tagger {
    pub fn new(resources: Arc<LanguageResources>) -> Self {
        Self { resources }
    }

    /// Tag tokens produced by [`tokenize::words`]; the output is parallel to the input.
    pub fn tag<'a>(&self, tokens: &[&'a str]) -> Vec<TaggedToken<'a>> {
        let mut tagged = Vec::with_capacity(tokens.len());
        let mut sentence_start = true;
        let mut previous: &str = "";

        for &token in tokens {
            let penn = self.penn_tag(token, sentence_start, previous);
            tagged.push(TaggedToken {
                text: token,
                tag: Tag::from_penn(penn),
            });

            if matches!(token, "." | "!" | "?") {
                sentence_start = true;
            } else if tokenize::is_alphanumeric(token) || token.contains(['\'', '-', '’']) {
                sentence_start = false;
            }
            previous = penn;
        }
        tagged
    }

    fn penn_tag(&self, token: &str, sentence_start: bool, previous: &str) -> &'static str {
        if !token.chars().any(char::is_alphanumeric) {
            return ".";
        }
        if token.chars().any(char::is_numeric) {
            return "CD";
        }

        let lower = token.to_lowercase();
        let known = self.resources.lexicon().get(&lower).map(intern_tag);
        let capitalized = token.chars().next().is_some_and(char::is_uppercase);

        if capitalized && !sentence_start {
            return match known {
                Some(tag) if FUNCTION_TAGS.contains(&tag) => tag,
                _ if is_plural_form(&lower) => "NNPS",
                _ => "NNP",
            };
        }
        if let Some(tag) = known {
            return tag;
        }
        if matches!(previous, "TO" | "MD") {
            return "VB";
        }
        if previous == "PRP" {
            if lower.ends_with("ed") {
                return "VBD";
            }
            if is_plural_form(&lower) {
                return "VBZ";
            }
        }
        suffix_tag(&lower)
    }
}

fn suffix_tag(lower: &str) -> &'static str {
    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return "RB";
    }
    if len > 5 && lower.ends_with("ing") {
        return "VBG";
    }
    if len > 4 && lower.ends_with("ed") {
        return "VBD";
    }
    if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "JJ";
    }
    if len > 4 && NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "NN";
    }
    if is_plural_form(lower) {
        return "NNS";
    }
    "NN"
}

fn is_plural_form(lower: &str) -> bool {
    lower.chars().count() > 3
        && lower.ends_with('s')
        && !["ss", "us", "is", "ous"].iter().any(|s| lower.ends_with(s))
}

/// Map a lexicon tag onto a `'static` string so tags can be compared cheaply.
fn intern_tag(tag: &str) -> &'static str {
    match tag {
        "CC" => "CC",
        "CD" => "CD",
        "DT" => "DT",
        "EX" => "EX",
        "IN" => "IN",
        "JJ" => "JJ",
        "JJR" => "JJR",
        "JJS" => "JJS",
        "MD" => "MD",
        "NN" => "NN",
        "NNS" => "NNS",
        "NNP" => "NNP",
        "NNPS" => "NNPS",
        "PRP" => "PRP",
        "PRP$" => "PRP$",
        "RB" => "RB",
        "TO" => "TO",
        "VB" => "VB",
        "VBD" => "VBD",
        "VBG" => "VBG",
        "VBN" => "VBN",
        "VBP" => "VBP",
        "VBZ" => "VBZ",
        "WP" => "WP",
        "WRB" => "WRB",
        _ => "FW",
    }
}
