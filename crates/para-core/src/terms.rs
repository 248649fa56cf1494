use crate::tagger::TaggedToken;
use crate::tokenize;

pub const MAX_KEY_TERMS: usize = 10;
const MIN_TERM_CHARS: usize = 4;

/// Alphabetic nouns, proper nouns and adjectives longer than three characters.
pub fn is_key_term(token: &TaggedToken<'_>) -> bool {
    token.tag.is_content() && qualifies(token.text)
}

/// Distinct key terms in first-seen order, at most [`MAX_KEY_TERMS`].
///
/// Distinctness is case-sensitive: each term is spelled exactly as it appears
/// in the paragraph.
pub fn extract_key_terms<'a>(tokens: &[TaggedToken<'a>]) -> Vec<&'a str> {
    let mut terms: Vec<&'a str> = Vec::new();
    for token in tokens.iter().filter(|t| is_key_term(t)) {
        if terms.len() == MAX_KEY_TERMS {
            break;
        }
        if !terms.contains(&token.text) {
            terms.push(token.text);
        }
    }
    terms
}

/// Every qualifying noun in token order, repeats included.
pub fn nouns<'a>(tokens: &[TaggedToken<'a>]) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|t| t.tag.is_noun() && qualifies(t.text))
        .map(|t| t.text)
        .collect()
}

fn qualifies(text: &str) -> bool {
    tokenize::is_alphabetic(text) && text.chars().count() >= MIN_TERM_CHARS
}
