/// Sentence and word segmentation for English prose.
///
/// Sentences end at `.`, `!` or `?` (with any trailing quotes or closing
/// brackets) when the next non-space character starts a new sentence or the
/// text ends. Periods after common abbreviations and single-letter initials do
/// not end a sentence. Returned sentences are trimmed slices of the input.
use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]").expect("valid regex")
});

/// Matched case-insensitively.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "vs", "etc", "e.g", "i.e", "inc", "ltd", "corp",
    "mt", "fig", "approx", "dept", "u.s", "u.k",
];

/// Only abbreviations when capitalized; the lowercase forms are ordinary words.
const CAPITALIZED_ABBREVIATIONS: &[&str] = &[
    "St", "Co", "Est", "Jan", "Feb", "Mar", "Apr", "Jun", "Jul", "Aug", "Sep", "Sept", "Oct",
    "Nov", "Dec",
];

/// Only abbreviations when a number follows, as in "No. 5".
const NUMBERING_ABBREVIATIONS: &[&str] = &["no", "nos", "vol", "pp"];

const TERMINATORS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '”', '’'];
const OPENERS: &[char] = &['"', '\'', '(', '[', '“', '‘'];

pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !TERMINATORS.contains(&c) {
            i += 1;
            continue;
        }

        // Swallow runs like "?!" or "..." and trailing closers.
        let mut j = i + 1;
        while j < chars.len() && TERMINATORS.contains(&chars[j].1) {
            j += 1;
        }
        while j < chars.len() && CLOSERS.contains(&chars[j].1) {
            j += 1;
        }
        let end = chars.get(j).map(|&(p, _)| p).unwrap_or(text.len());

        let boundary = match chars.get(j) {
            None => true,
            Some(&(_, next)) if next.is_whitespace() => {
                let following = chars[j..]
                    .iter()
                    .map(|&(_, ch)| ch)
                    .find(|ch| !ch.is_whitespace());
                let starts_sentence = following.map_or(true, |ch| {
                    ch.is_uppercase() || ch.is_numeric() || OPENERS.contains(&ch)
                });
                starts_sentence
                    && !(c == '.' && j == i + 1 && is_abbreviation(&text[start..pos], following))
            }
            Some(_) => false,
        };

        if boundary {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
        i = j.max(i + 1);
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Whether the word immediately before a period is an abbreviation or initial,
/// given the first visible character after the period.
fn is_abbreviation(before_period: &str, following: Option<char>) -> bool {
    let word = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| OPENERS.contains(&c));
    if word.is_empty() {
        return false;
    }
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        return first.is_alphabetic() && first.is_uppercase();
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
        || CAPITALIZED_ABBREVIATIONS.contains(&word)
        || (NUMBERING_ABBREVIATIONS.contains(&lower.as_str())
            && following.is_some_and(|ch| ch.is_ascii_digit()))
}

/// Word and punctuation tokens in order of appearance.
pub fn words(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// True when every character is a letter or digit.
pub fn is_alphanumeric(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphanumeric)
}

/// True when every character is a letter.
pub fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}
