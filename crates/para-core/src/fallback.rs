/// Degraded analysis that needs no linguistic resources.
///
/// Sentences come from splitting on periods and terms from runs of four or more
/// ASCII letters, so this path cannot fail on any input.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::Analysis;
use crate::questions::{self, GENERIC_TRUE_FALSE, TONE_QUESTION};

static LONG_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]{4,}").expect("valid regex"));

const FALLBACK_TERMS: usize = 3;
const MULTIPLE_CHOICE_TERMS: usize = 2;
pub const PURPOSE_QUESTION: &str = "What is the main purpose of this paragraph?";

pub fn fallback_analysis(text: &str) -> Analysis {
    let sentences = naive_sentences(text);
    let terms = top_terms(text, FALLBACK_TERMS);

    let summary = match sentences.as_slice() {
        [first, second, ..] => format!("{first}. {second}."),
        _ => text.trim().to_string(),
    };

    let mut qs = Vec::new();
    for term in terms.iter().take(MULTIPLE_CHOICE_TERMS) {
        qs.push(format!(
            "What does the paragraph suggest about {term}?\n   \
             A) It is the central topic\n   \
             B) It is a supporting detail\n   \
             C) It is mentioned as a contrast\n   \
             D) It is not discussed"
        ));
    }
    if let Some(term) = terms.first() {
        qs.push(format!("Explain the significance of {term} in the paragraph."));
    }
    qs.push(PURPOSE_QUESTION.to_string());
    qs.push(match sentences.get(1).or_else(|| sentences.first()) {
        Some(sentence) => format!("True or False: {sentence}."),
        None => GENERIC_TRUE_FALSE.to_string(),
    });
    if let Some(term) = terms.first() {
        qs.push(format!(
            "Define the term \"{term}\" as it is used in the paragraph."
        ));
    }
    qs.push(TONE_QUESTION.to_string());

    Analysis {
        summary,
        questions: questions::number(qs),
    }
}

/// Period-delimited pieces, trimmed, empties dropped.
pub fn naive_sentences(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The `limit` most frequent long words, title-cased. Ties keep first-seen order.
pub fn top_terms(text: &str, limit: usize) -> Vec<String> {
    // word -> (first position, count)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (idx, m) in LONG_WORD_RE.find_iter(text).enumerate() {
        counts
            .entry(m.as_str().to_lowercase())
            .or_insert((idx, 0))
            .1 += 1;
    }
    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (first_a, n_a)), (_, (first_b, n_b))| {
        n_b.cmp(n_a).then(first_a.cmp(first_b))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|(w, _)| title_case(&w))
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
