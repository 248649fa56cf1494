/// Template-based question generators.
///
/// Each generator is a pure function of the analysed paragraph and its key
/// terms and returns un-numbered question texts. Numbering happens once over
/// the combined list (see [`number`]).
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::analysis::TextAnalysis;
use crate::terms;

const MULTIPLE_CHOICE_TERMS: usize = 2;
const SHORT_ANSWER_LIMIT: usize = 2;
const VOCABULARY_TERMS: usize = 5;
const MIN_VOCABULARY_QUESTIONS: usize = 2;

const SHORT_ANSWER_STARTERS: [&str; 4] = [
    "What is the significance of",
    "How does the paragraph describe",
    "What can you infer about",
    "Why does the author mention",
];

pub const GENERIC_TRUE_FALSE: &str =
    "True or False: The paragraph presents a single main idea.";
pub const TONE_QUESTION: &str =
    "Describe the tone and style of the paragraph. Which words or phrases create that effect?";

/// Chooses the term a vocabulary question asks about.
pub trait TermSelector: Send + Sync {
    fn select<'t>(&self, terms: &[&'t str]) -> Option<&'t str>;
}

/// Always the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTerm;

impl TermSelector for FirstTerm {
    fn select<'t>(&self, terms: &[&'t str]) -> Option<&'t str> {
        terms.first().copied()
    }
}

/// Uniformly random candidate from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTerm;

impl TermSelector for RandomTerm {
    fn select<'t>(&self, terms: &[&'t str]) -> Option<&'t str> {
        terms.choose(&mut rand::thread_rng()).copied()
    }
}

/// Reproducible random sequence from a fixed seed.
#[derive(Debug)]
pub struct SeededTerm {
    rng: Mutex<StdRng>,
}

impl SeededTerm {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TermSelector for SeededTerm {
    fn select<'t>(&self, terms: &[&'t str]) -> Option<&'t str> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        terms.choose(&mut *rng).copied()
    }
}

/// Up to two four-option questions, one per leading key term found in a sentence.
pub fn multiple_choice(analysis: &TextAnalysis<'_>, key_terms: &[&str]) -> Vec<String> {
    key_terms
        .iter()
        .take(MULTIPLE_CHOICE_TERMS)
        .filter_map(|term| {
            let needle = term.to_lowercase();
            analysis
                .sentences
                .iter()
                .find(|s| s.to_lowercase().contains(&needle))
                .map(|sentence| multiple_choice_text(term, sentence))
        })
        .collect()
}

fn multiple_choice_text(term: &str, sentence: &str) -> String {
    format!(
        "Which statement best reflects how the paragraph uses \"{term}\"?\n   \
         A) \"{term}\" is central to the idea: \"{sentence}\"\n   \
         B) \"{term}\" is mentioned only as an unrelated example\n   \
         C) \"{term}\" is contradicted later in the paragraph\n   \
         D) \"{term}\" does not appear in the paragraph"
    )
}

/// Starter phrases paired with the paragraph's nouns by position.
pub fn short_answer(analysis: &TextAnalysis<'_>) -> Vec<String> {
    SHORT_ANSWER_STARTERS
        .iter()
        .zip(terms::nouns(&analysis.tokens))
        .take(SHORT_ANSWER_LIMIT)
        .map(|(starter, noun)| format!("{starter} \"{noun}\"?"))
        .collect()
}

pub fn true_false(analysis: &TextAnalysis<'_>) -> String {
    match analysis.sentences.first() {
        Some(sentence) => format!("True or False: {sentence}"),
        None => GENERIC_TRUE_FALSE.to_string(),
    }
}

/// A definition question, a main-clause question and, when short of two, a tone question.
pub fn vocabulary(
    analysis: &TextAnalysis<'_>,
    key_terms: &[&str],
    selector: &dyn TermSelector,
) -> Vec<String> {
    let mut questions = Vec::new();

    let candidates = &key_terms[..key_terms.len().min(VOCABULARY_TERMS)];
    if let Some(term) = selector.select(candidates) {
        questions.push(format!(
            "Define the term \"{term}\" as it is used in the paragraph."
        ));
    }

    if let Some(sentence) = analysis
        .sentences
        .iter()
        .find(|s| s.split(',').count() > 2)
    {
        questions.push(format!(
            "Identify the main clause in the following sentence: \"{sentence}\""
        ));
    }

    if questions.len() < MIN_VOCABULARY_QUESTIONS {
        questions.push(TONE_QUESTION.to_string());
    }
    questions
}

/// Prefix each question with its 1-based position in the list.
pub fn number(questions: impl IntoIterator<Item = String>) -> Vec<String> {
    questions
        .into_iter()
        .enumerate()
        .map(|(idx, q)| format!("{}. {q}", idx + 1))
        .collect()
}
