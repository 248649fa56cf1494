/// Frequency-weighted extractive summarizer.
///
/// A sentence scores the mean frequency of its words that appear in the
/// paragraph's frequency table. Sentences with no such words are never picked.
/// The best `target` sentences are joined in their original order.
use crate::analysis::TextAnalysis;
use crate::tokenize;

pub const SUMMARY_SENTENCES: usize = 2;

pub fn summarize(analysis: &TextAnalysis<'_>, target: usize) -> String {
    let sentences = &analysis.sentences;
    if sentences.len() <= target {
        return sentences.join(" ");
    }

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .filter_map(|(idx, sentence)| {
            sentence_score(analysis, sentence).map(|score| (idx, score))
        })
        .collect();

    // Stable: equal scores keep their original order, so earlier sentences win ties.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut chosen: Vec<usize> = scored.into_iter().take(target).map(|(idx, _)| idx).collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|idx| sentences[idx])
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence_score(analysis: &TextAnalysis<'_>, sentence: &str) -> Option<f64> {
    let weights: Vec<usize> = tokenize::words(sentence)
        .into_iter()
        .filter_map(|w| analysis.frequencies.get(&w.to_lowercase()))
        .collect();
    if weights.is_empty() {
        return None;
    }
    Some(weights.iter().sum::<usize>() as f64 / weights.len() as f64)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::Analyzer;
    use crate::resources::LanguageResources;

    fn summary_of(text: &str) -> String {
        let analyzer = Analyzer::new(Some(Arc::new(
            LanguageResources::embedded().expect("embedded resources"),
        )));
        let analysis = analyzer.analyze(text).expect("analysis");
        summarize(&analysis, SUMMARY_SENTENCES)
    }

    #[test]
    fn short_paragraphs_are_returned_verbatim() {
        assert_eq!(
            summary_of("One idea here. Another idea there."),
            "One idea here. Another idea there."
        );
        assert_eq!(summary_of("Just one sentence"), "Just one sentence");
        assert_eq!(summary_of(""), "");
    }

    #[test]
    fn ties_prefer_earlier_sentences() {
        let summary = summary_of("The cat sat. The dog ran fast. Birds flew high in the sky.");
        assert_eq!(summary, "The cat sat. The dog ran fast.");
    }

    #[test]
    fn picks_highest_mean_frequency_in_original_order() {
        let text = "Volcanoes shape islands. Lunch was pleasant. \
                    Islands form when volcanoes erupt. Volcanoes build islands.";
        let summary = summary_of(text);
        assert_eq!(summary, "Volcanoes shape islands. Volcanoes build islands.");
    }

    #[test]
    fn sentences_without_scorable_words_are_excluded() {
        // The middle sentence is all stopwords.
        let text = "Rivers carry sediment. It is what it is. Deltas collect sediment.";
        let summary = summary_of(text);
        assert_eq!(summary, "Rivers carry sediment. Deltas collect sediment.");
    }

    #[test]
    fn summary_is_idempotent() {
        let text = "Bees pollinate flowers. Flowers produce seeds. Seeds grow into plants. Plants feed bees.";
        assert_eq!(summary_of(text), summary_of(text));
    }
}
