/// Local analysis backend: primary tagger-driven pipeline with a fallback path.
///
/// Primary: analyze → key terms → summary → multiple-choice, short-answer,
/// true/false and vocabulary questions, numbered as one list.
/// Any primary failure is logged and answered by [`fallback::fallback_analysis`].
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::analysis::Analyzer;
use crate::backend::{Analysis, AnalysisBackend};
use crate::error::AnalysisError;
use crate::fallback;
use crate::questions::{self, TermSelector};
use crate::resources::LanguageResources;
use crate::summarize::{self, SUMMARY_SENTENCES};
use crate::terms;

pub const LOCAL_LABEL: &str = "Local Processing";

/// Which route produced an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPath {
    /// Blank input, answered without analysis.
    Empty,
    Primary,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ResourceUnavailable,
    Internal,
}

#[derive(Clone)]
pub struct LocalBackend {
    analyzer: Analyzer,
    selector: Arc<dyn TermSelector>,
}

impl LocalBackend {
    pub fn new(resources: Arc<LanguageResources>, selector: Arc<dyn TermSelector>) -> Self {
        Self {
            analyzer: Analyzer::new(Some(resources)),
            selector,
        }
    }

    /// A backend whose tagger is unavailable; every request takes the fallback path.
    pub fn without_resources(selector: Arc<dyn TermSelector>) -> Self {
        Self {
            analyzer: Analyzer::new(None),
            selector,
        }
    }

    /// Run the pipeline and report which path answered.
    pub fn run(&self, paragraph: &str) -> (Analysis, AnalysisPath) {
        let text = paragraph.trim();
        if text.is_empty() {
            return (Analysis::default(), AnalysisPath::Empty);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.primary(text)))
            .unwrap_or_else(|payload| {
                Err(AnalysisError::Internal(format!(
                    "primary analysis panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

        match outcome {
            Ok(analysis) => (analysis, AnalysisPath::Primary),
            Err(e) => {
                let reason = match &e {
                    AnalysisError::ResourceUnavailable(_) => {
                        warn!(error = %e, "primary analysis unavailable, using fallback");
                        FallbackReason::ResourceUnavailable
                    }
                    _ => {
                        error!(error = %e, "primary analysis failed, using fallback");
                        FallbackReason::Internal
                    }
                };
                (fallback::fallback_analysis(text), AnalysisPath::Fallback(reason))
            }
        }
    }

    fn primary(&self, text: &str) -> Result<Analysis, AnalysisError> {
        let analysis = self.analyzer.analyze(text)?;
        let key_terms = terms::extract_key_terms(&analysis.tokens);
        let summary = summarize::summarize(&analysis, SUMMARY_SENTENCES);

        let mut qs = questions::multiple_choice(&analysis, &key_terms);
        qs.extend(questions::short_answer(&analysis));
        qs.push(questions::true_false(&analysis));
        qs.extend(questions::vocabulary(
            &analysis,
            &key_terms,
            self.selector.as_ref(),
        ));

        debug!(
            sentences = analysis.sentences.len(),
            tokens = analysis.tokens.len(),
            key_terms = key_terms.len(),
            questions = qs.len(),
            "primary analysis complete"
        );

        Ok(Analysis {
            summary,
            questions: questions::number(qs),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[async_trait]
impl AnalysisBackend for LocalBackend {
    fn label(&self) -> &str {
        LOCAL_LABEL
    }

    async fn analyze(&self, paragraph: &str) -> Result<Analysis, AnalysisError> {
        let backend = self.clone();
        let paragraph = paragraph.to_string();
        let (analysis, path) = tokio::task::spawn_blocking(move || backend.run(&paragraph))
            .await
            .map_err(|e| AnalysisError::Internal(format!("spawn_blocking join error: {e}")))?;
        debug!(?path, questions = analysis.questions.len(), "local analysis finished");
        Ok(analysis)
    }
}
