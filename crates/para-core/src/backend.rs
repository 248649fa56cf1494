use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Summary and numbered questions for one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub questions: Vec<String>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.questions.is_empty()
    }
}

/// A source of summaries and questions.
///
/// Implementations answer a blank paragraph with [`Analysis::default`].
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Short label used in logs and the liveness payload, e.g. "Local Processing".
    fn label(&self) -> &str;

    async fn analyze(&self, paragraph: &str) -> Result<Analysis, AnalysisError>;
}
