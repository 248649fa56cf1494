pub mod analysis;
pub mod backend;
pub mod error;
pub mod fallback;
pub mod openai;
pub mod pipeline;
pub mod questions;
pub mod remote;
pub mod resources;
pub mod summarize;
pub mod tagger;
pub mod terms;
pub mod tokenize;

pub use backend::{Analysis, AnalysisBackend};
pub use error::{AnalysisError, ResourceError};
pub use pipeline::{AnalysisPath, FallbackReason, LocalBackend};
pub use remote::{RemoteBackend, RemoteError};
