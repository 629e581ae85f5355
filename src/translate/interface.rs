use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::language::Language;

/// One translation call. `source` is `None` when the service should detect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source: Option<Language>,
    pub target: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub translated_text: String,
    /// Only reported by the service when it detected the source itself
    pub detected_source_language: Option<String>,
}

/// Translation backend seam. The widget store only talks to this trait so
/// tests can swap the HTTP client for an in-memory double.
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    async fn translate(&self, request: &TranslateRequest) -> Result<Translation, TranslateError>;

    /// Short provider name for logs and the health endpoint
    fn provider(&self) -> &'static str;
}
