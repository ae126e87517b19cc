//! Webhook client: the [`Analyzer`] seam and its HTTP implementation.

mod http;

pub use http::{ClientConfig, ClientError, WebhookClient};

use async_trait::async_trait;
use guardinia_core::{AnalysisRequest, AnalysisResult};

/// Something that can turn a submission into a verdict.
///
/// [`WebhookClient`] is the production implementation; tests substitute
/// in-process fakes.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError>;
}
