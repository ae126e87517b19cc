mod error;
pub mod request;
pub mod result;
pub mod upload;
pub mod verdict;

pub use error::InputError;
pub use request::{AnalysisRequest, InputMode, WebhookRequest};
pub use result::{AnalysisResult, Indicators};
pub use upload::{ImageFile, ImagePreview, format_file_size};
pub use verdict::Verdict;

/// Default webhook used by the web system.
pub const DEFAULT_ENDPOINT: &str = "https://ly9yvqdsta.execute-api.us-east-1.amazonaws.com/prod/teste";

/// Origin tag sent with every request unless disabled.
pub const DEFAULT_ORIGIN: &str = "web";
