//! HTTP client for the ReqChat extraction backend
//!
//! Wraps the backend's REST API: chat messages, document upload for
//! requirement extraction, model listing, and server-side history. Requests
//! use a long timeout because extraction runs can take minutes; failures are
//! wrapped into [`BackendError`] with user-facing messages pulled out of the
//! response payload.

pub mod backend;
pub mod config;
pub mod error;
pub mod models;

pub use backend::{ExtractionBackend, ProgressFn, SUPPORTED_EXTENSIONS};
pub use config::BackendConfig;
pub use error::BackendError;
pub use models::{
    HistoryEntry, ModelsResponse, SendMessageRequest, SendMessageResponse, UploadOutcome,
};
