//! Terminal chat shell for ReqChat
//!
//! Wires the conversation store, the backend client, and the extraction
//! parser into a ratatui interface: message list, composer, model picker,
//! and the document upload flow with a progress gauge.

pub mod app;
pub mod event;
pub mod view;

pub use app::{App, AppEvent, InputMode};
pub use event::{Event, EventLoop};
