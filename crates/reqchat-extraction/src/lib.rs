//! Requirement extraction parsing and classification
//!
//! The extraction backend replies with free-form text that usually, but not
//! always, carries a JSON array of requirement records. This crate recovers
//! those records from whatever shape the payload arrived in and buckets each
//! one into a semantic category so the chat shell can render them grouped.
//!
//! Both entry points are pure, synchronous, and total: they never fail, they
//! only decline. A payload with no recoverable structure parses to `None`
//! and the caller falls back to rendering the raw text.

pub mod classifier;
pub mod parser;
pub mod requirement;

pub use classifier::{classify, group, Category, RequirementGroups};
pub use parser::{parse, parse_value};
pub use requirement::Requirement;
