//! Dataset model and file reading
//!
//! This module provides the [`Document`] and [`Dataset`] types plus the
//! [`DatasetReader`] that decodes JSON or NDJSON sources into them.

mod document;
mod reader;

pub use document::{Dataset, Document};
pub use reader::{DEFAULT_KEY_FIELD, DatasetReader};
