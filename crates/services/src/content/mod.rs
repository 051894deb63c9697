//! Course content: document format, sources, and the loaded catalog.

mod catalog;
mod document;
mod http;
mod sample;
mod source;

pub use catalog::{CourseCatalog, LoadOutcome};
pub use document::parse_course;
pub use http::{ContentConfig, HttpContentSource};
pub use sample::{SAMPLE_DATA_SOURCE, sample_course};
pub use source::{ContentSource, StaticContentSource};
