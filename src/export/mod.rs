//! JSON file persistence.
//!
//! Crawl statistics and analysis results are both written as pretty-printed
//! JSON through the same atomic writer, so a reader never observes a partially
//! written report.

mod json;

pub use json::{read_json, write_json_atomic};
