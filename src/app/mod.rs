//! End-of-run reporting helpers used by the crawl runner.

pub mod statistics;

pub use statistics::print_error_statistics;
