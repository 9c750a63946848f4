//! Shared helpers.
//!
//! This module provides:
//! - CSS selector parsing utilities used by link discovery and tag extraction

mod selector;

pub use selector::{attribute_contains_selector, parse_selector_with_fallback};
