//! Shared utilities for provider implementations

pub mod pattern;

pub use pattern::KeyPattern;
