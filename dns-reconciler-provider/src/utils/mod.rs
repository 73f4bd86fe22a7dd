//! Utility modules.

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;

/// Domain name normalization shared by the record model and providers.
pub mod name;
