//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `StoreError`, so functions can simply return `Result<T>`.
use crate::error::StoreError;

/// Workspace-wide `Result` alias with `StoreError` as the default error.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
