//! Shared utilities for the Hiroba workspace.

pub mod logger;
