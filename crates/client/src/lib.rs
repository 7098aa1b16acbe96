//! Client code for mcp-figma.
//!
//! This crate provides the Figma REST API client used by the server to fill
//! cache misses.

pub mod figma;

pub use figma::{FigmaClient, FigmaConfig, FigmaError};
