//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-figma server.

pub mod cache;
pub mod get_document;

pub use get_document::{GetFigmaDataParams, get_document_impl};
