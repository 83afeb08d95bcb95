//! MCP server for Apache Solr.
//!
//! Exposes Solr's REST, Schema, and SQL APIs as agent tools over JSON-RPC 2.0
//! stdio transport, compatible with any MCP-aware AI agent. The SQL surface
//! includes vector-filtered variants that run a KNN similarity search first
//! and rewrite the statement to the matching documents.

pub mod config;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod solr;
pub mod vector_provider;

pub mod schema;
