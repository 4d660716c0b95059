//! # docvec - Document Embedding Indexer
//!
//! Turns a directory of plain-text documents into a persisted
//! nearest-neighbour index over unit-normalized sentence embeddings, plus a
//! record of each document's text and source file in the same row order.
//!
//! ## Pipeline
//!
//! ```text
//! data/*.txt ──► DocumentLoader ──► embed_in_batches ──► normalize_rows
//!                                    (FastEmbed,               │
//!                                     all-MiniLM-L6-v2)        ▼
//!            vector_docs.json ◄── DocStore      FlatIpIndex ──► vector_index.index
//! ```
//!
//! Row `i` of the index always belongs to entry `i` of the document record.
//! Every stage preserves order, and loading the artifacts back checks that
//! both sides have the same number of rows.
//!
//! ## Modules
//!
//! - [`loader`]: reads and trims matching files, skipping blank ones
//! - [`embedding`]: embedding provider trait, FastEmbed provider, batching
//! - [`normalize`]: L2 normalization with the zero-vector guard
//! - [`index`]: flat inner-product index and its binary format
//! - [`docstore`]: texts/metadatas record persisted as JSON
//! - [`client`]: build, search and info over the two artifacts
//! - [`config`]: configuration with file and environment overrides
//! - [`cli`]: the `docvec` command-line front-end
//! - [`error`]: error types
//!
//! ## Usage Example
//!
//! ```no_run
//! use docvec::DocIndexClient;
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = DocIndexClient::new()?;
//!     let report = client.build()?;
//!     println!("{} documents, dim={}", report.documents_indexed, report.dimension);
//!     Ok(())
//! }
//! ```

/// Command-line interface
pub mod cli;

/// Index building and querying
pub mod client;

/// Configuration management with environment variable overrides
pub mod config;

/// Texts and metadata stored alongside the index
pub mod docstore;

/// Embedding generation using FastEmbed (all-MiniLM-L6-v2)
pub mod embedding;

/// Error types and utilities
pub mod error;

/// Exact inner-product vector index
pub mod index;

/// Reading documents from the input directory
pub mod loader;

/// L2 normalization of embedding rows
pub mod normalize;

/// Platform directories and atomic writes
pub mod paths;

/// Result types returned by the client
pub mod types;

pub use client::DocIndexClient;
pub use config::Config;
pub use error::DocvecError;
