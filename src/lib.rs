//! # RagInfo
//!
//! A local-first document chat knowledge base.
//!
//! RagInfo ingests text documents, chunks them into overlapping segments,
//! and answers questions about them through a generative model, grounding
//! every answer in the stored chunks. All state lives in a single versioned
//! JSON record on disk with the API key encrypted at rest.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────┐
//! │  Files   │──▶│   Pipeline   │──▶│  StateStore │
//! │ (UTF-8)  │   │ Extract+Chunk│   │ (encrypted) │
//! └──────────┘   └──────────────┘   └──────┬──────┘
//!                                          │
//!                      ┌───────────────────┤
//!                      ▼                   ▼
//!                 ┌──────────┐       ┌──────────┐
//!                 │   CLI    │       │  Gemini  │
//!                 │(raginfo) │       │  client  │
//!                 └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! raginfo settings set --api-key $KEY   # configure the model API key
//! raginfo add notes.txt report.txt      # ingest documents
//! raginfo ask "what does the report conclude?"
//! raginfo export backup.json            # portable backup
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`chunk`] | Overlapping text chunking |
//! | [`extract`] | Text extraction from source files |
//! | [`ingest`] | Batch ingestion pipeline |
//! | [`crypto`] | At-rest API key encryption |
//! | [`migrate`] | State schema migration |
//! | [`store`] | Versioned encrypted state persistence |
//! | [`query`] | Grounded question answering |
//! | [`gemini`] | Google Generative Language API client |
//! | [`export`] | Whole-state export and import |
//! | [`progress`] | Ingestion progress reporting |

pub mod chunk;
pub mod config;
pub mod crypto;
pub mod export;
pub mod extract;
pub mod gemini;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod progress;
pub mod query;
pub mod store;
