//! # Brook
//!
//! A microsub-style feed aggregator core.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → mf2 Document → Normalizer → TimelineBackend → Store
//! ```
//!
//! - [`mf2`]: Microformats2 parse tree model and HTML parser
//! - [`normalizer`]: Converts mf2 entries into uniform JF2 [`domain::Item`]s
//! - [`timeline`]: Per-channel storage strategies and the backend selector
//! - [`store`]: Ranked set, append log and flag set primitives on SQLite
//! - [`fetcher`]: Concurrent HTTP fetching with a TTL page cache
//!
//! ## Quick Start
//!
//! ```bash
//! # Normalize a parsed page into a channel
//! brook ingest home page.json
//!
//! # Fetch pages and add their entries to a channel
//! brook fetch home https://alice.example/ https://bob.example/notes
//!
//! # Newest page, then the next older page
//! brook timeline home
//! brook timeline home --after 20
//!
//! # Mark items read
//! brook mark-read home 19 20
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Configuration file handling
//! - [`domain`]: Core domain models (Item, Card, Timeline, channel settings)

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod mf2;
pub mod normalizer;
pub mod store;
pub mod timeline;
