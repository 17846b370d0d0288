//! # Guildboard
//!
//! A read-only leaderboard for a game's periodic guild events: static
//! ranking JSON in, derived rank tables and trend charts out.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (catalog, records, datasets, series)
//! - **fetch**: Catalog and ranking resource loading (remote or local)
//! - **calculate**: Rank derivation, gaps, and badge tiers
//! - **history**: Per-guild trend assembly across past events
//! - **view**: Table and chart view models consumed by the renderer
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod history;
pub mod models;
pub mod view;

pub use models::*;
