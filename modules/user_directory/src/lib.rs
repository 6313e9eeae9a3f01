// === PUBLIC CONTRACT ===
// Types and ports other crates are expected to consume.
pub mod contract;

pub use contract::{client, error, model};

// === ENGINE ===
pub mod domain;
pub use domain::engine::ListEngine;
pub use domain::view::{
    derive, DerivedView, FilterCriteria, Selection, SortCriteria, SortDirection, SortField,
    ViewState,
};

// === CONFIGURATION ===
pub mod config;
pub use config::UserDirectoryConfig;

// === ADAPTERS ===
// Data sources and the HTTP surface wired by the server binary.
pub mod api;
pub mod infra;

/// Key of this module's section in the application configuration bag.
pub const MODULE_NAME: &str = "user_directory";
