//! Core domain logic for the client book.
//! This crate is the single source of truth for record validation and
//! storage semantics; front ends only collect input and render output.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, StorageBackend};
pub use controller::client_controller::{ClientController, ClientForm, ClientView};
pub use controller::item_controller::{ItemController, ItemForm, ItemView};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::client::{
    Client, ClientField, ClientId, ClientParseError, ClientShort, ClientValidationError, NewClient,
};
pub use model::item::{Item, ItemId, ItemValidationError};
pub use repo::decorator::{FilteredRepository, SortedRepository};
pub use repo::file_repo::{FileClientRepository, JsonClientRepository, YamlClientRepository};
pub use repo::format::{JsonFormat, RecordFormat, YamlFormat};
pub use repo::item_repo::{FilteredItemRepository, ItemFilter, ItemObserver, ItemRepository};
pub use repo::sqlite_repo::SqliteClientRepository;
pub use repo::{
    ClientFilter, ClientListQuery, ClientRepository, ClientSort, FilterOp, PageRequest, RepoError,
    RepoResult, SortOrder,
};
pub use service::client_service::ClientService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
