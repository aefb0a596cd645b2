//! Repository contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the `ClientRepository` contract shared by file and SQL storage.
//! - Provide listing decorators that add filters or sorting to any backend.
//! - Provide the observable item store used by the item controller.
//!
//! # Invariants
//! - Write paths validate records before anything is persisted.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is: filter, then sort, then page.

use crate::db::DbError;
use crate::model::client::{Client, ClientId, ClientShort, ClientValidationError, NewClient};
use crate::model::item::ItemValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod decorator;
pub mod file_repo;
pub mod format;
pub mod item_repo;
pub mod query;
pub mod sqlite_repo;

pub use format::FormatError;
pub use query::{ClientFilter, ClientListQuery, ClientSort, FilterOp, PageRequest, SortOrder};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every storage backend.
#[derive(Debug)]
pub enum RepoError {
    ClientValidation(ClientValidationError),
    ItemValidation(ItemValidationError),
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Format(FormatError),
    InvalidPage {
        k: u32,
        n: u32,
    },
    InvalidData(String),
    DuplicateId(i64),
    IdExhausted,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientValidation(err) => write!(f, "{err}"),
            Self::ItemValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Format(err) => write!(f, "{err}"),
            Self::InvalidPage { k, n } => write!(
                f,
                "invalid page request k={k} n={n}: both must be at least 1"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::DuplicateId(id) => write!(f, "record id {id} already exists"),
            Self::IdExhausted => write!(f, "no client id left above {}", i64::MAX),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ClientValidation(err) => Some(err),
            Self::ItemValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Format(err) => Some(err),
            Self::InvalidPage { .. }
            | Self::InvalidData(_)
            | Self::DuplicateId(_)
            | Self::IdExhausted => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::ClientValidation(value)
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::ItemValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<FormatError> for RepoError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

/// Repository interface for client CRUD and listing.
pub trait ClientRepository {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>>;
    /// Lists clients matching all filters, sorted and paged per `query`.
    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>>;
    /// Counts clients matching all `filters`.
    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize>;
    /// Validates and stores a client under `max(id) + 1`, returning that id.
    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId>;
    /// Replaces all fields of an existing client. Returns `false` when missing.
    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool>;
    /// Removes a client. Returns `false` when missing.
    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool>;

    /// Returns page `k` (1-based) of `n` short records.
    fn get_k_n_short_list(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        let query = ClientListQuery::default().with_page(PageRequest::new(k, n)?);
        Ok(self.list(&query)?.iter().map(Client::short).collect())
    }

    fn get_count(&self) -> RepoResult<usize> {
        self.count(&[])
    }
}

impl<R: ClientRepository + ?Sized> ClientRepository for &mut R {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        (**self).get_by_id(id)
    }

    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        (**self).list(query)
    }

    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        (**self).count(filters)
    }

    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        (**self).add(client)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        (**self).replace_by_id(id, client)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool> {
        (**self).delete_by_id(id)
    }
}

impl<R: ClientRepository + ?Sized> ClientRepository for Box<R> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        (**self).get_by_id(id)
    }

    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        (**self).list(query)
    }

    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        (**self).count(filters)
    }

    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        (**self).add(client)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        (**self).replace_by_id(id, client)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool> {
        (**self).delete_by_id(id)
    }
}
