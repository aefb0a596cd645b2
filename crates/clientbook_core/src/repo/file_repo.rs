//! File-backed client repositories (JSON and YAML).
//!
//! # Responsibility
//! - Keep the full client list in memory and mirror it to one file.
//! - Share CRUD/listing semantics across formats via `RecordFormat`.
//!
//! # Invariants
//! - A missing file is an empty store; it is created on the first write.
//! - Every successful mutation rewrites the whole file before the in-memory
//!   list changes, so a failed write leaves both sides untouched.
//! - Writes go to a sibling `.tmp` file that is renamed over the target; the
//!   target always holds either the old or the new content.
//! - Unsorted listings keep storage order.

use crate::model::client::{Client, ClientId, NewClient};
use crate::repo::format::{JsonFormat, RecordFormat, YamlFormat};
use crate::repo::query::{apply_in_memory, matches_all};
use crate::repo::{
    ClientFilter, ClientListQuery, ClientRepository, ClientSort, RepoError, RepoResult,
};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub type JsonClientRepository = FileClientRepository<JsonFormat>;
pub type YamlClientRepository = FileClientRepository<YamlFormat>;

/// Client repository persisted as one `F`-encoded file.
#[derive(Debug)]
pub struct FileClientRepository<F: RecordFormat> {
    path: PathBuf,
    clients: Vec<Client>,
    _format: PhantomData<F>,
}

impl<F: RecordFormat> FileClientRepository<F> {
    /// Loads the repository from `path`.
    ///
    /// # Errors
    /// - `Io` when the file exists but cannot be read.
    /// - `Format` when the content is malformed.
    /// - `InvalidData` when a record fails validation or an id repeats.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let clients: Vec<Client> = load_records::<F, Client>(&path)?;

        let mut seen = HashSet::with_capacity(clients.len());
        for client in &clients {
            client.validate().map_err(|err| {
                RepoError::InvalidData(format!(
                    "client {} in `{}`: {err}",
                    client.id(),
                    path.display()
                ))
            })?;
            if !seen.insert(client.id()) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate client id {} in `{}`",
                    client.id(),
                    path.display()
                )));
            }
        }

        info!(
            "event=repo_open module=repo status=ok backend={} count={}",
            F::NAME,
            clients.len()
        );
        Ok(Self {
            path,
            clients,
            _format: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All clients in storage order.
    pub fn all(&self) -> &[Client] {
        &self.clients
    }

    /// Reorders storage by `sort` and persists the new order.
    pub fn sort_by(&mut self, sort: ClientSort) -> RepoResult<()> {
        let mut next = self.clients.clone();
        next.sort_by(|left, right| sort.compare(left, right));
        self.commit(next)?;
        info!(
            "event=client_sort module=repo status=ok backend={} field={}",
            F::NAME,
            sort.field
        );
        Ok(())
    }

    fn next_id(&self) -> RepoResult<ClientId> {
        self.clients
            .iter()
            .map(Client::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(RepoError::IdExhausted)
    }

    fn position(&self, id: ClientId) -> Option<usize> {
        self.clients.iter().position(|client| client.id() == id)
    }

    fn commit(&mut self, next: Vec<Client>) -> RepoResult<()> {
        store_records::<F, Client>(&self.path, &next)?;
        self.clients = next;
        Ok(())
    }
}

impl<F: RecordFormat> ClientRepository for FileClientRepository<F> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let found = self.clients.iter().find(|client| client.id() == id);
        Ok(found.cloned())
    }

    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        Ok(apply_in_memory(&self.clients, query))
    }

    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        Ok(self
            .clients
            .iter()
            .filter(|client| matches_all(filters, client))
            .count())
    }

    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        let id = self.next_id()?;
        let created = Client::new(id, client.clone())?;

        let mut next = self.clients.clone();
        next.push(created);
        self.commit(next)?;

        info!(
            "event=client_add module=repo status=ok backend={} id={id}",
            F::NAME
        );
        Ok(id)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        let replacement = Client::new(id, client.clone())?;
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.clients.clone();
        next[index] = replacement;
        self.commit(next)?;

        info!(
            "event=client_replace module=repo status=ok backend={} id={id}",
            F::NAME
        );
        Ok(true)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.clients.clone();
        next.remove(index);
        self.commit(next)?;

        info!(
            "event=client_delete module=repo status=ok backend={} id={id}",
            F::NAME
        );
        Ok(true)
    }
}

/// Reads and decodes a record file; a missing file yields no records.
pub(crate) fn load_records<F: RecordFormat, T: DeserializeOwned>(
    path: &Path,
) -> RepoResult<Vec<T>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                "event=file_load module=repo status=missing backend={} path={}",
                F::NAME,
                path.display()
            );
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(F::decode(&text)?)
}

/// Encodes the whole record list and atomically replaces the file.
pub(crate) fn store_records<F: RecordFormat, T: Serialize>(
    path: &Path,
    records: &[T],
) -> RepoResult<()> {
    let text = F::encode(records)?;
    let staging = staging_path(path);

    let written = write_synced(&staging, text.as_bytes()).map_err(|source| RepoError::Io {
        path: staging.clone(),
        source,
    });
    if let Err(err) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(err);
    }

    std::fs::rename(&staging, path).map_err(|source| {
        let _ = std::fs::remove_file(&staging);
        RepoError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// `<dir>/<name>.tmp`, next to the target so the rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("records"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
