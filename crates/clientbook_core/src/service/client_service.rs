//! Client use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::client::{Client, ClientId, ClientShort, NewClient};
use crate::repo::{ClientFilter, ClientListQuery, ClientRepository, PageRequest, RepoResult};

/// Use-case service wrapper for client CRUD and listing.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Validates and stores a new client, returning its assigned id.
    pub fn create_client(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        self.repo.add(client)
    }

    pub fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.repo.get_by_id(id)
    }

    /// Returns `false` when no client has `id`.
    pub fn replace_client(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        self.repo.replace_by_id(id, client)
    }

    /// Returns `false` when no client has `id`.
    pub fn delete_client(&mut self, id: ClientId) -> RepoResult<bool> {
        self.repo.delete_by_id(id)
    }

    /// Full records for page `k` of size `n`.
    pub fn page(&self, k: u32, n: u32) -> RepoResult<Vec<Client>> {
        let query = ClientListQuery::default().with_page(PageRequest::new(k, n)?);
        self.repo.list(&query)
    }

    /// Short records for page `k` of size `n`.
    pub fn short_page(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        self.repo.get_k_n_short_list(k, n)
    }

    pub fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        self.repo.list(query)
    }

    pub fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        self.repo.count(filters)
    }
}
