//! Listing decorators over any `ClientRepository`.
//!
//! A decorator changes only what listings return. Lookups by id and every
//! mutation pass straight through, so decorators nest in any order.

use crate::model::client::{Client, ClientId, NewClient};
use crate::repo::{ClientFilter, ClientListQuery, ClientRepository, ClientSort, RepoResult};

/// Restricts `list` and `count` to clients matching extra filters.
#[derive(Debug)]
pub struct FilteredRepository<R> {
    inner: R,
    filters: Vec<ClientFilter>,
}

impl<R: ClientRepository> FilteredRepository<R> {
    pub fn new(inner: R, filter: ClientFilter) -> Self {
        Self {
            inner,
            filters: vec![filter],
        }
    }

    pub fn with_filters(inner: R, filters: Vec<ClientFilter>) -> Self {
        Self { inner, filters }
    }

    pub fn filters(&self) -> &[ClientFilter] {
        &self.filters
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn merged(&self, filters: &[ClientFilter]) -> Vec<ClientFilter> {
        filters.iter().chain(&self.filters).cloned().collect()
    }
}

impl<R: ClientRepository> ClientRepository for FilteredRepository<R> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.inner.get_by_id(id)
    }

    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        let query = ClientListQuery {
            filters: self.merged(&query.filters),
            ..query.clone()
        };
        self.inner.list(&query)
    }

    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        self.inner.count(&self.merged(filters))
    }

    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        self.inner.add(client)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        self.inner.replace_by_id(id, client)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool> {
        self.inner.delete_by_id(id)
    }
}

/// Applies a default sort to `list` when the query carries none.
///
/// An explicit sort on the query (e.g. from an outer decorator) wins.
#[derive(Debug)]
pub struct SortedRepository<R> {
    inner: R,
    sort: ClientSort,
}

impl<R: ClientRepository> SortedRepository<R> {
    pub fn new(inner: R, sort: ClientSort) -> Self {
        Self { inner, sort }
    }

    pub fn sort(&self) -> ClientSort {
        self.sort
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ClientRepository> ClientRepository for SortedRepository<R> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.inner.get_by_id(id)
    }

    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        if query.sort.is_some() {
            return self.inner.list(query);
        }
        self.inner.list(&query.clone().with_sort(self.sort))
    }

    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        self.inner.count(filters)
    }

    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        self.inner.add(client)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        self.inner.replace_by_id(id, client)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool> {
        self.inner.delete_by_id(id)
    }
}
