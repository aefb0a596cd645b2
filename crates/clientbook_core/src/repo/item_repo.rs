//! Observable JSON-backed item store and its filtering view.
//!
//! # Invariants
//! - Item ids are unique within the store.
//! - Observers are notified after the file write succeeds, with the full
//!   item list.
//! - The filter only affects `get_filtered_items`; mutations ignore it.

use crate::model::item::{Item, ItemId};
use crate::repo::file_repo::{load_records, store_records};
use crate::repo::format::JsonFormat;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Receives the full item list after every successful change.
pub trait ItemObserver {
    fn items_changed(&self, items: &[Item]);
}

/// Item list mirrored to a JSON file.
pub struct ItemRepository {
    path: PathBuf,
    items: Vec<Item>,
    observers: Vec<Rc<dyn ItemObserver>>,
}

impl ItemRepository {
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let items: Vec<Item> = load_records::<JsonFormat, Item>(&path)?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate().map_err(|err| {
                RepoError::InvalidData(format!("item {} in `{}`: {err}", item.id, path.display()))
            })?;
            if !seen.insert(item.id) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate item id {} in `{}`",
                    item.id,
                    path.display()
                )));
            }
        }

        info!(
            "event=repo_open module=repo status=ok backend=items count={}",
            items.len()
        );
        Ok(Self {
            path,
            items,
            observers: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_observer(&mut self, observer: Rc<dyn ItemObserver>) {
        self.observers.push(observer);
    }

    pub fn get_all_items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Appends a new item.
    ///
    /// # Errors
    /// - `ItemValidation` for invalid fields.
    /// - `DuplicateId` when `item.id` is taken.
    pub fn add_item(&mut self, item: Item) -> RepoResult<()> {
        item.validate()?;
        if self.get(item.id).is_some() {
            return Err(RepoError::DuplicateId(item.id));
        }

        let id = item.id;
        let mut next = self.items.clone();
        next.push(item);
        self.commit(next)?;
        info!("event=item_add module=repo status=ok id={id}");
        Ok(())
    }

    /// Replaces the item stored under `id`; the new item may carry a new id.
    ///
    /// Returns `false` when `id` is missing.
    pub fn update_item(&mut self, id: ItemId, item: Item) -> RepoResult<bool> {
        item.validate()?;
        let Some(index) = self.items.iter().position(|existing| existing.id == id) else {
            return Ok(false);
        };
        if item.id != id && self.get(item.id).is_some() {
            return Err(RepoError::DuplicateId(item.id));
        }

        let mut next = self.items.clone();
        next[index] = item;
        self.commit(next)?;
        info!("event=item_update module=repo status=ok id={id}");
        Ok(true)
    }

    /// Returns `false` when `id` is missing.
    pub fn delete_item(&mut self, id: ItemId) -> RepoResult<bool> {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return Ok(false);
        };

        let mut next = self.items.clone();
        next.remove(index);
        self.commit(next)?;
        info!("event=item_delete module=repo status=ok id={id}");
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Item>) -> RepoResult<()> {
        store_records::<JsonFormat, Item>(&self.path, &next)?;
        self.items = next;
        for observer in &self.observers {
            observer.items_changed(&self.items);
        }
        Ok(())
    }
}

/// Predicate applied by `FilteredItemRepository`.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFilter {
    MinPrice(f64),
    NameContains(String),
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::MinPrice(min) => item.price >= *min,
            Self::NameContains(needle) => item.name.contains(needle.as_str()),
        }
    }
}

/// Item store with an optional, swappable listing filter.
pub struct FilteredItemRepository {
    repository: ItemRepository,
    filter: Option<ItemFilter>,
}

impl FilteredItemRepository {
    pub fn new(repository: ItemRepository) -> Self {
        Self {
            repository,
            filter: None,
        }
    }

    pub fn set_filter(&mut self, filter: ItemFilter) {
        self.filter = Some(filter);
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    pub fn filter(&self) -> Option<&ItemFilter> {
        self.filter.as_ref()
    }

    /// Items passing the current filter, or all items when none is set.
    pub fn get_filtered_items(&self) -> Vec<Item> {
        let items = self.repository.get_all_items();
        match &self.filter {
            Some(filter) => items
                .iter()
                .filter(|item| filter.matches(item))
                .cloned()
                .collect(),
            None => items.to_vec(),
        }
    }

    pub fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut ItemRepository {
        &mut self.repository
    }
}
