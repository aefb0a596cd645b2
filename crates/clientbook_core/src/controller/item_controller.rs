//! Item screen controller.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{FilteredItemRepository, ItemFilter};
use crate::repo::RepoError;
use log::{error, info};

const MSG_INVALID_FORM: &str = "enter valid data";
const MSG_SELECT_TO_EDIT: &str = "select a record to edit";
const MSG_SELECT_TO_DELETE: &str = "select a record to delete";
const MSG_NOT_FOUND: &str = "item not found";
const MSG_INVALID_NUMBER: &str = "enter a valid number";

/// Presentation surface for the item table.
pub trait ItemView {
    fn render_items(&mut self, items: &[Item]);
    fn warn(&mut self, message: &str);
}

/// Raw text typed into the item form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub id: String,
    pub name: String,
    pub price: String,
}

impl ItemForm {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
        }
    }

    /// Prefills the form from an existing item.
    pub fn from_item(item: &Item) -> Self {
        Self::new(
            item.id.to_string(),
            item.name.clone(),
            item.price.to_string(),
        )
    }

    fn parse(&self) -> Result<Item, String> {
        let id = self.id.trim().parse::<ItemId>().map_err(|_| {
            format!(
                "{MSG_INVALID_FORM}: id `{}` is not an integer",
                self.id.trim()
            )
        })?;
        let price = self.price.trim().parse::<f64>().map_err(|_| {
            format!(
                "{MSG_INVALID_FORM}: price `{}` is not a number",
                self.price.trim()
            )
        })?;
        Item::new(id, self.name.trim(), price)
            .map_err(|err| format!("{MSG_INVALID_FORM}: {err}"))
    }
}

/// Drives an `ItemView` from a filtered item store.
pub struct ItemController<V: ItemView> {
    view: V,
    repo: FilteredItemRepository,
}

impl<V: ItemView> ItemController<V> {
    /// Creates the controller and renders the initial table.
    pub fn new(view: V, repo: FilteredItemRepository) -> Self {
        let mut controller = Self { view, repo };
        controller.refresh();
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn repository(&self) -> &FilteredItemRepository {
        &self.repo
    }

    pub fn refresh(&mut self) {
        let items = self.repo.get_filtered_items();
        self.view.render_items(&items);
    }

    pub fn add_item(&mut self, form: &ItemForm) -> bool {
        let item = match form.parse() {
            Ok(item) => item,
            Err(message) => {
                self.view.warn(&message);
                return false;
            }
        };
        let result = self.repo.repository_mut().add_item(item);
        self.finish("add", result.map(|()| true))
    }

    pub fn edit_item(&mut self, selected: Option<ItemId>, form: &ItemForm) -> bool {
        let Some(id) = selected else {
            self.view.warn(MSG_SELECT_TO_EDIT);
            return false;
        };
        let item = match form.parse() {
            Ok(item) => item,
            Err(message) => {
                self.view.warn(&message);
                return false;
            }
        };
        let result = self.repo.repository_mut().update_item(id, item);
        self.finish("edit", result)
    }

    pub fn delete_item(&mut self, selected: Option<ItemId>) -> bool {
        let Some(id) = selected else {
            self.view.warn(MSG_SELECT_TO_DELETE);
            return false;
        };
        let result = self.repo.repository_mut().delete_item(id);
        self.finish("delete", result)
    }

    /// Shows only items priced at or above the number typed in `text`.
    pub fn apply_filter(&mut self, text: &str) -> bool {
        match text.trim().parse::<f64>() {
            Ok(min_price) if min_price.is_finite() => {
                self.repo.set_filter(ItemFilter::MinPrice(min_price));
                info!("event=item_filter module=controller status=ok kind=min_price");
                self.refresh();
                true
            }
            _ => {
                self.view.warn(MSG_INVALID_NUMBER);
                false
            }
        }
    }

    pub fn reset_filter(&mut self) {
        self.repo.clear_filter();
        self.refresh();
    }

    fn finish(&mut self, action: &'static str, result: Result<bool, RepoError>) -> bool {
        match result {
            Ok(true) => {
                self.refresh();
                true
            }
            Ok(false) => {
                self.view.warn(MSG_NOT_FOUND);
                false
            }
            Err(err) => {
                error!("event=item_{action} module=controller status=error error={err}");
                self.view.warn(&err.to_string());
                false
            }
        }
    }
}
