use clientbook_core::{
    ClientController, ClientForm, ClientRepository, ClientService, ClientShort, ClientView,
    FilteredItemRepository, Item, ItemController, ItemForm, ItemRepository, ItemView,
    JsonClientRepository, NewClient,
};

#[derive(Default)]
struct FakeItemView {
    rendered: Vec<Vec<i64>>,
    warnings: Vec<String>,
}

impl ItemView for FakeItemView {
    fn render_items(&mut self, items: &[Item]) {
        self.rendered.push(items.iter().map(|item| item.id).collect());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[derive(Default)]
struct FakeClientView {
    rendered: Vec<Vec<String>>,
    warnings: Vec<String>,
}

impl ClientView for FakeClientView {
    fn render_clients(&mut self, clients: &[ClientShort]) {
        self.rendered
            .push(clients.iter().map(|c| c.last_name.clone()).collect());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

fn item_controller(dir: &tempfile::TempDir) -> ItemController<FakeItemView> {
    let repo = ItemRepository::open(dir.path().join("items.json")).unwrap();
    ItemController::new(FakeItemView::default(), FilteredItemRepository::new(repo))
}

#[test]
fn item_controller_renders_on_start_and_after_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = item_controller(&dir);
    assert_eq!(controller.view().rendered, vec![Vec::<i64>::new()]);

    assert!(controller.add_item(&ItemForm::new("1", "pen", "1.5")));
    assert!(controller.add_item(&ItemForm::new(" 2 ", " book ", "12")));
    assert!(controller.edit_item(Some(1), &ItemForm::new("1", "red pen", "2")));
    assert!(controller.delete_item(Some(2)));

    assert_eq!(
        controller.view().rendered,
        vec![vec![], vec![1], vec![1, 2], vec![1, 2], vec![1]]
    );
    let stored = controller.repository().repository().get(1).unwrap();
    assert_eq!(stored.name, "red pen");
    assert!(controller.view().warnings.is_empty());
}

#[test]
fn item_form_prefilled_from_stored_item_edits_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = item_controller(&dir);
    assert!(controller.add_item(&ItemForm::new("7", "pen", "1.5")));

    let stored = controller.repository().repository().get(7).unwrap();
    let mut form = ItemForm::from_item(stored);
    assert_eq!(form, ItemForm::new("7", "pen", "1.5"));

    form.name = "blue pen".to_string();
    assert!(controller.edit_item(Some(7), &form));

    let items = controller.repository().repository().get_all_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "blue pen");
    assert_eq!(items[0].price, 1.5);
}

#[test]
fn item_controller_warns_on_bad_input_and_missing_selection() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = item_controller(&dir);

    assert!(!controller.add_item(&ItemForm::new("x", "pen", "1")));
    assert!(!controller.add_item(&ItemForm::new("1", "pen", "cheap")));
    assert!(!controller.add_item(&ItemForm::new("1", "  ", "1")));
    assert!(!controller.edit_item(None, &ItemForm::new("1", "pen", "1")));
    assert!(!controller.delete_item(None));
    assert!(!controller.delete_item(Some(5)));

    let warnings = &controller.view().warnings;
    assert_eq!(warnings.len(), 6);
    assert!(warnings[0].starts_with("enter valid data"));
    assert_eq!(warnings[3], "select a record to edit");
    assert_eq!(warnings[4], "select a record to delete");
    assert_eq!(warnings[5], "item not found");
    assert!(controller.repository().repository().get_all_items().is_empty());
}

#[test]
fn item_controller_filters_by_minimum_price() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = item_controller(&dir);
    controller.add_item(&ItemForm::new("1", "pen", "1"));
    controller.add_item(&ItemForm::new("2", "book", "12"));

    assert!(controller.apply_filter("10"));
    assert_eq!(controller.view().rendered.last().unwrap(), &vec![2]);

    // Additions are stored even when hidden by the filter.
    controller.add_item(&ItemForm::new("3", "clip", "0.1"));
    assert_eq!(controller.view().rendered.last().unwrap(), &vec![2]);

    assert!(!controller.apply_filter("ten"));
    assert_eq!(controller.view().warnings, vec!["enter a valid number"]);

    controller.reset_filter();
    assert_eq!(controller.view().rendered.last().unwrap(), &vec![1, 2, 3]);
}

#[test]
fn client_controller_adds_and_deletes_through_service() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonClientRepository::open(dir.path().join("clients.json")).unwrap();
    let mut controller = ClientController::new(FakeClientView::default(), ClientService::new(repo));

    let form = ClientForm {
        last_name: " Ivanov ".to_string(),
        first_name: "Ivan".to_string(),
        middle_name: "Ivanovich".to_string(),
        address: "123 Main St".to_string(),
        phone: "+12345678901".to_string(),
    };
    let id = controller.add_client(&form).unwrap();
    assert_eq!(id, 1);

    let bad = ClientForm {
        phone: "555".to_string(),
        ..form.clone()
    };
    assert!(controller.add_client(&bad).is_none());
    assert!(!controller.delete_client(None));
    assert!(controller.delete_client(Some(id)));

    let view = controller.view();
    assert_eq!(
        view.rendered,
        vec![vec![], vec!["Ivanov".to_string()], vec![]]
    );
    assert_eq!(view.warnings.len(), 2);
    assert!(view.warnings[0].contains("phone"));
    assert_eq!(controller.service().count(&[]).unwrap(), 0);
}

#[test]
fn client_controller_replaces_selected_client() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonClientRepository::open(dir.path().join("clients.json")).unwrap();
    let mut controller = ClientController::new(FakeClientView::default(), ClientService::new(repo));

    let form = ClientForm {
        last_name: "Ivanov".to_string(),
        first_name: "Ivan".to_string(),
        middle_name: "Ivanovich".to_string(),
        address: "123 Main St".to_string(),
        phone: "+12345678901".to_string(),
    };
    let id = controller.add_client(&form).unwrap();

    let renamed = ClientForm {
        last_name: "Petrov".to_string(),
        ..form
    };
    assert!(controller.replace_client(Some(id), &renamed));
    assert!(!controller.replace_client(Some(99), &renamed));
    assert_eq!(
        controller.view().rendered.last().unwrap(),
        &vec!["Petrov".to_string()]
    );
    assert_eq!(controller.view().warnings, vec!["client not found"]);
}

#[test]
fn client_service_hands_back_its_repository() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.json");
    let mut service = ClientService::new(JsonClientRepository::open(&path).unwrap());

    let client = NewClient::new(
        "Ivanov",
        "Ivan",
        "Ivanovich",
        "123 Main St",
        "+12345678901",
    );
    let id = service.create_client(&client).unwrap();

    let repo = service.into_repository();
    assert_eq!(repo.get_count().unwrap(), 1);
    assert_eq!(repo.get_by_id(id).unwrap().unwrap().last_name(), "Ivanov");
    assert_eq!(repo.path(), path.as_path());
}
