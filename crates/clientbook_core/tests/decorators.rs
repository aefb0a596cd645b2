use clientbook_core::db::open_db_in_memory;
use clientbook_core::{
    ClientField, ClientFilter, ClientListQuery, ClientRepository, ClientSort, FilteredRepository,
    JsonClientRepository, NewClient, SortedRepository, SqliteClientRepository,
};

const PEOPLE: &[(&str, &str)] = &[
    ("Sidorov", "Sergey"),
    ("Ivanov", "Ivan"),
    ("Petrov", "Petr"),
    ("Nikolaev", "Nikolay"),
    ("Ivanova", "Anna"),
];

fn seed(repo: &mut dyn ClientRepository) {
    for (last_name, first_name) in PEOPLE {
        repo.add(&NewClient::new(
            *last_name,
            *first_name,
            "Ivanovich",
            "123 Main St",
            "+12345678901",
        ))
        .unwrap();
    }
}

fn last_names(repo: &impl ClientRepository, k: u32, n: u32) -> Vec<String> {
    repo.get_k_n_short_list(k, n)
        .unwrap()
        .into_iter()
        .map(|short| short.last_name)
        .collect()
}

fn assert_decorated_behaviour(base: &mut dyn ClientRepository) {
    seed(base);

    let filtered = FilteredRepository::new(
        &mut *base,
        ClientFilter::contains(ClientField::LastName, "ov"),
    );
    let mut decorated =
        SortedRepository::new(filtered, ClientSort::ascending(ClientField::LastName));

    assert_eq!(last_names(&decorated, 1, 2), vec!["Ivanov", "Ivanova"]);
    assert_eq!(last_names(&decorated, 2, 2), vec!["Petrov", "Sidorov"]);
    assert_eq!(decorated.get_count().unwrap(), 4);

    // Mutations pass through and show up in decorated listings.
    let id = decorated
        .add(&NewClient::new(
            "Abramov",
            "Oleg",
            "Olegovich",
            "1 Side St",
            "+12345678909",
        ))
        .unwrap();
    assert_eq!(id, 6);
    assert_eq!(last_names(&decorated, 1, 1), vec!["Abramov"]);
    assert!(decorated.get_by_id(4).unwrap().is_some());
    assert_eq!(decorated.get_count().unwrap(), 5);
    assert_eq!(decorated.inner().inner().get_count().unwrap(), 6);
}

#[test]
fn decorators_over_json_repository() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonClientRepository::open(dir.path().join("clients.json")).unwrap();
    assert_decorated_behaviour(&mut repo);
}

#[test]
fn decorators_over_sqlite_repository() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::new(&conn);
    assert_decorated_behaviour(&mut repo);
}

#[test]
fn explicit_query_sort_overrides_decorator_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonClientRepository::open(dir.path().join("clients.json")).unwrap();
    seed(&mut repo);

    let sorted = SortedRepository::new(&mut repo, ClientSort::ascending(ClientField::LastName));
    let query = ClientListQuery::default().with_sort(ClientSort::descending(ClientField::Id));
    let ids: Vec<i64> = sorted.list(&query).unwrap().iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);
}

#[test]
fn stacked_filters_all_apply() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::new(&conn);
    seed(&mut repo);

    let by_suffix = FilteredRepository::new(
        &mut repo,
        ClientFilter::contains(ClientField::LastName, "ov"),
    );
    let by_prefix = FilteredRepository::new(
        by_suffix,
        ClientFilter::starts_with(ClientField::LastName, "Iv"),
    );
    assert_eq!(by_prefix.get_count().unwrap(), 2);
    assert_eq!(
        by_prefix
            .count(&[ClientFilter::equals(ClientField::FirstName, "Anna")])
            .unwrap(),
        1
    );
}

#[test]
fn decorators_wrap_boxed_trait_objects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.json");
    let mut boxed: Box<dyn ClientRepository> = Box::new(JsonClientRepository::open(&path).unwrap());
    seed(boxed.as_mut());

    let filtered = FilteredRepository::new(
        boxed,
        ClientFilter::equals(ClientField::FirstName, "Petr"),
    );
    assert_eq!(last_names(&filtered, 1, 10), vec!["Petrov"]);
}
