//! Command-line front end for the client book.
//!
//! # Responsibility
//! - Parse arguments, merge them over the YAML config and pick a backend.
//! - Print results; all validation and storage rules live in `clientbook_core`.

use clap::{Args, Parser, Subcommand};
use clientbook_core::db::{shared_connection, DbError};
use clientbook_core::{
    default_log_level, init_logging, AppConfig, Client, ClientFilter, ClientId, ClientListQuery,
    ClientRepository, ClientSort, FilteredItemRepository, FilteredRepository, Item, ItemController,
    ItemForm, ItemId, ItemObserver, ItemRepository, ItemView, JsonClientRepository, NewClient,
    PageRequest, SortedRepository, SqliteClientRepository, StorageBackend, YamlClientRepository,
};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Client and item book.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true, env = "CLIENTBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Client storage: json, yaml or sqlite
    #[arg(long, global = true)]
    backend: Option<StorageBackend>,

    /// Client storage path
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Item storage path
    #[arg(long, global = true)]
    items: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core health and version
    Ping,
    /// Manage clients
    #[command(subcommand)]
    Clients(ClientCommand),
    /// Manage items
    #[command(subcommand)]
    Items(ItemCommand),
}

#[derive(Subcommand, Debug)]
enum ClientCommand {
    #[command(flatten)]
    Record(RecordCommand),
    /// Reorder a JSON or YAML file in place
    Sort { sort: ClientSort },
}

/// Operations every client backend supports.
#[derive(Subcommand, Debug)]
enum RecordCommand {
    /// Show one client
    Get { id: ClientId },
    /// List every client
    List {
        /// field=value, field~value (contains) or field^value (prefix)
        #[arg(long = "filter")]
        filters: Vec<ClientFilter>,
        /// field[:asc|desc]
        #[arg(long)]
        sort: Option<ClientSort>,
        /// Print full records instead of short rows
        #[arg(long)]
        full: bool,
    },
    /// Show page `k` of size `n`
    Page {
        k: u32,
        n: u32,
        #[arg(long = "filter")]
        filters: Vec<ClientFilter>,
        #[arg(long)]
        sort: Option<ClientSort>,
        #[arg(long)]
        full: bool,
    },
    /// Count clients
    Count {
        #[arg(long = "filter")]
        filters: Vec<ClientFilter>,
    },
    /// Add a client and print its id
    Add(ClientFields),
    /// Replace the client stored under `id`
    Replace {
        id: ClientId,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Delete a client
    Delete { id: ClientId },
}

#[derive(Args, Debug)]
struct ClientFields {
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    middle_name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    phone: String,
}

impl ClientFields {
    fn to_new_client(&self) -> NewClient {
        NewClient::new(
            self.last_name.trim(),
            self.first_name.trim(),
            self.middle_name.trim(),
            self.address.trim(),
            self.phone.trim(),
        )
    }
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    /// List items, optionally from a minimum price
    List {
        #[arg(long)]
        min_price: Option<String>,
    },
    /// Add an item; the id must be free
    Add {
        id: String,
        name: String,
        price: String,
    },
    /// Replace the item `selected`; the new id may differ
    Edit {
        selected: ItemId,
        id: String,
        name: String,
        price: String,
    },
    /// Delete an item
    Delete { id: ItemId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<bool> {
    let config = load_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    match cli.command {
        Command::Ping => {
            println!("clientbook_core ping={}", clientbook_core::ping());
            println!(
                "clientbook_core version={}",
                clientbook_core::core_version()
            );
            Ok(true)
        }
        Command::Clients(command) => run_clients(&config, command),
        Command::Items(command) => run_items(&config, command),
    }
}

fn load_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(path) = &cli.data {
        config.clients_path = Some(path.clone());
    }
    if let Some(path) = &cli.items {
        config.items_path = Some(path.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = Some(level.clone());
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run_clients(config: &AppConfig, command: ClientCommand) -> CliResult<bool> {
    let path = config.resolved_clients_path();

    let command = match command {
        ClientCommand::Sort { sort } => return sort_file(config.backend, &path, sort),
        ClientCommand::Record(command) => command,
    };

    match config.backend {
        StorageBackend::Json => {
            run_record_command(&mut JsonClientRepository::open(&path)?, command)
        }
        StorageBackend::Yaml => {
            run_record_command(&mut YamlClientRepository::open(&path)?, command)
        }
        StorageBackend::Sqlite => {
            let conn = shared_connection(&path)?
                .lock()
                .map_err(|_| DbError::SharedLockPoisoned)?;
            let mut repo = SqliteClientRepository::new(&conn);
            run_record_command(&mut repo, command)
        }
    }
}

fn sort_file(backend: StorageBackend, path: &Path, sort: ClientSort) -> CliResult<bool> {
    match backend {
        StorageBackend::Json => JsonClientRepository::open(path)?.sort_by(sort)?,
        StorageBackend::Yaml => YamlClientRepository::open(path)?.sort_by(sort)?,
        StorageBackend::Sqlite => {
            eprintln!("sort rewrites file storage; sqlite listings take --sort instead");
            return Ok(false);
        }
    }
    println!("sorted by {}", sort.field);
    Ok(true)
}

/// Stacks the filter and sort decorators requested on the command line.
fn decorate<'a>(
    repo: &'a mut dyn ClientRepository,
    filters: Vec<ClientFilter>,
    sort: Option<ClientSort>,
) -> Box<dyn ClientRepository + 'a> {
    let mut view: Box<dyn ClientRepository + 'a> = Box::new(repo);
    if !filters.is_empty() {
        view = Box::new(FilteredRepository::with_filters(view, filters));
    }
    if let Some(sort) = sort {
        view = Box::new(SortedRepository::new(view, sort));
    }
    view
}

fn print_clients(clients: &[Client], full: bool) {
    for client in clients {
        if full {
            println!("{client}");
        } else {
            println!("{}", client.short());
        }
    }
}

fn run_record_command(repo: &mut dyn ClientRepository, command: RecordCommand) -> CliResult<bool> {
    match command {
        RecordCommand::Get { id } => match repo.get_by_id(id)? {
            Some(client) => {
                println!("{client}");
                Ok(true)
            }
            None => {
                eprintln!("client {id} not found");
                Ok(false)
            }
        },
        RecordCommand::List {
            filters,
            sort,
            full,
        } => {
            let view = decorate(repo, filters, sort);
            print_clients(&view.list(&ClientListQuery::default())?, full);
            Ok(true)
        }
        RecordCommand::Page {
            k,
            n,
            filters,
            sort,
            full,
        } => {
            let view = decorate(repo, filters, sort);
            let query = ClientListQuery::default().with_page(PageRequest::new(k, n)?);
            print_clients(&view.list(&query)?, full);
            Ok(true)
        }
        RecordCommand::Count { filters } => {
            println!("{}", repo.count(&filters)?);
            Ok(true)
        }
        RecordCommand::Add(fields) => {
            let id = repo.add(&fields.to_new_client())?;
            println!("{id}");
            Ok(true)
        }
        RecordCommand::Replace { id, fields } => {
            let found = repo.replace_by_id(id, &fields.to_new_client())?;
            report_found("client", id, found)
        }
        RecordCommand::Delete { id } => {
            let found = repo.delete_by_id(id)?;
            report_found("client", id, found)
        }
    }
}

fn report_found(kind: &str, id: i64, found: bool) -> CliResult<bool> {
    if found {
        println!("ok");
    } else {
        eprintln!("{kind} {id} not found");
    }
    Ok(found)
}

/// Keeps the latest table and prints warnings as they arrive.
#[derive(Default)]
struct TerminalItemView {
    items: Vec<Item>,
}

impl ItemView for TerminalItemView {
    fn render_items(&mut self, items: &[Item]) {
        self.items = items.to_vec();
    }

    fn warn(&mut self, message: &str) {
        eprintln!("warning: {message}");
    }
}

struct ItemChangeLogger;

impl ItemObserver for ItemChangeLogger {
    fn items_changed(&self, items: &[Item]) {
        info!(
            "event=items_changed module=cli status=ok count={}",
            items.len()
        );
    }
}

fn run_items(config: &AppConfig, command: ItemCommand) -> CliResult<bool> {
    let mut repo = ItemRepository::open(config.resolved_items_path())?;
    repo.add_observer(Rc::new(ItemChangeLogger));
    let mut controller = ItemController::new(
        TerminalItemView::default(),
        FilteredItemRepository::new(repo),
    );

    let ok = match command {
        ItemCommand::List { min_price } => match min_price {
            Some(text) => controller.apply_filter(&text),
            None => true,
        },
        ItemCommand::Add { id, name, price } => {
            controller.add_item(&ItemForm::new(id, name, price))
        }
        ItemCommand::Edit {
            selected,
            id,
            name,
            price,
        } => controller.edit_item(Some(selected), &ItemForm::new(id, name, price)),
        ItemCommand::Delete { id } => controller.delete_item(Some(id)),
    };

    for item in &controller.view().items {
        println!("{item}");
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::{load_config, Cli, ClientCommand, Command, RecordCommand};
    use clap::{CommandFactory, Parser};
    use clientbook_core::{ClientField, SortOrder, StorageBackend};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn page_parses_filters_and_sort() {
        let cli = Cli::try_parse_from([
            "clientbook",
            "--backend",
            "yml",
            "clients",
            "page",
            "2",
            "5",
            "--filter",
            "last_name~ov",
            "--filter",
            "phone^+7",
            "--sort",
            "first_name:desc",
        ])
        .unwrap();

        assert_eq!(cli.backend, Some(StorageBackend::Yaml));
        let Command::Clients(ClientCommand::Record(RecordCommand::Page {
            k,
            n,
            filters,
            sort,
            full,
        })) = cli.command
        else {
            panic!("expected clients page");
        };
        assert_eq!((k, n, full), (2, 5, false));
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[1].field, ClientField::Phone);
        let sort = sort.unwrap();
        assert_eq!(sort.field, ClientField::FirstName);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn list_takes_no_page_arguments() {
        let cli = Cli::try_parse_from(["clientbook", "clients", "list", "--full"]).unwrap();
        let Command::Clients(ClientCommand::Record(RecordCommand::List {
            filters,
            sort,
            full,
        })) = cli.command
        else {
            panic!("expected clients list");
        };
        assert!(filters.is_empty());
        assert!(sort.is_none());
        assert!(full);

        let paged = Cli::try_parse_from(["clientbook", "clients", "list", "1", "10"]);
        assert!(paged.is_err());
    }

    #[test]
    fn sort_is_its_own_client_command() {
        let cli = Cli::try_parse_from(["clientbook", "clients", "sort", "phone:desc"]).unwrap();
        let Command::Clients(ClientCommand::Sort { sort }) = cli.command else {
            panic!("expected clients sort");
        };
        assert_eq!(sort.field, ClientField::Phone);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::try_parse_from([
            "clientbook",
            "--backend",
            "sqlite",
            "--items",
            "data/items.json",
            "ping",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(
            config.resolved_clients_path(),
            PathBuf::from("clients.sqlite3")
        );
        assert_eq!(
            config.resolved_items_path(),
            PathBuf::from("data/items.json")
        );
    }

    #[test]
    fn malformed_filter_is_a_usage_error() {
        let parsed =
            Cli::try_parse_from(["clientbook", "clients", "count", "--filter", "nonsense"]);
        assert!(parsed.is_err());
    }
}
