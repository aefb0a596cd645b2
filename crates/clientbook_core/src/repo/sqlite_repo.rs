//! SQLite-backed client repository.
//!
//! # Responsibility
//! - Provide `ClientRepository` over the `clients` table.
//! - Push filters, sorting and paging down into SQL.
//!
//! # Invariants
//! - Column names in generated SQL come only from `ClientField`; user text is
//!   always bound as a parameter.
//! - Results agree with the in-memory evaluator in `repo::query`.
//! - Rows failing validation are reported, never returned.

use crate::model::client::{Client, ClientField, ClientId, NewClient};
use crate::repo::query::{ClientFilter, ClientListQuery, FilterOp};
use crate::repo::{ClientRepository, RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CLIENT_SELECT_SQL: &str = "SELECT
    client_id,
    last_name,
    first_name,
    middle_name,
    address,
    phone
FROM clients";

/// SQLite-backed client repository borrowing a migrated connection.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE client_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(row)?));
        }
        Ok(None)
    }

    fn list(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        let mut sql = format!("{CLIENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_filters(&mut sql, &mut bind_values, &query.filters);

        match query.sort {
            Some(sort) if sort.field == ClientField::Id => {
                sql.push_str(&format!(" ORDER BY client_id {}", sort.order.as_sql()));
            }
            Some(sort) => {
                sql.push_str(&format!(
                    " ORDER BY {} {}, client_id ASC",
                    sort.field.as_str(),
                    sort.order.as_sql()
                ));
            }
            None => sql.push_str(" ORDER BY client_id ASC"),
        }

        if let Some(page) = query.page {
            sql.push_str(" LIMIT ? OFFSET ?");
            bind_values.push(Value::Integer(i64::from(page.n())));
            bind_values.push(Value::Integer(
                i64::try_from(page.offset()).unwrap_or(i64::MAX),
            ));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }
        Ok(clients)
    }

    fn count(&self, filters: &[ClientFilter]) -> RepoResult<usize> {
        let mut sql = String::from("SELECT COUNT(*) FROM clients WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_filters(&mut sql, &mut bind_values, filters);

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative client count {count}")))
    }

    fn add(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        client.validate()?;

        let max_id: Option<ClientId> = self
            .conn
            .query_row("SELECT MAX(client_id) FROM clients;", [], |row| row.get(0))?;
        let id = max_id
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(RepoError::IdExhausted)?;

        self.conn.execute(
            "INSERT INTO clients (
                client_id,
                last_name,
                first_name,
                middle_name,
                address,
                phone
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id,
                client.last_name,
                client.first_name,
                client.middle_name,
                client.address,
                client.phone,
            ],
        )?;

        info!("event=client_add module=repo status=ok backend=sqlite id={id}");
        Ok(id)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &NewClient) -> RepoResult<bool> {
        client.validate()?;

        let changed = self.conn.execute(
            "UPDATE clients
             SET
                last_name = ?1,
                first_name = ?2,
                middle_name = ?3,
                address = ?4,
                phone = ?5
             WHERE client_id = ?6;",
            params![
                client.last_name,
                client.first_name,
                client.middle_name,
                client.address,
                client.phone,
                id,
            ],
        )?;

        if changed > 0 {
            info!("event=client_replace module=repo status=ok backend=sqlite id={id}");
        }
        Ok(changed > 0)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE client_id = ?1;", [id])?;

        if changed > 0 {
            info!("event=client_delete module=repo status=ok backend=sqlite id={id}");
        }
        Ok(changed > 0)
    }
}

fn push_filters(sql: &mut String, bind_values: &mut Vec<Value>, filters: &[ClientFilter]) {
    for filter in filters {
        let column = filter_column(filter.field);
        match filter.op {
            FilterOp::Equals => sql.push_str(&format!(" AND {column} = ?")),
            FilterOp::Contains => sql.push_str(&format!(" AND instr({column}, ?) > 0")),
            FilterOp::StartsWith => sql.push_str(&format!(" AND instr({column}, ?) = 1")),
        }
        bind_values.push(Value::Text(filter.value.clone()));
    }
}

// Filters compare text, so the integer id is matched on its decimal form.
fn filter_column(field: ClientField) -> &'static str {
    match field {
        ClientField::Id => "CAST(client_id AS TEXT)",
        other => other.as_str(),
    }
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let id: ClientId = row.get("client_id")?;
    let data = NewClient {
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
    };
    Client::new(id, data)
        .map_err(|err| RepoError::InvalidData(format!("clients row {id}: {err}")))
}
