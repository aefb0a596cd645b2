//! Listing query model: filters, sort keys and pages.
//!
//! The in-memory evaluator here is the reference semantics; the SQLite
//! backend renders the same query into SQL and must agree with it.

use crate::model::client::{Client, ClientField};
use crate::repo::{RepoError, RepoResult};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Case-sensitive text comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    Contains,
    StartsWith,
}

impl FilterOp {
    fn symbol(self) -> char {
        match self {
            Self::Equals => '=',
            Self::Contains => '~',
            Self::StartsWith => '^',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '=' => Some(Self::Equals),
            '~' => Some(Self::Contains),
            '^' => Some(Self::StartsWith),
            _ => None,
        }
    }
}

/// One field predicate. A query matches only when all of its filters match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFilter {
    pub field: ClientField,
    pub op: FilterOp,
    pub value: String,
}

impl ClientFilter {
    pub fn new(field: ClientField, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field,
            op,
            value: value.into(),
        }
    }

    pub fn equals(field: ClientField, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Equals, value)
    }

    pub fn contains(field: ClientField, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Contains, value)
    }

    pub fn starts_with(field: ClientField, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::StartsWith, value)
    }

    pub fn matches(&self, client: &Client) -> bool {
        let text = client.field_text(self.field);
        match self.op {
            FilterOp::Equals => text == self.value.as_str(),
            FilterOp::Contains => text.contains(self.value.as_str()),
            FilterOp::StartsWith => text.starts_with(self.value.as_str()),
        }
    }
}

impl Display for ClientFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.field, self.op.symbol(), self.value)
    }
}

/// Parses `field=value`, `field~value` (contains) or `field^value` (prefix).
impl FromStr for ClientFilter {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (index, op) = text
            .char_indices()
            .find_map(|(index, symbol)| FilterOp::from_symbol(symbol).map(|op| (index, op)))
            .ok_or_else(|| {
                format!("filter `{text}` has no operator; expected field=value, field~value or field^value")
            })?;
        let field = text[..index].parse::<ClientField>()?;
        let value = &text[index + 1..];
        Ok(Self::new(field, op, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort key. Equal keys always fall back to ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSort {
    pub field: ClientField,
    pub order: SortOrder,
}

impl ClientSort {
    pub fn ascending(field: ClientField) -> Self {
        Self {
            field,
            order: SortOrder::Asc,
        }
    }

    pub fn descending(field: ClientField) -> Self {
        Self {
            field,
            order: SortOrder::Desc,
        }
    }

    pub fn compare(&self, left: &Client, right: &Client) -> Ordering {
        let by_field = match self.field {
            ClientField::Id => left.id().cmp(&right.id()),
            field => left.field_text(field).cmp(&right.field_text(field)),
        };
        let by_field = match self.order {
            SortOrder::Asc => by_field,
            SortOrder::Desc => by_field.reverse(),
        };
        by_field.then_with(|| left.id().cmp(&right.id()))
    }
}

/// Parses `field`, `field:asc` or `field:desc`.
impl FromStr for ClientSort {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (field, order) = match text.split_once(':') {
            Some((field, order)) => (field, order),
            None => (text, "asc"),
        };
        let field = field.parse::<ClientField>()?;
        match order.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::ascending(field)),
            "desc" => Ok(Self::descending(field)),
            other => Err(format!("unknown sort order `{other}`; expected asc|desc")),
        }
    }
}

/// Page `k` (1-based) of `n` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    k: u32,
    n: u32,
}

impl PageRequest {
    pub fn new(k: u32, n: u32) -> RepoResult<Self> {
        if k == 0 || n == 0 {
            return Err(RepoError::InvalidPage { k, n });
        }
        Ok(Self { k, n })
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.k - 1) * u64::from(self.n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientListQuery {
    pub filters: Vec<ClientFilter>,
    pub sort: Option<ClientSort>,
    pub page: Option<PageRequest>,
}

impl ClientListQuery {
    pub fn with_filter(mut self, filter: ClientFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: ClientSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }
}

pub(crate) fn matches_all(filters: &[ClientFilter], client: &Client) -> bool {
    filters.iter().all(|filter| filter.matches(client))
}

/// Evaluates a query over records held in storage order.
pub(crate) fn apply_in_memory<'a>(
    clients: impl IntoIterator<Item = &'a Client>,
    query: &ClientListQuery,
) -> Vec<Client> {
    let mut selected: Vec<&Client> = clients
        .into_iter()
        .filter(|client| matches_all(&query.filters, client))
        .collect();

    if let Some(sort) = query.sort {
        selected.sort_by(|left, right| sort.compare(left, right));
    }

    let selected = selected.into_iter();
    match query.page {
        Some(page) => {
            let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            selected
                .skip(offset)
                .take(page.n() as usize)
                .cloned()
                .collect()
        }
        None => selected.cloned().collect(),
    }
}
