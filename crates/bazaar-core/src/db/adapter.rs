// Document-store abstraction. Concrete backends (MongoDB, in-memory)
// implement `Adapter`; the service layer only ever talks to this trait.
//
// Records travel as `serde_json::Value` objects with a string `id`;
// backends are responsible for mapping `id` onto their native key.

use async_trait::async_trait;

use crate::error::CommerceError;

pub type AdapterResult<T> = std::result::Result<T, CommerceError>;

/// Comparison operators supported by `WhereClause`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

/// How a clause connects to the one following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

/// A single filter condition on a field.
#[derive(Debug, Clone)]
pub struct WhereClause {
    pub field: String,
    pub operator: Operator,
    pub value: serde_json::Value,
    /// Connector to the *next* clause; `None` means And.
    pub connector: Option<Connector>,
}

impl WhereClause {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            connector: None,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, Operator::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, Operator::Gte, value)
    }

    pub fn is_in(field: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        Self::new(field, Operator::In, serde_json::Value::Array(values))
    }

    /// Connect this clause to the next one with OR.
    pub fn or(mut self) -> Self {
        self.connector = Some(Connector::Or);
        self
    }
}

/// Sort direction for `find_many`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct SortBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Query parameters for `find_many`.
#[derive(Debug, Clone, Default)]
pub struct FindManyQuery {
    pub where_clauses: Vec<WhereClause>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: Option<SortBy>,
}

impl FindManyQuery {
    pub fn filtered(where_clauses: Vec<WhereClause>) -> Self {
        Self {
            where_clauses,
            ..Default::default()
        }
    }
}

/// Backend-agnostic document store operations.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Insert a record and return it as stored.
    async fn create(&self, model: &str, data: serde_json::Value)
        -> AdapterResult<serde_json::Value>;

    async fn find_one(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
    ) -> AdapterResult<Option<serde_json::Value>>;

    async fn find_many(
        &self,
        model: &str,
        query: FindManyQuery,
    ) -> AdapterResult<Vec<serde_json::Value>>;

    async fn count(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64>;

    /// Merge `data` into the first matching record; returns the updated
    /// record, or `None` when nothing matched.
    async fn update(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<Option<serde_json::Value>>;

    /// Merge `data` into every matching record; returns how many matched.
    async fn update_many(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<i64>;

    async fn delete(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<()>;

    async fn delete_many(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64>;
}

/// Collection names used across the service.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const ADDRESSES: &str = "addresses";
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Store(format!("Record (de)serialization failed: {e}"))
    }
}
