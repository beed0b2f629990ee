pub mod adapter;
pub mod models;

pub use adapter::{Adapter, AdapterResult, FindManyQuery, Operator, SortBy, SortDirection, WhereClause};
