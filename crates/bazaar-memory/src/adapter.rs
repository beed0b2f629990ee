// In-memory document store: `HashMap<model, Vec<Value>>` behind a
// `tokio::sync::RwLock`. Updates merge fields into the stored object, so
// partial updates behave like the MongoDB adapter's `$set`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use bazaar_core::db::adapter::{
    Adapter, AdapterResult, Connector, FindManyQuery, Operator, SortDirection, WhereClause,
};
use bazaar_core::error::CommerceError;

type Store = HashMap<String, Vec<serde_json::Value>>;

/// In-memory adapter. Data lives as long as the adapter; clones share it.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    store: Arc<RwLock<Store>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record count for one model (test helper).
    pub async fn model_count(&self, model: &str) -> usize {
        self.store
            .read()
            .await
            .get(model)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    /// Drop all data.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }
}

/// Check a record against a clause list, honoring OR connectors.
fn matches_where(record: &serde_json::Value, clauses: &[WhereClause]) -> bool {
    if clauses.is_empty() {
        return true;
    }

    let mut result = true;
    let mut pending_or = false;

    for clause in clauses {
        let field_val = lookup_field(record, &clause.field);
        let clause_match = match_operator(&field_val, &clause.value, &clause.operator);

        if pending_or {
            result = result || clause_match;
        } else {
            result = result && clause_match;
        }

        pending_or = matches!(clause.connector, Some(Connector::Or));
    }

    result
}

/// Resolve a possibly dotted field path ("orderItems.product"), matching
/// MongoDB's embedded-document addressing.
fn lookup_field(record: &serde_json::Value, field: &str) -> serde_json::Value {
    let mut current = record;
    for segment in field.split('.') {
        match current.get(segment) {
            Some(v) => current = v,
            None => return serde_json::Value::Null,
        }
    }
    current.clone()
}

fn match_operator(
    field_val: &serde_json::Value,
    target: &serde_json::Value,
    op: &Operator,
) -> bool {
    match op {
        Operator::Eq => field_val == target,
        Operator::Ne => field_val != target,
        Operator::Lt => compare_json(field_val, target).is_some_and(|c| c < 0),
        Operator::Lte => compare_json(field_val, target).is_some_and(|c| c <= 0),
        Operator::Gt => compare_json(field_val, target).is_some_and(|c| c > 0),
        Operator::Gte => compare_json(field_val, target).is_some_and(|c| c >= 0),
        Operator::In => {
            if let serde_json::Value::Array(arr) = target {
                arr.contains(field_val)
            } else {
                false
            }
        }
    }
}

/// Numeric or lexicographic comparison; `None` for incomparable types.
fn compare_json(a: &serde_json::Value, b: &serde_json::Value) -> Option<i8> {
    let ord = match (a, b) {
        (serde_json::Value::Number(an), serde_json::Value::Number(bn)) => {
            an.as_f64()?.partial_cmp(&bn.as_f64()?)?
        }
        (serde_json::Value::String(a_s), serde_json::Value::String(b_s)) => a_s.cmp(b_s),
        _ => return None,
    };
    Some(match ord {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    })
}

/// Merge `data`'s fields into `record` (object-level, like `$set`).
fn merge_into(record: &mut serde_json::Value, data: &serde_json::Value) {
    if let (Some(obj), Some(patch)) = (record.as_object_mut(), data.as_object()) {
        for (k, v) in patch {
            obj.insert(k.clone(), v.clone());
        }
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn create(
        &self,
        model: &str,
        data: serde_json::Value,
    ) -> AdapterResult<serde_json::Value> {
        if !data.is_object() {
            return Err(CommerceError::Store(
                "Records must be JSON objects".to_string(),
            ));
        }
        let mut store = self.store.write().await;
        store.entry(model.to_string()).or_default().push(data.clone());
        Ok(data)
    }

    async fn find_one(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
    ) -> AdapterResult<Option<serde_json::Value>> {
        let store = self.store.read().await;
        Ok(store
            .get(model)
            .and_then(|records| records.iter().find(|r| matches_where(r, where_clauses)))
            .cloned())
    }

    async fn find_many(
        &self,
        model: &str,
        query: FindManyQuery,
    ) -> AdapterResult<Vec<serde_json::Value>> {
        let store = self.store.read().await;
        let mut results: Vec<serde_json::Value> = store
            .get(model)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| matches_where(r, &query.where_clauses))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &query.sort_by {
            results.sort_by(|a, b| {
                let av = a.get(&sort.field).cloned().unwrap_or(serde_json::Value::Null);
                let bv = b.get(&sort.field).cloned().unwrap_or(serde_json::Value::Null);
                let ord = compare_json(&av, &bv).unwrap_or(0);
                match sort.direction {
                    SortDirection::Asc => ord.cmp(&0),
                    SortDirection::Desc => 0.cmp(&ord),
                }
            });
        }

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let mut results: Vec<_> = results.into_iter().skip(offset).collect();
        if let Some(limit) = query.limit {
            results.truncate(limit.max(0) as usize);
        }

        Ok(results)
    }

    async fn count(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64> {
        let store = self.store.read().await;
        Ok(store
            .get(model)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| matches_where(r, where_clauses))
                    .count() as i64
            })
            .unwrap_or(0))
    }

    async fn update(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<Option<serde_json::Value>> {
        let mut store = self.store.write().await;
        let records = match store.get_mut(model) {
            Some(r) => r,
            None => return Ok(None),
        };
        for record in records.iter_mut() {
            if matches_where(record, where_clauses) {
                merge_into(record, &data);
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn update_many(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<i64> {
        let mut store = self.store.write().await;
        let records = match store.get_mut(model) {
            Some(r) => r,
            None => return Ok(0),
        };
        let mut updated = 0;
        for record in records.iter_mut() {
            if matches_where(record, where_clauses) {
                merge_into(record, &data);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<()> {
        let mut store = self.store.write().await;
        if let Some(records) = store.get_mut(model) {
            if let Some(pos) = records.iter().position(|r| matches_where(r, where_clauses)) {
                records.remove(pos);
            }
        }
        Ok(())
    }

    async fn delete_many(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
    ) -> AdapterResult<i64> {
        let mut store = self.store.write().await;
        let records = match store.get_mut(model) {
            Some(r) => r,
            None => return Ok(0),
        };
        let before = records.len();
        records.retain(|r| !matches_where(r, where_clauses));
        Ok((before - records.len()) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::db::adapter::SortBy;
    use serde_json::json;

    #[tokio::test]
    async fn create_and_find_one() {
        let db = MemoryAdapter::new();
        db.create("users", json!({"id": "u1", "email": "a@b.com"}))
            .await
            .unwrap();

        let found = db
            .find_one("users", &[WhereClause::eq("email", "a@b.com")])
            .await
            .unwrap();
        assert_eq!(found.unwrap()["id"], "u1");

        let missing = db
            .find_one("users", &[WhereClause::eq("email", "x@y.com")])
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn or_connector_matches_either_field() {
        let db = MemoryAdapter::new();
        db.create("users", json!({"id": "u1", "email": "a@b.com", "phone": "111"}))
            .await
            .unwrap();

        // email OR phone, matching on phone alone
        let found = db
            .find_one(
                "users",
                &[
                    WhereClause::eq("email", "other@b.com").or(),
                    WhereClause::eq("phone", "111"),
                ],
            )
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let db = MemoryAdapter::new();
        db.create("products", json!({"id": "p1", "stock": 5, "name": "Kettle"}))
            .await
            .unwrap();

        let updated = db
            .update("products", &[WhereClause::eq("id", "p1")], json!({"stock": 3}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["stock"], 3);
        assert_eq!(updated["name"], "Kettle");
    }

    #[tokio::test]
    async fn update_many_counts_matches() {
        let db = MemoryAdapter::new();
        for i in 0..3 {
            db.create("orders", json!({"id": format!("o{i}"), "razorpayOrderId": "rzp_1"}))
                .await
                .unwrap();
        }
        db.create("orders", json!({"id": "o9", "razorpayOrderId": "rzp_2"}))
            .await
            .unwrap();

        let n = db
            .update_many(
                "orders",
                &[WhereClause::eq("razorpayOrderId", "rzp_1")],
                json!({"paymentStatus": "Paid"}),
            )
            .await
            .unwrap();
        assert_eq!(n, 3);

        let untouched = db
            .find_one("orders", &[WhereClause::eq("id", "o9")])
            .await
            .unwrap()
            .unwrap();
        assert!(untouched.get("paymentStatus").is_none());
    }

    #[tokio::test]
    async fn find_many_sort_and_limit() {
        let db = MemoryAdapter::new();
        for (id, n) in [("a", 3), ("b", 1), ("c", 2)] {
            db.create("items", json!({"id": id, "n": n})).await.unwrap();
        }

        let query = FindManyQuery {
            sort_by: Some(SortBy {
                field: "n".into(),
                direction: SortDirection::Desc,
            }),
            limit: Some(2),
            ..Default::default()
        };
        let results = db.find_many("items", query).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["id"], "a");
        assert_eq!(results[1]["id"], "c");
    }

    #[tokio::test]
    async fn numeric_comparisons() {
        let db = MemoryAdapter::new();
        db.create("products", json!({"id": "p1", "stock": 2})).await.unwrap();
        db.create("products", json!({"id": "p2", "stock": 10})).await.unwrap();

        let low = db
            .find_many(
                "products",
                FindManyQuery::filtered(vec![WhereClause::lt("stock", 5)]),
            )
            .await
            .unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0]["id"], "p1");
    }

    #[tokio::test]
    async fn dotted_paths_reach_embedded_documents() {
        let db = MemoryAdapter::new();
        db.create(
            "orders",
            json!({"id": "o1", "orderItems": {"product": "p1", "quantity": 2}}),
        )
        .await
        .unwrap();

        let found = db
            .find_one("orders", &[WhereClause::eq("orderItems.product", "p1")])
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = db
            .find_one("orders", &[WhereClause::eq("orderItems.product", "p2")])
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_many_retains_non_matching() {
        let db = MemoryAdapter::new();
        db.create("orders", json!({"id": "o1", "group": "g1"})).await.unwrap();
        db.create("orders", json!({"id": "o2", "group": "g1"})).await.unwrap();
        db.create("orders", json!({"id": "o3", "group": "g2"})).await.unwrap();

        let n = db
            .delete_many("orders", &[WhereClause::eq("group", "g1")])
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(db.model_count("orders").await, 1);
    }
}
