// MongoAdapter: the Adapter trait over MongoDB. Models map to collections,
// records to documents, `id` to `_id`.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use bazaar_core::db::adapter::{
    collections, Adapter, AdapterResult, FindManyQuery, WhereClause,
};
use bazaar_core::error::CommerceError;

use crate::query;

/// MongoDB document-store adapter.
#[derive(Debug, Clone)]
pub struct MongoAdapter {
    db: Database,
}

impl MongoAdapter {
    /// Wrap an existing database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect to a MongoDB URI and prepare the indexes the service
    /// queries rely on.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, CommerceError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB connection failed: {e}")))?;
        let adapter = Self {
            db: client.database(db_name),
        };
        adapter.ensure_indexes().await;
        Ok(adapter)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, model: &str) -> Collection<mongodb::bson::Document> {
        self.db.collection(model)
    }

    /// Unique account identifiers plus the lookup keys the order and
    /// address queries hit. Index creation is best-effort.
    async fn ensure_indexes(&self) {
        let unique = mongodb::options::IndexOptions::builder().unique(true).build();
        let sparse_unique = mongodb::options::IndexOptions::builder()
            .unique(true)
            .sparse(true)
            .build();

        let users = self.collection(collections::USERS);
        let _ = users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await;
        let _ = users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "phone": 1 })
                    .options(sparse_unique)
                    .build(),
            )
            .await;

        let orders = self.collection(collections::ORDERS);
        for keys in [
            doc! { "user": 1 },
            doc! { "razorpayOrderId": 1 },
            doc! { "checkoutGroupId": 1 },
        ] {
            let _ = orders
                .create_index(IndexModel::builder().keys(keys).build())
                .await;
        }

        let addresses = self.collection(collections::ADDRESSES);
        let _ = addresses
            .create_index(IndexModel::builder().keys(doc! { "user": 1 }).build())
            .await;

        let products = self.collection(collections::PRODUCTS);
        let _ = products
            .create_index(IndexModel::builder().keys(doc! { "agent": 1 }).build())
            .await;
    }
}

#[async_trait]
impl Adapter for MongoAdapter {
    async fn create(
        &self,
        model: &str,
        data: serde_json::Value,
    ) -> AdapterResult<serde_json::Value> {
        let coll = self.collection(model);
        let doc = query::build_insert_doc(&data);

        coll.insert_one(doc)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB insert failed: {e}")))?;

        // The id was assigned by the caller; echo the record back.
        Ok(data)
    }

    async fn find_one(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
    ) -> AdapterResult<Option<serde_json::Value>> {
        let coll = self.collection(model);
        let filter = query::build_filter(where_clauses);

        let result = coll
            .find_one(filter)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB find_one failed: {e}")))?;

        Ok(result.map(|doc| query::doc_to_json(&doc)))
    }

    async fn find_many(
        &self,
        model: &str,
        q: FindManyQuery,
    ) -> AdapterResult<Vec<serde_json::Value>> {
        let coll = self.collection(model);
        let filter = query::build_filter(&q.where_clauses);

        let mut find_opts = FindOptions::default();
        if let Some(limit) = q.limit {
            find_opts.limit = Some(limit);
        }
        if let Some(offset) = q.offset {
            find_opts.skip = Some(offset.max(0) as u64);
        }
        if let Some(sort) = query::build_sort(&q) {
            find_opts.sort = Some(sort);
        }

        let mut cursor = coll
            .find(filter)
            .with_options(find_opts)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB find failed: {e}")))?;

        let mut results = Vec::new();
        use futures_util::StreamExt;
        while let Some(doc) = cursor.next().await {
            let doc = doc.map_err(|e| CommerceError::Store(format!("Cursor error: {e}")))?;
            results.push(query::doc_to_json(&doc));
        }

        Ok(results)
    }

    async fn count(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64> {
        let coll = self.collection(model);
        let filter = query::build_filter(where_clauses);

        let count = coll
            .count_documents(filter)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB count failed: {e}")))?;

        Ok(count as i64)
    }

    async fn update(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<Option<serde_json::Value>> {
        let coll = self.collection(model);
        let filter = query::build_filter(where_clauses);
        let update = query::build_update_doc(&data);

        let result = coll
            .update_one(filter.clone(), update)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB update failed: {e}")))?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        let updated = coll
            .find_one(filter)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB find after update failed: {e}")))?;

        Ok(updated.map(|doc| query::doc_to_json(&doc)))
    }

    async fn update_many(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<i64> {
        let coll = self.collection(model);
        let filter = query::build_filter(where_clauses);
        let update = query::build_update_doc(&data);

        let result = coll
            .update_many(filter, update)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB update_many failed: {e}")))?;

        Ok(result.matched_count as i64)
    }

    async fn delete(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<()> {
        let coll = self.collection(model);
        let filter = query::build_filter(where_clauses);

        coll.delete_one(filter)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB delete failed: {e}")))?;

        Ok(())
    }

    async fn delete_many(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64> {
        let coll = self.collection(model);
        let filter = query::build_filter(where_clauses);

        let result = coll
            .delete_many(filter)
            .await
            .map_err(|e| CommerceError::Store(format!("MongoDB delete_many failed: {e}")))?;

        Ok(result.deleted_count as i64)
    }
}
