// Typed store layer. Route handlers never touch the raw Adapter; this
// wrapper speaks domain types and owns the JSON (de)serialization and the
// model/collection names.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use bazaar_core::db::adapter::{collections, Adapter, FindManyQuery, SortBy, SortDirection, WhereClause};
use bazaar_core::db::models::{Address, Order, PaymentStatus, Product, User};
use bazaar_core::error::Result;

#[derive(Clone)]
pub struct Store {
    adapter: Arc<dyn Adapter>,
}

fn to_doc<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

fn from_doc<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn from_docs<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Result<Vec<T>> {
    values.into_iter().map(from_doc).collect()
}

impl Store {
    pub fn new(adapter: Arc<dyn Adapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    // ── Users ───────────────────────────────────────────────────────

    pub async fn create_user(&self, user: &User) -> Result<User> {
        let created = self.adapter.create(collections::USERS, to_doc(user)?).await?;
        from_doc(created)
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let found = self
            .adapter
            .find_one(collections::USERS, &[WhereClause::eq("id", id)])
            .await?;
        found.map(from_doc).transpose()
    }

    /// Duplicate-account check: matches on email OR phone.
    pub async fn find_user_by_email_or_phone(
        &self,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<User>> {
        let clauses = match phone {
            Some(phone) => vec![
                WhereClause::eq("email", email).or(),
                WhereClause::eq("phone", phone),
            ],
            None => vec![WhereClause::eq("email", email)],
        };
        let found = self.adapter.find_one(collections::USERS, &clauses).await?;
        found.map(from_doc).transpose()
    }

    /// Login lookup: only active accounts may sign in.
    pub async fn find_active_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let found = self
            .adapter
            .find_one(
                collections::USERS,
                &[
                    WhereClause::eq("email", email),
                    WhereClause::eq("isActive", true),
                ],
            )
            .await?;
        found.map(from_doc).transpose()
    }

    pub async fn find_users(&self, clauses: Vec<WhereClause>) -> Result<Vec<User>> {
        let found = self
            .adapter
            .find_many(collections::USERS, FindManyQuery::filtered(clauses))
            .await?;
        from_docs(found)
    }

    /// Merge a partial patch (camelCase JSON fields) into one user.
    pub async fn update_user(&self, id: &str, patch: serde_json::Value) -> Result<Option<User>> {
        let updated = self
            .adapter
            .update(collections::USERS, &[WhereClause::eq("id", id)], patch)
            .await?;
        updated.map(from_doc).transpose()
    }

    /// Dealers whose plan window has lapsed. The store query narrows on
    /// `planValidUntil`; the caller re-checks with real timestamps.
    pub async fn find_dealers_with_expired_plans(&self, now: DateTime<Utc>) -> Result<Vec<User>> {
        let cutoff = serde_json::to_value(now)?;
        let found = self
            .adapter
            .find_many(
                collections::USERS,
                FindManyQuery::filtered(vec![WhereClause::lt("planValidUntil", cutoff)]),
            )
            .await?;
        from_docs(found)
    }

    // ── Products ────────────────────────────────────────────────────

    pub async fn create_product(&self, product: &Product) -> Result<Product> {
        let created = self
            .adapter
            .create(collections::PRODUCTS, to_doc(product)?)
            .await?;
        from_doc(created)
    }

    pub async fn find_product(&self, id: &str) -> Result<Option<Product>> {
        let found = self
            .adapter
            .find_one(collections::PRODUCTS, &[WhereClause::eq("id", id)])
            .await?;
        found.map(from_doc).transpose()
    }

    pub async fn find_products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let values = ids.iter().map(|id| serde_json::json!(id)).collect();
        let found = self
            .adapter
            .find_many(
                collections::PRODUCTS,
                FindManyQuery::filtered(vec![WhereClause::is_in("id", values)]),
            )
            .await?;
        from_docs(found)
    }

    pub async fn product_ids_by_agent(&self, agent: &str) -> Result<Vec<String>> {
        let found = self
            .adapter
            .find_many(
                collections::PRODUCTS,
                FindManyQuery::filtered(vec![WhereClause::eq("agent", agent)]),
            )
            .await?;
        let products: Vec<Product> = from_docs(found)?;
        Ok(products.into_iter().map(|p| p.id).collect())
    }

    pub async fn set_product_stock(&self, id: &str, stock: i64) -> Result<()> {
        self.adapter
            .update(
                collections::PRODUCTS,
                &[WhereClause::eq("id", id)],
                serde_json::json!({ "stock": stock, "updatedAt": Utc::now() }),
            )
            .await?;
        Ok(())
    }

    // ── Orders ──────────────────────────────────────────────────────

    pub async fn create_order(&self, order: &Order) -> Result<Order> {
        let created = self.adapter.create(collections::ORDERS, to_doc(order)?).await?;
        from_doc(created)
    }

    pub async fn find_order(&self, id: &str) -> Result<Option<Order>> {
        let found = self
            .adapter
            .find_one(collections::ORDERS, &[WhereClause::eq("id", id)])
            .await?;
        found.map(from_doc).transpose()
    }

    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        let query = FindManyQuery {
            sort_by: Some(SortBy {
                field: "createdAt".into(),
                direction: SortDirection::Desc,
            }),
            ..Default::default()
        };
        let found = self.adapter.find_many(collections::ORDERS, query).await?;
        from_docs(found)
    }

    pub async fn orders_by_user(&self, user: &str) -> Result<Vec<Order>> {
        let found = self
            .adapter
            .find_many(
                collections::ORDERS,
                FindManyQuery::filtered(vec![WhereClause::eq("user", user)]),
            )
            .await?;
        from_docs(found)
    }

    pub async fn orders_by_products(&self, product_ids: &[String]) -> Result<Vec<Order>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let values = product_ids.iter().map(|id| serde_json::json!(id)).collect();
        let found = self
            .adapter
            .find_many(
                collections::ORDERS,
                FindManyQuery::filtered(vec![WhereClause::is_in("orderItems.product", values)]),
            )
            .await?;
        from_docs(found)
    }

    pub async fn update_order(&self, id: &str, patch: serde_json::Value) -> Result<Option<Order>> {
        let updated = self
            .adapter
            .update(collections::ORDERS, &[WhereClause::eq("id", id)], patch)
            .await?;
        updated.map(from_doc).transpose()
    }

    pub async fn delete_order(&self, id: &str) -> Result<()> {
        self.adapter
            .delete(collections::ORDERS, &[WhereClause::eq("id", id)])
            .await
    }

    /// Stamp the gateway order id onto every order of one checkout.
    pub async fn stamp_gateway_order(
        &self,
        checkout_group_id: &str,
        gateway_order_id: &str,
    ) -> Result<i64> {
        self.adapter
            .update_many(
                collections::ORDERS,
                &[WhereClause::eq("checkoutGroupId", checkout_group_id)],
                serde_json::json!({
                    "razorpayOrderId": gateway_order_id,
                    "updatedAt": Utc::now(),
                }),
            )
            .await
    }

    /// Flip every order sharing a gateway order id to Paid. Idempotent:
    /// re-running with the same ids rewrites the same values.
    pub async fn mark_orders_paid(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
    ) -> Result<i64> {
        self.adapter
            .update_many(
                collections::ORDERS,
                &[WhereClause::eq("razorpayOrderId", gateway_order_id)],
                serde_json::json!({
                    "paymentStatus": PaymentStatus::Paid,
                    "razorpayPaymentId": payment_id,
                    "updatedAt": Utc::now(),
                }),
            )
            .await
    }

    // ── Addresses ───────────────────────────────────────────────────

    pub async fn create_address(&self, address: &Address) -> Result<Address> {
        let created = self
            .adapter
            .create(collections::ADDRESSES, to_doc(address)?)
            .await?;
        from_doc(created)
    }

    pub async fn addresses_for_user(&self, user: &str) -> Result<Vec<Address>> {
        let found = self
            .adapter
            .find_many(
                collections::ADDRESSES,
                FindManyQuery::filtered(vec![WhereClause::eq("user", user)]),
            )
            .await?;
        from_docs(found)
    }

    /// The single default address used as the checkout shipping snapshot.
    pub async fn find_default_address(&self, user: &str) -> Result<Option<Address>> {
        let found = self
            .adapter
            .find_one(
                collections::ADDRESSES,
                &[
                    WhereClause::eq("user", user),
                    WhereClause::eq("isDefault", true),
                ],
            )
            .await?;
        found.map(from_doc).transpose()
    }

    /// Make `address_id` the user's only default.
    pub async fn set_default_address(&self, user: &str, address_id: &str) -> Result<Option<Address>> {
        self.adapter
            .update_many(
                collections::ADDRESSES,
                &[WhereClause::eq("user", user)],
                serde_json::json!({ "isDefault": false }),
            )
            .await?;
        let updated = self
            .adapter
            .update(
                collections::ADDRESSES,
                &[
                    WhereClause::eq("id", address_id),
                    WhereClause::eq("user", user),
                ],
                serde_json::json!({ "isDefault": true }),
            )
            .await?;
        updated.map(from_doc).transpose()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
