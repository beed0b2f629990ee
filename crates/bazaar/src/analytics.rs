// Dashboard aggregations: daily order counts for the last week and sales
// volume grouped by product category. Grouping happens in-process; the
// store only supplies the order and product documents.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use bazaar_core::error::ApiError;

use crate::context::CommerceContext;

/// `{labels, data}` pairs consumed directly by the dashboard charts.
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

/// Orders per day over the last 7 days (today inclusive).
pub async fn handle_weekly_orders(ctx: Arc<CommerceContext>) -> Result<ChartResponse, ApiError> {
    let today = Utc::now().date_naive();
    let labels: Vec<String> = (0..7)
        .rev()
        .map(|i| (today - Duration::days(i)).format("%Y-%m-%d").to_string())
        .collect();

    let orders = ctx.store.all_orders().await?;
    let mut counts: HashMap<String, i64> = HashMap::new();
    for order in &orders {
        let day = order.created_at.date_naive().format("%Y-%m-%d").to_string();
        *counts.entry(day).or_insert(0) += 1;
    }

    let data = labels
        .iter()
        .map(|day| counts.get(day).copied().unwrap_or(0))
        .collect();

    Ok(ChartResponse { labels, data })
}

/// Quantity sold per product category, highest first. Orders whose
/// product (or its category) is gone are left out, mirroring an inner
/// join across orders → products → categories.
pub async fn handle_sales_by_category(
    ctx: Arc<CommerceContext>,
) -> Result<ChartResponse, ApiError> {
    let orders = ctx.store.all_orders().await?;

    let product_ids: Vec<String> = orders
        .iter()
        .map(|o| o.order_items.product.clone())
        .collect();
    let products = ctx.store.find_products_by_ids(&product_ids).await?;

    let mut totals: HashMap<String, i64> = HashMap::new();
    for order in &orders {
        let Some(product) = products.iter().find(|p| p.id == order.order_items.product) else {
            continue;
        };
        let Some(category) = product.category.as_ref() else {
            continue;
        };
        *totals.entry(category.clone()).or_insert(0) += i64::from(order.order_items.quantity);
    }

    let mut pairs: Vec<(String, i64)> = totals.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let (labels, data) = pairs.into_iter().unzip();
    Ok(ChartResponse { labels, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    use bazaar_core::db::models::Role;
    use bazaar_core::options::CommerceOptions;
    use bazaar_memory::MemoryAdapter;

    use crate::testing;

    fn ctx() -> Arc<CommerceContext> {
        CommerceContext::new(
            CommerceOptions::new("test-secret"),
            Arc::new(MemoryAdapter::new()),
        )
    }

    #[tokio::test]
    async fn weekly_orders_has_seven_labels_ending_today() {
        let ctx = ctx();
        testing::seed_user(&ctx, "buyer", Role::User, true).await;
        testing::seed_dealer(&ctx, "dealer", None, None).await;
        let product = testing::seed_product(&ctx, "p1", "dealer", "10.00", 10).await;
        testing::seed_order(&ctx, "o1", "buyer", &product).await;
        testing::seed_order(&ctx, "o2", "buyer", &product).await;

        let res = handle_weekly_orders(ctx).await.unwrap();
        assert_eq!(res.labels.len(), 7);
        assert_eq!(res.data.len(), 7);
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(res.labels[6], today);
        assert_eq!(res.data[6], 2);
        assert_eq!(res.data[..6].iter().sum::<i64>(), 0);
    }

    #[tokio::test]
    async fn weekly_orders_with_no_orders_is_all_zero() {
        let ctx = ctx();
        let res = handle_weekly_orders(ctx).await.unwrap();
        assert_eq!(res.data, vec![0; 7]);
    }

    #[tokio::test]
    async fn sales_by_category_groups_and_sorts_desc() {
        let ctx = ctx();
        testing::seed_user(&ctx, "buyer", Role::User, true).await;
        testing::seed_dealer(&ctx, "dealer", None, None).await;
        let kettles =
            testing::seed_categorized_product(&ctx, "p1", "dealer", "10.00", 10, "Kitchen").await;
        let lamps =
            testing::seed_categorized_product(&ctx, "p2", "dealer", "10.00", 10, "Lighting").await;
        let uncategorized = testing::seed_product(&ctx, "p3", "dealer", "10.00", 10).await;

        testing::seed_order_with_quantity(&ctx, "o1", "buyer", &kettles, 1).await;
        testing::seed_order_with_quantity(&ctx, "o2", "buyer", &lamps, 3).await;
        testing::seed_order_with_quantity(&ctx, "o3", "buyer", &lamps, 2).await;
        testing::seed_order_with_quantity(&ctx, "o4", "buyer", &uncategorized, 9).await;

        let res = handle_sales_by_category(ctx).await.unwrap();
        assert_eq!(res.labels, vec!["Lighting".to_string(), "Kitchen".to_string()]);
        assert_eq!(res.data, vec![5, 1]);
    }
}
