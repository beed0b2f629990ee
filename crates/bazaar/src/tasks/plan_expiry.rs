// Daily plan expiry. The operation itself is idempotent: it queries the
// expired set and clears it, so re-running (or overlapping runs) converge
// on the same state. The scheduler is a thin tokio loop firing at UTC
// midnight.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use bazaar_core::error::Result;

use crate::context::CommerceContext;
use crate::store::Store;

/// Clear the plan of every dealer whose `plan_valid_until` has passed.
/// Returns how many dealers were downgraded. Safe to re-run: already
/// downgraded dealers no longer match the query.
pub async fn downgrade_expired_plans(store: &Store, now: DateTime<Utc>) -> Result<usize> {
    let candidates = store.find_dealers_with_expired_plans(now).await?;

    let mut downgraded = 0;
    for user in candidates {
        // The store query narrows by the serialized timestamp; re-check
        // with real timestamps before mutating.
        let expired = user.plan.is_some()
            && user.plan_valid_until.map(|until| until < now).unwrap_or(false);
        if !expired {
            continue;
        }

        store
            .update_user(
                &user.id,
                serde_json::json!({ "plan": null, "planValidUntil": null }),
            )
            .await?;
        downgraded += 1;
    }

    Ok(downgraded)
}

/// Spawn the daily scheduler. Runs once every UTC midnight until the
/// returned handle is aborted.
pub fn spawn_plan_expiry_job(ctx: Arc<CommerceContext>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_midnight(Utc::now())).await;

            match downgrade_expired_plans(&ctx.store, Utc::now()).await {
                Ok(count) => {
                    tracing::info!(count, "dealers downgraded after plan expiry");
                }
                Err(e) => {
                    tracing::error!(error = %e, "plan expiry sweep failed");
                }
            }
        }
    })
}

fn until_next_midnight(now: DateTime<Utc>) -> std::time::Duration {
    let next_midnight = (now.date_naive() + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (next_midnight - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(60 * 60 * 24))
}

#[cfg(test)]
mod tests {
    use super::*;

    use bazaar_core::options::CommerceOptions;
    use bazaar_core::plan::PlanTier;
    use bazaar_memory::MemoryAdapter;

    use crate::testing;

    fn ctx() -> Arc<CommerceContext> {
        CommerceContext::new(
            CommerceOptions::new("test-secret"),
            Arc::new(MemoryAdapter::new()),
        )
    }

    #[tokio::test]
    async fn expired_dealers_lose_their_plan() {
        let ctx = ctx();
        testing::seed_dealer(&ctx, "expired", Some(PlanTier::Plan2), None).await;
        testing::seed_dealer(&ctx, "current", Some(PlanTier::Plan3), None).await;
        testing::set_plan_valid_until(&ctx, "expired", Utc::now() - Duration::days(1)).await;
        testing::set_plan_valid_until(&ctx, "current", Utc::now() + Duration::days(10)).await;

        let count = downgrade_expired_plans(&ctx.store, Utc::now()).await.unwrap();
        assert_eq!(count, 1);

        let expired = ctx.store.find_user("expired").await.unwrap().unwrap();
        assert!(expired.plan.is_none());
        assert!(expired.plan_valid_until.is_none());

        let current = ctx.store.find_user("current").await.unwrap().unwrap();
        assert_eq!(current.plan, Some(PlanTier::Plan3));
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let ctx = ctx();
        testing::seed_dealer(&ctx, "expired", Some(PlanTier::Plan1), None).await;
        testing::set_plan_valid_until(&ctx, "expired", Utc::now() - Duration::days(2)).await;

        let first = downgrade_expired_plans(&ctx.store, Utc::now()).await.unwrap();
        assert_eq!(first, 1);
        let second = downgrade_expired_plans(&ctx.store, Utc::now()).await.unwrap();
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn dealers_without_plan_untouched() {
        let ctx = ctx();
        testing::seed_dealer(&ctx, "planless", None, None).await;
        let count = downgrade_expired_plans(&ctx.store, Utc::now()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn midnight_delay_is_positive_and_at_most_a_day() {
        let d = until_next_midnight(Utc::now());
        assert!(d > std::time::Duration::ZERO);
        assert!(d <= std::time::Duration::from_secs(60 * 60 * 24));
    }
}
