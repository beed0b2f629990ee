//! bazaar-server binary entry point.

use std::sync::Arc;

use anyhow::Context;

use bazaar::context::CommerceContext;
use bazaar::google::GoogleTokenVerifier;
use bazaar::tasks::plan_expiry::spawn_plan_expiry_job;
use bazaar_axum::Bazaar;
use bazaar_core::env;
use bazaar_core::options::CommerceOptions;
use bazaar_mongodb::MongoAdapter;
use bazaar_razorpay::{RazorpayClient, RazorpayOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env::init_logger();

    let secret = env::secret_from_env().context("BAZAAR_SECRET must be set")?;
    let database_url = env::database_url_from_env().context("DATABASE_URL must be set")?;

    let adapter = MongoAdapter::connect(&database_url, &env::database_name_from_env())
        .await
        .context("failed to connect to MongoDB")?;

    let mut builder = CommerceContext::builder(CommerceOptions::new(secret), Arc::new(adapter));

    match RazorpayOptions::from_env() {
        Some(options) => {
            let key_secret = options.key_secret.clone();
            builder = builder.gateway(Arc::new(RazorpayClient::new(options)), key_secret);
        }
        None => tracing::warn!("RAZORPAY_KEY_ID/KEY_SECRET unset; online payment disabled"),
    }

    match GoogleTokenVerifier::from_env() {
        Some(verifier) => builder = builder.google(Arc::new(verifier)),
        None => tracing::warn!("GOOGLE_CLIENT_ID unset; Google login disabled"),
    }

    let ctx = builder.build();

    // Daily plan-expiry sweep runs for the lifetime of the process.
    let _expiry_job = spawn_plan_expiry_job(ctx.clone());

    let app = Bazaar::new(ctx).router_with_cors();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("bazaar listening on 0.0.0.0:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
