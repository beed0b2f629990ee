// Shared service context handed to every route handler.

use std::sync::Arc;

use bazaar_core::db::adapter::Adapter;
use bazaar_core::options::CommerceOptions;
use bazaar_razorpay::PaymentGateway;

use crate::google::IdTokenVerifier;
use crate::store::Store;

/// Everything a handler needs: options, the typed store, and the optional
/// external collaborators (payment gateway, Google token verifier).
pub struct CommerceContext {
    pub options: CommerceOptions,
    pub store: Store,
    /// Gateway client; `None` disables online payment (COD still works).
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    /// Gateway key secret, used to verify payment signatures.
    pub payment_secret: Option<String>,
    pub google: Option<Arc<dyn IdTokenVerifier>>,
}

impl CommerceContext {
    pub fn new(options: CommerceOptions, adapter: Arc<dyn Adapter>) -> Arc<Self> {
        Arc::new(Self {
            options,
            store: Store::new(adapter),
            gateway: None,
            payment_secret: None,
            google: None,
        })
    }

    /// Builder used at startup before the context is shared.
    pub fn builder(options: CommerceOptions, adapter: Arc<dyn Adapter>) -> ContextBuilder {
        ContextBuilder {
            options,
            adapter,
            gateway: None,
            payment_secret: None,
            google: None,
        }
    }
}

pub struct ContextBuilder {
    options: CommerceOptions,
    adapter: Arc<dyn Adapter>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    payment_secret: Option<String>,
    google: Option<Arc<dyn IdTokenVerifier>>,
}

impl ContextBuilder {
    pub fn gateway(mut self, gateway: Arc<dyn PaymentGateway>, key_secret: impl Into<String>) -> Self {
        self.gateway = Some(gateway);
        self.payment_secret = Some(key_secret.into());
        self
    }

    pub fn google(mut self, verifier: Arc<dyn IdTokenVerifier>) -> Self {
        self.google = Some(verifier);
        self
    }

    pub fn build(self) -> Arc<CommerceContext> {
        Arc::new(CommerceContext {
            options: self.options,
            store: Store::new(self.adapter),
            gateway: self.gateway,
            payment_secret: self.payment_secret,
            google: self.google,
        })
    }
}
