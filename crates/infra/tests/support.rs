#![allow(dead_code)]

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use noteapp_common::{KeyValueStore, SharedMemoryStorage};
use noteapp_domain::{ClientConfig, Environment};
use noteapp_infra::ClientContext;
use serde_json::{json, Value};

/// Unsigned token carrying `claims`
pub fn token_with(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// Token for user `id` with email `email` and no `exp` claim
pub fn user_token(id: i64, email: &str) -> String {
    token_with(&json!({ "sub": id.to_string(), "email": email }))
}

/// Development config pointing at `base_url`, so the debug log records
pub fn dev_config(base_url: &str) -> ClientConfig {
    ClientConfig { environment: Environment::Development, ..ClientConfig::new(base_url) }
}

/// Context over fresh in-memory storage
pub fn context_for(base_url: &str) -> ClientContext {
    ClientContext::with_storage(dev_config(base_url), Arc::new(SharedMemoryStorage::new()))
        .expect("context should build")
}

/// Context sharing `storage` through a new storage context
pub fn context_sharing(base_url: &str, storage: &SharedMemoryStorage) -> ClientContext {
    let handle: Arc<dyn KeyValueStore> = Arc::new(storage.context());
    ClientContext::with_storage(dev_config(base_url), handle).expect("context should build")
}

/// Route `tracing` output to the test harness when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
