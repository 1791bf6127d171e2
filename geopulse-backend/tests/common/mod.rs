// tests/common/mod.rs
#![allow(dead_code)]

pub mod app_helper;
pub mod auth_helper;
pub mod db;
pub mod gps_helper;
pub mod request;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialises test logging once per test binary
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("geopulse_backend=debug,tower_http=debug")
            .with_test_writer()
            .try_init();
    });
}
