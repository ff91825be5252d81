//! Demo applications for switchyard.
//!
//! - `/notes`: a JSON API over a document store, with a repository bound
//!   per request by collection middleware
//! - `/guestbook`: HTML pages with the signed-in user taken from a header
//! - `/storage`: a walkthrough of the blob store
//!
//! [`application`] wires them into one [`Application`]; the binary serves it
//! over HTTP with [`server::serve`].

pub mod config;
pub mod context;
pub mod error;
pub mod guestbook;
pub mod notes;
pub mod pages;
pub mod render;
pub mod server;
pub mod storage;
pub mod store;
pub mod templates;

use std::sync::Arc;

use switchyard::{Application, LoggingMiddleware, Router};

pub use config::Config;
pub use context::{ContextMiddleware, RequestContext, Services};
pub use error::{ConfigError, StoreError};
pub use render::Render;

/// Builds the demo application over `services`.
pub fn application(config: Config, services: Services) -> Application {
    Application::new()
        .register_global(Arc::new(config))
        .register_global(Render::default())
        .register_global(RequestContext::background(services.clone()))
        .register_global(services)
        .middleware(LoggingMiddleware)
        .middleware(ContextMiddleware::default())
        .get("/", pages::home)
        .get("/env", pages::env_var)
        .get("/storage", storage::storage_demo)
        .mount("/notes", notes::collection())
        .mount("/guestbook", guestbook::collection())
}

pub fn build_router(config: Config, services: Services) -> switchyard::Result<Router> {
    application(config, services).build()
}
