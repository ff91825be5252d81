//! Top-level pages.

use std::sync::Arc;

use switchyard::Response;

use crate::config::Config;
use crate::context::RequestContext;
use crate::notes::NoteRepository;
use crate::render::Render;
use crate::templates::{self, HomePage};

/// Lists every stored note.
pub async fn home(ctx: RequestContext, render: Render, config: Arc<Config>) -> Response {
    match NoteRepository::new(ctx).find_all().await {
        Ok(notes) => render.html(
            200,
            templates::HOME,
            &HomePage {
                title: config.title.clone(),
                notes,
            },
        ),
        Err(err) => {
            tracing::error!(error = %err, "cannot list notes");
            render.text(500, err.to_string())
        }
    }
}

/// Echoes the configured environment variable, empty when unset.
pub async fn env_var(config: Arc<Config>, render: Render) -> Response {
    let value = std::env::var(&config.env_var).unwrap_or_default();
    render.text(200, value)
}
