//! Response rendering.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use switchyard::Response;

use crate::templates;

/// Builds a page from JSON page data.
pub type Template = fn(&Value) -> Result<String, serde_json::Error>;

/// Renders JSON, named HTML templates and plain text responses.
#[derive(Clone)]
pub struct Render {
    templates: Arc<HashMap<&'static str, Template>>,
}

impl Default for Render {
    fn default() -> Self {
        Self::empty()
            .with_template(templates::HOME, templates::home)
            .with_template(templates::GUESTBOOK, templates::guestbook)
            .with_template(templates::SIGNED, templates::signed)
    }
}

impl fmt::Debug for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.templates.keys().collect();
        names.sort();
        f.debug_struct("Render").field("templates", &names).finish()
    }
}

impl Render {
    /// A renderer without templates.
    pub fn empty() -> Self {
        Self {
            templates: Arc::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_template(mut self, name: &'static str, template: Template) -> Self {
        Arc::make_mut(&mut self.templates).insert(name, template);
        self
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn json<T: Serialize + ?Sized>(&self, status: u16, data: &T) -> Response {
        match serde_json::to_vec(data) {
            Ok(body) => Response::new(status)
                .header("Content-Type", "application/json")
                .body(body),
            Err(err) => {
                tracing::error!(error = %err, "cannot encode response body");
                Response::internal_server_error()
            }
        }
    }

    /// Renders the template registered as `name`.
    ///
    /// Unknown templates and page data the template cannot decode produce
    /// a 500 response.
    pub fn html<T: Serialize + ?Sized>(&self, status: u16, name: &str, data: &T) -> Response {
        let Some(template) = self.templates.get(name) else {
            tracing::error!(template = name, "unknown template");
            return Response::internal_server_error();
        };
        let rendered = serde_json::to_value(data).and_then(|value| template(&value));
        match rendered {
            Ok(page) => Response::html(page).status(status),
            Err(err) => {
                tracing::error!(template = name, error = %err, "template failed");
                Response::internal_server_error()
            }
        }
    }

    pub fn text(&self, status: u16, body: impl Into<String>) -> Response {
        Response::text(body).status(status)
    }
}
