//! The guestbook, mounted at `/guestbook`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchyard::{BoxFuture, Collection, Injector, Next, Request, Response};

use crate::config::Config;
use crate::context::RequestContext;
use crate::error::StoreError;
use crate::render::Render;
use crate::templates::{self, GuestbookPage, SignedPage};

pub const GREETING_KIND: &str = "Greeting";

/// Header carrying the signed-in user's email.
pub const USER_HEADER: &str = "X-User-Email";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Greeting {
    pub author: Option<String>,
    pub content: String,
    pub date: DateTime<Utc>,
}

/// The signed-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    pub fn email(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct GuestbookRepository {
    ctx: RequestContext,
    page_size: usize,
}

impl GuestbookRepository {
    pub fn new(ctx: RequestContext, page_size: usize) -> Self {
        Self { ctx, page_size }
    }

    /// The newest greetings, at most one page.
    pub async fn latest(&self) -> Result<Vec<Greeting>, StoreError> {
        let mut greetings = self
            .ctx
            .datastore()
            .get_all(GREETING_KIND)
            .await?
            .into_iter()
            .map(|(id, value)| serde_json::from_value::<Greeting>(value).map(|g| (id, g)))
            .collect::<Result<Vec<_>, _>>()?;
        // Ids break ties between greetings signed within the same instant.
        greetings.sort_by(|(a_id, a), (b_id, b)| (b.date, b_id).cmp(&(a.date, a_id)));
        greetings.truncate(self.page_size);
        Ok(greetings.into_iter().map(|(_, g)| g).collect())
    }

    pub async fn sign(&self, greeting: &Greeting) -> Result<i64, StoreError> {
        self.ctx
            .datastore()
            .put(GREETING_KIND, None, serde_json::to_value(greeting)?)
            .await
    }
}

/// Binds the [`CurrentUser`] from the [`USER_HEADER`] header.
pub fn current_user(mut injector: Injector, next: Next) -> BoxFuture<'static, switchyard::Result<Response>> {
    Box::pin(async move {
        let request: Request = injector.resolve()?;
        let user = request
            .get_header(USER_HEADER)
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string);
        injector.register_scoped(CurrentUser(user));
        next.run(injector).await
    })
}

/// Binds a [`GuestbookRepository`] sized by the configured page size.
pub fn guestbook_repository(
    mut injector: Injector,
    next: Next,
) -> BoxFuture<'static, switchyard::Result<Response>> {
    Box::pin(async move {
        let ctx: RequestContext = injector.resolve()?;
        let config: Arc<Config> = injector.resolve()?;
        injector.register_scoped(GuestbookRepository::new(ctx, config.guestbook.page_size));
        next.run(injector).await
    })
}

pub async fn guestbook_index(repo: GuestbookRepository, render: Render) -> Response {
    match repo.latest().await {
        Ok(greetings) => render.html(200, templates::GUESTBOOK, &GuestbookPage { greetings }),
        Err(err) => {
            tracing::error!(error = %err, "cannot list greetings");
            render.text(500, err.to_string())
        }
    }
}

pub async fn guestbook_sign(
    request: Request,
    user: CurrentUser,
    repo: GuestbookRepository,
    render: Render,
) -> Response {
    let greeting = Greeting {
        author: user.0,
        content: request.form_value("content").unwrap_or_default(),
        date: Utc::now(),
    };
    if let Err(err) = repo.sign(&greeting).await {
        tracing::error!(error = %err, "cannot store greeting");
        return render.text(500, err.to_string());
    }
    render.html(
        200,
        templates::SIGNED,
        &SignedPage {
            content: greeting.content,
        },
    )
}

pub fn collection() -> Collection {
    Collection::new()
        .middleware(current_user)
        .middleware(guestbook_repository)
        .get("/", guestbook_index)
        .post("/sign", guestbook_sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::context::Services;

    #[tokio::test]
    async fn test_latest_is_newest_first_and_paged() {
        let repo = GuestbookRepository::new(RequestContext::background(Services::in_memory()), 2);
        let start = Utc::now();
        for (i, content) in ["old", "middle", "new"].into_iter().enumerate() {
            repo.sign(&Greeting {
                author: None,
                content: content.to_string(),
                date: start + Duration::seconds(i as i64),
            })
            .await
            .unwrap();
        }

        let latest = repo.latest().await.unwrap();
        let contents: Vec<_> = latest.iter().map(|g| g.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "middle"]);
    }

    #[test]
    fn test_current_user_email() {
        assert_eq!(CurrentUser(Some("a@b.c".to_string())).email(), Some("a@b.c"));
        assert_eq!(CurrentUser::default().email(), None);
    }
}
