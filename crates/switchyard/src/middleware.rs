//! Middleware chains with explicit continuations.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::error::Result;
use crate::handler::{BoxedHandler, invoke};
use crate::injector::Injector;
use crate::request::Request;
use crate::response::Response;

/// A boxed async operation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stage of the request pipeline.
///
/// A middleware receives the request injector by value plus the
/// continuation. It may register scoped bindings before calling
/// [`Next::run`]; not calling it ends the request with the middleware's own
/// response.
///
/// Closures `Fn(Injector, Next) -> impl Future<Output = Result<Response>>`
/// implement this trait:
///
/// ```ignore
/// let app = Application::new().middleware(|mut injector: Injector, next: Next| async move {
///     let ctx: RequestContext = injector.resolve()?;
///     injector.register_scoped(NoteRepository::new(ctx));
///     next.run(injector).await
/// });
/// ```
pub trait Middleware: Send + Sync {
    fn handle(&self, injector: Injector, next: Next) -> BoxFuture<'static, Result<Response>>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F, Fut> Middleware for F
where
    F: Fn(Injector, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn handle(&self, injector: Injector, next: Next) -> BoxFuture<'static, Result<Response>> {
        Box::pin(self(injector, next))
    }
}

/// The rest of the chain after the current middleware.
pub struct Next {
    chain: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    terminal: BoxedHandler,
    reached_terminal: Arc<AtomicBool>,
}

impl Next {
    /// Runs the next middleware, or the terminal handler if none remain.
    pub fn run(self, injector: Injector) -> BoxFuture<'static, Result<Response>> {
        Box::pin(async move {
            let Some(current) = self.chain.get(self.index).cloned() else {
                self.reached_terminal.store(true, Ordering::Release);
                return invoke(&self.terminal, &injector).await;
            };
            tracing::trace!(middleware = current.name(), index = self.index, "running middleware");
            let next = Self {
                chain: self.chain,
                index: self.index + 1,
                terminal: self.terminal,
                reached_terminal: self.reached_terminal,
            };
            current.handle(injector, next).await
        })
    }

    /// Number of middleware still ahead of the terminal handler.
    pub fn remaining(&self) -> usize {
        self.chain.len() - self.index
    }
}

/// How a chain run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The terminal handler was reached.
    Completed(Response),
    /// A middleware answered without calling its continuation.
    Aborted(Response),
}

impl Outcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    pub fn response(&self) -> &Response {
        match self {
            Self::Completed(res) | Self::Aborted(res) => res,
        }
    }

    pub fn into_response(self) -> Response {
        match self {
            Self::Completed(res) | Self::Aborted(res) => res,
        }
    }
}

/// An ordered list of middleware run before a terminal handler.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new(middleware: Vec<Arc<dyn Middleware>>) -> Self {
        Self { middleware }
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Names of the middleware in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(|mw| mw.name()).collect()
    }

    /// Runs every middleware in order, then `terminal`.
    pub async fn run(self, terminal: BoxedHandler, injector: Injector) -> Result<Outcome> {
        let reached_terminal = Arc::new(AtomicBool::new(false));
        let next = Next {
            chain: self.middleware.into(),
            index: 0,
            terminal,
            reached_terminal: Arc::clone(&reached_terminal),
        };

        let response = next.run(injector).await?;

        if reached_terminal.load(Ordering::Acquire) {
            Ok(Outcome::Completed(response))
        } else {
            Ok(Outcome::Aborted(response))
        }
    }
}

/// Logs every request and its response status through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn handle(&self, injector: Injector, next: Next) -> BoxFuture<'static, Result<Response>> {
        Box::pin(async move {
            let request = injector.resolve::<Request>()?;
            let started = Instant::now();
            tracing::info!(method = %request.method, path = %request.path, "-->");

            let response = next.run(injector).await?;

            tracing::info!(
                status = response.status,
                reason = response.status_text(),
                elapsed = ?started.elapsed(),
                "<--"
            );
            Ok(response)
        })
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}

/// Redirects unauthenticated requests to a login page.
///
/// A request counts as authenticated when it carries an `Authorization`
/// header or a `session=` cookie. Checking the credential itself is left to
/// later stages.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    /// Path prefixes that skip the check.
    pub exclude: Vec<String>,
    /// Where unauthenticated requests are sent.
    pub login_url: String,
}

impl AuthGuard {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            exclude: Vec::new(),
            login_url: login_url.into(),
        }
    }

    /// Adds path prefixes that skip the check.
    #[must_use]
    pub fn exclude(mut self, paths: &[&str]) -> Self {
        self.exclude.extend(paths.iter().map(|s| (*s).to_string()));
        self
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|p| path.starts_with(p.as_str()))
    }

    fn is_authenticated(request: &Request) -> bool {
        request.get_header("Authorization").is_some()
            || request
                .get_header("Cookie")
                .is_some_and(|c| c.split(';').any(|part| part.trim().starts_with("session=")))
    }
}

impl Middleware for AuthGuard {
    fn handle(&self, injector: Injector, next: Next) -> BoxFuture<'static, Result<Response>> {
        let guard = self.clone();
        Box::pin(async move {
            let request = injector.resolve::<Request>()?;
            if guard.is_excluded(&request.path) || Self::is_authenticated(&request) {
                return next.run(injector).await;
            }
            tracing::debug!(path = %request.path, login = %guard.login_url, "unauthenticated request");
            Ok(Response::redirect(guard.login_url))
        })
    }

    fn name(&self) -> &'static str {
        "auth_guard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Trace(Arc<Mutex<Vec<String>>>);

    impl Trace {
        fn push(&self, entry: &str) {
            self.0.lock().unwrap().push(entry.to_string());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct User(&'static str);

    fn recording(label: &'static str) -> Arc<dyn Middleware> {
        Arc::new(move |injector: Injector, next: Next| async move {
            injector.resolve::<Trace>()?.push(label);
            next.run(injector).await
        })
    }

    fn terminal() -> BoxedHandler {
        BoxedHandler::new(|trace: Trace| async move {
            trace.push("handler");
            Response::text("done")
        })
    }

    fn injector_with(trace: &Trace) -> Injector {
        let mut injector = Injector::new();
        injector.register_scoped(trace.clone());
        injector
    }

    #[tokio::test]
    async fn test_runs_in_order_then_terminal() {
        let trace = Trace::default();
        let chain = MiddlewareChain::new(vec![recording("a"), recording("b")]);

        let outcome = chain.run(terminal(), injector_with(&trace)).await.unwrap();

        assert!(!outcome.is_aborted());
        assert_eq!(trace.entries(), vec!["a", "b", "handler"]);
        assert_eq!(outcome.into_response().body_string().as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_short_circuit_skips_the_rest() {
        let trace = Trace::default();
        let blocker: Arc<dyn Middleware> = Arc::new(|_injector: Injector, _next: Next| async {
            Ok::<_, crate::RouterError>(Response::unauthorized())
        });
        let chain = MiddlewareChain::new(vec![recording("a"), blocker, recording("c")]);

        let outcome = chain.run(terminal(), injector_with(&trace)).await.unwrap();

        assert!(outcome.is_aborted());
        assert_eq!(outcome.response().status, 401);
        assert_eq!(trace.entries(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_scoped_bindings_visible_downstream() {
        let trace = Trace::default();
        let login: Arc<dyn Middleware> = Arc::new(|mut injector: Injector, next: Next| async move {
            injector.register_scoped(User("ada"));
            next.run(injector).await
        });
        let check: Arc<dyn Middleware> = Arc::new(|injector: Injector, next: Next| async move {
            assert_eq!(next.remaining(), 0);
            assert_eq!(injector.resolve::<User>()?, User("ada"));
            next.run(injector).await
        });
        let handler = BoxedHandler::new(|user: User| async move { Response::text(user.0) });

        let outcome = MiddlewareChain::new(vec![login, check])
            .run(handler, injector_with(&trace))
            .await
            .unwrap();
        assert_eq!(outcome.response().body_string().as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn test_later_bindings_not_visible_upstream() {
        let seen_before = Arc::new(AtomicBool::new(true));
        let seen = Arc::clone(&seen_before);
        let outer: Arc<dyn Middleware> = Arc::new(move |injector: Injector, next: Next| {
            let seen = Arc::clone(&seen);
            async move {
                seen.store(injector.contains::<User>(), Ordering::SeqCst);
                next.run(injector).await
            }
        });
        let inner: Arc<dyn Middleware> = Arc::new(|mut injector: Injector, next: Next| async move {
            injector.register_scoped(User("late"));
            next.run(injector).await
        });

        MiddlewareChain::new(vec![outer, inner])
            .run(BoxedHandler::new(|| async { Response::ok() }), Injector::new())
            .await
            .unwrap();
        assert!(!seen_before.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_chain_calls_terminal() {
        let trace = Trace::default();
        let outcome = MiddlewareChain::default()
            .run(terminal(), injector_with(&trace))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Completed(_)));
        assert_eq!(trace.entries(), vec!["handler"]);
    }

    #[tokio::test]
    async fn test_unresolved_terminal_input_fails() {
        let chain = MiddlewareChain::new(vec![recording("a")]);
        let trace = Trace::default();
        let handler = BoxedHandler::new(|_user: User| async { Response::ok() });

        let err = chain.run(handler, injector_with(&trace)).await.unwrap_err();
        assert!(matches!(err, crate::RouterError::UnresolvedDependency { .. }));
        assert_eq!(trace.entries(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_auth_guard() {
        let guard: Arc<dyn Middleware> =
            Arc::new(AuthGuard::new("/login").exclude(&["/public"]));
        let run = |request: Request| {
            let chain = MiddlewareChain::new(vec![Arc::clone(&guard)]);
            let mut injector = Injector::new();
            injector.register_scoped(request);
            chain.run(BoxedHandler::new(|| async { Response::text("secret") }), injector)
        };

        let blocked = run(Request::get("/admin")).await.unwrap();
        assert!(blocked.is_aborted());
        assert_eq!(blocked.response().get_header("Location"), Some("/login"));

        let public = run(Request::get("/public/about")).await.unwrap();
        assert!(!public.is_aborted());

        let with_cookie = run(Request::get("/admin").header("Cookie", "theme=dark; session=abc"))
            .await
            .unwrap();
        assert_eq!(with_cookie.response().status, 200);

        let with_token = run(Request::get("/admin").header("authorization", "Bearer t"))
            .await
            .unwrap();
        assert_eq!(with_token.response().body_string().as_deref(), Some("secret"));
    }

    #[test]
    fn test_chain_names() {
        let chain = MiddlewareChain::new(vec![
            Arc::new(LoggingMiddleware),
            Arc::new(AuthGuard::new("/login")),
        ]);
        assert_eq!(chain.names(), vec!["logging", "auth_guard"]);
        assert_eq!(chain.len(), 2);
    }
}
