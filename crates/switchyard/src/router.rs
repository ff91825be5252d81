//! Route collections, mounting, and request dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{AbortRegistration, Abortable, Aborted};
use tracing::Instrument;

use crate::error::{Result, RouterError};
use crate::handler::{BoxedHandler, Handler};
use crate::injector::{Bindings, Injector};
use crate::middleware::{BoxFuture, Middleware, MiddlewareChain, Outcome};
use crate::path::{PathPattern, split_segments};
use crate::request::{Method, PathParams, Request};
use crate::response::Response;

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Pattern relative to the collection the route was registered on.
    pub pattern: PathPattern,
    /// Pattern including every ancestor mount prefix.
    pub full_pattern: PathPattern,
    /// Request handler.
    pub handler: BoxedHandler,
}

enum Entry {
    Route {
        method: Method,
        pattern: String,
        handler: BoxedHandler,
    },
    Mount {
        prefix: String,
        collection: Collection,
    },
}

/// An ordered group of routes, middleware and mounted sub-collections.
///
/// Routes and mounts are tried in the order they were added; the first
/// route whose path and method both match wins. Middleware applies to every
/// request routed through this collection whose remaining path starts with
/// the middleware's scope pattern, and runs before any middleware of a
/// nested collection.
///
/// ```
/// use switchyard::{Application, Collection, PathParams, Response};
///
/// async fn show(params: PathParams) -> Response {
///     Response::text(params.get("noteId").unwrap_or_default().to_string())
/// }
///
/// let notes = Collection::new().get("/:noteId", show);
/// let router = Application::new().mount("/notes", notes).build().unwrap();
///
/// let matched = router.resolve(switchyard::Method::Get, "/notes/42").unwrap();
/// assert_eq!(matched.params.get("noteId"), Some("42"));
/// ```
#[derive(Default)]
pub struct Collection {
    entries: Vec<Entry>,
    middleware: Vec<(String, Arc<dyn Middleware>)>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a GET route.
    #[must_use]
    pub fn get<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Get, pattern, handler)
    }

    /// Adds a POST route.
    #[must_use]
    pub fn post<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Post, pattern, handler)
    }

    /// Adds a PUT route.
    #[must_use]
    pub fn put<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Put, pattern, handler)
    }

    /// Adds a PATCH route.
    #[must_use]
    pub fn patch<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Patch, pattern, handler)
    }

    /// Adds a DELETE route.
    #[must_use]
    pub fn delete<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Delete, pattern, handler)
    }

    /// Adds a route with any method.
    ///
    /// The pattern is compiled by [`Application::build`].
    #[must_use]
    pub fn route<H, Args>(mut self, method: Method, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.entries.push(Entry::Route {
            method,
            pattern: pattern.to_string(),
            handler: BoxedHandler::new(handler),
        });
        self
    }

    /// Adds middleware for requests whose path, relative to this
    /// collection, starts with `pattern`.
    #[must_use]
    pub fn use_middleware(mut self, pattern: &str, mw: impl Middleware + 'static) -> Self {
        self.middleware.push((pattern.to_string(), Arc::new(mw)));
        self
    }

    /// Adds middleware for every request routed through this collection.
    #[must_use]
    pub fn middleware(self, mw: impl Middleware + 'static) -> Self {
        self.use_middleware("/", mw)
    }

    /// Mounts `child` under `prefix`.
    #[must_use]
    pub fn mount(mut self, prefix: &str, child: Collection) -> Self {
        self.entries.push(Entry::Mount {
            prefix: prefix.to_string(),
            collection: child,
        });
        self
    }

    fn compile(self, base: &PathPattern) -> Result<Node> {
        let middleware = self
            .middleware
            .into_iter()
            .map(|(scope, middleware)| {
                Ok(ScopedMiddleware {
                    scope: PathPattern::compile(&scope)?,
                    middleware,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut prefixes = HashSet::new();
        let mut entries = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            match entry {
                Entry::Route {
                    method,
                    pattern,
                    handler,
                } => {
                    let pattern = PathPattern::compile(&pattern)?;
                    let full_pattern = base.join(&pattern)?;
                    tracing::debug!(
                        %method,
                        pattern = %full_pattern.normalized(),
                        dependencies = ?handler.dependencies(),
                        "registered route"
                    );
                    entries.push(NodeEntry::Route(Route {
                        method,
                        pattern,
                        full_pattern,
                        handler,
                    }));
                }
                Entry::Mount { prefix, collection } => {
                    let prefix = PathPattern::compile(&prefix)?;
                    let full_prefix = base.join(&prefix)?;
                    if !prefixes.insert(prefix.shape()) {
                        return Err(RouterError::MountConflict(full_prefix.normalized()));
                    }
                    let node = collection.compile(&full_prefix)?;
                    entries.push(NodeEntry::Mount { prefix, node });
                }
            }
        }

        Ok(Node {
            entries,
            middleware,
        })
    }
}

struct ScopedMiddleware {
    scope: PathPattern,
    middleware: Arc<dyn Middleware>,
}

enum NodeEntry {
    Route(Route),
    Mount { prefix: PathPattern, node: Node },
}

struct Node {
    entries: Vec<NodeEntry>,
    middleware: Vec<ScopedMiddleware>,
}

impl Node {
    /// Depth-first search in registration order.
    ///
    /// `stack` holds the middleware of every collection on the current path;
    /// it is restored when a branch fails.
    fn find<'r>(
        &'r self,
        method: Method,
        segments: &[&str],
        params: &PathParams,
        stack: &mut Vec<Arc<dyn Middleware>>,
        allowed: &mut Vec<Method>,
    ) -> Option<(&'r Route, PathParams)> {
        let depth = stack.len();
        stack.extend(
            self.middleware
                .iter()
                .filter(|scoped| scoped.scope.match_prefix(segments).is_some())
                .map(|scoped| Arc::clone(&scoped.middleware)),
        );

        for entry in &self.entries {
            match entry {
                NodeEntry::Route(route) => {
                    let Some(bound) = route.pattern.match_segments(segments) else {
                        continue;
                    };
                    if route.method == method {
                        let mut all = params.clone();
                        all.extend(bound);
                        return Some((route, all));
                    }
                    if !allowed.contains(&route.method) {
                        allowed.push(route.method);
                    }
                }
                NodeEntry::Mount { prefix, node } => {
                    let Some((bound, consumed)) = prefix.match_prefix(segments) else {
                        continue;
                    };
                    let mut all = params.clone();
                    all.extend(bound);
                    if let Some(found) =
                        node.find(method, &segments[consumed..], &all, stack, allowed)
                    {
                        return Some(found);
                    }
                }
            }
        }

        stack.truncate(depth);
        None
    }

    fn collect_routes<'r>(&'r self, out: &mut Vec<&'r Route>) {
        for entry in &self.entries {
            match entry {
                NodeEntry::Route(route) => out.push(route),
                NodeEntry::Mount { node, .. } => node.collect_routes(out),
            }
        }
    }
}

/// The outcome of [`Router::resolve`].
pub struct MatchResult<'r> {
    /// The matched route.
    pub route: &'r Route,
    /// Parameters from every mount prefix and the route pattern.
    pub params: PathParams,
    /// Middleware to run, outermost collection first.
    pub middleware: Vec<Arc<dyn Middleware>>,
}

/// The application under construction: the root collection plus the global
/// bindings every request can resolve.
#[derive(Default)]
pub struct Application {
    root: Collection,
    globals: Bindings,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value visible to every request.
    #[must_use]
    pub fn register_global<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.globals.insert(value);
        self
    }

    #[must_use]
    pub fn get<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Get, pattern, handler)
    }

    #[must_use]
    pub fn post<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Post, pattern, handler)
    }

    #[must_use]
    pub fn put<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Put, pattern, handler)
    }

    #[must_use]
    pub fn delete<H, Args>(self, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::Delete, pattern, handler)
    }

    #[must_use]
    pub fn route<H, Args>(mut self, method: Method, pattern: &str, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.root = self.root.route(method, pattern, handler);
        self
    }

    /// See [`Collection::use_middleware`].
    #[must_use]
    pub fn use_middleware(mut self, pattern: &str, mw: impl Middleware + 'static) -> Self {
        self.root = self.root.use_middleware(pattern, mw);
        self
    }

    #[must_use]
    pub fn middleware(self, mw: impl Middleware + 'static) -> Self {
        self.use_middleware("/", mw)
    }

    #[must_use]
    pub fn mount(mut self, prefix: &str, child: Collection) -> Self {
        self.root = self.root.mount(prefix, child);
        self
    }

    /// Compiles every pattern and freezes the tree and the global bindings.
    ///
    /// Fails on malformed patterns, parameter names repeated along a mounted
    /// path, and duplicate mount prefixes within one collection.
    pub fn build(self) -> Result<Router> {
        let root_pattern = PathPattern::compile("/")?;
        let root = self.root.compile(&root_pattern)?;
        tracing::debug!(globals = ?self.globals, "application built");
        Ok(Router {
            root,
            globals: Arc::new(self.globals),
        })
    }
}

/// The built, immutable request pipeline.
///
/// Share it between connections with an `Arc`; every request gets its own
/// injector over the shared global bindings.
pub struct Router {
    root: Node,
    globals: Arc<Bindings>,
}

impl Router {
    /// Finds the route for `method` and `path`.
    pub fn resolve(&self, method: Method, path: &str) -> Result<MatchResult<'_>> {
        let segments = split_segments(path);
        let mut middleware = Vec::new();
        let mut allowed = Vec::new();

        match self.root.find(
            method,
            &segments,
            &PathParams::new(),
            &mut middleware,
            &mut allowed,
        ) {
            Some((route, params)) => Ok(MatchResult {
                route,
                params,
                middleware,
            }),
            None if !allowed.is_empty() => Err(RouterError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
                allowed,
            }),
            None => Err(RouterError::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }

    /// Runs the full pipeline for one request.
    ///
    /// The request injector is seeded with the [`PathParams`] and the
    /// [`Request`] itself before the first middleware runs.
    pub async fn dispatch(&self, mut request: Request) -> Result<Outcome> {
        let MatchResult {
            route,
            params,
            middleware,
        } = self.resolve(request.method, &request.path)?;
        tracing::debug!(
            route = %route.full_pattern.normalized(),
            middleware = middleware.len(),
            "matched"
        );

        let handler = route.handler.clone();
        request.params = params.clone();

        let mut injector = Injector::with_globals(Arc::clone(&self.globals));
        injector.register_scoped(params);
        injector.register_scoped(request);

        MiddlewareChain::new(middleware).run(handler, injector).await
    }

    /// Dispatches and converts every failure into a response.
    pub fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, Response> {
        let span = tracing::info_span!("request", method = %request.method, path = %request.path);
        Box::pin(
            async move {
                match self.dispatch(request).await {
                    Ok(Outcome::Completed(response)) => response,
                    Ok(Outcome::Aborted(response)) => {
                        tracing::debug!(status = response.status, "short-circuited by middleware");
                        response
                    }
                    Err(err @ (RouterError::NotFound { .. } | RouterError::MethodNotAllowed { .. })) => {
                        tracing::warn!(error = %err, "no route");
                        err.into_response()
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "request failed");
                        err.into_response()
                    }
                }
            }
            .instrument(span),
        )
    }

    /// Like [`Router::handle`], but stops as soon as `registration` is
    /// aborted, without producing a response.
    pub async fn handle_abortable(
        &self,
        request: Request,
        registration: AbortRegistration,
    ) -> std::result::Result<Response, Aborted> {
        Abortable::new(self.handle(request), registration).await
    }

    /// Every route in registration order.
    pub fn routes(&self) -> Vec<&Route> {
        let mut out = Vec::new();
        self.root.collect_routes(&mut out);
        out
    }

    pub fn globals(&self) -> &Bindings {
        &self.globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Next;
    use std::sync::Mutex;

    async fn hello_handler() -> Response {
        Response::text("Hello, World!")
    }

    async fn note_handler(params: PathParams) -> Response {
        let id = params.get("noteId").unwrap_or("unknown");
        Response::text(format!("Note: {id}"))
    }

    #[derive(Clone, Default)]
    struct Trace(Arc<Mutex<Vec<&'static str>>>);

    fn record(label: &'static str) -> impl Middleware {
        move |injector: Injector, next: Next| async move {
            injector.resolve::<Trace>()?.0.lock().unwrap().push(label);
            next.run(injector).await
        }
    }

    #[tokio::test]
    async fn test_basic_routing() {
        let router = Application::new()
            .get("/", hello_handler)
            .get("/notes/:noteId", note_handler)
            .build()
            .unwrap();

        let res = router.handle(Request::get("/")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string().as_deref(), Some("Hello, World!"));

        let res = router.handle(Request::get("/notes/123")).await;
        assert_eq!(res.body_string().as_deref(), Some("Note: 123"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let router = Application::new().get("/", hello_handler).build().unwrap();
        assert!(matches!(
            router.resolve(Method::Get, "/nonexistent"),
            Err(RouterError::NotFound { .. })
        ));
        assert_eq!(router.handle(Request::get("/nonexistent")).await.status, 404);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let notes = Collection::new()
            .get("/:noteId", note_handler)
            .delete("/:noteId", note_handler);
        let router = Application::new().mount("/notes", notes).build().unwrap();

        match router.resolve(Method::Post, "/notes/1") {
            Err(RouterError::MethodNotAllowed { allowed, .. }) => {
                assert_eq!(allowed, vec![Method::Get, Method::Delete]);
            }
            _ => panic!("expected method not allowed"),
        }
        let res = router.handle(Request::post("/notes/1")).await;
        assert_eq!(res.status, 405);
        assert_eq!(res.get_header("Allow"), Some("GET, DELETE"));
    }

    #[test]
    fn test_mounted_param_keeps_name_and_value() {
        let notes = Collection::new().get("/", hello_handler).get("/:noteId", note_handler);
        let router = Application::new().mount("/notes", notes).build().unwrap();

        let matched = router.resolve(Method::Get, "/notes/abc").unwrap();
        assert_eq!(matched.params.get("noteId"), Some("abc"));
        assert_eq!(matched.route.full_pattern.normalized(), "/notes/:noteId");

        let index = router.resolve(Method::Get, "/notes").unwrap();
        assert_eq!(index.route.full_pattern.normalized(), "/notes");
        assert!(router.resolve(Method::Get, "/notes/abc/def").is_err());
    }

    #[test]
    fn test_nested_mount_params_accumulate() {
        let comments = Collection::new().get("/:commentId", hello_handler);
        let users = Collection::new().mount("/:userId/comments", comments);
        let router = Application::new().mount("/users", users).build().unwrap();

        let matched = router.resolve(Method::Get, "/users/7/comments/9").unwrap();
        assert_eq!(matched.params.get("userId"), Some("7"));
        assert_eq!(matched.params.get("commentId"), Some("9"));
    }

    #[test]
    fn test_first_registered_wins() {
        let literal_first = Application::new()
            .get("/notes/latest", hello_handler)
            .get("/notes/:noteId", note_handler)
            .build()
            .unwrap();
        let matched = literal_first.resolve(Method::Get, "/notes/latest").unwrap();
        assert_eq!(matched.route.pattern.normalized(), "/notes/latest");

        let param_first = Application::new()
            .get("/notes/:noteId", note_handler)
            .get("/notes/latest", hello_handler)
            .build()
            .unwrap();
        let matched = param_first.resolve(Method::Get, "/notes/latest").unwrap();
        assert_eq!(matched.route.pattern.normalized(), "/notes/:noteId");
        assert_eq!(matched.params.get("noteId"), Some("latest"));
    }

    #[test]
    fn test_routes_and_mounts_share_one_order() {
        let mounted = Collection::new().get("/:noteId", note_handler);

        let route_first = Application::new()
            .get("/notes/:slug", hello_handler)
            .mount("/notes", mounted)
            .build()
            .unwrap();
        let matched = route_first.resolve(Method::Get, "/notes/x").unwrap();
        assert_eq!(matched.params.get("slug"), Some("x"));

        let mounted = Collection::new().get("/:noteId", note_handler);
        let mount_first = Application::new()
            .mount("/notes", mounted)
            .get("/notes/:slug", hello_handler)
            .build()
            .unwrap();
        let matched = mount_first.resolve(Method::Get, "/notes/x").unwrap();
        assert_eq!(matched.params.get("noteId"), Some("x"));
    }

    #[test]
    fn test_later_entry_can_match_method() {
        let router = Application::new()
            .get("/notes/:noteId", note_handler)
            .put("/notes/:id", hello_handler)
            .build()
            .unwrap();
        let matched = router.resolve(Method::Put, "/notes/1").unwrap();
        assert_eq!(matched.params.get("id"), Some("1"));
    }

    #[test]
    fn test_build_rejects_bad_patterns() {
        let err = Application::new().get("/notes/:", hello_handler).build();
        assert!(matches!(err, Err(RouterError::Pattern { .. })));

        let err = Application::new().mount("notes", Collection::new()).build();
        assert!(matches!(err, Err(RouterError::Pattern { .. })));

        let nested = Collection::new().get("/:id", hello_handler);
        let err = Application::new().mount("/users/:id", nested).build();
        assert!(matches!(err, Err(RouterError::Pattern { .. })));

        let err = Application::new()
            .use_middleware("/:", record("x"))
            .build();
        assert!(matches!(err, Err(RouterError::Pattern { .. })));
    }

    #[test]
    fn test_build_rejects_duplicate_mount() {
        let err = Application::new()
            .mount("/notes", Collection::new())
            .mount("/notes/", Collection::new())
            .build();
        assert!(matches!(err, Err(RouterError::MountConflict(prefix)) if prefix == "/notes"));
    }

    #[test]
    fn test_build_rejects_mounts_differing_only_in_param_names() {
        let err = Application::new()
            .mount("/:a", Collection::new().get("/x", hello_handler))
            .mount("/:b", Collection::new().get("/x", hello_handler))
            .build();
        assert!(matches!(err, Err(RouterError::MountConflict(prefix)) if prefix == "/:b"));

        let ok = Application::new()
            .mount("/:a", Collection::new())
            .mount("/:a/x", Collection::new())
            .build();
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_middleware_order_outer_first() {
        let trace = Trace::default();
        let inner = Collection::new()
            .middleware(record("inner-1"))
            .get("/:noteId", |trace: Trace| async move {
                trace.0.lock().unwrap().push("handler");
                Response::ok()
            })
            .middleware(record("inner-2"));
        let router = Application::new()
            .register_global(trace.clone())
            .middleware(record("outer-1"))
            .mount("/notes", inner)
            .middleware(record("outer-2"))
            .build()
            .unwrap();

        let outcome = router.dispatch(Request::get("/notes/1")).await.unwrap();
        assert!(!outcome.is_aborted());
        assert_eq!(
            *trace.0.lock().unwrap(),
            vec!["outer-1", "outer-2", "inner-1", "inner-2", "handler"]
        );
    }

    #[tokio::test]
    async fn test_scoped_middleware_applies_by_prefix() {
        let trace = Trace::default();
        let router = Application::new()
            .register_global(trace.clone())
            .use_middleware("/admin", record("admin"))
            .get("/admin/stats", hello_handler)
            .get("/public", hello_handler)
            .build()
            .unwrap();

        assert_eq!(router.resolve(Method::Get, "/admin/stats").unwrap().middleware.len(), 1);
        assert!(router.resolve(Method::Get, "/public").unwrap().middleware.is_empty());

        router.handle(Request::get("/public")).await;
        assert!(trace.0.lock().unwrap().is_empty());
        router.handle(Request::get("/admin/stats")).await;
        assert_eq!(*trace.0.lock().unwrap(), vec!["admin"]);
    }

    #[test]
    fn test_failed_branch_drops_its_middleware() {
        let dead_end = Collection::new()
            .middleware(record("dead-end"))
            .get("/only", hello_handler);
        let router = Application::new()
            .mount("/notes", dead_end)
            .get("/notes/:noteId", note_handler)
            .build()
            .unwrap();

        let matched = router.resolve(Method::Get, "/notes/1").unwrap();
        assert!(matched.middleware.is_empty());
        assert_eq!(matched.params.get("noteId"), Some("1"));
    }

    #[tokio::test]
    async fn test_request_and_params_are_injected() {
        let router = Application::new()
            .get("/echo/:word", |req: Request, params: PathParams| async move {
                assert_eq!(req.params, params);
                Response::text(format!("{} {}", req.method, params.get("word").unwrap_or("")))
            })
            .build()
            .unwrap();

        let res = router.handle(Request::get("/echo/hi")).await;
        assert_eq!(res.body_string().as_deref(), Some("GET hi"));
    }

    #[tokio::test]
    async fn test_unresolved_dependency_is_500() {
        #[derive(Clone)]
        struct Missing;

        let router = Application::new()
            .get("/", |_m: Missing| async { Response::ok() })
            .build()
            .unwrap();
        assert!(matches!(
            router.dispatch(Request::get("/")).await,
            Err(RouterError::UnresolvedDependency { .. })
        ));
        assert_eq!(router.handle(Request::get("/")).await.status, 500);
    }

    #[tokio::test]
    async fn test_aborted_request_produces_no_response() {
        use futures::future::AbortHandle;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let router = Application::new()
            .register_global(Arc::clone(&calls))
            .get("/", |calls: Arc<AtomicUsize>| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Response::ok()
            })
            .build()
            .unwrap();

        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();
        assert!(router.handle_abortable(Request::get("/"), registration).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let (_handle, registration) = AbortHandle::new_pair();
        let res = router.handle_abortable(Request::get("/"), registration).await.unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_routes_listing() {
        let notes = Collection::new().get("/", hello_handler).post("/", hello_handler);
        let router = Application::new()
            .get("/", hello_handler)
            .mount("/notes", notes)
            .build()
            .unwrap();
        let listed: Vec<_> = router
            .routes()
            .iter()
            .map(|r| format!("{} {}", r.method, r.full_pattern.normalized()))
            .collect();
        assert_eq!(listed, vec!["GET /", "GET /notes", "POST /notes"]);
    }
}
