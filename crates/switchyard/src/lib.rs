//! # switchyard
//!
//! A small request pipeline: routing, mounted route collections, middleware
//! chains with explicit continuations, and handlers whose arguments are
//! resolved by type from a per-request injector.
//!
//! This crate provides:
//! - Path patterns with `:name` parameters
//! - Collections of routes mounted under path prefixes
//! - Ordered middleware, outermost collection first, with short-circuiting
//! - A two-level (global / request) typed injector
//! - Handlers taking any injected types as arguments
//!
//! ## Quick Start
//!
//! ```ignore
//! use switchyard::{Application, Collection, Injector, Next, PathParams, Response};
//!
//! async fn show_note(params: PathParams, repo: NoteRepository) -> Response {
//!     // ...
//! }
//!
//! let notes = Collection::new()
//!     .middleware(|mut injector: Injector, next: Next| async move {
//!         injector.register_scoped(NoteRepository::new());
//!         next.run(injector).await
//!     })
//!     .get("/:noteId", show_note);
//!
//! let router = Application::new()
//!     .register_global(Render::default())
//!     .get("/", home)
//!     .mount("/notes", notes)
//!     .build()?;
//!
//! let response = router.handle(Request::get("/notes/42")).await;
//! ```
//!
//! ## Precedence
//!
//! Inside a collection, routes and mounts are tried in registration order
//! and the first full match wins. Register literal routes such as
//! `/notes/latest` before `/notes/:noteId` if both should be reachable.
//!
//! ## Injection
//!
//! Every request injector starts with the [`Request`] and its
//! [`PathParams`]. Middleware adds request-scoped values with
//! [`Injector::register_scoped`]; these shadow globals registered with
//! [`Application::register_global`].

mod error;
mod handler;
mod injector;
mod middleware;
mod path;
mod request;
mod response;
mod router;

pub use error::{Result, RouterError};
pub use handler::{BoxedHandler, Handler, invoke};
pub use injector::{Bindings, Injector};
pub use middleware::{
    AuthGuard, BoxFuture, LoggingMiddleware, Middleware, MiddlewareChain, Next, Outcome,
};
pub use path::{PARAM_SIGIL, PathPattern, PathSegment};
pub use request::{Method, PathParams, Request};
pub use response::Response;
pub use router::{Application, Collection, MatchResult, Route, Router};
