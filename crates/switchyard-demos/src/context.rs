//! Per-request service context.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use switchyard::{BoxFuture, Injector, Middleware, Next, Request, Response};

use crate::store::{BlobStore, Datastore, MemoryBlobStore, MemoryDatastore};

/// Backends shared by every request.
#[derive(Clone)]
pub struct Services {
    pub datastore: Arc<dyn Datastore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl Services {
    pub fn new(datastore: Arc<dyn Datastore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { datastore, blobs }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryDatastore::new()),
            Arc::new(MemoryBlobStore::new()),
        )
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Access to the backends on behalf of one request.
///
/// A background context (request id 0) is bound globally so handlers work
/// without [`ContextMiddleware`]; the middleware shadows it with a context
/// carrying the request's id and path.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: u64,
    path: Option<String>,
    services: Services,
}

impl RequestContext {
    pub fn background(services: Services) -> Self {
        Self {
            request_id: 0,
            path: None,
            services,
        }
    }

    pub fn for_request(request_id: u64, request: &Request, services: Services) -> Self {
        Self {
            request_id,
            path: Some(request.path.clone()),
            services,
        }
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Path of the request this context was created for.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_background(&self) -> bool {
        self.path.is_none()
    }

    pub fn datastore(&self) -> &dyn Datastore {
        self.services.datastore.as_ref()
    }

    pub fn blobs(&self) -> &dyn BlobStore {
        self.services.blobs.as_ref()
    }
}

/// Binds a fresh [`RequestContext`] for every request.
#[derive(Debug, Default)]
pub struct ContextMiddleware {
    issued: AtomicU64,
}

impl Middleware for ContextMiddleware {
    fn handle(&self, mut injector: Injector, next: Next) -> BoxFuture<'static, switchyard::Result<Response>> {
        let request_id = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        Box::pin(async move {
            let request = injector.resolve::<Request>()?;
            let services = injector.resolve::<Services>()?;
            tracing::debug!(request_id, path = %request.path, "request context");
            injector.register_scoped(RequestContext::for_request(request_id, &request, services));
            next.run(injector).await
        })
    }

    fn name(&self) -> &'static str {
        "request_context"
    }
}
