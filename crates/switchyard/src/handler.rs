//! Handlers whose arguments are supplied by the injector.
//!
//! Any `Fn(A, B, ..) -> impl Future<Output = Response>` with up to eight
//! arguments is a [`Handler`]. Each argument type is looked up in the request
//! [`Injector`] by type, in declaration order:
//!
//! ```ignore
//! async fn note_show(repo: NoteRepository, params: PathParams, render: Render) -> Response {
//!     // ...
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::injector::Injector;
use crate::middleware::BoxFuture;
use crate::response::Response;

/// A function that can be invoked with arguments resolved from an injector.
///
/// `Args` is the tuple of argument types; it only exists to keep the blanket
/// implementations for different arities apart.
pub trait Handler<Args>: Clone + Send + Sync + 'static {
    /// Type names of the declared inputs, in order.
    fn dependencies() -> Vec<&'static str>;

    /// Resolves every input and starts the call.
    ///
    /// Nothing is invoked unless all inputs resolve.
    fn call(&self, injector: &Injector) -> Result<BoxFuture<'static, Response>>;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<F, Fut, $($arg,)*> Handler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Response> + Send + 'static,
            $($arg: Clone + Send + Sync + 'static,)*
        {
            fn dependencies() -> Vec<&'static str> {
                vec![$(std::any::type_name::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn call(&self, injector: &Injector) -> Result<BoxFuture<'static, Response>> {
                $(let $arg = injector.resolve::<$arg>()?;)*
                Ok(Box::pin((self)($($arg),*)))
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);
impl_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8);

type ErasedCall = dyn Fn(&Injector) -> Result<BoxFuture<'static, Response>> + Send + Sync;

/// A type-erased handler stored in a route.
#[derive(Clone)]
pub struct BoxedHandler {
    call: Arc<ErasedCall>,
    dependencies: Arc<[&'static str]>,
}

impl BoxedHandler {
    pub fn new<H, Args>(handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        Self {
            call: Arc::new(move |injector: &Injector| handler.call(injector)),
            dependencies: H::dependencies().into(),
        }
    }

    /// Declared input type names.
    pub fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }
}

impl std::fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedHandler")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Resolves the handler's inputs from `injector` and awaits its response.
///
/// Fails with [`RouterError::UnresolvedDependency`](crate::RouterError) if
/// an input has no binding. Whatever the handler returns is passed through.
pub async fn invoke(handler: &BoxedHandler, injector: &Injector) -> Result<Response> {
    let call = (handler.call)(injector)?;
    Ok(call.await)
}
