//! Typed dependency injection with a global and a per-request scope.
//!
//! Values are keyed by their exact [`TypeId`]. A request injector looks in
//! its own scope first and falls back to the global scope, so middleware can
//! shadow a global binding for the rest of one request:
//!
//! ```
//! use std::sync::Arc;
//! use switchyard::{Bindings, Injector};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Greeting(&'static str);
//!
//! let mut globals = Bindings::new();
//! globals.insert(Greeting("hello"));
//!
//! let mut injector = Injector::with_globals(Arc::new(globals));
//! assert_eq!(injector.resolve::<Greeting>().unwrap(), Greeting("hello"));
//!
//! injector.register_scoped(Greeting("bonjour"));
//! assert_eq!(injector.resolve::<Greeting>().unwrap(), Greeting("bonjour"));
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RouterError};

#[derive(Clone)]
struct Binding {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// One scope's set of bindings, at most one per type.
#[derive(Clone, Default)]
pub struct Bindings {
    values: HashMap<TypeId, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` under its type, replacing any earlier binding.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(
            TypeId::of::<T>(),
            Binding {
                type_name: type_name::<T>(),
                value: Arc::new(value),
            },
        );
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|binding| binding.value.downcast_ref::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the bound types, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.values.values().map(|b| b.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_names()).finish()
    }
}

/// A request injector layered over shared global bindings.
///
/// The router creates one per request and moves it through the middleware
/// chain, so a request scope is never visible to another request. The type
/// is deliberately not `Clone`.
#[derive(Debug, Default)]
pub struct Injector {
    global: Arc<Bindings>,
    scoped: Bindings,
}

impl Injector {
    /// Creates an injector with empty scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request injector over the given global scope.
    pub fn with_globals(global: Arc<Bindings>) -> Self {
        Self {
            global,
            scoped: Bindings::new(),
        }
    }

    /// Binds a value in the global scope.
    ///
    /// Globals shared with other requests are never mutated in place: if the
    /// global scope is shared, this injector gets its own copy first.
    pub fn register_global<T: Send + Sync + 'static>(&mut self, value: T) {
        Arc::make_mut(&mut self.global).insert(value);
    }

    /// Binds a value for the remainder of this request.
    pub fn register_scoped<T: Send + Sync + 'static>(&mut self, value: T) {
        self.scoped.insert(value);
    }

    /// Resolves a value of type `T`, request scope first.
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.get::<T>()
            .cloned()
            .ok_or(RouterError::UnresolvedDependency {
                type_name: type_name::<T>(),
            })
    }

    /// Borrows the binding for `T`, request scope first.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.scoped.get::<T>().or_else(|| self.global.get::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.scoped.contains::<T>() || self.global.contains::<T>()
    }

    pub fn global(&self) -> &Bindings {
        &self.global
    }

    pub fn scoped(&self) -> &Bindings {
        &self.scoped
    }
}
