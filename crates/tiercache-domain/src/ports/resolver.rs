//! Resolver Port
//!
//! Dynamic lookup of callables by `(module, class, function)`. The object
//! cache memoizes whatever a [`Resolver`] returns; how names map onto code
//! (registration table, plugin registry) is the implementation's business.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Parameters handed to a component constructor
pub type ConstructorParameters = Map<String, Value>;

/// Free function handle
pub type FunctionHandle = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Instance whose methods can be resolved and invoked by name
///
/// Components are shared across threads once cached, so `configure` must
/// use interior mutability.
pub trait Component: Send + Sync {
    /// Re-run construction with new parameters
    fn configure(&self, params: &ConstructorParameters) -> Result<()>;

    /// Whether `method` can be invoked on this instance
    fn has_method(&self, method: &str) -> bool;

    /// Invoke `method` with JSON arguments
    fn invoke(&self, method: &str, args: Value) -> Result<Value>;
}

/// A resolved callable
#[derive(Clone)]
pub enum Callable {
    /// Module-level function
    Function(FunctionHandle),
    /// Method bound to a component instance
    Method {
        /// Receiver
        instance: Arc<dyn Component>,
        /// Method name
        method: String,
    },
}

impl Callable {
    /// Call with JSON arguments
    pub fn call(&self, args: Value) -> Result<Value> {
        match self {
            Self::Function(function) => function(args),
            Self::Method { instance, method } => instance.invoke(method, args),
        }
    }

    /// Bound instance, if this is a method
    pub fn instance(&self) -> Option<&Arc<dyn Component>> {
        match self {
            Self::Function(_) => None,
            Self::Method { instance, .. } => Some(instance),
        }
    }

    /// Whether this is a method bound to an instance
    pub fn is_bound_method(&self) -> bool {
        matches!(self, Self::Method { .. })
    }

    /// Whether both callables share the same function or instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            (
                Self::Method {
                    instance: a,
                    method: m,
                },
                Self::Method {
                    instance: b,
                    method: n,
                },
            ) => Arc::ptr_eq(a, b) && m == n,
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Callable::Function"),
            Self::Method { method, .. } => f
                .debug_struct("Callable::Method")
                .field("method", method)
                .finish_non_exhaustive(),
        }
    }
}

/// What to resolve
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveRequest {
    /// Module name
    pub module_name: String,
    /// Class name, when resolving a method
    pub class_name: Option<String>,
    /// Function or method name
    pub function_name: String,
    /// Constructor parameters for class instances
    pub constructor_parameters: Option<ConstructorParameters>,
}

impl ResolveRequest {
    /// Request a module-level function
    pub fn function<M: Into<String>, F: Into<String>>(module_name: M, function_name: F) -> Self {
        Self {
            module_name: module_name.into(),
            function_name: function_name.into(),
            ..Self::default()
        }
    }

    /// Request a method of a class
    pub fn method<M: Into<String>, C: Into<String>, F: Into<String>>(
        module_name: M,
        class_name: C,
        function_name: F,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            class_name: Some(class_name.into()),
            function_name: function_name.into(),
            constructor_parameters: None,
        }
    }

    /// Attach constructor parameters
    pub fn with_constructor_parameters(mut self, params: ConstructorParameters) -> Self {
        self.constructor_parameters = Some(params);
        self
    }

    /// Trimmed copy of the request
    ///
    /// Module and function names are required; an empty class name counts
    /// as no class.
    pub fn normalized(&self) -> Result<Self> {
        let module_name = self.module_name.trim();
        let function_name = self.function_name.trim();
        if module_name.is_empty() || function_name.is_empty() {
            return Err(Error::invalid_argument(
                "module_name and function_name are required",
            ));
        }

        Ok(Self {
            module_name: module_name.to_string(),
            class_name: self
                .class_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            function_name: function_name.to_string(),
            constructor_parameters: self.constructor_parameters.clone(),
        })
    }
}

/// Dynamic resolution capability
pub trait Resolver: Send + Sync {
    /// Resolve the callable named by `request`
    ///
    /// # Errors
    /// `Error::InvalidArgument` for malformed requests and `Error::NotFound`
    /// when the module, class or function does not exist.
    fn resolve(&self, request: &ResolveRequest) -> Result<Callable>;
}

impl<F> Resolver for F
where
    F: Fn(&ResolveRequest) -> Result<Callable> + Send + Sync,
{
    fn resolve(&self, request: &ResolveRequest) -> Result<Callable> {
        self(request)
    }
}
