//! Registration-table resolver
//!
//! ## Example
//!
//! ```
//! use tiercache_providers::resolver::StaticResolver;
//! use tiercache_providers::Resolver;
//! use tiercache_domain::ports::ResolveRequest;
//! use serde_json::json;
//!
//! let resolver = StaticResolver::new()
//!     .with_function("billing", "total", |args| Ok(json!(args["n"].as_i64().unwrap_or(0) * 2)));
//!
//! let callable = resolver.resolve(&ResolveRequest::function("billing", "total")).unwrap();
//! assert_eq!(callable.call(json!({"n": 21})).unwrap(), json!(42));
//! ```

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tiercache_domain::error::{Error, Result};
use tiercache_domain::ports::{
    Callable, Component, ConstructorParameters, FunctionHandle, ResolveRequest, Resolver,
};
use tracing::debug;

/// Builds a component instance from constructor parameters
pub type ComponentFactory =
    Arc<dyn Fn(&ConstructorParameters) -> Result<Arc<dyn Component>> + Send + Sync>;

#[derive(Default, Clone)]
struct ModuleTable {
    functions: HashMap<String, FunctionHandle>,
    classes: HashMap<String, ComponentFactory>,
}

/// Resolver backed by an explicit registration table
///
/// Resolving a method constructs a fresh instance through the registered
/// factory on every call; memoizing the result is the object cache's job.
#[derive(Default)]
pub struct StaticResolver {
    modules: RwLock<HashMap<String, ModuleTable>>,
}

impl StaticResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module-level function
    pub fn register_function<F>(&self, module_name: &str, function_name: &str, function: F)
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        if let Ok(mut modules) = self.modules.write() {
            modules
                .entry(module_name.to_string())
                .or_default()
                .functions
                .insert(function_name.to_string(), Arc::new(function));
        }
    }

    /// Register a class by its factory
    pub fn register_class<F>(&self, module_name: &str, class_name: &str, factory: F)
    where
        F: Fn(&ConstructorParameters) -> Result<Arc<dyn Component>> + Send + Sync + 'static,
    {
        if let Ok(mut modules) = self.modules.write() {
            modules
                .entry(module_name.to_string())
                .or_default()
                .classes
                .insert(class_name.to_string(), Arc::new(factory));
        }
    }

    /// Builder form of [`Self::register_function`]
    #[must_use]
    pub fn with_function<F>(self, module_name: &str, function_name: &str, function: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_function(module_name, function_name, function);
        self
    }

    /// Builder form of [`Self::register_class`]
    #[must_use]
    pub fn with_class<F>(self, module_name: &str, class_name: &str, factory: F) -> Self
    where
        F: Fn(&ConstructorParameters) -> Result<Arc<dyn Component>> + Send + Sync + 'static,
    {
        self.register_class(module_name, class_name, factory);
        self
    }

    /// Registered module names, sorted
    pub fn modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .read()
            .map(|modules| modules.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn module(&self, module_name: &str) -> Result<ModuleTable> {
        let modules = self
            .modules
            .read()
            .map_err(|_| Error::internal("Resolver registry lock poisoned"))?;
        modules
            .get(module_name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("module '{module_name}'")))
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, request: &ResolveRequest) -> Result<Callable> {
        let request = request.normalized()?;
        let module = self.module(&request.module_name)?;

        let Some(class_name) = request.class_name.as_deref() else {
            return module
                .functions
                .get(&request.function_name)
                .cloned()
                .map(Callable::Function)
                .ok_or_else(|| {
                    Error::not_found(format!(
                        "function '{}' in module '{}'",
                        request.function_name, request.module_name
                    ))
                });
        };

        let factory = module.classes.get(class_name).ok_or_else(|| {
            Error::not_found(format!(
                "class '{class_name}' in module '{}'",
                request.module_name
            ))
        })?;

        let params = request.constructor_parameters.clone().unwrap_or_default();
        let instance = factory(&params)?;
        if !instance.has_method(&request.function_name) {
            return Err(Error::not_found(format!(
                "method '{}' on '{}.{class_name}'",
                request.function_name, request.module_name
            )));
        }

        debug!(
            module = %request.module_name,
            class = class_name,
            function = %request.function_name,
            "Resolved bound method"
        );
        Ok(Callable::Method {
            instance,
            method: request.function_name,
        })
    }
}

impl fmt::Debug for StaticResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticResolver")
            .field("modules", &self.modules())
            .finish()
    }
}
