//! Handler registry: dispatch keys to registered handlers.
//!
//! Methods are keyed by exact name; resources by path template and are
//! searched in registration order, so the first matching template wins.
//! One `RwLock` guards both tables. Lookups take the read side and hand
//! back an `Arc` to the entry, so handlers always run with no lock held.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::Value;

use crate::coerce::{Args, ParamKind, ParamSpec};
use crate::error::{HandlerError, RegistryError};
use crate::pattern::PathPattern;

/// Type-erased handler. Arguments are already coerced; the result is any
/// JSON value.
pub type HandlerFn = Arc<dyn Fn(Args) -> Result<Value, HandlerError> + Send + Sync>;

/// A registered method.
pub struct MethodEntry {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
    pub handler: HandlerFn,
}

/// A registered resource.
pub struct ResourceEntry {
    pub pattern: PathPattern,
    pub description: String,
    /// One spec per placeholder, in placeholder order.
    pub params: Vec<ParamSpec>,
    pub handler: HandlerFn,
}

/// Discovery view of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInfo {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

/// Discovery view of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub template: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

#[derive(Default)]
struct Tables {
    methods: HashMap<String, Arc<MethodEntry>>,
    resources: Vec<Arc<ResourceEntry>>,
}

/// Concurrency-safe registry of methods and resources.
#[derive(Default)]
pub struct HandlerRegistry {
    tables: RwLock<Tables>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method under `name`. The handler's return value is
    /// serialized to JSON when the method is called.
    pub fn register_method<F, R>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Serialize,
    {
        let name = name.into();
        if let Some(param) = first_repeated_name(&params) {
            return Err(RegistryError::DuplicateParameter {
                key: name,
                param: param.to_string(),
            });
        }
        let entry = MethodEntry {
            name: name.clone(),
            description: description.into(),
            params,
            handler: erase(handler),
        };

        let mut tables = self.write();
        if tables.methods.contains_key(&name) {
            return Err(RegistryError::DuplicateKey(name));
        }
        tracing::debug!(method = %name, "Registered method");
        tables.methods.insert(name, Arc::new(entry));
        Ok(())
    }

    /// Register a resource whose placeholders are all bound as strings.
    pub fn register_resource<F, R>(
        &self,
        template: &str,
        description: impl Into<String>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Serialize,
    {
        let pattern = PathPattern::compile(template)?;
        let kinds = vec![ParamKind::String; pattern.names().len()];
        self.insert_resource(pattern, description.into(), &kinds, erase(handler))
    }

    /// Register a resource with an explicit kind for each placeholder, in
    /// placeholder order.
    pub fn register_typed_resource<F, R>(
        &self,
        template: &str,
        description: impl Into<String>,
        kinds: &[ParamKind],
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Serialize,
    {
        let pattern = PathPattern::compile(template)?;
        self.insert_resource(pattern, description.into(), kinds, erase(handler))
    }

    fn insert_resource(
        &self,
        pattern: PathPattern,
        description: String,
        kinds: &[ParamKind],
        handler: HandlerFn,
    ) -> Result<(), RegistryError> {
        if kinds.len() != pattern.names().len() {
            return Err(RegistryError::InvalidPattern {
                template: pattern.template().to_string(),
                reason: format!(
                    "{} placeholder(s) but {} kind(s) declared",
                    pattern.names().len(),
                    kinds.len()
                ),
            });
        }
        let params = pattern
            .names()
            .iter()
            .zip(kinds)
            .map(|(name, kind)| ParamSpec::new(name.clone(), *kind))
            .collect();

        let mut tables = self.write();
        if tables.resources.iter().any(|r| r.pattern.key() == pattern.key()) {
            return Err(RegistryError::DuplicateKey(pattern.template().to_string()));
        }
        tracing::debug!(template = %pattern.template(), "Registered resource");
        tables.resources.push(Arc::new(ResourceEntry {
            pattern,
            description,
            params,
            handler,
        }));
        Ok(())
    }

    /// Look up a method by exact name.
    pub fn lookup_method(&self, name: &str) -> Option<Arc<MethodEntry>> {
        self.read().methods.get(name).cloned()
    }

    /// Find the first resource, in registration order, whose template
    /// matches `path`, together with the raw captures.
    pub fn lookup_resource(&self, path: &str) -> Option<(Arc<ResourceEntry>, Vec<String>)> {
        self.read().resources.iter().find_map(|entry| {
            entry
                .pattern
                .matches(path)
                .map(|captures| (Arc::clone(entry), captures))
        })
    }

    /// All methods, sorted by name.
    pub fn methods(&self) -> Vec<MethodInfo> {
        let mut list: Vec<MethodInfo> = self
            .read()
            .methods
            .values()
            .map(|m| MethodInfo {
                name: m.name.clone(),
                description: m.description.clone(),
                params: m.params.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// All resources, in registration order.
    pub fn resources(&self) -> Vec<ResourceInfo> {
        self.read()
            .resources
            .iter()
            .map(|r| ResourceInfo {
                template: r.pattern.template().to_string(),
                description: r.description.clone(),
                params: r.params.clone(),
            })
            .collect()
    }

    // Handlers never run under the lock, so a poisoned lock still holds
    // consistent tables.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn erase<F, R>(handler: F) -> HandlerFn
where
    F: Fn(Args) -> Result<R, HandlerError> + Send + Sync + 'static,
    R: Serialize,
{
    Arc::new(move |args| {
        let out = handler(args)?;
        serde_json::to_value(out)
            .map_err(|e| HandlerError::new(format!("Failed to serialize result: {}", e)))
    })
}

fn first_repeated_name(params: &[ParamSpec]) -> Option<&str> {
    params.iter().enumerate().find_map(|(i, spec)| {
        params[..i]
            .iter()
            .any(|earlier| earlier.name == spec.name)
            .then_some(spec.name.as_str())
    })
}
