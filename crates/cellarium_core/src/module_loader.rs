//! Behavior module registry and invocation.
//!
//! Behavior code is addressed by a string reference of the form
//! `<module>;<namespace>.<type>;<method>` (the namespace is optional). The
//! reference resolves against an explicit plug-in table:
//!
//! 1. A [`ModuleRegistry`] maps module paths to [`BehaviorModule`]s
//! 2. Each module maps qualified type names to [`BehaviorType`]s
//! 3. Each type maps method names to a [`HookFn`]
//!
//! Resolution happens once, while a world is being configured. Invocation
//! through [`invoke`] isolates faults: an `Err` or a panic inside the module
//! comes back as [`SimError::ModuleExecution`] and the host keeps running.
//!
//! # Example Registration
//!
//! ```
//! use cellarium_core::module_loader::{BehaviorModule, BehaviorType, ModuleRegistry};
//! use cellarium_core::SimulationApi;
//!
//! fn update(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
//!     for cell in api.all_cells().collect::<Vec<_>>() {
//!         cell.update_by_name("age", |age| age + 1.0)?;
//!     }
//!     Ok(())
//! }
//!
//! let mut registry = ModuleRegistry::new();
//! registry.register(
//!     "aging.so",
//!     BehaviorModule::new().with_type("Demo.Aging", BehaviorType::new().with_method("Update", update)),
//! );
//! assert!(registry.resolve_str("aging.so;Demo.Aging;Update").is_ok());
//! ```

use crate::api::SimulationApi;
use crate::error::{Result, SimError};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::str::FromStr;

/// Signature every hook method implements: one argument, the facade.
pub type HookFn = fn(&mut SimulationApi<'_>) -> anyhow::Result<()>;

/// Parsed `<module>;<namespace>.<type>;<method>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleReference {
    pub module: String,
    pub namespace: Option<String>,
    pub type_name: String,
    pub method: String,
}

impl ModuleReference {
    /// Splits on exactly two `;` into three non-empty trimmed segments, then
    /// splits the type segment on its last `.`. Surrounding quotes are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim().trim_matches('"').trim();
        if text.is_empty() {
            return Err(SimError::reference("empty module reference"));
        }

        let parts: Vec<&str> = text.split(';').collect();
        if parts.len() != 3 {
            return Err(SimError::reference(format!(
                "expected <module>;<namespace>.<type>;<method> (namespace optional), found {} segment(s)",
                parts.len()
            )));
        }

        let module = parts[0].trim();
        let type_part = parts[1].trim();
        let method = parts[2].trim();
        if module.is_empty() {
            return Err(SimError::reference("missing module path"));
        }
        if type_part.is_empty() {
            return Err(SimError::reference(
                "missing type name (with or without namespace)",
            ));
        }
        if method.is_empty() {
            return Err(SimError::reference("missing method name"));
        }

        let (namespace, type_name) = match type_part.rfind('.') {
            None => (None, type_part),
            Some(dot) => {
                let ns = type_part[..dot].trim();
                let ty = type_part[dot + 1..].trim();
                if ty.is_empty() {
                    return Err(SimError::reference(
                        "missing type name after the last '.' in the type segment",
                    ));
                }
                ((!ns.is_empty()).then(|| ns.to_string()), ty)
            }
        };

        Ok(Self {
            module: module.to_string(),
            namespace,
            type_name: type_name.to_string(),
            method: method.to_string(),
        })
    }

    /// `Namespace.Type`, or just `Type` without a namespace.
    #[must_use]
    pub fn qualified_type(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.type_name),
            None => self.type_name.clone(),
        }
    }
}

impl FromStr for ModuleReference {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.module, self.qualified_type(), self.method)
    }
}

/// Named methods of one behavior type.
#[derive(Clone, Default)]
pub struct BehaviorType {
    methods: HashMap<String, HookFn>,
}

impl BehaviorType {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>, method: HookFn) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<HookFn> {
        self.methods.get(name).copied()
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for BehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.method_names()).finish()
    }
}

/// Types exported by one module, keyed by qualified type name.
#[derive(Debug, Clone, Default)]
pub struct BehaviorModule {
    types: HashMap<String, BehaviorType>,
}

impl BehaviorModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, qualified_name: impl Into<String>, ty: BehaviorType) -> Self {
        self.types.insert(qualified_name.into(), ty);
        self
    }

    #[must_use]
    pub fn get_type(&self, qualified_name: &str) -> Option<&BehaviorType> {
        self.types.get(qualified_name)
    }
}

/// Resolved hook: the reference it came from plus the callable.
#[derive(Clone)]
pub struct CallableHandle {
    reference: ModuleReference,
    callable: HookFn,
}

impl CallableHandle {
    #[must_use]
    pub fn reference(&self) -> &ModuleReference {
        &self.reference
    }
}

impl fmt::Debug for CallableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallableHandle")
            .field(&self.reference.to_string())
            .finish()
    }
}

/// Plug-in table keyed by module path.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, BehaviorModule>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the module found at `path`.
    pub fn register(&mut self, path: impl Into<String>, module: BehaviorModule) -> &mut Self {
        self.modules.insert(path.into(), module);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Exact path match first, then a match on the file-name component, so
    /// `plugins/growth.so` finds a module registered as `growth.so`.
    #[must_use]
    pub fn find_module(&self, path: &str) -> Option<&BehaviorModule> {
        if let Some(module) = self.modules.get(path) {
            return Some(module);
        }
        let wanted = Path::new(path).file_name()?;
        self.modules
            .iter()
            .find(|(key, _)| Path::new(key.as_str()).file_name() == Some(wanted))
            .map(|(_, module)| module)
    }

    pub fn resolve(&self, reference: &ModuleReference) -> Result<CallableHandle> {
        let module = self
            .find_module(&reference.module)
            .ok_or_else(|| SimError::ModuleNotFound(reference.module.clone()))?;

        let type_name = reference.qualified_type();
        let ty = module
            .get_type(&type_name)
            .ok_or_else(|| SimError::TypeNotFound {
                module: reference.module.clone(),
                type_name: type_name.clone(),
            })?;

        let callable = ty
            .method(&reference.method)
            .ok_or_else(|| SimError::MethodNotFound {
                module: reference.module.clone(),
                type_name,
                method: reference.method.clone(),
            })?;

        Ok(CallableHandle {
            reference: reference.clone(),
            callable,
        })
    }

    /// Parses and resolves in one step.
    pub fn resolve_str(&self, text: &str) -> Result<CallableHandle> {
        self.resolve(&ModuleReference::parse(text)?)
    }
}

/// Calls the hook with the facade, converting errors and panics into
/// [`SimError::ModuleExecution`].
pub fn invoke(handle: &CallableHandle, api: &mut SimulationApi<'_>) -> Result<()> {
    let callable = handle.callable;
    match panic::catch_unwind(AssertUnwindSafe(|| callable(api))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(SimError::execution(
            handle.reference.to_string(),
            format!("{err:#}"),
        )),
        Err(payload) => Err(SimError::execution(
            handle.reference.to_string(),
            panic_message(payload.as_ref()),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "module panicked".to_string()
    }
}
