//! Class resolution.
//!
//! The back-end discovers callees lazily while walking the call graph, so
//! classes are loaded on demand through this trait rather than handed over
//! up front.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::class::IrClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NotFound(String),
    Io { class: String, message: String },
    Parse { class: String, message: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound(name) => write!(f, "class '{name}' not found"),
            ResolveError::Io { class, message } => {
                write!(f, "failed to read class '{class}': {message}")
            }
            ResolveError::Parse { class, message } => {
                write!(f, "failed to parse class '{class}': {message}")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

pub trait ClassResolver {
    fn resolve(&self, name: &str) -> Result<Arc<IrClass>, ResolveError>;
}

/// Resolver over a fixed set of in-memory classes.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    classes: HashMap<String, Arc<IrClass>>,
}

impl MemoryResolver {
    pub fn new(classes: impl IntoIterator<Item = IrClass>) -> MemoryResolver {
        let classes = classes
            .into_iter()
            .map(|c| (c.name.clone(), Arc::new(c)))
            .collect();
        MemoryResolver { classes }
    }

    pub fn insert(&mut self, class: IrClass) {
        self.classes.insert(class.name.clone(), Arc::new(class));
    }
}

impl ClassResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Result<Arc<IrClass>, ResolveError> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}

/// Resolver that loads `<root>/<fully.qualified.Name>.json` on demand and
/// caches the result.
pub struct DirResolver {
    root: PathBuf,
    cache: RefCell<HashMap<String, Arc<IrClass>>>,
}

impl DirResolver {
    pub fn new(root: impl Into<PathBuf>) -> DirResolver {
        DirResolver { root: root.into(), cache: RefCell::new(HashMap::new()) }
    }
}

impl ClassResolver for DirResolver {
    fn resolve(&self, name: &str) -> Result<Arc<IrClass>, ResolveError> {
        if let Some(class) = self.cache.borrow().get(name) {
            return Ok(class.clone());
        }
        let path = self.root.join(format!("{name}.json"));
        if !path.is_file() {
            return Err(ResolveError::NotFound(name.to_string()));
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ResolveError::Io {
            class: name.to_string(),
            message: e.to_string(),
        })?;
        let class: IrClass = serde_json::from_str(&text).map_err(|e| ResolveError::Parse {
            class: name.to_string(),
            message: e.to_string(),
        })?;
        if class.name != name {
            return Err(ResolveError::Parse {
                class: name.to_string(),
                message: format!("file declares class '{}'", class.name),
            });
        }
        let class = Arc::new(class);
        self.cache.borrow_mut().insert(name.to_string(), class.clone());
        Ok(class)
    }
}
