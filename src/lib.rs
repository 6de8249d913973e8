pub mod apifunction;
pub mod daterange;
pub mod error;
pub mod object;
pub mod registry;
pub mod serializer;
pub mod types;

pub use apifunction::{ApiFunction, ParamType, Parameter, Signature};
pub use daterange::{DateRange, DateRangeArg};
pub use error::{Error, ErrorKind};
pub use object::{ArgValue, ComputedObject};
pub use registry::ApiRegistry;
pub use types::Value;
use std::sync::{Arc, RwLock};

// Global function registry
lazy_static::lazy_static! {
    pub(crate) static ref GLOBAL_REGISTRY: Arc<RwLock<ApiRegistry>> = Arc::new(RwLock::new(ApiRegistry::new()));
}

/// Populate the process-wide registry with a server-declared signature
/// set, replacing whatever catalog was loaded before. Proxy classes bound
/// against an older catalog should be reset before reuse.
pub fn load_signatures(signatures: Vec<Signature>) -> Result<(), Error> {
    let mut registry = GLOBAL_REGISTRY.write()
        .map_err(|_| Error::new(ErrorKind::Registry, "Failed to acquire registry lock"))?;
    registry.init(signatures);
    Ok(())
}

/// Populate the registry from the schema JSON the server hands back.
/// Returns how many signatures were loaded.
pub fn load_signatures_json(json: &str) -> Result<usize, Error> {
    let mut registry = GLOBAL_REGISTRY.write()
        .map_err(|_| Error::new(ErrorKind::Registry, "Failed to acquire registry lock"))?;
    registry.init_from_json(json)
}

/// Drop the catalog and every bound class table.
pub fn clear_registry() -> Result<(), Error> {
    let mut registry = GLOBAL_REGISTRY.write()
        .map_err(|_| Error::new(ErrorKind::Registry, "Failed to acquire registry lock"))?;
    registry.clear();
    Ok(())
}

/// Check whether a proxy class currently has an imported API.
pub fn is_bound(target: &str) -> bool {
    if let Ok(registry) = GLOBAL_REGISTRY.read() {
        registry.is_bound(target)
    } else {
        false
    }
}

/// Names of the methods bound onto a proxy class, in order.
pub fn bound_methods(target: &str) -> Vec<String> {
    if let Ok(registry) = GLOBAL_REGISTRY.read() {
        registry.bound_methods(target)
    } else {
        Vec::new()
    }
}

/// Check whether a symbolic function name is in the catalog.
pub fn has_function(name: &str) -> bool {
    if let Ok(registry) = GLOBAL_REGISTRY.read() {
        registry.has_function(name)
    } else {
        false
    }
}

/// List all catalog function names.
pub fn list_functions() -> Vec<String> {
    if let Ok(registry) = GLOBAL_REGISTRY.read() {
        registry.list_functions()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_roundtrip() {
        let json = r#"[
            {"name": "DateRange", "returns": "DateRange",
             "params": [{"name": "start", "type": "Date"},
                        {"name": "end", "type": "Date", "optional": true},
                        {"name": "timeZone", "type": "String", "optional": true}]}
        ]"#;
        assert_eq!(load_signatures_json(json).unwrap(), 1);
        assert!(has_function("DateRange"));
        assert_eq!(list_functions(), vec!["DateRange".to_string()]);
        clear_registry().unwrap();
        assert!(!has_function("DateRange"));
    }
}
