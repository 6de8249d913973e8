use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::apifunction::{ApiFunction, ParamType, Signature};
use crate::error::{Error, ErrorKind};
use crate::object::{ArgValue, ComputedObject};

#[derive(Debug, Clone)]
struct BoundMethod {
    signature: Arc<Signature>,
    /// True when the first declared parameter has the class's own type,
    /// i.e. the method takes a receiver.
    instance: bool,
}

#[derive(Debug, Clone)]
struct BoundClass {
    type_name: String,
    methods: BTreeMap<String, BoundMethod>,
}

/// Process-wide catalog of server-declared functions, plus the per-class
/// capability table of bound methods.
///
/// Method dispatch on proxy classes is not fixed at compile time; it is
/// extended by the schema the server hands back. Rather than injecting
/// attributes at runtime, unknown-at-compile-time calls route through the
/// explicit lookup-and-invoke indirection here.
#[derive(Debug, Default)]
pub struct ApiRegistry {
    catalog: HashMap<String, Arc<Signature>>,
    bound: HashMap<String, BoundClass>,
}

impl ApiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog with a freshly fetched signature set. Existing
    /// bound class tables are left alone; callers re-syncing a changed
    /// schema reset the affected proxy classes.
    pub fn init(&mut self, signatures: Vec<Signature>) {
        self.catalog = signatures
            .into_iter()
            .map(|sig| (sig.name.clone(), Arc::new(sig)))
            .collect();
    }

    /// Populate the catalog from the schema JSON the server hands back.
    /// Returns how many signatures were loaded.
    pub fn init_from_json(&mut self, json: &str) -> Result<usize, Error> {
        let signatures: Vec<Signature> = serde_json::from_str(json)
            .map_err(|e| Error::new(ErrorKind::Schema, format!("Invalid signature catalog: {}", e)))?;
        let count = signatures.len();
        self.init(signatures);
        Ok(count)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.catalog.contains_key(name)
    }

    pub fn list_functions(&self) -> Vec<String> {
        self.catalog.keys().cloned().collect()
    }

    /// Obtain a callable handle by symbolic name.
    pub fn function(&self, name: &str) -> Result<ApiFunction, Error> {
        self.catalog
            .get(name)
            .map(|sig| ApiFunction::from_signature(Arc::clone(sig)))
            .ok_or_else(|| Error::unknown_function(format!("Unknown API function: {}", name)))
    }

    /// Bind every catalog entry named `namespace.suffix` onto the target
    /// class's method table under `suffix`. A class that is already bound
    /// is left untouched, so losing a concurrent first-call race cannot
    /// double-import.
    pub fn import_api(&mut self, target: &str, namespace: &str, type_name: &str) {
        if self.bound.contains_key(target) {
            return;
        }
        let prefix = format!("{}.", namespace);
        let receiver_type = ParamType::Object(type_name.to_string());
        let mut methods = BTreeMap::new();
        for (name, signature) in &self.catalog {
            if let Some(suffix) = name.strip_prefix(&prefix) {
                let instance = signature
                    .params
                    .first()
                    .map_or(false, |p| p.ty == receiver_type);
                methods.insert(
                    suffix.to_string(),
                    BoundMethod { signature: Arc::clone(signature), instance },
                );
            }
        }
        self.bound.insert(
            target.to_string(),
            BoundClass { type_name: type_name.to_string(), methods },
        );
    }

    /// Remove the target class's bound methods, returning it to the
    /// unbound state.
    pub fn clear_api(&mut self, target: &str) {
        self.bound.remove(target);
    }

    pub fn is_bound(&self, target: &str) -> bool {
        self.bound.contains_key(target)
    }

    /// Names of the methods bound onto the target class, in order.
    pub fn bound_methods(&self, target: &str) -> Vec<String> {
        self.bound
            .get(target)
            .map(|class| class.methods.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Lookup-and-invoke for an instance method: the receiver node is
    /// passed as the bound signature's first declared parameter.
    pub fn invoke_method(
        &self,
        target: &str,
        method: &str,
        receiver: &ComputedObject,
        mut args: BTreeMap<String, ArgValue>,
    ) -> Result<ComputedObject, Error> {
        let bound = self.lookup_bound(target, method)?;
        if !bound.instance {
            return Err(Error::invalid_argument(format!(
                "{}.{} is not an instance method",
                target, method
            )));
        }
        let receiver_param = bound
            .signature
            .params
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        args.insert(receiver_param, ArgValue::Node(Box::new(receiver.clone())));
        ApiFunction::from_signature(Arc::clone(&bound.signature)).call(args)
    }

    /// Lookup-and-invoke for a static method of the bound namespace.
    pub fn invoke_static(
        &self,
        target: &str,
        method: &str,
        args: BTreeMap<String, ArgValue>,
    ) -> Result<ComputedObject, Error> {
        let bound = self.lookup_bound(target, method)?;
        if bound.instance {
            return Err(Error::invalid_argument(format!(
                "{}.{} is an instance method and needs a receiver",
                target, method
            )));
        }
        ApiFunction::from_signature(Arc::clone(&bound.signature)).call(args)
    }

    fn lookup_bound(&self, target: &str, method: &str) -> Result<&BoundMethod, Error> {
        let class = self.bound.get(target).ok_or_else(|| {
            Error::not_initialized(format!(
                "{} has no imported API; initialize it first",
                target
            ))
        })?;
        class.methods.get(method).ok_or_else(|| {
            Error::unknown_function(format!(
                "{}.{} is not bound on {}",
                class.type_name, method, target
            ))
        })
    }

    /// Drop the catalog and every bound class table.
    pub fn clear(&mut self) {
        self.catalog.clear();
        self.bound.clear();
    }
}
