use std::collections::BTreeMap;
use std::ops::Deref;

use crate::error::{Error, ErrorKind};
use crate::object::{ArgValue, ComputedObject};
use crate::types::Value;
use crate::GLOBAL_REGISTRY;

/// An endpoint argument: epoch milliseconds, a date string, or an
/// expression node producing a date server-side.
#[derive(Debug, Clone, PartialEq)]
pub enum DateRangeArg {
    Number(f64),
    String(String),
    Object(ComputedObject),
}

impl From<f64> for DateRangeArg {
    fn from(n: f64) -> Self {
        DateRangeArg::Number(n)
    }
}

impl From<i64> for DateRangeArg {
    fn from(n: i64) -> Self {
        DateRangeArg::Number(n as f64)
    }
}

impl From<&str> for DateRangeArg {
    fn from(s: &str) -> Self {
        DateRangeArg::String(s.to_string())
    }
}

impl From<String> for DateRangeArg {
    fn from(s: String) -> Self {
        DateRangeArg::String(s)
    }
}

impl From<ComputedObject> for DateRangeArg {
    fn from(node: ComputedObject) -> Self {
        DateRangeArg::Object(node)
    }
}

impl From<DateRange> for DateRangeArg {
    fn from(range: DateRange) -> Self {
        DateRangeArg::Object(range.0)
    }
}

impl From<DateRangeArg> for ArgValue {
    fn from(arg: DateRangeArg) -> Self {
        match arg {
            DateRangeArg::Number(n) => ArgValue::Literal(Value::Number(n)),
            DateRangeArg::String(s) => ArgValue::Literal(Value::String(s)),
            DateRangeArg::Object(node) => ArgValue::Node(Box::new(node)),
        }
    }
}

/// A temporal interval on the remote engine: a start instant (inclusive)
/// and an end instant (exclusive). No date arithmetic happens client-side;
/// constructing one builds a symbolic invocation that the engine evaluates
/// later. When `end` is absent the engine defaults it to start + 1 ms, and
/// `timeZone` only applies to string endpoints (UTC otherwise).
///
/// # Example
/// ```rust
/// use stratus::{DateRange, ParamType, Parameter, Signature};
///
/// stratus::load_signatures(vec![Signature::new(
///     "DateRange",
///     "DateRange",
///     vec![
///         Parameter::new("start", ParamType::Date),
///         Parameter::optional("end", ParamType::Date),
///         Parameter::optional("timeZone", ParamType::String),
///     ],
/// )]).unwrap();
///
/// let range = DateRange::new(1498287600000i64, Some(1498312800000i64.into()), None).unwrap();
/// assert_eq!(range.func().unwrap().name(), "DateRange");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange(ComputedObject);

impl DateRange {
    /// Wrap endpoints into a DateRange invocation.
    ///
    /// If `start` is already a call returning a DateRange and no other
    /// argument is supplied, the node is adopted as-is instead of being
    /// wrapped in a second invocation. Otherwise the arguments are
    /// promoted against the catalog signature; a value that cannot be
    /// promoted fails here, before any node is built.
    pub fn new(
        start: impl Into<DateRangeArg>,
        end: Option<DateRangeArg>,
        time_zone: Option<DateRangeArg>,
    ) -> Result<Self, Error> {
        Self::initialize();

        let start = start.into();
        if end.is_none() && time_zone.is_none() {
            if let DateRangeArg::Object(node) = &start {
                if node.returns() == Some(Self::name()) {
                    // Already a call returning a DateRange: adopt its
                    // func, args and varName rather than re-wrapping.
                    return Ok(Self(ComputedObject::with_var_name(
                        node.func().cloned(),
                        node.args().clone(),
                        node.var_name().map(String::from),
                    )));
                }
            }
        }

        let mut args: BTreeMap<String, ArgValue> = BTreeMap::new();
        args.insert("start".to_string(), start.into());
        if let Some(end) = end {
            args.insert("end".to_string(), end.into());
        }
        if let Some(time_zone) = time_zone {
            args.insert("timeZone".to_string(), time_zone.into());
        }

        let func = GLOBAL_REGISTRY
            .read()
            .map_err(|_| registry_lock_error())?
            .function(Self::name())?;
        Ok(Self(func.call(args)?))
    }

    /// The interval covering all time, as declared by the engine.
    pub fn unbounded() -> Result<Self, Error> {
        Self::initialize();
        let node = GLOBAL_REGISTRY
            .read()
            .map_err(|_| registry_lock_error())?
            .invoke_static(Self::name(), "unbounded", BTreeMap::new())?;
        Self::new(node, None, None)
    }

    /// Imports API functions to this class. Idempotent; the first call
    /// per process binds the namespace, later ones are no-ops.
    pub fn initialize() {
        if let Ok(registry) = GLOBAL_REGISTRY.read() {
            if registry.is_bound(Self::name()) {
                return;
            }
        }
        // import_api no-ops for an already-bound class, so losing the
        // race between the read above and this write is harmless.
        if let Ok(mut registry) = GLOBAL_REGISTRY.write() {
            registry.import_api(Self::name(), Self::name(), Self::name());
        }
    }

    /// Removes imported API functions from this class.
    pub fn reset() {
        if let Ok(mut registry) = GLOBAL_REGISTRY.write() {
            registry.clear_api(Self::name());
        }
    }

    /// The symbolic name of the remote type, doubling as the import
    /// namespace.
    pub fn name() -> &'static str {
        "DateRange"
    }

    /// Invoke a schema-bound instance method on this range; `self` is
    /// passed as the bound signature's receiver parameter.
    pub fn call(
        &self,
        method: &str,
        args: BTreeMap<String, ArgValue>,
    ) -> Result<ComputedObject, Error> {
        GLOBAL_REGISTRY
            .read()
            .map_err(|_| registry_lock_error())?
            .invoke_method(Self::name(), method, &self.0, args)
    }

    pub fn node(&self) -> &ComputedObject {
        &self.0
    }
}

impl Deref for DateRange {
    type Target = ComputedObject;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateRange> for ComputedObject {
    fn from(range: DateRange) -> Self {
        range.0
    }
}

fn registry_lock_error() -> Error {
    Error::new(ErrorKind::Registry, "Failed to acquire registry lock")
}
