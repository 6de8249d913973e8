use std::collections::BTreeMap;

use crate::apifunction::ApiFunction;
use crate::types::Value;

/// A promoted argument inside an expression node: either a raw literal
/// that matched the declared parameter type, or a nested node whose value
/// is resolved server-side.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Literal(Value),
    Node(Box<ComputedObject>),
}

impl ArgValue {
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            ArgValue::Literal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&ComputedObject> {
        match self {
            ArgValue::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        ArgValue::Literal(value)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Literal(Value::Number(n))
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Literal(Value::Number(n as f64))
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Literal(Value::String(s.to_string()))
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Literal(Value::String(s))
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Literal(Value::Boolean(b))
    }
}

impl From<ComputedObject> for ArgValue {
    fn from(node: ComputedObject) -> Self {
        ArgValue::Node(Box::new(node))
    }
}

/// A symbolic, not-yet-evaluated computation step: a bound function
/// reference plus its promoted arguments, destined for remote evaluation.
/// Free variables carry a `var_name` and no function.
///
/// Instances are immutable after construction; larger expressions hold
/// them by value as nested arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedObject {
    func: Option<ApiFunction>,
    args: BTreeMap<String, ArgValue>,
    var_name: Option<String>,
}

impl ComputedObject {
    /// An invocation node for `func` over already-promoted arguments.
    pub fn new(func: ApiFunction, args: BTreeMap<String, ArgValue>) -> Self {
        Self::with_var_name(Some(func), args, None)
    }

    pub fn with_var_name(
        func: Option<ApiFunction>,
        args: BTreeMap<String, ArgValue>,
        var_name: Option<String>,
    ) -> Self {
        Self { func, args, var_name }
    }

    /// A free variable, referenced by name within a larger expression.
    pub fn variable<N: Into<String>>(name: N) -> Self {
        Self::with_var_name(None, BTreeMap::new(), Some(name.into()))
    }

    pub fn func(&self) -> Option<&ApiFunction> {
        self.func.as_ref()
    }

    pub fn args(&self) -> &BTreeMap<String, ArgValue> {
        &self.args
    }

    pub fn var_name(&self) -> Option<&str> {
        self.var_name.as_deref()
    }

    /// Declared return type of the bound function, if any. This is the
    /// predicate behind identity-preserving casts: two calls produce the
    /// same type exactly when the declared return-type names are equal.
    pub fn returns(&self) -> Option<&str> {
        self.func.as_ref().map(|f| f.returns())
    }
}
