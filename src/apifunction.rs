use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::error::Error;
use crate::object::{ArgValue, ComputedObject};

/// Parameter types declared by the server schema. Promotion checks the
/// shape of a raw value against these; it never parses or validates
/// content. A malformed date string is the server's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// An instant: epoch-millisecond number, date string, or node.
    Date,
    Number,
    String,
    Boolean,
    /// Anything goes, nested nodes included.
    Any,
    /// A named engine type; only a node can produce one.
    Object(String),
}

impl<'de> Deserialize<'de> for ParamType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "Date" => ParamType::Date,
            "Number" => ParamType::Number,
            "String" => ParamType::String,
            "Boolean" => ParamType::Boolean,
            "Any" => ParamType::Any,
            _ => ParamType::Object(name),
        })
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Date => write!(f, "Date"),
            ParamType::Number => write!(f, "Number"),
            ParamType::String => write!(f, "String"),
            ParamType::Boolean => write!(f, "Boolean"),
            ParamType::Any => write!(f, "Any"),
            ParamType::Object(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    pub fn new<N: Into<String>>(name: N, ty: ParamType) -> Self {
        Self { name: name.into(), ty, optional: false }
    }

    pub fn optional<N: Into<String>>(name: N, ty: ParamType) -> Self {
        Self { name: name.into(), ty, optional: true }
    }
}

/// One entry of the server-declared function catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Signature {
    pub name: String,
    pub returns: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub description: String,
}

impl Signature {
    pub fn new<N, R>(name: N, returns: R, params: Vec<Parameter>) -> Self
    where
        N: Into<String>,
        R: Into<String>,
    {
        Self {
            name: name.into(),
            returns: returns.into(),
            params,
            description: String::new(),
        }
    }
}

/// A callable handle onto one server-declared function. Calling it builds
/// an expression node; nothing executes until the graph is shipped to the
/// engine.
#[derive(Debug, Clone)]
pub struct ApiFunction {
    signature: Arc<Signature>,
}

impl PartialEq for ApiFunction {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl ApiFunction {
    pub fn from_signature(signature: Arc<Signature>) -> Self {
        Self { signature }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// Declared return type name.
    pub fn returns(&self) -> &str {
        &self.signature.returns
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Promote raw arguments: check every supplied value against the
    /// declared parameter list. Unknown names, missing required
    /// parameters, and values whose shape does not fit the declared type
    /// all fail with `InvalidArgument`, before any node is built.
    pub fn promote_args(
        &self,
        args: BTreeMap<String, ArgValue>,
    ) -> Result<BTreeMap<String, ArgValue>, Error> {
        let sig = &self.signature;
        for (name, value) in &args {
            let param = sig.params.iter().find(|p| p.name == *name).ok_or_else(|| {
                Error::invalid_argument(format!("{}: unknown argument '{}'", sig.name, name))
            })?;
            if !shape_matches(&param.ty, value) {
                return Err(Error::invalid_argument(format!(
                    "{}: cannot promote {} to {} for argument '{}'",
                    sig.name,
                    shape_name(value),
                    param.ty,
                    name
                )));
            }
        }
        for param in &sig.params {
            if !param.optional && !args.contains_key(&param.name) {
                return Err(Error::invalid_argument(format!(
                    "{}: missing required argument '{}'",
                    sig.name, param.name
                )));
            }
        }
        Ok(args)
    }

    /// Build the invocation node over already-promoted arguments.
    pub fn apply(&self, args: BTreeMap<String, ArgValue>) -> ComputedObject {
        ComputedObject::new(self.clone(), args)
    }

    /// Promote, then apply.
    pub fn call(&self, args: BTreeMap<String, ArgValue>) -> Result<ComputedObject, Error> {
        let promoted = self.promote_args(args)?;
        Ok(self.apply(promoted))
    }
}

fn shape_matches(ty: &ParamType, value: &ArgValue) -> bool {
    use crate::types::Value;
    match (ty, value) {
        (ParamType::Any, _) => true,
        // Nested nodes are typed server-side at evaluation.
        (_, ArgValue::Node(_)) => true,
        (ParamType::Date, ArgValue::Literal(Value::Number(_))) => true,
        (ParamType::Date, ArgValue::Literal(Value::String(_))) => true,
        (ParamType::Number, ArgValue::Literal(Value::Number(_))) => true,
        (ParamType::String, ArgValue::Literal(Value::String(_))) => true,
        (ParamType::Boolean, ArgValue::Literal(Value::Boolean(_))) => true,
        _ => false,
    }
}

fn shape_name(value: &ArgValue) -> &'static str {
    match value {
        ArgValue::Literal(v) => v.type_name(),
        ArgValue::Node(_) => "ComputedObject",
    }
}
