//! Typed model for the device model configuration document.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

/// Variable attribute types understood by the device model storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttributeType {
    Actual,
    Target,
    MinSet,
    MaxSet,
}

impl AttributeType {
    /// TYPE_ID encoding used by the VARIABLE_ATTRIBUTE relation.
    pub fn type_id(self) -> i64 {
        match self {
            AttributeType::Actual => 0,
            AttributeType::Target => 1,
            AttributeType::MinSet => 2,
            AttributeType::MaxSet => 3,
        }
    }

    /// Attribute type name as it appears in configuration documents.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeType::Actual => "Actual",
            AttributeType::Target => "Target",
            AttributeType::MinSet => "MinSet",
            AttributeType::MaxSet => "MaxSet",
        }
    }
}

impl FromStr for AttributeType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Actual" => Ok(AttributeType::Actual),
            "Target" => Ok(AttributeType::Target),
            "MinSet" => Ok(AttributeType::MinSet),
            "MaxSet" => Ok(AttributeType::MaxSet),
            other => Err(AppError::UnknownAttributeType(other.to_string())),
        }
    }
}

impl Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw document shape as serialized in the JSON configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawComponent {
    name: String,
    instance: Option<String>,
    evse_id: Option<i64>,
    connector_id: Option<i64>,
    variables: BTreeMap<String, RawVariable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVariable {
    variable_name: String,
    instance: Option<String>,
    attributes: BTreeMap<String, Value>,
}

/// One component entry with its variable attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEntry {
    pub name: String,
    pub instance: Option<String>,
    pub evse_id: Option<i64>,
    pub connector_id: Option<i64>,
    pub variables: Vec<VariableEntry>,
}

/// One variable entry scoped to its parent component.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableEntry {
    pub name: String,
    pub instance: Option<String>,
    /// Attribute values in the textual form written to the VALUE column.
    pub attributes: Vec<(AttributeType, String)>,
}

/// Parsed and validated configuration document.
///
/// Component entries keep their document order. Attribute type names and
/// value shapes are checked here, before any database work happens.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    pub components: Vec<ComponentEntry>,
}

impl ConfigDocument {
    /// Read and validate a configuration document from disk.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for ConfigDocument {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: Vec<RawComponent> = serde_json::from_str(s)?;
        let components = raw.into_iter().map(validate_component).collect::<Result<_, _>>()?;
        Ok(ConfigDocument { components })
    }
}

fn validate_component(raw: RawComponent) -> Result<ComponentEntry, AppError> {
    let mut variables = Vec::with_capacity(raw.variables.len());
    for variable in raw.variables.into_values() {
        variables.push(validate_variable(variable)?);
    }

    Ok(ComponentEntry {
        name: raw.name,
        instance: raw.instance,
        evse_id: raw.evse_id,
        connector_id: raw.connector_id,
        variables,
    })
}

fn validate_variable(raw: RawVariable) -> Result<VariableEntry, AppError> {
    let mut attributes = Vec::with_capacity(raw.attributes.len());
    for (type_name, value) in &raw.attributes {
        let attribute_type = type_name.parse::<AttributeType>()?;
        attributes.push((attribute_type, column_text(&raw.variable_name, type_name, value)?));
    }

    Ok(VariableEntry { name: raw.variable_name, instance: raw.instance, attributes })
}

/// Render a scalar attribute value for the textual VALUE column.
///
/// Booleans become the lowercase literals "true"/"false"; numbers and
/// strings keep their textual form.
fn column_text(variable: &str, type_name: &str, value: &Value) -> Result<String, AppError> {
    match value {
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(AppError::MalformedDocument(
            format!("attribute '{type_name}' of variable '{variable}' must be a scalar value"),
        )),
    }
}
