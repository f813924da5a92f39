//! Catalog of editing tools the model may call.
//!
//! The catalog is pure data, built once per process. It is rendered into the
//! prompt, handed to the model as function definitions, and used to validate
//! and coerce the arguments of whatever the model returns.

mod tools;

use serde_json::{json, Map, Value};
use std::sync::LazyLock;

static CATALOG: LazyLock<Vec<ToolDescriptor>> = LazyLock::new(tools::build_catalog);

/// Primitive type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    /// Array of strings.
    StringArray,
}

impl PropertyType {
    fn to_json_schema(self) -> Value {
        match self {
            PropertyType::String => json!({ "type": "string" }),
            PropertyType::Integer => json!({ "type": "integer" }),
            PropertyType::Number => json!({ "type": "number" }),
            PropertyType::Boolean => json!({ "type": "boolean" }),
            PropertyType::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
        }
    }
}

/// A single named argument of a tool.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyType,
    pub minimum: Option<i64>,
    pub default: Option<i64>,
    /// Allowed values for string properties. Empty means unrestricted.
    pub allowed: &'static [&'static str],
}

impl PropertySpec {
    pub fn new(name: &'static str, kind: PropertyType) -> Self {
        Self {
            name,
            kind,
            minimum: None,
            default: None,
            allowed: &[],
        }
    }

    pub fn min(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn default_value(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = self.kind.to_json_schema();
        if let Value::Object(ref mut map) = schema {
            if let Some(minimum) = self.minimum {
                map.insert("minimum".to_string(), json!(minimum));
            }
            if let Some(default) = self.default {
                map.insert("default".to_string(), json!(default));
            }
            if !self.allowed.is_empty() {
                map.insert("enum".to_string(), json!(self.allowed));
            }
        }
        schema
    }
}

/// Argument schema of a tool.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSchema {
    pub properties: Vec<PropertySpec>,
    pub required: Vec<&'static str>,
    pub additional_properties: bool,
}

impl ArgumentSchema {
    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|p| (p.name.to_string(), p.to_json_schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !self.required.is_empty() {
            schema.insert("required".to_string(), json!(self.required));
        }
        if self.additional_properties {
            schema.insert("additionalProperties".to_string(), json!(true));
        }
        Value::Object(schema)
    }
}

/// An executable editing operation.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Stable name the model returns in `function_call.function_name`.
    pub name: &'static str,
    pub description: &'static str,
    pub argument_schema: ArgumentSchema,
}

impl ToolDescriptor {
    /// Render as `{name, description, arguments}`.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "arguments": self.argument_schema.to_json_schema(),
        })
    }
}

/// All tools, in a fixed order.
pub fn list_tools() -> &'static [ToolDescriptor] {
    CATALOG.as_slice()
}

/// Find a tool by its exact name.
pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    list_tools().iter().find(|t| t.name == name)
}

/// Compact JSON rendering of the catalog for embedding into prompts.
pub fn catalog_json() -> String {
    let tools: Vec<Value> = list_tools().iter().map(ToolDescriptor::to_json).collect();
    Value::Array(tools).to_string()
}

/// Get OpenAI function/tool definitions for the catalog.
pub fn to_function_tools() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    list_tools()
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.to_string(),
                description: Some(tool.description.to_string()),
                parameters: Some(tool.argument_schema.to_json_schema()),
                strict: None,
            },
        })
        .collect()
}

/// Coerce loosely-typed argument values to the types the tool declares.
///
/// Models regularly send numbers as strings ("2.5") and booleans as words.
/// Values that cannot be coerced, and properties the tool does not declare,
/// are left untouched.
pub fn coerce_arguments(tool: &ToolDescriptor, args: &mut Map<String, Value>) {
    for (key, value) in args.iter_mut() {
        let Some(spec) = tool.argument_schema.property(key) else {
            continue;
        };
        if let Some(coerced) = coerce_value(spec.kind, value) {
            *value = coerced;
        }
    }
}

fn coerce_value(kind: PropertyType, value: &Value) -> Option<Value> {
    match (kind, value) {
        (PropertyType::Number, Value::String(s)) => {
            let n = s.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
            Some(number_value(n))
        }
        (PropertyType::Integer, Value::String(s)) => {
            let n = s.trim().parse::<f64>().ok()?;
            integer_value(n)
        }
        (PropertyType::Integer, Value::Number(num)) if !num.is_i64() && !num.is_u64() => {
            integer_value(num.as_f64()?)
        }
        (PropertyType::Boolean, Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(Value::Bool(true)),
            "false" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        (PropertyType::StringArray, Value::String(s)) => Some(json!([s])),
        _ => None,
    }
}

/// Integral values that fit in an `i64`; anything else is not coerced.
fn integer_value(n: f64) -> Option<Value> {
    let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&n);
    (in_range && n.fract() == 0.0).then(|| json!(n as i64))
}

/// JSON number for a seconds value: integral values become integers.
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        json!(n as i64)
    } else {
        json!(n)
    }
}
