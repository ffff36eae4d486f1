//! Default values for newly appended collection elements

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::error::Result;
use crate::factory::{FactoryOptions, InstanceFactory};
use crate::model::Field;
use crate::resolver::resolve_type;

/// Identifier given to sample resources seeded into new array elements
pub const DEFAULT_RESOURCE_ID: &str = "resource1";

/// Zero value for a primitive type name
pub fn primitive_default(type_name: &str) -> Value {
    match type_name {
        "DateTime" => Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        "Integer" => json!(0),
        "Long" | "Double" => json!(0.0),
        "Boolean" => Value::Bool(false),
        _ => Value::String(String::new()),
    }
}

/// Fresh value for one element of `field`.
///
/// Primitives get their zero value. Declared types are resolved to a concrete
/// type: enums yield their first value, concepts a fully-populated sample
/// concept, and identified types a sample resource named
/// [`DEFAULT_RESOURCE_ID`].
pub fn synthesize(factory: &InstanceFactory<'_>, field: &Field) -> Result<Value> {
    if field.is_primitive() {
        return Ok(primitive_default(field.get_type()));
    }

    let manager = factory.manager();
    let declaration = resolve_type(manager, field.fully_qualified_type_name())?;
    if declaration.is_enum() {
        let first = manager
            .enum_values(declaration)
            .first()
            .map(|v| v.to_string())
            .unwrap_or_default();
        return Ok(Value::String(first));
    }

    let options = FactoryOptions::sample();
    let instance = if declaration.is_concept() {
        factory.new_concept(declaration.namespace(), declaration.name(), options)?
    } else {
        factory.new_resource(declaration.namespace(), declaration.name(), DEFAULT_RESOURCE_ID, options)?
    };
    Ok(manager.serializer().to_json(&instance))
}
