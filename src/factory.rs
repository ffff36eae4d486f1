//! Instance factory
//!
//! Builds new concept and resource instances for a declaration, either with
//! zero values or with generated sample data, and serializes them to the
//! JSON form the form visitor reads.

use chrono::{SecondsFormat, Utc};
use fake::faker::lorem::en::Word;
use fake::Fake;
use rand::Rng;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::defaults::primitive_default;
use crate::error::{FormError, Result};
use crate::model::{ClassDeclaration, Field, ModelManager, Property, Relationship};
use crate::resolver::resolve_type;

/// Nesting depth beyond which nested objects are left null
const MAX_DEPTH: usize = 16;

/// How leaf values are filled in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerateMode {
    /// Zero values; arrays are empty
    #[default]
    Empty,
    /// Generated sample data; arrays hold one element
    Sample,
}

/// Options for instance creation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FactoryOptions {
    pub include_optional_fields: bool,
    pub generate: GenerateMode,
}

impl FactoryOptions {
    /// Include optional fields and generate sample data for every leaf
    pub fn sample() -> Self {
        Self {
            include_optional_fields: true,
            generate: GenerateMode::Sample,
        }
    }
}

/// A new instance of a declared type
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    class: String,
    data: Map<String, Value>,
}

impl Resource {
    /// Fully-qualified type name
    pub fn class(&self) -> &str {
        &self.class
    }
}

/// Converts instances to their JSON form
#[derive(Clone, Copy, Debug, Default)]
pub struct Serializer;

impl Serializer {
    pub fn to_json(&self, resource: &Resource) -> Value {
        let mut obj = Map::new();
        obj.insert("$class".to_string(), Value::String(resource.class().to_string()));
        for (key, value) in &resource.data {
            obj.insert(key.clone(), value.clone());
        }
        Value::Object(obj)
    }
}

/// Creates instances of the declarations held by a [`ModelManager`]
#[derive(Clone, Copy)]
pub struct InstanceFactory<'a> {
    manager: &'a ModelManager,
}

impl<'a> InstanceFactory<'a> {
    pub fn new(manager: &'a ModelManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &'a ModelManager {
        self.manager
    }

    /// Create a new concept instance
    pub fn new_concept(&self, namespace: &str, name: &str, options: FactoryOptions) -> Result<Resource> {
        let declaration = self.instantiable(namespace, name)?;
        if !declaration.is_concept() {
            return Err(FormError::Instantiation(format!(
                "{} is not a concept",
                declaration.fully_qualified_name()
            )));
        }
        Ok(Resource {
            class: declaration.fully_qualified_name(),
            data: self.populate(declaration, options, 0)?,
        })
    }

    /// Create a new identified resource (asset, participant, transaction or event)
    pub fn new_resource(
        &self,
        namespace: &str,
        name: &str,
        id: &str,
        options: FactoryOptions,
    ) -> Result<Resource> {
        let declaration = self.instantiable(namespace, name)?;
        if declaration.is_concept() {
            return Err(FormError::Instantiation(format!(
                "{} is a concept; use new_concept",
                declaration.fully_qualified_name()
            )));
        }
        let mut data = self.populate(declaration, options, 0)?;
        if let Some(id_field) = self.manager.identified_by(declaration) {
            data.insert(id_field.to_string(), Value::String(id.to_string()));
        }
        Ok(Resource {
            class: declaration.fully_qualified_name(),
            data,
        })
    }

    fn instantiable(&self, namespace: &str, name: &str) -> Result<&'a ClassDeclaration> {
        let declaration = self.manager.get_type(&format!("{}.{}", namespace, name))?;
        if declaration.is_abstract() || declaration.is_enum() {
            return Err(FormError::Instantiation(format!(
                "cannot instantiate {}",
                declaration.fully_qualified_name()
            )));
        }
        Ok(declaration)
    }

    fn populate(
        &self,
        declaration: &ClassDeclaration,
        options: FactoryOptions,
        depth: usize,
    ) -> Result<Map<String, Value>> {
        let mut data = Map::new();
        for property in self.manager.properties(declaration) {
            let (name, value) = match property {
                Property::Field(f) if options.include_optional_fields || !f.is_optional() => {
                    (&f.name, self.field_value(f, options, depth)?)
                }
                Property::Relationship(r) if options.include_optional_fields || !r.is_optional() => {
                    (&r.name, self.relationship_value(r, options))
                }
                _ => continue,
            };
            data.insert(name.clone(), value);
        }
        Ok(data)
    }

    fn field_value(&self, field: &Field, options: FactoryOptions, depth: usize) -> Result<Value> {
        if !field.is_array() {
            return self.element_value(field, options, depth);
        }
        match options.generate {
            GenerateMode::Empty => Ok(Value::Array(vec![])),
            GenerateMode::Sample => Ok(Value::Array(vec![self.element_value(field, options, depth)?])),
        }
    }

    fn element_value(&self, field: &Field, options: FactoryOptions, depth: usize) -> Result<Value> {
        if field.is_primitive() {
            return Ok(match options.generate {
                GenerateMode::Empty => primitive_default(field.get_type()),
                GenerateMode::Sample => sample_primitive(field.get_type()),
            });
        }

        let declaration = resolve_type(self.manager, field.fully_qualified_type_name())?;
        if declaration.is_enum() {
            let first = self
                .manager
                .enum_values(declaration)
                .first()
                .map(|v| v.to_string())
                .unwrap_or_default();
            return Ok(Value::String(first));
        }

        if depth >= MAX_DEPTH {
            warn!(
                "Sample instance nesting exceeds {} levels at field '{}'; leaving it null",
                MAX_DEPTH,
                field.name()
            );
            return Ok(Value::Null);
        }

        let mut nested = self.populate(declaration, options, depth + 1)?;
        if let Some(id_field) = self.manager.identified_by(declaration) {
            if options.generate == GenerateMode::Sample {
                nested.insert(id_field.to_string(), Value::String(sample_identifier()));
            }
        }
        let mut obj = Map::new();
        obj.insert("$class".to_string(), Value::String(declaration.fully_qualified_name()));
        obj.extend(nested);
        Ok(Value::Object(obj))
    }

    fn relationship_value(&self, relationship: &Relationship, options: FactoryOptions) -> Value {
        let reference = |id: String| {
            Value::String(format!(
                "resource:{}#{}",
                relationship.fully_qualified_type_name(),
                id
            ))
        };
        match (options.generate, relationship.is_array) {
            (GenerateMode::Empty, true) => Value::Array(vec![]),
            (GenerateMode::Empty, false) => Value::String(String::new()),
            (GenerateMode::Sample, true) => Value::Array(vec![reference(sample_identifier())]),
            (GenerateMode::Sample, false) => reference(sample_identifier()),
        }
    }
}

fn sample_identifier() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generated sample value for a primitive type name
fn sample_primitive(type_name: &str) -> Value {
    let mut rng = rand::thread_rng();
    match type_name {
        "DateTime" => json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        "Integer" => json!(rng.gen_range(0..1000)),
        "Long" => json!(rng.gen_range(0i64..1_000_000)),
        "Double" => json!((rng.gen_range(0.0..1000.0_f64) * 100.0).round() / 100.0),
        "Boolean" => json!(rng.gen_bool(0.5)),
        _ => json!(Word().fake::<String>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelFile;

    fn manager() -> ModelManager {
        let file: ModelFile = serde_json::from_value(json!({
            "namespace": "org.acme.finance",
            "declarations": [
                { "kind": "participant", "name": "Organization", "identifiedBy": "name", "properties": [
                    { "kind": "field", "name": "name", "type": "String" } ] },
                { "kind": "concept", "name": "PaymentFrequency", "properties": [
                    { "kind": "field", "name": "periodMultiplier", "type": "Integer" } ] },
                { "kind": "concept", "name": "Bond", "properties": [
                    { "kind": "field", "name": "instrumentId", "type": "String", "array": true },
                    { "kind": "field", "name": "description", "type": "String", "optional": true },
                    { "kind": "field", "name": "parValue", "type": "Double" },
                    { "kind": "field", "name": "paymentFrequency", "type": "PaymentFrequency" },
                    { "kind": "relationship", "name": "issuer", "type": "Organization" } ] },
                { "kind": "asset", "name": "BondAsset", "identifiedBy": "ISINCode", "properties": [
                    { "kind": "field", "name": "ISINCode", "type": "String" },
                    { "kind": "field", "name": "bond", "type": "Bond" } ] }
            ]
        }))
        .unwrap();
        let mut manager = ModelManager::new();
        manager.add_model_files(vec![file]).unwrap();
        manager
    }

    #[test]
    fn test_empty_concept() {
        let manager = manager();
        let bond = manager
            .factory()
            .new_concept("org.acme.finance", "Bond", FactoryOptions::default())
            .unwrap();
        let json = manager.serializer().to_json(&bond);

        assert_eq!(json["$class"], json!("org.acme.finance.Bond"));
        assert_eq!(json["instrumentId"], json!([]));
        assert_eq!(json["parValue"], json!(0.0));
        assert_eq!(json["paymentFrequency"]["periodMultiplier"], json!(0));
        assert_eq!(json["issuer"], json!(""));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_sample_concept_is_fully_populated() {
        let manager = manager();
        let bond = manager
            .factory()
            .new_concept("org.acme.finance", "Bond", FactoryOptions::sample())
            .unwrap();
        let json = manager.serializer().to_json(&bond);

        assert_eq!(json["instrumentId"].as_array().unwrap().len(), 1);
        assert!(json["description"].is_string());
        assert!(json["parValue"].is_number());
        let issuer = json["issuer"].as_str().unwrap();
        assert!(issuer.starts_with("resource:org.acme.finance.Organization#"));
    }

    #[test]
    fn test_resource_sets_identifier() {
        let manager = manager();
        let asset = manager
            .factory()
            .new_resource("org.acme.finance", "BondAsset", "ISIN-1", FactoryOptions::sample())
            .unwrap();
        let json = manager.serializer().to_json(&asset);

        assert_eq!(asset.class(), "org.acme.finance.BondAsset");
        assert_eq!(json["ISINCode"], json!("ISIN-1"));
        assert_eq!(json["bond"]["$class"], json!("org.acme.finance.Bond"));
    }

    #[test]
    fn test_subtype_takes_inherited_identifier() {
        let mut manager = manager();
        let file: ModelFile = serde_json::from_value(json!({
            "namespace": "org.hr",
            "declarations": [
                { "kind": "participant", "name": "Person", "abstract": true, "identifiedBy": "email",
                  "properties": [ { "kind": "field", "name": "email", "type": "String" } ] },
                { "kind": "participant", "name": "Employee", "superType": "Person",
                  "properties": [ { "kind": "field", "name": "salary", "type": "Double" } ] }
            ]
        }))
        .unwrap();
        manager.add_model_files(vec![file]).unwrap();

        let employee = manager
            .factory()
            .new_resource("org.hr", "Employee", "ada@acme.org", FactoryOptions::sample())
            .unwrap();
        let json = manager.serializer().to_json(&employee);
        assert_eq!(json["email"], json!("ada@acme.org"));
        assert!(json["salary"].is_number());
    }

    #[test]
    fn test_wrong_factory_method_is_rejected() {
        let manager = manager();
        let factory = manager.factory();
        assert!(matches!(
            factory.new_resource("org.acme.finance", "Bond", "x", FactoryOptions::default()),
            Err(FormError::Instantiation(_))
        ));
        assert!(matches!(
            factory.new_concept("org.acme.finance", "BondAsset", FactoryOptions::default()),
            Err(FormError::Instantiation(_))
        ));
    }
}
