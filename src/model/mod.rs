//! Declaration graph
//!
//! In-memory schema of namespaced type declarations (concepts, assets,
//! participants, transactions, events, enums) and their properties.
//! Models are deserialized from their JSON declaration form and registered
//! with a [`ModelManager`], which indexes them by fully-qualified name and
//! answers the subtype and inherited-property queries the form visitor needs.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{FormError, Result};
use crate::factory::{InstanceFactory, Serializer};

pub mod loader;

/// Namespace reserved for system types
pub const SYSTEM_NAMESPACE: &str = "concerto";

/// Primitive type names understood by the form visitor
pub const PRIMITIVE_TYPES: [&str; 6] = ["String", "Integer", "Long", "Double", "Boolean", "DateTime"];

/// Check whether a declared type name is a primitive
pub fn is_primitive_type(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

// ============================================================================
// Model File
// ============================================================================

/// One model file: a namespace, its imports and its declarations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub namespace: String,
    /// Fully-qualified names imported from other namespaces
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<ClassDeclaration>,
}

impl ModelFile {
    /// Resolve a short type name used in this file to a fully-qualified name
    fn qualify(&self, type_name: &str) -> String {
        if is_primitive_type(type_name) || type_name.contains('.') {
            return type_name.to_string();
        }
        let suffix = format!(".{}", type_name);
        self.imports
            .iter()
            .find(|import| import.ends_with(&suffix))
            .cloned()
            .unwrap_or_else(|| format!("{}.{}", self.namespace, type_name))
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Kind of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Concept,
    Asset,
    Participant,
    Transaction,
    Event,
    Enum,
}

/// A class-like declaration (concept, asset, participant, transaction, event or enum)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Filled in from the owning model file on registration
    #[serde(default)]
    pub namespace: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "system")]
    pub system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_type: Option<String>,
    /// Identifying field for assets and participants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identified_by: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ClassDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn fully_qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_system_type(&self) -> bool {
        self.system || self.namespace == SYSTEM_NAMESPACE
    }

    pub fn is_concept(&self) -> bool {
        self.kind == DeclarationKind::Concept
    }

    pub fn is_enum(&self) -> bool {
        self.kind == DeclarationKind::Enum
    }

    /// Own properties only, in declaration order
    pub fn own_properties(&self) -> &[Property] {
        &self.properties
    }
}

/// A property declaration inside a class or enum declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Property {
    Field(Field),
    Relationship(Relationship),
    EnumValue(EnumValue),
    /// Property kinds this crate does not know about; rendered as nothing
    #[serde(other)]
    Unknown,
}

impl Property {
    pub fn name(&self) -> Option<&str> {
        match self {
            Property::Field(f) => Some(&f.name),
            Property::Relationship(r) => Some(&r.name),
            Property::EnumValue(v) => Some(&v.name),
            Property::Unknown => None,
        }
    }
}

/// An embedded value of a primitive or declared type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, rename = "array")]
    pub is_array: bool,
    #[serde(default, rename = "optional")]
    pub is_optional: bool,
    /// Filled in on registration
    #[serde(default, skip_serializing)]
    pub fully_qualified_type_name: String,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> &str {
        &self.type_name
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn is_primitive(&self) -> bool {
        is_primitive_type(&self.type_name)
    }

    pub fn fully_qualified_type_name(&self) -> &str {
        &self.fully_qualified_type_name
    }
}

/// A reference to an identified instance of another type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, rename = "array")]
    pub is_array: bool,
    #[serde(default, rename = "optional")]
    pub is_optional: bool,
    #[serde(default, skip_serializing)]
    pub fully_qualified_type_name: String,
}

impl Relationship {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn fully_qualified_type_name(&self) -> &str {
        &self.fully_qualified_type_name
    }
}

/// One value of an enum declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
}

// ============================================================================
// Model Manager
// ============================================================================

/// Registry of every loaded declaration, in registration order
#[derive(Debug, Default)]
pub struct ModelManager {
    declarations: Vec<ClassDeclaration>,
    index: HashMap<String, usize>,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register model files and validate the resulting graph.
    ///
    /// Registration is all-or-nothing: when validation fails the manager is
    /// left as it was before the call.
    pub fn add_model_files(&mut self, files: Vec<ModelFile>) -> Result<()> {
        let mut declarations = self.declarations.clone();
        let mut index = self.index.clone();

        for file in files {
            for mut decl in file.declarations.clone() {
                decl.namespace = file.namespace.clone();
                decl.super_type = decl.super_type.as_deref().map(|s| file.qualify(s));
                for property in &mut decl.properties {
                    match property {
                        Property::Field(f) => f.fully_qualified_type_name = file.qualify(&f.type_name),
                        Property::Relationship(r) => {
                            r.fully_qualified_type_name = file.qualify(&r.type_name)
                        }
                        Property::EnumValue(_) | Property::Unknown => {}
                    }
                }

                let fqn = decl.fully_qualified_name();
                if index.contains_key(&fqn) {
                    return Err(FormError::DuplicateDeclaration(fqn));
                }
                index.insert(fqn, declarations.len());
                declarations.push(decl);
            }
        }

        let candidate = Self { declarations, index };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for decl in &self.declarations {
            if let Some(super_type) = &decl.super_type {
                if !self.index.contains_key(super_type) {
                    return Err(FormError::TypeNotFound(super_type.clone()));
                }
                if self.super_chain(decl).is_none() {
                    return Err(FormError::InvalidModel(format!(
                        "circular inheritance through {}",
                        decl.fully_qualified_name()
                    )));
                }
            }
            for property in &decl.properties {
                let referenced = match property {
                    Property::Field(f) if !f.is_primitive() => &f.fully_qualified_type_name,
                    Property::Relationship(r) => &r.fully_qualified_type_name,
                    _ => continue,
                };
                if !self.index.contains_key(referenced) {
                    return Err(FormError::TypeNotFound(referenced.clone()));
                }
            }
        }
        Ok(())
    }

    /// Look up a declaration by fully-qualified name
    pub fn get_type(&self, fully_qualified_name: &str) -> Result<&ClassDeclaration> {
        self.index
            .get(fully_qualified_name)
            .map(|&i| &self.declarations[i])
            .ok_or_else(|| FormError::TypeNotFound(fully_qualified_name.to_string()))
    }

    /// All declarations, in registration order
    pub fn declarations(&self) -> &[ClassDeclaration] {
        &self.declarations
    }

    /// The declaration followed by its supertypes, nearest first.
    /// `None` when the chain loops.
    fn super_chain<'a>(&'a self, decl: &'a ClassDeclaration) -> Option<Vec<&'a ClassDeclaration>> {
        let mut chain = vec![decl];
        let mut seen = HashSet::new();
        seen.insert(decl.fully_qualified_name());
        let mut current = decl;
        while let Some(super_name) = &current.super_type {
            let parent = self.get_type(super_name).ok()?;
            if !seen.insert(parent.fully_qualified_name()) {
                return None;
            }
            chain.push(parent);
            current = parent;
        }
        Some(chain)
    }

    /// Identifying field of a declaration, inherited from the nearest
    /// supertype that declares one
    pub fn identified_by<'a>(&'a self, decl: &'a ClassDeclaration) -> Option<&'a str> {
        self.super_chain(decl)
            .unwrap_or_else(|| vec![decl])
            .into_iter()
            .find_map(|d| d.identified_by.as_deref())
    }

    /// Properties of a declaration including inherited ones: supertype
    /// properties first, each level in declaration order.
    pub fn properties<'a>(&'a self, decl: &'a ClassDeclaration) -> Vec<&'a Property> {
        let chain = self.super_chain(decl).unwrap_or_else(|| vec![decl]);
        chain
            .into_iter()
            .rev()
            .flat_map(|d| d.properties.iter())
            .collect()
    }

    /// Names of the values of an enum declaration, in declaration order
    pub fn enum_values<'a>(&'a self, decl: &'a ClassDeclaration) -> Vec<&'a str> {
        self.properties(decl)
            .into_iter()
            .filter_map(|p| match p {
                Property::EnumValue(v) => Some(v.name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether `candidate` is `target` or one of its transitive subtypes
    pub fn is_assignable_to(&self, candidate: &ClassDeclaration, target: &ClassDeclaration) -> bool {
        let target_name = target.fully_qualified_name();
        self.super_chain(candidate)
            .map(|chain| chain.iter().any(|d| d.fully_qualified_name() == target_name))
            .unwrap_or(false)
    }

    /// The subtype closure of a declaration (itself included), in registration order
    pub fn assignable_class_declarations<'a>(
        &'a self,
        decl: &ClassDeclaration,
    ) -> Vec<&'a ClassDeclaration> {
        self.declarations
            .iter()
            .filter(|candidate| self.is_assignable_to(candidate, decl))
            .collect()
    }

    /// Instance factory bound to this model manager
    pub fn factory(&self) -> InstanceFactory<'_> {
        InstanceFactory::new(self)
    }

    /// Serializer producing the JSON form of factory instances
    pub fn serializer(&self) -> Serializer {
        Serializer
    }
}

// ============================================================================
// Tests
// ============================================================================
