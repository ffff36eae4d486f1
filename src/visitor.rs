//! Form visitor
//!
//! Walks the declaration graph from a root type and asks a
//! [`FormRenderer`] for one fragment per declaration, field, relationship and
//! enum value. The live [`RenderPath`] in [`Parameters`] tracks where in the
//! data instance the current node's value lives; every segment pushed while
//! visiting a node is popped before `visit` returns, on error paths too.

use serde_json::Value;
use tracing::debug;

use crate::config::CustomClasses;
use crate::defaults;
use crate::error::{FormError, Result};
use crate::factory::InstanceFactory;
use crate::labels::{normalize_label, to_local_datetime_string};
use crate::model::{ClassDeclaration, EnumValue, Field, ModelManager, Property, Relationship};
use crate::path::RenderPath;
use crate::render::{display_value, to_field_type, FormCallbacks, FormRenderer, Fragment, FragmentKind, InputType};
use crate::resolver::resolve_type;

// ============================================================================
// Nodes
// ============================================================================

/// Anything the visitor can render
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    ClassDeclaration(&'a ClassDeclaration),
    EnumDeclaration(&'a ClassDeclaration),
    Field(&'a Field),
    Relationship(&'a Relationship),
    EnumValue(&'a EnumValue),
    Unknown,
}

impl<'a> Node<'a> {
    pub fn from_declaration(declaration: &'a ClassDeclaration) -> Self {
        if declaration.is_enum() {
            Node::EnumDeclaration(declaration)
        } else {
            Node::ClassDeclaration(declaration)
        }
    }
}

impl<'a> From<&'a Property> for Node<'a> {
    fn from(property: &'a Property) -> Self {
        match property {
            Property::Field(f) => Node::Field(f),
            Property::Relationship(r) => Node::Relationship(r),
            Property::EnumValue(v) => Node::EnumValue(v),
            Property::Unknown => Node::Unknown,
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// State threaded through one render call
pub struct Parameters<'a> {
    /// Path of the value being rendered
    pub stack: RenderPath,
    /// Data instance root
    pub json: &'a Value,
    pub custom_classes: &'a CustomClasses,
    pub model_manager: &'a ModelManager,
    pub factory: InstanceFactory<'a>,
    pub callbacks: &'a FormCallbacks,
}

impl<'a> Parameters<'a> {
    /// Parameters for a top-level render: the path starts empty
    pub fn new(
        model_manager: &'a ModelManager,
        json: &'a Value,
        custom_classes: &'a CustomClasses,
        callbacks: &'a FormCallbacks,
    ) -> Self {
        Self {
            stack: RenderPath::root(),
            json,
            custom_classes,
            model_manager,
            factory: model_manager.factory(),
            callbacks,
        }
    }

    /// Value at the current path
    pub fn current_value(&self) -> Result<&'a Value> {
        self.stack.read(self.json)
    }
}

// ============================================================================
// Visitor
// ============================================================================

/// Recursive visitor producing renderer output for a declaration graph
pub struct FormVisitor<R> {
    renderer: R,
}

impl<R: FormRenderer> FormVisitor<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render a node. `Ok(None)` means the node has no visible output.
    pub fn visit<'a>(&self, node: Node<'a>, params: &mut Parameters<'a>) -> Result<Option<R::Output>> {
        match node {
            Node::ClassDeclaration(declaration) => self.visit_class_declaration(declaration, params),
            Node::EnumDeclaration(declaration) => self.visit_enum_declaration(declaration, params),
            Node::Field(field) => {
                params.stack.enter_property(field.name());
                let result = self.visit_field(field, params);
                params.stack.exit();
                result
            }
            Node::Relationship(relationship) => {
                params.stack.enter_property(relationship.name());
                let result = self.visit_relationship(relationship, params);
                params.stack.exit();
                result
            }
            Node::EnumValue(value) => self.visit_enum_value(value, params),
            Node::Unknown => Ok(None),
        }
    }

    fn emit(
        &self,
        key: String,
        style: String,
        kind: FragmentKind<R::Output>,
        params: &Parameters<'_>,
    ) -> Result<Option<R::Output>> {
        self.renderer
            .render(Fragment { key, style, kind }, params)
            .map(Some)
    }

    fn visit_class_declaration<'a>(
        &self,
        declaration: &'a ClassDeclaration,
        params: &mut Parameters<'a>,
    ) -> Result<Option<R::Output>> {
        if declaration.is_system_type() || declaration.is_abstract() {
            debug!("Skipping declaration {}", declaration.fully_qualified_name());
            return Ok(None);
        }

        let manager = params.model_manager;
        let nested = !params.stack.is_root();
        let mut children = Vec::new();
        for property in manager.properties(declaration) {
            if let Some(child) = self.visit(Node::from(property), params)? {
                children.push(child);
            }
        }

        let name = declaration.fully_qualified_name();
        let kind = FragmentKind::Form {
            name: name.clone(),
            nested,
            children,
        };
        self.emit(name, String::new(), kind, params)
    }

    fn visit_enum_declaration<'a>(
        &self,
        declaration: &'a ClassDeclaration,
        params: &mut Parameters<'a>,
    ) -> Result<Option<R::Output>> {
        let value = display_value(params.current_value()?);

        let manager = params.model_manager;
        let mut options = Vec::new();
        for property in manager.properties(declaration) {
            if let Some(option) = self.visit(Node::from(property), params)? {
                options.push(option);
            }
        }

        let kind = FragmentKind::Select {
            path: params.stack.clone(),
            value,
            options,
        };
        let style = params.custom_classes.enumeration.clone();
        self.emit(params.stack.to_string(), style, kind, params)
    }

    fn visit_enum_value(&self, value: &EnumValue, params: &Parameters<'_>) -> Result<Option<R::Output>> {
        let selected = params.current_value()?.as_str() == Some(value.name.as_str());
        let kind = FragmentKind::SelectOption {
            name: value.name.clone(),
            selected,
        };
        self.emit(value.name.clone(), String::new(), kind, params)
    }

    /// Runs with the field name already pushed
    fn visit_field<'a>(&self, field: &'a Field, params: &mut Parameters<'a>) -> Result<Option<R::Output>> {
        let style = params.custom_classes.field_style(field.is_optional());
        let label = normalize_label(field.name());

        if field.is_array() {
            return self.visit_array_field(field, label, style, params);
        }

        if field.is_primitive() {
            let kind = self.primitive_control(field, Some(label), params)?;
            return self.emit(params.stack.to_string(), style, kind, params);
        }

        let declaration = resolve_type(params.model_manager, field.fully_qualified_type_name())?;
        let child = self.visit(Node::from_declaration(declaration), params)?;
        self.emit(params.stack.to_string(), style, FragmentKind::Group { label, child }, params)
    }

    fn visit_array_field<'a>(
        &self,
        field: &'a Field,
        label: String,
        style: String,
        params: &mut Parameters<'a>,
    ) -> Result<Option<R::Output>> {
        let default_value = defaults::synthesize(&params.factory, field)?;
        let len = match params.current_value()? {
            Value::Null => 0,
            Value::Array(items) => items.len(),
            _ => {
                return Err(FormError::Addressing {
                    path: params.stack.to_string(),
                })
            }
        };

        let mut elements = Vec::with_capacity(len);
        for index in 0..len {
            params.stack.enter_index(index);
            let element = self.visit_element(field, params);
            params.stack.exit();

            if let Some(control) = element? {
                let kind = FragmentKind::ListElement {
                    list_path: params.stack.clone(),
                    index,
                    control,
                };
                let key = format!("{}[{}]", params.stack, index);
                let element_style = params.custom_classes.field.clone();
                if let Some(rendered) = self.emit(key, element_style, kind, params)? {
                    elements.push(rendered);
                }
            }
        }

        let kind = FragmentKind::List {
            label,
            path: params.stack.clone(),
            elements,
            default_value,
        };
        self.emit(params.stack.to_string(), style, kind, params)
    }

    /// One array element, with its index already pushed
    fn visit_element<'a>(&self, field: &'a Field, params: &mut Parameters<'a>) -> Result<Option<R::Output>> {
        if field.is_primitive() {
            let kind = self.primitive_control(field, None, params)?;
            return self.emit(params.stack.to_string(), String::new(), kind, params);
        }
        let declaration = resolve_type(params.model_manager, field.fully_qualified_type_name())?;
        self.visit(Node::from_declaration(declaration), params)
    }

    fn primitive_control(
        &self,
        field: &Field,
        label: Option<String>,
        params: &Parameters<'_>,
    ) -> Result<FragmentKind<R::Output>> {
        let value = params.current_value()?;
        let path = params.stack.clone();
        Ok(match to_field_type(field.get_type()) {
            InputType::Checkbox => FragmentKind::Checkbox {
                label,
                path,
                checked: value.as_bool().unwrap_or(false),
            },
            InputType::DateTimeLocal => FragmentKind::Input {
                label,
                input_type: InputType::DateTimeLocal,
                path,
                value: value.as_str().map(to_local_datetime_string).unwrap_or_default(),
            },
            input_type => FragmentKind::Input {
                label,
                input_type,
                path,
                value: display_value(value),
            },
        })
    }

    /// Runs with the relationship name already pushed
    fn visit_relationship(&self, relationship: &Relationship, params: &mut Parameters<'_>) -> Result<Option<R::Output>> {
        let kind = FragmentKind::Input {
            label: Some(normalize_label(relationship.name())),
            input_type: InputType::Text,
            path: params.stack.clone(),
            value: display_value(params.current_value()?),
        };
        let style = params.custom_classes.field_style(relationship.is_optional());
        self.emit(params.stack.to_string(), style, kind, params)
    }
}

// ============================================================================
// Tests
// ============================================================================
