//! Rendering adapters
//!
//! The form visitor decides *what* to show and describes it as a
//! [`Fragment`]; a [`FormRenderer`] turns each fragment into its output type.
//! Two adapters ship with the crate: [`html::HtmlRenderer`] produces markup
//! and [`tree::TreeRenderer`] produces a [`tree::Component`] tree whose
//! controls hold live callback handlers.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::path::RenderPath;
use crate::visitor::Parameters;

pub mod html;
pub mod tree;

// ============================================================================
// Input Types
// ============================================================================

/// Kind of input control rendered for a primitive value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputType {
    Text,
    Number,
    Checkbox,
    DateTimeLocal,
}

impl InputType {
    /// HTML `type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Checkbox => "checkbox",
            InputType::DateTimeLocal => "datetime-local",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a declared primitive type name to its input control
pub fn to_field_type(type_name: &str) -> InputType {
    match type_name {
        "Boolean" => InputType::Checkbox,
        "Integer" | "Long" | "Double" => InputType::Number,
        "DateTime" => InputType::DateTimeLocal,
        _ => InputType::Text,
    }
}

// ============================================================================
// Fragments
// ============================================================================

/// Which host callback an interactive fragment is wired to, with the
/// arguments computed during traversal
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// `on_change(event, path)`
    Change { path: RenderPath },
    /// `add_element(event, path, default_value)`
    Add { path: RenderPath, default_value: Value },
    /// `remove_element(event, path, index)`
    Remove { path: RenderPath, index: usize },
}

impl Binding {
    /// Value of the `data-action` attribute
    pub fn action(&self) -> &'static str {
        match self {
            Binding::Change { .. } => "change",
            Binding::Add { .. } => "add",
            Binding::Remove { .. } => "remove",
        }
    }

    pub fn path(&self) -> &RenderPath {
        match self {
            Binding::Change { path } | Binding::Add { path, .. } | Binding::Remove { path, .. } => path,
        }
    }
}

/// What a fragment shows. `O` is the renderer output already produced for
/// nested fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentKind<O> {
    /// Container around every property of a class declaration
    Form { name: String, nested: bool, children: Vec<O> },
    /// Enum value picker
    Select { path: RenderPath, value: String, options: Vec<O> },
    /// One enum value
    SelectOption { name: String, selected: bool },
    /// Boolean control; `label` is absent for array elements
    Checkbox { label: Option<String>, path: RenderPath, checked: bool },
    /// Text, number or date-time control
    Input {
        label: Option<String>,
        input_type: InputType,
        path: RenderPath,
        value: String,
    },
    /// Array field: its elements followed by an add control
    List {
        label: String,
        path: RenderPath,
        elements: Vec<O>,
        default_value: Value,
    },
    /// One array element with its remove control
    ListElement { list_path: RenderPath, index: usize, control: O },
    /// Labelled wrapper around a nested declaration; `child` is absent when
    /// the declaration itself renders nothing (system types)
    Group { label: String, child: Option<O> },
}

impl<O> FragmentKind<O> {
    /// Callback binding of the fragment's own control, if it has one
    pub fn binding(&self) -> Option<Binding> {
        match self {
            FragmentKind::Select { path, .. }
            | FragmentKind::Checkbox { path, .. }
            | FragmentKind::Input { path, .. } => Some(Binding::Change { path: path.clone() }),
            FragmentKind::List {
                path, default_value, ..
            } => Some(Binding::Add {
                path: path.clone(),
                default_value: default_value.clone(),
            }),
            FragmentKind::ListElement { list_path, index, .. } => Some(Binding::Remove {
                path: list_path.clone(),
                index: *index,
            }),
            FragmentKind::Form { .. } | FragmentKind::SelectOption { .. } | FragmentKind::Group { .. } => None,
        }
    }
}

/// Description of one UI fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<O> {
    /// Stable key (the render path, or the declaration name for containers)
    pub key: String,
    /// Wrapper class
    pub style: String,
    pub kind: FragmentKind<O>,
}

/// Turns fragment descriptions into output
pub trait FormRenderer {
    type Output;

    fn render(&self, fragment: Fragment<Self::Output>, parameters: &Parameters<'_>) -> Result<Self::Output>;
}

// ============================================================================
// Callbacks
// ============================================================================

/// Event payload handed to host callbacks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormEvent {
    /// New value of the control, when the event carries one
    pub value: Value,
}

impl FormEvent {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

pub type ChangeCallback = Arc<dyn Fn(&FormEvent, &str) + Send + Sync>;
pub type AddElementCallback = Arc<dyn Fn(&FormEvent, &str, &Value) + Send + Sync>;
pub type RemoveElementCallback = Arc<dyn Fn(&FormEvent, &str, usize) + Send + Sync>;

/// Host callbacks. Paths are passed in their dot form, e.g. `instrumentId[0]`.
#[derive(Clone, Default)]
pub struct FormCallbacks {
    on_change: Option<ChangeCallback>,
    add_element: Option<AddElementCallback>,
    remove_element: Option<RemoveElementCallback>,
}

impl FormCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(mut self, f: impl Fn(&FormEvent, &str) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn add_element(mut self, f: impl Fn(&FormEvent, &str, &Value) + Send + Sync + 'static) -> Self {
        self.add_element = Some(Arc::new(f));
        self
    }

    pub fn remove_element(mut self, f: impl Fn(&FormEvent, &str, usize) + Send + Sync + 'static) -> Self {
        self.remove_element = Some(Arc::new(f));
        self
    }

    /// Invoke the callback a binding is wired to. Returns false when the
    /// host did not register that callback.
    pub fn dispatch(&self, binding: &Binding, event: &FormEvent) -> bool {
        match binding {
            Binding::Change { path } => self
                .on_change
                .as_ref()
                .map(|f| f(event, &path.to_string()))
                .is_some(),
            Binding::Add { path, default_value } => self
                .add_element
                .as_ref()
                .map(|f| f(event, &path.to_string(), default_value))
                .is_some(),
            Binding::Remove { path, index } => self
                .remove_element
                .as_ref()
                .map(|f| f(event, &path.to_string(), *index))
                .is_some(),
        }
    }
}

impl fmt::Debug for FormCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCallbacks")
            .field("on_change", &self.on_change.is_some())
            .field("add_element", &self.add_element.is_some())
            .field("remove_element", &self.remove_element.is_some())
            .finish()
    }
}

/// Text shown in an input for a JSON value
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
