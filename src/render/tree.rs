//! Component tree adapter
//!
//! Produces a framework-neutral tree of [`Component`] nodes. Interactive
//! controls hold a [`Handler`] pairing their [`Binding`] with the host
//! callbacks, so a host can locate a control and [`Component::fire`] it.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{Binding, FormCallbacks, FormEvent, FormRenderer, Fragment, FragmentKind};
use crate::error::Result;
use crate::visitor::Parameters;

/// A bound event handler on a control
#[derive(Clone)]
pub struct Handler {
    binding: Binding,
    callbacks: FormCallbacks,
}

impl Handler {
    pub fn binding(&self) -> &Binding {
        &self.binding
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.binding == other.binding
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("binding", &self.binding).finish()
    }
}

/// One node of the rendered tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Component {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
    #[serde(skip)]
    pub handler: Option<Handler>,
}

impl Component {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    fn class(self, class: &str) -> Self {
        if class.is_empty() {
            self
        } else {
            self.attr("class", class)
        }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    fn bind(mut self, binding: Binding, callbacks: &FormCallbacks) -> Self {
        self = self
            .attr("data-path", binding.path().to_string())
            .attr("data-jsonpath", binding.path().to_json_path())
            .attr("data-action", binding.action());
        if let Binding::Remove { index, .. } = &binding {
            self = self.attr("data-index", index.to_string());
        }
        self.handler = Some(Handler {
            binding,
            callbacks: callbacks.clone(),
        });
        self
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Invoke this component's handler. Returns false when it has none or
    /// the host registered no callback for it.
    pub fn fire(&self, event: &FormEvent) -> bool {
        match &self.handler {
            Some(handler) => handler.callbacks.dispatch(&handler.binding, event),
            None => false,
        }
    }

    /// All components in the subtree, depth-first, that match a predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Component>
    where
        F: Fn(&Component) -> bool,
    {
        let mut found = Vec::new();
        self.collect(&predicate, &mut found);
        found
    }

    fn collect<'a, F>(&'a self, predicate: &F, found: &mut Vec<&'a Component>)
    where
        F: Fn(&Component) -> bool,
    {
        if predicate(self) {
            found.push(self);
        }
        for child in &self.children {
            child.collect(predicate, found);
        }
    }

    /// The control bound to `path` with the given `data-action`
    pub fn find_control(&self, path: &str, action: &str) -> Option<&Component> {
        self.find_all(|c| c.attr_value("data-path") == Some(path) && c.attr_value("data-action") == Some(action))
            .into_iter()
            .next()
    }
}

/// Renders fragments to [`Component`] trees
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer;

impl TreeRenderer {
    fn labelled(style: &str, label: Option<String>, control: Component, parameters: &Parameters<'_>) -> Component {
        match label {
            Some(label) => Self::label_box(style, label, parameters).child(control),
            None => control,
        }
    }

    fn label_box(style: &str, label: String, parameters: &Parameters<'_>) -> Component {
        Component::new("div")
            .class(style)
            .child(Component::new("label").class(&parameters.custom_classes.label).text(label))
    }
}

impl FormRenderer for TreeRenderer {
    type Output = Component;

    fn render(&self, fragment: Fragment<Component>, parameters: &Parameters<'_>) -> Result<Component> {
        let classes = parameters.custom_classes;
        let callbacks = parameters.callbacks;
        let binding = fragment.kind.binding();
        let style = fragment.style;

        let component = match fragment.kind {
            FragmentKind::Form { name, nested, children } => {
                let mut form = Component::new(if nested { "fieldset" } else { "form" }).attr("data-type", name);
                form.children = children;
                form
            }
            FragmentKind::Select { value, options, .. } => {
                let mut select = Component::new("select").class(&style).attr("value", value);
                select.children = options;
                select.bind_opt(binding, callbacks)
            }
            FragmentKind::SelectOption { name, selected } => {
                let option = Component::new("option").attr("value", name.clone()).text(name);
                if selected {
                    option.attr("selected", "true")
                } else {
                    option
                }
            }
            FragmentKind::Checkbox { label, checked, .. } => {
                let mut input = Component::new("input").attr("type", "checkbox");
                if checked {
                    input = input.attr("checked", "true");
                }
                let control = Component::new("div")
                    .class(&classes.boolean)
                    .child(input.bind_opt(binding, callbacks));
                Self::labelled(&style, label, control, parameters)
            }
            FragmentKind::Input {
                label,
                input_type,
                value,
                ..
            } => {
                let input = Component::new("input")
                    .class(&classes.input)
                    .attr("type", input_type.as_str())
                    .attr("value", value)
                    .bind_opt(binding, callbacks);
                Self::labelled(&style, label, input, parameters)
            }
            FragmentKind::List { label, elements, .. } => {
                let add = Component::new("button")
                    .class(&classes.button)
                    .text(format!("Add {}", label))
                    .bind_opt(binding, callbacks);
                let mut list = Component::new("div")
                    .class(&style)
                    .child(Component::new("label").class(&classes.label).text(label));
                list.children.extend(elements);
                list.child(add)
            }
            FragmentKind::ListElement { control, .. } => {
                let remove = Component::new("button")
                    .class(&classes.button)
                    .text("Remove")
                    .bind_opt(binding, callbacks);
                Component::new("div").class(&style).child(control).child(remove)
            }
            FragmentKind::Group { label, child } => match child {
                Some(child) => Self::labelled(&style, Some(label), child, parameters),
                None => Self::label_box(&style, label, parameters),
            },
        };

        Ok(component.attr("key", fragment.key))
    }
}

impl Component {
    fn bind_opt(self, binding: Option<Binding>, callbacks: &FormCallbacks) -> Self {
        match binding {
            Some(binding) => self.bind(binding, callbacks),
            None => self,
        }
    }
}
