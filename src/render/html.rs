//! HTML adapter
//!
//! Renders fragments with Tera templates. Template names end in `.html`, so
//! Tera autoescapes every interpolated value; already-rendered child markup
//! is inserted with the `safe` filter. Interactive controls carry
//! `data-path`, `data-jsonpath` and `data-action` attributes so a host
//! script can route events to its callbacks; the add control also carries
//! the synthesized default element in `data-default`. Nested class
//! containers render as `<fieldset>`.

use tera::{Context, Tera};

use super::{FormRenderer, Fragment, FragmentKind};
use crate::error::Result;
use crate::visitor::Parameters;

const FORM: &str = r#"{% if wrap %}<form class="{{ classes.form | default(value='ui form') }}" data-type="{{ name }}">{% elif nested %}<fieldset data-type="{{ name }}">{% else %}<div class="{{ classes.form | default(value='ui form') }}" data-type="{{ name }}">{% endif %}{% for child in children %}{{ child | safe }}{% endfor %}{% if wrap %}</form>{% elif nested %}</fieldset>{% else %}</div>{% endif %}"#;

const SELECT: &str = r#"<select class="{{ style }}" data-path="{{ path }}" data-jsonpath="{{ json_path }}" data-action="{{ action }}">{% for option in options %}{{ option | safe }}{% endfor %}</select>"#;

const OPTION: &str = r#"<option value="{{ name }}"{% if selected %} selected{% endif %}>{{ name }}</option>"#;

const CHECKBOX: &str = r#"{% if label %}<div class="{{ style }}"><label class="{{ classes.label }}">{{ label }}</label>{% endif %}<div class="{{ classes.boolean }}"><input type="checkbox" data-path="{{ path }}" data-jsonpath="{{ json_path }}" data-action="{{ action }}"{% if checked %} checked{% endif %}/></div>{% if label %}</div>{% endif %}"#;

const INPUT: &str = r#"{% if label %}<div class="{{ style }}"><label class="{{ classes.label }}">{{ label }}</label>{% endif %}<input class="{{ classes.input }}" type="{{ input_type }}" value="{{ value }}" data-path="{{ path }}" data-jsonpath="{{ json_path }}" data-action="{{ action }}"/>{% if label %}</div>{% endif %}"#;

const LIST: &str = r#"<div class="{{ style }}"><label class="{{ classes.label }}">{{ label }}</label>{% for element in elements %}{{ element | safe }}{% endfor %}<button type="button" class="{{ classes.button }}" data-path="{{ path }}" data-jsonpath="{{ json_path }}" data-action="{{ action }}" data-default="{{ default_value }}">Add {{ label }}</button></div>"#;

const LIST_ELEMENT: &str = r#"<div class="{{ style }}">{{ control | safe }}<button type="button" class="{{ classes.button }}" data-path="{{ path }}" data-jsonpath="{{ json_path }}" data-action="{{ action }}" data-index="{{ index }}">Remove</button></div>"#;

const GROUP: &str = r#"<div class="{{ style }}"><label class="{{ classes.label }}">{{ label }}</label>{% if child %}{{ child | safe }}{% endif %}</div>"#;

/// Renders fragments to HTML strings
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    tera: Tera,
    wrap_html_form: bool,
}

impl HtmlRenderer {
    pub fn new(wrap_html_form: bool) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("form.html", FORM),
            ("select.html", SELECT),
            ("option.html", OPTION),
            ("checkbox.html", CHECKBOX),
            ("input.html", INPUT),
            ("list.html", LIST),
            ("list_element.html", LIST_ELEMENT),
            ("group.html", GROUP),
        ])?;
        Ok(Self { tera, wrap_html_form })
    }
}

impl FormRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, fragment: Fragment<String>, parameters: &Parameters<'_>) -> Result<String> {
        let mut context = Context::new();
        context.insert("key", &fragment.key);
        context.insert("style", &fragment.style);
        context.insert("classes", parameters.custom_classes);
        if let Some(binding) = fragment.kind.binding() {
            context.insert("action", binding.action());
            context.insert("json_path", &binding.path().to_json_path());
        }

        let template = match fragment.kind {
            FragmentKind::Form { name, nested, children } => {
                context.insert("name", &name);
                context.insert("nested", &nested);
                context.insert("wrap", &(self.wrap_html_form && !nested));
                context.insert("children", &children);
                "form.html"
            }
            FragmentKind::Select { path, options, .. } => {
                context.insert("path", &path.to_string());
                context.insert("options", &options);
                "select.html"
            }
            FragmentKind::SelectOption { name, selected } => {
                context.insert("name", &name);
                context.insert("selected", &selected);
                "option.html"
            }
            FragmentKind::Checkbox { label, path, checked } => {
                context.insert("label", &label);
                context.insert("path", &path.to_string());
                context.insert("checked", &checked);
                "checkbox.html"
            }
            FragmentKind::Input {
                label,
                input_type,
                path,
                value,
            } => {
                context.insert("label", &label);
                context.insert("input_type", input_type.as_str());
                context.insert("path", &path.to_string());
                context.insert("value", &value);
                "input.html"
            }
            FragmentKind::List {
                label,
                path,
                elements,
                default_value,
            } => {
                context.insert("label", &label);
                context.insert("path", &path.to_string());
                context.insert("elements", &elements);
                context.insert("default_value", &default_value.to_string());
                "list.html"
            }
            FragmentKind::ListElement {
                list_path,
                index,
                control,
            } => {
                context.insert("path", &list_path.to_string());
                context.insert("index", &index);
                context.insert("control", &control);
                "list_element.html"
            }
            FragmentKind::Group { label, child } => {
                context.insert("label", &label);
                context.insert("child", &child);
                "group.html"
            }
        };

        Ok(self.tera.render(template, &context)?)
    }
}
