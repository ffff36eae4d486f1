use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::error::{FormError, Result};

/// Prefix for environment overrides, e.g. `CONCERTO_FORM_WRAP_HTML_FORM=true`
/// or `CONCERTO_FORM_CUSTOM_CLASSES__FIELD=form-group`
pub const ENV_PREFIX: &str = "CONCERTO_FORM";

/// Form generation options
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FormOptions {
    /// Semantic role -> class token
    #[serde(alias = "customClasses")]
    pub custom_classes: CustomClasses,
    /// Wrap generated HTML in a `<form>` element
    #[serde(alias = "wrapHtmlForm")]
    pub wrap_html_form: bool,
    /// Output produced by the CLI
    pub output: OutputFormat,
}

/// Class tokens per semantic role
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CustomClasses {
    pub field: String,
    pub input: String,
    pub label: String,
    pub required: String,
    pub boolean: String,
    pub enumeration: String,
    pub button: String,
    /// Roles this crate does not use; kept so options round-trip
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for CustomClasses {
    fn default() -> Self {
        Self {
            field: "ui field".to_string(),
            input: "ui input".to_string(),
            label: "ui label".to_string(),
            required: "required".to_string(),
            boolean: "ui toggle checkbox".to_string(),
            enumeration: "ui fluid dropdown".to_string(),
            button: "ui fluid button".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl CustomClasses {
    /// Look up a role by name, including unrecognized roles
    pub fn get(&self, role: &str) -> Option<&str> {
        match role {
            "field" => Some(&self.field),
            "input" => Some(&self.input),
            "label" => Some(&self.label),
            "required" => Some(&self.required),
            "boolean" => Some(&self.boolean),
            "enumeration" => Some(&self.enumeration),
            "button" => Some(&self.button),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Field wrapper class, with the required modifier for mandatory fields
    pub fn field_style(&self, optional: bool) -> String {
        if optional || self.required.is_empty() {
            self.field.clone()
        } else {
            format!("{} {}", self.field, self.required)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML markup
    #[default]
    Html,
    /// Component tree serialized as JSON
    Tree,
}

impl FormOptions {
    /// Load options from defaults, an optional file and `CONCERTO_FORM_*`
    /// environment variables (later sources win)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        let s = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let options: FormOptions = s.try_deserialize()?;

        validator::OptionsValidator::validate(&options).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            FormError::InvalidOptions(messages.join("\n"))
        })?;

        Ok(options)
    }

    /// Load options, then apply CLI overrides (CLI > env vars > config file)
    pub fn new_with_cli(cli: &Cli) -> Result<Self> {
        let mut options = Self::load(cli.config.as_deref())?;
        options.apply_cli_overrides(cli);
        Ok(options)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.wrap_form {
            self.wrap_html_form = true;
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classes() {
        let classes = CustomClasses::default();
        assert_eq!(classes.get("button"), Some("ui fluid button"));
        assert_eq!(classes.get("unknown"), None);
        assert_eq!(classes.field_style(true), "ui field");
        assert_eq!(classes.field_style(false), "ui field required");
    }

    #[test]
    fn test_deserialize_partial_classes() {
        let options: FormOptions = serde_json::from_str(
            r#"{ "customClasses": { "field": "form-group", "input": "form-control", "tooltip": "tip" },
                 "wrapHtmlForm": true }"#,
        )
        .unwrap();
        assert!(options.wrap_html_form);
        assert_eq!(options.custom_classes.field, "form-group");
        assert_eq!(options.custom_classes.input, "form-control");
        // roles that were not given keep their defaults
        assert_eq!(options.custom_classes.label, "ui label");
        assert_eq!(options.custom_classes.get("tooltip"), Some("tip"));
    }
}
