//! Form generator
//!
//! Host-facing entry point. A [`FormGenerator`] owns the loaded models, the
//! form options and the host callbacks, and renders a form for a named type
//! and a data instance through any [`FormRenderer`].

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::config::FormOptions;
use crate::error::{FormError, Result};
use crate::factory::{FactoryOptions, GenerateMode};
use crate::model::loader::ModelLoader;
use crate::model::{ClassDeclaration, ModelManager};
use crate::render::html::HtmlRenderer;
use crate::render::tree::{Component, TreeRenderer};
use crate::render::{FormCallbacks, FormRenderer};
use crate::resolver::resolve_type;
use crate::visitor::{FormVisitor, Node, Parameters};

/// Generates forms for the types of the loaded models
#[derive(Debug, Default)]
pub struct FormGenerator {
    options: FormOptions,
    model_manager: ModelManager,
    callbacks: FormCallbacks,
}

impl FormGenerator {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            model_manager: ModelManager::new(),
            callbacks: FormCallbacks::new(),
        }
    }

    /// Replace the host callbacks wired into interactive controls
    pub fn with_callbacks(mut self, callbacks: FormCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn model_manager(&self) -> &ModelManager {
        &self.model_manager
    }

    pub fn load_from_text(&mut self, text: &str) -> Result<()> {
        ModelLoader::new(&mut self.model_manager).load_from_text(text)
    }

    pub async fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        ModelLoader::new(&mut self.model_manager).load_from_file(path).await
    }

    pub async fn load_from_url(&mut self, url: &str) -> Result<()> {
        ModelLoader::new(&mut self.model_manager).load_from_url(url).await
    }

    /// Load from a URL or a file path
    pub async fn load(&mut self, source: &str) -> Result<()> {
        ModelLoader::new(&mut self.model_manager).load(source).await
    }

    /// Load several sources as one batch; their order does not matter
    pub async fn load_all<S: AsRef<str>>(&mut self, sources: &[S]) -> Result<()> {
        ModelLoader::new(&mut self.model_manager).load_all(sources).await
    }

    /// Types a form can be generated for: concrete, non-system, non-enum
    pub fn get_types(&self) -> Vec<&ClassDeclaration> {
        self.model_manager
            .declarations()
            .iter()
            .filter(|d| !d.is_abstract() && !d.is_system_type() && !d.is_enum())
            .collect()
    }

    /// Render the form for `type_name` with the given renderer.
    ///
    /// An abstract type is rendered as its first concrete subtype. `Ok(None)`
    /// means the resolved type renders nothing (a system type).
    pub fn generate<R: FormRenderer>(&self, renderer: R, type_name: &str, json: &Value) -> Result<Option<R::Output>> {
        let declaration = resolve_type(&self.model_manager, type_name)?;
        info!("Generating form for {}", declaration.fully_qualified_name());

        let visitor = FormVisitor::new(renderer);
        let mut params = Parameters::new(
            &self.model_manager,
            json,
            &self.options.custom_classes,
            &self.callbacks,
        );
        visitor.visit(Node::from_declaration(declaration), &mut params)
    }

    /// Render the form as HTML; a type with no visible output renders as ""
    pub fn generate_html(&self, type_name: &str, json: &Value) -> Result<String> {
        let renderer = HtmlRenderer::new(self.options.wrap_html_form)?;
        Ok(self.generate(renderer, type_name, json)?.unwrap_or_default())
    }

    /// Render the form as a component tree
    pub fn generate_tree(&self, type_name: &str, json: &Value) -> Result<Option<Component>> {
        self.generate(TreeRenderer, type_name, json)
    }

    /// A new instance of `type_name` in JSON form, suitable as form data.
    ///
    /// Identified types get a generated identifier in sample mode and
    /// "resource1" otherwise.
    pub fn sample_instance(&self, type_name: &str, mode: GenerateMode) -> Result<Value> {
        let declaration = resolve_type(&self.model_manager, type_name)?;
        if declaration.is_enum() {
            return Err(FormError::Instantiation(format!(
                "{} is an enum",
                declaration.fully_qualified_name()
            )));
        }
        let options = FactoryOptions {
            include_optional_fields: mode == GenerateMode::Sample,
            generate: mode,
        };
        let factory = self.model_manager.factory();
        let instance = if declaration.is_concept() {
            factory.new_concept(declaration.namespace(), declaration.name(), options)?
        } else {
            let id = match mode {
                GenerateMode::Sample => uuid::Uuid::new_v4().to_string(),
                GenerateMode::Empty => crate::defaults::DEFAULT_RESOURCE_ID.to_string(),
            };
            factory.new_resource(declaration.namespace(), declaration.name(), &id, options)?
        };
        Ok(self.model_manager.serializer().to_json(&instance))
    }
}
