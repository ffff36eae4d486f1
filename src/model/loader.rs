//! Model loading from text, local files and URLs

use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use super::{ModelFile, ModelManager};
use crate::error::{FormError, Result};

/// Parse model JSON text holding either a single model file or an array of them
pub fn parse_model_text(text: &str) -> Result<Vec<ModelFile>> {
    let value: Value = serde_json::from_str(text)?;
    let files = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<ModelFile>, _>>()?,
        Value::Object(_) => vec![serde_json::from_value(value)?],
        other => {
            return Err(FormError::InvalidModel(format!(
                "expected a model object or an array of models, found {}",
                json_kind(&other)
            )))
        }
    };
    Ok(files)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Loads models into a [`ModelManager`]
pub struct ModelLoader<'a> {
    manager: &'a mut ModelManager,
}

impl<'a> ModelLoader<'a> {
    pub fn new(manager: &'a mut ModelManager) -> Self {
        Self { manager }
    }

    /// Load models from JSON text
    pub fn load_from_text(&mut self, text: &str) -> Result<()> {
        self.register(parse_model_text(text)?)
    }

    /// Load models from a local file
    pub async fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = read_file(path.as_ref()).await?;
        self.load_from_text(&text)
    }

    /// Fetch models from a URL
    pub async fn load_from_url(&mut self, url: &str) -> Result<()> {
        let text = fetch_url(url).await?;
        self.load_from_text(&text)
    }

    /// Load from a URL when the source looks like one, otherwise from a file
    pub async fn load(&mut self, source: &str) -> Result<()> {
        let text = read_source(source).await?;
        self.load_from_text(&text)
    }

    /// Read and parse every source, then register them together so imports
    /// may point at any source in the batch regardless of order
    pub async fn load_all<S: AsRef<str>>(&mut self, sources: &[S]) -> Result<()> {
        let mut files = Vec::new();
        for source in sources {
            let text = read_source(source.as_ref()).await?;
            files.extend(parse_model_text(&text)?);
        }
        self.register(files)
    }

    fn register(&mut self, files: Vec<ModelFile>) -> Result<()> {
        let namespaces: Vec<String> = files.iter().map(|f| f.namespace.clone()).collect();
        self.manager.add_model_files(files)?;
        info!("Loaded model namespaces: {}", namespaces.join(", "));
        Ok(())
    }
}

async fn read_file(path: &Path) -> Result<String> {
    debug!("Reading model file {}", path.display());
    Ok(tokio::fs::read_to_string(path).await?)
}

async fn fetch_url(url: &str) -> Result<String> {
    debug!("Fetching model from {}", url);
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.text().await?)
}

async fn read_source(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source).await
    } else {
        read_file(Path::new(source)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_and_array() {
        let single = r#"{ "namespace": "org.a", "declarations": [] }"#;
        assert_eq!(parse_model_text(single).unwrap().len(), 1);

        let many = r#"[ { "namespace": "org.a" }, { "namespace": "org.b" } ]"#;
        let files = parse_model_text(many).unwrap();
        assert_eq!(files[1].namespace, "org.b");
    }

    #[test]
    fn test_parse_rejects_scalars() {
        let err = parse_model_text("42").unwrap_err();
        assert!(matches!(err, FormError::InvalidModel(msg) if msg.contains("a number")));
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(matches!(parse_model_text("{ nope"), Err(FormError::Json(_))));
    }

    #[test]
    fn test_load_from_text_registers_types() {
        let mut manager = ModelManager::new();
        ModelLoader::new(&mut manager)
            .load_from_text(
                r#"{ "namespace": "org.a", "declarations": [
                    { "kind": "concept", "name": "Address", "properties": [
                        { "kind": "field", "name": "city", "type": "String" } ] } ] }"#,
            )
            .unwrap();
        assert!(manager.get_type("org.a.Address").is_ok());
    }

    #[tokio::test]
    async fn test_load_all_is_all_or_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{ "namespace": "org.a", "declarations": [ { "kind": "concept", "name": "A" } ] }"#)
            .unwrap();
        let missing = dir.path().join("missing.json");

        let mut manager = ModelManager::new();
        let sources = [good.to_string_lossy().into_owned(), missing.to_string_lossy().into_owned()];
        let result = ModelLoader::new(&mut manager).load_all(&sources).await;
        assert!(matches!(result, Err(FormError::Io(_))));
        assert!(manager.declarations().is_empty());
    }
}
