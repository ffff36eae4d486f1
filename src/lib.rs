//! # concerto-form
//!
//! Generates editable forms from Concerto-style data models. A model is a
//! graph of namespaced declarations (concepts, assets, participants,
//! transactions, events and enums); the form visitor walks it from a root
//! type, reads current values out of a JSON data instance and hands each
//! fragment to a pluggable renderer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use concerto_form::config::FormOptions;
//! use concerto_form::generator::FormGenerator;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut generator = FormGenerator::new(FormOptions::load(None)?);
//!     generator.load_from_file("models/bond.json").await?;
//!
//!     let html = generator.generate_html("org.acme.finance.Bond", &json!({ "boolean": true }))?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - **model**: declaration graph, model manager and loader
//! - **resolver**: abstract type to concrete subtype
//! - **path**: render path and value addressing
//! - **defaults** / **factory**: values for new array elements and sample instances
//! - **visitor**: the traversal
//! - **render**: HTML and component-tree adapters
//! - **generator**: host-facing facade

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod factory;
pub mod generator;
pub mod labels;
pub mod model;
pub mod path;
pub mod render;
pub mod resolver;
pub mod visitor;

pub use error::{FormError, Result};
pub use generator::FormGenerator;
