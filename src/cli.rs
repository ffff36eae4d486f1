use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Render an editable form for a type of a Concerto model
#[derive(Parser, Debug, Clone)]
#[command(name = "concerto-form", version, about, long_about = None)]
pub struct Cli {
    /// Model JSON sources (file paths or http(s) URLs); repeat for several
    #[arg(short, long = "model", required = true, num_args = 1)]
    pub models: Vec<String>,

    /// Fully-qualified name of the type to render, e.g. org.acme.Bond
    #[arg(short = 't', long = "type", required_unless_present = "list_types")]
    pub type_name: Option<String>,

    /// Data instance JSON file; an empty instance of the type is used when absent
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Path to an options file (TOML, YAML or JSON)
    #[arg(short, long, env = "CONCERTO_FORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Wrap the generated HTML in a <form> element
    #[arg(long)]
    pub wrap_form: bool,

    /// Print the list of renderable types instead of a form
    #[arg(long)]
    pub list_types: bool,
}
