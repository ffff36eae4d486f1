use clap::Parser;
use concerto_form::cli::Cli;
use concerto_form::config::{FormOptions, OutputFormat};
use concerto_form::factory::GenerateMode;
use concerto_form::generator::FormGenerator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered output can be piped
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = FormOptions::new_with_cli(&cli)?;
    let output = options.output;

    let mut generator = FormGenerator::new(options);
    generator.load_all(&cli.models).await?;

    if cli.list_types {
        for declaration in generator.get_types() {
            println!("{}", declaration.fully_qualified_name());
        }
        return Ok(());
    }

    let type_name = cli
        .type_name
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--type is required unless --list-types is given"))?;

    let data = match &cli.data {
        Some(path) => serde_json::from_str(&tokio::fs::read_to_string(path).await?)?,
        None => generator.sample_instance(type_name, GenerateMode::Empty)?,
    };

    info!("Rendering {} as {:?}", type_name, output);
    match output {
        OutputFormat::Html => println!("{}", generator.generate_html(type_name, &data)?),
        OutputFormat::Tree => {
            let tree = generator.generate_tree(type_name, &data)?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
    }

    Ok(())
}
