use clap::Parser;
use json_schema_to_form::{FormOptions, parse_form_with_options};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "json-schema-to-form")]
#[command(about = "Render a JSON Schema and a data model as a tree of form fields", long_about = None)]
struct Cli {
    /// Input JSON Schema file (use '-' for stdin)
    #[arg(value_name = "INPUT")]
    input: String,

    /// JSON model used as the initial form value
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// JSON file with form options (idPrefix, components, descriptor)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Check field values and attach error messages to the output
    #[arg(long)]
    validate: bool,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    let schema = if cli.input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&cli.input)?
    };
    let model = cli.model.as_ref().map(fs::read_to_string).transpose()?;
    let options = match &cli.config {
        Some(path) => FormOptions::from_file(path)?,
        None => FormOptions::default(),
    };

    let mut form = parse_form_with_options(&schema, model.as_deref(), options)?;
    if cli.validate && !form.validate() {
        warn!("model does not satisfy the schema constraints");
    }

    let view = form.view();
    let rendered = if cli.compact {
        serde_json::to_string(&view)?
    } else {
        serde_json::to_string_pretty(&view)?
    };

    if let Some(output_path) = cli.output {
        fs::write(&output_path, rendered)?;
        info!(path = %output_path.display(), "wrote form");
    } else {
        println!("{}", rendered);
    }

    Ok(())
}
