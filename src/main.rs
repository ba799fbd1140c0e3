//! Dynamic Response Transformer - CLI Entry Point
//!
//! One-shot driver around the library: evaluate a single template against
//! a simulated request, or validate every replacement spec under a root.

use anyhow::Result;
use clap::Parser;
use dynamic_response_transformer::directive::Directive;
use dynamic_response_transformer::replacements::parse_spec;
use dynamic_response_transformer::{
    DynamicResponseTransformer, FileSource, Request, ResponseDefinition, TransformerConfig,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "dynamic-response-transformer",
    about = "Resolve request-derived placeholders in a stub response template",
    version
)]
struct Args {
    /// Path to a YAML configuration file naming the content roots
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding response body template files
    #[arg(long)]
    files: Option<PathBuf>,

    /// Directory holding replacement specifications (defaults to a
    /// `replacements` directory next to the files root)
    #[arg(long)]
    replacements: Option<PathBuf>,

    /// Logical path of the template to evaluate, relative to the files root
    #[arg(short, long)]
    template: Option<String>,

    /// HTTP method of the simulated request
    #[arg(short, long, default_value = "GET")]
    method: String,

    /// URL of the simulated request
    #[arg(short, long, default_value = "/")]
    url: String,

    /// Raw request body
    #[arg(short, long)]
    body: Option<String>,

    /// Read the request body from a file
    #[arg(long, conflicts_with = "body")]
    body_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Validate every replacement spec under the replacements root and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;

    if args.validate {
        return validate_replacements(&config);
    }

    let template = args
        .template
        .clone()
        .ok_or_else(|| anyhow::anyhow!("--template is required unless --validate is given"))?;

    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => String::new(),
    };

    let request = Request::new(&args.method, &args.url).with_body(body);
    let response = ResponseDefinition::from_body_file(template);

    let transformer = DynamicResponseTransformer::from_config(&config);
    let materialized = transformer.transform(&request, &response)?;

    if let Some(body) = materialized.body {
        println!("{body}");
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<TransformerConfig> {
    match &args.config {
        Some(path) => {
            info!(path = ?path, "Loading configuration");
            TransformerConfig::from_file(path)
        }
        None => {
            let files_root = args
                .files
                .clone()
                .ok_or_else(|| anyhow::anyhow!("either --config or --files is required"))?;
            let replacements_root = match &args.replacements {
                Some(root) => root.clone(),
                None => files_root
                    .parent()
                    .map(|parent| parent.join("replacements"))
                    .unwrap_or_else(|| PathBuf::from("replacements")),
            };
            let config = TransformerConfig {
                files_root,
                replacements_root,
            };
            config.validate()?;
            Ok(config)
        }
    }
}

fn validate_replacements(config: &TransformerConfig) -> Result<()> {
    let root = FileSource::new(&config.replacements_root);
    if !root.exists() {
        println!(
            "No replacements directory at {}",
            config.replacements_root.display()
        );
        return Ok(());
    }

    let mut files = 0usize;
    let mut directives = 0usize;
    for file in root.list_files_recursively() {
        let relative = file.to_string_lossy();
        let display = root.root().join(&file).display().to_string();
        let content = root.read_text(&relative)?;
        let entries = parse_spec(&content, &display)?;
        for (_, raw) in &entries {
            Directive::classify(raw)?;
        }
        directives += entries.len();
        files += 1;
    }
    println!("{files} replacement files are valid ({directives} directives)");
    Ok(())
}
