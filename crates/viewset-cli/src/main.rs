//! `viewset` - list and render templates from a view directory.
//!
//! ```text
//! viewset --dir app/views list
//! viewset --dir app/views render users/show --data user.json --layout
//! echo '{"name":"Ada"}' | viewset render users/show --data -
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viewset::{Mode, RenderConfig, Views};

#[derive(Parser, Debug)]
#[command(name = "viewset", version, about = "List and render compiled HTML views")]
struct Cli {
    /// YAML configuration file
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Template root (overrides the config file)
    #[arg(long, short = 'd', global = true)]
    dir: Option<PathBuf>,

    /// Recognized extension, repeatable (overrides the config file)
    #[arg(long = "ext", short = 'e', global = true)]
    extensions: Vec<String>,

    /// Log every loaded template
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every registered template name
    List,

    /// Render one template to stdout
    Render {
        /// Template name, e.g. "users/show"
        name: String,

        /// JSON data file, or "-" for stdin
        #[arg(long)]
        data: Option<PathBuf>,

        /// Wrap in a layout; without a value uses the configured layout
        #[arg(long)]
        layout: Option<Option<String>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "viewset=debug" } else { "viewset=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config(&cli)?;
    let views = Views::new(config)
        .with_mode(Mode::Production)
        .init()
        .context("failed to compile templates")?;

    match cli.command {
        Command::List => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for name in views.registry().names() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Render { name, data, layout } => {
            let data = read_data(data.as_ref())?;
            let mut page = views.instance(&name, data);
            match layout {
                Some(Some(layout)) => page = page.with_layout(layout),
                Some(None) => page = page.with_layout(views.config().layout.clone()),
                None => {}
            }
            page.render_to(io::stdout().lock())
                .with_context(|| format!("failed to render \"{name}\""))?;
        }
    }

    Ok(())
}

/// Builds the render configuration from the config file and flags.
fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(dir) = &cli.dir {
        config = config.with_templates_dir(dir);
    }
    if !cli.extensions.is_empty() {
        config = config.with_extensions(cli.extensions.iter().cloned());
    }
    if cli.debug {
        config = config.with_debug(true);
    }

    Ok(config)
}

/// Reads JSON template data; no source means an empty object.
fn read_data(source: Option<&PathBuf>) -> Result<serde_json::Value> {
    let raw = match source {
        None => return Ok(serde_json::Value::Object(Default::default())),
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read data from stdin")?;
            buf
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    };

    serde_json::from_str(&raw).context("data is not valid JSON")
}
