use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use thermo_sensor_config::{
    initialize_form_with, script, storage::ConfigStore, submit, web, ConfigError, Context, Document, SensorConfig,
    DEFAULT_FIELDS,
};

/// Thermo sensor configuration page helper.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the placeholder field table as JSON
    Defaults,
    /// Pre-fill a JSON document of elements and print it
    Init {
        /// JSON object mapping element id to {"value", "checked"}
        document: PathBuf,
        /// Abort on the first element the document lacks
        #[arg(long)]
        fail_fast: bool,
    },
    /// Print the setValues() prefill script
    Script {
        /// Settings file (placeholder settings when omitted)
        #[arg(long)]
        ini: Option<PathBuf>,
    },
    /// Print the settings file in normalized form
    Ini {
        #[arg(long)]
        ini: Option<PathBuf>,
    },
    /// Apply a submitted form query to the settings stored in a directory
    Submit {
        #[arg(long)]
        dir: PathBuf,
        /// urlencoded form arguments
        query: String,
    },
    /// Resolve a page request against a directory, as the device's web server would
    Get {
        #[arg(long)]
        dir: PathBuf,
        path: String,
        #[arg(long, default_value = "")]
        query: String,
    },
}

fn load(ini: Option<&PathBuf>) -> Result<SensorConfig, ConfigError> {
    match ini {
        Some(path) => SensorConfig::from_ini_str(&fs::read_to_string(path)?),
        None => Ok(SensorConfig::placeholder()),
    }
}

fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let out = match args.cmd {
        Cmd::Defaults => serde_json::to_string_pretty(DEFAULT_FIELDS)?,
        Cmd::Init { document, fail_fast } => {
            let mut doc = Document::from_json(&fs::read_to_string(document)?)?;
            let ctx = if fail_fast { Context::fail_fast() } else { Context::default() };
            let report = initialize_form_with(&mut doc, &ctx)?;
            if !report.is_complete() {
                eprintln!("missing fields: {}", report.missing.join(", "));
            }
            serde_json::to_string_pretty(&doc)?
        }
        Cmd::Script { ini } => script::render(&load(ini.as_ref())?),
        Cmd::Ini { ini } => load(ini.as_ref())?.to_ini(),
        Cmd::Submit { dir, query } => {
            let store = ConfigStore::new(dir);
            let sub = submit::decode(&query, &store.load_or_default()?);
            if !sub.is_ok() {
                return Err(sub.error_text().trim_end().into());
            }
            store.write_script(&sub.config)?;
            store.save(&sub.config)?;
            sub.config.to_ini()
        }
        Cmd::Get { dir, path, query } => {
            let reply = web::resolve(&ConfigStore::new(dir), &path, &query)?;
            eprintln!("{} {}", reply.status, reply.content_type);
            if reply.restart {
                eprintln!("device restart requested");
            }
            String::from_utf8_lossy(&reply.body).into_owned()
        }
    };
    Ok(out)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
