use std::process::ExitCode;

use anyhow::Context;
use cooldowns::{CooldownStore, JsonFileAttributes};

use command::Command;
use config::{Config, Parameter};

mod command;
mod config;

/// Split command line arguments into `--name value` parameters and the
/// command words that follow them.
fn parse_args<I>(args: I) -> anyhow::Result<(Config, Vec<String>)>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().skip(1);

    let mut config = Config::default();
    let mut current_key = None;
    let mut words = Vec::new();
    for arg in args.by_ref() {
        if let Some(current_key) = current_key.take() {
            config.0.insert(current_key, arg);
        } else if let Some(name) = arg.strip_prefix("--") {
            current_key = Some(Parameter::deserialize(name)?);
        } else {
            words.push(arg);
            break;
        }
    }
    if let Some(key) = current_key {
        anyhow::bail!("missing value for --{}", key.serialize());
    }
    words.extend(args);
    Ok((config, words))
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.get(Parameter::LogLevel))
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

fn main() -> anyhow::Result<ExitCode> {
    let (config, words) = parse_args(std::env::args())?;
    init_logging(&config)?;
    let command = Command::deserialize(&words)?;

    let path = config.path();
    let attribute = config.get(Parameter::Attribute);
    tracing::debug!(?path, attribute, ?command, "running command");

    let mut attributes = JsonFileAttributes::open(&path)
        .with_context(|| format!("failed to open attribute file {:?}", path))?;
    let mut store = CooldownStore::with_attribute(&mut attributes, attribute)?;
    let output = command.execute(&mut store)?;

    if let Some(text) = output.serialize() {
        println!("{}", text);
    }
    Ok(if output.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
