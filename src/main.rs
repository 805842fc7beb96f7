//! # Lune Command-Line Entry Point
//!
//! Thin front end over the `lune` library: parses arguments, loads the
//! output configuration, runs one query and prints the rendered result.
//! Diagnostics go to stderr through `tracing` so stdout stays clean for
//! JSON consumers.


use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lune::config::{Config, OutputFormat};
use lune::{parse_instant, phase, phase_hunt, phase_range, renderer, PhaseSelector};

const USAGE: &str = "\
usage: lune [--json] [--config PATH] <command>

commands:
  phase [TIME]              phase, illumination and distances (default: now)
  hunt  [TIME]              the lunation containing TIME (default: now)
  range START END [PHASE]   every PHASE (new|first|full|last) in [START, END]

TIME: RFC 3339, YYYY-MM-DD[THH:MM[:SS]] (UTC) or @<epoch millis>";

/// A parsed subcommand; times and phase names stay as text until run.
#[derive(Debug, PartialEq)]
enum Command {
    Phase(Option<String>),
    Hunt(Option<String>),
    Range {
        start: String,
        end: String,
        phase: Option<String>,
    },
    Help,
}

#[derive(Debug, PartialEq)]
struct Invocation {
    json: bool,
    config: Option<PathBuf>,
    command: Command,
}

/// Parse the argument list (without the program name).
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Invocation> {
    let mut json = false;
    let mut config = None;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                return Ok(Invocation {
                    json,
                    config,
                    command: Command::Help,
                })
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("help") => Command::Help,
        Some("phase") => Command::Phase(positional.next()),
        Some("hunt") => Command::Hunt(positional.next()),
        Some("range") => {
            let start = positional.next().context("range needs START")?;
            let end = positional.next().context("range needs END")?;
            Command::Range {
                start,
                end,
                phase: positional.next(),
            }
        }
        Some(other) => bail!("unknown command {other:?}"),
    };
    if let Some(extra) = positional.next() {
        bail!("unexpected argument {extra:?}");
    }

    Ok(Invocation {
        json,
        config,
        command,
    })
}

/// Execute a parsed invocation and return the text to print.
fn run(invocation: Invocation) -> anyhow::Result<String> {
    let mut config = match &invocation.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if invocation.json {
        config.output.format = OutputFormat::Json;
    }
    let out = &config.output;

    let when = |text: Option<&String>| -> anyhow::Result<_> {
        text.map(|t| parse_instant(t).with_context(|| format!("bad time {t:?}")))
            .transpose()
    };

    let rendered = match &invocation.command {
        Command::Help => USAGE.to_string(),
        Command::Phase(time) => {
            let at = when(time.as_ref())?.unwrap_or_else(chrono::Utc::now);
            let snap = phase(Some(at)).context("phase failed")?;
            renderer::render_phase(at, &snap, out)?
        }
        Command::Hunt(time) => {
            let hunt = phase_hunt(when(time.as_ref())?).context("phase hunt failed")?;
            renderer::render_hunt(&hunt, out)?
        }
        Command::Range {
            start,
            end,
            phase: phase_name,
        } => {
            let start = parse_instant(start).with_context(|| format!("bad START {start:?}"))?;
            let end = parse_instant(end).with_context(|| format!("bad END {end:?}"))?;
            let selector = match phase_name {
                Some(name) => name.parse::<PhaseSelector>()?,
                None => config.range.default_phase,
            };
            let dates = phase_range(start, end, selector).context("phase range failed")?;
            renderer::render_range(selector, start.min(end), start.max(end), &dates, out)?
        }
    };
    Ok(rendered)
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let invocation = parse_args(env::args().skip(1))?;
    println!("{}", run(invocation)?);
    Ok(())
}
