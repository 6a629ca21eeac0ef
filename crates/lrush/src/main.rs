//! lrush - line-command shell for an LRU cache

mod command;
mod handler;
mod history;
mod shell;

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::handler::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of keys); prompted for when omitted
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    capacity: Option<u64>,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Number of operations kept in the history log
    #[arg(long, default_value_t = 100)]
    history: usize,

    /// Print the final counters as JSON on exit
    #[arg(long)]
    json_stats: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries replies only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let capacity = match args.capacity {
        Some(n) => usize::try_from(n)?,
        None => shell::prompt_capacity(&mut input, &mut output)?,
    };

    info!("Starting lrush v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", capacity);

    let mut session = Session::new(capacity, args.history)?;

    match &args.script {
        Some(path) => {
            info!("Running script {}", path.display());
            let reader = shell::open_script(path)?;
            shell::run(&mut session, reader, &mut output, false)?;
        }
        None => shell::run(&mut session, input, &mut output, true)?,
    }

    if args.json_stats {
        let stats = session.cache().stats();
        writeln!(output, "{}", serde_json::to_string(&stats)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["lrush"]).unwrap();
        assert_eq!(args.capacity, None);
        assert_eq!(args.history, 100);
        assert!(!args.json_stats);
    }

    #[test]
    fn test_args_reject_zero_capacity() {
        assert!(Args::try_parse_from(["lrush", "--capacity", "0"]).is_err());
        assert!(Args::try_parse_from(["lrush", "-c", "-4"]).is_err());
    }

    #[test]
    fn test_args_script() {
        let args = Args::try_parse_from(["lrush", "-c", "3", "--script", "ops.txt"]).unwrap();
        assert_eq!(args.capacity, Some(3));
        assert_eq!(args.script, Some(PathBuf::from("ops.txt")));
    }
}
