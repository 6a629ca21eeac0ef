//! Interactive read-eval-print loop over a [`Session`]

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::command::parse_line;
use crate::handler::{Reply, Session, HELP};

const PROMPT: &str = "> ";

/// Ask for a cache capacity until a positive integer arrives
pub fn prompt_capacity<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
    let mut line = Vec::new();

    loop {
        write!(output, "Enter size of the cache (positive integer): ")?;
        output.flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            bail!("input closed before a cache size was entered");
        }

        match String::from_utf8_lossy(&line).trim().parse::<i64>() {
            Ok(n) if n > 0 => {
                let size = usize::try_from(n).context("cache size does not fit in memory")?;
                writeln!(output, "Cache size set to {}.", size)?;
                return Ok(size);
            }
            Ok(_) => writeln!(output, "Please enter a positive integer.")?,
            Err(_) => writeln!(output, "Invalid input. Please enter a positive integer.")?,
        }
    }
}

/// Open a command script for non-interactive runs
pub fn open_script(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open script {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Feed lines from `input` to `session` until `EXIT` or end of input
///
/// Every non-blank line produces exactly one reply; `EXIT` answers `BYE`.
/// A line that is not UTF-8 is rejected and the loop carries on.
/// `interactive` controls the usage banner and the `> ` prompt.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    output: &mut W,
    interactive: bool,
) -> Result<()> {
    if interactive {
        writeln!(output, "{}", HELP)?;
    }

    let mut line = Vec::new();
    loop {
        if interactive {
            write!(output, "{}", PROMPT)?;
            output.flush()?;
        }

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            info!("end of input");
            break;
        }

        match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(cmd)) => {
                let reply = session.handle(cmd);
                writeln!(output, "{}", reply)?;
                if reply == Reply::Exit {
                    break;
                }
            }
            Err(e) => {
                warn!(
                    "Rejected line {:?}: {}",
                    String::from_utf8_lossy(&line).trim_end(),
                    e
                );
                writeln!(output, "{}", e)?;
            }
        }
    }

    output.flush()?;
    let stats = session.cache().stats();
    info!(
        hits = stats.hits(),
        misses = stats.misses(),
        "shell finished"
    );
    Ok(())
}
