//! Print the directory of OPUS files, or one data block against its axis.
//!
//! Usage:
//!   opus-dump sample.0
//!   opus-dump --spectrum AB sample.0 > ab.tsv
//!
//! Set `RUST_LOG=opus_stream=trace` to log every entry and record.

use anyhow::{Context, Result};
use clap::Parser;
use opus_stream::{EntrySummary, OpusFile, ParseOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "opus-dump", version, about = "Dump the structure of OPUS spectrometer files")]
struct Cli {
    /// Print `x<TAB>y` rows of this binary block (e.g. "AB", "S Sc", "S Ifg")
    #[arg(short, long)]
    spectrum: Option<String>,

    /// Give up on a parameter block after this many records without END
    #[arg(long, env = "OPUS_MAX_PARAMETERS")]
    max_parameters: Option<usize>,

    /// Reject directories declaring more entries than this
    #[arg(long, env = "OPUS_MAX_ENTRIES")]
    max_entries: Option<usize>,

    /// Files to read
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "opus_stream=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ParseOptions {
        max_entries: cli.max_entries,
        max_parameters: cli.max_parameters,
    };

    let mut out = io::stdout().lock();
    for path in &cli.files {
        let mut file = OpusFile::open_with(path, options)
            .with_context(|| format!("failed to read header of {}", path.display()))?;
        match &cli.spectrum {
            Some(name) => print_spectrum(&mut out, &mut file, name, path)?,
            None => print_entries(&mut out, &mut file, path)?,
        }
    }
    Ok(())
}

fn print_entries<R, W>(out: &mut W, file: &mut OpusFile<R>, path: &Path) -> Result<()>
where
    R: io::Read + io::Seek,
    W: Write,
{
    writeln!(out, "# {}", path.display())?;
    let entries = file.header().entries.clone();
    for entry in &entries {
        let summary = file
            .describe(entry)
            .with_context(|| format!("failed to read {} in {}", entry, path.display()))?;
        let description = match summary {
            EntrySummary::Binary(name) => format!("{{{}}}", name),
            EntrySummary::History => "<HISTORY>".to_string(),
            EntrySummary::EntryList => "<ENTRY LIST>".to_string(),
            EntrySummary::Parameters(records) => records
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|"),
            EntrySummary::Undecodable(_) => "NOT DEFINED".to_string(),
        };
        writeln!(out, "{} {}", entry, description)?;
    }
    Ok(())
}

fn print_spectrum<R, W>(out: &mut W, file: &mut OpusFile<R>, name: &str, path: &Path) -> Result<()>
where
    R: io::Read + io::Seek,
    W: Write,
{
    let (axis, data) = file
        .spectrum(name)
        .with_context(|| format!("failed to extract {:?} from {}", name, path.display()))?;
    writeln!(out, "# {} {} ({})", path.display(), name, axis.unit)?;
    for (x, y) in axis.values.iter().zip(&data) {
        writeln!(out, "{}\t{}", x, y)?;
    }
    Ok(())
}
