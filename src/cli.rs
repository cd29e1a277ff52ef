use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Error;
use crate::state::SessionState;

#[derive(Parser, Debug)]
#[command(
    name = "asv-select",
    about = "Pick ASVs and timepoints for a downstream workflow. Starts the GUI when no command is given."
)]
pub struct Cli {
    /// JSON config with column names and delimiter (default: $ASV_SELECT_CONFIG).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the ASVs and timestamps available for selection.
    List {
        /// Reference FASTA / FASTQ file(s); duplicated ASVs keep the longest sequence.
        #[arg(long, num_args = 1..)]
        reference: Vec<PathBuf>,
        /// Metadata table (.tsv / .csv).
        #[arg(long)]
        metadata: Option<PathBuf>,
    },
    /// Write the metadata rows matching the chosen ASVs and timestamps.
    Export {
        #[arg(long, required = true, num_args = 1..)]
        reference: Vec<PathBuf>,
        #[arg(long)]
        metadata: PathBuf,
        /// ASV names to keep.
        #[arg(long = "asv", required = true, num_args = 1..)]
        asvs: Vec<String>,
        /// Timestamps to keep.
        #[arg(long = "timestamp", required = true, num_args = 1..)]
        timestamps: Vec<String>,
        /// Filtered metadata output.
        #[arg(short, long)]
        output: PathBuf,
        /// Also write the chosen ASV sequences as FASTA.
        #[arg(long)]
        fasta: Option<PathBuf>,
    },
    /// Write the `ASV,Length` table of the reference.
    Lengths {
        #[arg(long, required = true, num_args = 1..)]
        reference: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(command: Commands, config: Config) -> Result<()> {
    let mut state = SessionState::new(config);

    match command {
        Commands::List {
            reference,
            metadata,
        } => {
            if reference.is_empty() && metadata.is_none() {
                bail!("nothing to list: pass --reference and/or --metadata");
            }
            if !reference.is_empty() {
                state.load_reference(&reference).context("loading reference")?;
            }
            if let Some(path) = &metadata {
                state.load_metadata(path).context("loading metadata")?;
            }
            print_listing(&state);
        }
        Commands::Export {
            reference,
            metadata,
            asvs,
            timestamps,
            output,
            fasta,
        } => {
            state.load_reference(&reference).context("loading reference")?;
            state.load_metadata(&metadata).context("loading metadata")?;

            for id in state.select_identifiers(asvs) {
                log::warn!("ASV '{id}' is not in the reference, skipping");
            }
            for ts in state.select_timestamps(timestamps) {
                log::warn!("Timestamp '{ts}' is not in the metadata, skipping");
            }
            if !state.export_enabled() {
                return Err(Error::EmptySelection.into());
            }

            let n = state
                .export_metadata(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{n} rows written to {}", output.display());

            if let Some(path) = &fasta {
                let n = state
                    .export_reference(path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("{n} sequences written to {}", path.display());
            }
        }
        Commands::Lengths { reference, output } => {
            state.load_reference(&reference).context("loading reference")?;
            let n = state
                .export_lengths(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{n} ASV lengths written to {}", output.display());
        }
    }

    Ok(())
}

fn print_listing(state: &SessionState) {
    if let Some(reference) = &state.reference {
        println!("ASVs ({}):", reference.len());
        for id in reference.identifiers() {
            println!("  {id}");
        }
    }
    if let Some(metadata) = &state.metadata {
        println!("Timestamps ({}):", metadata.timestamps.len());
        for ts in &metadata.timestamps {
            println!("  {ts}");
        }
    }
}
