use crate::meter::{Subdivision, TimeSignature};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Starting tempo in beats per minute (40-220)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(40..=220))]
    pub bpm: Option<u32>,

    /// Time signature: 2/4, 3/4, 4/4, 5/4 or 6/4
    #[arg(short, long)]
    pub time_signature: Option<TimeSignature>,

    /// Subdivision: quarter, eighth, triplet or sixteenth
    #[arg(short, long)]
    pub subdivision: Option<Subdivision>,

    /// Read starting values from a config file (toml, json, yaml, ...)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run silently (visual beat only)
    #[arg(long)]
    pub mute: bool,

    /// Start the metronome immediately
    #[arg(long)]
    pub start: bool,

    /// Run without the terminal UI, showing a progress bar instead
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many complete measures (headless only)
    #[arg(long, requires = "headless", value_parser = clap::value_parser!(u64).range(1..))]
    pub measures: Option<u64>,
}
