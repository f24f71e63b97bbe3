use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input .json map export (with an `events` entry)
    pub input: PathBuf,
    /// Only render the event with this id
    #[arg(long)]
    pub event: Option<u32>,
    /// Only render this page (1-based)
    #[arg(long)]
    pub page: Option<usize>,
    /// Write listings and command lists here instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
