//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// qualia - Conditionally comment and uncomment qualified blocks
///
/// A qualified block looks like:
///
///   # BEGIN laptop
///   export PATH="$HOME/bin:$PATH"
///   # END laptop
///
/// Blocks whose quality is given are uncommented; all other blocks are
/// commented out. Running qualia again is safe; only the last run counts:
///
///   qualia <infile | qualia laptop | qualia desktop
#[derive(Parser, Debug)]
#[command(name = "qualia")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Qualities to activate, each taken verbatim
    #[arg(value_name = "QUALITY")]
    pub qualities: Vec<String>,

    /// Comma-separated qualities to activate in addition to QUALITY
    #[arg(
        long,
        value_name = "LIST",
        env = "QUALIA_QUALITIES",
        value_delimiter = ','
    )]
    pub quality_list: Vec<String>,

    /// Read from a file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// List the qualified blocks in the input instead of rewriting it
    #[arg(short, long)]
    pub list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// All qualities from the positional arguments and the quality list.
    pub fn active_qualities(&self) -> impl Iterator<Item = &str> {
        self.qualities
            .iter()
            .chain(&self.quality_list)
            .map(String::as_str)
            .filter(|q| !q.is_empty())
    }
}
