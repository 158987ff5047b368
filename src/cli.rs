//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Search SubHD for subtitles and download the best match.
///
/// Keywords are tried as one query first; when nothing is found the last
/// keyword is dropped and the search repeats.
#[derive(Parser, Debug)]
#[command(name = "subgrab")]
#[command(author, version, about)]
pub struct Args {
    /// Search keywords, most significant first (e.g. title then year)
    #[arg(required = true, num_args = 1..)]
    pub keywords: Vec<String>,

    /// Only accept results SubHD labels as movies
    #[arg(long)]
    pub movie: bool,

    /// Number of candidates to collect (1-50)
    #[arg(short = 'n', long = "count", value_parser = clap::value_parser!(u8).range(1..=50))]
    pub count: Option<u8>,

    /// Download the N-th ranked candidate instead of the first
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub pick: Option<u16>,

    /// Print the ranked candidates and exit without downloading
    #[arg(long)]
    pub list: bool,

    /// Directory to write the archive into
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Site origin to use instead of the default (mirrors)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
