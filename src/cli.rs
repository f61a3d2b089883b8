use clap::Parser;

use crate::zip::MatchFlags;

#[derive(Parser, Debug)]
#[command(name = "lhunzip")]
#[command(version)]
#[command(about = "Extract ZIP entries using only their local file headers", long_about = None)]
#[command(after_help = "Examples:\n  \
  lhunzip doc.odt content.xml      print content.xml from doc.odt\n  \
  lhunzip -s -i doc.odt .XML       print the first entry whose name contains .xml\n  \
  lhunzip -n 0 archive.zip         print the first entry\n  \
  lhunzip -l archive.zip           list entries")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Entry name to print to stdout
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// List entries (offset, size, date, time, name)
    #[arg(short = 'l')]
    pub list: bool,

    /// Print the number of entries
    #[arg(short = 'c')]
    pub count: bool,

    /// Print the entry at this position (0-based)
    #[arg(short = 'n', value_name = "INDEX", conflicts_with = "name")]
    pub index: Option<usize>,

    /// Match NAME as a substring of the entry name
    #[arg(short = 's')]
    pub substring: bool,

    /// Match NAME ignoring case
    #[arg(short = 'i')]
    pub ignore_case: bool,

    /// Only consider entries whose header starts after this offset
    #[arg(long = "after", value_name = "OFFSET")]
    pub after: Option<u64>,

    /// Fail when an entry's checksum does not match
    #[arg(long = "strict")]
    pub strict: bool,

    /// Verbose logging (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    /// Match flags for NAME; exact and case-sensitive unless relaxed.
    pub fn match_flags(&self) -> MatchFlags {
        MatchFlags::default()
            .with_exact(!self.substring)
            .with_case_sensitive(!self.ignore_case)
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (q, _) if q > 1 => "off",
            (1, _) => "error",
            (_, 0) => "warn",
            (_, 1) => "debug",
            _ => "trace",
        }
    }
}
