//! Command-line configuration for the `lzsave` tool.
//!
//! Every subcommand works with defaults; only the files to operate on are
//! required.

use clap::{Parser, Subcommand, ValueEnum};
use lzsave_core::{Alphabet, DecodeMode, DecoderConfig, DictionaryLimit, LzCodec};
use std::path::PathBuf;

use crate::save::{DEFAULT_PREFIX, DEFAULT_SUFFIX, MONEY_SCAN_LIMIT};

/// Save directory under the user's home, relative path segments.
const SAVE_DIR_SEGMENTS: [&str; 3] = ["AppData", "Local", "User Data"];

#[derive(Debug, Parser)]
#[command(name = "lzsave", version, about = "Inspect and edit LZ-compressed game save files")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output alphabet of the save format
    #[arg(long, value_enum, default_value_t = AlphabetChoice::Base64, global = true)]
    pub alphabet: AlphabetChoice,

    /// Treat malformed streams as empty instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Cap the decode dictionary at 65536 entries
    #[arg(long, global = true)]
    pub capped_dictionary: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List save files in a directory
    Locate {
        /// Directory to search (default: the game's save directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,

        #[arg(long, default_value = DEFAULT_SUFFIX)]
        suffix: String,
    },

    /// Decompress a save file into pretty-printed JSON
    Decode {
        file: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print codec statistics
        #[arg(long)]
        stats: bool,
    },

    /// Compress a JSON document into a save file
    Encode {
        input: PathBuf,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Replace the money value in a save file
    SetMoney {
        file: PathBuf,

        /// Money value currently shown in game
        #[arg(long, allow_negative_numbers = true)]
        current: i64,

        /// Money value to write
        #[arg(long, allow_negative_numbers = true)]
        new: i64,

        /// Number of leading game variables to search
        #[arg(long, default_value_t = MONEY_SCAN_LIMIT)]
        scan_limit: usize,

        /// Report the change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Compress and decompress a generated save document
    Roundtrip {
        /// Random seed (default: time-based)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of game variables in each generated document
        #[arg(long, default_value_t = 500)]
        size: usize,

        /// Number of documents, seeded consecutively
        #[arg(long, default_value_t = 1)]
        count: u64,

        /// Write combined statistics to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlphabetChoice {
    Base64,
    UriSafe,
}

impl Cli {
    /// Codec built from the global flags.
    pub fn codec(&self) -> LzCodec {
        let alphabet = match self.alphabet {
            AlphabetChoice::Base64 => Alphabet::base64(),
            AlphabetChoice::UriSafe => Alphabet::uri_safe(),
        };
        let config = DecoderConfig {
            mode: if self.lenient {
                DecodeMode::Lenient
            } else {
                DecodeMode::Strict
            },
            dictionary_limit: if self.capped_dictionary {
                DictionaryLimit::standard_cap()
            } else {
                DictionaryLimit::Unbounded
            },
        };
        LzCodec::new()
            .with_alphabet(alphabet)
            .with_decoder_config(config)
    }

    /// Print the resolved codec settings.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Alphabet: {:?}", self.alphabet);
        println!("Decode mode: {}", if self.lenient { "lenient" } else { "strict" });
        println!(
            "Dictionary: {}",
            if self.capped_dictionary { "capped" } else { "unbounded" }
        );
        println!();
    }
}

/// The game's save directory, from `USERPROFILE` or `HOME`.
pub fn default_save_dir() -> Option<PathBuf> {
    let home = std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME"))?;
    let mut dir = PathBuf::from(home);
    dir.extend(SAVE_DIR_SEGMENTS);
    Some(dir)
}

/// Seed for generated data when none was given.
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
