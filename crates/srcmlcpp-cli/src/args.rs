//! Command-line argument definitions for the srcmlcpp CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input and output paths, what is
//! printed, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// What the CLI prints for the input file.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// The srcML tree, indented
    Xml,
    /// One line per element of the parsed tree
    Overview,
    /// The code regenerated from the parsed tree
    Code,
    /// The code converted to srcML and back
    Roundtrip,
}

/// Command-line arguments for the srcmlcpp tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input C++ file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file, standard output if absent
    #[arg(short, long)]
    pub output: Option<String>,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Overview)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
