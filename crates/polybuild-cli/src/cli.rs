use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Polybuild CLI - Assemble polymer monomers and coarse-grained units from rigid fragments joined at ports.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a monomer described in a TOML build file and print a summary of it.
    Build(BuildArgs),
    /// Draw a random copolymer sequence.
    Sequence(SequenceArgs),
    /// List the available fragments and the ports each exposes.
    Fragments(FragmentsArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the build file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Additional fragment library; its entries extend or shadow the built-in ones.
    /// Overrides `library` from the build file.
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Cap every open port of the result with hydrogen, overriding the build file.
    #[arg(long)]
    pub terminate: bool,
}

/// Arguments for the `sequence` subcommand.
#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Number of distinct components (1 to 11).
    #[arg(short, long, value_name = "INT")]
    pub copolymers: usize,

    /// Length of the sequence.
    #[arg(short, long, value_name = "INT")]
    pub monomers: usize,

    /// Seed for a reproducible sequence.
    #[arg(short, long, value_name = "INT")]
    pub seed: Option<u64>,
}

/// Arguments for the `fragments` subcommand.
#[derive(Args, Debug)]
pub struct FragmentsArgs {
    /// Additional fragment library to list together with the built-in one.
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,
}
