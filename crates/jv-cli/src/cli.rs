use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "jv",
    about = "Journal verifier: check revisions, blocks, and hash chains against ledger digests",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (overrides the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Random bit-flip trials after a successful proof check; 0 disables
    #[arg(long, global = true)]
    pub tamper_trials: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify a document revision against a digest
    VerifyRevision(VerifyRevisionArgs),
    /// Verify a journal block against a digest
    VerifyBlock(VerifyBlockArgs),
    /// Validate the hash chain of exported journal blocks
    ValidateChain(ValidateChainArgs),
    /// Print a digest response
    ShowDigest(ShowDigestArgs),
}

#[derive(Args)]
pub struct VerifyRevisionArgs {
    /// Digest response (JSON)
    #[arg(long)]
    pub digest: PathBuf,
    /// Revision record or revision response (JSON)
    #[arg(long)]
    pub revision: PathBuf,
    /// Proof text; defaults to the proof embedded in the revision response
    #[arg(long)]
    pub proof: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyBlockArgs {
    /// Digest response (JSON)
    #[arg(long)]
    pub digest: PathBuf,
    /// Block record or block response (JSON)
    #[arg(long)]
    pub block: PathBuf,
    /// Proof text; defaults to the proof embedded in the block response
    #[arg(long)]
    pub proof: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateChainArgs {
    /// Export files with one JSON block per line, in journal order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ShowDigestArgs {
    pub digest: PathBuf,
}
