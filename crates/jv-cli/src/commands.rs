use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use jv_crypto::{Proof, ProofVerifier};
use jv_journal::{
    ChainValidator, DigestVerifier, GetBlockResult, GetRevisionResult, JournalBlockRecord,
    RevisionRecord,
};
use jv_types::{LedgerDigest, LedgerHash};
use serde_json::Value;
use tracing::info;

use crate::cli::*;
use crate::config::CliConfig;
use crate::output::{self, Outcome};

/// Runs one command. `Ok(false)` means the input was checked and did not
/// verify.
pub fn run_command(cli: Cli, config: &CliConfig) -> anyhow::Result<bool> {
    match cli.command {
        Command::VerifyRevision(args) => cmd_verify_revision(args, config),
        Command::VerifyBlock(args) => cmd_verify_block(args, config),
        Command::ValidateChain(args) => cmd_validate_chain(args, config),
        Command::ShowDigest(args) => cmd_show_digest(args, config),
    }
}

fn cmd_verify_revision(args: VerifyRevisionArgs, config: &CliConfig) -> anyhow::Result<bool> {
    let digest = read_digest(&args.digest)?;
    let (revision, embedded) = read_revision(&args.revision)?;
    let proof = resolve_proof(args.proof.as_deref(), embedded)?;

    let verified = DigestVerifier::verify_revision(&revision, &digest, &proof)?;
    let outcome = Outcome {
        subject: "Revision",
        leaf: revision.hash().to_base64(),
        verified,
        tamper_rejected: tamper_check(verified, revision.hash(), &digest, &proof, config)?,
    };
    output::print_outcome(config.format, &outcome)?;
    Ok(verified && outcome.tamper_rejected != Some(false))
}

fn cmd_verify_block(args: VerifyBlockArgs, config: &CliConfig) -> anyhow::Result<bool> {
    let digest = read_digest(&args.digest)?;
    let (block, embedded) = read_block(&args.block)?;
    let proof = resolve_proof(args.proof.as_deref(), embedded)?;

    let verified = DigestVerifier::verify_block(&block, &digest, &proof)?;
    let outcome = Outcome {
        subject: "Block",
        leaf: block.block_hash.to_base64(),
        verified,
        tamper_rejected: tamper_check(verified, &block.block_hash, &digest, &proof, config)?,
    };
    output::print_outcome(config.format, &outcome)?;
    Ok(verified && outcome.tamper_rejected != Some(false))
}

fn cmd_validate_chain(args: ValidateChainArgs, config: &CliConfig) -> anyhow::Result<bool> {
    let mut blocks = Vec::new();
    for path in &args.files {
        let text = read(path)?;
        let mut parsed = JournalBlockRecord::from_json_lines(&text)
            .with_context(|| format!("decoding blocks in {}", path.display()))?;
        info!(file = %path.display(), blocks = parsed.len(), "loaded journal export");
        blocks.append(&mut parsed);
    }
    let report = ChainValidator::verify_chain(&blocks).context("hash chain validation failed")?;
    output::print_chain(config.format, &report)?;
    Ok(true)
}

fn cmd_show_digest(args: ShowDigestArgs, config: &CliConfig) -> anyhow::Result<bool> {
    let digest = read_digest(&args.digest)?;
    output::print_digest(config.format, &digest)?;
    Ok(true)
}

fn tamper_check(
    verified: bool,
    leaf: &LedgerHash,
    digest: &LedgerDigest,
    proof: &Proof,
    config: &CliConfig,
) -> anyhow::Result<Option<bool>> {
    if !verified || config.tamper_trials == 0 {
        return Ok(None);
    }
    let rejected =
        ProofVerifier::verify_tampered(leaf, &digest.digest, proof, config.tamper_trials)?;
    Ok(Some(rejected))
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_digest(path: &Path) -> anyhow::Result<LedgerDigest> {
    let digest: LedgerDigest = serde_json::from_str(&read(path)?)
        .with_context(|| format!("decoding digest {}", path.display()))?;
    if digest.digest.is_empty() {
        bail!("digest {} is empty", path.display());
    }
    Ok(digest)
}

/// A revision file holds either a bare revision or a revision response.
fn read_revision(path: &Path) -> anyhow::Result<(RevisionRecord, Option<Proof>)> {
    let text = read(path)?;
    let decode = || -> anyhow::Result<(RevisionRecord, Option<Proof>)> {
        if has_key(&text, "Revision")? {
            let response: GetRevisionResult = serde_json::from_str(&text)?;
            Ok((response.revision()?, response.proof()?))
        } else {
            Ok((RevisionRecord::from_json(&text)?, None))
        }
    };
    decode().with_context(|| format!("decoding revision {}", path.display()))
}

/// A block file holds either a bare block or a block response.
fn read_block(path: &Path) -> anyhow::Result<(JournalBlockRecord, Option<Proof>)> {
    let text = read(path)?;
    let decode = || -> anyhow::Result<(JournalBlockRecord, Option<Proof>)> {
        if has_key(&text, "Block")? {
            let response: GetBlockResult = serde_json::from_str(&text)?;
            Ok((response.block()?, response.proof()?))
        } else {
            Ok((JournalBlockRecord::from_json(&text)?, None))
        }
    };
    decode().with_context(|| format!("decoding block {}", path.display()))
}

fn has_key(text: &str, key: &str) -> anyhow::Result<bool> {
    let value: Value = serde_json::from_str(text)?;
    Ok(value.get(key).is_some())
}

/// An explicit proof file wins over a proof embedded in the response.
fn resolve_proof(path: Option<&Path>, embedded: Option<Proof>) -> anyhow::Result<Proof> {
    match (path, embedded) {
        (Some(path), _) => Proof::parse(read(path)?.trim())
            .with_context(|| format!("decoding proof {}", path.display())),
        (None, Some(proof)) => Ok(proof),
        (None, None) => bail!("no proof given: pass --proof or a response that embeds one"),
    }
}
