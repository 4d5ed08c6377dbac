// crates/vole-cli/src/main.rs

//! Thin command-line driver for the VOLE commitment core: commit, open,
//! and verify end to end, for manual inspection and smoke testing
//! (`SPEC_FULL.md` §A — explicitly outside the "core" the spec's size
//! budget covers).

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vole_core::params::{ParamSet, IV_SIZE};
use vole_core::bits::chal_dec;
use vole_crypto::{AesCtrPrg, Shake256H0, Shake256H1};
use vole::commit::stream_vole_commit;
use vole::reconstruct::{vole_reconstruct_hcom, TreeDecommitment};

#[derive(Parser, Debug)]
#[command(
    name = "vole-cli",
    about = "VOLE commitment core reference CLI",
    long_about = "VOLE commitment core reference CLI.\n\nUse this tool to commit to a root seed, open a challenge, and verify the resulting hcom end to end.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Commit to a (fresh or supplied) root seed and write a commitment
    /// manifest (seed, iv, param set, hcom, u, c).
    Commit {
        /// Named parameter set.
        #[arg(long, value_enum, default_value_t = ParamSetOpt::Faest128s)]
        param_set: ParamSetOpt,

        /// Root seed, hex-encoded (`lambda/8` bytes). Random if omitted.
        #[arg(long)]
        seed_hex: Option<String>,

        /// PRG/hash IV, hex-encoded (16 bytes). All-zero if omitted.
        #[arg(long)]
        iv_hex: Option<String>,

        /// Output path for the commitment manifest (JSON).
        #[arg(long, default_value = "commitment.json")]
        out: PathBuf,
    },

    /// Decode a challenge against a commitment manifest and write the
    /// per-tree decommitments (`pdec`, `com_j`).
    Open {
        /// Input commitment manifest (from `commit`).
        #[arg(long)]
        manifest: PathBuf,

        /// Challenge, hex-encoded (`lambda/8` bytes).
        #[arg(long)]
        chal_hex: String,

        /// Output path for the decommitments (JSON).
        #[arg(long, default_value = "decommit.json")]
        out: PathBuf,
    },

    /// Reconstruct `hcom` from a manifest's decommitments and compare it
    /// against the manifest's recorded `hcom`.
    Verify {
        /// Input commitment manifest (from `commit`).
        #[arg(long)]
        manifest: PathBuf,

        /// Input decommitments (from `open`).
        #[arg(long)]
        decommit: PathBuf,

        /// Challenge, hex-encoded (`lambda/8` bytes); must match the one
        /// passed to `open`.
        #[arg(long)]
        chal_hex: String,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum ParamSetOpt {
    Faest128s,
    Faest128f,
    Faest192s,
    Faest192f,
    Faest256s,
    Faest256f,
}

impl ParamSetOpt {
    const fn resolve(self) -> ParamSet {
        match self {
            Self::Faest128s => ParamSet::faest_128s(),
            Self::Faest128f => ParamSet::faest_128f(),
            Self::Faest192s => ParamSet::faest_192s(),
            Self::Faest192f => ParamSet::faest_192f(),
            Self::Faest256s => ParamSet::faest_256s(),
            Self::Faest256f => ParamSet::faest_256f(),
        }
    }
}

/// On-disk form of a [`ParamSet`], since the library type isn't
/// `serde`-derived (it has no reason to be, outside this CLI).
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct ParamSetManifest {
    lambda: u32,
    tau0: u32,
    tau1: u32,
    k0: u32,
    k1: u32,
    l: u32,
    universal_hash_b_bits: u32,
}

impl From<ParamSet> for ParamSetManifest {
    fn from(p: ParamSet) -> Self {
        Self {
            lambda: p.lambda,
            tau0: p.tau0,
            tau1: p.tau1,
            k0: p.k0,
            k1: p.k1,
            l: p.l,
            universal_hash_b_bits: p.universal_hash_b_bits,
        }
    }
}

impl From<ParamSetManifest> for ParamSet {
    fn from(m: ParamSetManifest) -> Self {
        Self {
            lambda: m.lambda,
            tau0: m.tau0,
            tau1: m.tau1,
            k0: m.k0,
            k1: m.k1,
            l: m.l,
            universal_hash_b_bits: m.universal_hash_b_bits,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct CommitmentManifest {
    param_set: ParamSetManifest,
    seed_hex: String,
    iv_hex: String,
    hcom_hex: String,
    u_hex: String,
    c_hex: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct TreeDecommitFile {
    pdec_hex: Vec<String>,
    com_j_hex: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct DecommitFile {
    trees: Vec<TreeDecommitFile>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Commit {
            param_set,
            seed_hex,
            iv_hex,
            out,
        } => commit(param_set.resolve(), seed_hex, iv_hex, out),

        Cmd::Open {
            manifest,
            chal_hex,
            out,
        } => open(manifest, chal_hex, out),

        Cmd::Verify {
            manifest,
            decommit,
            chal_hex,
        } => verify(manifest, decommit, chal_hex),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

fn decode_hex(name: &str, s: &str, expected_len: usize) -> Result<Vec<u8>> {
    let bytes = hex::decode(s).with_context(|| format!("{name} is not valid hex"))?;
    if bytes.len() != expected_len {
        bail!(
            "{name} has length {} bytes, expected {expected_len}",
            bytes.len()
        );
    }
    Ok(bytes)
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

fn commit(
    params: ParamSet,
    seed_hex: Option<String>,
    iv_hex: Option<String>,
    out: PathBuf,
) -> Result<()> {
    let lambda_bytes = params.lambda_bytes() as usize;
    let seed = match seed_hex {
        Some(s) => decode_hex("--seed-hex", &s, lambda_bytes)?,
        None => random_bytes(lambda_bytes),
    };
    let iv_bytes = match iv_hex {
        Some(s) => decode_hex("--iv-hex", &s, IV_SIZE)?,
        None => vec![0u8; IV_SIZE],
    };
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&iv_bytes);

    info!(lambda = params.lambda, tau = params.tau(), "committing");
    let prg = AesCtrPrg;
    let h0 = Shake256H0;
    let commitment =
        stream_vole_commit::<_, _, Shake256H1>(&seed, &iv, &params, &prg, &h0)
            .context("stream_vole_commit failed")?;

    let manifest = CommitmentManifest {
        param_set: params.into(),
        seed_hex: hex::encode(&seed),
        iv_hex: hex::encode(iv),
        hcom_hex: hex::encode(&commitment.hcom),
        u_hex: hex::encode(&commitment.u),
        c_hex: commitment.c.iter().map(hex::encode).collect(),
    };

    ensure_parent_dir(&out)?;
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest")?;
    fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;

    info!(hcom = %manifest.hcom_hex, out = %out.display(), "commitment written");
    Ok(())
}

fn load_manifest(path: &Path) -> Result<CommitmentManifest> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {} as a commitment manifest", path.display()))
}

fn open(manifest_path: PathBuf, chal_hex: String, out: PathBuf) -> Result<()> {
    let manifest = load_manifest(&manifest_path)?;
    let params: ParamSet = manifest.param_set.into();
    let seed = decode_hex("manifest seed", &manifest.seed_hex, params.lambda_bytes() as usize)?;
    let iv_bytes = decode_hex("manifest iv", &manifest.iv_hex, IV_SIZE)?;
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&iv_bytes);
    let chal = decode_hex("--chal-hex", &chal_hex, params.lambda_bytes() as usize)?;

    let prg = AesCtrPrg;
    let h0 = Shake256H0;
    let commitment = stream_vole_commit::<_, _, Shake256H1>(&seed, &iv, &params, &prg, &h0)
        .context("re-deriving trees from manifest seed")?;

    let mut trees = Vec::with_capacity(params.tau() as usize);
    for t in 0..params.tau() {
        let bits = chal_dec(&chal, t, &params).context("decode challenge window")?;
        let (pdec, com_j) = commitment
            .open_tree::<_, _, Shake256H1>(t, &bits, &iv, &prg, &h0)
            .context("opening tree")?;
        info!(tree = t, hidden_leaf = vole_core::bits::num_rec(&bits), "opened");
        trees.push(TreeDecommitFile {
            pdec_hex: pdec.iter().map(hex::encode).collect(),
            com_j_hex: hex::encode(com_j),
        });
    }

    ensure_parent_dir(&out)?;
    let json = serde_json::to_string_pretty(&DecommitFile { trees }).context("serialize decommitments")?;
    fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;
    info!(out = %out.display(), "decommitments written");
    Ok(())
}

fn verify(manifest_path: PathBuf, decommit_path: PathBuf, chal_hex: String) -> Result<()> {
    let manifest = load_manifest(&manifest_path)?;
    let params: ParamSet = manifest.param_set.into();
    let iv_bytes = decode_hex("manifest iv", &manifest.iv_hex, IV_SIZE)?;
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&iv_bytes);
    let chal = decode_hex("--chal-hex", &chal_hex, params.lambda_bytes() as usize)?;
    let expected_hcom = decode_hex("manifest hcom", &manifest.hcom_hex, 2 * params.lambda_bytes() as usize)?;

    let text = fs::read_to_string(&decommit_path)
        .with_context(|| format!("read {}", decommit_path.display()))?;
    let decommit_file: DecommitFile = serde_json::from_str(&text)
        .with_context(|| format!("parse {} as decommitments", decommit_path.display()))?;
    if decommit_file.trees.len() != params.tau() as usize {
        bail!(
            "decommit file has {} trees, expected {}",
            decommit_file.trees.len(),
            params.tau()
        );
    }

    let mut pdecs = Vec::with_capacity(decommit_file.trees.len());
    let mut com_js = Vec::with_capacity(decommit_file.trees.len());
    for tree in &decommit_file.trees {
        let pdec: Vec<Vec<u8>> = tree
            .pdec_hex
            .iter()
            .map(|s| hex::decode(s).context("decode pdec hex"))
            .collect::<std::result::Result<_, _>>()?;
        let com_j = hex::decode(&tree.com_j_hex).context("decode com_j hex")?;
        pdecs.push(pdec);
        com_js.push(com_j);
    }
    let decommits: Vec<TreeDecommitment<'_>> = pdecs
        .iter()
        .zip(com_js.iter())
        .map(|(pdec, com_j)| TreeDecommitment {
            pdec,
            com_j,
        })
        .collect();

    let prg = AesCtrPrg;
    let h0 = Shake256H0;
    match vole_reconstruct_hcom::<_, _, Shake256H1>(
        &decommits,
        &chal,
        &params,
        &iv,
        &prg,
        &h0,
        Some(&expected_hcom),
    ) {
        Ok(hcom) => {
            info!(hcom = %hex::encode(hcom), "verification succeeded");
            Ok(())
        }
        Err(err) => {
            bail!("verification failed: {err}");
        }
    }
}
