use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use simplecoin_core::{block::timestamp_string, Block, Chain, MiningConfig, Transaction};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "simplecoin")]
#[command(about = "Mine and verify a local proof-of-work ledger")]
struct Cli {
    #[command(flatten)]
    mining: MiningArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct MiningArgs {
    /// JSON mining config, e.g. {"difficulty":2,"max_attempts":100000,"parallel":true}
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Required leading '0' hex characters per block hash
    #[arg(long, global = true)]
    difficulty: Option<u32>,
    /// Give up on a block after this many nonces
    #[arg(long, global = true)]
    max_attempts: Option<u64>,
    /// Search nonces on all cores
    #[arg(long, global = true)]
    parallel: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chain from two sample payment batches and validate it
    Demo,
    /// Mine one block per batch from a JSON file of transaction arrays
    Mine {
        /// Path to a file like [[{"from":"a","to":"b","amount":1.0}], ...]
        #[arg(long)]
        batches: PathBuf,
    },
}

#[derive(Serialize)]
struct BlockRow {
    index: u64,
    timestamp: String,
    nonce: u64,
    hash: String,
    prev_hash: Option<String>,
    tx_count: usize,
    transactions: Vec<Transaction>,
}

impl From<&Block> for BlockRow {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index(),
            timestamp: timestamp_string(&block.timestamp()),
            nonce: block.nonce(),
            hash: hex::encode(block.hash()),
            prev_hash: block.prev_hash().map(hex::encode),
            tx_count: block.transactions().len(),
            transactions: block.transactions().to_vec(),
        }
    }
}

#[derive(Serialize)]
struct Summary {
    difficulty: u32,
    length: usize,
    valid: bool,
    blocks: Vec<BlockRow>,
}

impl MiningArgs {
    fn resolve(&self) -> Result<MiningConfig> {
        let mut config = match &self.config {
            Some(path) => MiningConfig::load(path)?,
            None => MiningConfig::default(),
        };
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if self.max_attempts.is_some() {
            config.max_attempts = self.max_attempts;
        }
        config.parallel |= self.parallel;
        config.validate()?;
        Ok(config)
    }
}

fn demo_batches() -> Vec<Vec<Transaction>> {
    vec![
        vec![
            Transaction::new("adam", "john", 100.0),
            Transaction::new("adam", "jane", 100.0),
            Transaction::new("jane", "adam", 5.0),
        ],
        vec![
            Transaction::new("frank", "beth", 100.0),
            Transaction::new("jimmy", "timmy", 100.0),
            Transaction::new("dude1", "dude2", 5.0),
        ],
    ]
}

fn read_batches(path: &Path) -> Result<Vec<Vec<Transaction>>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading batches from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing batches in {}", path.display()))
}

fn build_chain(config: MiningConfig, batches: Vec<Vec<Transaction>>) -> Result<Summary> {
    let difficulty = config.difficulty;
    let mut chain = Chain::with_config(config).context("mining genesis block")?;
    for (i, batch) in batches.into_iter().enumerate() {
        let block = chain
            .add_block(batch)
            .with_context(|| format!("mining block for batch {i}"))?;
        info!(index = block.index(), nonce = block.nonce(), "appended block");
    }
    let valid = chain.is_chain_valid()?;
    let mut blocks: Vec<BlockRow> = chain.ancestors().map(BlockRow::from).collect();
    blocks.reverse();
    Ok(Summary {
        difficulty,
        length: chain.len(),
        valid,
        blocks,
    })
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = cli.mining.resolve()?;
    let batches = match &cli.cmd {
        Command::Demo => demo_batches(),
        Command::Mine { batches } => read_batches(batches)?,
    };

    let summary = build_chain(config, batches)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if !summary.valid {
        anyhow::bail!("chain failed validation");
    }
    Ok(())
}
