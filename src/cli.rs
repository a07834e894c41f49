//! CLI interface for Simon Mask
//!
//! Provides command-line interface for:
//! - Generating periodic truth tables
//! - Recovering a hidden mask with the simulated sampling oracle
//! - Validating a candidate mask against a truth table

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::bitmap;
use crate::bitvec::BitVector;
use crate::recovery::{MaskRecovery, RecoveryConfig};
use crate::truth_table::TruthTable;
use crate::validator::{check_mask, MaskCheck};

#[derive(Parser, Debug)]
#[command(name = "simon-mask")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recover the hidden XOR mask of a 2-to-1 boolean function")]
#[command(
    long_about = "Simon Mask - classical GF(2) post-processing for Simon's problem\n\n\
    Given the truth table of a function f with f(x) = f(x XOR s), samples vectors\n\
    orthogonal to s, builds a row-echelon basis online, completes it, solves for s\n\
    by back substitution and validates the result against the table.\n\n\
    Examples:\n\
      simon-mask generate -m 110 -o table.json --seed 7\n\
      simon-mask recover -t table.json --max-samples 500 -v\n\
      simon-mask validate -t table.json -m 110"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a truth table with a given hidden mask
    Generate {
        /// Hidden mask as a bit string, e.g. 110
        #[arg(short, long, value_name = "BITS", help_heading = "Required")]
        mask: BitVector,

        /// Generate the permutation x -> x XOR mask instead of a 2-to-1 function
        #[arg(long)]
        one_to_one: bool,

        /// Seed for the random value assignment
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Recover the hidden mask of a truth table
    #[command(
        long_about = "Recover the hidden mask of a truth table\n\n\
        Samples are drawn from a classical simulation of the measurement step,\n\
        which is exact but costs O(4^n) to set up, so tables are limited to 12 bits.\n\n\
        Example:\n\
          simon-mask recover -t table.json --seed 1 --max-samples 1000 -v"
    )]
    Recover {
        /// Truth table JSON file ({\"000\": \"101\", ...})
        #[arg(short, long, value_name = "FILE", help_heading = "Required")]
        table: PathBuf,

        /// Seed for the simulated sampling oracle
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// Give up after this many samples (default: 64 per bit of width)
        #[arg(long, value_name = "N", conflicts_with = "unbounded")]
        max_samples: Option<usize>,

        /// Sample until the basis is ready, with no cap
        #[arg(long)]
        unbounded: bool,

        /// Print the completed basis and sample statistics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check whether a mask is a period of a truth table
    Validate {
        /// Truth table JSON file
        #[arg(short, long, value_name = "FILE", help_heading = "Required")]
        table: PathBuf,

        /// Candidate mask as a bit string
        #[arg(short, long, value_name = "BITS", help_heading = "Required")]
        mask: BitVector,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    execute(cli, &mut stdout.lock())
}

/// Run a parsed command, writing human output to `out`.
pub fn execute<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            mask,
            one_to_one,
            seed,
            output,
        } => {
            let table = if one_to_one {
                bitmap::periodic_one_to_one(&mask)?
            } else {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                bitmap::valid_two_to_one(&mask, &mut rng)?
            };

            match output {
                Some(path) => {
                    table
                        .save(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    writeln!(out, "Wrote {}-bit table to {}", table.width(), path.display())?;
                }
                None => {
                    serde_json::to_writer_pretty(&mut *out, &table)?;
                    writeln!(out)?;
                }
            }
            Ok(())
        }

        Commands::Recover {
            table,
            seed,
            max_samples,
            unbounded,
            verbose,
        } => {
            let data = TruthTable::load(&table)
                .with_context(|| format!("loading {}", table.display()))?;

            if verbose {
                writeln!(out, "Simon Mask v{} - Recovery", env!("CARGO_PKG_VERSION"))?;
                writeln!(out, "==============================")?;
                writeln!(out, "Table: {} ({} bits)", table.display(), data.width())?;
            }

            let mut config = match (max_samples, unbounded) {
                (Some(cap), _) => RecoveryConfig::bounded(cap),
                (None, true) => RecoveryConfig::unbounded(),
                (None, false) => RecoveryConfig::for_width(data.width()),
            };
            config.seed = seed;
            let report = MaskRecovery::new(config)
                .recover_simulated(&data)
                .context("recovery failed")?;

            if verbose {
                writeln!(out, "Samples drawn: {}", report.samples)?;
                writeln!(
                    out,
                    "  inserted {}  reduced {}  degenerate {}  dependent {}  unresolved {}",
                    report.stats.inserted,
                    report.stats.reduced,
                    report.stats.degenerate,
                    report.stats.dependent,
                    report.stats.unresolved
                )?;
                writeln!(out, "Missing pivot: {}", report.missing_index)?;
                writeln!(out, "Completed basis:")?;
                for row in &report.rows {
                    writeln!(out, "  {}", row)?;
                }
            }
            writeln!(out, "Mask: {}", report.mask)?;
            Ok(())
        }

        Commands::Validate { table, mask } => {
            let data = TruthTable::load(&table)
                .with_context(|| format!("loading {}", table.display()))?;

            match check_mask(&mask, &data) {
                MaskCheck::Valid => {
                    writeln!(out, "Mask {} is a valid period", mask)?;
                    Ok(())
                }
                MaskCheck::WidthMismatch => bail!(
                    "mask {} has {} bits but the table has {}",
                    mask,
                    mask.len(),
                    data.width()
                ),
                MaskCheck::Counterexample {
                    key,
                    value,
                    partner_value,
                } => bail!(
                    "mask {} is not a period: f({}) = {} but f({}) = {}",
                    mask,
                    key,
                    value,
                    key ^ mask,
                    partner_value
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bit_string_arguments() {
        let cli = Cli::try_parse_from(["simon-mask", "validate", "-t", "t.json", "-m", "101"]).unwrap();
        match cli.command {
            Commands::Validate { mask, .. } => assert_eq!(mask.to_string(), "101"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Cli::try_parse_from(["simon-mask", "validate", "-t", "t.json", "-m", "1a"]).is_err());
    }

    #[test]
    fn test_generate_to_stdout_is_json() {
        let cli = Cli::try_parse_from(["simon-mask", "generate", "-m", "11", "--one-to-one"]).unwrap();
        let mut out = Vec::new();
        execute(cli, &mut out).unwrap();
        let table = TruthTable::from_json_str(std::str::from_utf8(&out).unwrap()).unwrap();
        assert_eq!(table.get("00".parse().unwrap()).unwrap().to_string(), "11");
    }

    #[test]
    fn test_unbounded_conflicts_with_cap() {
        assert!(Cli::try_parse_from([
            "simon-mask", "recover", "-t", "t.json", "--max-samples", "10", "--unbounded",
        ])
        .is_err());
        let cli = Cli::try_parse_from(["simon-mask", "recover", "-t", "t.json", "--unbounded"]).unwrap();
        assert!(matches!(cli.command, Commands::Recover { unbounded: true, max_samples: None, .. }));
    }
}
