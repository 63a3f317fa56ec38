use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use segtree::algebra::Gcd;
use segtree::{Combiner, SegmentTree};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "segtree", about = "Range aggregation over integer sequences with a segment tree")]
struct Cli {
    /// Combining operation.
    #[arg(long, global = true, value_enum, default_value_t = CombinerKind::Sum)]
    combiner: CombinerKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a tree over the given values and print the aggregate of one range.
    Query {
        /// Comma-separated values, e.g. `1,2,3,4`.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<i64>,
        /// First index of the range (inclusive).
        #[arg(allow_hyphen_values = true)]
        low: i64,
        /// Last index of the range (inclusive).
        #[arg(allow_hyphen_values = true)]
        high: i64,
    },
    /// Run a script of `query <low> <high>` / `replace <index> <value>` lines.
    ///
    /// The first non-empty, non-comment line lists the initial values.
    Script {
        /// Script file.
        path: PathBuf,
    },
}

/// Overflow-checked `i64` operations.
///
/// Aggregates are `Option<i64>`: `None` marks a node whose aggregate left
/// the `i64` range and absorbs everything combined with it.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum CombinerKind {
    Sum,
    Product,
    Min,
    Max,
    Gcd,
}

impl Combiner<Option<i64>> for CombinerKind {
    fn combine(&self, left: &Option<i64>, right: &Option<i64>) -> Option<i64> {
        let (left, right) = ((*left)?, (*right)?);
        match self {
            CombinerKind::Sum => left.checked_add(right),
            CombinerKind::Product => left.checked_mul(right),
            CombinerKind::Min => Some(left.min(right)),
            CombinerKind::Max => Some(left.max(right)),
            // gcd(MIN, MIN) and gcd(MIN, 0) are 2^63.
            CombinerKind::Gcd => {
                let magnitude = Gcd.combine(&left.unsigned_abs(), &right.unsigned_abs());
                i64::try_from(magnitude).ok()
            }
        }
    }
}

/// Errors raised by the command line before reaching the tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
enum CliError {
    /// Signed range that cannot address any leaf
    #[error("range [{low}, {high}] out of bounds for length {len}")]
    IndexOutOfRange { low: i64, high: i64, len: usize },

    /// Aggregate left the `i64` range
    #[error("aggregate over [{low}, {high}] overflows i64")]
    Overflow { low: usize, high: usize },
}

type CliTree = SegmentTree<Option<i64>, CombinerKind>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SEGTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query { values, low, high } => {
            let result = run_query(values, low, high, cli.combiner)?;
            println!("{}", result);
        }
        Commands::Script { path } => {
            let reader = BufReader::new(
                File::open(&path)
                    .with_context(|| format!("failed to open script {}", path.display()))?,
            );
            run_script(reader, io::stdout().lock(), cli.combiner)
                .with_context(|| format!("script {} failed", path.display()))?;
        }
    }

    Ok(())
}

fn build_tree(values: Vec<i64>, combiner: CombinerKind) -> Result<CliTree> {
    let leaves = values.into_iter().map(Some).collect();
    SegmentTree::new(leaves, combiner).context("failed to build segment tree")
}

fn run_query(values: Vec<i64>, low: i64, high: i64, combiner: CombinerKind) -> Result<i64> {
    let tree = build_tree(values, combiner)?;
    checked_query(&tree, low, high)
}

/// Query with signed bounds, reporting negatives and overflow as errors.
fn checked_query(tree: &CliTree, low: i64, high: i64) -> Result<i64> {
    let (low, high) = signed_range(low, high, tree.len())?;
    let aggregate = tree
        .query(low, high)
        .with_context(|| format!("query [{}, {}] failed", low, high))?;
    Ok(aggregate.ok_or(CliError::Overflow { low, high })?)
}

fn run_script(reader: impl BufRead, mut out: impl Write, combiner: CombinerKind) -> Result<()> {
    let mut tree: Option<CliTree> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = line_no + 1;

        let Some(active) = tree.as_mut() else {
            let values = parse_numbers(line.split_whitespace(), line_no)?;
            tree = Some(build_tree(values, combiner).with_context(|| format!("line {}", line_no))?);
            continue;
        };

        let mut fields = line.split_whitespace();
        let command = fields.next().unwrap_or_default();
        let args = parse_numbers(fields, line_no)?;
        debug!(line_no, command, ?args, "script command");

        match (command, args.as_slice()) {
            ("query", &[low, high]) => {
                let result =
                    checked_query(active, low, high).with_context(|| format!("line {}", line_no))?;
                writeln!(out, "{}", result)?;
            }
            ("replace", &[index, value]) => {
                let (index, _) = signed_range(index, index, active.len())
                    .with_context(|| format!("line {}", line_no))?;
                active
                    .replace(index, Some(value))
                    .with_context(|| format!("line {}: replace failed", line_no))?;
            }
            _ => bail!(
                "line {}: expected `query <low> <high>` or `replace <index> <value>`, got `{}`",
                line_no,
                line
            ),
        }
    }

    if tree.is_none() {
        bail!("script has no values line");
    }
    Ok(())
}

/// Convert signed indices; a negative bound is out of range.
fn signed_range(low: i64, high: i64, len: usize) -> Result<(usize, usize), CliError> {
    match (usize::try_from(low), usize::try_from(high)) {
        (Ok(low), Ok(high)) => Ok((low, high)),
        _ => Err(CliError::IndexOutOfRange { low, high, len }),
    }
}

fn parse_numbers<'a>(fields: impl Iterator<Item = &'a str>, line_no: usize) -> Result<Vec<i64>> {
    fields
        .map(|field| {
            field
                .parse::<i64>()
                .with_context(|| format!("line {}: invalid integer '{}'", line_no, field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use segtree::SegmentTreeError;
    use test_case::test_case;

    fn script(text: &str, combiner: CombinerKind) -> Result<String> {
        let mut out = Vec::new();
        run_script(text.as_bytes(), &mut out, combiner)?;
        Ok(String::from_utf8(out).expect("script output is utf-8"))
    }

    #[test]
    fn test_negative_low_is_out_of_range() {
        let err = signed_range(-1, 0, 2).unwrap_err();
        assert_eq!(err, CliError::IndexOutOfRange { low: -1, high: 0, len: 2 });
        assert_eq!(err.to_string(), "range [-1, 0] out of bounds for length 2");
    }

    #[test]
    fn test_negative_query_reports_signed_bounds() {
        let err = run_query(vec![1, 2], -1, 0, CombinerKind::Sum).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CliError>(),
            Some(&CliError::IndexOutOfRange { low: -1, high: 0, len: 2 })
        );
    }

    #[test]
    fn test_query_past_end_is_tree_error() {
        let err = run_query(vec![1, 2], 0, 2, CombinerKind::Sum).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SegmentTreeError>(),
            Some(&SegmentTreeError::IndexOutOfRange { low: 0, high: 2, len: 2 })
        );
    }

    #[test_case(CombinerKind::Sum, vec![i64::MAX, 1]; "sum")]
    #[test_case(CombinerKind::Product, vec![1 << 32, 1 << 32]; "product")]
    #[test_case(CombinerKind::Gcd, vec![i64::MIN, 0]; "gcd of min")]
    fn test_overflow_is_an_error(combiner: CombinerKind, values: Vec<i64>) {
        let err = run_query(values, 0, 1, combiner).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CliError>(),
            Some(&CliError::Overflow { low: 0, high: 1 })
        );
        assert_eq!(err.to_string(), "aggregate over [0, 1] overflows i64");
    }

    #[test]
    fn test_overflow_stays_inside_its_range() {
        let tree = build_tree(vec![i64::MAX, 1, 2, 3], CombinerKind::Sum).unwrap();
        assert!(checked_query(&tree, 0, 1).is_err());
        assert_eq!(checked_query(&tree, 1, 3).unwrap(), 6);
    }

    #[test_case(CombinerKind::Sum, 0, 3 => 10; "sum")]
    #[test_case(CombinerKind::Product, 1, 3 => 24; "product")]
    #[test_case(CombinerKind::Min, 0, 3 => 1; "min")]
    #[test_case(CombinerKind::Max, 0, 2 => 3; "max")]
    #[test_case(CombinerKind::Gcd, 1, 3 => 1; "gcd")]
    fn test_checked_combiners_match_plain(combiner: CombinerKind, low: i64, high: i64) -> i64 {
        run_query(vec![1, 2, 3, 4], low, high, combiner).unwrap()
    }

    #[test]
    fn test_script_queries_and_replaces() {
        let output = script(
            "# sums\n\n1 2 3 4\nquery 0 3\nquery 1 2\nreplace 0 2\nquery 0 1\n",
            CombinerKind::Sum,
        )
        .unwrap();
        assert_eq!(output, "10\n5\n4\n");
    }

    #[test]
    fn test_script_gcd_playground() {
        let output = script("2 4 6 3 5\nquery 0 4\nreplace 3 10\nquery 3 4\n", CombinerKind::Gcd)
            .unwrap();
        assert_eq!(output, "1\n5\n");
    }

    #[test]
    fn test_script_rejects_unknown_command() {
        let err = script("1 2\nsum 0 1\n", CombinerKind::Sum).unwrap_err();
        assert!(err.to_string().starts_with("line 2: expected"), "{}", err);
    }

    #[test]
    fn test_script_rejects_wrong_arity() {
        let err = script("1 2\nquery 0\n", CombinerKind::Sum).unwrap_err();
        assert!(err.to_string().starts_with("line 2: expected"), "{}", err);
    }

    #[test]
    fn test_script_without_values_line() {
        let err = script("# nothing here\n\n", CombinerKind::Sum).unwrap_err();
        assert_eq!(err.to_string(), "script has no values line");
    }

    #[test]
    fn test_script_bad_integer_names_line() {
        let err = script("1 x\n", CombinerKind::Sum).unwrap_err();
        assert_eq!(err.to_string(), "line 1: invalid integer 'x'");
    }

    #[test]
    fn test_script_negative_replace_index() {
        let err = script("1 2\nreplace -1 5\n", CombinerKind::Sum).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CliError>(),
            Some(&CliError::IndexOutOfRange { low: -1, high: -1, len: 2 })
        );
    }

    #[test]
    fn test_script_overflow_names_line() {
        let err = script("9223372036854775807 1\nquery 0 1\n", CombinerKind::Sum).unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert_eq!(
            err.downcast_ref::<CliError>(),
            Some(&CliError::Overflow { low: 0, high: 1 })
        );
    }
}
