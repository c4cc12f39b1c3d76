/*
 * MotifMax - Iterative Motif Maximization Selection
 *
 * Copyright (c) 2025 The MotifMax authors
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use motifmax::output::{RunOutputs, write_summary};
use motifmax::selection::{ExclusionSet, maximize};
use motifmax::table::{MotifGroups, load_rows};

/// Pick the motif found in the most sequences, skipping motifs chosen by earlier runs.
#[derive(Parser, Debug)]
#[command(name = "motifmax", version, allow_negative_numbers = true)]
struct Cli {
    /// Tab-delimited occurrence table with a header (motif id in column 2, sequence id in column 3)
    table: PathBuf,

    /// Motifs selected by earlier runs, one per line
    exclusion_list: PathBuf,

    /// Pipeline iteration, used to name the output files
    run_number: i64,

    /// Additional motifs to exclude, one per line
    filter: Option<PathBuf>,

    /// Extra arguments from the driving script, ignored
    #[arg(hide = true, num_args = 0..)]
    ignored: Vec<String>,

    /// Directory for Test_values_<run>.txt and Test_counts_<run>.txt
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Fail if the exclusion list does not exist instead of treating it as empty
    #[arg(long)]
    require_exclusion_list: bool,
}

fn build_exclusion_set(cli: &Cli) -> Result<ExclusionSet> {
    let mut excluded = ExclusionSet::new();

    match &cli.filter {
        Some(path) => {
            let mut common = ExclusionSet::new();
            match common.extend_from_optional_file(path) {
                Ok(Some(_)) => excluded.merge(common),
                Ok(None) => warn!("File {} does not exist.", path.display()),
                Err(e) => warn!("Ignoring common motifs file: {:#}", e),
            }
        }
        None => info!("No common motifs file provided; filtering on the exclusion list only"),
    }

    if cli.require_exclusion_list {
        excluded.extend_from_file(&cli.exclusion_list)?;
    } else if excluded.extend_from_optional_file(&cli.exclusion_list)?.is_none() {
        info!(
            "Exclusion list {} not found, starting with no prior motifs",
            cli.exclusion_list.display()
        );
    }

    Ok(excluded)
}

fn run(cli: &Cli) -> Result<()> {
    let rows = load_rows(&cli.table)?;
    info!("Loaded {} occurrence rows from {}", rows.len(), cli.table.display());

    let groups = MotifGroups::from_rows(rows);
    info!(
        "Grouped {} occurrences into {} motifs",
        groups.total_occurrences(),
        groups.len()
    );

    let excluded = build_exclusion_set(cli)?;
    info!("Excluding {} motifs", excluded.len());

    let selection = maximize(&groups, &excluded);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&mut out, selection.as_ref())?;
    out.flush()?;

    let Some(selection) = selection else {
        info!("No eligible motif left; run {} writes no files", cli.run_number);
        return Ok(());
    };

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create output directory {}", cli.out_dir.display()))?;
    let outputs = RunOutputs::new(&cli.out_dir, cli.run_number);
    outputs.write(&selection)?;
    info!(
        "Wrote {} and {}",
        outputs.values.display(),
        outputs.counts.display()
    );

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    run(&cli)
}
