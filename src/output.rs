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

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};

use crate::selection::Selection;

/// Output files for one pipeline iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    /// Deduplicated sequence ids, rewritten on every pass.
    pub values: PathBuf,
    /// Accumulating report, appended on every pass.
    pub counts: PathBuf,
}

impl RunOutputs {
    pub fn new<P: AsRef<Path>>(out_dir: P, run_number: i64) -> Self {
        let out_dir = out_dir.as_ref();
        Self {
            values: out_dir.join(format!("Test_values_{}.txt", run_number)),
            counts: out_dir.join(format!("Test_counts_{}.txt", run_number)),
        }
    }

    pub fn write(&self, selection: &Selection) -> Result<()> {
        write_values(&self.values, &selection.sequences)?;
        append_report(&self.counts, selection)?;
        Ok(())
    }
}

/// Write one sequence id per line, truncating any previous content.
pub fn write_values<P: AsRef<Path>>(path: P, sequences: &[String]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file));
    for seq in sequences {
        writer
            .write_record([seq.as_str()])
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Append a `>motif, number of sequences: n` block, creating the file if needed.
pub fn append_report<P: AsRef<Path>>(path: P, selection: &Selection) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(
        out,
        ">{}, number of sequences: {}",
        selection.motif_id,
        selection.count()
    )?;
    writeln!(out, "{}", format_list(&selection.sequences))?;
    out.flush()?;
    Ok(())
}

/// The three-line summary read by the driving shell loop.
pub fn write_summary(out: &mut impl Write, selection: Option<&Selection>) -> io::Result<()> {
    match selection {
        Some(sel) => {
            writeln!(out, "Most common motif: {}", sel.motif_id)?;
            writeln!(out, "Appears in {} sequences", sel.count())?;
            writeln!(out, "Sequences: {}", format_list(&sel.sequences))?;
        }
        None => {
            writeln!(out, "Most common motif: None")?;
            writeln!(out, "Appears in 0 sequences")?;
            writeln!(out, "Sequences: []")?;
        }
    }
    Ok(())
}

/// Render ids as `['a', 'b']`.
pub fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote_item(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Quote one id the way the report has always rendered it. Control and
/// whitespace characters other than a plain space are escaped; other
/// non-printable classes (format, private use, unassigned) pass through.
fn quote_item(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                let code = c as u32;
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
