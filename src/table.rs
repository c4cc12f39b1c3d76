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

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ahash::RandomState;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use hashbrown::HashMap;

/// One record of a motif scanner's occurrence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceRow {
    pub field0: String,
    pub motif_id: String,
    pub sequence_id: String,
}

impl OccurrenceRow {
    /// Returns `None` for records with fewer than three fields.
    fn from_record(record: &StringRecord) -> Option<Self> {
        if record.len() < 3 {
            return None;
        }
        Some(Self {
            field0: record[0].to_string(),
            motif_id: record[1].to_string(),
            sequence_id: record[2].to_string(),
        })
    }
}

/// Read tab-delimited occurrence rows, skipping the header and any short row.
pub fn read_rows<R: Read>(input: R) -> Result<Vec<OccurrenceRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let record = result.with_context(|| format!("Malformed record at line {}", i + 2))?;
        if let Some(row) = OccurrenceRow::from_record(&record) {
            rows.push(row);
        }
    }
    Ok(rows)
}

pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<OccurrenceRow>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open occurrence table {}", path.display()))?;
    read_rows(file).with_context(|| format!("Failed to read occurrence table {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifGroup {
    pub motif_id: String,
    /// Sequence ids in table order, duplicates included.
    pub sequences: Vec<String>,
}

/// Sequence ids grouped by motif. Iteration follows the order in which each
/// motif was first seen, which keeps tie-breaking reproducible.
#[derive(Debug, Default)]
pub struct MotifGroups {
    index: HashMap<String, usize, RandomState>,
    groups: Vec<MotifGroup>,
}

impl MotifGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = OccurrenceRow>,
    {
        let mut groups = Self::new();
        for row in rows {
            groups.push(row.motif_id, row.sequence_id);
        }
        groups
    }

    pub fn push(&mut self, motif_id: String, sequence_id: String) {
        if let Some(&i) = self.index.get(&motif_id) {
            self.groups[i].sequences.push(sequence_id);
            return;
        }
        self.index.insert(motif_id.clone(), self.groups.len());
        self.groups.push(MotifGroup {
            motif_id,
            sequences: vec![sequence_id],
        });
    }

    pub fn get(&self, motif_id: &str) -> Option<&MotifGroup> {
        self.index.get(motif_id).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotifGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of all group sizes.
    pub fn total_occurrences(&self) -> usize {
        self.groups.iter().map(|g| g.sequences.len()).sum()
    }
}

impl<'a> IntoIterator for &'a MotifGroups {
    type Item = &'a MotifGroup;
    type IntoIter = std::slice::Iter<'a, MotifGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
