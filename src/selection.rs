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
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use ahash::RandomState;
use anyhow::{Context, Result};
use hashbrown::HashSet;
use log::debug;

use crate::table::{MotifGroup, MotifGroups};

/// Motifs already claimed by earlier iterations of the pipeline.
#[derive(Debug, Default, Clone)]
pub struct ExclusionSet {
    motifs: HashSet<String, RandomState>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, motif: impl Into<String>) -> bool {
        self.motifs.insert(motif.into())
    }

    pub fn contains(&self, motif: &str) -> bool {
        self.motifs.contains(motif)
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    pub fn merge(&mut self, other: ExclusionSet) {
        self.motifs.extend(other.motifs);
    }

    /// Add one motif per non-blank line, trimmed. Returns the number of
    /// motifs that were not already present.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let motif = line.trim();
            if !motif.is_empty() && self.insert(motif) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Merge a motif list that must exist.
    pub fn extend_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open motif list {}", path.display()))?;
        self.read_list(file, path)
    }

    /// Merge a motif list if it exists. Returns `None` when the file is absent.
    pub fn extend_from_optional_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<Option<usize>> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => self.read_list(file, path).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to open motif list {}", path.display()))
            }
        }
    }

    fn read_list(&mut self, file: File, path: &Path) -> Result<usize> {
        let added = self
            .extend_from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read motif list {}", path.display()))?;
        debug!("{} new motifs excluded from {}", added, path.display());
        Ok(added)
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for motif in iter {
            set.insert(motif);
        }
        set
    }
}

/// The motif picked by one pass, with its sequences deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub motif_id: String,
    pub sequences: Vec<String>,
}

impl Selection {
    pub fn count(&self) -> usize {
        self.sequences.len()
    }
}

/// Pick the non-excluded motif with the most raw occurrences.
///
/// Comparison is strict, so on a tie the motif seen first in the table wins.
/// Groups of size zero never qualify.
pub fn select_top_motif<'a>(
    groups: &'a MotifGroups,
    excluded: &ExclusionSet,
) -> Option<&'a MotifGroup> {
    let mut best: Option<&MotifGroup> = None;
    for group in groups {
        if excluded.contains(&group.motif_id) {
            continue;
        }
        let best_len = best.map_or(0, |b| b.sequences.len());
        if group.sequences.len() > best_len {
            best = Some(group);
        }
    }
    best
}

/// Remove repeated ids, keeping the first occurrence of each.
pub fn dedup_preserving_order(sequences: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str, RandomState> = HashSet::default();
    let mut unique = Vec::new();
    for seq in sequences {
        if seen.insert(seq.as_str()) {
            unique.push(seq.clone());
        }
    }
    unique
}

/// One maximization step: select on raw counts, then deduplicate the winner.
pub fn maximize(groups: &MotifGroups, excluded: &ExclusionSet) -> Option<Selection> {
    select_top_motif(groups, excluded).map(|group| Selection {
        motif_id: group.motif_id.clone(),
        sequences: dedup_preserving_order(&group.sequences),
    })
}
