//! # Aggregator Module
//!
//! Turns the accumulated analysis state into a classification snapshot.
//!
//! Categories overlap by design: a blurry screenshot appears in both `blur`
//! and `screenshot`. The only carved-out exclusions are `similar`, which
//! drops anything already counted as `duplicate`, and `other`, the
//! complement of the five specific categories. `all` lists every analyzed
//! item.
//!
//! Every call recomputes from scratch over the full history, so clusters
//! that only form across batch boundaries are never missed and re-running
//! on unchanged state yields an identical snapshot.

use serde::{Deserialize, Serialize};

use crate::core::clusterer::cluster;
use crate::core::hasher::PerceptualHash;
use crate::core::session::{AnalyzedItem, MediaKind};

/// One category of a snapshot: how many members, their combined payload
/// size, and their names in original accumulation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub count: usize,
    /// Combined byte size of the member payloads
    pub size: u64,
    /// Member identities, ascending by sequence index
    pub list: Vec<String>,
}

impl CategorySummary {
    fn from_flags(items: &[AnalyzedItem], flags: &[bool]) -> Self {
        let mut count = 0;
        let mut size = 0;
        let mut list = Vec::new();
        for (item, &member) in items.iter().zip(flags) {
            if member {
                count += 1;
                size += item.size_bytes;
                list.push(item.name.clone());
            }
        }
        Self { count, size, list }
    }
}

/// A point-in-time classification of everything processed so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSnapshot {
    pub all: CategorySummary,
    pub duplicate: CategorySummary,
    pub similar: CategorySummary,
    pub blur: CategorySummary,
    pub screenshot: CategorySummary,
    pub video: CategorySummary,
    pub other: CategorySummary,
}

/// Classify the accumulated items into the seven snapshot categories.
///
/// `phash_threshold` is the maximum Hamming distance that still counts as
/// similar. Pure over already-validated data; empty input yields a snapshot
/// of empty categories.
pub fn aggregate(items: &[AnalyzedItem], phash_threshold: u32) -> ClassificationSnapshot {
    let n = items.len();

    let hashes: Vec<PerceptualHash> = items.iter().map(|item| item.hash.clone()).collect();
    let groups = cluster(&hashes, phash_threshold);

    let mut duplicate = vec![false; n];
    let mut similar = vec![false; n];

    for group in groups.iter().filter(|g| g.len() >= 2) {
        for (slot, &a) in group.iter().enumerate() {
            for &b in &group[slot + 1..] {
                let distance = hashes[a].distance(&hashes[b]);
                if distance == 0 {
                    duplicate[a] = true;
                    duplicate[b] = true;
                } else if distance <= phash_threshold {
                    similar[a] = true;
                    similar[b] = true;
                }
            }
        }
    }

    // Set difference after full accumulation: duplicates win over similar
    for index in 0..n {
        if duplicate[index] {
            similar[index] = false;
        }
    }

    let blur: Vec<bool> = items.iter().map(|item| item.is_blurry).collect();
    let screenshot: Vec<bool> = items
        .iter()
        .map(|item| item.kind == MediaKind::Screenshot)
        .collect();
    let video: Vec<bool> = items
        .iter()
        .map(|item| item.kind == MediaKind::Video)
        .collect();

    let other: Vec<bool> = (0..n)
        .map(|i| !(duplicate[i] || similar[i] || blur[i] || screenshot[i] || video[i]))
        .collect();

    ClassificationSnapshot {
        all: CategorySummary::from_flags(items, &vec![true; n]),
        duplicate: CategorySummary::from_flags(items, &duplicate),
        similar: CategorySummary::from_flags(items, &similar),
        blur: CategorySummary::from_flags(items, &blur),
        screenshot: CategorySummary::from_flags(items, &screenshot),
        video: CategorySummary::from_flags(items, &video),
        other: CategorySummary::from_flags(items, &other),
    }
}
