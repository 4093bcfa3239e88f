//! # Clusterer Module
//!
//! Groups hashes into similarity clusters using transitive relationships.
//!
//! If A is within the distance threshold of B and B of C, then {A, B, C}
//! forms a single cluster even when A and C are farther apart than the
//! threshold. Membership is transitive closure, not pairwise proximity.
//!
//! Every unordered pair is compared, which is exactly O(n^2). Approximate
//! structures (LSH, BK-trees) are a documented non-goal: batches are small
//! enough that exactness wins.

use crate::core::hasher::PerceptualHash;

/// Union-find over indices with path compression.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Second pass re-points the chain at the root
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_a] = root_b;
        }
    }
}

/// Cluster hashes whose pairwise Hamming distance is within `threshold`.
///
/// The input index is the identity: the output is a list of index groups,
/// members ascending within each group, groups ascending by their smallest
/// member. Singleton groups are included; consumers that only care about
/// multi-member clusters filter them out.
pub fn cluster(hashes: &[PerceptualHash], threshold: u32) -> Vec<Vec<usize>> {
    let mut sets = DisjointSet::new(hashes.len());

    for i in 0..hashes.len() {
        for j in (i + 1)..hashes.len() {
            if hashes[i].distance(&hashes[j]) <= threshold {
                sets.union(i, j);
            }
        }
    }

    // Ascending index order makes each group's first member its smallest,
    // and first-seen root order sorts the groups by that member.
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root: Vec<Option<usize>> = vec![None; hashes.len()];
    for index in 0..hashes.len() {
        let root = sets.find(index);
        match group_of_root[root] {
            Some(group) => groups[group].push(index),
            None => {
                group_of_root[root] = Some(groups.len());
                groups.push(vec![index]);
            }
        }
    }

    groups
}
