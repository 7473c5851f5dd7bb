use jv_types::LedgerHash;

use crate::dot::PairHasher;
use crate::proof::Proof;

/// Merkle tree built by sequential pairwise reduction.
///
/// Each pass combines neighbours left to right with [`PairHasher::dot`]. An
/// odd hash left over at the end of a pass is carried to the next pass
/// unchanged. Passes repeat until one hash remains. Leaves are never
/// sorted, so the root depends on their order.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// Level 0 = leaves, last level = `[root]`. Empty for no leaves.
    levels: Vec<Vec<LedgerHash>>,
}

impl MerkleTree {
    /// Build a tree from leaf hashes.
    pub fn from_leaves(leaves: Vec<LedgerHash>) -> Self {
        if leaves.is_empty() {
            return Self { levels: vec![] };
        }

        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = combine_level(current);
            levels.push(next);
        }
        Self { levels }
    }

    /// Root hash of `leaves` without keeping intermediate levels.
    ///
    /// No leaves yield the empty hash; a single leaf is its own root.
    pub fn root_hash(leaves: &[LedgerHash]) -> LedgerHash {
        if leaves.is_empty() {
            return LedgerHash::empty();
        }
        let mut current = combine_level(leaves);
        while current.len() > 1 {
            current = combine_level(&current);
        }
        current[0]
    }

    /// The root hash of the tree.
    pub fn root(&self) -> LedgerHash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Sibling path for the leaf at `index`.
    ///
    /// Levels where the node was carried forward contribute no sibling.
    pub fn proof(&self, index: usize) -> Option<Proof> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut siblings = Vec::new();
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_idx = idx ^ 1;
            if let Some(sibling) = level.get(sibling_idx) {
                siblings.push(*sibling);
            }
            idx /= 2;
        }
        Some(Proof::from_trusted(siblings))
    }
}

fn combine_level(hashes: &[LedgerHash]) -> Vec<LedgerHash> {
    hashes
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => PairHasher::dot(left, right),
            _ => pair[0],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::hasher::LedgerHasher;
    use crate::proof::ProofVerifier;

    fn leaf(seed: u8) -> LedgerHash {
        LedgerHasher::digest(&[seed])
    }

    #[test]
    fn empty_tree_has_empty_root() {
        assert!(MerkleTree::root_hash(&[]).is_empty());
        let tree = MerkleTree::from_leaves(vec![]);
        assert!(tree.root().is_empty());
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.proof(0).is_none());
    }

    #[test]
    fn single_leaf_is_root() {
        let l = leaf(1);
        assert_eq!(MerkleTree::root_hash(&[l]), l);
        assert_eq!(MerkleTree::from_leaves(vec![l]).root(), l);
    }

    #[test]
    fn three_string_leaves_root() {
        let a = LedgerHasher::digest(b"a");
        let b = LedgerHasher::digest(b"b");
        let c = LedgerHasher::digest(b"c");

        // H("b") ends in 0x9d (-99) and H("a") in 0xbb (-69), so H("b") leads.
        let mut ab_input = b.as_bytes().to_vec();
        ab_input.extend_from_slice(a.as_bytes());
        let ab = LedgerHasher::digest(&ab_input);
        assert_eq!(
            ab.to_hex(),
            "18d79cb747ea174c59f3a3b41768672526d56fecc58360a99d283d0f9b0a3cc0"
        );

        // ab ends in 0xc0 (-64), H("c") in 0xc6 (-58), so ab leads.
        let mut abc_input = ab.as_bytes().to_vec();
        abc_input.extend_from_slice(c.as_bytes());
        let expected = LedgerHasher::digest(&abc_input);
        assert_eq!(
            expected.to_hex(),
            "aea2dd4249dcecf97ca6a1556db7f21ebd6a40bbec0243ca61b717146a08c347"
        );

        assert_eq!(MerkleTree::root_hash(&[a, b, c]), expected);
        assert_eq!(PairHasher::dot(&PairHasher::dot(&a, &b), &c), expected);
    }

    #[test]
    fn odd_leaf_is_carried_forward() {
        let leaves: Vec<LedgerHash> = (0..5).map(leaf).collect();
        let ab = PairHasher::dot(&leaves[0], &leaves[1]);
        let cd = PairHasher::dot(&leaves[2], &leaves[3]);
        // pass 1: [ab, cd, e]; pass 2: [abcd, e]; pass 3: [root]
        let expected = PairHasher::dot(&PairHasher::dot(&ab, &cd), &leaves[4]);
        assert_eq!(MerkleTree::root_hash(&leaves), expected);
    }

    #[test]
    fn leaf_order_matters() {
        let forward: Vec<LedgerHash> = (0..3).map(leaf).collect();
        let mut rotated = forward.clone();
        rotated.rotate_left(1);
        assert_ne!(MerkleTree::root_hash(&forward), MerkleTree::root_hash(&rotated));
    }

    #[test]
    fn tree_root_matches_streaming_root() {
        for n in 1..20u8 {
            let leaves: Vec<LedgerHash> = (0..n).map(leaf).collect();
            let tree = MerkleTree::from_leaves(leaves.clone());
            assert_eq!(tree.root(), MerkleTree::root_hash(&leaves), "n = {n}");
            assert_eq!(tree.leaf_count(), n as usize);
        }
    }

    #[test]
    fn proof_verifies_for_all_leaves() {
        let leaves: Vec<LedgerHash> = (0..7).map(leaf).collect();
        let tree = MerkleTree::from_leaves(leaves.clone());
        for (i, l) in leaves.iter().enumerate() {
            let proof = tree.proof(i).expect("proof should exist");
            assert!(ProofVerifier::verify(l, &tree.root(), &proof), "leaf {i}");
        }
    }

    #[test]
    fn carried_leaf_has_shorter_proof() {
        let leaves: Vec<LedgerHash> = (0..5).map(leaf).collect();
        let tree = MerkleTree::from_leaves(leaves);
        assert_eq!(tree.proof(0).unwrap().len(), 3);
        // leaf 4 is carried through two passes and paired only at the top
        assert_eq!(tree.proof(4).unwrap().len(), 1);
    }

    proptest! {
        #[test]
        fn root_is_deterministic(seeds in proptest::collection::vec(any::<u8>(), 0..32)) {
            let leaves: Vec<LedgerHash> = seeds.iter().copied().map(leaf).collect();
            prop_assert_eq!(MerkleTree::root_hash(&leaves), MerkleTree::root_hash(&leaves.clone()));
        }

        #[test]
        fn proof_round_trip(count in 1usize..40, pick in any::<proptest::sample::Index>()) {
            let leaves: Vec<LedgerHash> = (0..count).map(|i| LedgerHasher::digest(&i.to_le_bytes())).collect();
            let root = MerkleTree::root_hash(&leaves);
            let tree = MerkleTree::from_leaves(leaves.clone());
            let index = pick.index(count);
            let proof = tree.proof(index).unwrap();
            prop_assert!(ProofVerifier::verify(&leaves[index], &root, &proof));
        }
    }
}
