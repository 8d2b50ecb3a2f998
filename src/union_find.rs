//! Disjoint set forest over the cells of a grid.
//!
//! Tracks which cells have become connected while a passage builder runs,
//! answering "same component?" without walking the link graph. Path halving
//! keeps find near constant; union by rank keeps the trees shallow.

#[derive(Debug, Clone)]
pub struct DisjointSetForest {
    parents: Vec<usize>,
    ranks: Vec<u8>,
    components: usize,
}

impl DisjointSetForest {
    /// A forest of `size` singleton sets, one per cell index.
    pub fn new(size: usize) -> DisjointSetForest {
        DisjointSetForest {
            parents: (0..size).collect(),
            ranks: vec![0; size],
            components: size,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.parents.len()
    }

    /// How many disjoint sets remain. One means everything is connected.
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// The representative element of the set containing `cell_index`.
    ///
    /// Panics if the index is out of range of the forest.
    pub fn find(&mut self, cell_index: usize) -> usize {
        let mut current = cell_index;
        while self.parents[current] != current {
            // Path halving: point at the grandparent on the way up.
            self.parents[current] = self.parents[self.parents[current]];
            current = self.parents[current];
        }
        current
    }

    /// Are two cells in the same set?
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Merge the sets containing `a` and `b`.
    /// Returns false without modifying anything when they are already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        if self.ranks[root_a] < self.ranks[root_b] {
            self.parents[root_a] = root_b;
        } else if self.ranks[root_a] > self.ranks[root_b] {
            self.parents[root_b] = root_a;
        } else {
            self.parents[root_b] = root_a;
            self.ranks[root_a] += 1;
        }
        self.components -= 1;
        true
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn starts_as_singletons() {
        let mut forest = DisjointSetForest::new(5);
        assert_eq!(forest.components(), 5);
        for i in 0..5 {
            assert_eq!(forest.find(i), i);
        }
    }

    #[test]
    fn union_merges_and_reports() {
        let mut forest = DisjointSetForest::new(4);
        assert!(forest.union(0, 1));
        assert!(forest.connected(0, 1));
        assert!(!forest.connected(0, 2));
        assert_eq!(forest.components(), 3);

        // Already joined: nothing changes.
        assert!(!forest.union(1, 0));
        assert_eq!(forest.components(), 3);
    }

    #[test]
    fn transitive_connectivity() {
        let mut forest = DisjointSetForest::new(6);
        assert!(forest.union(0, 1));
        assert!(forest.union(2, 3));
        assert!(forest.union(1, 2));
        assert!(forest.connected(0, 3));
        assert_eq!(forest.components(), 3); // {0,1,2,3} {4} {5}
    }

    #[test]
    fn collapses_to_one_component() {
        let n = 32;
        let mut forest = DisjointSetForest::new(n);
        for i in 1..n {
            forest.union(i - 1, i);
        }
        assert_eq!(forest.components(), 1);
        let root = forest.find(0);
        for i in 0..n {
            assert_eq!(forest.find(i), root);
        }
    }
}
