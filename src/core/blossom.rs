//! Maximum-cardinality matching on a general graph (Edmonds' blossom
//! algorithm, O(V^3)).

use std::collections::VecDeque;

/// Compute a maximum matching. `adjacency[v]` lists the neighbours of `v`.
///
/// Returns `mate[v]`, the partner of `v` or `None` if unmatched.
pub fn maximum_matching(adjacency: &[Vec<usize>]) -> Vec<Option<usize>> {
    let mut search = Search::new(adjacency);
    for root in 0..adjacency.len() {
        if search.mate[root].is_none() {
            if let Some(end) = search.find_augmenting_path(root) {
                search.augment(end);
            }
        }
    }
    search.mate
}

struct Search<'a> {
    adjacency: &'a [Vec<usize>],
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    used: Vec<bool>,
    in_blossom: Vec<bool>,
    queue: VecDeque<usize>,
}

impl<'a> Search<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            used: vec![false; n],
            in_blossom: vec![false; n],
            queue: VecDeque::new(),
        }
    }

    /// Next outer vertex up the alternating tree, if any
    fn step_up(&self, v: usize) -> Option<usize> {
        self.mate[v].and_then(|m| self.parent[m])
    }

    fn lowest_common_ancestor(&self, mut a: usize, mut b: usize) -> usize {
        let mut on_path = vec![false; self.adjacency.len()];
        loop {
            a = self.base[a];
            on_path[a] = true;
            match self.step_up(a) {
                Some(next) => a = next,
                None => break,
            }
        }
        loop {
            b = self.base[b];
            if on_path[b] {
                return b;
            }
            match self.step_up(b) {
                Some(next) => b = next,
                None => return b,
            }
        }
    }

    fn mark_path(&mut self, mut v: usize, blossom_base: usize, mut child: usize) {
        while self.base[v] != blossom_base {
            let Some(m) = self.mate[v] else { break };
            self.in_blossom[self.base[v]] = true;
            self.in_blossom[self.base[m]] = true;
            self.parent[v] = Some(child);
            child = m;
            match self.parent[m] {
                Some(next) => v = next,
                None => break,
            }
        }
    }

    fn is_outer(&self, v: usize, root: usize) -> bool {
        v == root || self.mate[v].is_some_and(|m| self.parent[m].is_some())
    }

    fn find_augmenting_path(&mut self, root: usize) -> Option<usize> {
        let n = self.adjacency.len();
        self.used.iter_mut().for_each(|u| *u = false);
        self.parent.iter_mut().for_each(|p| *p = None);
        for (i, b) in self.base.iter_mut().enumerate() {
            *b = i;
        }
        self.queue.clear();

        self.used[root] = true;
        self.queue.push_back(root);

        let adjacency = self.adjacency;
        while let Some(v) = self.queue.pop_front() {
            for &to in &adjacency[v] {
                if self.base[v] == self.base[to] || self.mate[v] == Some(to) {
                    continue;
                }

                if self.is_outer(to, root) {
                    // Odd cycle: contract the blossom onto its base
                    let blossom_base = self.lowest_common_ancestor(v, to);
                    self.in_blossom.iter_mut().for_each(|b| *b = false);
                    self.mark_path(v, blossom_base, to);
                    self.mark_path(to, blossom_base, v);
                    for i in 0..n {
                        if self.in_blossom[self.base[i]] {
                            self.base[i] = blossom_base;
                            if !self.used[i] {
                                self.used[i] = true;
                                self.queue.push_back(i);
                            }
                        }
                    }
                } else if self.parent[to].is_none() {
                    self.parent[to] = Some(v);
                    match self.mate[to] {
                        None => return Some(to),
                        Some(m) => {
                            self.used[m] = true;
                            self.queue.push_back(m);
                        }
                    }
                }
            }
        }

        None
    }

    fn augment(&mut self, end: usize) {
        let mut v = Some(end);
        while let Some(current) = v {
            let Some(pv) = self.parent[current] else { break };
            let next = self.mate[pv];
            self.mate[current] = Some(pv);
            self.mate[pv] = Some(current);
            v = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); n];
        for &(a, b) in edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        adjacency
    }

    fn matched_count(mate: &[Option<usize>]) -> usize {
        mate.iter().filter(|m| m.is_some()).count()
    }

    fn assert_consistent(mate: &[Option<usize>], adjacency: &[Vec<usize>]) {
        for (v, m) in mate.iter().enumerate() {
            if let Some(u) = *m {
                assert_eq!(mate[u], Some(v));
                assert!(adjacency[v].contains(&u));
            }
        }
    }

    #[test]
    fn test_path_is_fully_matched() {
        // 0-1-2-3: first-fit from 1 would strand 0 and 3
        let adjacency = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let mate = maximum_matching(&adjacency);

        assert_consistent(&mate, &adjacency);
        assert_eq!(matched_count(&mate), 4);
    }

    #[test]
    fn test_odd_cycle_with_tail() {
        // Triangle 0-1-2 with pendant 3 on 2 and 4 on 0
        let adjacency = graph(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (0, 4)]);
        let mate = maximum_matching(&adjacency);

        assert_consistent(&mate, &adjacency);
        assert_eq!(matched_count(&mate), 4);
    }

    #[test]
    fn test_blossom_contraction() {
        // Pentagon 0..4 with pendants 5 (on 0) and 6 (on 2): perfect on 6 of 7
        let adjacency = graph(
            7,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 5), (2, 6)],
        );
        let mate = maximum_matching(&adjacency);

        assert_consistent(&mate, &adjacency);
        assert_eq!(matched_count(&mate), 6);
    }

    #[test]
    fn test_empty_and_isolated() {
        assert!(maximum_matching(&[]).is_empty());

        let adjacency = graph(3, &[]);
        let mate = maximum_matching(&adjacency);
        assert_eq!(matched_count(&mate), 0);
    }
}
