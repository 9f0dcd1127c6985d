//! The search frontier: generated states awaiting expansion.
//!
//! One container type covers all strategies by switching its backing
//! discipline: a FIFO queue, a LIFO stack, or an array-backed binary min-heap
//! keyed by [`Cost`]. The frontier also owns duplicate bookkeeping: every live
//! entry is indexed by board so membership checks and duplicate reconciliation
//! do not scan the whole container.
use crate::engine::Board;
use crate::heuristics::{Cost, Discipline, Strategy};
use crate::solver::NodeId;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

/// A frontier entry: the arena id of a state, its board and its priority.
///
/// `cost` is `None` under the insertion-ordered strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub node: NodeId,
    pub board: Board,
    pub cost: Option<Cost>,
}

/// Binary min-heap over entries, parent at `(i - 1) / 2`, children at
/// `2i + 1` and `2i + 2`.
///
/// Keeps a node-to-slot index up to date through every swap so entries can be
/// deleted from the middle of the heap.
#[derive(Debug, Default)]
struct MinHeap {
    entries: Vec<Entry>,
    slot_of: HashMap<NodeId, usize>,
}

impl MinHeap {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        self.slot_of.insert(entry.node, last);
        self.swim(last);
    }

    fn pop_best(&mut self) -> Option<Entry> {
        if self.entries.is_empty() {
            return None;
        }
        self.delete_at(0)
    }

    /// Removes the entry at `index`, moving the last entry into its place and
    /// restoring heap order from there.
    fn delete_at(&mut self, index: usize) -> Option<Entry> {
        if index >= self.entries.len() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(index, last);
        let removed = self.entries.pop()?;
        self.slot_of.remove(&removed.node);

        if index < self.entries.len() {
            if index > 0 && self.less(index, (index - 1) / 2) {
                self.swim(index);
            } else {
                self.sink(index);
            }
        }
        Some(removed)
    }

    fn delete_node(&mut self, node: NodeId) -> Option<Entry> {
        let index = *self.slot_of.get(&node)?;
        self.delete_at(index)
    }

    fn get(&self, node: NodeId) -> Option<&Entry> {
        self.slot_of.get(&node).map(|&i| &self.entries[i])
    }

    fn swim(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sink(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            // Ties go to the left child.
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, index) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.entries.swap(i, j);
        self.slot_of.insert(self.entries[i].node, i);
        self.slot_of.insert(self.entries[j].node, j);
    }

    fn less(&self, i: usize, j: usize) -> bool {
        rank(&self.entries[i]).compare(&rank(&self.entries[j])) == Ordering::Less
    }
}

/// The priority of an entry in a cost-ordered container.
///
/// # Panics
/// Panics on an unranked entry; the solver always scores states for the
/// cost-based strategies.
fn rank(entry: &Entry) -> Cost {
    match entry.cost {
        Some(cost) => cost,
        None => panic!("unranked entry {:?} in a cost-ordered frontier", entry.node),
    }
}

#[derive(Debug)]
enum Store {
    Fifo(VecDeque<Entry>),
    Lifo(Vec<Entry>),
    Heap(MinHeap),
}

/// Strategy-polymorphic container of states awaiting expansion.
#[derive(Debug)]
pub struct Frontier {
    store: Store,
    by_board: HashMap<Board, Vec<NodeId>>,
    high_water: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given backing discipline.
    pub fn new(discipline: Discipline) -> Self {
        let store = match discipline {
            Discipline::Fifo => Store::Fifo(VecDeque::new()),
            Discipline::Lifo => Store::Lifo(Vec::new()),
            Discipline::MinHeap => Store::Heap(MinHeap::default()),
        };
        Frontier {
            store,
            by_board: HashMap::new(),
            high_water: 0,
        }
    }

    pub fn for_strategy(strategy: Strategy) -> Self {
        Self::new(strategy.discipline())
    }

    /// Admits an entry. Does not check for duplicates; see
    /// [`Frontier::reconcile`].
    pub fn push(&mut self, entry: Entry) {
        match &mut self.store {
            Store::Fifo(queue) => queue.push_back(entry),
            Store::Lifo(stack) => stack.push(entry),
            Store::Heap(heap) => heap.push(entry),
        }
        self.by_board.entry(entry.board).or_default().push(entry.node);
        self.high_water = self.high_water.max(self.len());
    }

    /// Removes and returns the next entry to expand: the oldest (FIFO), the
    /// newest (LIFO), or the cheapest (heap).
    pub fn pop_best(&mut self) -> Option<Entry> {
        let entry = match &mut self.store {
            Store::Fifo(queue) => queue.pop_front(),
            Store::Lifo(stack) => stack.pop(),
            Store::Heap(heap) => heap.pop_best(),
        }?;
        self.forget(&entry);
        Some(entry)
    }

    /// Whether any live entry holds `board`.
    pub fn contains(&self, board: &Board) -> bool {
        self.by_board.contains_key(board)
    }

    /// Every live entry holding `board`.
    pub fn all_matching(&self, board: &Board) -> Vec<Entry> {
        let Some(nodes) = self.by_board.get(board) else {
            return Vec::new();
        };
        match &self.store {
            Store::Fifo(queue) => queue.iter().filter(|e| &e.board == board).copied().collect(),
            Store::Lifo(stack) => stack.iter().filter(|e| &e.board == board).copied().collect(),
            Store::Heap(heap) => nodes.iter().filter_map(|&n| heap.get(n)).copied().collect(),
        }
    }

    /// Removes a specific entry. Returns it if it was live.
    pub fn delete(&mut self, node: NodeId) -> Option<Entry> {
        let entry = match &mut self.store {
            Store::Fifo(queue) => {
                let index = queue.iter().position(|e| e.node == node)?;
                queue.remove(index)
            }
            Store::Lifo(stack) => {
                let index = stack.iter().position(|e| e.node == node)?;
                Some(stack.remove(index))
            }
            Store::Heap(heap) => heap.delete_node(node),
        }?;
        self.forget(&entry);
        Some(entry)
    }

    /// Resolves duplicates of `board` so at most one live entry holds it.
    ///
    /// The cheapest entry survives; among equally cheap entries the earliest
    /// created one survives. Every other entry for the board is deleted and
    /// its id returned. Costs are compared under the strategy they carry, so
    /// this is only meaningful for the cost-ordered discipline.
    pub fn reconcile(&mut self, board: &Board) -> Vec<NodeId> {
        let matching = self.all_matching(board);
        if matching.len() < 2 {
            return Vec::new();
        }

        let keeper = matching
            .iter()
            .min_by(|a, b| rank(a).compare(&rank(b)).then(a.node.cmp(&b.node)))
            .map(|e| e.node);

        let mut evicted = Vec::new();
        for entry in matching {
            if Some(entry.node) != keeper && self.delete(entry.node).is_some() {
                evicted.push(entry.node);
            }
        }
        evicted
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Fifo(queue) => queue.len(),
            Store::Lifo(stack) => stack.len(),
            Store::Heap(heap) => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest size the frontier has reached.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// The largest number of live entries sharing one board.
    ///
    /// Diagnostic accessor for checking the duplicate policy; the search
    /// itself never consults it.
    pub fn max_multiplicity(&self) -> usize {
        self.by_board.values().map(Vec::len).max().unwrap_or(0)
    }

    fn forget(&mut self, entry: &Entry) {
        if let Some(nodes) = self.by_board.get_mut(&entry.board) {
            nodes.retain(|&n| n != entry.node);
            if nodes.is_empty() {
                self.by_board.remove(&entry.board);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::GOAL;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn boards(n: u64) -> Vec<Board> {
        let mut out: Vec<Board> = Vec::new();
        let mut seed = 0;
        while out.len() < n as usize {
            let b = Board::scrambled_with_seed(&GOAL, 12, seed);
            if !out.contains(&b) {
                out.push(b);
            }
            seed += 1;
        }
        out
    }

    fn ranked(node: usize, board: Board, value: u32) -> Entry {
        Entry {
            node: NodeId(node),
            board,
            cost: Some(Cost {
                strategy: Strategy::UniformCost,
                value,
            }),
        }
    }

    fn plain(node: usize, board: Board) -> Entry {
        Entry {
            node: NodeId(node),
            board,
            cost: None,
        }
    }

    #[test]
    fn test_fifo_pops_oldest_first() {
        let bs = boards(3);
        let mut frontier = Frontier::for_strategy(Strategy::BreadthFirst);
        for (i, b) in bs.iter().enumerate() {
            frontier.push(plain(i, *b));
        }
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop_best())
            .map(|e| e.node.0)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_lifo_pops_newest_first() {
        let bs = boards(3);
        let mut frontier = Frontier::for_strategy(Strategy::DepthFirst);
        for (i, b) in bs.iter().enumerate() {
            frontier.push(plain(i, *b));
        }
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop_best())
            .map(|e| e.node.0)
            .collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_heap_pops_in_cost_order() {
        let costs = [9, 4, 7, 1, 8, 3, 3, 6, 2, 5];
        let bs = boards(costs.len() as u64);
        let mut frontier = Frontier::for_strategy(Strategy::UniformCost);
        for (i, (&c, b)) in costs.iter().zip(&bs).enumerate() {
            frontier.push(ranked(i, *b, c));
        }
        let popped: Vec<u32> = std::iter::from_fn(|| frontier.pop_best())
            .map(|e| e.cost.unwrap().value)
            .collect();
        let mut sorted = costs.to_vec();
        sorted.sort_unstable();
        assert_eq!(popped, sorted);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_heap_delete_from_middle_keeps_order() {
        let costs = [5, 1, 9, 3, 7, 2, 8, 4, 6];
        let bs = boards(costs.len() as u64);
        let mut frontier = Frontier::for_strategy(Strategy::AStarManhattan);
        for (i, (&c, b)) in costs.iter().zip(&bs).enumerate() {
            frontier.push(Entry {
                cost: Some(Cost {
                    strategy: Strategy::AStarManhattan,
                    value: c,
                }),
                ..plain(i, *b)
            });
        }
        // Remove the entries with cost 3 and 8.
        assert_eq!(frontier.delete(NodeId(3)).unwrap().board, bs[3]);
        assert_eq!(frontier.delete(NodeId(6)).unwrap().board, bs[6]);
        assert!(frontier.delete(NodeId(6)).is_none());
        assert!(!frontier.contains(&bs[3]));

        let popped: Vec<u32> = std::iter::from_fn(|| frontier.pop_best())
            .map(|e| e.cost.unwrap().value)
            .collect();
        assert_eq!(popped, vec![1, 2, 4, 5, 6, 7, 9]);
    }

    #[test]
    fn test_heap_random_deletes_then_drain_in_order() {
        let board = boards(1)[0];
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut frontier = Frontier::for_strategy(Strategy::UniformCost);
            let mut live: Vec<(usize, u32)> = Vec::new();
            for i in 0..40 {
                let value = rng.gen_range(0..60);
                frontier.push(ranked(i, board, value));
                live.push((i, value));
            }
            for _ in 0..10 {
                let (node, value) = live.swap_remove(rng.gen_range(0..live.len()));
                let removed = frontier.delete(NodeId(node)).unwrap();
                assert_eq!(removed.cost.unwrap().value, value);
            }

            let popped: Vec<u32> = std::iter::from_fn(|| frontier.pop_best())
                .map(|e| e.cost.unwrap().value)
                .collect();
            let mut expected: Vec<u32> = live.iter().map(|&(_, v)| v).collect();
            expected.sort_unstable();
            assert_eq!(popped, expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_contains_and_all_matching() {
        let bs = boards(2);
        let mut frontier = Frontier::for_strategy(Strategy::UniformCost);
        frontier.push(ranked(0, bs[0], 10));
        frontier.push(ranked(1, bs[1], 5));
        frontier.push(ranked(2, bs[0], 7));

        assert!(frontier.contains(&bs[0]));
        let mut nodes: Vec<usize> = frontier.all_matching(&bs[0]).iter().map(|e| e.node.0).collect();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![0, 2]);
        assert_eq!(frontier.max_multiplicity(), 2);
    }

    #[test]
    fn test_reconcile_keeps_cheapest() {
        let bs = boards(2);
        let mut frontier = Frontier::for_strategy(Strategy::UniformCost);
        frontier.push(ranked(0, bs[0], 10));
        frontier.push(ranked(1, bs[1], 5));
        frontier.push(ranked(2, bs[0], 7));

        let evicted = frontier.reconcile(&bs[0]);
        assert_eq!(evicted, vec![NodeId(0)]);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.max_multiplicity(), 1);
        assert_eq!(frontier.all_matching(&bs[0])[0].node, NodeId(2));
    }

    #[test]
    fn test_reconcile_keeps_incumbent_on_tie() {
        let bs = boards(1);
        let mut frontier = Frontier::for_strategy(Strategy::UniformCost);
        frontier.push(ranked(4, bs[0], 6));
        frontier.push(ranked(9, bs[0], 6));

        assert_eq!(frontier.reconcile(&bs[0]), vec![NodeId(9)]);
        assert_eq!(frontier.pop_best().unwrap().node, NodeId(4));
        assert!(frontier.reconcile(&bs[0]).is_empty());
    }

    #[test]
    fn test_reconcile_evicts_newcomer_when_dearer() {
        let bs = boards(1);
        let mut frontier = Frontier::for_strategy(Strategy::GreedyBestFirst);
        let entry = |node, value| Entry {
            node: NodeId(node),
            board: bs[0],
            cost: Some(Cost {
                strategy: Strategy::GreedyBestFirst,
                value,
            }),
        };
        frontier.push(entry(0, 2));
        frontier.push(entry(1, 3));
        assert_eq!(frontier.reconcile(&bs[0]), vec![NodeId(1)]);
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_high_water_tracks_max_size() {
        let bs = boards(3);
        let mut frontier = Frontier::for_strategy(Strategy::BreadthFirst);
        for (i, b) in bs.iter().enumerate() {
            frontier.push(plain(i, *b));
        }
        assert_eq!(frontier.high_water(), 3);
        let _ = frontier.pop_best();
        let _ = frontier.pop_best();
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.high_water(), 3, "high water should not decrease on pop");
    }

    #[test]
    #[should_panic(expected = "strategy mismatch")]
    fn test_mixed_strategies_in_heap_panics() {
        let bs = boards(2);
        let mut frontier = Frontier::for_strategy(Strategy::UniformCost);
        frontier.push(ranked(0, bs[0], 1));
        frontier.push(Entry {
            node: NodeId(1),
            board: bs[1],
            cost: Some(Cost {
                strategy: Strategy::AStarMisplaced,
                value: 0,
            }),
        });
    }
}
