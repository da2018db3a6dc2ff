use crate::metrics::hv_sweep::node::Node;

/// The arena index of the sentinel node closing every circular list.
pub(crate) const SENTINEL: usize = 0;

/// A set of `d` circular doubly-linked lists, one per dimension, threading through the same
/// nodes. Nodes live in an arena and link to each other by index; the sentinel sits at index
/// [`SENTINEL`] and is the head and tail of every list.
///
/// Nodes are never detached for good: [`MultiList::remove`] only bypasses a node, which keeps its
/// own links, so that [`MultiList::reinsert`] can restore it in constant time per dimension. This
/// only holds if nodes are reinserted in the reverse order they were removed.
#[derive(Debug)]
pub(crate) struct MultiList {
    /// The number of lists or dimensions.
    number_of_lists: usize,
    /// The node arena. The first item is the sentinel.
    nodes: Vec<Node>,
    /// The `(node, dimension)` pairs removed and not reinserted yet. This is only tracked when
    /// debug assertions are enabled.
    removed: Vec<(usize, usize)>,
}

impl MultiList {
    /// Create `number_of_lists` empty lists. Each list only contains the sentinel, whose links
    /// point to itself.
    ///
    /// # Arguments
    ///
    /// * `number_of_lists`: The number of dimensions.
    ///
    /// returns: `MultiList`
    pub(crate) fn new(number_of_lists: usize) -> Self {
        Self {
            number_of_lists,
            nodes: vec![Node::new(number_of_lists, vec![])],
            removed: vec![],
        }
    }

    /// Add a new node to the arena without linking it to any list.
    ///
    /// # Arguments
    ///
    /// * `cargo`: The node coordinates.
    ///
    /// returns: `usize`: the index of the node.
    pub(crate) fn push_node(&mut self, cargo: Vec<f64>) -> usize {
        self.nodes.push(Node::new(self.number_of_lists, cargo));
        self.nodes.len() - 1
    }

    /// The number of nodes in the arena, excluding the sentinel.
    ///
    /// return: `usize`
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub(crate) fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    pub(crate) fn next(&self, index: usize, dim: usize) -> usize {
        self.nodes[index].next[dim]
    }

    pub(crate) fn prev(&self, index: usize, dim: usize) -> usize {
        self.nodes[index].prev[dim]
    }

    /// The coordinate of a node at `dim`.
    pub(crate) fn coordinate(&self, index: usize, dim: usize) -> f64 {
        self.nodes[index].cargo[dim]
    }

    /// Append the nodes to the list at `dim`, just before the sentinel. The nodes must be sorted
    /// by their coordinate at `dim`.
    ///
    /// # Arguments
    ///
    /// * `nodes`: The sorted node indexes.
    /// * `dim`: The list dimension.
    pub(crate) fn extend(&mut self, nodes: &[usize], dim: usize) {
        for &node in nodes {
            let last_but_one = self.nodes[SENTINEL].prev[dim];
            self.nodes[node].next[dim] = SENTINEL;
            self.nodes[node].prev[dim] = last_but_one;
            self.nodes[SENTINEL].prev[dim] = node;
            self.nodes[last_but_one].next[dim] = node;
        }
    }

    /// Bypass a node in all the lists below `dim`. Each bound below `dim` is lowered to the node
    /// coordinate if this is smaller.
    ///
    /// # Arguments
    ///
    /// * `node`: The node index.
    /// * `dim`: The dimension being swept. Lists at `dim` and above are not touched.
    /// * `bounds`: The bounds of the swept region.
    pub(crate) fn remove(&mut self, node: usize, dim: usize, bounds: &mut [f64]) {
        if cfg!(debug_assertions) {
            self.removed.push((node, dim));
        }
        for i in 0..dim {
            let predecessor = self.nodes[node].prev[i];
            let successor = self.nodes[node].next[i];
            self.nodes[predecessor].next[i] = successor;
            self.nodes[successor].prev[i] = predecessor;
            let coordinate = self.nodes[node].cargo[i];
            if bounds[i] > coordinate {
                bounds[i] = coordinate;
            }
        }
    }

    /// Link a node removed with [`MultiList::remove`] back into all the lists below `dim`, using
    /// the neighbours the node still points to. Bounds are lowered to the node coordinates as
    /// in [`MultiList::remove`].
    ///
    /// # Arguments
    ///
    /// * `node`: The node index. This must be the last removed node.
    /// * `dim`: The dimension `node` was removed at.
    /// * `bounds`: The bounds of the swept region.
    pub(crate) fn reinsert(&mut self, node: usize, dim: usize, bounds: &mut [f64]) {
        if cfg!(debug_assertions) {
            let last = self.removed.pop();
            assert_eq!(
                last,
                Some((node, dim)),
                "node #{node} reinserted at dimension {dim} out of removal order"
            );
        }
        for i in 0..dim {
            let predecessor = self.nodes[node].prev[i];
            let successor = self.nodes[node].next[i];
            self.nodes[predecessor].next[i] = node;
            self.nodes[successor].prev[i] = node;
            let coordinate = self.nodes[node].cargo[i];
            if bounds[i] > coordinate {
                bounds[i] = coordinate;
            }
        }
    }

    /// Whether every removed node was reinserted. This is always `true` when debug assertions
    /// are disabled.
    ///
    /// return: `bool`
    pub(crate) fn is_balanced(&self) -> bool {
        self.removed.is_empty()
    }

    /// Collect the node indexes of the list at `dim`, from the first node to the last one.
    ///
    /// # Arguments
    ///
    /// * `dim`: The list dimension.
    ///
    /// returns: `Vec<usize>`
    #[cfg(test)]
    pub(crate) fn list(&self, dim: usize) -> Vec<usize> {
        let mut indexes = vec![];
        let mut node = self.next(SENTINEL, dim);
        while node != SENTINEL {
            indexes.push(node);
            node = self.next(node, dim);
        }
        indexes
    }
}

#[cfg(test)]
mod test {
    use crate::metrics::hv_sweep::multi_list::{MultiList, SENTINEL};

    /// Build a list with 3 dimensions where the node order differs in each dimension.
    fn sample_list() -> MultiList {
        let mut list = MultiList::new(3);
        let a = list.push_node(vec![-3.0, -1.0, -2.0]);
        let b = list.push_node(vec![-2.0, -3.0, -1.0]);
        let c = list.push_node(vec![-1.0, -2.0, -3.0]);
        list.extend(&[a, b, c], 0);
        list.extend(&[b, c, a], 1);
        list.extend(&[c, a, b], 2);
        list
    }

    #[test]
    fn test_new() {
        let list = MultiList::new(4);
        assert_eq!(list.len(), 0);
        for dim in 0..4 {
            assert_eq!(list.next(SENTINEL, dim), SENTINEL);
            assert_eq!(list.prev(SENTINEL, dim), SENTINEL);
            assert!(list.list(dim).is_empty());
        }
    }

    #[test]
    fn test_extend() {
        let list = sample_list();
        assert_eq!(list.len(), 3);
        assert_eq!(list.list(0), vec![1, 2, 3]);
        assert_eq!(list.list(1), vec![2, 3, 1]);
        assert_eq!(list.list(2), vec![3, 1, 2]);

        // the lists are circular in both directions
        assert_eq!(list.prev(SENTINEL, 1), 1);
        assert_eq!(list.next(1, 1), SENTINEL);
        assert_eq!(list.prev(2, 1), SENTINEL);
    }

    #[test]
    fn test_remove_and_reinsert() {
        let mut list = sample_list();
        let mut bounds = vec![0.0, 0.0, 0.0];

        list.remove(2, 2, &mut bounds);
        assert_eq!(list.list(0), vec![1, 3]);
        assert_eq!(list.list(1), vec![3, 1]);
        // the list at the removal dimension is untouched
        assert_eq!(list.list(2), vec![3, 1, 2]);
        assert_eq!(bounds, vec![-2.0, -3.0, 0.0]);

        list.remove(1, 2, &mut bounds);
        assert_eq!(list.list(0), vec![3]);
        assert_eq!(list.list(1), vec![3]);
        assert_eq!(bounds, vec![-3.0, -3.0, 0.0]);

        list.reinsert(1, 2, &mut bounds);
        list.reinsert(2, 2, &mut bounds);
        assert!(list.is_balanced());
        assert_eq!(list.list(0), vec![1, 2, 3]);
        assert_eq!(list.list(1), vec![2, 3, 1]);
        assert_eq!(list.list(2), vec![3, 1, 2]);
        assert_eq!(bounds, vec![-3.0, -3.0, 0.0]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of removal order")]
    fn test_reinsert_out_of_order() {
        let mut list = sample_list();
        let mut bounds = vec![0.0, 0.0, 0.0];
        list.remove(1, 1, &mut bounds);
        list.remove(2, 1, &mut bounds);
        list.reinsert(1, 1, &mut bounds);
    }
}
