use std::cmp::Ordering;

/// A point of the front threaded through all the circular lists of a
/// [`MultiList`](crate::metrics::hv_sweep::multi_list::MultiList). Links are indexes of other
/// nodes in the list arena.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// The point coordinates shifted by the reference point. This is empty for the sentinel.
    pub(crate) cargo: Vec<f64>,
    /// The index of the next node in each dimension.
    pub(crate) next: Vec<usize>,
    /// The index of the previous node in each dimension.
    pub(crate) prev: Vec<usize>,
    /// The deepest dimension whose cached `area` is still valid. `0` means nothing is cached.
    pub(crate) ignore: usize,
    /// The area of the slice at each dimension, as computed the last time the node was swept.
    pub(crate) area: Vec<f64>,
    /// The volume accumulated before this node at each dimension.
    pub(crate) volume: Vec<f64>,
}

impl Node {
    /// Create an unlinked node. Links point to `0`, which is where the list sentinel lives.
    ///
    /// # Arguments
    ///
    /// * `number_of_lists`: The number of dimensions.
    /// * `cargo`: The shifted point coordinates.
    ///
    /// returns: `Node`
    pub(crate) fn new(number_of_lists: usize, cargo: Vec<f64>) -> Self {
        Self {
            cargo,
            next: vec![0; number_of_lists],
            prev: vec![0; number_of_lists],
            ignore: 0,
            area: vec![0.0; number_of_lists],
            volume: vec![0.0; number_of_lists],
        }
    }

    /// Compare two nodes by their coordinate at `dim`. Ties are broken by comparing the full
    /// points lexicographically.
    ///
    /// # Arguments
    ///
    /// * `other`: The other node.
    /// * `dim`: The dimension to sort by.
    ///
    /// returns: `Ordering`
    pub(crate) fn compare(&self, other: &Node, dim: usize) -> Ordering {
        self.cargo[dim].total_cmp(&other.cargo[dim]).then_with(|| {
            self.cargo
                .iter()
                .zip(&other.cargo)
                .map(|(a, b)| a.total_cmp(b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }

    /// Seed the cached areas of a node left alone in the sweep at `dim`. The area at level
    /// `i + 1` is the area at level `i` stretched to the origin along `i`; levels are visited
    /// from the top so that each one reads the value the level below had before seeding.
    ///
    /// # Arguments
    ///
    /// * `dim`: The swept dimension.
    pub(crate) fn seed_area(&mut self, dim: usize) {
        self.area[0] = 1.0;
        for i in (0..dim).rev() {
            self.area[i + 1] = self.area[i] * -self.cargo[i];
        }
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use crate::metrics::hv_sweep::node::Node;

    #[test]
    fn test_compare() {
        let n1 = Node::new(3, vec![1.0, 2.0, 3.0]);
        let n2 = Node::new(3, vec![2.0, 3.0, 4.0]);
        let n3 = Node::new(3, vec![9.0, 2.0, 3.0]);

        assert_eq!(n1.compare(&n2, 0), Ordering::Less);
        assert_eq!(n2.compare(&n1, 2), Ordering::Greater);
        assert_eq!(n1.compare(&n1.clone(), 1), Ordering::Equal);
        // same coordinate at dimension 1, tie broken on the first coordinate
        assert_eq!(n1.compare(&n3, 1), Ordering::Less);
        assert_eq!(n3.compare(&n1, 2), Ordering::Greater);
    }

    #[test]
    fn test_seed_area() {
        let mut node = Node::new(3, vec![-2.0, -3.0, -4.0]);
        node.seed_area(1);
        assert_eq!(node.area, vec![1.0, 2.0, 0.0]);

        let mut node = Node::new(3, vec![-2.0, -3.0, -4.0]);
        node.seed_area(2);
        // the second level reads the area of the first level before seeding
        assert_eq!(node.area, vec![1.0, 2.0, 0.0]);
    }
}
