use log::debug;

use crate::metrics::hv_sweep::multi_list::{MultiList, SENTINEL};

mod multi_list;
mod node;

/// The initial bound of each dimension, standing for an unbounded region.
const UNBOUNDED: f64 = -1.0e308;

/// Calculate the hyper-volume dominated by `point_set` and bounded by `reference_point`. All
/// objectives are minimised. This is a shortcut for [`HyperVolumeSweep::compute`].
///
/// # Arguments
///
/// * `point_set`: The points. Each point must have at least as many coordinates as the reference
///    point; extra coordinates are ignored.
/// * `reference_point`: The reference point. This must be dominated by every point.
///
/// returns: `f64`
pub fn hypervolume<P: AsRef<[f64]>>(point_set: &[P], reference_point: &[f64]) -> f64 {
    HyperVolumeSweep::new(reference_point).compute(point_set)
}

/// Calculate the exact hyper-volume using the third variant of the dimension-sweep algorithm
/// proposed by [Fonseca et al. (2006)](http://dx.doi.org/10.1109/CEC.2006.1688440).
///
/// The points are shifted by the reference point, so that every coordinate of a dominating point
/// is negative, and linked into a [`MultiList`] sorted in every dimension. The volume is then
/// swept from the last dimension down: each dimension is cut into slabs at the point coordinates
/// and the area of each slab is calculated recursively in one dimension less. Areas are cached in
/// the nodes and reused as long as removing points does not change them.
///
/// **IMPLEMENTATION NOTES**:
/// 1) The inputs are not validated. If the reference point is not dominated by all the points,
///    or the point sizes do not match, the result is meaningless. Use
///    [`crate::metrics::HyperVolume`] for a validated calculation.
/// 2) The caller's points are never modified.
/// 3) Each call only works on data it owns, so independent calls can run concurrently.
///
/// # Example
/// ```
///  use hvsweep::metrics::HyperVolumeSweep;
///
///  let hv = HyperVolumeSweep::new(&[3.0, 3.0, 3.0]);
///  assert_eq!(hv.compute(&[[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]), 8.0);
/// ```
#[derive(Debug, Clone)]
pub struct HyperVolumeSweep {
    /// The reference point.
    reference_point: Vec<f64>,
}

impl HyperVolumeSweep {
    /// Create the calculator for a reference point.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The reference point.
    ///
    /// returns: `HyperVolumeSweep`
    pub fn new(reference_point: &[f64]) -> Self {
        Self {
            reference_point: reference_point.to_vec(),
        }
    }

    /// Get the reference point.
    ///
    /// return: `&[f64]`
    pub fn reference_point(&self) -> &[f64] {
        &self.reference_point
    }

    /// Calculate the hyper-volume dominated by `point_set`. This returns `0.0` when there are no
    /// points.
    ///
    /// # Arguments
    ///
    /// * `point_set`: The points.
    ///
    /// returns: `f64`
    pub fn compute<P: AsRef<[f64]>>(&self, point_set: &[P]) -> f64 {
        let number_of_objectives = self.reference_point.len();
        if point_set.is_empty() || number_of_objectives == 0 {
            return 0.0;
        }
        debug!(
            "Sweeping {} points with reference point {:?}",
            point_set.len(),
            self.reference_point
        );

        let mut sweep = Sweep {
            list: self.pre_process(point_set),
        };
        let mut bounds = vec![UNBOUNDED; number_of_objectives];
        let volume = sweep.run(number_of_objectives - 1, point_set.len(), &mut bounds);
        debug_assert!(sweep.list.is_balanced());

        volume
    }

    /// Shift a copy of the points by the reference point and link them into a [`MultiList`],
    /// where each list is sorted by the coordinate of its dimension.
    ///
    /// # Arguments
    ///
    /// * `point_set`: The points.
    ///
    /// returns: `MultiList`
    fn pre_process<P: AsRef<[f64]>>(&self, point_set: &[P]) -> MultiList {
        let mut list = MultiList::new(self.reference_point.len());
        let mut nodes: Vec<usize> = point_set
            .iter()
            .map(|point| {
                let cargo = point
                    .as_ref()
                    .iter()
                    .zip(&self.reference_point)
                    .map(|(x, r)| x - r)
                    .collect();
                list.push_node(cargo)
            })
            .collect();

        // the order of the previous dimension is kept for equal points
        for dim in 0..self.reference_point.len() {
            nodes.sort_by(|a, b| list.node(*a).compare(list.node(*b), dim));
            list.extend(&nodes, dim);
        }
        list
    }
}

/// The state of one sweep. This owns the linked points and is consumed by a single
/// [`HyperVolumeSweep::compute`] call.
struct Sweep {
    list: MultiList,
}

impl Sweep {
    /// Calculate the volume dominated by the `length` points still linked in the lists up to
    /// `dim`.
    ///
    /// # Arguments
    ///
    /// * `dim`: The dimension to sweep.
    /// * `length`: The number of points linked at `dim`.
    /// * `bounds`: The bounds of the swept region. This is shared by all the recursion levels.
    ///
    /// returns: `f64`
    fn run(&mut self, dim: usize, length: usize, bounds: &mut [f64]) -> f64 {
        if length == 0 {
            return 0.0;
        }
        match dim {
            0 => -self.list.coordinate(self.list.next(SENTINEL, 0), 0),
            1 => self.sweep_2d(),
            _ => self.sweep_nd(dim, length, bounds),
        }
    }

    /// Sum the rectangles between consecutive points along the second dimension, with height
    /// equal to the best first coordinate seen so far.
    ///
    /// return: `f64`
    fn sweep_2d(&self) -> f64 {
        let list = &self.list;
        let mut volume = 0.0;
        let mut q = list.next(SENTINEL, 1);
        let mut height = list.coordinate(q, 0);
        let mut p = list.next(q, 1);

        while p != SENTINEL {
            volume += height * (list.coordinate(q, 1) - list.coordinate(p, 1));
            if list.coordinate(p, 0) < height {
                height = list.coordinate(p, 0);
            }
            q = p;
            p = list.next(q, 1);
        }
        volume + height * list.coordinate(q, 1)
    }

    /// Sweep `dim` with 3 or more dimensions.
    ///
    /// # Arguments
    ///
    /// * `dim`: The dimension to sweep.
    /// * `length`: The number of points linked at `dim`.
    /// * `bounds`: The bounds of the swept region.
    ///
    /// returns: `f64`
    fn sweep_nd(&mut self, dim: usize, mut length: usize, bounds: &mut [f64]) -> f64 {
        // caches computed deeper than this dimension are going to be invalidated by the removals
        let mut q = self.list.prev(SENTINEL, dim);
        while q != SENTINEL {
            let node = self.list.node_mut(q);
            if node.ignore < dim {
                node.ignore = 0;
            }
            q = self.list.prev(q, dim);
        }

        // pop the points outside the bounds from the end of the list. These are pushed back in
        // reverse order below
        let mut p = SENTINEL;
        let mut q = self.list.prev(p, dim);
        while length > 1 && self.in_bounds(q, dim, bounds) {
            p = q;
            self.list.remove(p, dim, bounds);
            q = self.list.prev(p, dim);
            length -= 1;
        }

        let mut volume = if length > 1 {
            let q_prev = self.list.node(self.list.prev(q, dim));
            let mut volume = self.list.coordinate(q, dim) - q_prev.cargo[dim];
            volume *= q_prev.area[dim];
            volume + q_prev.volume[dim]
        } else {
            self.list.node_mut(q).seed_area(dim);
            0.0
        };
        self.update_area(q, dim, length, bounds, volume);

        while p != SENTINEL {
            let coordinate = self.list.coordinate(p, dim);
            volume += self.list.node(q).area[dim] * (coordinate - self.list.coordinate(q, dim));
            bounds[dim] = coordinate;
            self.list.reinsert(p, dim, bounds);
            length += 1;
            q = p;
            p = self.list.next(p, dim);
            self.update_area(q, dim, length, bounds, volume);
        }

        let last = self.list.node(q);
        volume - last.area[dim] * last.cargo[dim]
    }

    /// Whether the node `q` or its predecessor at `dim` is not tighter than the bound at `dim`.
    fn in_bounds(&self, q: usize, dim: usize, bounds: &[f64]) -> bool {
        self.list.coordinate(self.list.prev(q, dim), dim) >= bounds[dim]
            || self.list.coordinate(q, dim) > bounds[dim]
    }

    /// Store the volume swept before `q` and update the area of its slab at `dim`. The area is
    /// taken from the predecessor when the cache of `q` is still valid, otherwise it is
    /// calculated in one dimension less. When the new area does not improve on the predecessor's,
    /// the cache is marked as valid for the next sweep at `dim`.
    ///
    /// # Arguments
    ///
    /// * `q`: The node index.
    /// * `dim`: The swept dimension.
    /// * `length`: The number of points linked at `dim`.
    /// * `bounds`: The bounds of the swept region.
    /// * `volume`: The volume swept so far.
    fn update_area(
        &mut self,
        q: usize,
        dim: usize,
        length: usize,
        bounds: &mut [f64],
        volume: f64,
    ) {
        self.list.node_mut(q).volume[dim] = volume;
        let q_prev = self.list.prev(q, dim);

        if self.list.node(q).ignore >= dim {
            let area = self.list.node(q_prev).area[dim];
            self.list.node_mut(q).area[dim] = area;
        } else {
            let area = self.run(dim - 1, length, bounds);
            let prev_area = self.list.node(q_prev).area[dim];
            let node = self.list.node_mut(q);
            node.area[dim] = area;
            if area <= prev_area {
                node.ignore = dim;
            }
        }
    }
}
