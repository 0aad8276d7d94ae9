//! Incremental best-first nearest-neighbor search.
//!
//! The search keeps one min-priority queue holding every candidate discovered so far, both
//! internal nodes that have not been expanded yet and leaves that have not been emitted yet. Each
//! step pops the closest candidate: a leaf is emitted, an internal node is expanded by asking the
//! tree for its children, which are scored and pushed back onto the queue.
//!
//! As long as the score of an internal node is a lower bound for the score of everything below
//! it, leaves come out in non-decreasing order of distance. The caller never has to pick *k* up
//! front: stop consuming when you have enough. Nodes are only expanded when they reach the front
//! of the queue, so an early stop leaves most of the tree untouched.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

use crate::bbox::BoundingBox;
use crate::distance::box_distance;
use crate::tree::{SpatialTree, TreeChild};

/// A function scoring the children of a tree during a nearest-neighbor search.
///
/// The score of an [`TreeChild::Internal`] child must not exceed the score of anything stored
/// below it, otherwise items may be emitted out of order.
///
/// This is implemented for every `FnMut(&TreeChild<N, I>) -> f64` closure, and for
/// [`BoxMetric`] and [`BoxMetricWith`].
pub trait ChildDistance<N, I> {
    /// Score one child. Lower is closer.
    fn distance(&mut self, child: &TreeChild<N, I>) -> f64;
}

impl<N, I, F> ChildDistance<N, I> for F
where
    F: FnMut(&TreeChild<N, I>) -> f64,
{
    #[inline]
    fn distance(&mut self, child: &TreeChild<N, I>) -> f64 {
        self(child)
    }
}

/// Scores every child by [`box_distance`] to a fixed target box.
///
/// Create with [`box_metric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetric {
    target: BoundingBox,
    wrap_x: bool,
}

impl BoxMetric {
    /// Score children against `target`, optionally wrapping the x axis around the antimeridian.
    pub fn new(target: BoundingBox, wrap_x: bool) -> Self {
        Self { target, wrap_x }
    }

    /// The box distances are measured from.
    pub fn target(&self) -> &BoundingBox {
        &self.target
    }

    /// Keep scoring internal nodes by box distance, but score leaves with `item_distance`.
    pub fn with_item_distance<F>(self, item_distance: F) -> BoxMetricWith<F> {
        BoxMetricWith {
            metric: self,
            item_distance,
        }
    }
}

impl<N, I> ChildDistance<N, I> for BoxMetric {
    #[inline]
    fn distance(&mut self, child: &TreeChild<N, I>) -> f64 {
        box_distance(&self.target, child.bbox(), self.wrap_x)
    }
}

/// Scores internal nodes by [`box_distance`] and leaves by a caller-supplied function.
///
/// Create with [`box_metric_with`] or [`BoxMetric::with_item_distance`].
#[derive(Clone, Copy)]
pub struct BoxMetricWith<F> {
    metric: BoxMetric,
    item_distance: F,
}

impl<F> fmt::Debug for BoxMetricWith<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxMetricWith")
            .field("metric", &self.metric)
            .finish_non_exhaustive()
    }
}

impl<N, I, F> ChildDistance<N, I> for BoxMetricWith<F>
where
    F: FnMut(&BoundingBox, &I) -> f64,
{
    #[inline]
    fn distance(&mut self, child: &TreeChild<N, I>) -> f64 {
        match child {
            TreeChild::Leaf { bbox, item } => (self.item_distance)(bbox, item),
            TreeChild::Internal { .. } => self.metric.distance(child),
        }
    }
}

/// Score every child by [`box_distance`] to `target`.
///
/// The scores are squared coordinate gaps, see [`box_distance`].
pub fn box_metric(target: BoundingBox, wrap_x: bool) -> BoxMetric {
    BoxMetric::new(target, wrap_x)
}

/// Score internal nodes by [`box_distance`] to `target` and leaves by
/// `item_distance(leaf_box, item)`.
///
/// This lets leaves be ranked by an exact per-item distance while internal nodes keep the cheap
/// box bound. For the ordering to hold, `item_distance` must never return less than the box
/// distance of the leaf's enclosing nodes, i.e. it must be in the same units as
/// [`box_distance`] and bounded below by it.
pub fn box_metric_with<F>(target: BoundingBox, wrap_x: bool, item_distance: F) -> BoxMetricWith<F> {
    BoxMetric::new(target, wrap_x).with_item_distance(item_distance)
}

/// An item emitted by a nearest-neighbor search.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<I> {
    /// Bounding box of the item.
    pub bbox: BoundingBox,
    /// Payload of the item.
    pub item: I,
    /// Score assigned to the item by the distance function.
    pub distance: f64,
}

/// A child of the tree together with its score, as stored in the priority queue.
struct Candidate<N, I> {
    distance: f64,
    child: TreeChild<N, I>,
}

impl<N, I> PartialEq for Candidate<N, I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N, I> Eq for Candidate<N, I> {}

impl<N, I> Ord for Candidate<N, I> {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp so a NaN score misorders instead of panicking
        self.distance.total_cmp(&other.distance)
    }
}

impl<N, I> PartialOrd for Candidate<N, I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Iterator over the items of a [`SpatialTree`] in order of increasing distance.
///
/// Created by [`SpatialTree::nearest_iter`]. The first call to [`Iterator::next`] and any
/// later call that pops an internal node ask the tree for children; nothing is expanded ahead of
/// time. Dropping the iterator ends the search.
pub struct NearestNeighbors<'a, T, D>
where
    T: SpatialTree + 'a,
{
    tree: &'a T,
    distance: D,
    queue: BinaryHeap<Reverse<Candidate<T::Node<'a>, T::Item<'a>>>>,
    children: Vec<TreeChild<T::Node<'a>, T::Item<'a>>>,
    started: bool,
}

impl<'a, T, D> NearestNeighbors<'a, T, D>
where
    T: SpatialTree + 'a,
    D: ChildDistance<T::Node<'a>, T::Item<'a>>,
{
    /// Start a new search over `tree`, scoring children with `distance`.
    pub fn new(tree: &'a T, distance: D) -> Self {
        Self {
            tree,
            distance,
            queue: BinaryHeap::new(),
            children: Vec::new(),
            started: false,
        }
    }

    /// Number of candidates currently waiting in the queue.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Gather the children of `parent` (or of the root) and push them onto the queue.
    fn expand(&mut self, parent: Option<T::Node<'a>>) {
        self.children.clear();
        self.tree.children(parent, &mut self.children);
        for child in self.children.drain(..) {
            let distance = self.distance.distance(&child);
            self.queue.push(Reverse(Candidate { distance, child }));
        }
    }
}

impl<'a, T, D> Iterator for NearestNeighbors<'a, T, D>
where
    T: SpatialTree + 'a,
    D: ChildDistance<T::Node<'a>, T::Item<'a>>,
{
    type Item = Neighbor<T::Item<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.expand(None);
        }

        loop {
            let Reverse(Candidate { distance, child }) = self.queue.pop()?;
            match child {
                TreeChild::Leaf { bbox, item } => {
                    return Some(Neighbor {
                        bbox,
                        item,
                        distance,
                    })
                }
                TreeChild::Internal { node, .. } => self.expand(Some(node)),
            }
        }
    }
}

impl<'a, T, D> fmt::Debug for NearestNeighbors<'a, T, D>
where
    T: SpatialTree + 'a,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearestNeighbors")
            .field("queued", &self.queue.len())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

/// Visit the items of `tree` in order of increasing distance.
///
/// `distance` scores every child the search discovers, internal nodes and leaves alike (see
/// [`ChildDistance`]). `consumer` is called once per leaf with its box, payload and score, in
/// non-decreasing score order; returning `false` stops the search immediately. The search also
/// ends when every item has been visited.
///
/// No state survives the call. To search again, call `nearby` again.
///
/// ```
/// use geo_knn::bbox::BoundingBox;
/// use geo_knn::knn::{box_metric, nearby};
/// use geo_knn::rtree::{HilbertSort, RTreeBuilder};
///
/// let mut builder = RTreeBuilder::new(4);
/// builder.add(0., 0., 1., 1.);
/// builder.add(5., 5., 6., 6.);
/// builder.add(2., 2., 3., 3.);
/// builder.add(9., 9., 10., 10.);
/// let tree = builder.finish::<HilbertSort>().unwrap();
///
/// let mut found = vec![];
/// nearby(&tree, box_metric(BoundingBox::from_point([0., 0.]), false), |_, item, _| {
///     found.push(item);
///     found.len() < 2
/// });
/// assert_eq!(found, vec![0, 2]);
/// ```
pub fn nearby<'a, T, D, C>(tree: &'a T, distance: D, mut consumer: C)
where
    T: SpatialTree + 'a,
    D: ChildDistance<T::Node<'a>, T::Item<'a>>,
    C: FnMut(&BoundingBox, T::Item<'a>, f64) -> bool,
{
    for neighbor in NearestNeighbors::new(tree, distance) {
        if !consumer(&neighbor.bbox, neighbor.item, neighbor.distance) {
            return;
        }
    }
}
