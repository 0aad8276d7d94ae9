use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bbox::BoundingBox;
use crate::rtree::{HilbertSort, RTree, RTreeBuilder};

mod integration;

/// `n` random boxes on the longitude/latitude plane, each at most one degree wide and tall and
/// never crossing the antimeridian or the poles.
pub(crate) fn random_boxes(n: usize, seed: u64) -> Vec<BoundingBox> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut boxes = Vec::with_capacity(n);
    while boxes.len() < n {
        let min_x = rng.gen::<f64>() * 360. - 180.;
        let min_y = rng.gen::<f64>() * 180. - 90.;
        let max_x = min_x + rng.gen::<f64>();
        let max_y = min_y + rng.gen::<f64>();
        if max_x > 180. || max_y > 90. {
            continue;
        }
        boxes.push(BoundingBox::new([min_x, min_y], [max_x, max_y]));
    }
    boxes
}

pub(crate) fn build_rtree(boxes: &[BoundingBox], node_size: u16) -> RTree {
    let mut builder = RTreeBuilder::new_with_node_size(boxes.len() as u32, node_size);
    for bbox in boxes {
        builder.add_box(bbox);
    }
    builder.finish::<HilbertSort>().unwrap()
}
