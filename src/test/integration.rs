//! End-to-end searches over geographic data.

use crate::bbox::BoundingBox;
use crate::distance::{box_distance, point_distance, Ruler};
use crate::knn::{box_metric, box_metric_with, nearby};
use crate::test::{build_rtree, random_boxes};
use crate::SpatialTree;

#[test]
fn visits_all_random_boxes_in_order() {
    let boxes = random_boxes(1000, 2024);
    let tree = build_rtree(&boxes, 16);
    let query = boxes[637];

    let mut calls = 0;
    let mut seen = vec![false; boxes.len()];
    let mut last = f64::NEG_INFINITY;
    nearby(&tree, box_metric(query, false), |bbox, item, dist| {
        calls += 1;
        assert!(!seen[item as usize], "item {item} visited twice");
        seen[item as usize] = true;
        assert_eq!(*bbox, boxes[item as usize]);
        assert!(dist >= last, "{dist} after {last}");
        last = dist;
        true
    });

    assert_eq!(calls, boxes.len());
    assert!(seen.iter().all(|s| *s));
}

/// Points around Colombo, as `[x, y]` in the same order the reference distances were measured.
fn colombo() -> Vec<[f64; 2]> {
    vec![
        [6.884204, 79.892548],
        [6.887431, 79.887346],
        [6.880526, 79.882527],
        [6.950000, 79.950000],
    ]
}

#[test]
fn nearest_by_box_then_ruler() {
    let points = colombo();
    let boxes: Vec<BoundingBox> = points.iter().map(|p| BoundingBox::from_point(*p)).collect();
    let tree = build_rtree(&boxes, 2);
    let origin = [6.887826, 79.883665];
    let query = BoundingBox::from_point(origin);

    // Rank by box distance, then report each hit in meters.
    let mut hits = vec![];
    nearby(&tree, box_metric(query, false), |bbox, item, dist| {
        hits.push((item, dist, point_distance(origin, bbox.min, bbox.min[0])));
        hits.len() < 3
    });

    let order: Vec<u32> = hits.iter().map(|(item, _, _)| *item).collect();
    assert_eq!(order, vec![1, 2, 0]);
    for (item, dist, _) in &hits {
        assert_eq!(*dist, box_distance(&query, &boxes[*item as usize], false));
    }
    let meters: Vec<f64> = hits.iter().map(|(_, _, m)| *m).collect();
    assert!((meters[0] - 409.41685802572397).abs() < 1e-6);
    assert!((meters[1] - 816.5750604553925).abs() < 1e-6);
    assert!((meters[2] - 1060.804448838962).abs() < 1e-6);
}

#[test]
fn rank_points_by_scaled_squared_distance() {
    // Leaves ranked by ruler meters, rescaled to squared degrees and clamped to the box bound.
    let points = colombo();
    let boxes: Vec<BoundingBox> = points.iter().map(|p| BoundingBox::from_point(*p)).collect();
    let tree = build_rtree(&boxes, 2);
    let origin = [6.887826, 79.883665];
    let ruler = Ruler::new(origin[0]);
    let scale = ruler.kx().max(ruler.ky());

    let query = BoundingBox::from_point(origin);
    let metric = box_metric_with(query, false, |bbox: &BoundingBox, _item: &u32| {
        let meters = ruler.distance(origin, bbox.min) / scale;
        // never below the unscaled squared gap of the leaf
        (meters * meters).max(box_distance(&query, bbox, false))
    });

    let found: Vec<u32> = tree.nearest_iter(metric).map(|n| n.item).collect();
    assert_eq!(found.len(), points.len());
    assert_eq!(found[0], 1);
    assert_eq!(*found.last().unwrap(), 3);
}

#[test]
fn wraparound_finds_neighbor_across_antimeridian() {
    let boxes = vec![
        BoundingBox::new([-179.9, 0.], [-179.8, 0.1]),
        BoundingBox::new([170., 0.], [170.1, 0.1]),
        BoundingBox::new([0., 0.], [0.1, 0.1]),
    ];
    let tree = build_rtree(&boxes, 2);
    let query = BoundingBox::from_point([179.9, 0.05]);

    let unwrapped: Vec<u32> = tree
        .nearest_iter(box_metric(query, false))
        .map(|n| n.item)
        .collect();
    assert_eq!(unwrapped, vec![1, 2, 0]);

    let wrapped: Vec<u32> = tree
        .nearest_iter(box_metric(query, true))
        .map(|n| n.item)
        .collect();
    assert_eq!(wrapped, vec![0, 1, 2]);
}
