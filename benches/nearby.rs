use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo_knn::bbox::BoundingBox;
use geo_knn::distance::{box_distance, Ruler};
use geo_knn::knn::box_metric;
use geo_knn::rtree::{HilbertSort, RTree, RTreeBuilder};
use geo_knn::SpatialTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::primitives::Rectangle;

fn random_boxes(n: usize) -> Vec<BoundingBox> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n)
        .map(|_| {
            let min_x = rng.gen_range(-180.0..179.0);
            let min_y = rng.gen_range(-90.0..89.0);
            BoundingBox::new(
                [min_x, min_y],
                [min_x + rng.gen::<f64>(), min_y + rng.gen::<f64>()],
            )
        })
        .collect()
}

fn construct_packed(boxes: &[BoundingBox]) -> RTree {
    let mut builder = RTreeBuilder::new(boxes.len() as u32);
    for bbox in boxes {
        builder.add_box(bbox);
    }
    builder.finish::<HilbertSort>().unwrap()
}

fn construct_rstar(boxes: &[BoundingBox]) -> rstar::RTree<Rectangle<[f64; 2]>> {
    rstar::RTree::bulk_load(
        boxes
            .iter()
            .map(|bbox| Rectangle::from_corners(bbox.min, bbox.max))
            .collect(),
    )
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let boxes = random_boxes(100_000);
    let packed = construct_packed(&boxes);
    let dynamic = construct_rstar(&boxes);
    let query = BoundingBox::from_point([-111.92, 40.69]);

    c.bench_function("construction (packed)", |b| {
        b.iter(|| construct_packed(&boxes))
    });

    c.bench_function("nearest 10 (packed)", |b| {
        b.iter(|| {
            packed
                .nearest_iter(box_metric(query, false))
                .take(10)
                .count()
        })
    });

    c.bench_function("nearest 10 wrapped (packed)", |b| {
        b.iter(|| {
            packed
                .nearest_iter(box_metric(query, true))
                .take(10)
                .count()
        })
    });

    c.bench_function("nearest 10 (rstar adapter)", |b| {
        b.iter(|| {
            dynamic
                .nearest_iter(box_metric(query, false))
                .take(10)
                .count()
        })
    });

    c.bench_function("nearest 10 (rstar native)", |b| {
        b.iter(|| {
            dynamic
                .nearest_neighbor_iter(&[-111.92, 40.69])
                .take(10)
                .count()
        })
    });

    c.bench_function("nearest 10 (brute force)", |b| {
        b.iter(|| {
            let mut dists: Vec<f64> = boxes
                .iter()
                .map(|bbox| box_distance(&query, bbox, false))
                .collect();
            dists.sort_by(|a, b| a.total_cmp(b));
            dists.truncate(10);
            dists
        })
    });

    let ruler = Ruler::new(40.69);
    c.bench_function("ruler distance", |b| {
        b.iter(|| ruler.distance(black_box([-111.92, 40.69]), black_box([-111.9, 40.7])))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
