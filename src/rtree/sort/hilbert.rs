use crate::rtree::sort::util::swap;
use crate::rtree::sort::{Sort, SortParams};

/// Orders items along a Hilbert curve through the centers of their boxes.
///
/// The implementation is ported from the original [flatbush](https://github.com/mourner/flatbush)
/// JavaScript library. The hilbert calculations are originally derived from [a C++
/// implementation](https://github.com/rawrunprotected/hilbert_curves).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilbertSort;

impl Sort for HilbertSort {
    fn sort(params: &mut SortParams, boxes: &mut [f64], indices: &mut [usize]) {
        let bounds = *params.bounds();
        // degenerate extents would divide by zero
        let width = if bounds.width() > 0. { bounds.width() } else { 1. };
        let height = if bounds.height() > 0. { bounds.height() } else { 1. };
        let hilbert_max = ((1 << 16) - 1) as f64;

        // map item centers into Hilbert coordinate space and calculate Hilbert values
        let mut hilbert_values: Vec<u32> = boxes[..params.num_items() * 4]
            .chunks_exact(4)
            .map(|item| {
                let x = (hilbert_max * ((item[0] + item[2]) / 2. - bounds.min_x()) / width).floor()
                    as u32;
                let y = (hilbert_max * ((item[1] + item[3]) / 2. - bounds.min_y()) / height)
                    .floor() as u32;
                hilbert(x, y)
            })
            .collect();

        // sort items by their Hilbert value (for packing later)
        sort(
            &mut hilbert_values,
            boxes,
            indices,
            0,
            params.num_items() - 1,
            params.node_size(),
        );
    }
}

/// Quicksort that only orders items into node-sized buckets, moving boxes and indices along with
/// the hilbert values.
// Partially taken from static_aabb2d_index under the MIT/Apache license
fn sort(
    values: &mut [u32],
    boxes: &mut [f64],
    indices: &mut [usize],
    left: usize,
    right: usize,
    node_size: usize,
) {
    debug_assert!(left <= right);

    if left / node_size >= right / node_size {
        return;
    }

    // apply median of three method
    let start = values[left];
    let mid = values[(left + right) >> 1];
    let end = values[right];

    let x = start.max(mid);
    let pivot = if end > x {
        x
    } else if x == start {
        mid.max(end)
    } else if x == mid {
        start.max(end)
    } else {
        end
    };

    let mut i = left.wrapping_sub(1);
    let mut j = right.wrapping_add(1);

    loop {
        loop {
            i = i.wrapping_add(1);
            if values[i] >= pivot {
                break;
            }
        }

        loop {
            j = j.wrapping_sub(1);
            if values[j] <= pivot {
                break;
            }
        }

        if i >= j {
            break;
        }

        swap(values, boxes, indices, i, j);
    }

    sort(values, boxes, indices, left, j, node_size);
    sort(values, boxes, indices, j.wrapping_add(1), right, node_size);
}

// Taken from static_aabb2d_index under the mit/apache license
// https://github.com/jbuckmccready/static_aabb2d_index/blob/9e6add59d77b74d4de0ac32159db47fbcb3acc28/src/static_aabb2d_index.rs#L486C1-L544C2
#[inline]
fn hilbert(x: u32, y: u32) -> u32 {
    // Fast Hilbert curve algorithm by http://threadlocalmutex.com/
    // Ported from C++ https://github.com/rawrunprotected/hilbert_curves (public domain)
    let mut a_1 = x ^ y;
    let mut b_1 = 0xFFFF ^ a_1;
    let mut c_1 = 0xFFFF ^ (x | y);
    let mut d_1 = x & (y ^ 0xFFFF);

    let mut a_2 = a_1 | (b_1 >> 1);
    let mut b_2 = (a_1 >> 1) ^ a_1;
    let mut c_2 = ((c_1 >> 1) ^ (b_1 & (d_1 >> 1))) ^ c_1;
    let mut d_2 = ((a_1 & (c_1 >> 1)) ^ (d_1 >> 1)) ^ d_1;

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    a_2 = (a_1 & (a_1 >> 2)) ^ (b_1 & (b_1 >> 2));
    b_2 = (a_1 & (b_1 >> 2)) ^ (b_1 & ((a_1 ^ b_1) >> 2));
    c_2 ^= (a_1 & (c_1 >> 2)) ^ (b_1 & (d_1 >> 2));
    d_2 ^= (b_1 & (c_1 >> 2)) ^ ((a_1 ^ b_1) & (d_1 >> 2));

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    a_2 = (a_1 & (a_1 >> 4)) ^ (b_1 & (b_1 >> 4));
    b_2 = (a_1 & (b_1 >> 4)) ^ (b_1 & ((a_1 ^ b_1) >> 4));
    c_2 ^= (a_1 & (c_1 >> 4)) ^ (b_1 & (d_1 >> 4));
    d_2 ^= (b_1 & (c_1 >> 4)) ^ ((a_1 ^ b_1) & (d_1 >> 4));

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    c_2 ^= (a_1 & (c_1 >> 8)) ^ (b_1 & (d_1 >> 8));
    d_2 ^= (b_1 & (c_1 >> 8)) ^ ((a_1 ^ b_1) & (d_1 >> 8));

    a_1 = c_2 ^ (c_2 >> 1);
    b_1 = d_2 ^ (d_2 >> 1);

    let mut i0 = x ^ y;
    let mut i1 = b_1 | (0xFFFF ^ (i0 | a_1));

    i0 = (i0 | (i0 << 8)) & 0x00FF_00FF;
    i0 = (i0 | (i0 << 4)) & 0x0F0F_0F0F;
    i0 = (i0 | (i0 << 2)) & 0x3333_3333;
    i0 = (i0 | (i0 << 1)) & 0x5555_5555;

    i1 = (i1 | (i1 << 8)) & 0x00FF_00FF;
    i1 = (i1 | (i1 << 4)) & 0x0F0F_0F0F;
    i1 = (i1 | (i1 << 2)) & 0x3333_3333;
    i1 = (i1 | (i1 << 1)) & 0x5555_5555;

    (i1 << 1) | i0
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bbox::BoundingBox;

    #[test]
    fn hilbert_corners() {
        assert_eq!(hilbert(0, 0), 0);
        // The curve visits all four quadrant corners, each with a distinct value.
        let mut corners = vec![
            hilbert(0, 0),
            hilbert(0, 0xFFFF),
            hilbert(0xFFFF, 0xFFFF),
            hilbert(0xFFFF, 0),
        ];
        corners.sort();
        corners.dedup();
        assert_eq!(corners.len(), 4);
    }

    #[test]
    fn sort_keeps_boxes_and_indices_together() {
        let items: Vec<[f64; 4]> = (0..40)
            .map(|i| {
                let v = ((i * 37) % 40) as f64;
                [v, 40. - v, v + 0.5, 40.5 - v]
            })
            .collect();
        let mut boxes: Vec<f64> = items.iter().flatten().copied().collect();
        let mut indices: Vec<usize> = (0..items.len()).collect();
        let mut params = SortParams {
            num_items: items.len(),
            node_size: 4,
            bounds: BoundingBox::new([0., 1.], [39.5, 40.5]),
        };
        HilbertSort::sort(&mut params, &mut boxes, &mut indices);

        let mut seen = indices.clone();
        seen.sort();
        assert_eq!(seen, (0..items.len()).collect::<Vec<_>>());
        for (pos, index) in indices.iter().enumerate() {
            assert_eq!(boxes[pos * 4..pos * 4 + 4], items[*index]);
        }
    }
}
