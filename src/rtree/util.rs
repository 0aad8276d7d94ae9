//! Utilities for generating and walking RTrees.

/// Calculate the total number of nodes in the R-tree to allocate space for
/// and the index of each tree level (used in search later)
///
/// `node_size` must be at least 2.
pub(crate) fn compute_num_nodes(num_items: u32, node_size: u16) -> (usize, Vec<usize>) {
    // The public API uses u32 and u16 types but internally we use usize
    let num_items = num_items as usize;
    let node_size = node_size as usize;
    debug_assert!(node_size >= 2);

    let mut n = num_items;
    let mut num_nodes = n;
    let mut level_bounds = vec![n * 4];
    while n > 1 {
        n = n.div_ceil(node_size);
        num_nodes += n;
        level_bounds.push(num_nodes * 4);
    }
    (num_nodes, level_bounds)
}

/// Binary search for the first value in the array bigger than the given.
#[inline]
pub(crate) fn upper_bound(value: usize, arr: &[usize]) -> usize {
    let mut i = 0;
    let mut j = arr.len() - 1;

    while i < j {
        let m = (i + j) >> 1;
        if arr[m] > value {
            j = m;
        } else {
            i = m + 1;
        }
    }

    arr[i]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_num_nodes() {
        assert_eq!(compute_num_nodes(0, 16), (0, vec![0]));
        assert_eq!(compute_num_nodes(1, 16), (1, vec![4]));
        assert_eq!(compute_num_nodes(16, 16), (17, vec![64, 68]));
        // 100 items -> 7 nodes -> 1 root
        assert_eq!(compute_num_nodes(100, 16), (108, vec![400, 428, 432]));
    }

    #[test]
    fn test_upper_bound() {
        let bounds = [400, 428, 432];
        assert_eq!(upper_bound(0, &bounds), 400);
        assert_eq!(upper_bound(400, &bounds), 428);
        assert_eq!(upper_bound(428, &bounds), 432);
    }
}
