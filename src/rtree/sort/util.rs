/// Swap two sort keys together with their boxes and indices.
#[inline]
pub(super) fn swap(
    values: &mut [u32],
    boxes: &mut [f64],
    indices: &mut [usize],
    i: usize,
    j: usize,
) {
    values.swap(i, j);

    let k = 4 * i;
    let m = 4 * j;
    boxes.swap(k, m);
    boxes.swap(k + 1, m + 1);
    boxes.swap(k + 2, m + 2);
    boxes.swap(k + 3, m + 3);

    indices.swap(i, j);
}
