/// Inserts `v[v.len() - 1]` into pre-sorted sequence `v[..v.len() - 1]` so that whole `v[..]`
/// becomes sorted.
#[inline]
fn insert_tail(v: &mut [i64]) {
    let i = v.len() - 1;
    let tmp = v[i];

    let mut hole = i;
    while hole > 0 && tmp < v[hole - 1] {
        v[hole] = v[hole - 1];
        hole -= 1;
    }

    v[hole] = tmp;
}

/// Sort `v` assuming `v[..offset]` is already sorted.
pub fn insertion_sort_shift_left(v: &mut [i64], offset: usize) {
    let len = v.len();

    // This would be a logic bug in other code.
    debug_assert!(offset != 0 && offset <= len);

    // Shift each element of the unsorted region v[i..] as far left as is needed to make v sorted.
    for i in offset..len {
        insert_tail(&mut v[..=i]);
    }
}

#[inline]
pub fn insertion_sort(v: &mut [i64]) {
    if v.len() >= 2 {
        insertion_sort_shift_left(v, 1);
    }
}
