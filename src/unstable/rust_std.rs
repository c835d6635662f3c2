sort_impl!("rust_std_unstable");

#[inline]
pub fn sort(v: &mut [i64]) {
    v.sort_unstable();
}

/// `slice::sort_unstable` works in place, the scratch buffer is unused.
#[inline]
pub fn sort_with_scratch(v: &mut [i64], _scratch: &mut [i64]) {
    v.sort_unstable();
}
