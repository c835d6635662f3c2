use crate::{AcarpSort, Ghost, DEFAULT_BUFFER_CAPACITY};

sort_impl!("acarp_ghost_unstable");

// 8 buckets fit the AVX2 counter bank.
type Impl = AcarpSort<8, Ghost<DEFAULT_BUFFER_CAPACITY>>;

#[inline]
pub fn sort(v: &mut [i64]) {
    Impl::sort(v);
}

#[inline]
pub fn sort_with_scratch(v: &mut [i64], scratch: &mut [i64]) {
    Impl::sort_with_scratch(v, scratch);
}
