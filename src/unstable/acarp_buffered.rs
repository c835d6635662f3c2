use crate::{AcarpSort, Buffered, DEFAULT_BUCKETS, DEFAULT_BUFFER_CAPACITY};

sort_impl!("acarp_buffered_unstable");

type Impl = AcarpSort<DEFAULT_BUCKETS, Buffered<DEFAULT_BUFFER_CAPACITY>>;

#[inline]
pub fn sort(v: &mut [i64]) {
    Impl::sort(v);
}

#[inline]
pub fn sort_with_scratch(v: &mut [i64], scratch: &mut [i64]) {
    Impl::sort_with_scratch(v, scratch);
}
