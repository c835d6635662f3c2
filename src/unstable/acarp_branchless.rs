use crate::{AcarpSort, Branchless, DEFAULT_BUCKETS};

sort_impl!("acarp_branchless_unstable");

type Impl = AcarpSort<DEFAULT_BUCKETS, Branchless>;

#[inline]
pub fn sort(v: &mut [i64]) {
    Impl::sort(v);
}

#[inline]
pub fn sort_with_scratch(v: &mut [i64], scratch: &mut [i64]) {
    Impl::sort_with_scratch(v, scratch);
}
