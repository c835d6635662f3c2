use crate::layout::BucketLayout;
use crate::smallsort::insertion_sort;

/// Buckets up to this length are insertion sorted, longer ones use the standard unstable sort.
pub const BUCKET_INSERTION_THRESHOLD: usize = 20;

/// Sorts every bucket of the partitioned `v` in place.
#[inline(never)]
pub fn finish_buckets<const K: usize>(v: &mut [i64], layout: &BucketLayout<K>) {
    debug_assert_eq!(layout.total(), v.len());

    for bucket in 0..K {
        // Buckets with 0 or 1 elements are sorted by definition.
        if layout.counts[bucket] > 1 {
            sort_bucket(&mut v[layout.bucket_range(bucket)]);
        }
    }
}

#[inline]
pub fn sort_bucket(v: &mut [i64]) {
    if v.len() <= BUCKET_INSERTION_THRESHOLD {
        insertion_sort(v);
    } else {
        v.sort_unstable();
    }
}
