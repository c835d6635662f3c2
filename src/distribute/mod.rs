//! Scatter of the elements into their bucket regions.
//!
//! Every strategy leaves bucket `k` in `dst[offsets[k]..offsets[k] + counts[k]]`, in unspecified
//! order. They differ only in how the hot loop decides where the next element goes:
//!
//! - [`Buffered`] stages elements in small per bucket buffers and writes full buffers as blocks.
//! - [`Branchless`] writes every element straight to its bucket, with a sign-bit clamped cursor.
//! - [`Ghost`] stages like [`Buffered`] but keeps the buffer fill levels in a lane-parallel
//!   counter bank (AVX2, AVX-512F or portable), the full check is one vector compare.
//!
//! The layout must have been counted from the same `src` under the same plan. [`Branchless`]
//! silently overwrites the last slot of a bucket if that does not hold.

use crate::layout::BucketLayout;
use crate::plan::BucketPlan;

mod branchless;
mod buffered;
mod ghost;

pub use branchless::{clamp_ptr, Branchless};
pub use buffered::Buffered;
pub use ghost::{Ghost, GhostBank, PortableBank, MAX_GHOST_LANES};

#[cfg(target_arch = "x86_64")]
pub use ghost::{Avx2Bank, Avx512Bank};

pub trait Distribute {
    const NAME: &'static str;

    fn distribute<const K: usize>(
        src: &[i64],
        dst: &mut [i64],
        plan: &BucketPlan,
        layout: &BucketLayout<K>,
    );
}

/// The strategy used by [`crate::sort`].
#[cfg(not(feature = "branchless"))]
pub type DefaultDistributor = Buffered<{ crate::DEFAULT_BUFFER_CAPACITY }>;

/// The strategy used by [`crate::sort`].
#[cfg(feature = "branchless")]
pub type DefaultDistributor = Branchless;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count_buckets;
    use crate::plan::build_bucket_plan;

    use sort_test_tools::patterns;

    fn partition_with<D: Distribute, const K: usize>(
        src: &[i64],
    ) -> (Vec<i64>, BucketPlan, BucketLayout<K>) {
        let plan = build_bucket_plan::<K>(src);
        let mut layout = BucketLayout::<K>::new();
        count_buckets(src, &plan, &mut layout);
        layout.compute_offsets();

        let mut dst = vec![0; src.len()];
        D::distribute(src, &mut dst, &plan, &layout);

        (dst, plan, layout)
    }

    fn check_partition<D: Distribute, const K: usize>(src: &[i64]) {
        let (dst, plan, layout) = partition_with::<D, K>(src);

        for bucket in 0..K {
            for &val in &dst[layout.bucket_range(bucket)] {
                assert_eq!(plan.bucket_of(val), bucket, "{} misplaced {val}", D::NAME);
            }
        }

        let mut src_sorted = src.to_vec();
        src_sorted.sort_unstable();
        let mut dst_sorted = dst;
        dst_sorted.sort_unstable();
        assert_eq!(src_sorted, dst_sorted, "{} lost elements", D::NAME);
    }

    fn inputs() -> Vec<Vec<i64>> {
        let mut single_bucket_large = patterns::single_bucket(3_000);
        single_bucket_large.push(i64::MAX);

        vec![
            patterns::random(10_000),
            patterns::random_billion(10_000),
            patterns::extremes(2_001),
            patterns::all_equal(1_000),
            patterns::single_bucket(1_000),
            single_bucket_large,
            patterns::random_uniform(777, 0..3_i64),
            patterns::ascending(65),
        ]
    }

    #[test]
    fn buffered_partitions() {
        for src in inputs() {
            check_partition::<Buffered<16>, 256>(&src);
            check_partition::<Buffered<1>, 16>(&src);
            check_partition::<Buffered<7>, 1>(&src);
        }
    }

    #[test]
    fn branchless_partitions() {
        for src in inputs() {
            check_partition::<Branchless, 256>(&src);
            check_partition::<Branchless, 2>(&src);
        }
    }

    #[test]
    fn ghost_partitions() {
        for src in inputs() {
            check_partition::<Ghost<8>, 8>(&src);
            check_partition::<Ghost<16>, 16>(&src);
            check_partition::<Ghost<3>, 4>(&src);
            // More buckets than lanes takes the buffered path.
            check_partition::<Ghost<16>, 256>(&src);
        }
    }

    #[test]
    fn strategies_agree() {
        for src in inputs() {
            let (buffered, _, layout_a) = partition_with::<Buffered<16>, 8>(&src);
            let (branchless, _, layout_b) = partition_with::<Branchless, 8>(&src);
            let (ghost, _, layout_c) = partition_with::<Ghost<16>, 8>(&src);

            assert_eq!(layout_a, layout_b);
            assert_eq!(layout_a, layout_c);

            for bucket in 0..8 {
                let range = layout_a.bucket_range(bucket);
                let mut a = buffered[range.clone()].to_vec();
                let mut b = branchless[range.clone()].to_vec();
                let mut c = ghost[range].to_vec();
                a.sort_unstable();
                b.sort_unstable();
                c.sort_unstable();
                assert_eq!(a, b);
                assert_eq!(a, c);
            }
        }
    }
}
