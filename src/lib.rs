//! Single-pass bucket sort for `i64`.
//!
//! A sort runs four passes over the input, strictly in sequence:
//!
//! 1. [`plan::build_bucket_plan`] samples the input and fixes how values map onto `K` buckets.
//! 2. [`count::count_buckets`] builds the bucket histogram, vectorized where the CPU allows.
//! 3. [`layout::BucketLayout::compute_offsets`] turns the histogram into bucket base offsets.
//! 4. A [`distribute::Distribute`] strategy scatters every element into its bucket region of a
//!    scratch buffer, then [`finish::finish_buckets`] sorts each bucket on its own.
//!
//! Inputs of up to [`SMALL_INPUT_THRESHOLD`] elements skip all of that and are insertion sorted.

use std::marker::PhantomData;

use log::trace;

macro_rules! sort_impl {
    ($name:expr) => {
        pub struct SortImpl;

        impl sort_test_tools::Sort for SortImpl {
            fn name() -> String {
                $name.into()
            }

            #[inline]
            fn sort(arr: &mut [i64]) {
                sort(arr);
            }

            #[inline]
            fn sort_with_scratch(arr: &mut [i64], scratch: &mut [i64]) {
                sort_with_scratch(arr, scratch);
            }
        }
    };
}

pub mod count;
pub mod cpu;
pub mod distribute;
pub mod error;
pub mod finish;
pub mod layout;
pub mod plan;
pub mod smallsort;
pub mod unstable;

pub use distribute::{Branchless, Buffered, DefaultDistributor, Distribute, Ghost};
pub use error::SortError;
pub use layout::BucketLayout;
pub use plan::BucketPlan;

use count::count_buckets;
use finish::finish_buckets;
use plan::build_bucket_plan;
use smallsort::insertion_sort;

pub const DEFAULT_BUCKETS: usize = 256;
pub const DEFAULT_BUFFER_CAPACITY: usize = 16;

/// Inputs up to this length are insertion sorted without partitioning.
pub const SMALL_INPUT_THRESHOLD: usize = 64;

/// Bucket sort with `K` buckets and distribution strategy `D`.
///
/// `K` must be a power of two. The buffer capacity, where the strategy has one, is part of `D`,
/// e.g. `AcarpSort<256, Buffered<16>>`.
pub struct AcarpSort<const K: usize, D> {
    _strategy: PhantomData<fn() -> D>,
}

impl<const K: usize, D: Distribute> AcarpSort<K, D> {
    /// Sorts `v` with an internally allocated scratch buffer.
    ///
    /// # Panics
    ///
    /// Panics if the scratch buffer can't be allocated.
    pub fn sort(v: &mut [i64]) {
        if let Err(err) = Self::try_sort(v, None) {
            panic!("{err}");
        }
    }

    /// Sorts `v` using `scratch` as distribution target.
    ///
    /// # Panics
    ///
    /// Panics if `scratch` is shorter than `v`.
    pub fn sort_with_scratch(v: &mut [i64], scratch: &mut [i64]) {
        if let Err(err) = Self::try_sort(v, Some(scratch)) {
            panic!("{err}");
        }
    }

    /// Sorts `v`, using `scratch` if provided and allocating one otherwise.
    ///
    /// On error `v` is left unmodified.
    pub fn try_sort(v: &mut [i64], scratch: Option<&mut [i64]>) -> Result<(), SortError> {
        let len = v.len();

        if let Some(scratch) = &scratch {
            if scratch.len() < len {
                return Err(SortError::ScratchTooSmall {
                    required: len,
                    provided: scratch.len(),
                });
            }
        }

        if len <= SMALL_INPUT_THRESHOLD {
            insertion_sort(v);
            return Ok(());
        }

        let mut owned = Vec::new();
        let scratch = match scratch {
            Some(scratch) => &mut scratch[..len],
            None => {
                owned.try_reserve_exact(len)?;
                owned.resize(len, 0);
                owned.as_mut_slice()
            }
        };

        let (_, layout) = Self::partition(v, scratch);
        v.copy_from_slice(scratch);
        finish_buckets(v, &layout);

        Ok(())
    }

    /// Runs plan, count, offset and distribution passes, leaving the buckets of `src` unsorted
    /// but in place in `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `src` and `dst` differ in length.
    pub fn partition(src: &[i64], dst: &mut [i64]) -> (BucketPlan, BucketLayout<K>) {
        assert_eq!(src.len(), dst.len());

        let plan = build_bucket_plan::<K>(src);
        trace!(
            "acarp: partitioning {} elements into {} buckets, shift {}, sample range [{}, {}], {}",
            src.len(),
            K,
            plan.bucket_shift,
            plan.sample_min,
            plan.sample_max,
            D::NAME,
        );

        let mut layout = BucketLayout::<K>::new();
        count_buckets(src, &plan, &mut layout);
        layout.compute_offsets();

        D::distribute(src, dst, &plan, &layout);

        (plan, layout)
    }
}

/// The configuration behind [`sort`].
pub type DefaultSort = AcarpSort<DEFAULT_BUCKETS, DefaultDistributor>;

/// Sorts `v` in ascending order.
///
/// Not stable. Allocates a scratch buffer of `v.len()` elements for inputs longer than
/// [`SMALL_INPUT_THRESHOLD`].
///
/// # Panics
///
/// Panics if the scratch buffer can't be allocated, see [`try_sort`].
#[inline]
pub fn sort(v: &mut [i64]) {
    DefaultSort::sort(v);
}

/// Sorts `v` in ascending order, using `scratch` instead of allocating.
///
/// # Panics
///
/// Panics if `scratch` is shorter than `v`.
#[inline]
pub fn sort_with_scratch(v: &mut [i64], scratch: &mut [i64]) {
    DefaultSort::sort_with_scratch(v, scratch);
}

#[inline]
pub fn try_sort(v: &mut [i64], scratch: Option<&mut [i64]>) -> Result<(), SortError> {
    DefaultSort::try_sort(v, scratch)
}
