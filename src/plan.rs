//! Bucket plan derived from a strided sample of the input.
//!
//! The split is a fixed partition of the unsigned 64 bit key space into `K` equal ranges, the
//! key being `value - sample_min`. Only the bucket count determines mask and shift, the sampled
//! range does not. For inputs whose values span far less than `2^64 / K` that means most
//! elements share bucket 0, the finisher sorts such a bucket as a whole.

/// Upper bound for the number of elements inspected to estimate the value range.
pub const MAX_SAMPLE_LEN: usize = 512;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BucketPlan {
    /// The top `log2(num_buckets)` bits of a `u64`, zero for a single bucket.
    pub bucket_mask: u64,
    /// `64 - log2(num_buckets)`.
    pub bucket_shift: u32,
    pub num_buckets: usize,
    pub sample_min: i64,
    /// Computed alongside the minimum but not consumed by the classification.
    pub sample_max: i64,
}

impl BucketPlan {
    /// Creates the plan for `K` buckets around the given sampled range.
    pub fn new<const K: usize>(sample_min: i64, sample_max: i64) -> Self {
        const { assert!(K.is_power_of_two(), "bucket count must be a power of two") };

        let bits = K.trailing_zeros();
        let bucket_shift = u64::BITS - bits;
        // A shift by 64 would overflow, a single bucket selects no bits at all.
        let bucket_mask = u64::MAX.checked_shl(bucket_shift).unwrap_or(0);

        Self {
            bucket_mask,
            bucket_shift,
            num_buckets: K,
            sample_min,
            sample_max,
        }
    }

    /// Maps `value` onto the unsigned key space relative to the sampled minimum.
    ///
    /// Values below the sampled minimum saturate to 0, the sample is not guaranteed to contain
    /// the true minimum and a wrapped key would sort them into the last bucket.
    #[inline(always)]
    pub fn normalize(&self, value: i64) -> u64 {
        let below_min = ((value < self.sample_min) as u64).wrapping_neg();
        (value.wrapping_sub(self.sample_min) as u64) & !below_min
    }

    /// Bucket index of `value`, always in `0..num_buckets`.
    #[inline(always)]
    pub fn bucket_of(&self, value: i64) -> usize {
        let key = (self.normalize(value) & self.bucket_mask).wrapping_shr(self.bucket_shift);
        (key as usize).min(self.num_buckets - 1)
    }
}

/// Samples at most [`MAX_SAMPLE_LEN`] elements at a fixed stride and builds the plan for `K`
/// buckets.
pub fn build_bucket_plan<const K: usize>(v: &[i64]) -> BucketPlan {
    let len = v.len();
    let Some(&first) = v.first() else {
        return BucketPlan::new::<K>(0, 0);
    };

    // Spreads the samples over the whole input, `len / stride <= MAX_SAMPLE_LEN`.
    let stride = len.div_ceil(MAX_SAMPLE_LEN);

    let (sample_min, sample_max) = v
        .iter()
        .step_by(stride)
        .fold((first, first), |(min, max), &val| (min.min(val), max.max(val)));

    BucketPlan::new::<K>(sample_min, sample_max)
}
