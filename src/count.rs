//! Histogram of bucket membership.

#[cfg(target_arch = "x86_64")]
use crate::cpu::cpu_features;
use crate::layout::BucketLayout;
use crate::plan::BucketPlan;

/// Fills `layout.counts` with the population of each bucket under `plan`.
///
/// The arithmetic is vectorized 4 elements at a time when AVX2 is available, the counter
/// increments stay scalar. The remainder and every other target use the scalar loop.
#[inline(never)]
pub fn count_buckets<const K: usize>(v: &[i64], plan: &BucketPlan, layout: &mut BucketLayout<K>) {
    debug_assert_eq!(plan.num_buckets, K);

    layout.counts.fill(0);

    #[allow(unused_mut)]
    let mut counted = 0;

    #[cfg(target_arch = "x86_64")]
    if cpu_features().avx2 {
        // SAFETY: AVX2 support was checked at runtime.
        counted = unsafe { count_avx2(v, plan, &mut layout.counts) };
    }

    count_scalar(&v[counted..], plan, &mut layout.counts);

    debug_assert_eq!(layout.total(), v.len());
}

#[inline]
fn count_scalar<const K: usize>(v: &[i64], plan: &BucketPlan, counts: &mut [usize; K]) {
    for &val in v {
        counts[plan.bucket_of(val)] += 1;
    }
}

/// Counts all full groups of 4 and returns how many elements were consumed.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn count_avx2<const K: usize>(
    v: &[i64],
    plan: &BucketPlan,
    counts: &mut [usize; K],
) -> usize {
    use core::arch::x86_64::*;

    let v_min = _mm256_set1_epi64x(plan.sample_min);
    let v_mask = _mm256_set1_epi64x(plan.bucket_mask as i64);
    let v_shift = _mm256_set1_epi64x(plan.bucket_shift as i64);

    let chunks = v.chunks_exact(4);
    let counted = v.len() - chunks.remainder().len();

    let mut keys = [0_u64; 4];
    for chunk in chunks {
        let data = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
        let norm = _mm256_sub_epi64(data, v_min);

        // All ones in lanes below the sampled minimum, those saturate to key 0.
        let below_min = _mm256_cmpgt_epi64(v_min, data);
        let norm = _mm256_andnot_si256(below_min, norm);

        // Variable shift counts >= 64 produce 0, which covers the single bucket plan.
        let bucket = _mm256_srlv_epi64(_mm256_and_si256(norm, v_mask), v_shift);
        _mm256_storeu_si256(keys.as_mut_ptr() as *mut __m256i, bucket);

        for key in keys {
            counts[(key as usize).min(K - 1)] += 1;
        }
    }

    counted
}
