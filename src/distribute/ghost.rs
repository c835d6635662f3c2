//! Ghost state machine: the buffer fill levels of all buckets live in one lane-parallel counter
//! bank. Per element exactly one lane is incremented (one-hot masked add), then the whole bank
//! is compared against the capacity in one go. The result is a bitmask of full lanes, those are
//! reset by a masked assignment. That bookkeeping never branches on a bucket's fill level. The
//! block flush itself is still a branch on the mask, taken once per `CAP` elements of a bucket.

use super::branchless::clamp_ptr;
use super::buffered::buffered_scatter;
use super::Distribute;
use crate::layout::BucketLayout;
use crate::plan::BucketPlan;

/// Lane-parallel bank of per bucket fill counters.
pub trait GhostBank {
    /// Number of buckets the bank can track.
    const LANES: usize;

    fn new(capacity: u32) -> Self;

    /// Fill level of `lane`, always below the capacity between calls to
    /// [`GhostBank::increment_and_trigger`].
    fn level(&self, lane: usize) -> usize;

    /// Adds one to `lane`, resets every lane that reached the capacity and returns those lanes
    /// as bitmask.
    ///
    /// # Safety
    ///
    /// The instruction set the bank is built on must be available on the running CPU.
    unsafe fn increment_and_trigger(&mut self, lane: usize) -> u32;
}

/// Bank over a plain lane array. The per lane loop has no data dependent branches and is
/// vectorized by the compiler for whatever the target offers.
#[derive(Copy, Clone, Debug)]
pub struct PortableBank<const LANES: usize> {
    counts: [u32; LANES],
    capacity: u32,
}

impl<const LANES: usize> GhostBank for PortableBank<LANES> {
    const LANES: usize = LANES;

    fn new(capacity: u32) -> Self {
        const { assert!(LANES <= 32, "lane mask is a u32") };

        Self {
            counts: [0; LANES],
            capacity,
        }
    }

    #[inline(always)]
    fn level(&self, lane: usize) -> usize {
        self.counts[lane] as usize
    }

    #[inline(always)]
    unsafe fn increment_and_trigger(&mut self, lane: usize) -> u32 {
        let mut full = 0_u32;

        for (i, count) in self.counts.iter_mut().enumerate() {
            let next = *count + (i == lane) as u32;
            let is_full = (next >= self.capacity) as u32;
            full |= is_full << i;
            *count = next & is_full.wrapping_sub(1);
        }

        full
    }
}

/// Bank held in one 256-bit register worth of 32-bit lanes.
#[cfg(target_arch = "x86_64")]
#[derive(Copy, Clone, Debug)]
#[repr(C, align(32))]
pub struct Avx2Bank {
    counts: [u32; 8],
    capacity: u32,
}

#[cfg(target_arch = "x86_64")]
impl GhostBank for Avx2Bank {
    const LANES: usize = 8;

    fn new(capacity: u32) -> Self {
        Self {
            counts: [0; 8],
            capacity,
        }
    }

    #[inline(always)]
    fn level(&self, lane: usize) -> usize {
        self.counts[lane] as usize
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn increment_and_trigger(&mut self, lane: usize) -> u32 {
        use core::arch::x86_64::*;

        let lane_ids = _mm256_setr_epi32(0, 1, 2, 3, 4, 5, 6, 7);
        let capacity = _mm256_set1_epi32(self.capacity as i32);

        let counts = _mm256_load_si256(self.counts.as_ptr() as *const __m256i);

        // The selected lane compares to -1, subtracting it adds one to that lane only.
        let active = _mm256_cmpeq_epi32(lane_ids, _mm256_set1_epi32(lane as i32));
        let counts = _mm256_sub_epi32(counts, active);

        // count - capacity keeps its sign bit until the lane is full.
        let not_full = _mm256_srai_epi32::<31>(_mm256_sub_epi32(counts, capacity));
        let counts = _mm256_and_si256(counts, not_full);

        _mm256_store_si256(self.counts.as_mut_ptr() as *mut __m256i, counts);

        let not_full_mask = _mm256_movemask_ps(_mm256_castsi256_ps(not_full)) as u32;
        !not_full_mask & 0xFF
    }
}

/// Bank held in one 512-bit register worth of 32-bit lanes, using AVX-512F mask registers for
/// the lane select and the reset.
#[cfg(target_arch = "x86_64")]
#[derive(Copy, Clone, Debug)]
#[repr(C, align(64))]
pub struct Avx512Bank {
    counts: [u32; 16],
    capacity: u32,
}

#[cfg(target_arch = "x86_64")]
impl GhostBank for Avx512Bank {
    const LANES: usize = 16;

    fn new(capacity: u32) -> Self {
        Self {
            counts: [0; 16],
            capacity,
        }
    }

    #[inline(always)]
    fn level(&self, lane: usize) -> usize {
        self.counts[lane] as usize
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn increment_and_trigger(&mut self, lane: usize) -> u32 {
        use core::arch::x86_64::*;

        let lane_ids = _mm512_setr_epi32(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);
        let capacity = _mm512_set1_epi32(self.capacity as i32);

        let counts = _mm512_loadu_epi32(self.counts.as_ptr() as *const i32);

        let active = _mm512_cmpeq_epi32_mask(lane_ids, _mm512_set1_epi32(lane as i32));
        let counts = _mm512_mask_add_epi32(counts, active, counts, _mm512_set1_epi32(1));

        let full = _mm512_cmpge_epu32_mask(counts, capacity);
        let counts = _mm512_mask_mov_epi32(counts, full, _mm512_setzero_si512());

        _mm512_storeu_epi32(self.counts.as_mut_ptr() as *mut i32, counts);

        full as u32
    }
}

/// Ghost state machine scatter with `CAP` staging slots per bucket.
///
/// Bank selection, widest fit last: the 8 lane AVX2 bank for `K <= 8`, the 16 lane AVX-512 bank
/// for `K <= 16`, and the 16 lane portable bank on CPUs without either. Bucket counts above 16 do
/// not fit a bank and fall back to [`super::Buffered`].
pub struct Ghost<const CAP: usize>;

/// Widest bank available, in buckets.
pub const MAX_GHOST_LANES: usize = 16;

impl<const CAP: usize> Distribute for Ghost<CAP> {
    const NAME: &'static str = "ghost";

    #[inline]
    fn distribute<const K: usize>(
        src: &[i64],
        dst: &mut [i64],
        plan: &BucketPlan,
        layout: &BucketLayout<K>,
    ) {
        if K > MAX_GHOST_LANES {
            buffered_scatter::<K, CAP>(src, dst, plan, layout);
            return;
        }

        #[cfg(target_arch = "x86_64")]
        {
            let features = crate::cpu::cpu_features();

            if K <= <Avx2Bank as GhostBank>::LANES && features.avx2 {
                // SAFETY: AVX2 support was checked at runtime.
                unsafe { ghost_scatter_avx2::<K, CAP>(src, dst, plan, layout) };
                return;
            }

            if features.avx512f {
                // SAFETY: AVX-512F support was checked at runtime.
                unsafe { ghost_scatter_avx512::<K, CAP>(src, dst, plan, layout) };
                return;
            }
        }

        // SAFETY: The portable bank has no instruction set requirements.
        unsafe {
            ghost_scatter::<K, CAP, PortableBank<MAX_GHOST_LANES>>(src, dst, plan, layout);
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[inline(never)]
#[target_feature(enable = "avx2")]
unsafe fn ghost_scatter_avx2<const K: usize, const CAP: usize>(
    src: &[i64],
    dst: &mut [i64],
    plan: &BucketPlan,
    layout: &BucketLayout<K>,
) {
    ghost_scatter::<K, CAP, Avx2Bank>(src, dst, plan, layout);
}

#[cfg(target_arch = "x86_64")]
#[inline(never)]
#[target_feature(enable = "avx512f")]
unsafe fn ghost_scatter_avx512<const K: usize, const CAP: usize>(
    src: &[i64],
    dst: &mut [i64],
    plan: &BucketPlan,
    layout: &BucketLayout<K>,
) {
    ghost_scatter::<K, CAP, Avx512Bank>(src, dst, plan, layout);
}

/// # Safety
///
/// See [`GhostBank::increment_and_trigger`].
#[inline(always)]
unsafe fn ghost_scatter<const K: usize, const CAP: usize, B: GhostBank>(
    src: &[i64],
    dst: &mut [i64],
    plan: &BucketPlan,
    layout: &BucketLayout<K>,
) {
    const { assert!(CAP > 0 && CAP <= u32::MAX as usize, "invalid buffer capacity") };
    assert!(K <= B::LANES);
    debug_assert_eq!(src.len(), dst.len());

    let mut bank = B::new(CAP as u32);
    let mut buffer = [[0_i64; CAP]; K];
    let mut write_pos = layout.offsets;

    // Block cursors never pass the bucket end.
    let mut end = [0_usize; K];
    for (bucket, end) in end.iter_mut().enumerate() {
        *end = layout.bucket_end(bucket);
    }

    for &val in src {
        let bucket = plan.bucket_of(val);
        buffer[bucket][bank.level(bucket)] = val;

        // Only the incremented lane can reach capacity, so the mask is either empty or names
        // `bucket`. The fill bookkeeping above is branch-free, this flush is not.
        let full = bank.increment_and_trigger(bucket);
        debug_assert!(full == 0 || full == 1 << bucket);
        if full != 0 {
            let pos = write_pos[bucket];
            dst[pos..pos + CAP].copy_from_slice(&buffer[bucket]);
            write_pos[bucket] = clamp_ptr(pos + CAP, end[bucket]);
        }
    }

    for bucket in 0..K {
        let len = bank.level(bucket);
        let pos = write_pos[bucket];
        dst[pos..pos + len].copy_from_slice(&buffer[bucket][..len]);

        debug_assert_eq!(pos + len, end[bucket]);
    }
}
