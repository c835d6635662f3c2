use super::Distribute;
use crate::layout::BucketLayout;
use crate::plan::BucketPlan;

/// Buffered scatter with `CAP` staging slots per bucket.
///
/// Elements are appended to their bucket's buffer, a full buffer is copied as one block to the
/// bucket's write cursor. This turns `n` scattered stores into `n / CAP` sequential block
/// copies, at the price of a data dependent "is the buffer full" branch per element.
pub struct Buffered<const CAP: usize>;

impl<const CAP: usize> Distribute for Buffered<CAP> {
    const NAME: &'static str = "buffered";

    #[inline]
    fn distribute<const K: usize>(
        src: &[i64],
        dst: &mut [i64],
        plan: &BucketPlan,
        layout: &BucketLayout<K>,
    ) {
        buffered_scatter::<K, CAP>(src, dst, plan, layout);
    }
}

#[inline(never)]
pub(crate) fn buffered_scatter<const K: usize, const CAP: usize>(
    src: &[i64],
    dst: &mut [i64],
    plan: &BucketPlan,
    layout: &BucketLayout<K>,
) {
    const { assert!(CAP > 0, "buffer capacity must not be zero") };
    debug_assert_eq!(src.len(), dst.len());

    let mut write_pos = layout.offsets;
    let mut buffer = [[0_i64; CAP]; K];
    let mut fill = [0_usize; K];

    for &val in src {
        let bucket = plan.bucket_of(val);
        let slot = fill[bucket];
        buffer[bucket][slot] = val;

        if slot + 1 == CAP {
            let pos = write_pos[bucket];
            dst[pos..pos + CAP].copy_from_slice(&buffer[bucket]);
            write_pos[bucket] = pos + CAP;
            fill[bucket] = 0;
        } else {
            fill[bucket] = slot + 1;
        }
    }

    // Partially filled buffers.
    for bucket in 0..K {
        let len = fill[bucket];
        let pos = write_pos[bucket];
        dst[pos..pos + len].copy_from_slice(&buffer[bucket][..len]);

        debug_assert_eq!(pos + len, layout.bucket_end(bucket));
    }
}
