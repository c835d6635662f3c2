use super::Distribute;
use crate::layout::BucketLayout;
use crate::plan::BucketPlan;

/// Direct scatter without staging buffers and without a data dependent branch.
///
/// Each element is stored at its bucket's cursor, the advanced cursor is clamped to the
/// bucket's last slot with [`clamp_ptr`]. With a layout counted from the same input the clamp
/// never engages. If it does, later elements of that bucket overwrite its last slot instead of
/// spilling into the neighbor.
pub struct Branchless;

impl Distribute for Branchless {
    const NAME: &'static str = "branchless";

    #[inline]
    fn distribute<const K: usize>(
        src: &[i64],
        dst: &mut [i64],
        plan: &BucketPlan,
        layout: &BucketLayout<K>,
    ) {
        branchless_scatter(src, dst, plan, layout);
    }
}

/// Returns `min(pos, last)` using the sign bit of `pos - last` as select mask.
#[inline(always)]
pub fn clamp_ptr(pos: usize, last: usize) -> usize {
    let temp = (pos as isize).wrapping_sub(last as isize);
    // All ones while `pos` is still below `last`.
    let mask = temp >> (isize::BITS - 1);
    (last as isize).wrapping_add(mask & temp) as usize
}

#[inline(never)]
fn branchless_scatter<const K: usize>(
    src: &[i64],
    dst: &mut [i64],
    plan: &BucketPlan,
    layout: &BucketLayout<K>,
) {
    debug_assert_eq!(src.len(), dst.len());

    let mut write_pos = layout.offsets;

    // Empty buckets wrap here, they never receive an element.
    let mut last = [0_usize; K];
    for (bucket, last) in last.iter_mut().enumerate() {
        *last = layout.bucket_end(bucket).wrapping_sub(1);
    }

    for &val in src {
        let bucket = plan.bucket_of(val);
        let pos = write_pos[bucket];
        dst[pos] = val;
        write_pos[bucket] = clamp_ptr(pos + 1, last[bucket]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_inside_bucket_is_identity() {
        assert_eq!(clamp_ptr(0, 9), 0);
        assert_eq!(clamp_ptr(8, 9), 8);
        assert_eq!(clamp_ptr(9, 9), 9);
        assert_eq!(clamp_ptr(100, 1 << 40), 100);
    }

    #[test]
    fn clamp_saturates_at_last_slot() {
        assert_eq!(clamp_ptr(10, 9), 9);
        assert_eq!(clamp_ptr(1_000, 9), 9);
        assert_eq!(clamp_ptr(1, 0), 0);
    }

    #[test]
    fn skew_stays_inside_bucket() {
        // Layout claims one element per bucket, but every value lands in bucket 0. The clamp keeps
        // all writes inside bucket 0 and leaves the other buckets untouched.
        let plan = BucketPlan::new::<4>(0, 0);
        let mut layout = BucketLayout::<4>::new();
        layout.counts = [1, 1, 1, 1];
        layout.compute_offsets();

        let src = [1, 2, 3, 4];
        let mut dst = [-1; 4];
        Branchless::distribute(&src, &mut dst, &plan, &layout);

        assert_eq!(dst, [4, -1, -1, -1]);
    }
}
