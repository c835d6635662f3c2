use core::ops::Range;

/// Per bucket populations and the base offset of each bucket in the output.
///
/// After [`BucketLayout::compute_offsets`] bucket `k` owns `offsets[k]..offsets[k] + counts[k]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketLayout<const K: usize> {
    pub counts: [usize; K],
    pub offsets: [usize; K],
}

impl<const K: usize> BucketLayout<K> {
    pub fn new() -> Self {
        Self {
            counts: [0; K],
            offsets: [0; K],
        }
    }

    /// Exclusive prefix sum of the counts, resulting in the starting index of each bucket.
    #[inline(never)]
    pub fn compute_offsets(&mut self) {
        let mut sum = 0;
        for (offset, count) in self.offsets.iter_mut().zip(self.counts.iter()) {
            *offset = sum;
            sum += *count;
        }
    }

    #[inline]
    pub fn bucket_range(&self, bucket: usize) -> Range<usize> {
        let start = self.offsets[bucket];
        start..start + self.counts[bucket]
    }

    /// One past the last slot of `bucket`.
    #[inline]
    pub fn bucket_end(&self, bucket: usize) -> usize {
        self.offsets[bucket] + self.counts[bucket]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl<const K: usize> Default for BucketLayout<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_exclusive_prefix_sums() {
        let mut layout = BucketLayout::<4>::new();
        layout.counts = [3, 0, 5, 2];
        layout.compute_offsets();

        assert_eq!(layout.offsets, [0, 3, 3, 8]);
        assert_eq!(layout.bucket_range(2), 3..8);
        assert_eq!(layout.bucket_range(1), 3..3);
        assert_eq!(layout.bucket_end(3), 10);
        assert_eq!(layout.total(), 10);
    }

    #[test]
    fn single_full_bucket() {
        let mut layout = BucketLayout::<8>::new();
        layout.counts[5] = 100;
        layout.compute_offsets();

        assert_eq!(layout.offsets, [0, 0, 0, 0, 0, 0, 100, 100]);
        assert_eq!(layout.bucket_range(5), 0..100);
        assert_eq!(layout.bucket_end(7), layout.total());
    }
}
