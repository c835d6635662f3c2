pub trait Sort {
    fn name() -> String;

    fn sort(arr: &mut [i64]);

    /// Same as `sort`, but with a caller provided scratch buffer of at least `arr.len()`.
    fn sort_with_scratch(arr: &mut [i64], scratch: &mut [i64]);
}

pub mod patterns;
