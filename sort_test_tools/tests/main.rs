use sort_test_tools::instantiate_sort_tests;
use sort_test_tools::Sort;

struct SortImpl {}

impl Sort for SortImpl {
    fn name() -> String {
        "rust_std_stable".into()
    }

    fn sort(arr: &mut [i64]) {
        arr.sort();
    }

    fn sort_with_scratch(arr: &mut [i64], _scratch: &mut [i64]) {
        arr.sort();
    }
}

instantiate_sort_tests!(SortImpl);
