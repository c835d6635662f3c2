mod buffered {
    sort_test_tools::instantiate_sort_tests!(acarp_sort::unstable::acarp_buffered::SortImpl);
}

mod branchless {
    sort_test_tools::instantiate_sort_tests!(acarp_sort::unstable::acarp_branchless::SortImpl);
}

mod ghost {
    sort_test_tools::instantiate_sort_tests!(acarp_sort::unstable::acarp_ghost::SortImpl);
}

mod default {
    use sort_test_tools::Sort;

    struct SortImpl {}

    impl Sort for SortImpl {
        fn name() -> String {
            "acarp_default_unstable".into()
        }

        fn sort(arr: &mut [i64]) {
            acarp_sort::sort(arr);
        }

        fn sort_with_scratch(arr: &mut [i64], scratch: &mut [i64]) {
            acarp_sort::sort_with_scratch(arr, scratch);
        }
    }

    sort_test_tools::instantiate_sort_tests!(SortImpl);
}
