//! Named sort implementations, the unit the test suite and the benchmarks operate on.

pub mod acarp_branchless;
pub mod acarp_buffered;
pub mod acarp_ghost;
pub mod rust_std;
