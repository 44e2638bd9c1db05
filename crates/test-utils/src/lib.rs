//! Test support for the depth frame workspace.
//!
//! Generators produce deterministic scan rows and CSV text, fixtures build
//! stores shaped like the reference dataset, and [`find_test_file`] locates
//! optional real data (tests skip via [`require_test_file!`] when absent).

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve an optional data file or return early from the test.
///
/// ```ignore
/// let csv = test_utils::require_test_file!("Challenge2.csv");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Place it under data/ or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Assert two depths (or any floats) agree within `epsilon`.
///
/// ```ignore
/// test_utils::assert_approx_eq!(9100.1000001, 9100.1, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        if (left - right).abs() > epsilon {
            panic!(
                "values differ by more than {}: left = {}, right = {}",
                epsilon, left, right
            );
        }
    }};
}
