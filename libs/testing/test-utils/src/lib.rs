//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `FixedClock` / `SteppingClock`: deterministic `mockable::Clock` implementations
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: assertion helpers
//!
//! ```ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let name = builder.name("example", "main");
//! }
//! ```

mod clock;

#[cfg(feature = "postgres")]
mod postgres;

pub use clock::{FixedClock, SteppingClock};

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic test data derived from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name, so each test gets stable, distinct data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_example");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).name("example", "main");
    /// assert_eq!(name, "test-example-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A non-negative value in `[0, 1000)` with two decimal places.
    pub fn value(&self, index: u64) -> f64 {
        let cents = self.seed.wrapping_add(index.wrapping_mul(7919)) % 100_000;
        cents as f64 / 100.0
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Unwraps `Some`, panicking with `context` otherwise.
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Asserts that ids are strictly ascending.
    pub fn assert_ascending(ids: &[i64], context: &str) {
        assert!(
            ids.windows(2).all(|w| w[0] < w[1]),
            "{}: ids not strictly ascending: {:?}",
            context,
            ids
        );
    }
}
