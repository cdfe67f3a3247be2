//! Parallel processing utilities for the filter engine.
//!
//! Provides conditional parallel iteration based on configuration
//! and table size. Uses rayon when the `parallel` feature is enabled.

use crate::types::EngineConfig;

/// Keeps the items matching a predicate, conditionally using parallel
/// iteration. Input order is preserved either way.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The table size reaches `config.parallel_threshold`
///
/// # Example
///
/// ```ignore
/// let defaulted = maybe_parallel_filter(store.rows(), &config, |r| r.current_default);
/// ```
#[allow(unused_variables)]
pub fn maybe_parallel_filter<'a, T, F>(items: &'a [T], config: &EngineConfig, predicate: F) -> Vec<&'a T>
where
    T: Sync,
    F: Fn(&T) -> bool + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().filter(|item| predicate(*item)).collect();
        }
    }

    items.iter().filter(|item| predicate(*item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_filter() {
        let config = EngineConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let results = maybe_parallel_filter(&items, &config, |x| x % 2 == 1);
        assert_eq!(results, vec![&1, &3, &5]);
    }

    #[test]
    fn test_parallel_filter_preserves_order() {
        let config = EngineConfig::new().with_threshold(10);
        let items: Vec<u32> = (0..1_000).collect();
        let results = maybe_parallel_filter(&items, &config, |x| x % 7 == 0);

        let expected: Vec<&u32> = items.iter().filter(|x| *x % 7 == 0).collect();
        assert_eq!(results, expected);
    }
}
