//! Parallel processing utilities for solving and reconstruction
//!
//! Work is split across query (or sample) indices and always collected back
//! in index order, so a parallel run produces exactly the same output as a
//! sequential one.
//!
//! By default rayon's global pool is used. [`init_thread_pool`] installs a
//! dedicated, named pool once per process; all later parallel work runs
//! inside it.

use crate::error::ParallelError;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::{Arc, OnceLock};
use tracing::debug;

static DEDICATED_POOL: OnceLock<Arc<ThreadPool>> = OnceLock::new();

/// Thread pool configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Number of threads to use (None = automatic)
    pub num_threads: Option<usize>,
    /// Thread stack size in bytes
    pub stack_size: Option<usize>,
    /// Thread name prefix
    pub thread_name_prefix: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            stack_size: None,
            thread_name_prefix: "rbfcrate-recon".to_string(),
        }
    }
}

impl ThreadPoolConfig {
    /// Set number of threads
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set stack size
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

/// Install a dedicated thread pool for all parallel work.
///
/// Only the first call has an effect; later calls return `Ok(())` and keep
/// the pool that is already installed.
pub fn init_thread_pool(config: ThreadPoolConfig) -> Result<(), ParallelError> {
    if DEDICATED_POOL.get().is_some() {
        debug!("thread pool already initialized, keeping existing pool");
        return Ok(());
    }

    let mut builder = ThreadPoolBuilder::new();

    if let Some(num_threads) = config.num_threads {
        builder = builder.num_threads(num_threads);
    }

    if let Some(stack_size) = config.stack_size {
        builder = builder.stack_size(stack_size);
    }

    if !config.thread_name_prefix.is_empty() {
        let prefix = config.thread_name_prefix.clone();
        builder = builder.thread_name(move |index| format!("{}-{}", prefix, index));
    }

    let pool = builder
        .build()
        .map_err(|e| ParallelError::ThreadPoolBuild(e.to_string()))?;
    let threads = pool.current_num_threads();

    // Lost a race with another initializer; theirs wins
    if DEDICATED_POOL.set(Arc::new(pool)).is_ok() {
        debug!(threads, prefix = %config.thread_name_prefix, "installed dedicated thread pool");
    }

    Ok(())
}

/// The dedicated pool, if one was installed
pub fn thread_pool() -> Option<Arc<ThreadPool>> {
    DEDICATED_POOL.get().cloned()
}

/// Number of worker threads parallel work will use
pub fn current_num_threads() -> usize {
    match DEDICATED_POOL.get() {
        Some(pool) => pool.current_num_threads(),
        None => rayon::current_num_threads(),
    }
}

/// Per-call parallelism switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Enable parallel processing (can be disabled for debugging)
    pub enabled: bool,
    /// Inputs shorter than this run sequentially
    pub min_parallel_len: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_parallel_len: 64,
        }
    }
}

impl ParallelConfig {
    /// A configuration that never goes parallel
    pub fn sequential() -> Self {
        Self::default().with_enabled(false)
    }

    /// Enable or disable parallel processing
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }

    /// Whether work over `len` items should be split across threads
    pub fn should_parallelize(&self, len: usize) -> bool {
        self.enabled && len >= self.min_parallel_len.max(2)
    }
}

/// Execute an operation inside the dedicated pool, or directly if none is
/// installed (rayon then uses its global pool)
pub fn execute_parallel<F, R>(op: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match DEDICATED_POOL.get() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Map `f` over `0..len`, returning results in index order
pub fn map_indices<U, F>(len: usize, config: &ParallelConfig, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    if !config.should_parallelize(len) {
        return (0..len).map(f).collect();
    }

    execute_parallel(|| (0..len).into_par_iter().map(f).collect())
}

/// Map `f` over a slice, returning results in input order
pub fn parallel_map<T, U, F>(data: &[T], config: &ParallelConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    if !config.should_parallelize(data.len()) {
        return data.iter().map(f).collect();
    }

    execute_parallel(|| data.par_iter().map(f).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_pool_config() {
        let config = ThreadPoolConfig::default()
            .with_threads(4)
            .with_stack_size(16 * 1024 * 1024)
            .with_thread_name_prefix("worker");

        assert_eq!(config.num_threads, Some(4));
        assert_eq!(config.stack_size, Some(16 * 1024 * 1024));
        assert_eq!(config.thread_name_prefix, "worker");
    }

    #[test]
    fn test_should_parallelize() {
        let config = ParallelConfig::default().with_min_parallel_len(10);
        assert!(!config.should_parallelize(9));
        assert!(config.should_parallelize(10));
        assert!(!ParallelConfig::sequential().should_parallelize(1_000_000));
        assert!(!ParallelConfig::default()
            .with_min_parallel_len(0)
            .should_parallelize(1));
    }

    #[test]
    fn test_map_indices_preserves_order() {
        let parallel = ParallelConfig::default().with_min_parallel_len(2);
        let expected: Vec<usize> = (0..5000).map(|i| i * i).collect();
        assert_eq!(map_indices(5000, &parallel, |i| i * i), expected);
        assert_eq!(
            map_indices(5000, &ParallelConfig::sequential(), |i| i * i),
            expected
        );
        assert!(map_indices(0, &parallel, |i| i).is_empty());
    }

    #[test]
    fn test_parallel_map() {
        let data: Vec<i64> = (0..1000).collect();
        let parallel = ParallelConfig::default().with_min_parallel_len(2);
        let result = parallel_map(&data, &parallel, |x| x * 2);
        assert_eq!(result, data.iter().map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_init_thread_pool_is_idempotent() {
        init_thread_pool(ThreadPoolConfig::default().with_threads(2)).unwrap();
        init_thread_pool(ThreadPoolConfig::default().with_threads(3)).unwrap();
        assert!(thread_pool().is_some());
        assert!(current_num_threads() >= 1);
        let sum: usize = execute_parallel(|| (0..100usize).into_par_iter().sum());
        assert_eq!(sum, 4950);
    }
}
