//! Chunked concurrent fan-out for batch verification.
//!
//! Chunks bound peak concurrent outbound calls: every item in a chunk runs
//! at once, and the next chunk starts only after the whole chunk completes.
//! Within a chunk the free-provider gate still serializes same-provider
//! calls, because the gate lives inside the shared client instance.

use std::future::Future;

use futures::future::join_all;

/// Runs `operation` over `items` in sequential chunks of `chunk_size`,
/// with all items of a chunk in flight concurrently.
///
/// Results come back in input order. A `chunk_size` of zero is treated
/// as one.
pub async fn run_chunked<T, R, F, Fut>(items: Vec<T>, chunk_size: usize, operation: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
    T: Clone,
{
    let chunk_size = chunk_size.max(1);
    let mut results = Vec::with_capacity(items.len());

    for chunk in items.chunks(chunk_size) {
        let chunk_results = join_all(chunk.iter().cloned().map(&operation)).await;
        results.extend(chunk_results);
    }

    results
}
