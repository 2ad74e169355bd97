//! Bounded-concurrency helpers for per-item API work.
//!
//! Items are processed with at most `max_concurrent` requests in flight and the
//! results are handed back in input order, whatever order they complete in.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

/// Type alias for boxed futures tagged with their input position
type IndexedFuture<'a, R> = Pin<Box<dyn Future<Output = (usize, R)> + Send + 'a>>;

/// Run `work` over every item with bounded concurrency, preserving input order.
///
/// # Arguments
///
/// * `items` - Inputs, in the order results should come back
/// * `work` - Async function producing one result per item
/// * `max_concurrent` - Maximum number of futures in flight (`0` is treated as `1`)
///
/// # Example
///
/// ```ignore
/// let reports = map_ordered(repos, |repo| enrich(client, repo), 4).await;
/// ```
pub async fn map_ordered<'a, T, R, F, Fut>(items: Vec<T>, work: F, max_concurrent: usize) -> Vec<R>
where
    T: 'a,
    R: Send + 'a,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'a,
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }
    let max_concurrent = max_concurrent.max(1);

    debug!("Processing {} items with max {} concurrent", total, max_concurrent);

    let mut slots: Vec<Option<R>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let mut futures: FuturesUnordered<IndexedFuture<'a, R>> = FuturesUnordered::new();
    let mut pending = items.into_iter().enumerate();

    let make_future = |index: usize, item: T, f: &F| -> IndexedFuture<'a, R> {
        let fut = f(item);
        Box::pin(async move { (index, fut.await) })
    };

    // Seed initial batch up to max_concurrent
    for (index, item) in pending.by_ref().take(max_concurrent) {
        futures.push(make_future(index, item, &work));
    }

    // Keep the pool full until every item is done
    while let Some((index, result)) = futures.next().await {
        slots[index] = Some(result);

        if let Some((next_index, next_item)) = pending.next() {
            futures.push(make_future(next_index, next_item, &work));
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_map_ordered_empty() {
        let result: Vec<usize> = map_ordered(Vec::<usize>::new(), |i| async move { i }, 4).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_map_ordered_preserves_input_order() {
        // Earlier items finish last
        let result = map_ordered(
            vec![30u64, 20, 10, 0],
            |delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay
            },
            4,
        )
        .await;

        assert_eq!(result, vec![30, 20, 10, 0]);
    }

    #[tokio::test]
    async fn test_map_ordered_respects_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_observed = Arc::new(AtomicUsize::new(0));

        let result = map_ordered(
            (0..6).collect::<Vec<usize>>(),
            |i| {
                let in_flight = in_flight.clone();
                let max_observed = max_observed.clone();
                async move {
                    let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_observed.fetch_max(current, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    i * 2
                }
            },
            2,
        )
        .await;

        assert_eq!(result, vec![0, 2, 4, 6, 8, 10]);
        assert!(max_observed.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_map_ordered_zero_concurrency_runs_sequentially() {
        let result = map_ordered(vec![1, 2, 3], |i| async move { i + 1 }, 0).await;
        assert_eq!(result, vec![2, 3, 4]);
    }
}
