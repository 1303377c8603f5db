//! Bounded-concurrency fan-out for per-segment model calls.

use std::future::Future;

use tokio::task::{JoinError, JoinSet};

/// Runs `task` once per item with at most `limit` tasks in flight and returns
/// the results in the items' original order, whatever order they finish in.
///
/// A `limit` of 0 is treated as 1. The first error is returned as soon as it
/// is observed; tasks still running are aborted when the set is dropped.
pub async fn run_bounded<T, R, E, F, Fut>(limit: usize, items: Vec<T>, task: F) -> Result<Vec<R>, E>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    let limit = limit.max(1);
    let mut slots: Vec<Option<R>> = items.iter().map(|_| None).collect();
    let mut in_flight = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        if in_flight.len() >= limit {
            if let Some(joined) = in_flight.join_next().await {
                let (done, result) = joined?;
                slots[done] = Some(result?);
            }
        }
        let future = task(item);
        in_flight.spawn(async move { (index, future.await) });
    }

    while let Some(joined) = in_flight.join_next().await {
        let (done, result) = joined?;
        slots[done] = Some(result?);
    }

    Ok(slots.into_iter().flatten().collect())
}
