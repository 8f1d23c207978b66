//! Bounded-concurrency mapping over futures.
//!
//! Futures are pulled from the input in batches of at most `limit`, each
//! batch is awaited as a whole, and its results are yielded in issue order
//! before the next batch is started. A slow future therefore holds up its
//! whole batch; in exchange there are never more than `limit` requests in
//! flight and output order always matches input order.

use std::future::Future;

use futures::future::join_all;
use futures::stream::{self, Stream, StreamExt};

/// Run `ops` at most `limit` at a time, yielding results in input order.
///
/// A `limit` of zero is treated as one. Futures are created lazily by the
/// input iterator and are not polled before their batch starts; dropping
/// the stream abandons every batch not yet started.
pub fn bounded_map<I>(ops: I, limit: usize) -> impl Stream<Item = <I::Item as Future>::Output>
where
    I: IntoIterator,
    I::Item: Future,
{
    let limit = limit.max(1);

    stream::unfold(ops.into_iter(), move |mut ops| async move {
        let batch: Vec<_> = ops.by_ref().take(limit).collect();
        if batch.is_empty() {
            return None;
        }
        let results = join_all(batch).await;
        Some((stream::iter(results), ops))
    })
    .flatten()
}
