//! Async counter stream

use std::time::Duration;

use futures::Stream;
use tokio::time::sleep;

/// Yield `0..n`, suspending for `tick` before each item.
pub fn counter(n: u64, tick: Duration) -> impl Stream<Item = u64> {
    async_stream::stream! {
        for i in 0..n {
            sleep(tick).await;
            tracing::trace!(i, "counter tick");
            yield i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_counter_yields_in_order() {
        let start = Instant::now();
        let items: Vec<u64> = counter(5, Duration::from_millis(100)).collect().await;

        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_empty() {
        let items: Vec<u64> = counter(0, Duration::from_secs(1)).collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_suspends_before_each_item() {
        let stream = counter(2, Duration::from_secs(1));
        futures::pin_mut!(stream);

        let start = Instant::now();
        assert_eq!(stream.next().await, Some(0));
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(stream.next().await, Some(1));
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(stream.next().await, None);
    }
}
