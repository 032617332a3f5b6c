//! Periodic traffic broadcast loop.

use std::sync::Arc;
use std::time::Duration;

use roadwatch_traffic::TrafficStore;
use tokio::sync::{broadcast, watch};
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Run the broadcast loop until the shutdown channel flips.
///
/// Each iteration resamples the traffic state, publishes a snapshot to every
/// connected push client, then waits out the interval or a shutdown signal.
pub async fn run(
    store: Arc<TrafficStore>,
    tx: broadcast::Sender<String>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(
        interval_secs = interval.as_secs(),
        "traffic broadcast loop starting"
    );

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tick_and_publish(&store, &tx).await;

        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("broadcast loop received shutdown signal");
                }
            }
            _ = sleep(interval) => {}
        }
    }

    info!("broadcast loop stopped");
}

/// Resample the store and publish one snapshot to the push channel.
///
/// Sends are best-effort: with no connected clients the payload is dropped
/// and the loop keeps going.
pub async fn tick_and_publish(store: &TrafficStore, tx: &broadcast::Sender<String>) {
    store.tick().await;
    let snapshot = store.snapshot().await;

    match serde_json::to_string(&snapshot) {
        Ok(payload) => match tx.send(payload) {
            Ok(subscribers) => debug!(subscribers, "broadcast traffic update"),
            Err(_) => debug!("no push clients connected"),
        },
        Err(e) => error!(error = %e, "failed to serialize traffic snapshot"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use roadwatch_traffic::TrafficState;

    use super::*;

    #[tokio::test]
    async fn test_all_subscribers_receive_matching_snapshot() {
        let store = Arc::new(TrafficStore::new());
        let (tx, _) = broadcast::channel(8);
        let mut rx1 = tx.subscribe();
        let mut rx2 = tx.subscribe();

        tick_and_publish(&store, &tx).await;

        let expected = store.snapshot().await;
        for rx in [&mut rx1, &mut rx2] {
            let payload = rx.recv().await.unwrap();
            let received: TrafficState = serde_json::from_str(&payload).unwrap();
            assert_eq!(received, expected);
        }
    }

    #[tokio::test]
    async fn test_publish_without_clients_keeps_going() {
        let store = Arc::new(TrafficStore::new());
        let (tx, _) = broadcast::channel(8);

        tick_and_publish(&store, &tx).await;
        tick_and_publish(&store, &tx).await;

        assert_eq!(store.snapshot().await.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_broadcasts_then_stops_on_shutdown() {
        let store = Arc::new(TrafficStore::new());
        let (tx, _) = broadcast::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut rx = tx.subscribe();

        let handle = tokio::spawn(run(
            store,
            tx.clone(),
            Duration::from_secs(5),
            shutdown_rx,
        ));

        let first = rx.recv().await.unwrap();
        assert!(serde_json::from_str::<TrafficState>(&first).is_ok());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
