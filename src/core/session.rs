//! Keyed conversions where only the most recent request may deliver a result

use crate::core::conversion::{ConversionRequest, ConversionResult};
use crate::core::error::ConvertError;
use crate::core::resolver::RateResolver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Identifies one submitted conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    pub seq: u64,
    pub from: String,
    pub to: String,
}

pub type SessionOutcome = (RequestKey, Result<ConversionResult, ConvertError>);

/// Runs each conversion as its own task. Submitting a new request aborts the
/// previous one, and results whose key is no longer the latest are dropped.
pub struct ConversionSession {
    resolver: RateResolver,
    seq: u64,
    latest: Option<RequestKey>,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SessionOutcome>,
    rx: mpsc::UnboundedReceiver<SessionOutcome>,
}

impl ConversionSession {
    pub fn new(resolver: RateResolver) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        ConversionSession {
            resolver,
            seq: 0,
            latest: None,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn latest(&self) -> Option<&RequestKey> {
        self.latest.as_ref()
    }

    pub fn submit(&mut self, request: ConversionRequest) -> RequestKey {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!(key = ?self.latest, "Aborting superseded conversion");
            }
            handle.abort();
        }

        self.seq += 1;
        let key = RequestKey {
            seq: self.seq,
            from: request.from.clone(),
            to: request.to.clone(),
        };
        self.latest = Some(key.clone());

        let resolver = self.resolver.clone();
        let tx = self.tx.clone();
        let task_key = key.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = resolver.convert(&request).await;
            // Receiver lives as long as the session.
            let _ = tx.send((task_key, result));
        }));

        key
    }

    /// Waits for the result of the latest request, skipping stale ones.
    pub async fn next_result(&mut self) -> Option<SessionOutcome> {
        while let Some((key, result)) = self.rx.recv().await {
            if self.latest.as_ref() == Some(&key) {
                return Some((key, result));
            }
            debug!(?key, "Discarding stale conversion result");
        }
        None
    }
}

impl Drop for ConversionSession {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyTable;
    use crate::core::rate::CryptoPriceProvider;
    use crate::core::resolver::tests::{MockCryptoProvider, MockFiatProvider};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowCryptoProvider {
        inner: MockCryptoProvider,
        delay: Duration,
        completed: AtomicUsize,
    }

    #[async_trait]
    impl CryptoPriceProvider for SlowCryptoProvider {
        async fn price(&self, id: &str, vs_currency: &str) -> Result<f64> {
            tokio::time::sleep(self.delay).await;
            let price = self.inner.price(id, vs_currency).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            price
        }
    }

    fn session(delay: Duration) -> (ConversionSession, Arc<SlowCryptoProvider>) {
        let fiat = Arc::new(MockFiatProvider::with_table("USD", &[("INR", 83.0)]));
        let crypto = Arc::new(SlowCryptoProvider {
            inner: MockCryptoProvider::with_prices(&[("bitcoin", "usd", 65000.0)]),
            delay,
            completed: AtomicUsize::new(0),
        });
        let resolver =
            RateResolver::new(Arc::new(CurrencyTable::builtin()), fiat, crypto.clone());
        (ConversionSession::new(resolver), crypto)
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_request_wins_over_in_flight() {
        let (mut session, crypto) = session(Duration::from_millis(200));

        let slow = session.submit(ConversionRequest::from_input("1", "bitcoin", "USD"));
        let fast = session.submit(ConversionRequest::from_input("2", "USD", "INR"));
        assert_ne!(slow, fast);
        assert_eq!(session.latest(), Some(&fast));

        let (key, result) = session.next_result().await.unwrap();
        assert_eq!(key, fast);
        assert_eq!(result.unwrap().converted_amount, 166.0);

        // The superseded task was aborted before its lookup finished.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(crypto.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_stale_result_is_discarded() {
        let (mut session, _crypto) = session(Duration::from_millis(50));

        let stale = session.submit(ConversionRequest::from_input("1", "USD", "INR"));
        // Let the first result land in the channel before superseding it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let latest = session.submit(ConversionRequest::from_input("1", "bitcoin", "USD"));

        let (key, result) = session.next_result().await.unwrap();
        assert_ne!(key, stale);
        assert_eq!(key, latest);
        assert_eq!(key.from, "bitcoin");
        assert_eq!(result.unwrap().rate, 65000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_resolution_is_delivered() {
        let (mut session, _crypto) = session(Duration::from_millis(1));

        let key = session.submit(ConversionRequest::from_input("1", "EUR", "INR"));
        let (received, result) = session.next_result().await.unwrap();
        assert_eq!(received, key);
        assert!(matches!(result, Err(ConvertError::RateUnavailable { .. })));
    }
}
