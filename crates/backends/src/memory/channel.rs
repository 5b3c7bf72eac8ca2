//! In-memory channel service

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::instrument;

use contracts::{
    ChannelHandle, ChannelName, ChannelService, ContractError, Entry, ReceiptToken, ReceiveOptions,
};

/// Injectable failure scenarios
#[derive(Debug, Default, Clone)]
pub struct FailureInjection {
    /// Channels whose create should fail
    pub fail_create: Vec<ChannelName>,
    /// Channels whose send should fail
    pub fail_send: Vec<ChannelName>,
    /// Channels whose receive should fail
    pub fail_receive: Vec<ChannelName>,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    message_id: String,
    body: Bytes,
}

#[derive(Debug)]
struct InFlight {
    entry: StoredEntry,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct QueueState {
    ready: VecDeque<StoredEntry>,
    in_flight: HashMap<String, InFlight>,
}

/// In-memory channel service
///
/// Receives move entries to an in-flight table keyed by receipt token; unacked
/// entries return to the ready queue once their visibility timeout expires.
/// The long-poll wait time is accepted but not slept on.
pub struct MemoryChannelService {
    queues: Mutex<HashMap<ChannelName, QueueState>>,
    next_id: AtomicU64,
    failures: FailureInjection,
}

impl MemoryChannelService {
    /// Create a service with no injected failures
    pub fn new() -> Self {
        Self::with_failures(FailureInjection::default())
    }

    /// Create a service with injected failure scenarios
    pub fn with_failures(failures: FailureInjection) -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            failures,
        }
    }

    /// Names of all channels created so far
    pub fn channel_names(&self) -> Vec<ChannelName> {
        self.queues.lock().unwrap().keys().cloned().collect()
    }

    /// Number of ready (visible) entries in a channel
    pub fn depth(&self, name: &ChannelName) -> usize {
        self.queues
            .lock()
            .unwrap()
            .get(name)
            .map(|q| q.ready.len())
            .unwrap_or(0)
    }

    /// Number of in-flight (received, unacknowledged) entries in a channel
    pub fn in_flight(&self, name: &ChannelName) -> usize {
        self.queues
            .lock()
            .unwrap()
            .get(name)
            .map(|q| q.in_flight.len())
            .unwrap_or(0)
    }

    /// Ready bodies of a channel, oldest first
    pub fn bodies(&self, name: &ChannelName) -> Vec<Bytes> {
        self.queues
            .lock()
            .unwrap()
            .get(name)
            .map(|q| q.ready.iter().map(|e| e.body.clone()).collect())
            .unwrap_or_default()
    }

    /// Force every in-flight entry of a channel past its visibility timeout,
    /// so the next receive redelivers it. Test hook.
    pub fn expire_in_flight(&self, name: &ChannelName) {
        if let Some(state) = self.queues.lock().unwrap().get_mut(name) {
            let now = Instant::now();
            for in_flight in state.in_flight.values_mut() {
                in_flight.expires_at = now;
            }
        }
    }

    fn next_token(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn requeue_expired(state: &mut QueueState) {
        let now = Instant::now();
        let expired: Vec<String> = state
            .in_flight
            .iter()
            .filter(|(_, f)| f.expires_at <= now)
            .map(|(receipt, _)| receipt.clone())
            .collect();
        for receipt in expired {
            if let Some(in_flight) = state.in_flight.remove(&receipt) {
                state.ready.push_back(in_flight.entry);
            }
        }
    }
}

impl Default for MemoryChannelService {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelService for MemoryChannelService {
    #[instrument(name = "memory_channel_ensure", skip(self), fields(channel = %name))]
    async fn ensure(&self, name: &ChannelName) -> Result<ChannelHandle, ContractError> {
        if self.failures.fail_create.contains(name) {
            return Err(ContractError::channel_create(
                name.as_str(),
                "injected failure",
            ));
        }

        self.queues.lock().unwrap().entry(name.clone()).or_default();
        Ok(ChannelHandle {
            name: name.clone(),
            url: format!("mem://{name}"),
        })
    }

    async fn receive(
        &self,
        name: &ChannelName,
        opts: ReceiveOptions,
    ) -> Result<Vec<Entry>, ContractError> {
        if self.failures.fail_receive.contains(name) {
            return Err(ContractError::channel_receive(
                name.as_str(),
                "injected failure",
            ));
        }

        let mut queues = self.queues.lock().unwrap();
        let state = queues
            .get_mut(name)
            .ok_or_else(|| ContractError::channel_receive(name.as_str(), "no such channel"))?;

        Self::requeue_expired(state);

        let visibility = Duration::from_secs(u64::from(opts.visibility_timeout_secs));
        let mut entries = Vec::new();
        while entries.len() < opts.max_entries.min(10) {
            let Some(stored) = state.ready.pop_front() else {
                break;
            };
            let receipt = self.next_token("rcpt");
            entries.push(Entry {
                message_id: stored.message_id.clone(),
                receipt: ReceiptToken::new(&receipt),
                body: stored.body.clone(),
                channel: name.clone(),
            });
            state.in_flight.insert(
                receipt,
                InFlight {
                    entry: stored,
                    expires_at: Instant::now() + visibility,
                },
            );
        }
        Ok(entries)
    }

    async fn send(&self, name: &ChannelName, body: Bytes) -> Result<(), ContractError> {
        if self.failures.fail_send.contains(name) {
            return Err(ContractError::channel_send(
                name.as_str(),
                "injected failure",
            ));
        }

        let mut queues = self.queues.lock().unwrap();
        let state = queues
            .get_mut(name)
            .ok_or_else(|| ContractError::channel_send(name.as_str(), "no such channel"))?;
        state.ready.push_back(StoredEntry {
            message_id: self.next_token("msg"),
            body,
        });
        Ok(())
    }

    async fn delete(
        &self,
        name: &ChannelName,
        receipt: &ReceiptToken,
    ) -> Result<(), ContractError> {
        let mut queues = self.queues.lock().unwrap();
        let state = queues
            .get_mut(name)
            .ok_or_else(|| ContractError::channel_delete(name.as_str(), "no such channel"))?;

        // Idempotent: stale or already-consumed receipts are a no-op
        state.in_flight.remove(receipt.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ChannelName {
        ChannelName::new(s)
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let service = MemoryChannelService::new();
        let first = service.ensure(&name("q")).await.unwrap();
        let second = service.ensure(&name("q")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.channel_names().len(), 1);
    }

    #[tokio::test]
    async fn test_send_receive_delete() {
        let service = MemoryChannelService::new();
        let q = name("q");
        service.ensure(&q).await.unwrap();
        service.send(&q, Bytes::from_static(b"a")).await.unwrap();
        service.send(&q, Bytes::from_static(b"b")).await.unwrap();

        let entries = service.receive(&q, ReceiveOptions::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(service.depth(&q), 0);
        assert_eq!(service.in_flight(&q), 2);

        for entry in &entries {
            service.delete(&q, &entry.receipt).await.unwrap();
        }
        assert_eq!(service.in_flight(&q), 0);
    }

    #[tokio::test]
    async fn test_visibility_timeout_redelivers() {
        let service = MemoryChannelService::new();
        let q = name("q");
        service.ensure(&q).await.unwrap();
        service.send(&q, Bytes::from_static(b"a")).await.unwrap();

        let first = service.receive(&q, ReceiveOptions::default()).await.unwrap();
        assert_eq!(first.len(), 1);

        // Not yet expired: nothing visible
        let empty = service.receive(&q, ReceiveOptions::default()).await.unwrap();
        assert!(empty.is_empty());

        service.expire_in_flight(&q);
        let redelivered = service.receive(&q, ReceiveOptions::default()).await.unwrap();
        assert_eq!(redelivered.len(), 1);
        assert_eq!(redelivered[0].body, first[0].body);
        // Fresh delivery attempt, fresh receipt
        assert_ne!(redelivered[0].receipt, first[0].receipt);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = MemoryChannelService::new();
        let q = name("q");
        service.ensure(&q).await.unwrap();
        service.send(&q, Bytes::from_static(b"a")).await.unwrap();

        let entries = service.receive(&q, ReceiveOptions::default()).await.unwrap();
        service.delete(&q, &entries[0].receipt).await.unwrap();
        // Second delete with the same receipt must succeed
        service.delete(&q, &entries[0].receipt).await.unwrap();
    }

    #[tokio::test]
    async fn test_receive_respects_max_entries() {
        let service = MemoryChannelService::new();
        let q = name("q");
        service.ensure(&q).await.unwrap();
        for i in 0..5 {
            service
                .send(&q, Bytes::from(format!("entry-{i}")))
                .await
                .unwrap();
        }

        let opts = ReceiveOptions {
            max_entries: 3,
            ..Default::default()
        };
        let batch = service.receive(&q, opts).await.unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(service.depth(&q), 2);
    }

    #[tokio::test]
    async fn test_injected_send_failure() {
        let q = name("q");
        let service = MemoryChannelService::with_failures(FailureInjection {
            fail_send: vec![q.clone()],
            ..Default::default()
        });
        service.ensure(&q).await.unwrap();
        let err = service.send(&q, Bytes::from_static(b"a")).await.unwrap_err();
        assert!(err.to_string().contains("injected failure"));
    }
}
