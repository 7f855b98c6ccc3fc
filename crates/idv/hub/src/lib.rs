//! The data hub: the only shared mutable state in the system.
//!
//! Producers and consumers rendezvous here without holding references to
//! each other. All reads and writes run under one coarse mutex covering
//! the whole hub; operations are short and never block inside the
//! critical section. Subscribers are notified with no hub lock held —
//! the matching callbacks are cloned out first — so a callback may
//! re-enter the hub, including `subscribe`, without deadlocking.

#![deny(unsafe_code)]

use idv_types::{CustomerRecord, DocumentKind, RequestId, SupervisorDecision, VerificationResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum HubError {
    /// The bounded completion wait expired before both documents arrived.
    #[error("Timed out waiting for documents on request {0}")]
    Timeout(RequestId),

    /// The event channel closed while waiting. Cannot happen while the
    /// hub is alive; surfaced rather than silently looping.
    #[error("Hub event channel closed")]
    ChannelClosed,
}

/// A state change published by the hub.
#[derive(Clone, Debug)]
pub enum HubEvent {
    DataStored {
        request_id: RequestId,
        record: CustomerRecord,
    },
    VerificationStored {
        request_id: RequestId,
    },
    DecisionStored {
        request_id: RequestId,
    },
}

impl HubEvent {
    /// Exact event name used for named-callback subscription.
    pub fn name(&self) -> String {
        match self {
            HubEvent::DataStored { request_id, .. } => format!("data_stored_{request_id}"),
            HubEvent::VerificationStored { request_id } => {
                format!("verification_complete_{request_id}")
            }
            HubEvent::DecisionStored { request_id } => format!("decision_stored_{request_id}"),
        }
    }
}

/// Subscriber callback. Failures are logged and isolated, never
/// propagated to the writer and never cause unsubscription. Shared so
/// notification can run on a snapshot taken outside the lock.
pub type HubCallback = Arc<dyn Fn(&HubEvent) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
struct HubState {
    records: HashMap<RequestId, HashMap<DocumentKind, CustomerRecord>>,
    verifications: HashMap<RequestId, VerificationResult>,
    decisions: HashMap<RequestId, SupervisorDecision>,
}

/// Centralized store for extracted records, verification results, and
/// supervisor decisions.
pub struct DataHub {
    state: Mutex<HubState>,
    subscribers: RwLock<HashMap<String, Vec<HubCallback>>>,
    events: broadcast::Sender<HubEvent>,
}

impl DataHub {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            state: Mutex::new(HubState::default()),
            subscribers: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Insert or overwrite the record for `(request_id, record.document_kind)`.
    pub async fn store_customer_info(&self, request_id: RequestId, record: CustomerRecord) {
        {
            let mut state = self.state.lock().await;
            state
                .records
                .entry(request_id.clone())
                .or_default()
                .insert(record.document_kind, record.clone());
        }
        tracing::info!(
            request_id = %request_id,
            kind = %record.document_kind,
            "Stored customer record"
        );
        self.notify(HubEvent::DataStored { request_id, record });
    }

    /// All records stored for a request, empty if none. Returns clones;
    /// hub state is never handed out by reference.
    pub async fn get_customer_info(
        &self,
        request_id: &RequestId,
    ) -> HashMap<DocumentKind, CustomerRecord> {
        let state = self.state.lock().await;
        state.records.get(request_id).cloned().unwrap_or_default()
    }

    /// True once every document kind has a stored record for the request.
    /// Monotonic: there is no deletion path.
    pub async fn is_data_complete(&self, request_id: &RequestId) -> bool {
        let state = self.state.lock().await;
        match state.records.get(request_id) {
            Some(records) => DocumentKind::ALL.iter().all(|kind| records.contains_key(kind)),
            None => false,
        }
    }

    /// Store a verification result; the latest overwrites.
    pub async fn store_verification_result(&self, result: VerificationResult) {
        let request_id = result.request_id.clone();
        {
            let mut state = self.state.lock().await;
            state.verifications.insert(request_id.clone(), result);
        }
        tracing::info!(request_id = %request_id, "Stored verification result");
        self.notify(HubEvent::VerificationStored { request_id });
    }

    pub async fn get_verification_result(
        &self,
        request_id: &RequestId,
    ) -> Option<VerificationResult> {
        let state = self.state.lock().await;
        state.verifications.get(request_id).cloned()
    }

    pub async fn store_supervisor_decision(&self, decision: SupervisorDecision) {
        let request_id = decision.request_id.clone();
        {
            let mut state = self.state.lock().await;
            state.decisions.insert(request_id.clone(), decision);
        }
        tracing::info!(request_id = %request_id, "Stored supervisor decision");
        self.notify(HubEvent::DecisionStored { request_id });
    }

    pub async fn get_supervisor_decision(
        &self,
        request_id: &RequestId,
    ) -> Option<SupervisorDecision> {
        let state = self.state.lock().await;
        state.decisions.get(request_id).cloned()
    }

    /// Register a callback for every future firing of an exact event name
    /// (e.g. `data_stored_req-1`).
    pub fn subscribe(&self, event_name: impl Into<String>, callback: HubCallback) {
        // The subscriber map holds no invariants a panic could break, so
        // a poisoned lock is recovered rather than dropping the
        // subscription on the floor.
        let mut subscribers = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        subscribers.entry(event_name.into()).or_default().push(callback);
    }

    /// Typed event stream. Receivers see every event published after the
    /// call; slow receivers may observe lag, not corruption.
    pub fn watch(&self) -> broadcast::Receiver<HubEvent> {
        self.events.subscribe()
    }

    /// Wait until both document kinds have a stored record for the
    /// request, bounded by `timeout`.
    ///
    /// Subscribes before checking, so a record stored between the check
    /// and the wait is never missed.
    pub async fn wait_for_documents(
        &self,
        request_id: &RequestId,
        timeout: Duration,
    ) -> Result<(), HubError> {
        let mut rx = self.events.subscribe();
        if self.is_data_complete(request_id).await {
            return Ok(());
        }

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let event = tokio::time::timeout_at(deadline, rx.recv())
                .await
                .map_err(|_| HubError::Timeout(request_id.clone()))?;

            match event {
                Ok(HubEvent::DataStored { request_id: id, .. }) if &id == request_id => {
                    if self.is_data_complete(request_id).await {
                        return Ok(());
                    }
                }
                Ok(_) => {}
                // Missed events under lag; the state check is authoritative.
                Err(RecvError::Lagged(_)) => {
                    if self.is_data_complete(request_id).await {
                        return Ok(());
                    }
                }
                Err(RecvError::Closed) => return Err(HubError::ChannelClosed),
            }
        }
    }

    /// Deliver an event to named subscribers and the watch stream.
    /// Runs with no lock held: the matching callbacks are cloned out of
    /// the subscriber map before any of them is invoked, so a callback
    /// may subscribe (or re-enter the hub) without deadlocking.
    fn notify(&self, event: HubEvent) {
        let name = event.name();
        let callbacks: Vec<HubCallback> = {
            let subscribers = self.subscribers.read().unwrap_or_else(PoisonError::into_inner);
            subscribers.get(&name).cloned().unwrap_or_default()
        };
        for callback in &callbacks {
            if let Err(err) = callback(&event) {
                tracing::warn!(event = %name, error = %err, "Subscriber callback failed");
            }
        }
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for DataHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn record(kind: DocumentKind) -> CustomerRecord {
        CustomerRecord::new("John Smith", "1 Main St", kind, 0.95)
    }

    #[tokio::test]
    async fn completeness_requires_both_document_kinds() {
        let hub = DataHub::new();
        let id = RequestId::from("req-a");

        assert!(!hub.is_data_complete(&id).await);

        hub.store_customer_info(id.clone(), record(DocumentKind::BankStatement))
            .await;
        assert!(!hub.is_data_complete(&id).await);

        hub.store_customer_info(id.clone(), record(DocumentKind::CreditReport))
            .await;
        assert!(hub.is_data_complete(&id).await);

        // Overwriting a record never regresses completeness.
        hub.store_customer_info(id.clone(), record(DocumentKind::BankStatement))
            .await;
        assert!(hub.is_data_complete(&id).await);
    }

    #[tokio::test]
    async fn concurrent_writes_land_in_either_order() {
        let hub = Arc::new(DataHub::new());
        let id = RequestId::from("req-b");

        let bank = {
            let hub = Arc::clone(&hub);
            let id = id.clone();
            tokio::spawn(async move {
                hub.store_customer_info(id, record(DocumentKind::BankStatement)).await;
            })
        };
        let credit = {
            let hub = Arc::clone(&hub);
            let id = id.clone();
            tokio::spawn(async move {
                hub.store_customer_info(id, record(DocumentKind::CreditReport)).await;
            })
        };
        bank.await.unwrap();
        credit.await.unwrap();

        assert!(hub.is_data_complete(&id).await);
        assert_eq!(hub.get_customer_info(&id).await.len(), 2);
    }

    #[tokio::test]
    async fn failing_subscriber_is_isolated() {
        let hub = DataHub::new();
        let id = RequestId::from("req-c");
        let calls = Arc::new(AtomicUsize::new(0));

        hub.subscribe(
            format!("data_stored_{id}"),
            Arc::new(|_| anyhow::bail!("subscriber failure")),
        );
        let counter = Arc::clone(&calls);
        hub.subscribe(
            format!("data_stored_{id}"),
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        hub.store_customer_info(id.clone(), record(DocumentKind::BankStatement))
            .await;
        hub.store_customer_info(id.clone(), record(DocumentKind::CreditReport))
            .await;

        // The failing callback stayed registered and never blocked the rest.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(hub.is_data_complete(&id).await);
    }

    #[tokio::test]
    async fn subscription_is_exact_name_only() {
        let hub = DataHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        hub.subscribe(
            "data_stored_req-x",
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        hub.store_customer_info(RequestId::from("req-y"), record(DocumentKind::BankStatement))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        hub.store_customer_info(RequestId::from("req-x"), record(DocumentKind::BankStatement))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_callback_may_subscribe_reentrantly() {
        let hub = Arc::new(DataHub::new());
        let id = RequestId::from("req-h");
        let calls = Arc::new(AtomicUsize::new(0));

        // The first store must not deadlock even though its callback
        // takes the subscriber lock again.
        let reentrant = {
            let hub = Arc::clone(&hub);
            let calls = Arc::clone(&calls);
            Arc::new(move |_: &HubEvent| -> anyhow::Result<()> {
                let counter = Arc::clone(&calls);
                hub.subscribe(
                    "decision_stored_req-h",
                    Arc::new(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
                );
                Ok(())
            })
        };
        hub.subscribe(format!("data_stored_{id}"), reentrant);

        tokio::time::timeout(
            Duration::from_secs(5),
            hub.store_customer_info(id.clone(), record(DocumentKind::BankStatement)),
        )
        .await
        .expect("store must complete despite the reentrant subscription");

        // The subscription added from inside the callback is live.
        hub.store_supervisor_decision(SupervisorDecision::new(
            id,
            false,
            idv_types::DecisionAction::ManualReview,
            "pending documents",
        ))
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wait_completes_when_documents_arrive() {
        let hub = Arc::new(DataHub::new());
        let id = RequestId::from("req-d");

        let waiter = {
            let hub = Arc::clone(&hub);
            let id = id.clone();
            tokio::spawn(async move { hub.wait_for_documents(&id, Duration::from_secs(5)).await })
        };

        hub.store_customer_info(id.clone(), record(DocumentKind::BankStatement))
            .await;
        hub.store_customer_info(id.clone(), record(DocumentKind::CreditReport))
            .await;

        waiter.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_complete() {
        let hub = DataHub::new();
        let id = RequestId::from("req-e");
        hub.store_customer_info(id.clone(), record(DocumentKind::BankStatement))
            .await;
        hub.store_customer_info(id.clone(), record(DocumentKind::CreditReport))
            .await;

        hub.wait_for_documents(&id, Duration::from_millis(1))
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_when_documents_never_arrive() {
        let hub = DataHub::new();
        let id = RequestId::from("req-f");

        let err = hub
            .wait_for_documents(&id, Duration::from_secs(30))
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::Timeout(_)));
    }

    #[tokio::test]
    async fn partial_state_is_queryable() {
        let hub = DataHub::new();
        let id = RequestId::from("req-g");

        hub.store_customer_info(id.clone(), record(DocumentKind::CreditReport))
            .await;

        let records = hub.get_customer_info(&id).await;
        assert_eq!(records.len(), 1);
        assert!(records.contains_key(&DocumentKind::CreditReport));
        assert!(hub.get_verification_result(&id).await.is_none());
        assert!(hub.get_supervisor_decision(&id).await.is_none());
    }
}
