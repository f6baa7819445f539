//! NGO detail view controller
//!
//! Mounting starts the resolver. Once it yields a named profile the donation
//! and utilization correlators start side by side, each in its own
//! cancellation scope. Raw results land in per-role `FetchState` slots and
//! `snapshot()` derives the display model from them on demand.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::{DonationRecord, NgoProfile, UtilizationRecord};
use crate::services::donation_correlator::DonationCorrelator;
use crate::services::metrics::{derive_details, NgoDetails};
use crate::services::ngo_resolver::{failure_message, NgoResolver};
use crate::services::scope::CancellationScope;
use crate::services::state::{FetchState, FetchStatus};
use crate::services::utilization_correlator::UtilizationCorrelator;

/// Opaque navigation callback; receives a page key
pub type Navigate = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    NgoListing,
    UtilizationReport,
    MakeDonation,
}

impl NavigationTarget {
    pub fn as_page(&self) -> &'static str {
        match self {
            Self::NgoListing => "donor-ngos",
            Self::UtilizationReport => "donor-utilization",
            Self::MakeDonation => "donor-make-donation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ViewPhase {
    Idle,
    Loading,
    Failed { message: String },
    Ready(Box<NgoDetails>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub ngo_id: i64,
    pub phase: ViewPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchStatuses {
    pub resolver: FetchStatus,
    pub donations: FetchStatus,
    pub utilization: FetchStatus,
}

struct ViewState {
    ngo_id: i64,
    mounted: bool,
    profile: FetchState<NgoProfile>,
    donations: FetchState<Vec<DonationRecord>>,
    utilization: FetchState<Vec<UtilizationRecord>>,
    /// Name the correlators last ran for
    correlated_name: Option<String>,
    resolver_scope: CancellationScope,
    donation_scope: CancellationScope,
    utilization_scope: CancellationScope,
}

impl ViewState {
    fn new(ngo_id: i64) -> Self {
        Self {
            ngo_id,
            mounted: true,
            profile: FetchState::Idle,
            donations: FetchState::Idle,
            utilization: FetchState::Idle,
            correlated_name: None,
            resolver_scope: CancellationScope::new("resolver"),
            donation_scope: CancellationScope::new("donations"),
            utilization_scope: CancellationScope::new("utilization"),
        }
    }
}

struct Inner {
    client: HttpClient,
    state: Mutex<ViewState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    fn start_resolution(self: &Arc<Self>, ngo_id: i64) {
        let token = {
            let mut state = self.lock_state();
            if !state.mounted {
                return;
            }
            state.ngo_id = ngo_id;
            state.profile = FetchState::Loading;
            state.resolver_scope.renew()
        };

        let inner = Arc::clone(self);
        self.track(tokio::spawn(async move {
            inner.run_resolver(ngo_id, token).await;
        }));
    }

    async fn run_resolver(self: Arc<Self>, ngo_id: i64, token: CancellationToken) {
        tracing::info!(ngo_id, "Loading NGO details");
        let result = NgoResolver::new(self.client.clone())
            .resolve(ngo_id, &token)
            .await;

        let name = {
            let mut state = self.lock_state();
            // A superseded request must leave no trace, whatever its outcome
            if token.is_cancelled() {
                tracing::debug!(ngo_id, "Discarding superseded NGO resolution");
                return;
            }
            match result {
                Ok(resolution) => {
                    let profile = resolution.into_profile();
                    let name = profile.name.clone();
                    state.profile = FetchState::Resolved(profile);
                    name
                }
                Err(e) if e.is_cancelled() => return,
                Err(e) => {
                    tracing::error!(ngo_id, "Failed to load NGO details: {}", e);
                    state.profile = FetchState::Failed(failure_message(&e));
                    return;
                }
            }
        };

        self.start_correlation(name, &token);
    }

    /// Start both correlators for `name` unless the resolution that produced
    /// it has been superseded in the meantime.
    fn start_correlation(self: &Arc<Self>, name: String, resolver_token: &CancellationToken) {
        if name.is_empty() {
            return;
        }

        let (donation_token, utilization_token) = {
            let mut state = self.lock_state();
            if !state.mounted || resolver_token.is_cancelled() {
                return;
            }
            if state.correlated_name.as_deref() == Some(name.as_str()) {
                return;
            }
            state.correlated_name = Some(name.clone());
            state.donations = FetchState::Loading;
            state.utilization = FetchState::Loading;
            (
                state.donation_scope.renew(),
                state.utilization_scope.renew(),
            )
        };

        let inner = Arc::clone(self);
        let ngo_name = name.clone();
        self.track(tokio::spawn(async move {
            let result = DonationCorrelator::new(inner.client.clone())
                .correlate(&ngo_name, &donation_token)
                .await;
            inner.settle_secondary(&donation_token, "donations", result, |s| &mut s.donations);
        }));

        let inner = Arc::clone(self);
        let ngo_name = name;
        self.track(tokio::spawn(async move {
            let result = UtilizationCorrelator::new(inner.client.clone())
                .correlate(&ngo_name, &utilization_token)
                .await;
            inner.settle_secondary(&utilization_token, "utilization", result, |s| {
                &mut s.utilization
            });
        }));
    }

    /// Secondary fetches never surface errors; a failure leaves the list empty
    fn settle_secondary<T>(
        &self,
        token: &CancellationToken,
        role: &'static str,
        result: AppResult<T>,
        slot: impl FnOnce(&mut ViewState) -> &mut FetchState<T>,
    ) {
        let mut state = self.lock_state();
        if token.is_cancelled() {
            tracing::debug!(role, "Discarding superseded result");
            return;
        }
        let target = slot(&mut *state);
        match result {
            Ok(records) => *target = FetchState::Resolved(records),
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::warn!(role, "Secondary fetch failed: {}", e);
                *target = FetchState::Failed(e.to_string());
            }
        }
    }

    fn unmount(&self) {
        let mut state = self.lock_state();
        if !state.mounted {
            return;
        }
        state.mounted = false;
        state.resolver_scope.cancel();
        state.donation_scope.cancel();
        state.utilization_scope.cancel();
        state.profile.abort();
        state.donations.abort();
        state.utilization.abort();
        tracing::debug!(ngo_id = state.ngo_id, "NGO detail view unmounted");
    }
}

pub struct NgoDetailView {
    inner: Arc<Inner>,
    navigate: Navigate,
}

impl NgoDetailView {
    /// Mount the view and start resolving `ngo_id`. Must be called from
    /// within a tokio runtime.
    pub fn mount(client: HttpClient, ngo_id: i64, navigate: Navigate) -> Self {
        let inner = Arc::new(Inner {
            client,
            state: Mutex::new(ViewState::new(ngo_id)),
            tasks: Mutex::new(Vec::new()),
        });
        inner.start_resolution(ngo_id);
        Self { inner, navigate }
    }

    /// Switch to another NGO. The in-flight resolution, if any, is cancelled.
    pub fn set_ngo_id(&self, ngo_id: i64) {
        {
            let state = self.inner.lock_state();
            if !state.mounted || state.ngo_id == ngo_id {
                return;
            }
        }
        self.inner.start_resolution(ngo_id);
    }

    pub fn ngo_id(&self) -> i64 {
        self.inner.lock_state().ngo_id
    }

    pub fn unmount(&self) {
        self.inner.unmount();
    }

    /// Wait until no resolver or correlator task is in flight
    pub async fn settled(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = std::mem::take(
                &mut *self
                    .inner
                    .tasks
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            );
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    if e.is_panic() {
                        tracing::error!("View task panicked: {}", e);
                    }
                }
            }
        }
    }

    pub fn navigate(&self, target: NavigationTarget) {
        tracing::debug!(page = target.as_page(), "Navigating");
        (self.navigate)(target.as_page());
    }

    pub fn fetch_statuses(&self) -> FetchStatuses {
        let state = self.inner.lock_state();
        FetchStatuses {
            resolver: state.profile.status(),
            donations: state.donations.status(),
            utilization: state.utilization.status(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock_state().profile.is_loading()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.inner.lock_state();
        let phase = match &state.profile {
            FetchState::Idle | FetchState::Aborted => ViewPhase::Idle,
            FetchState::Loading => ViewPhase::Loading,
            FetchState::Failed(message) => ViewPhase::Failed {
                message: message.clone(),
            },
            FetchState::Resolved(profile) => {
                let donations = state.donations.resolved().map(Vec::as_slice).unwrap_or(&[]);
                let utilization = state
                    .utilization
                    .resolved()
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                ViewPhase::Ready(Box::new(derive_details(profile, donations, utilization)))
            }
        };

        ViewSnapshot {
            ngo_id: state.ngo_id,
            phase,
        }
    }
}

impl Drop for NgoDetailView {
    fn drop(&mut self) {
        self.inner.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Nothing listens here; tests below never let a request leave the process.
    fn offline_client() -> HttpClient {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        HttpClient::new(&config).unwrap()
    }

    fn noop_navigate() -> Navigate {
        Arc::new(|_: &str| {})
    }

    #[tokio::test]
    async fn test_unmount_before_response_aborts_silently() {
        let view = NgoDetailView::mount(offline_client(), 1, noop_navigate());
        assert!(view.is_loading());
        assert_eq!(view.snapshot().phase, ViewPhase::Loading);

        view.unmount();
        view.settled().await;

        let statuses = view.fetch_statuses();
        assert_eq!(statuses.resolver, FetchStatus::Aborted);
        assert_eq!(statuses.donations, FetchStatus::Idle);
        assert_eq!(view.snapshot().phase, ViewPhase::Idle);
    }

    #[tokio::test]
    async fn test_set_ngo_id_after_unmount_is_ignored() {
        let view = NgoDetailView::mount(offline_client(), 1, noop_navigate());
        view.unmount();
        view.set_ngo_id(2);
        view.settled().await;

        assert_eq!(view.ngo_id(), 1);
        assert_eq!(view.fetch_statuses().resolver, FetchStatus::Aborted);
    }

    fn idle_inner() -> Arc<Inner> {
        Arc::new(Inner {
            client: offline_client(),
            state: Mutex::new(ViewState::new(1)),
            tasks: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_superseded_resolution_starts_no_correlators() {
        let inner = idle_inner();
        let resolver_token = CancellationToken::new();
        resolver_token.cancel();

        inner.start_correlation("Hope Foundation".to_string(), &resolver_token);

        assert!(inner.tasks.lock().unwrap().is_empty());
        let state = inner.lock_state();
        assert_eq!(state.correlated_name, None);
        assert_eq!(state.donations.status(), FetchStatus::Idle);
        assert_eq!(state.utilization.status(), FetchStatus::Idle);
    }

    #[test]
    fn test_settle_secondary_separates_abort_from_failure() {
        let inner = idle_inner();
        inner.lock_state().donations = FetchState::Loading;
        let live = CancellationToken::new();

        inner.settle_secondary(&live, "donations", Err(AppError::Cancelled), |s| {
            &mut s.donations
        });
        assert_eq!(inner.lock_state().donations.status(), FetchStatus::Loading);

        let failure = AppError::Status {
            endpoint: "/api/donations/records".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        inner.settle_secondary(&live, "donations", Err(failure), |s| &mut s.donations);
        assert_eq!(inner.lock_state().donations.status(), FetchStatus::Failed);
    }

    #[test]
    fn test_settle_secondary_ignores_superseded_result() {
        let inner = idle_inner();
        inner.lock_state().utilization = FetchState::Loading;
        let stale = CancellationToken::new();
        stale.cancel();

        inner.settle_secondary(&stale, "utilization", Ok(Vec::new()), |s| {
            &mut s.utilization
        });
        assert_eq!(inner.lock_state().utilization.status(), FetchStatus::Loading);

        let failure = AppError::Config("late".to_string());
        inner.settle_secondary(&stale, "utilization", Err(failure), |s| &mut s.utilization);
        assert_eq!(inner.lock_state().utilization.status(), FetchStatus::Loading);
    }

    #[tokio::test]
    async fn test_navigate_forwards_page_key() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let navigate: Navigate = {
            let calls = Arc::clone(&calls);
            let seen = Arc::clone(&seen);
            Arc::new(move |page: &str| {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(page.to_string());
            })
        };

        let view = NgoDetailView::mount(offline_client(), 1, navigate);
        view.unmount();
        view.navigate(NavigationTarget::NgoListing);
        view.navigate(NavigationTarget::MakeDonation);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["donor-ngos".to_string(), "donor-make-donation".to_string()]
        );
    }
}
