//! Dashboard use case.
//!
//! Wires the session store, the reasoning client, the history repository,
//! and the credential gate together, and owns the in-flight cancellation
//! tokens. At most one solve and one image render are in flight; starting
//! a new solve first cancels the previous one (last-submit-wins, no
//! queuing).

use solvesphere_core::error::Result;
use solvesphere_core::history::{HistoryItem, HistoryRepository};
use solvesphere_core::module::{catalog, AppMode, ProcessModule};
use solvesphere_core::secret::CredentialGate;
use solvesphere_core::session::{ActiveResult, SessionStore};
use solvesphere_core::solve::{ImageRequest, InlineImage, ReasoningClient};
use solvesphere_core::user::UserSession;
use solvesphere_core::view::{ResultTab, ViewState};
use solvesphere_core::SphereError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// The solve currently in flight, tagged with its submission generation so
/// a superseded solve can never clobber the state of a newer one.
struct InFlightSolve {
    generation: u64,
    token: CancellationToken,
}

/// Orchestrates one dashboard session.
pub struct Dashboard {
    store: Arc<RwLock<SessionStore>>,
    client: Arc<dyn ReasoningClient>,
    history_repository: Arc<dyn HistoryRepository>,
    credential_gate: Arc<dyn CredentialGate>,
    in_flight: Mutex<Option<InFlightSolve>>,
    render_in_flight: Mutex<Option<CancellationToken>>,
    generation: AtomicU64,
}

impl Dashboard {
    /// Mounts the dashboard. The credential gate is checked once here; a
    /// missing credential starts the view in the key-selection state.
    pub async fn new(
        client: Arc<dyn ReasoningClient>,
        history_repository: Arc<dyn HistoryRepository>,
        credential_gate: Arc<dyn CredentialGate>,
    ) -> Self {
        let has_credential = credential_gate.has_credential().await;
        Self {
            store: Arc::new(RwLock::new(SessionStore::new(has_credential))),
            client,
            history_repository,
            credential_gate,
            in_flight: Mutex::new(None),
            render_in_flight: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    // ------------------------------------------------------------------
    // Credential gate
    // ------------------------------------------------------------------

    /// Re-checks the gate and, when a credential is now present, leaves
    /// the key-selection state. Returns whether the gate passed.
    pub async fn confirm_credential(&self) -> bool {
        if !self.credential_gate.has_credential().await {
            return false;
        }
        self.store.write().await.confirm_credential();
        true
    }

    /// Ensures an editable credential file exists and returns its path.
    pub async fn open_credential_picker(&self) -> Result<PathBuf> {
        self.credential_gate.open_credential_picker().await
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Logs a user in and loads their persisted history.
    pub async fn login(&self, name: &str, role: AppMode) {
        let history = self
            .history_repository
            .load(name)
            .await
            .unwrap_or_default();
        self.store
            .write()
            .await
            .login(UserSession::new(name, role), history);
    }

    pub async fn logout(&self) {
        self.cancel().await;
        self.store.write().await.logout();
    }

    pub async fn set_input(&self, input: impl Into<String>) {
        self.store.write().await.set_input(input);
    }

    pub async fn attach_image(&self, image: Option<InlineImage>) {
        self.store.write().await.set_pending_image(image);
    }

    pub async fn set_use_search(&self, enabled: bool) {
        self.store.write().await.set_use_search(enabled);
    }

    /// Selects a catalog module by id.
    pub async fn select_module(&self, module_id: &str) -> Result<()> {
        let module = catalog::find_module(module_id)
            .ok_or_else(|| SphereError::not_found("module", module_id))?;
        self.store.write().await.select_module(module);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Solve lifecycle
    // ------------------------------------------------------------------

    /// Submits the current draft.
    ///
    /// Cancels any prior in-flight solve first (last-submit-wins), then
    /// runs the solve and applies the classified outcome to the store. A
    /// visual-kind module pipelines a schematic render once the solve
    /// lands. Returns without doing anything when the draft is empty.
    pub async fn submit(self: &Arc<Self>) {
        let Some(request) = self.store.write().await.begin_solve() else {
            return;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(prior) = in_flight.take() {
                prior.token.cancel();
            }
            *in_flight = Some(InFlightSolve {
                generation,
                token: token.clone(),
            });
        }

        let outcome = self.client.solve(request, &token).await;

        // Only the newest submission may apply its outcome; a superseded
        // or user-cancelled solve finds its slot gone and stops here.
        {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.as_ref() {
                Some(current) if current.generation == generation => {
                    *in_flight = None;
                }
                _ => return,
            }
        }

        match outcome {
            Ok(result) => {
                let (item_id, is_visual) = {
                    let mut store = self.store.write().await;
                    let item_id = store.complete_solve(result);
                    (item_id, store.selected_module().is_visual())
                };
                self.persist_history().await;

                if is_visual {
                    let dashboard = Arc::clone(self);
                    tokio::spawn(async move {
                        dashboard.render_visual(item_id, false).await;
                    });
                }
            }
            Err(failure) => match failure.user_message() {
                None => self.store.write().await.cancel_solve(),
                Some(message) => self.store.write().await.fail_solve(message),
            },
        }
    }

    /// Cancels the in-flight solve (and any pending render) and returns
    /// the view to the input panel silently.
    pub async fn cancel(&self) {
        if let Some(in_flight) = self.in_flight.lock().await.take() {
            in_flight.token.cancel();
        }
        if let Some(token) = self.render_in_flight.lock().await.take() {
            token.cancel();
        }
        self.store.write().await.cancel_solve();
    }

    // ------------------------------------------------------------------
    // Result tabs and lazy rendering
    // ------------------------------------------------------------------

    /// Switches the result tab. The first activation of a diagram or
    /// simulation tab with no visual yet renders one and patches it into
    /// the result and its history item.
    pub async fn select_tab(&self, tab: ResultTab) {
        let (wants_realistic, item_id) = {
            let mut store = self.store.write().await;
            let wants = store.select_tab(tab);
            (wants, store.current().map(|a| a.history_id.clone()))
        };
        if let (Some(realistic), Some(item_id)) = (wants_realistic, item_id) {
            self.render_visual(item_id, realistic).await;
        }
    }

    /// Renders one visual and patches it in by history item id.
    ///
    /// At most one render is in flight; a second request while one runs is
    /// dropped (the next tab activation will retry). Render failures are
    /// logged, never surfaced as an error overlay.
    async fn render_visual(&self, item_id: String, realistic: bool) {
        let token = CancellationToken::new();
        {
            let mut render = self.render_in_flight.lock().await;
            if render.is_some() {
                return;
            }
            *render = Some(token.clone());
        }

        let request = {
            let store = self.store.read().await;
            store
                .history()
                .iter()
                .find(|item| item.id == item_id)
                .map(|item| {
                    let description = item.result.render_description(realistic);
                    ImageRequest {
                        description: if description.is_empty() {
                            item.input.clone()
                        } else {
                            description.to_string()
                        },
                        context: item.input.clone(),
                        realistic,
                    }
                })
        };

        let Some(request) = request else {
            *self.render_in_flight.lock().await = None;
            return;
        };

        let outcome = self.client.render_image(request, &token).await;
        *self.render_in_flight.lock().await = None;

        match outcome {
            Ok(image) => {
                let patched = self
                    .store
                    .write()
                    .await
                    .attach_visual(&item_id, realistic, image);
                if patched {
                    self.persist_history().await;
                }
            }
            Err(failure) if failure.is_cancelled() => {}
            Err(failure) => {
                tracing::warn!("Visual render failed: {}", failure);
            }
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Loads a past item as the current result without a network call.
    pub async fn restore_from_history(&self, item_id: &str) -> bool {
        self.store.write().await.restore_from_history(item_id)
    }

    pub async fn open_history(&self) {
        self.store.write().await.open_history();
    }

    pub async fn back_from_history(&self) {
        self.store.write().await.back_from_history();
    }

    /// Returns to the input panel, preserving the draft.
    pub async fn edit(&self) {
        self.store.write().await.edit();
    }

    /// Clears the user's history in memory and in storage.
    pub async fn clear_history(&self) {
        let user = {
            let mut store = self.store.write().await;
            store.clear_history();
            store.user().map(|u| u.name.clone())
        };
        if let Some(user) = user {
            if let Err(e) = self.history_repository.clear(&user).await {
                tracing::warn!("Failed to clear stored history: {}", e);
            }
        }
    }

    async fn persist_history(&self) {
        let (user, snapshot) = {
            let store = self.store.read().await;
            (
                store.user().map(|u| u.name.clone()),
                store.history().to_vec(),
            )
        };
        let Some(user) = user else { return };
        if let Err(e) = self.history_repository.save(&user, &snapshot).await {
            tracing::warn!("Failed to persist history: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Snapshots for the presentation layer
    // ------------------------------------------------------------------

    pub async fn view(&self) -> ViewState {
        self.store.read().await.view().clone()
    }

    pub async fn current(&self) -> Option<ActiveResult> {
        self.store.read().await.current().cloned()
    }

    pub async fn history(&self) -> Vec<HistoryItem> {
        self.store.read().await.history().to_vec()
    }

    pub async fn selected_module(&self) -> ProcessModule {
        self.store.read().await.selected_module().clone()
    }

    pub async fn user(&self) -> Option<UserSession> {
        self.store.read().await.user().cloned()
    }
}
