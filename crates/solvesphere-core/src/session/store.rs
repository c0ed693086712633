//! Session state store.
//!
//! Single source of truth for the current user, selected module, input
//! buffer, pending image, active result, view state, and the bounded
//! history list. The store is a plain synchronous struct; the application
//! layer serializes access behind its own lock and drives persistence.

use crate::history::{HistoryItem, HISTORY_LIMIT};
use crate::module::{catalog, AppMode, ProcessModule};
use crate::solve::{InlineImage, SolutionResult, SolveRequest};
use crate::user::UserSession;
use crate::view::{ResultTab, ViewEvent, ViewState};

/// The result currently shown in the result panel, tied back to its
/// history item so deferred visuals patch the right entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveResult {
    pub history_id: String,
    pub result: SolutionResult,
}

/// Single source of truth for one dashboard session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    user: Option<UserSession>,
    selected_module: ProcessModule,
    input: String,
    pending_image: Option<InlineImage>,
    use_search: bool,
    view: ViewState,
    current: Option<ActiveResult>,
    history: Vec<HistoryItem>,
}

impl SessionStore {
    /// Creates a store gated on credential presence.
    pub fn new(has_credential: bool) -> Self {
        Self {
            user: None,
            selected_module: catalog::default_module(AppMode::Student),
            input: String::new(),
            pending_image: None,
            use_search: false,
            view: ViewState::initial(has_credential),
            current: None,
            history: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn user(&self) -> Option<&UserSession> {
        self.user.as_ref()
    }

    pub fn selected_module(&self) -> &ProcessModule {
        &self.selected_module
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn use_search(&self) -> bool {
        self.use_search
    }

    pub fn current(&self) -> Option<&ActiveResult> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    // ------------------------------------------------------------------
    // Login / logout
    // ------------------------------------------------------------------

    /// Installs the user and their loaded history, and selects the default
    /// module for their role.
    pub fn login(&mut self, user: UserSession, history: Vec<HistoryItem>) {
        self.selected_module = catalog::default_module(user.role);
        self.user = Some(user);
        self.history = history;
        self.history.truncate(HISTORY_LIMIT);
    }

    /// Drops the in-memory user. History files are keyed by name and are
    /// not touched.
    pub fn logout(&mut self) {
        self.user = None;
        self.history.clear();
        self.current = None;
        self.input.clear();
        self.pending_image = None;
    }

    // ------------------------------------------------------------------
    // Input buffer
    // ------------------------------------------------------------------

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn set_pending_image(&mut self, image: Option<InlineImage>) {
        self.pending_image = image;
    }

    pub fn set_use_search(&mut self, enabled: bool) {
        self.use_search = enabled;
    }

    pub fn select_module(&mut self, module: ProcessModule) {
        self.selected_module = module;
    }

    /// A submit needs non-empty input or an attached image.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() || self.pending_image.is_some()
    }

    // ------------------------------------------------------------------
    // Solve lifecycle
    // ------------------------------------------------------------------

    /// Validates the draft and transitions to Processing, returning the
    /// request for the reasoning client. `None` when there is nothing to
    /// submit or the view does not accept a submit.
    pub fn begin_solve(&mut self) -> Option<SolveRequest> {
        if !self.can_submit() {
            return None;
        }
        let next = self.view.clone().apply(ViewEvent::Submit);
        if !next.is_processing() {
            return None;
        }
        self.view = next;
        Some(SolveRequest {
            prompt_template: self.selected_module.prompt_template.clone(),
            input: self.input.clone(),
            image: self.pending_image.clone(),
            use_search: self.use_search,
        })
    }

    /// Installs a successful solve: appends a history item (evicting past
    /// the cap), makes it the active result, clears the draft, and shows
    /// the result panel. Returns the id of the new history item.
    pub fn complete_solve(&mut self, result: SolutionResult) -> String {
        let item = HistoryItem::new(&self.selected_module, self.input.clone(), result.clone());
        let id = item.id.clone();

        self.history.insert(0, item);
        self.history.truncate(HISTORY_LIMIT);

        self.current = Some(ActiveResult {
            history_id: id.clone(),
            result,
        });
        self.input.clear();
        self.pending_image = None;
        self.view = self.view.clone().apply(ViewEvent::Succeeded);
        id
    }

    /// Surfaces a classified failure as the error overlay. The draft is
    /// kept so the user can retry or edit.
    pub fn fail_solve(&mut self, message: String) {
        self.view = self.view.clone().apply(ViewEvent::Failed(message));
    }

    /// Silent return to the input panel after a user abort. The draft is
    /// kept; no error is shown.
    pub fn cancel_solve(&mut self) {
        self.view = self.view.clone().apply(ViewEvent::Cancelled);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Loads a past item as the current result without a network call.
    pub fn restore_from_history(&mut self, item_id: &str) -> bool {
        let Some(item) = self.history.iter().find(|i| i.id == item_id) else {
            return false;
        };
        self.current = Some(ActiveResult {
            history_id: item.id.clone(),
            result: item.result.clone(),
        });
        self.view = self.view.clone().apply(ViewEvent::SelectItem);
        true
    }

    /// Patches a deferred visual into the matching history item and, when
    /// it is the active result, into the result panel too. Matching is by
    /// the item's unique id captured at submit time.
    pub fn attach_visual(&mut self, item_id: &str, realistic: bool, image: InlineImage) -> bool {
        let mut patched = false;
        if let Some(item) = self.history.iter_mut().find(|i| i.id == item_id) {
            item.result.set_visual(realistic, image.clone());
            patched = true;
        }
        if let Some(active) = self.current.as_mut() {
            if active.history_id == item_id {
                active.result.set_visual(realistic, image);
                patched = true;
            }
        }
        patched
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ------------------------------------------------------------------
    // View navigation
    // ------------------------------------------------------------------

    pub fn confirm_credential(&mut self) {
        self.view = self.view.clone().apply(ViewEvent::CredentialConfirmed);
    }

    pub fn edit(&mut self) {
        self.view = self.view.clone().apply(ViewEvent::Edit);
    }

    pub fn open_history(&mut self) {
        self.view = self.view.clone().apply(ViewEvent::OpenHistory);
    }

    pub fn back_from_history(&mut self) {
        self.view = self.view.clone().apply(ViewEvent::Back);
    }

    /// Switches the result tab. Returns the visual style (`realistic`
    /// flag) the dashboard should lazily render: set only when the tab
    /// wants a visual and the active result has none yet.
    pub fn select_tab(&mut self, tab: ResultTab) -> Option<bool> {
        let next = self.view.clone().apply(ViewEvent::SelectTab(tab));
        if !matches!(next, ViewState::Result { .. }) {
            return None;
        }
        self.view = next;

        let realistic = tab.wants_visual()?;
        let active = self.current.as_ref()?;
        if active.result.visual_for(realistic).is_some() {
            return None;
        }
        Some(realistic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::catalog::find_module;
    use crate::view::ReturnTarget;

    fn result_with_steps(steps: &[&str]) -> SolutionResult {
        SolutionResult {
            analysis: "analysis".to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            solution: "solution".to_string(),
            recommendations: "recommendations".to_string(),
            diagram_description: "a diagram".to_string(),
            realistic_diagram_description: String::new(),
            diagram_nodes: vec![],
            visual: None,
            realistic_visual: None,
            links: vec![],
        }
    }

    fn logged_in_store() -> SessionStore {
        let mut store = SessionStore::new(true);
        store.login(UserSession::new("ada", AppMode::Student), Vec::new());
        store
    }

    #[test]
    fn test_submit_requires_content() {
        let mut store = logged_in_store();
        assert!(store.begin_solve().is_none());
        assert_eq!(store.view(), &ViewState::Input);

        store.set_input("Solve 2x+3=7");
        let request = store.begin_solve().unwrap();
        assert_eq!(request.input, "Solve 2x+3=7");
        assert!(store.view().is_processing());
    }

    #[test]
    fn test_image_only_submit_is_allowed() {
        let mut store = logged_in_store();
        store.set_pending_image(Some(InlineImage::new("image/png", "QUJD")));
        assert!(store.begin_solve().is_some());
    }

    #[test]
    fn test_complete_solve_installs_result_and_history() {
        let mut store = logged_in_store();
        store.set_input("Solve 2x+3=7");
        store.begin_solve().unwrap();

        let id = store.complete_solve(result_with_steps(&["Subtract 3", "Divide by 2"]));

        let active = store.current().unwrap();
        assert_eq!(active.history_id, id);
        assert_eq!(active.result.steps.len(), 2);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.input(), "");
        assert_eq!(
            store.view(),
            &ViewState::Result {
                tab: ResultTab::Audit,
                error: None
            }
        );
    }

    #[test]
    fn test_failure_keeps_the_draft_for_retry() {
        let mut store = logged_in_store();
        store.set_input("Solve 2x+3=7");
        store.begin_solve().unwrap();
        store.fail_solve("AI synthesis limit reached. Please try again shortly.".to_string());

        assert_eq!(
            store.view().error(),
            Some("AI synthesis limit reached. Please try again shortly.")
        );
        assert_eq!(store.input(), "Solve 2x+3=7");
        assert!(store.history().is_empty());

        // Retry re-submits the unchanged draft.
        assert!(store.begin_solve().is_some());
    }

    #[test]
    fn test_cancel_returns_to_input_silently() {
        let mut store = logged_in_store();
        store.set_input("slow question");
        store.begin_solve().unwrap();
        store.cancel_solve();

        assert_eq!(store.view(), &ViewState::Input);
        assert_eq!(store.view().error(), None);
        assert!(store.history().is_empty());
        assert_eq!(store.input(), "slow question");
    }

    #[test]
    fn test_history_caps_at_fifty_evicting_oldest() {
        let mut store = logged_in_store();
        for i in 0..(HISTORY_LIMIT + 1) {
            store.set_input(format!("problem {i}"));
            store.begin_solve().unwrap();
            store.complete_solve(result_with_steps(&["step"]));
        }

        assert_eq!(store.history().len(), HISTORY_LIMIT);
        // Most recent first; "problem 0" was evicted.
        assert_eq!(store.history()[0].input, format!("problem {HISTORY_LIMIT}"));
        assert!(store.history().iter().all(|i| i.input != "problem 0"));
    }

    #[test]
    fn test_restore_from_history() {
        let mut store = logged_in_store();
        store.set_input("first");
        store.begin_solve().unwrap();
        let id = store.complete_solve(result_with_steps(&["a", "b"]));

        store.edit();
        store.open_history();
        assert!(store.restore_from_history(&id));
        assert_eq!(store.current().unwrap().history_id, id);
        assert!(matches!(store.view(), ViewState::Result { .. }));

        assert!(!store.restore_from_history("missing-id"));
    }

    #[test]
    fn test_attach_visual_patches_history_and_active_result() {
        let mut store = logged_in_store();
        store.set_input("draw a cell");
        store.begin_solve().unwrap();
        let id = store.complete_solve(result_with_steps(&["step"]));

        assert!(store.attach_visual(&id, false, InlineImage::new("image/png", "QUJD")));
        assert!(store.current().unwrap().result.visual.is_some());
        assert!(store.history()[0].result.visual.is_some());

        assert!(!store.attach_visual("missing-id", false, InlineImage::new("image/png", "x")));
    }

    #[test]
    fn test_attach_visual_matches_by_id_not_input() {
        let mut store = logged_in_store();

        // Same text submitted twice for the same module.
        store.set_input("same input");
        store.begin_solve().unwrap();
        let first = store.complete_solve(result_with_steps(&["step"]));
        store.edit();
        store.set_input("same input");
        store.begin_solve().unwrap();
        let second = store.complete_solve(result_with_steps(&["step"]));
        assert_ne!(first, second);

        store.attach_visual(&first, false, InlineImage::new("image/png", "QUJD"));
        let older = store.history().iter().find(|i| i.id == first).unwrap();
        let newer = store.history().iter().find(|i| i.id == second).unwrap();
        assert!(older.result.visual.is_some());
        assert!(newer.result.visual.is_none());
    }

    #[test]
    fn test_select_tab_requests_lazy_render_once() {
        let mut store = logged_in_store();
        store.set_input("draw a cell");
        store.begin_solve().unwrap();
        let id = store.complete_solve(result_with_steps(&["step"]));

        // First activation of the diagram tab wants a schematic render.
        assert_eq!(store.select_tab(ResultTab::Diagram), Some(false));
        store.attach_visual(&id, false, InlineImage::new("image/png", "QUJD"));

        // Second activation finds the visual already present.
        assert_eq!(store.select_tab(ResultTab::Diagram), None);

        // Simulation tab wants the realistic style.
        assert_eq!(store.select_tab(ResultTab::Simulation), Some(true));

        // Text tabs never render.
        assert_eq!(store.select_tab(ResultTab::Solution), None);
    }

    #[test]
    fn test_open_history_remembers_result_tab() {
        let mut store = logged_in_store();
        store.set_input("q");
        store.begin_solve().unwrap();
        store.complete_solve(result_with_steps(&["step"]));
        store.select_tab(ResultTab::Solution);

        store.open_history();
        assert_eq!(
            store.view(),
            &ViewState::History {
                previous: ReturnTarget::Result {
                    tab: ResultTab::Solution
                }
            }
        );

        store.back_from_history();
        assert_eq!(
            store.view(),
            &ViewState::Result {
                tab: ResultTab::Solution,
                error: None
            }
        );
    }

    #[test]
    fn test_login_selects_default_module_for_role() {
        let mut store = SessionStore::new(true);
        store.login(UserSession::new("bo", AppMode::Business), Vec::new());
        assert_eq!(store.selected_module().id, "brand-visualizer");
    }

    #[test]
    fn test_logout_keeps_nothing_in_memory() {
        let mut store = logged_in_store();
        store.set_input("q");
        store.begin_solve().unwrap();
        store.complete_solve(result_with_steps(&["step"]));
        store.logout();

        assert!(store.user().is_none());
        assert!(store.history().is_empty());
        assert!(store.current().is_none());
        assert_eq!(store.input(), "");
    }

    #[test]
    fn test_credential_gate_flow() {
        let mut store = SessionStore::new(false);
        assert_eq!(store.view(), &ViewState::KeySelection);
        store.confirm_credential();
        assert_eq!(store.view(), &ViewState::Input);
    }

    #[test]
    fn test_select_module() {
        let mut store = logged_in_store();
        let module = find_module("essay-architect").unwrap();
        store.select_module(module.clone());
        assert_eq!(store.selected_module().id, "essay-architect");
    }
}
