//! View controller state machine.
//!
//! One tagged union drives which panel is rendered. All transition rules
//! live in [`ViewState::apply`], so impossible combinations (a processing
//! panel with a stale error, an error overlay outside the result panel)
//! cannot be represented. Illegal events leave the state unchanged.

use serde::{Deserialize, Serialize};

/// The active tab inside the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTab {
    Audit,
    Solution,
    Diagram,
    Simulation,
}

impl Default for ResultTab {
    fn default() -> Self {
        ResultTab::Audit
    }
}

impl ResultTab {
    /// Tabs that lazily trigger an image render on first activation.
    pub fn wants_visual(self) -> Option<bool> {
        match self {
            ResultTab::Diagram => Some(false),
            ResultTab::Simulation => Some(true),
            ResultTab::Audit | ResultTab::Solution => None,
        }
    }
}

/// Where the history panel returns to on Back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnTarget {
    Input,
    Result { tab: ResultTab },
}

/// The panel currently rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewState {
    /// Initial gate shown once at startup when no API credential exists.
    KeySelection,
    /// The problem input panel.
    Input,
    /// A solve is in flight.
    Processing,
    /// The structured result panel; `error` renders as a full-panel overlay.
    Result {
        tab: ResultTab,
        error: Option<String>,
    },
    /// The history list, remembering where Back returns to.
    History { previous: ReturnTarget },
}

impl ViewState {
    /// The state a fresh dashboard starts in.
    pub fn initial(has_credential: bool) -> Self {
        if has_credential {
            ViewState::Input
        } else {
            ViewState::KeySelection
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, ViewState::Processing)
    }

    /// The error overlay message, when one is showing.
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Result { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    fn result() -> Self {
        ViewState::Result {
            tab: ResultTab::default(),
            error: None,
        }
    }

    /// Applies one event, returning the next state.
    ///
    /// Events that are not legal in the current state return the state
    /// unchanged.
    pub fn apply(self, event: ViewEvent) -> ViewState {
        match (self, event) {
            (ViewState::KeySelection, ViewEvent::CredentialConfirmed) => ViewState::Input,

            (ViewState::Input, ViewEvent::Submit) => ViewState::Processing,

            // Submitting while a solve is in flight is legal: the dashboard
            // cancels the prior call first (last-submit-wins).
            (ViewState::Processing, ViewEvent::Submit) => ViewState::Processing,

            (ViewState::Processing, ViewEvent::Succeeded) => Self::result(),
            (ViewState::Processing, ViewEvent::Cancelled) => ViewState::Input,
            (ViewState::Processing, ViewEvent::Failed(message)) => ViewState::Result {
                tab: ResultTab::default(),
                error: Some(message),
            },

            (ViewState::Result { .. }, ViewEvent::Edit) => ViewState::Input,
            // Retry re-enters processing with the unchanged draft.
            (ViewState::Result { .. }, ViewEvent::Submit) => ViewState::Processing,
            (ViewState::Result { .. }, ViewEvent::SelectTab(tab)) => ViewState::Result {
                tab,
                error: None,
            },

            (ViewState::Input, ViewEvent::OpenHistory) => ViewState::History {
                previous: ReturnTarget::Input,
            },
            (ViewState::Result { tab, .. }, ViewEvent::OpenHistory) => ViewState::History {
                previous: ReturnTarget::Result { tab },
            },

            (ViewState::History { .. }, ViewEvent::SelectItem) => Self::result(),
            (ViewState::History { previous }, ViewEvent::Back) => match previous {
                ReturnTarget::Input => ViewState::Input,
                ReturnTarget::Result { tab } => ViewState::Result { tab, error: None },
            },

            // Everything else is illegal in the current state.
            (state, _) => state,
        }
    }
}

/// Events the dashboard feeds into the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    CredentialConfirmed,
    /// Submit with validated content (non-empty input or image).
    Submit,
    Succeeded,
    Cancelled,
    Failed(String),
    Edit,
    OpenHistory,
    SelectItem,
    Back,
    SelectTab(ResultTab),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_gates_on_credential() {
        assert_eq!(ViewState::initial(true), ViewState::Input);
        assert_eq!(ViewState::initial(false), ViewState::KeySelection);
    }

    #[test]
    fn test_happy_path() {
        let state = ViewState::Input
            .apply(ViewEvent::Submit)
            .apply(ViewEvent::Succeeded);
        assert_eq!(
            state,
            ViewState::Result {
                tab: ResultTab::Audit,
                error: None
            }
        );
    }

    #[test]
    fn test_cancel_returns_to_input_never_to_error() {
        let state = ViewState::Input
            .apply(ViewEvent::Submit)
            .apply(ViewEvent::Cancelled);
        assert_eq!(state, ViewState::Input);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_failure_shows_overlay_on_result_panel() {
        let state = ViewState::Processing.apply(ViewEvent::Failed("limit reached".into()));
        assert_eq!(state.error(), Some("limit reached"));
    }

    #[test]
    fn test_retry_from_error_overlay_reenters_processing() {
        let state = ViewState::Processing
            .apply(ViewEvent::Failed("limit reached".into()))
            .apply(ViewEvent::Submit);
        assert_eq!(state, ViewState::Processing);
    }

    #[test]
    fn test_selecting_a_tab_clears_the_overlay() {
        let state = ViewState::Processing
            .apply(ViewEvent::Failed("boom".into()))
            .apply(ViewEvent::SelectTab(ResultTab::Diagram));
        assert_eq!(
            state,
            ViewState::Result {
                tab: ResultTab::Diagram,
                error: None
            }
        );
    }

    #[test]
    fn test_history_round_trip_from_result_restores_tab() {
        let result = ViewState::Result {
            tab: ResultTab::Solution,
            error: None,
        };
        let state = result.apply(ViewEvent::OpenHistory).apply(ViewEvent::Back);
        assert_eq!(
            state,
            ViewState::Result {
                tab: ResultTab::Solution,
                error: None
            }
        );
    }

    #[test]
    fn test_history_back_from_input_returns_to_input() {
        let state = ViewState::Input
            .apply(ViewEvent::OpenHistory)
            .apply(ViewEvent::Back);
        assert_eq!(state, ViewState::Input);
    }

    #[test]
    fn test_history_select_item_lands_on_result() {
        let state = ViewState::Input
            .apply(ViewEvent::OpenHistory)
            .apply(ViewEvent::SelectItem);
        assert_eq!(
            state,
            ViewState::Result {
                tab: ResultTab::Audit,
                error: None
            }
        );
    }

    #[test]
    fn test_key_selection_only_accepts_confirmation() {
        assert_eq!(
            ViewState::KeySelection.apply(ViewEvent::Submit),
            ViewState::KeySelection
        );
        assert_eq!(
            ViewState::KeySelection.apply(ViewEvent::CredentialConfirmed),
            ViewState::Input
        );
    }

    #[test]
    fn test_resubmit_while_processing_stays_processing() {
        assert_eq!(
            ViewState::Processing.apply(ViewEvent::Submit),
            ViewState::Processing
        );
    }

    #[test]
    fn test_illegal_events_leave_state_unchanged() {
        assert_eq!(
            ViewState::Input.apply(ViewEvent::Succeeded),
            ViewState::Input
        );
        assert_eq!(
            ViewState::Processing.apply(ViewEvent::Edit),
            ViewState::Processing
        );
        assert_eq!(
            ViewState::Processing.apply(ViewEvent::OpenHistory),
            ViewState::Processing
        );
    }

    #[test]
    fn test_wants_visual_per_tab() {
        assert_eq!(ResultTab::Diagram.wants_visual(), Some(false));
        assert_eq!(ResultTab::Simulation.wants_visual(), Some(true));
        assert_eq!(ResultTab::Audit.wants_visual(), None);
        assert_eq!(ResultTab::Solution.wants_visual(), None);
    }
}
