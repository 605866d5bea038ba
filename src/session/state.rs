use super::{SessionOrchestrator, SessionState};
use tracing::{debug, warn};

impl SessionOrchestrator {
    /// Move to `state` and append it to the history
    pub(super) fn set_state(&mut self, state: SessionState) {
        if state == SessionState::Failed {
            warn!("Session {} transitioned from {:?} to Failed", self.id, self.state);
        } else {
            debug!("Session state changed: {:?} -> {:?}", self.state, state);
        }

        self.state = state;
        self.history.push(state);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state entered so far, in order, starting with `Uninitialized`
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }
}
