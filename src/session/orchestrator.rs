use super::devices;
use super::{SessionOutcome, SessionState};
use crate::acquisition::AcquisitionLoop;
use crate::camera::CameraList;
use crate::config::{AcquisitionConfig, DisplayConfig, TrigcamConfig, TriggerConfig};
use crate::display::FrameRenderer;
use crate::error::{Result, TrigcamError};
use crate::input::OperatorInput;
use crate::trigger::{self, TriggerSource};
use tracing::{error, info, info_span};
use uuid::Uuid;

/// Drives one acquisition session from device initialization to teardown.
///
/// Stages run strictly in order: initialize, configure the trigger, acquire,
/// reset the trigger, deinitialize. A failed stage marks the session failed
/// and skips what depends on it, but every initialized camera is always
/// deinitialized before `run` returns.
pub struct SessionOrchestrator {
    pub(super) id: Uuid,
    trigger: TriggerConfig,
    acquisition: AcquisitionConfig,
    display: DisplayConfig,
    pub(super) state: SessionState,
    pub(super) history: Vec<SessionState>,
}

impl SessionOrchestrator {
    pub fn new(config: &TrigcamConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            trigger: config.trigger.clone(),
            acquisition: config.acquisition.clone(),
            display: config.display.clone(),
            state: SessionState::Uninitialized,
            history: vec![SessionState::Uninitialized],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn trigger_source(&self) -> TriggerSource {
        self.trigger.source
    }

    /// Run the whole session over `cameras`.
    ///
    /// Returns `TrigcamError::NoCameras` without touching anything when the
    /// list is empty. Every other failure is reported through the outcome.
    pub fn run(
        &mut self,
        cameras: &mut CameraList,
        operator: &mut dyn OperatorInput,
        renderer: &mut dyn FrameRenderer,
    ) -> Result<SessionOutcome> {
        let span = info_span!("session", id = %self.id, trigger = %self.trigger.source);
        let _guard = span.enter();

        if cameras.is_empty() {
            error!("Not enough cameras!");
            self.set_state(SessionState::Failed);
            return Err(TrigcamError::NoCameras);
        }

        info!("Starting session with {} camera(s)", cameras.len());
        let mut outcome =
            SessionOutcome::new(self.id.to_string(), self.trigger.source, cameras.serials());

        if let Err(e) = devices::initialize_all(cameras) {
            outcome.record_failure(&e);
            self.set_state(SessionState::Failed);
            return Ok(self.finish(outcome, renderer));
        }
        self.set_state(SessionState::Initialized);

        match self.configure(cameras) {
            Ok(()) => {
                self.set_state(SessionState::TriggerConfigured);
                self.acquire(cameras, operator, renderer, &mut outcome);
                self.reset(cameras, &mut outcome);
            }
            Err(e) => {
                error!("Trigger configuration failed: {}", e);
                outcome.record_failure(&e);
                self.set_state(SessionState::Failed);
            }
        }

        let count = cameras.len();
        let failures = devices::deinitialize(cameras, count);
        for (index, e) in &failures {
            error!("Camera {} failed to deinitialize: {}", index, e);
            outcome.record_failure(e);
        }
        if failures.is_empty() {
            self.set_state(SessionState::Deinitialized);
        } else {
            self.set_state(SessionState::Failed);
        }

        Ok(self.finish(outcome, renderer))
    }

    /// Arm the trigger on the first camera, which stands in for all of them
    fn configure(&self, cameras: &mut CameraList) -> Result<()> {
        let primary = cameras.get_mut(0).ok_or(TrigcamError::NoCameras)?;
        trigger::configure_trigger(
            primary.node_map_mut(),
            self.trigger.source,
            &self.trigger.hardware_line,
        )
    }

    fn acquire(
        &mut self,
        cameras: &mut CameraList,
        operator: &mut dyn OperatorInput,
        renderer: &mut dyn FrameRenderer,
        outcome: &mut SessionOutcome,
    ) {
        self.set_state(SessionState::Acquiring);
        let acquisition =
            AcquisitionLoop::new(self.trigger.source, &self.acquisition, &self.display);

        match acquisition.run(cameras, operator, renderer) {
            Ok(report) => {
                if !report.success {
                    outcome.record_failure(&format!(
                        "{} camera error(s) during acquisition",
                        report.total_errors()
                    ));
                    self.set_state(SessionState::Failed);
                }
                outcome.report = Some(report);
            }
            Err(e) => {
                error!("Acquisition failed: {}", e);
                outcome.record_failure(&e);
                self.set_state(SessionState::Failed);
            }
        }
    }

    fn reset(&mut self, cameras: &mut CameraList, outcome: &mut SessionOutcome) {
        let result = cameras
            .get_mut(0)
            .ok_or(TrigcamError::NoCameras)
            .and_then(|primary| trigger::reset_trigger(primary.node_map_mut()));

        match result {
            Ok(()) => self.set_state(SessionState::TriggerReset),
            Err(e) => {
                error!("Trigger reset failed: {}", e);
                outcome.record_failure(&e);
                self.set_state(SessionState::Failed);
            }
        }
    }

    fn finish(&self, mut outcome: SessionOutcome, renderer: &dyn FrameRenderer) -> SessionOutcome {
        outcome.display = Some(renderer.stats().clone());
        outcome.states = self.history.clone();
        outcome.completed_at = chrono::Utc::now();

        if outcome.success {
            info!("Session completed successfully");
        } else {
            error!("Session failed: {}", outcome.errors.join("; "));
        }

        outcome
    }
}
