use super::*;
use crate::camera::sim::{DriverEvent, SimulatedSystem};
use crate::camera::{CameraList, CameraSystem};
use crate::config::TrigcamConfig;
use crate::display::HeadlessRenderer;
use crate::error::TrigcamError;
use crate::frame::PixelFormat;
use crate::input::ScriptedInput;
use crate::nodemap::{self, names};
use crate::trigger::TriggerSource;
use tempfile::TempDir;

fn create_test_config(camera_count: usize, source: TriggerSource) -> TrigcamConfig {
    let mut config = TrigcamConfig::default();
    config.trigger.source = source;
    config.display.resolution = (16, 12);
    config.simulator.camera_count = camera_count;
    config.simulator.resolution = (8, 6);
    config.simulator.sensor_format = PixelFormat::Mono8;
    config.simulator.hardware_pulse_interval_ms = 5;
    config.simulator.serial_base = 500;
    config
}

fn run_session(
    config: &TrigcamConfig,
    cameras: &mut CameraList,
    operator: &mut ScriptedInput,
) -> (SessionOrchestrator, crate::error::Result<SessionOutcome>) {
    let mut orchestrator = SessionOrchestrator::new(config);
    let mut renderer = HeadlessRenderer::new();
    let outcome = orchestrator.run(cameras, operator, &mut renderer);
    (orchestrator, outcome)
}

#[test]
fn test_zero_cameras_fails_without_initializing() {
    let config = create_test_config(0, TriggerSource::Software);
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let journal = system.journal();
    let mut cameras = system.discover();

    let (orchestrator, result) = run_session(&config, &mut cameras, &mut ScriptedInput::new());

    assert!(matches!(result, Err(TrigcamError::NoCameras)));
    assert_eq!(
        orchestrator.history(),
        &[SessionState::Uninitialized, SessionState::Failed]
    );
    assert_eq!(journal.count(|e| matches!(e, DriverEvent::Init { .. })), 0);
}

#[test]
fn test_software_session_runs_every_stage() {
    let config = create_test_config(2, TriggerSource::Software);
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let journal = system.journal();
    let mut cameras = system.discover();
    let mut operator = ScriptedInput::stop_after_cycles(3, 2);

    let (orchestrator, result) = run_session(&config, &mut cameras, &mut operator);
    let outcome = result.unwrap();

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        orchestrator.history(),
        &[
            SessionState::Uninitialized,
            SessionState::Initialized,
            SessionState::TriggerConfigured,
            SessionState::Acquiring,
            SessionState::TriggerReset,
            SessionState::Deinitialized,
        ]
    );
    assert_eq!(outcome.states, orchestrator.history());
    assert_eq!(outcome.cameras, vec!["500".to_string(), "501".to_string()]);

    let report = outcome.report.as_ref().unwrap();
    assert_eq!(report.cycles, 3);
    assert_eq!(report.total_retrieved(), 6);
    assert_eq!(report.total_released(), 6);
    assert_eq!(outcome.display.as_ref().unwrap().frames_rendered, 6);

    assert_eq!(journal.count(|e| matches!(e, DriverEvent::Init { .. })), 2);
    assert_eq!(journal.count(|e| matches!(e, DriverEvent::Deinit { .. })), 2);
    assert!(cameras.iter().all(|camera| !camera.is_initialized()));
}

#[test]
fn test_trigger_left_off_after_session() {
    let config = create_test_config(2, TriggerSource::Hardware);
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let journal = system.journal();
    let mut cameras = system.discover();
    let mut operator = ScriptedInput::stop_after_cycles(1, 2);

    let (_, result) = run_session(&config, &mut cameras, &mut operator);

    assert!(result.unwrap().success);
    assert_eq!(
        nodemap::read_enum_entry(cameras.get(0).unwrap().node_map(), names::TRIGGER_MODE)
            .unwrap(),
        "Off"
    );
    // Only the first camera is configured
    assert!(journal.events().iter().all(|event| match event {
        DriverEvent::SetValue { serial, node, .. } if node == names::TRIGGER_MODE => {
            serial == "500"
        }
        _ => true,
    }));
    assert_eq!(journal.count(|e| matches!(e, DriverEvent::Execute { .. })), 0);
}

#[test]
fn test_configuration_failure_still_deinitializes() {
    let mut config = create_test_config(2, TriggerSource::Software);
    config.simulator.unavailable_nodes = vec![names::TRIGGER_MODE.to_string()];
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let journal = system.journal();
    let mut cameras = system.discover();
    let mut operator = ScriptedInput::new();

    let (orchestrator, result) = run_session(&config, &mut cameras, &mut operator);
    let outcome = result.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.exit_code(), -1);
    assert!(outcome.report.is_none());
    assert_eq!(
        orchestrator.history(),
        &[
            SessionState::Uninitialized,
            SessionState::Initialized,
            SessionState::Failed,
            SessionState::Deinitialized,
        ]
    );
    assert_eq!(journal.count(|e| matches!(e, DriverEvent::SetValue { .. })), 0);
    assert_eq!(
        journal.count(|e| matches!(e, DriverEvent::BeginAcquisition { .. })),
        0
    );
    assert_eq!(journal.count(|e| matches!(e, DriverEvent::Deinit { .. })), 2);
    assert_eq!(operator.confirmations(), 0);
}

#[test]
fn test_acquisition_failure_still_resets_trigger() {
    let mut config = create_test_config(1, TriggerSource::Software);
    config.simulator.read_only_nodes = vec![names::ACQUISITION_MODE.to_string()];
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let mut cameras = system.discover();

    let (orchestrator, result) = run_session(&config, &mut cameras, &mut ScriptedInput::new());
    let outcome = result.unwrap();

    assert!(!outcome.success);
    assert!(orchestrator.history().contains(&SessionState::TriggerReset));
    assert_eq!(orchestrator.state(), SessionState::Deinitialized);
    assert_eq!(
        nodemap::read_enum_entry(cameras.get(0).unwrap().node_map(), names::TRIGGER_MODE)
            .unwrap(),
        "Off"
    );
}

#[test]
fn test_initialization_failure_rolls_back() {
    let config = create_test_config(2, TriggerSource::Software);
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let journal = system.journal();
    let mut cameras = system.discover();
    cameras.get_mut(1).unwrap().init().unwrap();
    journal.clear();

    let (orchestrator, result) = run_session(&config, &mut cameras, &mut ScriptedInput::new());
    let outcome = result.unwrap();

    assert!(!outcome.success);
    assert_eq!(
        orchestrator.history(),
        &[SessionState::Uninitialized, SessionState::Failed]
    );
    assert_eq!(
        journal.events(),
        vec![
            DriverEvent::Init {
                serial: "500".to_string()
            },
            DriverEvent::Deinit {
                serial: "500".to_string()
            },
        ]
    );
}

#[test]
fn test_isolated_camera_error_fails_session() {
    let config = create_test_config(2, TriggerSource::Software);
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let mut cameras = system.discover();
    let mut operator = ScriptedInput::new().with_confirmation_limit(3);

    let (_, result) = run_session(&config, &mut cameras, &mut operator);
    let outcome = result.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.report.as_ref().unwrap().total_retrieved(), 3);
    assert!(cameras.iter().all(|camera| !camera.is_initialized()));
}

#[test]
fn test_outcome_written_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir.path().join("session.json");
    let config = create_test_config(1, TriggerSource::Software);
    let mut system = SimulatedSystem::new(config.simulator.clone());
    let mut cameras = system.discover();

    let (orchestrator, result) =
        run_session(&config, &mut cameras, &mut ScriptedInput::stop_after_polls(2));
    let outcome = result.unwrap();
    outcome.write_json(&report_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["session_id"], orchestrator.id().to_string());
    assert_eq!(json["trigger_source"], "software");
    assert_eq!(json["report"]["cycles"], 2);
    assert_eq!(json["states"][0], "Uninitialized");
    assert_eq!(json["states"][5], "Deinitialized");
}
