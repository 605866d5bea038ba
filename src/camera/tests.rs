use super::sim::{DriverEvent, SimulatedSystem};
use super::*;
use crate::config::SimulatorConfig;
use crate::error::{DriverError, TrigcamError};
use crate::frame::PixelFormat;
use crate::nodemap::{self, names, Access, AccessMode};

fn create_test_simulator_config(camera_count: usize) -> SimulatorConfig {
    SimulatorConfig {
        camera_count,
        resolution: (8, 6),
        sensor_format: PixelFormat::BayerRg8,
        incomplete_every: 0,
        hardware_pulse_interval_ms: 5,
        unavailable_nodes: Vec::new(),
        read_only_nodes: Vec::new(),
        serial_base: 100,
    }
}

fn streaming_camera(system: &mut SimulatedSystem) -> CameraList {
    let mut cameras = system.discover();
    let camera = cameras.get_mut(0).unwrap();
    camera.init().unwrap();
    camera.begin_acquisition().unwrap();
    cameras
}

#[test]
fn test_camera_builder_validation() {
    let result = CameraSystemBuilder::new().build();

    match result {
        Err(TrigcamError::System { message }) => {
            assert!(message.contains("Simulator configuration must be specified"));
        }
        _ => panic!("Expected system error for missing configuration"),
    }
}

#[test]
fn test_camera_builder_count_override() {
    let mut system = CameraSystemBuilder::new()
        .config(create_test_simulator_config(2))
        .camera_count(3)
        .build()
        .unwrap();

    let cameras = system.discover();

    assert_eq!(cameras.len(), 3);
    assert_eq!(cameras.serials(), vec!["100", "101", "102"]);
}

#[test]
fn test_discover_hands_out_cameras_once() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(2));

    assert_eq!(system.discover().len(), 2);
    assert!(system.discover().is_empty());
}

#[test]
fn test_zero_camera_system() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(0));

    let cameras = system.discover();

    assert!(cameras.is_empty());
    assert!(cameras.get(0).is_none());
}

#[test]
fn test_init_and_deinit_lifecycle() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let journal = system.journal();
    let mut cameras = system.discover();
    let camera = cameras.get_mut(0).unwrap();

    assert!(!camera.is_initialized());
    assert!(matches!(
        camera.begin_acquisition(),
        Err(DriverError::NotInitialized { .. })
    ));

    camera.init().unwrap();
    assert!(matches!(
        camera.init(),
        Err(DriverError::AlreadyInitialized { .. })
    ));

    camera.deinit().unwrap();
    assert!(!camera.is_initialized());
    assert_eq!(
        journal.events(),
        vec![
            DriverEvent::Init {
                serial: "100".to_string()
            },
            DriverEvent::Deinit {
                serial: "100".to_string()
            },
        ]
    );
}

#[test]
fn test_free_running_frame_and_release() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let mut cameras = streaming_camera(&mut system);
    let camera = cameras.get_mut(0).unwrap();

    let frame = camera.next_frame().unwrap();
    assert_eq!(frame.id, 1);
    assert_eq!(frame.format, PixelFormat::BayerRg8);
    assert!(frame.validate_size());
    assert!(!frame.is_incomplete());

    camera.release_frame(frame).unwrap();
    let second = camera.next_frame().unwrap();
    assert_eq!(second.id, 2);
    camera.release_frame(second).unwrap();
}

#[test]
fn test_second_frame_before_release_is_rejected() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let mut cameras = streaming_camera(&mut system);
    let camera = cameras.get_mut(0).unwrap();

    let frame = camera.next_frame().unwrap();

    assert!(matches!(
        camera.next_frame(),
        Err(DriverError::FrameOutstanding { frame_id: 1, .. })
    ));

    camera.release_frame(frame).unwrap();
    assert!(camera.next_frame().is_ok());
}

#[test]
fn test_release_of_foreign_frame_is_rejected() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(2));
    let mut cameras = system.discover();
    for camera in cameras.iter_mut() {
        camera.init().unwrap();
        camera.begin_acquisition().unwrap();
    }

    let frame = cameras.get_mut(0).unwrap().next_frame().unwrap();
    let result = cameras.get_mut(1).unwrap().release_frame(frame);

    assert!(matches!(result, Err(DriverError::UnknownFrame { .. })));
}

#[test]
fn test_software_trigger_produces_exactly_one_frame() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let mut cameras = streaming_camera(&mut system);
    let camera = cameras.get_mut(0).unwrap();

    nodemap::set_enum_entry(camera.node_map_mut(), names::TRIGGER_SOURCE, names::SOFTWARE)
        .unwrap();
    nodemap::set_enum_entry(camera.node_map_mut(), names::TRIGGER_MODE, names::ON).unwrap();

    assert!(matches!(
        camera.next_frame(),
        Err(DriverError::NoTriggerPending { .. })
    ));

    nodemap::execute_command(camera.node_map_mut(), names::TRIGGER_SOFTWARE).unwrap();
    let frame = camera.next_frame().unwrap();
    camera.release_frame(frame).unwrap();

    assert!(matches!(
        camera.next_frame(),
        Err(DriverError::NoTriggerPending { .. })
    ));
}

#[test]
fn test_hardware_line_delivers_frames() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let mut cameras = streaming_camera(&mut system);
    let camera = cameras.get_mut(0).unwrap();

    nodemap::set_enum_entry(camera.node_map_mut(), names::TRIGGER_SOURCE, "Line0").unwrap();
    nodemap::set_enum_entry(camera.node_map_mut(), names::TRIGGER_MODE, names::ON).unwrap();

    for expected in 1..=2 {
        let frame = camera.next_frame().unwrap();
        assert_eq!(frame.id, expected);
        camera.release_frame(frame).unwrap();
    }
}

#[test]
fn test_trigger_source_locked_while_armed() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let mut cameras = system.discover();
    let camera = cameras.get_mut(0).unwrap();

    nodemap::set_enum_entry(camera.node_map_mut(), names::TRIGGER_MODE, names::ON).unwrap();

    let info = camera.node_map().node(names::TRIGGER_SOURCE).unwrap();
    assert_eq!(info.access, AccessMode::ReadOnly);
    let locked = nodemap::require_node(camera.node_map(), names::TRIGGER_SOURCE, Access::Write);
    assert!(locked.is_err());

    nodemap::set_enum_entry(camera.node_map_mut(), names::TRIGGER_MODE, names::OFF).unwrap();
    assert!(nodemap::require_node(camera.node_map(), names::TRIGGER_SOURCE, Access::Write).is_ok());
}

#[test]
fn test_configured_unavailable_and_read_only_nodes() {
    let mut config = create_test_simulator_config(1);
    config.unavailable_nodes = vec![names::TRIGGER_SOFTWARE.to_string()];
    config.read_only_nodes = vec![names::ACQUISITION_MODE.to_string()];
    let mut system = SimulatedSystem::new(config);
    let cameras = system.discover();
    let camera = cameras.get(0).unwrap();

    let trigger = camera.node_map().node(names::TRIGGER_SOFTWARE).unwrap();
    assert!(!trigger.access.is_available());

    let mode = camera.node_map().node(names::ACQUISITION_MODE).unwrap();
    assert_eq!(mode.access, AccessMode::ReadOnly);
}

#[test]
fn test_incomplete_frames_are_flagged() {
    let mut config = create_test_simulator_config(1);
    config.incomplete_every = 2;
    let mut system = SimulatedSystem::new(config);
    let mut cameras = streaming_camera(&mut system);
    let camera = cameras.get_mut(0).unwrap();

    let first = camera.next_frame().unwrap();
    assert!(!first.is_incomplete());
    camera.release_frame(first).unwrap();

    let second = camera.next_frame().unwrap();
    assert!(second.is_incomplete());
    assert!(!second.validate_size());
    camera.release_frame(second).unwrap();
}

#[test]
fn test_device_information_nodes() {
    let mut system = SimulatedSystem::new(create_test_simulator_config(1));
    let cameras = system.discover();
    let map = cameras.get(0).unwrap().node_map();

    assert_eq!(
        nodemap::read_string(map, names::DEVICE_SERIAL_NUMBER).unwrap(),
        "100"
    );
    assert!(nodemap::read_string(map, names::DEVICE_MODEL_NAME)
        .unwrap()
        .contains("BayerRG8"));
    assert_eq!(
        nodemap::read_enum_entry(map, names::PIXEL_FORMAT).unwrap(),
        "BayerRG8"
    );
}

#[test]
fn test_system_release_is_journaled() {
    let system = SimulatedSystem::new(create_test_simulator_config(1));
    let journal = system.journal();

    drop(system);

    assert_eq!(journal.events().last(), Some(&DriverEvent::SystemReleased));
}
