use parking_lot::Mutex;
use std::sync::Arc;

/// Driver call observed by the simulated system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    Init { serial: String },
    Deinit { serial: String },
    BeginAcquisition { serial: String },
    EndAcquisition { serial: String },
    SetValue { serial: String, node: String, value: i64 },
    Execute { serial: String, node: String },
    FrameDelivered { serial: String, frame_id: u64 },
    FrameReleased { serial: String, frame_id: u64 },
    SystemReleased,
}

/// Shared, append-only record of driver calls across all simulated cameras
#[derive(Debug, Clone, Default)]
pub struct DriverJournal {
    events: Arc<Mutex<Vec<DriverEvent>>>,
}

impl DriverJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: DriverEvent) {
        self.events.lock().push(event);
    }

    pub fn events(&self) -> Vec<DriverEvent> {
        self.events.lock().clone()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&DriverEvent) -> bool,
    {
        self.events.lock().iter().filter(|event| predicate(event)).count()
    }

    /// Serials of the cameras that saw `BeginAcquisition`, in call order
    pub fn begin_order(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DriverEvent::BeginAcquisition { serial } => Some(serial.clone()),
                _ => None,
            })
            .collect()
    }

    /// Serials of the cameras that saw `EndAcquisition`, in call order
    pub fn end_order(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DriverEvent::EndAcquisition { serial } => Some(serial.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
