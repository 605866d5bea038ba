use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Stand-in for the external wiring of a hardware trigger line.
///
/// A background thread pulses every connected camera at a fixed period.
/// Each camera input buffers at most one pulse; pulses arriving while one
/// is still pending are dropped, like a sensor that is already exposing.
pub struct LinePulseGenerator {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl LinePulseGenerator {
    /// Create one line input per camera and start pulsing them
    pub fn start(interval: Duration, inputs: usize) -> (Self, Vec<Receiver<u64>>) {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let (senders, receivers): (Vec<Sender<u64>>, Vec<Receiver<u64>>) =
            (0..inputs).map(|_| bounded(1)).unzip();

        let handle = thread::Builder::new()
            .name("trigger-line".to_string())
            .spawn(move || run_pulses(interval, stop_rx, senders));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to start simulated trigger line: {}", e);
                None
            }
        };

        (
            Self {
                stop_tx: Some(stop_tx),
                handle,
            },
            receivers,
        )
    }
}

fn run_pulses(interval: Duration, stop_rx: Receiver<()>, outputs: Vec<Sender<u64>>) {
    debug!("Simulated trigger line pulsing every {:?}", interval);
    let mut sequence = 0u64;

    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        sequence += 1;
        for output in &outputs {
            match output.try_send(sequence) {
                Ok(()) => trace!("Line pulse {}", sequence),
                Err(TrySendError::Full(_)) => trace!("Line pulse {} dropped", sequence),
                Err(TrySendError::Disconnected(_)) => {}
            }
        }
    }

    debug!("Simulated trigger line stopped");
}

impl Drop for LinePulseGenerator {
    fn drop(&mut self) {
        // Disconnecting the stop channel wakes the thread immediately
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Simulated trigger line thread panicked");
            }
        }
    }
}
