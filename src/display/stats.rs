use serde::Serialize;
use std::collections::BTreeSet;
use std::time::SystemTime;

/// Per-renderer presentation statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayStats {
    pub frames_rendered: u64,
    pub render_errors: u64,
    /// Labels of every view drawn at least once
    pub views: BTreeSet<String>,
    #[serde(skip)]
    pub last_frame_time: Option<SystemTime>,
}

impl DisplayStats {
    pub fn record_frame_render(&mut self, label: &str) {
        self.frames_rendered += 1;
        self.last_frame_time = Some(SystemTime::now());
        if !self.views.contains(label) {
            self.views.insert(label.to_string());
        }
    }

    pub fn record_render_error(&mut self) {
        self.render_errors += 1;
        self.last_frame_time = Some(SystemTime::now());
    }

    pub fn render_success_rate(&self) -> f64 {
        let attempts = self.frames_rendered + self.render_errors;
        if attempts == 0 {
            0.0
        } else {
            self.frames_rendered as f64 / attempts as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
