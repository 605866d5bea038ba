use super::interface::CameraDevice;

/// The set of connected cameras, addressed by index.
///
/// The shape of the list never changes once built; devices are borrowed out
/// one at a time for init, configuration, acquisition and teardown.
#[derive(Default)]
pub struct CameraList {
    cameras: Vec<Box<dyn CameraDevice>>,
}

impl CameraList {
    pub fn new(cameras: Vec<Box<dyn CameraDevice>>) -> Self {
        Self { cameras }
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn CameraDevice> {
        self.cameras.get(index).map(|camera| camera.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn CameraDevice + 'static)> {
        self.cameras.get_mut(index).map(|camera| camera.as_mut())
    }

    /// Cameras in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = &dyn CameraDevice> {
        self.cameras.iter().map(|camera| camera.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn CameraDevice + 'static)> {
        self.cameras.iter_mut().map(|camera| camera.as_mut())
    }

    pub fn serials(&self) -> Vec<String> {
        self.iter().map(|camera| camera.serial().to_string()).collect()
    }

    /// Drop every device handle
    pub fn clear(&mut self) {
        self.cameras.clear();
    }
}

impl std::fmt::Debug for CameraList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraList")
            .field("serials", &self.serials())
            .finish()
    }
}
