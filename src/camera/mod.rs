mod builder;
mod interface;
mod list;
pub mod sim;
#[cfg(test)]
mod tests;

pub use builder::CameraSystemBuilder;
pub use interface::{CameraDevice, CameraSystem};
pub use list::CameraList;
