mod device;
mod device_category;
mod device_model;
mod forecast;
mod reading;
mod unknown_device;

pub use device::*;
pub use device_category::*;
pub use device_model::*;
pub use forecast::*;
pub use reading::*;
pub use unknown_device::*;

pub(crate) fn round_to_tenth(v: f32) -> f32 {
    (v * 10f32).round() / 10f32
}
