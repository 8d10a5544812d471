pub mod device;
pub mod errors;

pub use device::*;
pub use errors::*;
