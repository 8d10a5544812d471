pub mod device;

pub use device::{
    device_number, is_non_rotational, resolve_backing_device, should_lock_directory, DiskInspector,
    Introspection, SysfsInspector,
};
