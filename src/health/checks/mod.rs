//! Built-in startup checks

pub mod build_info;
pub mod config;
pub mod source_device;
pub mod system_info;
pub mod uinput;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use source_device::SourceDeviceCheck;
pub use system_info::SystemInfoCheck;
pub use uinput::UinputCheck;
