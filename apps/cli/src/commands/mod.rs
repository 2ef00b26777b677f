//! 命令定义和实现

pub mod calibrate;
pub mod config;
pub mod grabber;
pub mod hold;
pub mod status;

pub use calibrate::CalibrateCommand;
pub use config::{ConfigCommand, load_config};
pub use grabber::GrabberCommand;
pub use hold::HoldCommand;
pub use status::StatusCommand;
