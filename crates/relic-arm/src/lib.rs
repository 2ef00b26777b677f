//! # Relic Arm
//!
//! 竞赛机器人机械臂子系统：伸缩臂、带重力补偿的肘关节和夹爪。
//!
//! 本 crate 是协调层：硬件 I/O 由 [`relic_hal`] 的设备接口提供，
//! PID 和关节状态机由 [`relic_control`] 提供。这里负责把它们组装起来，
//! 并提供让通用控制器变成"肘关节控制器"的两个回调：
//!
//! - 位置反馈（[`PidInput`](relic_control::PidInput)）
//! - 重力补偿（[`PowerCompensation`](relic_control::PowerCompensation)）
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use relic_arm::{ArmConfig, RelicArm};
//! use std::time::Duration;
//!
//! let config = ArmConfig::load_from_file("arm.toml")?;
//! let arm = RelicArm::new(&hardware_map, &config)?;
//!
//! arm.elbow().set_target(30.0);
//! loop {
//!     arm.tick(Duration::from_millis(20));
//! }
//! ```
//!
//! # 调度模型
//!
//! 单线程协作式：所有回调都在外部控制循环的 `tick()` 中同步调用，不阻塞、不做 I/O。

mod arm;
pub mod config;
pub mod error;
mod gravity;

pub use arm::{LimitStates, RelicArm};
pub use config::ArmConfig;
pub use error::ArmError;
pub use gravity::gravity_compensation;
