//! # Relic Arm Control
//!
//! 通用的关节控制组件，不包含任何具体机构的知识：
//!
//! - [`pid`] - PID 位置控制器，通过 [`PidInput`] 回调读取反馈
//! - [`rotational_actuator`] - 电机 + PID 组成的旋转关节，通过 [`PowerCompensation`] 回调叠加补偿
//! - [`enhanced_servo`] - 带限位保护和连续模式的伺服
//! - [`units`] - 角度单位
//!
//! 具体机构（例如机械臂）实现 [`PidInput`] 和 [`PowerCompensation`]，
//! 把通用控制器变成关节专用的控制器。
//!
//! # 调度模型
//!
//! 所有组件都在外部控制循环中同步调用（`tick()`），本 crate 不创建线程，也不阻塞。

pub mod enhanced_servo;
pub mod error;
pub mod pid;
pub mod rotational_actuator;
pub mod units;

// 重新导出常用类型
pub use enhanced_servo::EnhancedServo;
pub use error::ControlError;
pub use pid::{PidCoefficients, PidController, PidInput};
pub use rotational_actuator::{
    ActuatorMode, PositionRange, PositionScale, PowerCompensation, RotationalActuator,
};
pub use units::{Deg, Rad};
