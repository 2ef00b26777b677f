//! # Relic Arm Hardware Layer
//!
//! 硬件抽象层，提供机械臂用到的三类设备能力接口：
//!
//! - [`DigitalInput`] - 限位开关等二值传感器
//! - [`Servo`] - 位置伺服（伸缩臂、夹爪）
//! - [`DcMotor`] - 带编码器的直流电机（肘关节）
//!
//! 设备通过 [`HardwareMap`] 按名称解析。所有设备句柄以 `Arc<dyn Trait>` 形式共享，
//! 因为同一个限位开关会同时被电机驱动和关节执行器读取。

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub mod limited;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use limited::LimitedMotor;

/// 设备类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    DigitalInput,
    Servo,
    DcMotor,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::DigitalInput => write!(f, "digital input"),
            DeviceKind::Servo => write!(f, "servo"),
            DeviceKind::DcMotor => write!(f, "DC motor"),
        }
    }
}

/// 硬件层统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HalError {
    /// 硬件配置中不存在该名称的设备
    #[error("No {kind} named \"{name}\" in the hardware map")]
    DeviceNotFound { kind: DeviceKind, name: String },

    /// 名称存在，但绑定的是另一类设备
    #[error("Device \"{name}\" is a {actual}, expected a {expected}")]
    KindMismatch {
        name: String,
        expected: DeviceKind,
        actual: DeviceKind,
    },
}

impl HalError {
    /// 设备名称
    pub fn device_name(&self) -> &str {
        match self {
            HalError::DeviceNotFound { name, .. } | HalError::KindMismatch { name, .. } => name,
        }
    }
}

/// 二值传感器（限位开关）
///
/// 每次调用 [`is_active`](Self::is_active) 都同步读取硬件，不做缓存。
pub trait DigitalInput: Send + Sync {
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;
}

/// 位置伺服
///
/// 位置为逻辑值，范围 `[0, 1]`。反向时物理位置为 `1 - p`。
pub trait Servo: Send + Sync {
    fn name(&self) -> &str;
    fn set_inverted(&self, inverted: bool);
    fn is_inverted(&self) -> bool;
    /// 设置逻辑位置，超出 `[0, 1]` 的值会被钳位
    fn set_position(&self, position: f64);
    fn position(&self) -> f64;
}

/// 带编码器的直流电机
pub trait DcMotor: Send + Sync {
    fn name(&self) -> &str;
    /// 设置输出功率，超出 `[-1, 1]` 的值会被钳位
    fn set_power(&self, power: f64);
    fn power(&self) -> f64;
    /// 编码器原始计数
    fn position(&self) -> f64;
    fn reset_position(&self);
}

/// 按名称解析硬件设备
///
/// 解析失败属于配置错误：缺少设备的机器人无法安全运行，调用方应直接向上传播。
pub trait HardwareMap {
    fn digital_input(&self, name: &str) -> Result<Arc<dyn DigitalInput>, HalError>;
    fn servo(&self, name: &str) -> Result<Arc<dyn Servo>, HalError>;
    fn dc_motor(&self, name: &str) -> Result<Arc<dyn DcMotor>, HalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_error_display() {
        let err = HalError::DeviceNotFound {
            kind: DeviceKind::Servo,
            name: "relicGrabber".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No servo named \"relicGrabber\" in the hardware map"
        );
        assert_eq!(err.device_name(), "relicGrabber");

        let err = HalError::KindMismatch {
            name: "elbowLowerLimit".to_string(),
            expected: DeviceKind::DcMotor,
            actual: DeviceKind::DigitalInput,
        };
        assert_eq!(
            err.to_string(),
            "Device \"elbowLowerLimit\" is a digital input, expected a DC motor"
        );
    }
}
