//! 错误类型体系
//!
//! 区分致命错误和可恢复错误：
//!
//! - **致命**: 硬件设备无法解析。缺少设备的机械臂无法安全运行，不做任何恢复。
//! - **配置**: 配置文件读取、解析或序列化失败，以及标定参数本身无效。
//!
//! 反馈回调收到未知控制器、目标超出范围等情况不是错误，由各自的组件以默认值处理。

use relic_control::ControlError;
use relic_hal::HalError;
use std::path::PathBuf;
use thiserror::Error;

/// 机械臂错误类型
#[derive(Debug, Error)]
pub enum ArmError {
    // ==================== Fatal Errors ====================
    /// 硬件设备解析失败
    #[error("Hardware configuration error: {0}")]
    Hardware(#[from] HalError),

    // ==================== Configuration Errors ====================
    /// 标定参数无效（位置比例、位置范围）
    #[error("Invalid calibration: {0}")]
    Calibration(#[from] ControlError),

    /// 配置文件读取失败
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl ArmError {
    /// 是否为致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, ArmError::Hardware(_))
    }
}
