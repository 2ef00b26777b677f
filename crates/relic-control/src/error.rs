//! 控制层错误类型定义

use thiserror::Error;

/// 控制层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// 位置范围无效（下界大于上界或包含非有限值）
    #[error("Invalid position range: [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    /// 位置比例无效（比例为零或包含非有限值）
    #[error("Invalid position scale: scale={scale}, offset={offset}")]
    InvalidScale { scale: f64, offset: f64 },
}
