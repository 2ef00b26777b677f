//! # 机械臂配置
//!
//! 硬件设备名称和各关节的标定常量。所有字段都有默认值，
//! TOML 文件只需要写出与默认值不同的部分：
//!
//! ```toml
//! [elbow]
//! kp = 0.025
//! level_motor_power = 0.18
//!
//! [grabber]
//! close = 0.1
//! ```

use crate::error::ArmError;
use relic_control::{ControlError, PidCoefficients, PositionRange, PositionScale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ==================== 默认标定常量 ====================

pub const ELBOW_KP: f64 = 0.02;
pub const ELBOW_KI: f64 = 0.0;
pub const ELBOW_KD: f64 = 0.0;
/// 到位容差（度）
pub const ELBOW_TOLERANCE: f64 = 2.0;
/// 2240 counts/rev 编码器
pub const ELBOW_DEGREES_PER_COUNT: f64 = 360.0 / 2240.0;
/// 编码器在下限位处归零，此时关节角度（度）
pub const ELBOW_POS_OFFSET: f64 = -60.0;
pub const ELBOW_MIN_POS: f64 = -60.0;
pub const ELBOW_MAX_POS: f64 = 85.0;
/// 关节水平（0°）时抵消重力所需的电机功率
pub const ELBOW_LEVEL_MOTOR_POWER: f64 = 0.2;
pub const ELBOW_CALIBRATION_POWER: f64 = 0.3;

pub const GRABBER_OPEN: f64 = 0.8;
pub const GRABBER_CLOSE: f64 = 0.15;

pub const EXTENDER_INVERTED: bool = true;
/// 伸缩臂连续模式速率（位置单位/秒）
pub const EXTENDER_STEP_RATE: f64 = 0.5;

/// 机械臂配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// 硬件设备名称
    pub devices: DeviceNames,

    /// 伸缩臂
    pub extender: ExtenderConfig,

    /// 肘关节
    pub elbow: ElbowConfig,

    /// 夹爪
    pub grabber: GrabberConfig,
}

impl ArmConfig {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, ArmError> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArmError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArmError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ArmError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ArmError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| ArmError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 硬件设备名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceNames {
    pub extender_lower_limit: String,
    pub extender_upper_limit: String,
    pub extender_servo: String,
    pub elbow_lower_limit: String,
    pub elbow_upper_limit: String,
    pub elbow_motor: String,
    pub grabber_servo: String,
}

impl Default for DeviceNames {
    fn default() -> Self {
        Self {
            extender_lower_limit: "extenderLowerLimit".to_string(),
            extender_upper_limit: "extenderUpperLimit".to_string(),
            extender_servo: "extenderServo".to_string(),
            elbow_lower_limit: "elbowLowerLimit".to_string(),
            elbow_upper_limit: "elbowUpperLimit".to_string(),
            elbow_motor: "relicArmElbow".to_string(),
            grabber_servo: "relicGrabber".to_string(),
        }
    }
}

/// 伸缩臂配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtenderConfig {
    /// 伺服输出反向
    pub inverted: bool,

    /// 连续模式速率（位置单位/秒）
    pub step_rate: f64,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self {
            inverted: EXTENDER_INVERTED,
            step_rate: EXTENDER_STEP_RATE,
        }
    }
}

/// 肘关节配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbowConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// 到位容差（度）
    pub tolerance: f64,

    /// 每个编码器计数对应的角度（度）
    pub degrees_per_count: f64,

    /// 编码器零点对应的角度（度）
    pub pos_offset: f64,

    /// 允许的最小角度（度）
    pub min_pos: f64,

    /// 允许的最大角度（度）
    pub max_pos: f64,

    /// 水平保持功率
    pub level_motor_power: f64,

    /// 归零时的驱动功率幅值
    pub calibration_power: f64,
}

impl ElbowConfig {
    pub fn pid_coefficients(&self) -> PidCoefficients {
        PidCoefficients::new(self.kp, self.ki, self.kd)
    }

    pub fn position_scale(&self) -> Result<PositionScale, ControlError> {
        PositionScale::new(self.degrees_per_count, self.pos_offset)
    }

    pub fn position_range(&self) -> Result<PositionRange, ControlError> {
        PositionRange::new(self.min_pos, self.max_pos)
    }

    /// 范围是否落在水平 ±90° 以内
    ///
    /// 重力补偿的余弦模型只在这个区间内方向正确。
    pub fn within_level_band(&self) -> bool {
        self.min_pos >= -90.0 && self.max_pos <= 90.0
    }
}

impl Default for ElbowConfig {
    fn default() -> Self {
        Self {
            kp: ELBOW_KP,
            ki: ELBOW_KI,
            kd: ELBOW_KD,
            tolerance: ELBOW_TOLERANCE,
            degrees_per_count: ELBOW_DEGREES_PER_COUNT,
            pos_offset: ELBOW_POS_OFFSET,
            min_pos: ELBOW_MIN_POS,
            max_pos: ELBOW_MAX_POS,
            level_motor_power: ELBOW_LEVEL_MOTOR_POWER,
            calibration_power: ELBOW_CALIBRATION_POWER,
        }
    }
}

/// 夹爪配置（伺服位置）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabberConfig {
    pub open: f64,
    pub close: f64,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            open: GRABBER_OPEN,
            close: GRABBER_CLOSE,
        }
    }
}
