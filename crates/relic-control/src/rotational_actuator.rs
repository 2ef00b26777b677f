//! 旋转关节执行器
//!
//! 把一个直流电机和一个 [`PidController`] 组合成"寻位"执行器：
//!
//! - 编码器原始计数经 [`PositionScale`] 线性变换为物理位置（通常是度）
//! - 目标位置被钳位到 [`PositionRange`]
//! - 每个控制周期的输出 = PID 输出 + 功率补偿（[`PowerCompensation`]）
//!
//! 功率补偿由拥有者提供，用于抵消重力等静态负载，
//! 这样 PID 只需要修正动态误差。
//!
//! # 周期内顺序
//!
//! `tick()` 在 `Holding` 模式下先调用 `PidController::compute()`（其中会调用反馈回调），
//! 再读取补偿值，保证补偿基于同一周期的位置读数。

use crate::error::ControlError;
use crate::pid::PidController;
use parking_lot::Mutex;
use relic_hal::{DcMotor, DigitalInput};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 功率补偿能力
///
/// 返回需要叠加到电机功率上的补偿值。每次调用都重新计算，不缓存。
pub trait PowerCompensation: Send + Sync {
    fn get_compensation(&self) -> f64;
}

/// 原始计数到物理位置的线性变换：`scale * raw + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionScale {
    scale: f64,
    offset: f64,
}

impl PositionScale {
    pub const IDENTITY: Self = PositionScale {
        scale: 1.0,
        offset: 0.0,
    };

    pub fn new(scale: f64, offset: f64) -> Result<Self, ControlError> {
        if !scale.is_finite() || scale == 0.0 || !offset.is_finite() {
            return Err(ControlError::InvalidScale { scale, offset });
        }
        Ok(Self { scale, offset })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        self.scale * raw + self.offset
    }

    /// 物理位置反算为原始计数
    #[inline]
    pub fn to_raw(&self, position: f64) -> f64 {
        (position - self.offset) / self.scale
    }
}

impl Default for PositionScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 允许的位置范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRange {
    min: f64,
    max: f64,
}

impl PositionRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ControlError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ControlError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.min && position <= self.max
    }

    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.min, self.max)
    }
}

/// 执行器工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorMode {
    /// 电机停止
    Idle,
    /// 手动功率（仍叠加补偿）
    Manual,
    /// PID 闭环保持目标位置
    Holding,
    /// 向下限位归零
    Calibrating,
}

#[derive(Debug)]
struct ActuatorState {
    mode: ActuatorMode,
    manual_power: f64,
    calibration_power: f64,
}

/// 旋转关节执行器
///
/// 位置变换和范围只能在构造阶段（持有 `&mut self` 时）设置，
/// 之后执行器以共享引用使用，二者不再改变。
pub struct RotationalActuator {
    name: String,
    motor: Arc<dyn DcMotor>,
    lower_limit: Arc<dyn DigitalInput>,
    pid: PidController,
    compensation: Weak<dyn PowerCompensation>,
    scale: PositionScale,
    range: Option<PositionRange>,
    state: Mutex<ActuatorState>,
}

impl RotationalActuator {
    /// 创建执行器
    ///
    /// - `motor`: 已经过限位门控的电机
    /// - `lower_limit`: 下限位开关，用于归零
    /// - `pid`: 位置控制器（执行器独占）
    /// - `compensation`: 功率补偿源的非拥有引用
    pub fn new(
        name: impl Into<String>,
        motor: Arc<dyn DcMotor>,
        lower_limit: Arc<dyn DigitalInput>,
        pid: PidController,
        compensation: Weak<dyn PowerCompensation>,
    ) -> Self {
        Self {
            name: name.into(),
            motor,
            lower_limit,
            pid,
            compensation,
            scale: PositionScale::IDENTITY,
            range: None,
            state: Mutex::new(ActuatorState {
                mode: ActuatorMode::Idle,
                manual_power: 0.0,
                calibration_power: 0.0,
            }),
        }
    }

    pub fn set_position_scale(&mut self, scale: PositionScale) {
        self.scale = scale;
    }

    pub fn set_position_range(&mut self, range: PositionRange) {
        self.range = Some(range);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position_scale(&self) -> PositionScale {
        self.scale
    }

    pub fn position_range(&self) -> Option<PositionRange> {
        self.range
    }

    pub fn pid_controller(&self) -> &PidController {
        &self.pid
    }

    pub fn mode(&self) -> ActuatorMode {
        self.state.lock().mode
    }

    /// 编码器原始计数
    pub fn raw_position(&self) -> f64 {
        self.motor.position()
    }

    /// 物理位置，纯读取
    pub fn position(&self) -> f64 {
        self.scale.apply(self.motor.position())
    }

    pub fn is_lower_limit_active(&self) -> bool {
        self.lower_limit.is_active()
    }

    /// 当前补偿功率，补偿源不可用时为 `0.0`
    pub fn compensation(&self) -> f64 {
        self.compensation
            .upgrade()
            .map_or(0.0, |source| source.get_compensation())
    }

    /// 当前目标位置（仅 `Holding` 模式）
    pub fn target(&self) -> Option<f64> {
        (self.mode() == ActuatorMode::Holding).then(|| self.pid.target())
    }

    /// 手动功率模式，立即生效
    ///
    /// 返回电机实际接受的功率（含补偿，经过限位门控）。
    pub fn set_power(&self, power: f64) -> f64 {
        let power = power.clamp(-1.0, 1.0);
        {
            let mut state = self.state.lock();
            state.mode = ActuatorMode::Manual;
            state.manual_power = power;
        }
        self.apply_power(power)
    }

    /// 进入闭环保持模式
    ///
    /// 目标会被钳位到位置范围内，返回实际采用的目标。
    /// 非有限值（NaN、无穷）被忽略，模式和原目标保持不变，返回原目标。
    pub fn set_target(&self, target: f64) -> f64 {
        if !target.is_finite() {
            let current = self.pid.target();
            warn!(actuator = %self.name, target, current, "ignoring non-finite target");
            return current;
        }
        let target = self.range.map_or(target, |range| range.clamp(target));
        self.pid.set_target(target);
        self.state.lock().mode = ActuatorMode::Holding;
        debug!(actuator = %self.name, target, "set target");
        target
    }

    /// 以 `power` 的幅值向下限位驱动，触发后编码器清零
    pub fn zero_calibrate(&self, power: f64) {
        {
            let mut state = self.state.lock();
            state.mode = ActuatorMode::Calibrating;
            state.calibration_power = -power.abs();
        }
        self.pid.reset();
        info!(actuator = %self.name, power, "zero calibration started");
    }

    /// 停止电机并回到 `Idle`
    pub fn cancel(&self) {
        self.state.lock().mode = ActuatorMode::Idle;
        self.motor.set_power(0.0);
        self.pid.reset();
    }

    pub fn is_on_target(&self) -> bool {
        self.mode() == ActuatorMode::Holding && self.pid.is_on_target()
    }

    /// 执行一个控制周期，返回电机实际接受的功率（经过限位门控）
    pub fn tick(&self, dt: Duration) -> f64 {
        let (mode, manual_power, calibration_power) = {
            let state = self.state.lock();
            (state.mode, state.manual_power, state.calibration_power)
        };

        match mode {
            ActuatorMode::Idle => {
                self.motor.set_power(0.0);
                0.0
            },
            ActuatorMode::Manual => self.apply_power(manual_power),
            ActuatorMode::Holding => {
                let output = self.pid.compute(dt);
                self.apply_power(output)
            },
            ActuatorMode::Calibrating => {
                if self.lower_limit.is_active() {
                    self.motor.set_power(0.0);
                    self.motor.reset_position();
                    self.state.lock().mode = ActuatorMode::Idle;
                    info!(actuator = %self.name, "zero calibration complete");
                    0.0
                } else {
                    self.motor.set_power(calibration_power);
                    self.motor.power()
                }
            },
        }
    }

    /// 软限位 + 补偿 + 钳位
    ///
    /// 越过范围边界时只屏蔽指令部分，补偿照常叠加，关节不会因此下坠。
    fn apply_power(&self, power: f64) -> f64 {
        let mut power = power;
        if let Some(range) = self.range {
            let position = self.position();
            if (power > 0.0 && position >= range.max()) || (power < 0.0 && position <= range.min())
            {
                debug!(actuator = %self.name, position, power, "soft limit reached");
                power = 0.0;
            }
        }

        let total = (power + self.compensation()).clamp(-1.0, 1.0);
        self.motor.set_power(total);
        self.motor.power()
    }
}
