//! 限位门控电机
//!
//! 包装一个 [`DcMotor`]，在对应方向的限位开关触发时拒绝继续驱动。

use crate::{DcMotor, DigitalInput};
use std::sync::Arc;
use tracing::debug;

/// 受限位开关保护的电机
///
/// - 上限位触发时，正向功率被置零
/// - 下限位触发时，负向功率被置零
///
/// 限位状态在每次 `set_power()` 时同步读取，不做缓存。
pub struct LimitedMotor {
    motor: Arc<dyn DcMotor>,
    lower_limit: Option<Arc<dyn DigitalInput>>,
    upper_limit: Option<Arc<dyn DigitalInput>>,
}

impl LimitedMotor {
    pub fn new(
        motor: Arc<dyn DcMotor>,
        lower_limit: Option<Arc<dyn DigitalInput>>,
        upper_limit: Option<Arc<dyn DigitalInput>>,
    ) -> Self {
        Self {
            motor,
            lower_limit,
            upper_limit,
        }
    }

    pub fn is_lower_limit_active(&self) -> bool {
        self.lower_limit.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn is_upper_limit_active(&self) -> bool {
        self.upper_limit.as_ref().is_some_and(|s| s.is_active())
    }

    fn gate(&self, power: f64) -> f64 {
        if power > 0.0 && self.is_upper_limit_active() {
            debug!(motor = self.motor.name(), power, "upper limit active, blocking power");
            0.0
        } else if power < 0.0 && self.is_lower_limit_active() {
            debug!(motor = self.motor.name(), power, "lower limit active, blocking power");
            0.0
        } else {
            power
        }
    }
}

impl DcMotor for LimitedMotor {
    fn name(&self) -> &str {
        self.motor.name()
    }

    fn set_power(&self, power: f64) {
        self.motor.set_power(self.gate(power.clamp(-1.0, 1.0)));
    }

    fn power(&self) -> f64 {
        self.motor.power()
    }

    fn position(&self) -> f64 {
        self.motor.position()
    }

    fn reset_position(&self) {
        self.motor.reset_position();
    }
}
