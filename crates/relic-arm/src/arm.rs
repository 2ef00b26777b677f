//! Relic Arm 组合体
//!
//! 机械臂由三个子系统组成：
//!
//! - **伸缩臂**（extender）：反向伺服 + 上/下限位，开环
//! - **肘关节**（elbow）：直流电机 + PID 闭环 + 重力补偿
//! - **夹爪**（grabber）：伺服，只有开/合两个位置
//!
//! [`RelicArm`] 独占所有传感器、驱动和控制器，并为通用控制器提供两项能力：
//!
//! - [`PidInput`]：肘关节 PID 的反馈值（当前角度）
//! - [`PowerCompensation`]：肘关节的重力补偿功率
//!
//! 控制器和执行器只持有 `Weak<RelicArm>`，因此 `RelicArm` 总是以 `Arc` 形式存在。

use crate::config::ArmConfig;
use crate::error::ArmError;
use crate::gravity::gravity_compensation;
use relic_control::{
    Deg, EnhancedServo, PidController, PidInput, PowerCompensation, RotationalActuator,
};
use relic_hal::{DcMotor, DigitalInput, HardwareMap, LimitedMotor, Servo};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{info, warn};

/// 四个限位开关的即时读数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimitStates {
    pub extender_lower: bool,
    pub extender_upper: bool,
    pub elbow_lower: bool,
    pub elbow_upper: bool,
}

/// 机械臂
pub struct RelicArm {
    extender_lower_limit: Arc<dyn DigitalInput>,
    extender_upper_limit: Arc<dyn DigitalInput>,
    extender: EnhancedServo,
    elbow_lower_limit: Arc<dyn DigitalInput>,
    elbow_upper_limit: Arc<dyn DigitalInput>,
    elbow: RotationalActuator,
    grabber: Arc<dyn Servo>,
    grabber_open: f64,
    grabber_close: f64,
    level_hold_power: f64,
    calibration_power: f64,
}

impl RelicArm {
    /// 构造机械臂
    ///
    /// 分两个阶段：
    ///
    /// **解析**：按名称查找全部七个设备。任何设备缺失或类别不符都以
    /// [`ArmError::Hardware`] 返回，不做恢复；标定参数无效以 [`ArmError::Calibration`] 返回。
    /// 此阶段不向任何设备下发指令。
    ///
    /// **组装**：顺序固定，后一步依赖前一步的结果：
    ///
    /// 1. 伸缩臂限位开关 → 伸缩臂伺服（反向）→ 伸缩臂组合
    /// 2. 肘关节限位开关 → 肘关节电机（限位门控）→ PID 控制器（反馈源为本对象）
    ///    → 旋转执行器（补偿源为本对象）
    /// 3. 肘关节位置比例/偏移和允许范围
    /// 4. 夹爪伺服，并置于闭合位置
    pub fn new(hardware: &dyn HardwareMap, config: &ArmConfig) -> Result<Arc<Self>, ArmError> {
        let names = &config.devices;
        let elbow_config = &config.elbow;

        // 解析
        let extender_lower_limit = hardware.digital_input(&names.extender_lower_limit)?;
        let extender_upper_limit = hardware.digital_input(&names.extender_upper_limit)?;
        let extender_servo = hardware.servo(&names.extender_servo)?;
        let elbow_lower_limit = hardware.digital_input(&names.elbow_lower_limit)?;
        let elbow_upper_limit = hardware.digital_input(&names.elbow_upper_limit)?;
        let elbow_motor = hardware.dc_motor(&names.elbow_motor)?;
        let grabber = hardware.servo(&names.grabber_servo)?;

        let position_scale = elbow_config.position_scale()?;
        let position_range = elbow_config.position_range()?;
        if !elbow_config.within_level_band() {
            warn!(
                min_pos = elbow_config.min_pos,
                max_pos = elbow_config.max_pos,
                "elbow range exceeds ±90° of level, gravity compensation inverts past vertical"
            );
        }

        // 组装
        let arm = Arc::new_cyclic(|arm: &Weak<RelicArm>| {
            // 1. 伸缩臂
            extender_servo.set_inverted(config.extender.inverted);
            let extender = EnhancedServo::new(
                "extender",
                extender_servo,
                Some(extender_lower_limit.clone()),
                Some(extender_upper_limit.clone()),
            )
            .with_step_rate(config.extender.step_rate);

            // 2. 肘关节
            let elbow_motor: Arc<dyn DcMotor> = Arc::new(LimitedMotor::new(
                elbow_motor,
                Some(elbow_lower_limit.clone()),
                Some(elbow_upper_limit.clone()),
            ));

            let input: Weak<dyn PidInput> = arm.clone();
            let elbow_pid = PidController::new(
                "elbowPidCtrl",
                elbow_config.pid_coefficients(),
                elbow_config.tolerance,
                input,
            );

            let compensation: Weak<dyn PowerCompensation> = arm.clone();
            let mut elbow = RotationalActuator::new(
                "elbow",
                elbow_motor,
                elbow_lower_limit.clone(),
                elbow_pid,
                compensation,
            );

            // 3. 位置变换和范围
            elbow.set_position_scale(position_scale);
            elbow.set_position_range(position_range);

            // 4. 夹爪
            RelicArm {
                extender_lower_limit,
                extender_upper_limit,
                extender,
                elbow_lower_limit,
                elbow_upper_limit,
                elbow,
                grabber,
                grabber_open: config.grabber.open,
                grabber_close: config.grabber.close,
                level_hold_power: elbow_config.level_motor_power,
                calibration_power: elbow_config.calibration_power,
            }
        });

        arm.close_grabber();

        info!(
            elbow_range = ?(position_range.min(), position_range.max()),
            level_hold_power = arm.level_hold_power,
            "relic arm initialized"
        );

        Ok(arm)
    }

    pub fn extender(&self) -> &EnhancedServo {
        &self.extender
    }

    pub fn elbow(&self) -> &RotationalActuator {
        &self.elbow
    }

    pub fn grabber(&self) -> &dyn Servo {
        self.grabber.as_ref()
    }

    /// 水平保持功率
    pub fn level_hold_power(&self) -> f64 {
        self.level_hold_power
    }

    /// 肘关节当前角度
    pub fn elbow_angle(&self) -> Deg {
        Deg(self.elbow.position())
    }

    pub fn open_grabber(&self) {
        self.grabber.set_position(self.grabber_open);
    }

    pub fn close_grabber(&self) {
        self.grabber.set_position(self.grabber_close);
    }

    /// 肘关节向下限位归零
    pub fn calibrate_elbow(&self) {
        self.elbow.zero_calibrate(self.calibration_power);
    }

    /// 读取四个限位开关的当前状态（不缓存）
    pub fn limit_states(&self) -> LimitStates {
        LimitStates {
            extender_lower: self.extender_lower_limit.is_active(),
            extender_upper: self.extender_upper_limit.is_active(),
            elbow_lower: self.elbow_lower_limit.is_active(),
            elbow_upper: self.elbow_upper_limit.is_active(),
        }
    }

    /// 执行一个控制周期：肘关节闭环和伸缩臂连续模式各自推进一步
    ///
    /// 返回肘关节电机实际接受的功率（经过限位门控）。
    pub fn tick(&self, dt: Duration) -> f64 {
        let elbow_power = self.elbow.tick(dt);
        self.extender.tick(dt);
        elbow_power
    }
}

impl PidInput for RelicArm {
    /// 肘关节 PID 询问时返回当前角度，其它控制器返回 `0.0`
    fn get_input(&self, pid_ctrl: &PidController) -> f64 {
        if std::ptr::eq(pid_ctrl, self.elbow.pid_controller()) {
            self.elbow.position()
        } else {
            0.0
        }
    }
}

impl PowerCompensation for RelicArm {
    /// 抵消重力所需的功率，叠加在肘关节电机功率上
    fn get_compensation(&self) -> f64 {
        gravity_compensation(self.elbow_angle(), self.level_hold_power)
    }
}
