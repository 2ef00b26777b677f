//! 仿真机械臂
//!
//! 在 mock 硬件上构造 [`RelicArm`]，并用一个简单的物理模型推进肘关节：
//!
//! - 电机功率减去重力负载后按 `counts_per_second` 积分为行程
//! - 行程被下止点（0）和上止点夹住，到达止点时对应限位开关触发
//! - 编码器读数与行程同步变化，但零点可以有偏差（上电时未标定）

use anyhow::Result;
use relic_arm::{ArmConfig, RelicArm, gravity_compensation};
use relic_control::Deg;
use relic_hal::DcMotor;
use relic_hal::mock::{MockDigitalInput, MockHardwareMap, MockMotor};
use std::sync::Arc;
use std::time::Duration;

/// 仿真电机满功率速度（counts/s）
pub const SIM_COUNTS_PER_SECOND: f64 = 1120.0;

pub struct SimulatedArm {
    arm: Arc<RelicArm>,
    // 保持设备注册表存活
    _hardware: MockHardwareMap,
    motor: Arc<MockMotor>,
    elbow_lower: Arc<MockDigitalInput>,
    elbow_upper: Arc<MockDigitalInput>,
    extender_lower: Arc<MockDigitalInput>,
    extender_upper: Arc<MockDigitalInput>,
    degrees_per_count: f64,
    pos_offset: f64,
    level_hold_power: f64,
    /// 关节离开下止点的实际行程（counts）
    travel: f64,
    travel_max: f64,
}

impl SimulatedArm {
    /// 构造仿真机械臂
    ///
    /// - `travel`: 初始行程（counts，0 为下止点）
    /// - `encoder_drift`: 编码器读数相对实际行程的偏差
    pub fn new(config: &ArmConfig, travel: f64, encoder_drift: f64) -> Result<Self> {
        let names = &config.devices;
        let elbow = &config.elbow;

        let hardware = MockHardwareMap::new();
        let extender_lower = hardware.add_digital_input(&names.extender_lower_limit);
        let extender_upper = hardware.add_digital_input(&names.extender_upper_limit);
        hardware.add_servo(&names.extender_servo);
        let elbow_lower = hardware.add_digital_input(&names.elbow_lower_limit);
        let elbow_upper = hardware.add_digital_input(&names.elbow_upper_limit);
        let motor = hardware.add_dc_motor(&names.elbow_motor, SIM_COUNTS_PER_SECOND);
        hardware.add_servo(&names.grabber_servo);

        let travel_max = ((elbow.max_pos - elbow.pos_offset) / elbow.degrees_per_count).max(0.0);
        let travel = travel.clamp(0.0, travel_max);
        motor.set_counts(travel + encoder_drift);

        let arm = RelicArm::new(&hardware, config)?;

        let sim = Self {
            arm,
            _hardware: hardware,
            motor,
            elbow_lower,
            elbow_upper,
            extender_lower,
            extender_upper,
            degrees_per_count: elbow.degrees_per_count,
            pos_offset: elbow.pos_offset,
            level_hold_power: elbow.level_motor_power,
            travel,
            travel_max,
        };
        sim.sync_limits();
        Ok(sim)
    }

    /// 初始行程对应 `angle` 度的仿真机械臂，编码器已标定
    pub fn at_angle(config: &ArmConfig, angle: f64) -> Result<Self> {
        let travel = (angle - config.elbow.pos_offset) / config.elbow.degrees_per_count;
        Self::new(config, travel, 0.0)
    }

    pub fn arm(&self) -> &RelicArm {
        &self.arm
    }

    /// 关节实际角度（度），与编码器是否标定无关
    pub fn true_angle(&self) -> f64 {
        self.pos_offset + self.degrees_per_count * self.travel
    }

    /// 肘关节电机当前功率
    pub fn motor_power(&self) -> f64 {
        self.motor.power()
    }

    /// 执行一个控制周期，再推进物理模型
    pub fn cycle(&mut self, dt: Duration) -> f64 {
        let power = self.arm.tick(dt);
        self.step(dt);
        power
    }

    fn step(&mut self, dt: Duration) {
        let gravity = gravity_compensation(Deg(self.true_angle()), self.level_hold_power);
        let net = self.motor.power() - gravity;
        let travel = (self.travel + net * SIM_COUNTS_PER_SECOND * dt.as_secs_f64())
            .clamp(0.0, self.travel_max);

        self.motor.set_counts(self.motor.position() + travel - self.travel);
        self.travel = travel;
        self.sync_limits();
    }

    fn sync_limits(&self) {
        self.elbow_lower.set_active(self.travel <= 0.0);
        self.elbow_upper.set_active(self.travel >= self.travel_max);

        let extender = self.arm.extender().position();
        self.extender_lower.set_active(extender <= 0.0);
        self.extender_upper.set_active(extender >= 1.0);
    }
}
