//! 测试辅助函数
//!
//! 在 mock 硬件上搭建完整的机械臂，并保留每个设备的具体句柄，
//! 便于测试直接设定编码器计数和限位状态。

#![allow(dead_code)]

use relic_arm::{ArmConfig, RelicArm};
use relic_hal::mock::{MockDigitalInput, MockHardwareMap, MockMotor, MockServo};
use std::sync::Arc;
use std::time::Duration;

/// 测试用肘关节速度：满功率 100 counts/s
pub const ELBOW_COUNTS_PER_SECOND: f64 = 100.0;

/// mock 硬件上的机械臂
pub struct TestArm {
    pub arm: Arc<RelicArm>,
    pub hardware: MockHardwareMap,
    pub extender_lower: Arc<MockDigitalInput>,
    pub extender_upper: Arc<MockDigitalInput>,
    pub extender_servo: Arc<MockServo>,
    pub elbow_lower: Arc<MockDigitalInput>,
    pub elbow_upper: Arc<MockDigitalInput>,
    pub elbow_motor: Arc<MockMotor>,
    pub grabber: Arc<MockServo>,
}

/// 测试配置：1 count = 1°，零点即水平，范围 ±90°
pub fn test_config() -> ArmConfig {
    let mut config = ArmConfig::default();
    config.elbow.degrees_per_count = 1.0;
    config.elbow.pos_offset = 0.0;
    config.elbow.min_pos = -90.0;
    config.elbow.max_pos = 90.0;
    config.elbow.level_motor_power = 0.2;
    config.elbow.kp = 0.02;
    config
}

/// 按配置中的设备名称注册全部 mock 设备
pub fn mock_hardware(config: &ArmConfig) -> (MockHardwareMap, TestDevices) {
    let names = &config.devices;
    let hardware = MockHardwareMap::new();
    let devices = TestDevices {
        extender_lower: hardware.add_digital_input(&names.extender_lower_limit),
        extender_upper: hardware.add_digital_input(&names.extender_upper_limit),
        extender_servo: hardware.add_servo(&names.extender_servo),
        elbow_lower: hardware.add_digital_input(&names.elbow_lower_limit),
        elbow_upper: hardware.add_digital_input(&names.elbow_upper_limit),
        elbow_motor: hardware.add_dc_motor(&names.elbow_motor, ELBOW_COUNTS_PER_SECOND),
        grabber: hardware.add_servo(&names.grabber_servo),
    };
    (hardware, devices)
}

pub struct TestDevices {
    pub extender_lower: Arc<MockDigitalInput>,
    pub extender_upper: Arc<MockDigitalInput>,
    pub extender_servo: Arc<MockServo>,
    pub elbow_lower: Arc<MockDigitalInput>,
    pub elbow_upper: Arc<MockDigitalInput>,
    pub elbow_motor: Arc<MockMotor>,
    pub grabber: Arc<MockServo>,
}

pub fn setup_arm() -> TestArm {
    setup_arm_with_config(&test_config())
}

pub fn setup_arm_with_config(config: &ArmConfig) -> TestArm {
    let (hardware, devices) = mock_hardware(config);
    let arm = RelicArm::new(&hardware, config).expect("all devices registered");
    TestArm {
        arm,
        hardware,
        extender_lower: devices.extender_lower,
        extender_upper: devices.extender_upper,
        extender_servo: devices.extender_servo,
        elbow_lower: devices.elbow_lower,
        elbow_upper: devices.elbow_upper,
        elbow_motor: devices.elbow_motor,
        grabber: devices.grabber,
    }
}

impl TestArm {
    /// 设定肘关节角度（测试配置下 1 count = 1°）
    pub fn set_elbow_counts(&self, counts: f64) {
        self.elbow_motor.set_counts(counts);
    }

    /// 推进肘关节物理模型一步：电机功率减去重力负载
    ///
    /// 重力负载按水平保持功率和余弦建模，与补偿完全匹配时关节静止。
    pub fn step_plant(&self, dt: Duration) {
        use relic_hal::DcMotor;

        let gravity = relic_arm::gravity_compensation(
            self.arm.elbow_angle(),
            self.arm.level_hold_power(),
        );
        let net = self.elbow_motor.power() - gravity;
        let counts = self.elbow_motor.position() + net * ELBOW_COUNTS_PER_SECOND * dt.as_secs_f64();
        self.elbow_motor.set_counts(counts);
    }
}
