//! 重力补偿与反馈回调的属性测试
//!
//! 使用 proptest 验证数学属性。

mod common;

use common::setup_arm;
use proptest::prelude::*;
use relic_arm::gravity_compensation;
use relic_control::{Deg, PidInput, PowerCompensation};

proptest! {
    /// 补偿关于水平面对称
    #[test]
    fn compensation_is_even(angle in -180.0..180.0f64, hold in -1.0..1.0f64) {
        let up = gravity_compensation(Deg(angle), hold);
        let down = gravity_compensation(Deg(-angle), hold);
        prop_assert!((up - down).abs() < 1e-12);
    }

    /// 补偿幅值不超过水平保持功率
    #[test]
    fn compensation_bounded_by_hold_power(angle in -720.0..720.0f64, hold in -1.0..1.0f64) {
        let c = gravity_compensation(Deg(angle), hold);
        prop_assert!(c.abs() <= hold.abs() + 1e-12);
    }

    /// 水平 ±90° 以内补偿与保持功率同号
    #[test]
    fn compensation_sign_within_level_band(angle in -89.9..89.9f64, hold in 0.01..1.0f64) {
        prop_assert!(gravity_compensation(Deg(angle), hold) > 0.0);
        prop_assert!(gravity_compensation(Deg(angle), -hold) < 0.0);
    }

    /// 补偿每 360° 重复
    #[test]
    fn compensation_is_periodic(angle in -180.0..180.0f64) {
        let a = gravity_compensation(Deg(angle), 0.2);
        let b = gravity_compensation(Deg(angle + 360.0), 0.2);
        prop_assert!((a - b).abs() < 1e-12);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// 肘关节 PID 的反馈值总是等于执行器位置
    #[test]
    fn feedback_matches_elbow_position(counts in -90.0..90.0f64) {
        let t = setup_arm();
        t.set_elbow_counts(counts);
        let input = t.arm.get_input(t.arm.elbow().pid_controller());
        prop_assert_eq!(input, t.arm.elbow().position());
        prop_assert_eq!(input, counts);
    }

    /// 机械臂给出的补偿与当前角度下的余弦模型一致
    #[test]
    fn arm_compensation_matches_model(counts in -90.0..90.0f64) {
        let t = setup_arm();
        t.set_elbow_counts(counts);
        let expected = gravity_compensation(Deg(counts), t.arm.level_hold_power());
        prop_assert!((t.arm.get_compensation() - expected).abs() < 1e-12);
    }
}
