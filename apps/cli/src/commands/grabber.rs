//! 夹爪命令

use anyhow::Result;
use clap::Subcommand;
use relic_arm::ArmConfig;
use relic_hal::Servo;

use crate::sim::SimulatedArm;

/// 夹爪命令
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabberCommand {
    /// 张开
    Open,
    /// 闭合
    Close,
}

impl GrabberCommand {
    /// 执行命令，返回夹爪伺服位置
    pub fn run(&self, config: &ArmConfig) -> Result<f64> {
        let sim = SimulatedArm::at_angle(config, config.elbow.min_pos)?;
        match self {
            GrabberCommand::Open => sim.arm().open_grabber(),
            GrabberCommand::Close => sim.arm().close_grabber(),
        }
        Ok(sim.arm().grabber().position())
    }

    pub fn execute(&self, config: &ArmConfig) -> Result<()> {
        let position = self.run(config)?;
        println!("✋ 夹爪位置: {position:.2}");
        Ok(())
    }
}
