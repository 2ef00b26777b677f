//! 配置管理命令
//!
//! 查看当前生效的机械臂配置，或生成一份默认配置文件

use anyhow::{Context, Result};
use clap::Subcommand;
use relic_arm::ArmConfig;
use std::path::{Path, PathBuf};

/// 加载配置：指定了文件则读取文件，否则使用默认值
pub fn load_config(path: Option<&Path>) -> Result<ArmConfig> {
    match path {
        Some(path) => ArmConfig::load_from_file(path)
            .with_context(|| format!("加载配置文件失败: {}", path.display())),
        None => Ok(ArmConfig::default()),
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示当前生效的配置（TOML）
    Show,

    /// 把默认配置写入文件
    Init {
        /// 输出文件路径
        path: PathBuf,

        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(&self, config: &ArmConfig) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                print!("{}", config.to_toml_string()?);
                Ok(())
            },
            ConfigCommand::Init { path, force } => {
                if path.exists() && !force {
                    anyhow::bail!("{} 已存在，使用 --force 覆盖", path.display());
                }
                ArmConfig::default().save_to_file(path)?;
                println!("✅ 默认配置已写入 {}", path.display());
                Ok(())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arm.toml");

        ConfigCommand::Init {
            path: path.clone(),
            force: false,
        }
        .execute(&ArmConfig::default())
        .unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, ArmConfig::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cmd = ConfigCommand::Init {
            path: file.path().to_path_buf(),
            force: false,
        };
        assert!(cmd.execute(&ArmConfig::default()).is_err());
    }

    #[test]
    fn test_default_without_path() {
        assert_eq!(load_config(None).unwrap(), ArmConfig::default());
    }
}
