//! 配置管理命令
//!
//! 用于管理 CLI 配置（服务端地址、端口、remoteApi 动态库等）

use anyhow::{Context, Result, bail};
use crate::connection::ConnectionArgs;
use clap::Subcommand;
use std::path::PathBuf;
use vrepsim::SimulatorConfig;

/// 覆盖配置文件路径的环境变量
pub const CONFIG_ENV: &str = "VREPSIM_CONFIG";

/// 配置文件路径
///
/// - `VREPSIM_CONFIG` 环境变量（如果设置）
/// - Linux: `~/.config/vrepsim/config.toml`
/// - macOS: `~/Library/Application Support/vrepsim/config.toml`
/// - Windows: `%APPDATA%\vrepsim\config.toml`
pub fn config_file() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("vrepsim");
    path.push("config.toml");
    Ok(path)
}

/// 加载配置（文件不存在时使用默认值）
pub fn load_config() -> Result<SimulatorConfig> {
    let path = config_file()?;
    SimulatorConfig::load(&path).with_context(|| format!("读取配置文件失败: {}", path.display()))
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    ///
    /// 地址、端口、动态库取自全局参数 `--addr`、`--port`、`--library`。
    Set {
        /// 连接超时（ms）
        #[arg(long)]
        timeout_ms: Option<i32>,

        /// 通信线程周期（ms）
        #[arg(long)]
        cycle_ms: Option<i32>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称（address, port, timeout_ms, cycle_ms, library, all）
        #[arg(default_value = "all")]
        key: String,
    },

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, connection: &ConnectionArgs) -> Result<()> {
        match self {
            ConfigCommand::Set {
                timeout_ms,
                cycle_ms,
            } => Self::set_(connection, timeout_ms, cycle_ms),

            ConfigCommand::Get { key } => Self::get_(&key),

            ConfigCommand::Path => {
                println!("{}", config_file()?.display());
                Ok(())
            },
        }
    }

    fn set_(connection: &ConnectionArgs, timeout_ms: Option<i32>, cycle_ms: Option<i32>) -> Result<()> {
        let mut config = load_config()?;

        if let Some(address) = &connection.addr {
            println!("✅ 设置服务端地址: {}", address);
            config.address = address.clone();
        }
        if let Some(port) = connection.port {
            println!("✅ 设置服务端端口: {}", port);
            config.port = port;
        }
        if let Some(timeout_ms) = timeout_ms {
            println!("✅ 设置连接超时: {} ms", timeout_ms);
            config.timeout_ms = timeout_ms;
        }
        if let Some(cycle_ms) = cycle_ms {
            println!("✅ 设置通信周期: {} ms", cycle_ms);
            config.cycle_ms = cycle_ms;
        }
        if let Some(library) = &connection.library {
            println!("✅ 设置 remoteApi 动态库: {}", library.display());
            config.library = Some(library.clone());
        }

        config.validate()?;
        let path = config_file()?;
        config
            .save(&path)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
        Ok(())
    }

    fn get_(key: &str) -> Result<()> {
        let config = load_config()?;

        match key {
            "address" | "addr" => println!("{}", config.address),
            "port" => println!("{}", config.port),
            "timeout_ms" => println!("{}", config.timeout_ms),
            "cycle_ms" => println!("{}", config.cycle_ms),
            "library" => match &config.library {
                Some(library) => println!("{}", library.display()),
                None => println!("(未设置)"),
            },
            "all" => print!("{}", config.to_toml_string()?),
            other => bail!("未知配置项: {}", other),
        }

        Ok(())
    }
}
