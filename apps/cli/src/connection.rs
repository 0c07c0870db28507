//! 连接参数：配置文件 + 命令行覆盖

use crate::commands::config::load_config;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use vrepsim::{Simulator, SimulatorBuilder, SimulatorConfig};

/// 全局连接参数（覆盖配置文件）
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// 远程 API 服务端地址
    #[arg(long, global = true)]
    pub addr: Option<String>,

    /// 远程 API 服务端端口
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// remoteApi 动态库路径
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,
}

impl ConnectionArgs {
    /// 合并配置文件与命令行参数（命令行优先）
    pub fn resolve(&self) -> Result<SimulatorConfig> {
        let mut config = load_config()?;
        if let Some(addr) = &self.addr {
            config.address = addr.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(library) = &self.library {
            config.library = Some(library.clone());
        }
        config.validate()?;
        Ok(config)
    }

    /// 连接服务端
    pub fn connect(&self) -> Result<Simulator> {
        let config = self.resolve()?;
        info!("Connecting to {}:{}", config.address, config.port);
        SimulatorBuilder::from_config(&config)
            .connect()
            .with_context(|| {
                format!(
                    "无法连接 V-REP 远程 API 服务端 {}:{}",
                    config.address, config.port
                )
            })
    }
}
