//! 场景加载命令

use crate::connection::ConnectionArgs;
use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

/// 场景加载命令参数
#[derive(Args, Debug)]
pub struct LoadCommand {
    /// 场景文件（.ttt）
    pub scene: PathBuf,

    /// 场景文件位于服务端（默认由客户端上传）
    #[arg(long)]
    pub server_side: bool,
}

impl LoadCommand {
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        if !self.server_side && !self.scene.is_file() {
            bail!("场景文件不存在: {}", self.scene.display());
        }

        let sim = connection.connect()?;
        let path = self.scene.to_string_lossy();
        sim.load_scene(&path, !self.server_side)?;
        println!("✅ 已加载场景: {}", path);
        Ok(())
    }
}
