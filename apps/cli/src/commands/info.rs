//! 服务端信息查询命令

use crate::connection::ConnectionArgs;
use anyhow::Result;
use clap::Args;

/// 信息查询命令参数
#[derive(Args, Debug)]
pub struct InfoCommand {
    /// 同时列出场景中的所有对象
    #[arg(short, long)]
    pub objects: bool,
}

impl InfoCommand {
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        let sim = connection.connect()?;

        println!("V-REP 远程 API 服务端 {}:{}", sim.addr(), sim.port());
        println!("  版本:         {}", sim.get_version()?);
        println!("  动力学引擎:   {}", sim.get_dyn_eng_name()?);
        println!("  引擎步长:     {} s", sim.get_dyn_eng_dt()?);
        println!("  仿真步长:     {} s", sim.get_sim_dt()?);
        println!(
            "  仿真状态:     {}",
            if sim.is_sim_started()? { "运行中" } else { "已停止" }
        );

        let scene = sim.get_scene_path()?;
        println!(
            "  场景:         {}",
            if scene.is_empty() { "(未保存)" } else { scene.as_str() }
        );

        if self.objects {
            let objects = sim.get_scene_objects()?;
            println!("\n场景对象 ({}):", objects.len());
            for (handle, name) in objects {
                println!("  {:>6}  {}", handle, name);
            }
        }

        Ok(())
    }
}
