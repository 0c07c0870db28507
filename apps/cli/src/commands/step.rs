//! 仿真单步命令

use crate::connection::ConnectionArgs;
use anyhow::{Result, bail};
use clap::Args;

/// 单步命令参数
#[derive(Args, Debug)]
pub struct StepCommand {
    /// 触发的仿真步数
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u32,
}

impl StepCommand {
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        if self.count == 0 {
            bail!("步数必须大于 0");
        }

        let sim = connection.connect()?;
        for _ in 0..self.count {
            sim.trig_sim_step()?;
        }

        println!(
            "✅ 已触发 {} 步，仿真时间 {} ms",
            self.count,
            sim.get_last_cmd_time()?
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_steps_rejected_before_connecting() {
        let cmd = StepCommand { count: 0 };
        let err = cmd.execute(&ConnectionArgs::default()).unwrap_err();
        assert!(err.to_string().contains("步数"));
    }
}
