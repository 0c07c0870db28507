//! 对象位姿查询命令

use crate::connection::ConnectionArgs;
use anyhow::Result;
use clap::{Args, ValueEnum};
use vrepsim::SceneObject;

/// 输出格式
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseFormat {
    #[default]
    Table,
    Toml,
}

/// 位姿查询命令参数
#[derive(Args, Debug)]
pub struct PoseCommand {
    /// 场景对象名称
    pub object: String,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = PoseFormat::Table)]
    pub format: PoseFormat,
}

impl PoseCommand {
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        let sim = connection.connect()?;
        let object = SceneObject::new(&sim, &self.object)?;

        let position = object.get_position()?;
        let orientation = object.get_orientation()?;
        print!("{}", format_pose(self.format, object.name(), position, orientation));
        Ok(())
    }
}

fn format_pose(format: PoseFormat, name: &str, position: [f32; 3], orientation: [f32; 3]) -> String {
    match format {
        PoseFormat::Table => format!(
            "{}\n  位置 (m):     x={:.4} y={:.4} z={:.4}\n  姿态 (rad):   α={:.4} β={:.4} γ={:.4}\n",
            name,
            position[0],
            position[1],
            position[2],
            orientation[0],
            orientation[1],
            orientation[2]
        ),
        PoseFormat::Toml => format!(
            "[\"{}\"]\nposition = [{}, {}, {}]\norientation = [{}, {}, {}]\n",
            name,
            position[0],
            position[1],
            position[2],
            orientation[0],
            orientation[1],
            orientation[2]
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        let text = format_pose(PoseFormat::Table, "Cuboid", [1.0, 2.0, 0.5], [0.0, 0.0, 1.5]);
        assert!(text.starts_with("Cuboid\n"));
        assert!(text.contains("x=1.0000 y=2.0000 z=0.5000"));
        assert!(text.contains("γ=1.5000"));
    }

    #[test]
    fn test_format_toml() {
        let text = format_pose(PoseFormat::Toml, "Cuboid", [1.0, 2.0, 0.5], [0.0, 0.0, 1.5]);
        assert_eq!(
            text,
            "[\"Cuboid\"]\nposition = [1, 2, 0.5]\norientation = [0, 0, 1.5]\n"
        );
    }
}
