//! 命令定义和实现

pub mod config;
pub mod info;
pub mod load;
pub mod pose;
pub mod step;

pub use config::ConfigCommand;
pub use info::InfoCommand;
pub use load::LoadCommand;
pub use pose::PoseCommand;
pub use step::StepCommand;
