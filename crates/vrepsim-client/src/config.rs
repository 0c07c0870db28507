//! # 连接配置
//!
//! 以 TOML 描述的会话参数，缺省字段取默认值：
//!
//! ```toml
//! address = "127.0.0.1"
//! port = 19997
//! timeout_ms = 5000
//! cycle_ms = 5
//! wait_until_connected = true
//! do_not_reconnect = true
//! library = "/opt/V-REP/programming/remoteApiBindings/lib/lib/Linux/64Bit/remoteApi.so"
//! ```

use crate::error::{Result, VrepError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vrepsim_remote::ConnectParams;

/// 会话配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// 远程 API 服务端地址
    pub address: String,

    /// 远程 API 服务端端口
    pub port: u16,

    /// 连接 / 阻塞调用超时（ms）
    pub timeout_ms: i32,

    /// 客户端通信线程周期（ms）
    pub cycle_ms: i32,

    pub wait_until_connected: bool,

    pub do_not_reconnect: bool,

    /// `remoteApi` 动态库路径；未设置时按默认规则查找
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let params = ConnectParams::default();
        Self {
            address: params.address,
            port: params.port,
            timeout_ms: params.timeout_ms,
            cycle_ms: params.comm_thread_cycle_ms,
            wait_until_connected: params.wait_until_connected,
            do_not_reconnect: params.do_not_reconnect,
            library: None,
        }
    }
}

impl SimulatorConfig {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| VrepError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载；文件不存在时返回默认配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| VrepError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VrepError::Config(e.to_string()))
    }

    /// 保存到文件（父目录不存在时创建）
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| VrepError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        fs::write(path, self.to_toml_string()?)
            .map_err(|e| VrepError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(VrepError::Config("address must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(VrepError::Config("port must not be 0".to_string()));
        }
        if self.cycle_ms <= 0 {
            return Err(VrepError::Config(format!(
                "cycle_ms must be positive, got {}",
                self.cycle_ms
            )));
        }
        Ok(())
    }

    /// 转换为 `simxStart` 参数
    pub fn to_connect_params(&self) -> ConnectParams {
        ConnectParams {
            address: self.address.clone(),
            port: self.port,
            wait_until_connected: self.wait_until_connected,
            do_not_reconnect: self.do_not_reconnect,
            timeout_ms: self.timeout_ms,
            comm_thread_cycle_ms: self.cycle_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_connect_params() {
        let config = SimulatorConfig::default();
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 19997);
        assert_eq!(config.to_connect_params(), ConnectParams::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulatorConfig::from_toml_str("port = 20000\n").unwrap();
        assert_eq!(config.port, 20000);
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.timeout_ms, 5000);
        assert!(config.library.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = SimulatorConfig::from_toml_str("port = \"abc\"").unwrap_err();
        assert!(matches!(err, VrepError::Config(_)));

        let err = SimulatorConfig::from_toml_str("port = 0").unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = SimulatorConfig {
            address: "192.168.1.20".to_string(),
            library: Some(PathBuf::from("/opt/vrep/remoteApi.so")),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = SimulatorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = SimulatorConfig::load(dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded, SimulatorConfig::default());
    }
}
