//! Builder 模式实现
//!
//! 提供链式构造 [`Simulator`] 的便捷方式。

use crate::config::SimulatorConfig;
use crate::error::Result;
use crate::simulator::Simulator;
use std::path::PathBuf;
use std::sync::Arc;
use vrepsim_remote::{ConnectParams, RemoteApi};

/// Simulator Builder（链式构造）
///
/// 远程 API 后端的选择顺序：
/// 1. [`api`](Self::api) 显式指定的后端（例如测试中的 `MockRemoteApi`）
/// 2. [`library`](Self::library) 指定的动态库
/// 3. 默认查找规则（环境变量 `VREPSIM_REMOTE_API`，然后当前目录，然后系统库路径）
///
/// # Example
///
/// ```no_run
/// use vrepsim_client::SimulatorBuilder;
///
/// let sim = SimulatorBuilder::new()
///     .address("192.168.1.20")
///     .port(19999)
///     .timeout_ms(2000)
///     .connect()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct SimulatorBuilder {
    params: ConnectParams,
    library: Option<PathBuf>,
    api: Option<Arc<dyn RemoteApi>>,
}

impl SimulatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置创建
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self {
            params: config.to_connect_params(),
            library: config.library.clone(),
            api: None,
        }
    }

    /// 服务端地址（默认 127.0.0.1）
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.params.address = address.into();
        self
    }

    /// 服务端端口（默认 19997）
    pub fn port(mut self, port: u16) -> Self {
        self.params.port = port;
        self
    }

    /// 连接超时（ms，默认 5000）
    ///
    /// 负数表示首次连接超时，而阻塞调用的超时为其绝对值。
    pub fn timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.params.timeout_ms = timeout_ms;
        self
    }

    /// 客户端通信线程周期（ms，默认 5）
    pub fn comm_cycle_ms(mut self, cycle_ms: i32) -> Self {
        self.params.comm_thread_cycle_ms = cycle_ms;
        self
    }

    /// 是否阻塞直到连接成功（默认 true）
    pub fn wait_until_connected(mut self, wait: bool) -> Self {
        self.params.wait_until_connected = wait;
        self
    }

    /// 连接断开后是否自动重连（默认不重连）
    pub fn reconnect(mut self, reconnect: bool) -> Self {
        self.params.do_not_reconnect = !reconnect;
        self
    }

    /// 指定 `remoteApi` 动态库路径
    pub fn library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    /// 显式指定远程 API 后端
    pub fn api(mut self, api: Arc<dyn RemoteApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// 创建未连接的会话
    pub fn build(self) -> Result<Simulator> {
        let api = match self.api {
            Some(api) => api,
            None => load_backend(self.library)?,
        };
        Ok(Simulator::with_params(self.params, api))
    }

    /// 创建会话并立即连接
    pub fn connect(self) -> Result<Simulator> {
        let sim = self.build()?;
        sim.connect()?;
        Ok(sim)
    }
}

#[cfg(feature = "library")]
fn load_backend(path: Option<PathBuf>) -> Result<Arc<dyn RemoteApi>> {
    use vrepsim_remote::RemoteApiLibrary;

    let library = match path {
        Some(path) => RemoteApiLibrary::load(path)?,
        None => RemoteApiLibrary::load_default()?,
    };
    tracing::debug!("Loaded remote API library {}", library.path().display());
    Ok(Arc::new(library))
}

#[cfg(not(feature = "library"))]
fn load_backend(_path: Option<PathBuf>) -> Result<Arc<dyn RemoteApi>> {
    Err(crate::error::VrepError::Config(
        "no remote API backend: enable the `library` feature or pass one with `api()`"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrepsim_remote::MockRemoteApi;

    #[test]
    fn test_builder_params() {
        let sim = SimulatorBuilder::new()
            .address("10.0.0.2")
            .port(20001)
            .timeout_ms(100)
            .comm_cycle_ms(10)
            .wait_until_connected(false)
            .reconnect(true)
            .api(Arc::new(MockRemoteApi::new()))
            .build()
            .unwrap();

        let params = sim.params();
        assert_eq!(sim.addr(), "10.0.0.2");
        assert_eq!(sim.port(), 20001);
        assert_eq!(params.timeout_ms, 100);
        assert_eq!(params.comm_thread_cycle_ms, 10);
        assert!(!params.wait_until_connected);
        assert!(!params.do_not_reconnect);
        assert!(!sim.is_connected());
    }

    #[test]
    fn test_builder_from_config() {
        let config = SimulatorConfig {
            port: 19999,
            ..Default::default()
        };
        let sim = SimulatorBuilder::from_config(&config)
            .api(Arc::new(MockRemoteApi::new()))
            .build()
            .unwrap();
        assert_eq!(sim.port(), 19999);
    }

    #[cfg(feature = "library")]
    #[test]
    fn test_missing_library() {
        let err = SimulatorBuilder::new()
            .library("/nonexistent/libremoteApi.so")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Remote);
    }
}
