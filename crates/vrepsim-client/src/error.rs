//! 错误类型体系
//!
//! 远程调用失败按三类区分：
//!
//! - **连接错误**: 未连接、重复连接、连接失败
//! - **服务端错误**: 查询服务端信息（版本、引擎、集合等）失败
//! - **仿真错误**: 操作仿真或场景对象失败
//!
//! 错误立即向调用方传播，本层不做重试。
//!
//! # 示例
//!
//! ```rust
//! use vrepsim_client::{ErrorKind, VrepError};
//! use vrepsim_remote::ReturnCode;
//!
//! let err = VrepError::Simulation {
//!     context: "retrieve position of Cuboid".to_string(),
//!     code: ReturnCode::TIMEOUT,
//! };
//! assert_eq!(err.kind(), ErrorKind::Simulation);
//! assert!(err.is_timeout());
//! assert_eq!(
//!     err.to_string(),
//!     "Could not retrieve position of Cuboid: timeout (0x02)"
//! );
//! ```

use thiserror::Error;
use vrepsim_remote::{RemoteError, ReturnCode};

/// 结果类型别名
pub type Result<T> = std::result::Result<T, VrepError>;

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 与远程 API 服务端的连接有关
    Connection,
    /// 与服务端通信失败
    Server,
    /// 仿真过程中失败
    Simulation,
    /// 调用参数不合法
    InvalidArgument,
    /// 配置错误
    Config,
    /// 远程 API 后端不可用
    Remote,
}

/// vrepsim 错误类型
#[derive(Debug, Error)]
pub enum VrepError {
    // ==================== Connection ====================
    /// 会话未连接
    #[error("Could not {context}: not connected to V-REP remote API server")]
    NotConnected { context: String },

    /// 会话已连接
    #[error("Already connected to V-REP remote API server at {addr}")]
    AlreadyConnected { addr: String },

    /// `simxStart` 失败
    #[error("Failed to connect to V-REP remote API server at {addr}")]
    ConnectFailed { addr: String },

    // ==================== Server ====================
    /// 服务端查询失败
    #[error("Could not {context}: {code}")]
    Server { context: String, code: ReturnCode },

    /// 服务端返回了无法解释的值
    #[error("Could not {context}: unexpected value {value}")]
    UnexpectedValue { context: String, value: String },

    // ==================== Simulation ====================
    /// 仿真操作失败
    #[error("Could not {context}: {code}")]
    Simulation { context: String, code: ReturnCode },

    // ==================== Other ====================
    /// 参数无效
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 后端加载失败
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl VrepError {
    /// 按类别构造远程调用失败
    pub(crate) fn failure(kind: ErrorKind, context: String, code: ReturnCode) -> Self {
        match kind {
            ErrorKind::Server => Self::Server { context, code },
            _ => Self::Simulation { context, code },
        }
    }

    /// 错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConnected { .. } | Self::AlreadyConnected { .. } | Self::ConnectFailed { .. } => {
                ErrorKind::Connection
            },
            Self::Server { .. } | Self::UnexpectedValue { .. } => ErrorKind::Server,
            Self::Simulation { .. } => ErrorKind::Simulation,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Config(_) => ErrorKind::Config,
            Self::Remote(_) => ErrorKind::Remote,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    /// 远程调用的返回码（仅服务端/仿真错误）
    pub fn return_code(&self) -> Option<ReturnCode> {
        match self {
            Self::Server { code, .. } | Self::Simulation { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// 返回码中是否包含超时标志
    pub fn is_timeout(&self) -> bool {
        self.return_code()
            .is_some_and(|code| code.contains(ReturnCode::TIMEOUT))
    }

    /// 返回码中是否包含 novalue 标志
    pub fn is_no_value(&self) -> bool {
        self.return_code()
            .is_some_and(|code| code.contains(ReturnCode::NOVALUE))
    }

    /// 服务端是否报告了执行错误（例如对象不存在）
    pub fn is_remote_error(&self) -> bool {
        self.return_code()
            .is_some_and(|code| code.contains(ReturnCode::REMOTE_ERROR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = VrepError::NotConnected {
            context: "retrieve handle to Door".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.is_connection_error());
        assert_eq!(err.return_code(), None);
        assert_eq!(
            err.to_string(),
            "Could not retrieve handle to Door: not connected to V-REP remote API server"
        );

        let err = VrepError::ConnectFailed {
            addr: "127.0.0.1:19997".to_string(),
        };
        assert!(err.is_connection_error());
        assert!(err.to_string().contains("127.0.0.1:19997"));

        let err = VrepError::UnexpectedValue {
            context: "retrieve dynamics engine name".to_string(),
            value: "7".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_failure_by_kind() {
        let err = VrepError::failure(
            ErrorKind::Server,
            "retrieve V-REP version".to_string(),
            ReturnCode::REMOTE_ERROR,
        );
        assert!(matches!(err, VrepError::Server { .. }));
        assert!(err.is_remote_error());

        let err = VrepError::failure(
            ErrorKind::Simulation,
            "trigger V-REP simulation step".to_string(),
            ReturnCode::NOVALUE | ReturnCode::TIMEOUT,
        );
        assert!(matches!(err, VrepError::Simulation { .. }));
        assert!(err.is_no_value());
        assert!(err.is_timeout());
        assert!(!err.is_remote_error());
    }

    #[test]
    fn test_remote_error_conversion() {
        let err: VrepError = RemoteError::Symbol {
            name: "simxStart",
            message: "undefined symbol".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Remote);
    }
}
