//! # V-REP Remote API Layer
//!
//! V-REP 远程 API 抽象层，提供统一的 [`RemoteApi`] 接口。
//!
//! 线协议由 V-REP 自带的 `remoteApi` 客户端库实现，本 crate 不重新实现协议，
//! 只负责：
//! - 把 `simx*` 函数包装为类型安全的 trait 方法
//! - 把原始返回码转换为 [`ReturnCode`]
//! - 提供两种后端：动态库（`library` feature）和内存 Mock（`mock` feature）
//!
//! ```text
//! vrepsim-client (Simulator / SceneObject / ...)
//!     ↓ RemoteApi trait
//! RemoteApiLibrary ──FFI──> remoteApi.so ──TCP──> V-REP
//! MockRemoteApi    (测试用，内存场景)
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub mod constants;
pub mod types;

#[cfg(feature = "library")]
pub mod library;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use constants::*;
pub use types::*;

#[cfg(feature = "library")]
pub use library::RemoteApiLibrary;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockRemoteApi};

/// 远程调用结果：`Err` 携带非 ok 的返回码
pub type SimxResult<T> = Result<T, ReturnCode>;

/// Remote API 层错误（加载后端时发生）
#[derive(Error, Debug)]
pub enum RemoteError {
    /// 动态库加载失败
    #[error("Failed to load remote API library '{}': {message}", path.display())]
    Library { path: PathBuf, message: String },

    /// 动态库缺少某个 simx 符号
    #[error("Missing remote API symbol '{name}': {message}")]
    Symbol { name: &'static str, message: String },
}

/// V-REP 远程 API
///
/// 每个方法对应一个 `simx*` 函数。除 `start`/`finish` 等无返回码的函数外，
/// 所有调用都返回 [`SimxResult`]：返回码为 `simx_return_ok` 时为 `Ok`，
/// 否则 `Err` 中是完整的返回码（可能同时置位多个标志）。
///
/// 实现必须是线程安全的：客户端库本身允许多线程调用。
pub trait RemoteApi: Send + Sync {
    /// 连接服务端，失败时返回 `None`（`simxStart` 返回 -1）
    fn start(&self, params: &ConnectParams) -> Option<ClientId>;

    /// 关闭指定连接
    fn finish(&self, client: ClientId);

    /// 关闭所有连接（`simxFinish(-1)`）
    fn finish_all(&self);

    /// 连接仍然有效时返回连接 ID，否则 `None`
    fn get_connection_id(&self, client: ClientId) -> Option<i32>;

    /// 最近一条命令对应的仿真时间（毫秒）
    fn get_last_cmd_time(&self, client: ClientId) -> i32;

    fn synchronous(&self, client: ClientId, enable: bool) -> SimxResult<()>;

    fn synchronous_trigger(&self, client: ClientId) -> SimxResult<()>;

    fn start_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()>;

    fn pause_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()>;

    fn stop_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()>;

    /// `client_side` 为 true 时场景文件位于客户端，由客户端库上传
    fn load_scene(
        &self,
        client: ClientId,
        path: &str,
        client_side: bool,
        mode: OpMode,
    ) -> SimxResult<()>;

    fn close_scene(&self, client: ClientId, mode: OpMode) -> SimxResult<()>;

    fn get_integer_parameter(
        &self,
        client: ClientId,
        param: IntParam,
        mode: OpMode,
    ) -> SimxResult<i32>;

    fn get_floating_parameter(
        &self,
        client: ClientId,
        param: FloatParam,
        mode: OpMode,
    ) -> SimxResult<f32>;

    fn get_boolean_parameter(
        &self,
        client: ClientId,
        param: BoolParam,
        mode: OpMode,
    ) -> SimxResult<bool>;

    fn get_string_parameter(
        &self,
        client: ClientId,
        param: StringParam,
        mode: OpMode,
    ) -> SimxResult<String>;

    /// 读取最近一条入站消息的头部信息，失败时返回 `None`
    fn get_in_message_info(&self, client: ClientId, info: MessageInfo) -> Option<i32>;

    fn get_object_handle(
        &self,
        client: ClientId,
        name: &str,
        mode: OpMode,
    ) -> SimxResult<ObjectHandle>;

    fn get_collection_handle(
        &self,
        client: ClientId,
        name: &str,
        mode: OpMode,
    ) -> SimxResult<CollectionHandle>;

    fn get_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<[f32; 3]>;

    fn set_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        position: [f32; 3],
        mode: OpMode,
    ) -> SimxResult<()>;

    /// 欧拉角（绕 x、y、z 轴），每个角度在 -pi..pi 之间
    fn get_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<[f32; 3]>;

    fn set_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        euler_angles: [f32; 3],
        mode: OpMode,
    ) -> SimxResult<()>;

    /// 返回 (线速度, 角速度)
    fn get_object_velocity(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<([f32; 3], [f32; 3])>;

    fn get_object_parent(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<ObjectHandle>;

    fn set_object_parent(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        parent: ObjectHandle,
        keep_in_place: bool,
        mode: OpMode,
    ) -> SimxResult<()>;

    fn get_object_float_parameter(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        param: ObjectFloatParam,
        mode: OpMode,
    ) -> SimxResult<f32>;

    fn remove_object(&self, client: ClientId, handle: ObjectHandle, mode: OpMode)
    -> SimxResult<()>;

    /// 复制粘贴对象，返回新对象句柄（顺序与输入一致）
    fn copy_paste_objects(
        &self,
        client: ClientId,
        handles: &[ObjectHandle],
        mode: OpMode,
    ) -> SimxResult<Vec<ObjectHandle>>;

    /// `object_type` 可以是 [`SIM_APPOBJ_OBJECT_TYPE`]，也可以是集合句柄
    fn get_object_group_data(
        &self,
        client: ClientId,
        object_type: i32,
        data_type: GroupDataType,
        mode: OpMode,
    ) -> SimxResult<GroupData>;

    fn read_proximity_sensor(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<ProximityReading>;

    fn get_vision_sensor_image(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        format: ImageFormat,
        mode: OpMode,
    ) -> SimxResult<VisionImage>;

    fn get_joint_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<f32>;

    fn set_joint_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        position: f32,
        mode: OpMode,
    ) -> SimxResult<()>;

    fn set_joint_target_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        position: f32,
        mode: OpMode,
    ) -> SimxResult<()>;

    fn set_joint_target_velocity(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        velocity: f32,
        mode: OpMode,
    ) -> SimxResult<()>;
}
