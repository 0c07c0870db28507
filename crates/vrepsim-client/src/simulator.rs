//! V-REP 远程 API 服务端会话
//!
//! [`Simulator`] 持有与服务端的连接，提供：
//! - 连接 / 断开
//! - 查询版本、动力学引擎、场景路径、时间步长
//! - 以同步模式启动仿真、停止、暂停、单步触发
//! - 加载 / 关闭场景
//!
//! `Simulator` 可以廉价克隆，所有克隆共享同一个连接；场景对象句柄各自持有一份克隆，
//! 在调用时检查连接状态。

use crate::error::{ErrorKind, Result, VrepError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, trace, warn};
use vrepsim_remote::{
    BoolParam, ClientId, ConnectParams, FloatParam, GroupDataType, IntParam, MessageInfo,
    ObjectHandle, OpMode, RemoteApi, ReturnCode, SERVER_STATE_SIM_NOT_STOPPED,
    SIM_APPOBJ_OBJECT_TYPE, SimxResult, StringParam, round_float,
};

/// V-REP 版本号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimulatorVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SimulatorVersion {
    /// 从 `sim_intparam_program_version`（格式 `xyyzz`）解析
    pub fn from_program_version(version: i32) -> Self {
        let version = version.max(0) as u32;
        Self {
            major: version / 10_000,
            minor: (version / 100) % 100,
            patch: version % 100,
        }
    }
}

impl fmt::Display for SimulatorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// 动力学引擎
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::TryFromPrimitive, num_enum::IntoPrimitive,
)]
#[repr(i32)]
pub enum DynamicsEngine {
    Bullet = 0,
    Ode = 1,
    Vortex = 2,
    Newton = 3,
}

impl DynamicsEngine {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bullet => "Bullet",
            Self::Ode => "ODE",
            Self::Vortex => "Vortex",
            Self::Newton => "Newton",
        }
    }
}

impl fmt::Display for DynamicsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 启动/停止/暂停仿真时，服务端经常来不及回复，novalue 视为成功
fn accept_novalue(res: SimxResult<()>) -> SimxResult<()> {
    match res {
        Err(code) if code.is_only_novalue() => Ok(()),
        other => other,
    }
}

struct Session {
    api: Arc<dyn RemoteApi>,
    params: ConnectParams,
    client: Mutex<Option<ClientId>>,
    running: AtomicBool,
}

impl Session {
    fn endpoint(&self) -> String {
        format!("{}:{}", self.params.address, self.params.port)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(client) = self.client.get_mut().take() {
            self.api.finish(client);
            info!(
                "Disconnected from V-REP remote API server at {}",
                self.endpoint()
            );
        }
    }
}

/// V-REP 远程 API 服务端会话
///
/// # 示例
///
/// ```rust,no_run
/// use vrepsim_client::SimulatorBuilder;
///
/// # fn main() -> vrepsim_client::Result<()> {
/// let sim = SimulatorBuilder::new()
///     .address("127.0.0.1")
///     .port(19997)
///     .connect()?;
///
/// println!("V-REP {}", sim.get_version()?);
/// sim.start_sim()?;
/// for _ in 0..10 {
///     sim.trig_sim_step()?;
/// }
/// sim.stop_sim()?;
/// sim.disconnect();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Simulator {
    inner: Arc<Session>,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("endpoint", &self.inner.endpoint())
            .field("client_id", &self.client_id())
            .field("running", &self.is_sim_running())
            .finish()
    }
}

impl Simulator {
    /// 创建未连接的会话（其余连接参数取默认值）
    pub fn new(addr: impl Into<String>, port: u16, api: Arc<dyn RemoteApi>) -> Self {
        Self::with_params(
            ConnectParams {
                address: addr.into(),
                port,
                ..Default::default()
            },
            api,
        )
    }

    /// 使用完整连接参数创建未连接的会话
    pub fn with_params(params: ConnectParams, api: Arc<dyn RemoteApi>) -> Self {
        Self {
            inner: Arc::new(Session {
                api,
                params,
                client: Mutex::new(None),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// 服务端地址
    pub fn addr(&self) -> &str {
        &self.inner.params.address
    }

    /// 服务端端口
    pub fn port(&self) -> u16 {
        self.inner.params.port
    }

    pub fn params(&self) -> &ConnectParams {
        &self.inner.params
    }

    /// 客户端连接 ID；未连接时为 `None`
    pub fn client_id(&self) -> Option<ClientId> {
        *self.inner.client.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.client_id().is_some()
    }

    /// 底层远程 API
    pub fn api(&self) -> &dyn RemoteApi {
        self.inner.api.as_ref()
    }

    /// 两个句柄是否指向同一个会话
    pub fn same_session(&self, other: &Simulator) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 取得连接 ID；未连接时返回 [`VrepError::NotConnected`]
    pub(crate) fn require_client(&self, action: impl FnOnce() -> String) -> Result<ClientId> {
        self.client_id().ok_or_else(|| VrepError::NotConnected { context: action() })
    }

    /// 执行一次远程调用，并把返回码转换为对应类别的错误
    ///
    /// `action` 描述操作本身（例如 "retrieve position of Cuboid"），只在失败时求值。
    pub(crate) fn call<T>(
        &self,
        kind: ErrorKind,
        action: impl FnOnce() -> String,
        f: impl FnOnce(&dyn RemoteApi, ClientId) -> SimxResult<T>,
    ) -> Result<T> {
        let Some(client) = self.client_id() else {
            return Err(VrepError::NotConnected { context: action() });
        };
        f(self.api(), client).map_err(|code| {
            let context = action();
            debug!("Remote API call failed: {} ({})", context, code);
            VrepError::failure(kind, context, code)
        })
    }

    /// 连接远程 API 服务端
    ///
    /// 先关闭本进程中所有已打开的连接（`simxFinish(-1)`），再建立新连接。
    pub fn connect(&self) -> Result<()> {
        let mut client = self.inner.client.lock();
        if client.is_some() {
            return Err(VrepError::AlreadyConnected {
                addr: self.inner.endpoint(),
            });
        }

        // 清理上一次运行遗留的连接
        self.inner.api.finish_all();

        match self.inner.api.start(&self.inner.params) {
            Some(id) => {
                *client = Some(id);
                info!(
                    "Successfully connected to V-REP remote API server at {} (client id {})",
                    self.inner.endpoint(),
                    id
                );
                Ok(())
            },
            None => Err(VrepError::ConnectFailed {
                addr: self.inner.endpoint(),
            }),
        }
    }

    /// 断开连接
    ///
    /// 已连接时返回 `true`；未连接时只记录警告并返回 `false`。
    pub fn disconnect(&self) -> bool {
        let taken = self.inner.client.lock().take();
        match taken {
            Some(client) => {
                self.inner.api.finish(client);
                self.inner.running.store(false, Ordering::Release);
                info!(
                    "Disconnected from V-REP remote API server at {}",
                    self.inner.endpoint()
                );
                true
            },
            None => {
                warn!("Could not disconnect from V-REP remote API server: not connected");
                false
            },
        }
    }

    /// 远程连接是否仍然存活（客户端库层面）
    pub fn is_connection_alive(&self) -> bool {
        self.client_id()
            .is_some_and(|client| self.api().get_connection_id(client).is_some())
    }

    /// V-REP 版本
    pub fn get_version(&self) -> Result<SimulatorVersion> {
        let version = self.call(
            ErrorKind::Server,
            || "retrieve V-REP version".to_string(),
            |api, client| api.get_integer_parameter(client, IntParam::ProgramVersion, OpMode::Blocking),
        )?;
        Ok(SimulatorVersion::from_program_version(version))
    }

    /// 动力学引擎
    pub fn get_dyn_eng_name(&self) -> Result<DynamicsEngine> {
        let id = self.call(
            ErrorKind::Server,
            || "retrieve dynamics engine name".to_string(),
            |api, client| api.get_integer_parameter(client, IntParam::DynamicEngine, OpMode::Blocking),
        )?;
        DynamicsEngine::try_from(id).map_err(|_| VrepError::UnexpectedValue {
            context: "retrieve dynamics engine name".to_string(),
            value: id.to_string(),
        })
    }

    /// 动力学引擎时间步长（秒，保留 4 位小数）
    pub fn get_dyn_eng_dt(&self) -> Result<f64> {
        let dt = self.call(
            ErrorKind::Simulation,
            || "retrieve dynamics engine time step".to_string(),
            |api, client| api.get_floating_parameter(client, FloatParam::DynamicStepSize, OpMode::Blocking),
        )?;
        Ok(round_float(dt))
    }

    /// 仿真时间步长（秒，保留 4 位小数）
    pub fn get_sim_dt(&self) -> Result<f64> {
        let dt = self.call(
            ErrorKind::Simulation,
            || "retrieve V-REP simulation time step".to_string(),
            |api, client| {
                api.get_floating_parameter(client, FloatParam::SimulationTimeStep, OpMode::Blocking)
            },
        )?;
        Ok(round_float(dt))
    }

    /// 当前场景文件路径
    pub fn get_scene_path(&self) -> Result<String> {
        self.call(
            ErrorKind::Simulation,
            || "retrieve scene path".to_string(),
            |api, client| {
                api.get_string_parameter(client, StringParam::ScenePathAndName, OpMode::Blocking)
            },
        )
    }

    /// 查询服务端仿真是否已启动
    ///
    /// 刚启动或停止仿真后立即查询，结果可能不准确；稍作延时再查询即可。
    pub fn is_sim_started(&self) -> Result<bool> {
        let action = || "retrieve whether V-REP simulation is started".to_string();

        // 是否在等待触发信号本身不能说明仿真是否启动（可能还有未处理的触发信号），
        // 这次阻塞调用只是为了收到一条新消息，使下面的服务端状态是最新的
        self.call(ErrorKind::Server, action, |api, client| {
            api.get_boolean_parameter(client, BoolParam::WaitingForTrigger, OpMode::Blocking)
        })?;

        let client = self.require_client(action)?;
        let state = self
            .api()
            .get_in_message_info(client, MessageInfo::ServerState)
            .ok_or_else(|| VrepError::Server {
                context: action(),
                code: ReturnCode::LOCAL_ERROR,
            })?;
        Ok(state & SERVER_STATE_SIM_NOT_STOPPED != 0)
    }

    /// 以同步模式启动仿真
    pub fn start_sim(&self) -> Result<()> {
        self.call(
            ErrorKind::Simulation,
            || "enable V-REP synchronous operation mode".to_string(),
            |api, client| api.synchronous(client, true),
        )?;
        self.call(
            ErrorKind::Simulation,
            || "start V-REP simulation".to_string(),
            |api, client| accept_novalue(api.start_simulation(client, OpMode::Blocking)),
        )?;
        self.inner.running.store(true, Ordering::Release);
        info!("V-REP simulation started");
        Ok(())
    }

    /// 停止仿真
    pub fn stop_sim(&self) -> Result<()> {
        self.call(
            ErrorKind::Simulation,
            || "stop V-REP simulation".to_string(),
            |api, client| accept_novalue(api.stop_simulation(client, OpMode::Blocking)),
        )?;
        self.inner.running.store(false, Ordering::Release);
        info!("V-REP simulation stopped");
        Ok(())
    }

    /// 暂停仿真
    pub fn pause_sim(&self) -> Result<()> {
        self.call(
            ErrorKind::Simulation,
            || "pause V-REP simulation".to_string(),
            |api, client| accept_novalue(api.pause_simulation(client, OpMode::Blocking)),
        )?;
        self.inner.running.store(false, Ordering::Release);
        info!("V-REP simulation paused");
        Ok(())
    }

    /// 触发一个仿真步（同步模式）
    pub fn trig_sim_step(&self) -> Result<()> {
        self.call(
            ErrorKind::Simulation,
            || "trigger V-REP simulation step".to_string(),
            |api, client| api.synchronous_trigger(client),
        )?;
        trace!("V-REP simulation step triggered");
        Ok(())
    }

    /// 本地记录的仿真运行标志（由 start/stop/pause 设置）
    pub fn is_sim_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// 加载场景
    ///
    /// `client_side` 为 true 时 `path` 指客户端本地文件，否则指服务端文件。
    /// 仿真运行时服务端会拒绝加载。
    pub fn load_scene(&self, path: &str, client_side: bool) -> Result<()> {
        self.call(
            ErrorKind::Simulation,
            || format!("load scene {}", path),
            |api, client| api.load_scene(client, path, client_side, OpMode::Blocking),
        )?;
        info!("Loaded scene {}", path);
        Ok(())
    }

    /// 关闭当前场景
    pub fn close_scene(&self) -> Result<()> {
        self.call(
            ErrorKind::Simulation,
            || "close scene".to_string(),
            |api, client| api.close_scene(client, OpMode::Blocking),
        )
    }

    /// 最近一条命令对应的仿真时间（毫秒）
    pub fn get_last_cmd_time(&self) -> Result<i32> {
        let client = self.require_client(|| "retrieve last command time".to_string())?;
        Ok(self.api().get_last_cmd_time(client))
    }

    /// 场景中所有对象的句柄与名称
    pub fn get_scene_objects(&self) -> Result<Vec<(ObjectHandle, String)>> {
        let data = self.call(
            ErrorKind::Server,
            || "retrieve scene objects".to_string(),
            |api, client| {
                api.get_object_group_data(
                    client,
                    SIM_APPOBJ_OBJECT_TYPE,
                    GroupDataType::Names,
                    OpMode::Blocking,
                )
            },
        )?;
        if data.handles.len() != data.string_data.len() {
            return Err(VrepError::UnexpectedValue {
                context: "retrieve scene objects".to_string(),
                value: format!(
                    "{} handles for {} names",
                    data.handles.len(),
                    data.string_data.len()
                ),
            });
        }
        Ok(data
            .handles
            .into_iter()
            .map(ObjectHandle)
            .zip(data.string_data)
            .collect())
    }

    /// 按句柄查询对象名称
    pub fn get_object_name(&self, handle: ObjectHandle) -> Result<Option<String>> {
        Ok(self
            .get_scene_objects()?
            .into_iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, name)| name))
    }
}
