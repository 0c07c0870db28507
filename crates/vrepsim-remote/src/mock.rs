//! Mock 后端
//!
//! 内存中的仿真场景，用于在没有 V-REP 的环境下测试上层代码：
//! - 记录每一次远程调用（[`MockCall`]），用于验证参数转发
//! - 按调用名注入失败返回码
//! - 维护最小化的场景状态（对象位姿、关节、传感器读数、集合、全局参数）

use crate::{
    BoolParam, ClientId, CollectionHandle, ConnectParams, FloatParam, GroupData, GroupDataType,
    ImageFormat, IntParam, MessageInfo, ObjectFloatParam, ObjectHandle, OpMode, ProximityReading,
    RemoteApi, ReturnCode, SIM_APPOBJ_OBJECT_TYPE, SimxResult, StringParam, VisionImage,
};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeMap, HashMap};

/// 一次被记录的远程调用
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Start { address: String, port: u16 },
    Finish { client: ClientId },
    FinishAll,
    GetConnectionId { client: ClientId },
    GetLastCmdTime { client: ClientId },
    Synchronous { client: ClientId, enable: bool },
    SynchronousTrigger { client: ClientId },
    StartSimulation { client: ClientId, mode: OpMode },
    PauseSimulation { client: ClientId, mode: OpMode },
    StopSimulation { client: ClientId, mode: OpMode },
    LoadScene { client: ClientId, path: String, client_side: bool, mode: OpMode },
    CloseScene { client: ClientId, mode: OpMode },
    GetIntegerParameter { client: ClientId, param: IntParam, mode: OpMode },
    GetFloatingParameter { client: ClientId, param: FloatParam, mode: OpMode },
    GetBooleanParameter { client: ClientId, param: BoolParam, mode: OpMode },
    GetStringParameter { client: ClientId, param: StringParam, mode: OpMode },
    GetInMessageInfo { client: ClientId, info: MessageInfo },
    GetObjectHandle { client: ClientId, name: String, mode: OpMode },
    GetCollectionHandle { client: ClientId, name: String, mode: OpMode },
    GetObjectPosition {
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    },
    SetObjectPosition {
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        position: [f32; 3],
        mode: OpMode,
    },
    GetObjectOrientation {
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    },
    SetObjectOrientation {
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        euler_angles: [f32; 3],
        mode: OpMode,
    },
    GetObjectVelocity { client: ClientId, handle: ObjectHandle, mode: OpMode },
    GetObjectParent { client: ClientId, handle: ObjectHandle, mode: OpMode },
    SetObjectParent {
        client: ClientId,
        handle: ObjectHandle,
        parent: ObjectHandle,
        keep_in_place: bool,
        mode: OpMode,
    },
    GetObjectFloatParameter {
        client: ClientId,
        handle: ObjectHandle,
        param: ObjectFloatParam,
        mode: OpMode,
    },
    RemoveObject { client: ClientId, handle: ObjectHandle, mode: OpMode },
    CopyPasteObjects { client: ClientId, handles: Vec<ObjectHandle>, mode: OpMode },
    GetObjectGroupData {
        client: ClientId,
        object_type: i32,
        data_type: GroupDataType,
        mode: OpMode,
    },
    ReadProximitySensor { client: ClientId, handle: ObjectHandle, mode: OpMode },
    GetVisionSensorImage {
        client: ClientId,
        handle: ObjectHandle,
        format: ImageFormat,
        mode: OpMode,
    },
    GetJointPosition { client: ClientId, handle: ObjectHandle, mode: OpMode },
    SetJointPosition { client: ClientId, handle: ObjectHandle, position: f32, mode: OpMode },
    SetJointTargetPosition { client: ClientId, handle: ObjectHandle, position: f32, mode: OpMode },
    SetJointTargetVelocity { client: ClientId, handle: ObjectHandle, velocity: f32, mode: OpMode },
}

impl MockCall {
    /// 对应的 trait 方法名，用于失败注入
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Finish { .. } => "finish",
            Self::FinishAll => "finish_all",
            Self::GetConnectionId { .. } => "get_connection_id",
            Self::GetLastCmdTime { .. } => "get_last_cmd_time",
            Self::Synchronous { .. } => "synchronous",
            Self::SynchronousTrigger { .. } => "synchronous_trigger",
            Self::StartSimulation { .. } => "start_simulation",
            Self::PauseSimulation { .. } => "pause_simulation",
            Self::StopSimulation { .. } => "stop_simulation",
            Self::LoadScene { .. } => "load_scene",
            Self::CloseScene { .. } => "close_scene",
            Self::GetIntegerParameter { .. } => "get_integer_parameter",
            Self::GetFloatingParameter { .. } => "get_floating_parameter",
            Self::GetBooleanParameter { .. } => "get_boolean_parameter",
            Self::GetStringParameter { .. } => "get_string_parameter",
            Self::GetInMessageInfo { .. } => "get_in_message_info",
            Self::GetObjectHandle { .. } => "get_object_handle",
            Self::GetCollectionHandle { .. } => "get_collection_handle",
            Self::GetObjectPosition { .. } => "get_object_position",
            Self::SetObjectPosition { .. } => "set_object_position",
            Self::GetObjectOrientation { .. } => "get_object_orientation",
            Self::SetObjectOrientation { .. } => "set_object_orientation",
            Self::GetObjectVelocity { .. } => "get_object_velocity",
            Self::GetObjectParent { .. } => "get_object_parent",
            Self::SetObjectParent { .. } => "set_object_parent",
            Self::GetObjectFloatParameter { .. } => "get_object_float_parameter",
            Self::RemoveObject { .. } => "remove_object",
            Self::CopyPasteObjects { .. } => "copy_paste_objects",
            Self::GetObjectGroupData { .. } => "get_object_group_data",
            Self::ReadProximitySensor { .. } => "read_proximity_sensor",
            Self::GetVisionSensorImage { .. } => "get_vision_sensor_image",
            Self::GetJointPosition { .. } => "get_joint_position",
            Self::SetJointPosition { .. } => "set_joint_position",
            Self::SetJointTargetPosition { .. } => "set_joint_target_position",
            Self::SetJointTargetVelocity { .. } => "set_joint_target_velocity",
        }
    }
}

/// 模拟场景对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockObjectKind {
    #[default]
    Shape,
    Dummy,
    Joint,
    ProximitySensor,
    VisionSensor,
}

/// 模拟场景对象
#[derive(Debug, Clone, Default)]
pub struct MockObject {
    pub name: String,
    pub kind: MockObjectKind,
    pub position: [f32; 3],
    pub orientation: [f32; 3],
    pub linear_velocity: [f32; 3],
    pub angular_velocity: [f32; 3],
    pub parent: Option<ObjectHandle>,
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
    pub joint_position: f32,
    pub joint_target_position: f32,
    pub joint_velocity: f32,
    pub proximity: ProximityReading,
    /// RGB 图像；请求灰度图时按通道取平均
    pub image: VisionImage,
}

impl MockObject {
    pub fn new(name: impl Into<String>, kind: MockObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

/// 模拟仿真状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockSimState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug)]
struct MockState {
    calls: Vec<MockCall>,
    failures: HashMap<&'static str, ReturnCode>,
    accept_connections: bool,
    clients: Vec<ClientId>,
    next_client: i32,
    synchronous: bool,
    sim_state: MockSimState,
    steps: u64,
    sim_time_ms: i32,
    int_params: HashMap<IntParam, i32>,
    float_params: HashMap<FloatParam, f32>,
    string_params: HashMap<StringParam, String>,
    objects: BTreeMap<i32, MockObject>,
    next_handle: i32,
    collections: HashMap<String, (CollectionHandle, Vec<ObjectHandle>)>,
    next_collection: i32,
}

impl Default for MockState {
    fn default() -> Self {
        let mut int_params = HashMap::new();
        int_params.insert(IntParam::ProgramVersion, 30_500);
        int_params.insert(IntParam::DynamicEngine, 0);

        let mut float_params = HashMap::new();
        float_params.insert(FloatParam::SimulationTimeStep, 0.05);
        float_params.insert(FloatParam::DynamicStepSize, 0.005);

        let mut string_params = HashMap::new();
        string_params.insert(StringParam::ScenePathAndName, String::new());

        Self {
            calls: Vec::new(),
            failures: HashMap::new(),
            accept_connections: true,
            clients: Vec::new(),
            next_client: 0,
            synchronous: false,
            sim_state: MockSimState::Stopped,
            steps: 0,
            sim_time_ms: 0,
            int_params,
            float_params,
            string_params,
            objects: BTreeMap::new(),
            next_handle: 1,
            collections: HashMap::new(),
            next_collection: 2_000_000,
        }
    }
}

impl MockState {
    fn check_client(&self, client: ClientId) -> SimxResult<()> {
        if self.clients.contains(&client) {
            Ok(())
        } else {
            Err(ReturnCode::INITIALIZE_ERROR)
        }
    }

    fn object(&self, handle: ObjectHandle) -> SimxResult<&MockObject> {
        self.objects.get(&handle.0).ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn object_mut(&mut self, handle: ObjectHandle) -> SimxResult<&mut MockObject> {
        self.objects.get_mut(&handle.0).ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn object_of_kind(
        &self,
        handle: ObjectHandle,
        kind: MockObjectKind,
    ) -> SimxResult<&MockObject> {
        let object = self.object(handle)?;
        if object.kind == kind { Ok(object) } else { Err(ReturnCode::REMOTE_ERROR) }
    }

    fn joint_mut(&mut self, handle: ObjectHandle) -> SimxResult<&mut MockObject> {
        let object = self.object_mut(handle)?;
        if object.kind == MockObjectKind::Joint {
            Ok(object)
        } else {
            Err(ReturnCode::REMOTE_ERROR)
        }
    }

    fn insert(&mut self, object: MockObject) -> ObjectHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.objects.insert(handle, object);
        ObjectHandle(handle)
    }

    fn group_members(&self, object_type: i32) -> SimxResult<Vec<ObjectHandle>> {
        if object_type == SIM_APPOBJ_OBJECT_TYPE {
            return Ok(self.objects.keys().copied().map(ObjectHandle).collect());
        }
        self.collections
            .values()
            .find(|(handle, _)| handle.0 == object_type)
            .map(|(_, members)| members.clone())
            .ok_or(ReturnCode::REMOTE_ERROR)
    }
}

/// 内存 Mock 后端
///
/// ```rust,ignore
/// use vrepsim_remote::{ConnectParams, MockRemoteApi, RemoteApi};
/// use vrepsim_remote::mock::MockObjectKind;
///
/// let api = MockRemoteApi::new();
/// let handle = api.add_object("Cuboid", MockObjectKind::Shape);
/// let client = api.start(&ConnectParams::default()).unwrap();
/// assert_eq!(
///     api.get_object_handle(client, "Cuboid", vrepsim_remote::OpMode::Blocking),
///     Ok(handle)
/// );
/// ```
#[derive(Debug, Default)]
pub struct MockRemoteApi {
    state: Mutex<MockState>,
}

impl MockRemoteApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加场景对象
    pub fn add_object(&self, name: impl Into<String>, kind: MockObjectKind) -> ObjectHandle {
        self.insert_object(MockObject::new(name, kind))
    }

    /// 添加完整描述的场景对象
    pub fn insert_object(&self, object: MockObject) -> ObjectHandle {
        self.state.lock().insert(object)
    }

    /// 读取对象当前状态
    pub fn object(&self, handle: ObjectHandle) -> Option<MockObject> {
        self.state.lock().objects.get(&handle.0).cloned()
    }

    /// 修改对象状态
    pub fn update_object(&self, handle: ObjectHandle, f: impl FnOnce(&mut MockObject)) {
        if let Some(object) = self.state.lock().objects.get_mut(&handle.0) {
            f(object);
        }
    }

    pub fn object_count(&self) -> usize {
        self.state.lock().objects.len()
    }

    /// 添加集合
    pub fn add_collection(
        &self,
        name: impl Into<String>,
        members: &[ObjectHandle],
    ) -> CollectionHandle {
        let mut state = self.state.lock();
        let handle = CollectionHandle(state.next_collection);
        state.next_collection += 1;
        state.collections.insert(name.into(), (handle, members.to_vec()));
        handle
    }

    pub fn set_int_parameter(&self, param: IntParam, value: i32) {
        self.state.lock().int_params.insert(param, value);
    }

    pub fn set_float_parameter(&self, param: FloatParam, value: f32) {
        self.state.lock().float_params.insert(param, value);
    }

    pub fn set_string_parameter(&self, param: StringParam, value: impl Into<String>) {
        self.state.lock().string_params.insert(param, value.into());
    }

    /// 是否接受新连接（`false` 时 `start` 返回 `None`）
    pub fn set_accept_connections(&self, accept: bool) {
        self.state.lock().accept_connections = accept;
    }

    /// 让指定调用一直返回给定的返回码，直到 [`clear_failures`](Self::clear_failures)
    pub fn fail(&self, call: &'static str, code: ReturnCode) {
        self.state.lock().failures.insert(call, code);
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// 已记录的调用
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// 取出并清空已记录的调用
    pub fn take_calls(&self) -> Vec<MockCall> {
        std::mem::take(&mut self.state.lock().calls)
    }

    /// 最后一次调用
    pub fn last_call(&self) -> Option<MockCall> {
        self.state.lock().calls.last().cloned()
    }

    pub fn client_count(&self) -> usize {
        self.state.lock().clients.len()
    }

    pub fn sim_state(&self) -> MockSimState {
        self.state.lock().sim_state
    }

    pub fn is_synchronous(&self) -> bool {
        self.state.lock().synchronous
    }

    /// 已执行的仿真步数
    pub fn steps(&self) -> u64 {
        self.state.lock().steps
    }

    fn begin(&self, call: MockCall) -> SimxResult<MutexGuard<'_, MockState>> {
        let mut state = self.state.lock();
        let name = call.name();
        state.calls.push(call);
        match state.failures.get(name) {
            Some(code) => Err(*code),
            None => Ok(state),
        }
    }

    fn begin_client(
        &self,
        client: ClientId,
        call: MockCall,
    ) -> SimxResult<MutexGuard<'_, MockState>> {
        let state = self.begin(call)?;
        state.check_client(client)?;
        Ok(state)
    }
}

impl RemoteApi for MockRemoteApi {
    fn start(&self, params: &ConnectParams) -> Option<ClientId> {
        let mut state = self
            .begin(MockCall::Start {
                address: params.address.clone(),
                port: params.port,
            })
            .ok()?;
        if !state.accept_connections {
            return None;
        }
        let client = ClientId(state.next_client);
        state.next_client += 1;
        state.clients.push(client);
        Some(client)
    }

    fn finish(&self, client: ClientId) {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Finish { client });
        state.clients.retain(|c| *c != client);
    }

    fn finish_all(&self) {
        let mut state = self.state.lock();
        state.calls.push(MockCall::FinishAll);
        state.clients.clear();
    }

    fn get_connection_id(&self, client: ClientId) -> Option<i32> {
        let state = self.begin_client(client, MockCall::GetConnectionId { client }).ok()?;
        state
            .clients
            .iter()
            .position(|c| *c == client)
            .map(|i| i as i32)
    }

    fn get_last_cmd_time(&self, client: ClientId) -> i32 {
        self.begin_client(client, MockCall::GetLastCmdTime { client })
            .map(|state| state.sim_time_ms)
            .unwrap_or(0)
    }

    fn synchronous(&self, client: ClientId, enable: bool) -> SimxResult<()> {
        let mut state = self.begin_client(client, MockCall::Synchronous { client, enable })?;
        state.synchronous = enable;
        Ok(())
    }

    fn synchronous_trigger(&self, client: ClientId) -> SimxResult<()> {
        let mut state = self.begin_client(client, MockCall::SynchronousTrigger { client })?;
        if state.synchronous && state.sim_state == MockSimState::Running {
            let dt = state
                .float_params
                .get(&FloatParam::SimulationTimeStep)
                .copied()
                .unwrap_or(0.05);
            state.steps += 1;
            state.sim_time_ms += (dt * 1000.0).round() as i32;
        }
        Ok(())
    }

    fn start_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        let mut state = self.begin_client(client, MockCall::StartSimulation { client, mode })?;
        state.sim_state = MockSimState::Running;
        Ok(())
    }

    fn pause_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        let mut state = self.begin_client(client, MockCall::PauseSimulation { client, mode })?;
        if state.sim_state == MockSimState::Running {
            state.sim_state = MockSimState::Paused;
        }
        Ok(())
    }

    fn stop_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        let mut state = self.begin_client(client, MockCall::StopSimulation { client, mode })?;
        state.sim_state = MockSimState::Stopped;
        state.sim_time_ms = 0;
        Ok(())
    }

    fn load_scene(
        &self,
        client: ClientId,
        path: &str,
        client_side: bool,
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::LoadScene {
                client,
                path: path.to_string(),
                client_side,
                mode,
            },
        )?;
        if state.sim_state != MockSimState::Stopped {
            return Err(ReturnCode::REMOTE_ERROR);
        }
        state
            .string_params
            .insert(StringParam::ScenePathAndName, path.to_string());
        Ok(())
    }

    fn close_scene(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        let mut state = self.begin_client(client, MockCall::CloseScene { client, mode })?;
        state.objects.clear();
        state.collections.clear();
        state
            .string_params
            .insert(StringParam::ScenePathAndName, String::new());
        Ok(())
    }

    fn get_integer_parameter(
        &self,
        client: ClientId,
        param: IntParam,
        mode: OpMode,
    ) -> SimxResult<i32> {
        let state =
            self.begin_client(client, MockCall::GetIntegerParameter { client, param, mode })?;
        state.int_params.get(&param).copied().ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn get_floating_parameter(
        &self,
        client: ClientId,
        param: FloatParam,
        mode: OpMode,
    ) -> SimxResult<f32> {
        let state =
            self.begin_client(client, MockCall::GetFloatingParameter { client, param, mode })?;
        state.float_params.get(&param).copied().ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn get_boolean_parameter(
        &self,
        client: ClientId,
        param: BoolParam,
        mode: OpMode,
    ) -> SimxResult<bool> {
        let state =
            self.begin_client(client, MockCall::GetBooleanParameter { client, param, mode })?;
        match param {
            BoolParam::WaitingForTrigger => {
                Ok(state.synchronous && state.sim_state == MockSimState::Running)
            },
        }
    }

    fn get_string_parameter(
        &self,
        client: ClientId,
        param: StringParam,
        mode: OpMode,
    ) -> SimxResult<String> {
        let state =
            self.begin_client(client, MockCall::GetStringParameter { client, param, mode })?;
        state.string_params.get(&param).cloned().ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn get_in_message_info(&self, client: ClientId, info: MessageInfo) -> Option<i32> {
        let state = self.begin_client(client, MockCall::GetInMessageInfo { client, info }).ok()?;
        match info {
            MessageInfo::ServerState => Some(match state.sim_state {
                MockSimState::Stopped => 0x00,
                MockSimState::Running => 0x01,
                MockSimState::Paused => 0x03,
            }),
        }
    }

    fn get_object_handle(
        &self,
        client: ClientId,
        name: &str,
        mode: OpMode,
    ) -> SimxResult<ObjectHandle> {
        let state = self.begin_client(
            client,
            MockCall::GetObjectHandle {
                client,
                name: name.to_string(),
                mode,
            },
        )?;
        state
            .objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(handle, _)| ObjectHandle(*handle))
            .ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn get_collection_handle(
        &self,
        client: ClientId,
        name: &str,
        mode: OpMode,
    ) -> SimxResult<CollectionHandle> {
        let state = self.begin_client(
            client,
            MockCall::GetCollectionHandle {
                client,
                name: name.to_string(),
                mode,
            },
        )?;
        state
            .collections
            .get(name)
            .map(|(handle, _)| *handle)
            .ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn get_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<[f32; 3]> {
        let state = self.begin_client(
            client,
            MockCall::GetObjectPosition {
                client,
                handle,
                relative_to,
                mode,
            },
        )?;
        let position = state.object(handle)?.position;
        if relative_to.is_none() {
            return Ok(position);
        }
        let origin = state.object(relative_to)?.position;
        Ok([
            position[0] - origin[0],
            position[1] - origin[1],
            position[2] - origin[2],
        ])
    }

    fn set_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        position: [f32; 3],
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::SetObjectPosition {
                client,
                handle,
                relative_to,
                position,
                mode,
            },
        )?;
        let origin = if relative_to.is_none() {
            [0.0; 3]
        } else {
            state.object(relative_to)?.position
        };
        state.object_mut(handle)?.position = [
            origin[0] + position[0],
            origin[1] + position[1],
            origin[2] + position[2],
        ];
        Ok(())
    }

    fn get_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<[f32; 3]> {
        let state = self.begin_client(
            client,
            MockCall::GetObjectOrientation {
                client,
                handle,
                relative_to,
                mode,
            },
        )?;
        // 只模拟绝对坐标系下的姿态
        if !relative_to.is_none() {
            state.object(relative_to)?;
        }
        Ok(state.object(handle)?.orientation)
    }

    fn set_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        euler_angles: [f32; 3],
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::SetObjectOrientation {
                client,
                handle,
                relative_to,
                euler_angles,
                mode,
            },
        )?;
        if !relative_to.is_none() {
            state.object(relative_to)?;
        }
        state.object_mut(handle)?.orientation = euler_angles;
        Ok(())
    }

    fn get_object_velocity(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<([f32; 3], [f32; 3])> {
        let state =
            self.begin_client(client, MockCall::GetObjectVelocity { client, handle, mode })?;
        let object = state.object(handle)?;
        Ok((object.linear_velocity, object.angular_velocity))
    }

    fn get_object_parent(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<ObjectHandle> {
        let state =
            self.begin_client(client, MockCall::GetObjectParent { client, handle, mode })?;
        Ok(state.object(handle)?.parent.unwrap_or(ObjectHandle::NONE))
    }

    fn set_object_parent(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        parent: ObjectHandle,
        keep_in_place: bool,
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::SetObjectParent {
                client,
                handle,
                parent,
                keep_in_place,
                mode,
            },
        )?;
        if !parent.is_none() {
            state.object(parent)?;
        }
        state.object_mut(handle)?.parent = (!parent.is_none()).then_some(parent);
        Ok(())
    }

    fn get_object_float_parameter(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        param: ObjectFloatParam,
        mode: OpMode,
    ) -> SimxResult<f32> {
        let state = self.begin_client(
            client,
            MockCall::GetObjectFloatParameter {
                client,
                handle,
                param,
                mode,
            },
        )?;
        let object = state.object(handle)?;
        Ok(match param {
            ObjectFloatParam::BboxMinX => object.bbox_min[0],
            ObjectFloatParam::BboxMinY => object.bbox_min[1],
            ObjectFloatParam::BboxMinZ => object.bbox_min[2],
            ObjectFloatParam::BboxMaxX => object.bbox_max[0],
            ObjectFloatParam::BboxMaxY => object.bbox_max[1],
            ObjectFloatParam::BboxMaxZ => object.bbox_max[2],
            ObjectFloatParam::JointVelocity => {
                if object.kind != MockObjectKind::Joint {
                    return Err(ReturnCode::REMOTE_ERROR);
                }
                object.joint_velocity
            },
        })
    }

    fn remove_object(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state =
            self.begin_client(client, MockCall::RemoveObject { client, handle, mode })?;
        state
            .objects
            .remove(&handle.0)
            .map(|_| ())
            .ok_or(ReturnCode::REMOTE_ERROR)
    }

    fn copy_paste_objects(
        &self,
        client: ClientId,
        handles: &[ObjectHandle],
        mode: OpMode,
    ) -> SimxResult<Vec<ObjectHandle>> {
        let mut state = self.begin_client(
            client,
            MockCall::CopyPasteObjects {
                client,
                handles: handles.to_vec(),
                mode,
            },
        )?;
        let originals = handles
            .iter()
            .map(|h| state.object(*h).cloned())
            .collect::<SimxResult<Vec<_>>>()?;
        Ok(originals
            .into_iter()
            .map(|mut object| {
                object.name = format!("{}#0", object.name);
                state.insert(object)
            })
            .collect())
    }

    fn get_object_group_data(
        &self,
        client: ClientId,
        object_type: i32,
        data_type: GroupDataType,
        mode: OpMode,
    ) -> SimxResult<GroupData> {
        let state = self.begin_client(
            client,
            MockCall::GetObjectGroupData {
                client,
                object_type,
                data_type,
                mode,
            },
        )?;
        let members = state.group_members(object_type)?;
        let mut data = GroupData {
            handles: members.iter().map(|h| h.0).collect(),
            ..Default::default()
        };
        for handle in members {
            let object = state.object(handle)?;
            match data_type {
                GroupDataType::Names => data.string_data.push(object.name.clone()),
                GroupDataType::AbsolutePositions => {
                    data.float_data.extend_from_slice(&object.position)
                },
                GroupDataType::Orientations => {
                    data.float_data.extend_from_slice(&object.orientation)
                },
            }
        }
        Ok(data)
    }

    fn read_proximity_sensor(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<ProximityReading> {
        let state =
            self.begin_client(client, MockCall::ReadProximitySensor { client, handle, mode })?;
        Ok(state
            .object_of_kind(handle, MockObjectKind::ProximitySensor)?
            .proximity)
    }

    fn get_vision_sensor_image(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        format: ImageFormat,
        mode: OpMode,
    ) -> SimxResult<VisionImage> {
        let state = self.begin_client(
            client,
            MockCall::GetVisionSensorImage {
                client,
                handle,
                format,
                mode,
            },
        )?;
        let image = &state
            .object_of_kind(handle, MockObjectKind::VisionSensor)?
            .image;
        let data = match format {
            ImageFormat::Rgb => image.data.clone(),
            ImageFormat::Grayscale => image
                .data
                .chunks(3)
                .map(|px| (px.iter().map(|v| u16::from(*v)).sum::<u16>() / px.len() as u16) as u8)
                .collect(),
        };
        Ok(VisionImage {
            resolution: image.resolution,
            format,
            data,
        })
    }

    fn get_joint_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<f32> {
        let state =
            self.begin_client(client, MockCall::GetJointPosition { client, handle, mode })?;
        Ok(state.object_of_kind(handle, MockObjectKind::Joint)?.joint_position)
    }

    fn set_joint_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        position: f32,
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::SetJointPosition {
                client,
                handle,
                position,
                mode,
            },
        )?;
        state.joint_mut(handle)?.joint_position = position;
        Ok(())
    }

    fn set_joint_target_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        position: f32,
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::SetJointTargetPosition {
                client,
                handle,
                position,
                mode,
            },
        )?;
        state.joint_mut(handle)?.joint_target_position = position;
        Ok(())
    }

    fn set_joint_target_velocity(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        velocity: f32,
        mode: OpMode,
    ) -> SimxResult<()> {
        let mut state = self.begin_client(
            client,
            MockCall::SetJointTargetVelocity {
                client,
                handle,
                velocity,
                mode,
            },
        )?;
        // 理想电机：速度立即达到目标值
        state.joint_mut(handle)?.joint_velocity = velocity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected() -> (MockRemoteApi, ClientId) {
        let api = MockRemoteApi::new();
        let client = api.start(&ConnectParams::default()).unwrap();
        (api, client)
    }

    #[test]
    fn test_start_and_finish() {
        let api = MockRemoteApi::new();
        let client = api.start(&ConnectParams::default()).unwrap();
        assert_eq!(api.client_count(), 1);
        assert_eq!(api.get_connection_id(client), Some(0));

        api.finish(client);
        assert_eq!(api.client_count(), 0);
        assert_eq!(api.get_connection_id(client), None);
    }

    #[test]
    fn test_refused_connection() {
        let api = MockRemoteApi::new();
        api.set_accept_connections(false);
        assert!(api.start(&ConnectParams::default()).is_none());
    }

    #[test]
    fn test_unknown_client_is_initialize_error() {
        let api = MockRemoteApi::new();
        assert_eq!(
            api.synchronous_trigger(ClientId(7)),
            Err(ReturnCode::INITIALIZE_ERROR)
        );
    }

    #[test]
    fn test_injected_failure_is_recorded() {
        let (api, client) = connected();
        api.fail("start_simulation", ReturnCode::NOVALUE);
        assert_eq!(
            api.start_simulation(client, OpMode::Blocking),
            Err(ReturnCode::NOVALUE)
        );
        assert_eq!(
            api.last_call(),
            Some(MockCall::StartSimulation {
                client,
                mode: OpMode::Blocking
            })
        );
        assert_eq!(api.sim_state(), MockSimState::Stopped);
    }

    #[test]
    fn test_trigger_advances_only_in_synchronous_running_mode() {
        let (api, client) = connected();
        api.synchronous_trigger(client).unwrap();
        assert_eq!(api.steps(), 0);

        api.synchronous(client, true).unwrap();
        api.start_simulation(client, OpMode::Blocking).unwrap();
        api.synchronous_trigger(client).unwrap();
        api.synchronous_trigger(client).unwrap();
        assert_eq!(api.steps(), 2);
        assert_eq!(api.get_last_cmd_time(client), 100);
    }

    #[test]
    fn test_group_data_of_collection() {
        let (api, client) = connected();
        let a = api.insert_object(MockObject {
            position: [1.0, 2.0, 3.0],
            ..MockObject::new("A", MockObjectKind::Shape)
        });
        let _b = api.add_object("B", MockObjectKind::Shape);
        let coll = api.add_collection("Group", &[a]);

        let data = api
            .get_object_group_data(
                client,
                coll.0,
                GroupDataType::AbsolutePositions,
                OpMode::Blocking,
            )
            .unwrap();
        assert_eq!(data.handles, vec![a.0]);
        assert_eq!(data.float_data, vec![1.0, 2.0, 3.0]);

        let all = api
            .get_object_group_data(
                client,
                SIM_APPOBJ_OBJECT_TYPE,
                GroupDataType::Names,
                OpMode::Blocking,
            )
            .unwrap();
        assert_eq!(all.string_data, vec!["A", "B"]);
    }

    #[test]
    fn test_joint_calls_reject_non_joints() {
        let (api, client) = connected();
        let shape = api.add_object("Cuboid", MockObjectKind::Shape);
        assert_eq!(
            api.set_joint_target_velocity(client, shape, 1.0, OpMode::Oneshot),
            Err(ReturnCode::REMOTE_ERROR)
        );
    }

    #[test]
    fn test_grayscale_image() {
        let (api, client) = connected();
        let cam = api.insert_object(MockObject {
            image: VisionImage {
                resolution: [2, 1],
                format: ImageFormat::Rgb,
                data: vec![30, 60, 90, 0, 0, 255],
            },
            ..MockObject::new("Vision_sensor", MockObjectKind::VisionSensor)
        });
        let image = api
            .get_vision_sensor_image(client, cam, ImageFormat::Grayscale, OpMode::Blocking)
            .unwrap();
        assert_eq!(image.data, vec![60, 85]);
        assert_eq!(image.expected_len(), 2);
    }
}
