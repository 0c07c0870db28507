//! 动态库后端
//!
//! 运行时加载 V-REP 自带的 `remoteApi` 客户端库（位于
//! `V-REP_DIR/programming/remoteApiBindings/lib/lib/`），一次性解析全部 `simx*`
//! 符号，然后通过 FFI 调用。
//!
//! 库文件的查找顺序：
//! 1. 显式路径（[`RemoteApiLibrary::load`]）
//! 2. 环境变量 `VREPSIM_REMOTE_API`
//! 3. 当前目录下的 `remoteApi.{so,dylib,dll}`
//! 4. 系统动态库搜索路径

use crate::{
    BoolParam, ClientId, CollectionHandle, ConnectParams, FloatParam, GroupData, GroupDataType,
    ImageFormat, IntParam, MessageInfo, ObjectFloatParam, ObjectHandle, OpMode, ProximityReading,
    RemoteApi, RemoteError, ReturnCode, SimxResult, StringParam, VisionImage,
};
use libloading::Library;
use std::ffi::{CStr, CString, c_char};
use std::path::{Path, PathBuf};
use std::ptr;
use tracing::{debug, info};

/// 指定库路径的环境变量
pub const REMOTE_API_ENV: &str = "VREPSIM_REMOTE_API";

/// 当前平台的库文件名
#[cfg(target_os = "windows")]
pub const REMOTE_API_FILENAME: &str = "remoteApi.dll";
#[cfg(target_os = "macos")]
pub const REMOTE_API_FILENAME: &str = "remoteApi.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const REMOTE_API_FILENAME: &str = "remoteApi.so";

type SimxStart = unsafe extern "C" fn(*const c_char, i32, u8, u8, i32, i32) -> i32;
type SimxFinish = unsafe extern "C" fn(i32);
type SimxClientQuery = unsafe extern "C" fn(i32) -> i32;
type SimxSynchronous = unsafe extern "C" fn(i32, u8) -> i32;
type SimxWithMode = unsafe extern "C" fn(i32, i32) -> i32;
type SimxLoadScene = unsafe extern "C" fn(i32, *const c_char, u8, i32) -> i32;
type SimxGetIntParam = unsafe extern "C" fn(i32, i32, *mut i32, i32) -> i32;
type SimxGetFloatParam = unsafe extern "C" fn(i32, i32, *mut f32, i32) -> i32;
type SimxGetBoolParam = unsafe extern "C" fn(i32, i32, *mut u8, i32) -> i32;
type SimxGetStringParam = unsafe extern "C" fn(i32, i32, *mut *mut u8, i32) -> i32;
type SimxGetInMessageInfo = unsafe extern "C" fn(i32, i32, *mut i32) -> i32;
type SimxGetHandle = unsafe extern "C" fn(i32, *const c_char, *mut i32, i32) -> i32;
type SimxGetVector = unsafe extern "C" fn(i32, i32, i32, *mut f32, i32) -> i32;
type SimxSetVector = unsafe extern "C" fn(i32, i32, i32, *const f32, i32) -> i32;
type SimxGetVelocity = unsafe extern "C" fn(i32, i32, *mut f32, *mut f32, i32) -> i32;
type SimxGetParent = unsafe extern "C" fn(i32, i32, *mut i32, i32) -> i32;
type SimxSetParent = unsafe extern "C" fn(i32, i32, i32, u8, i32) -> i32;
type SimxGetObjectFloatParam = unsafe extern "C" fn(i32, i32, i32, *mut f32, i32) -> i32;
type SimxRemoveObject = unsafe extern "C" fn(i32, i32, i32) -> i32;
type SimxCopyPaste = unsafe extern "C" fn(i32, *const i32, i32, *mut *mut i32, *mut i32, i32) -> i32;
type SimxGetGroupData = unsafe extern "C" fn(
    i32,
    i32,
    i32,
    *mut i32,
    *mut *mut i32,
    *mut i32,
    *mut *mut i32,
    *mut i32,
    *mut *mut f32,
    *mut i32,
    *mut *mut c_char,
    i32,
) -> i32;
type SimxReadProximity =
    unsafe extern "C" fn(i32, i32, *mut u8, *mut f32, *mut i32, *mut f32, i32) -> i32;
type SimxGetVisionImage = unsafe extern "C" fn(i32, i32, *mut i32, *mut *mut u8, u8, i32) -> i32;
type SimxGetJointPosition = unsafe extern "C" fn(i32, i32, *mut f32, i32) -> i32;
type SimxSetJointValue = unsafe extern "C" fn(i32, i32, f32, i32) -> i32;

/// 已解析的函数指针表
struct Symbols {
    start: SimxStart,
    finish: SimxFinish,
    get_connection_id: SimxClientQuery,
    get_last_cmd_time: SimxClientQuery,
    synchronous: SimxSynchronous,
    synchronous_trigger: SimxClientQuery,
    start_simulation: SimxWithMode,
    pause_simulation: SimxWithMode,
    stop_simulation: SimxWithMode,
    load_scene: SimxLoadScene,
    close_scene: SimxWithMode,
    get_integer_parameter: SimxGetIntParam,
    get_floating_parameter: SimxGetFloatParam,
    get_boolean_parameter: SimxGetBoolParam,
    get_string_parameter: SimxGetStringParam,
    get_in_message_info: SimxGetInMessageInfo,
    get_object_handle: SimxGetHandle,
    get_collection_handle: SimxGetHandle,
    get_object_position: SimxGetVector,
    set_object_position: SimxSetVector,
    get_object_orientation: SimxGetVector,
    set_object_orientation: SimxSetVector,
    get_object_velocity: SimxGetVelocity,
    get_object_parent: SimxGetParent,
    set_object_parent: SimxSetParent,
    get_object_float_parameter: SimxGetObjectFloatParam,
    remove_object: SimxRemoveObject,
    copy_paste_objects: SimxCopyPaste,
    get_object_group_data: SimxGetGroupData,
    read_proximity_sensor: SimxReadProximity,
    get_vision_sensor_image: SimxGetVisionImage,
    get_joint_position: SimxGetJointPosition,
    set_joint_position: SimxSetJointValue,
    set_joint_target_position: SimxSetJointValue,
    set_joint_target_velocity: SimxSetJointValue,
}

macro_rules! resolve {
    ($lib:expr, $name:literal) => {{
        // SAFETY: 函数签名与 extApi.h 中的声明一致
        let symbol = unsafe { $lib.get(concat!($name, "\0").as_bytes()) }.map_err(|e| {
            RemoteError::Symbol {
                name: $name,
                message: e.to_string(),
            }
        })?;
        *symbol
    }};
}

impl Symbols {
    fn resolve(lib: &Library) -> Result<Self, RemoteError> {
        Ok(Self {
            start: resolve!(lib, "simxStart"),
            finish: resolve!(lib, "simxFinish"),
            get_connection_id: resolve!(lib, "simxGetConnectionId"),
            get_last_cmd_time: resolve!(lib, "simxGetLastCmdTime"),
            synchronous: resolve!(lib, "simxSynchronous"),
            synchronous_trigger: resolve!(lib, "simxSynchronousTrigger"),
            start_simulation: resolve!(lib, "simxStartSimulation"),
            pause_simulation: resolve!(lib, "simxPauseSimulation"),
            stop_simulation: resolve!(lib, "simxStopSimulation"),
            load_scene: resolve!(lib, "simxLoadScene"),
            close_scene: resolve!(lib, "simxCloseScene"),
            get_integer_parameter: resolve!(lib, "simxGetIntegerParameter"),
            get_floating_parameter: resolve!(lib, "simxGetFloatingParameter"),
            get_boolean_parameter: resolve!(lib, "simxGetBooleanParameter"),
            get_string_parameter: resolve!(lib, "simxGetStringParameter"),
            get_in_message_info: resolve!(lib, "simxGetInMessageInfo"),
            get_object_handle: resolve!(lib, "simxGetObjectHandle"),
            get_collection_handle: resolve!(lib, "simxGetCollectionHandle"),
            get_object_position: resolve!(lib, "simxGetObjectPosition"),
            set_object_position: resolve!(lib, "simxSetObjectPosition"),
            get_object_orientation: resolve!(lib, "simxGetObjectOrientation"),
            set_object_orientation: resolve!(lib, "simxSetObjectOrientation"),
            get_object_velocity: resolve!(lib, "simxGetObjectVelocity"),
            get_object_parent: resolve!(lib, "simxGetObjectParent"),
            set_object_parent: resolve!(lib, "simxSetObjectParent"),
            get_object_float_parameter: resolve!(lib, "simxGetObjectFloatParameter"),
            remove_object: resolve!(lib, "simxRemoveObject"),
            copy_paste_objects: resolve!(lib, "simxCopyPasteObjects"),
            get_object_group_data: resolve!(lib, "simxGetObjectGroupData"),
            read_proximity_sensor: resolve!(lib, "simxReadProximitySensor"),
            get_vision_sensor_image: resolve!(lib, "simxGetVisionSensorImage"),
            get_joint_position: resolve!(lib, "simxGetJointPosition"),
            set_joint_position: resolve!(lib, "simxSetJointPosition"),
            set_joint_target_position: resolve!(lib, "simxSetJointTargetPosition"),
            set_joint_target_velocity: resolve!(lib, "simxSetJointTargetVelocity"),
        })
    }
}

/// 基于 V-REP `remoteApi` 动态库的后端
pub struct RemoteApiLibrary {
    symbols: Symbols,
    path: PathBuf,
    // 必须晚于 symbols 释放
    _lib: Library,
}

impl RemoteApiLibrary {
    /// 从指定路径加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RemoteError> {
        let path = path.as_ref().to_path_buf();
        // SAFETY: 加载库会执行其初始化代码；remoteApi 没有特殊的初始化要求
        let lib = unsafe { Library::new(&path) }.map_err(|e| RemoteError::Library {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let symbols = Symbols::resolve(&lib)?;
        info!("Loaded V-REP remote API library from {}", path.display());
        Ok(Self {
            symbols,
            path,
            _lib: lib,
        })
    }

    /// 按默认查找顺序加载
    pub fn load_default() -> Result<Self, RemoteError> {
        if let Some(path) = std::env::var_os(REMOTE_API_ENV) {
            debug!("Using {} from environment", REMOTE_API_ENV);
            return Self::load(PathBuf::from(path));
        }

        let local = Path::new(".").join(REMOTE_API_FILENAME);
        if local.exists() {
            return Self::load(local);
        }

        Self::load(REMOTE_API_FILENAME)
    }

    /// 已加载库的路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RemoteApiLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteApiLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn c_string(value: &str) -> SimxResult<CString> {
    CString::new(value).map_err(|_| ReturnCode::LOCAL_ERROR)
}

/// 复制客户端库内部缓冲区中的数组
///
/// # Safety
///
/// `ptr` 为空或指向至少 `len` 个元素
unsafe fn copy_buffer<T: Copy>(ptr: *const T, len: usize) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    // SAFETY: 由调用方保证
    unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec()
}

/// 客户端库返回的元素个数（负数视为 0）
fn buffer_len(count: i32) -> usize {
    usize::try_from(count).unwrap_or(0)
}

/// 解析连续存放的 `count` 个以 NUL 结尾的字符串
///
/// # Safety
///
/// `ptr` 为空或指向 `count` 个连续的 C 字符串
unsafe fn split_strings(ptr: *const c_char, count: i32) -> Vec<String> {
    let mut strings = Vec::new();
    if ptr.is_null() {
        return strings;
    }
    let mut cursor = ptr;
    for _ in 0..count.max(0) {
        // SAFETY: 由调用方保证
        let value = unsafe { CStr::from_ptr(cursor) };
        let len = value.to_bytes().len();
        strings.push(value.to_string_lossy().into_owned());
        // SAFETY: 跳过字符串本身和结尾的 NUL
        cursor = unsafe { cursor.add(len + 1) };
    }
    strings
}

impl RemoteApi for RemoteApiLibrary {
    fn start(&self, params: &ConnectParams) -> Option<ClientId> {
        let address = CString::new(params.address.as_str()).ok()?;
        // SAFETY: 参数均为值类型或有效的 C 字符串
        let client = unsafe {
            (self.symbols.start)(
                address.as_ptr(),
                i32::from(params.port),
                u8::from(params.wait_until_connected),
                u8::from(params.do_not_reconnect),
                params.timeout_ms,
                params.comm_thread_cycle_ms,
            )
        };
        (client != -1).then_some(ClientId(client))
    }

    fn finish(&self, client: ClientId) {
        // SAFETY: 值类型参数
        unsafe { (self.symbols.finish)(client.0) }
    }

    fn finish_all(&self) {
        // SAFETY: -1 表示关闭所有连接
        unsafe { (self.symbols.finish)(-1) }
    }

    fn get_connection_id(&self, client: ClientId) -> Option<i32> {
        // SAFETY: 值类型参数
        let id = unsafe { (self.symbols.get_connection_id)(client.0) };
        (id != -1).then_some(id)
    }

    fn get_last_cmd_time(&self, client: ClientId) -> i32 {
        // SAFETY: 值类型参数
        unsafe { (self.symbols.get_last_cmd_time)(client.0) }
    }

    fn synchronous(&self, client: ClientId, enable: bool) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.synchronous)(client.0, u8::from(enable)) })
    }

    fn synchronous_trigger(&self, client: ClientId) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.synchronous_trigger)(client.0) })
    }

    fn start_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.start_simulation)(client.0, mode.raw()) })
    }

    fn pause_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.pause_simulation)(client.0, mode.raw()) })
    }

    fn stop_simulation(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.stop_simulation)(client.0, mode.raw()) })
    }

    fn load_scene(
        &self,
        client: ClientId,
        path: &str,
        client_side: bool,
        mode: OpMode,
    ) -> SimxResult<()> {
        let path = c_string(path)?;
        // SAFETY: path 在调用期间有效
        ReturnCode::check(unsafe {
            (self.symbols.load_scene)(client.0, path.as_ptr(), u8::from(client_side), mode.raw())
        })
    }

    fn close_scene(&self, client: ClientId, mode: OpMode) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.close_scene)(client.0, mode.raw()) })
    }

    fn get_integer_parameter(
        &self,
        client: ClientId,
        param: IntParam,
        mode: OpMode,
    ) -> SimxResult<i32> {
        let mut value = 0;
        // SAFETY: 输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_integer_parameter)(client.0, param.into(), &mut value, mode.raw())
        })?;
        Ok(value)
    }

    fn get_floating_parameter(
        &self,
        client: ClientId,
        param: FloatParam,
        mode: OpMode,
    ) -> SimxResult<f32> {
        let mut value = 0.0;
        // SAFETY: 输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_floating_parameter)(client.0, param.into(), &mut value, mode.raw())
        })?;
        Ok(value)
    }

    fn get_boolean_parameter(
        &self,
        client: ClientId,
        param: BoolParam,
        mode: OpMode,
    ) -> SimxResult<bool> {
        let mut value = 0u8;
        // SAFETY: 输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_boolean_parameter)(client.0, param.into(), &mut value, mode.raw())
        })?;
        Ok(value != 0)
    }

    fn get_string_parameter(
        &self,
        client: ClientId,
        param: StringParam,
        mode: OpMode,
    ) -> SimxResult<String> {
        let mut value: *mut u8 = ptr::null_mut();
        // SAFETY: 输出指针指向栈上变量；返回的字符串由客户端库持有
        ReturnCode::check(unsafe {
            (self.symbols.get_string_parameter)(client.0, param.into(), &mut value, mode.raw())
        })?;
        if value.is_null() {
            return Ok(String::new());
        }
        // SAFETY: 成功时 value 指向以 NUL 结尾的字符串
        Ok(unsafe { CStr::from_ptr(value as *const c_char) }
            .to_string_lossy()
            .into_owned())
    }

    fn get_in_message_info(&self, client: ClientId, info: MessageInfo) -> Option<i32> {
        let mut value = 0;
        // SAFETY: 输出指针指向栈上变量
        let res =
            unsafe { (self.symbols.get_in_message_info)(client.0, info.into(), &mut value) };
        (res != -1).then_some(value)
    }

    fn get_object_handle(
        &self,
        client: ClientId,
        name: &str,
        mode: OpMode,
    ) -> SimxResult<ObjectHandle> {
        let name = c_string(name)?;
        let mut handle = -1;
        // SAFETY: name 在调用期间有效，输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_object_handle)(client.0, name.as_ptr(), &mut handle, mode.raw())
        })?;
        Ok(ObjectHandle(handle))
    }

    fn get_collection_handle(
        &self,
        client: ClientId,
        name: &str,
        mode: OpMode,
    ) -> SimxResult<CollectionHandle> {
        let name = c_string(name)?;
        let mut handle = -1;
        // SAFETY: 同上
        ReturnCode::check(unsafe {
            (self.symbols.get_collection_handle)(client.0, name.as_ptr(), &mut handle, mode.raw())
        })?;
        Ok(CollectionHandle(handle))
    }

    fn get_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<[f32; 3]> {
        let mut position = [0.0f32; 3];
        // SAFETY: 输出缓冲区长度为 3
        ReturnCode::check(unsafe {
            (self.symbols.get_object_position)(
                client.0,
                handle.0,
                relative_to.0,
                position.as_mut_ptr(),
                mode.raw(),
            )
        })?;
        Ok(position)
    }

    fn set_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        position: [f32; 3],
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 输入缓冲区长度为 3
        ReturnCode::check(unsafe {
            (self.symbols.set_object_position)(
                client.0,
                handle.0,
                relative_to.0,
                position.as_ptr(),
                mode.raw(),
            )
        })
    }

    fn get_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<[f32; 3]> {
        let mut angles = [0.0f32; 3];
        // SAFETY: 输出缓冲区长度为 3
        ReturnCode::check(unsafe {
            (self.symbols.get_object_orientation)(
                client.0,
                handle.0,
                relative_to.0,
                angles.as_mut_ptr(),
                mode.raw(),
            )
        })?;
        Ok(angles)
    }

    fn set_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        euler_angles: [f32; 3],
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 输入缓冲区长度为 3
        ReturnCode::check(unsafe {
            (self.symbols.set_object_orientation)(
                client.0,
                handle.0,
                relative_to.0,
                euler_angles.as_ptr(),
                mode.raw(),
            )
        })
    }

    fn get_object_velocity(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<([f32; 3], [f32; 3])> {
        let mut linear = [0.0f32; 3];
        let mut angular = [0.0f32; 3];
        // SAFETY: 两个输出缓冲区长度均为 3
        ReturnCode::check(unsafe {
            (self.symbols.get_object_velocity)(
                client.0,
                handle.0,
                linear.as_mut_ptr(),
                angular.as_mut_ptr(),
                mode.raw(),
            )
        })?;
        Ok((linear, angular))
    }

    fn get_object_parent(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<ObjectHandle> {
        let mut parent = -1;
        // SAFETY: 输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_object_parent)(client.0, handle.0, &mut parent, mode.raw())
        })?;
        Ok(ObjectHandle(parent))
    }

    fn set_object_parent(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        parent: ObjectHandle,
        keep_in_place: bool,
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe {
            (self.symbols.set_object_parent)(
                client.0,
                handle.0,
                parent.0,
                u8::from(keep_in_place),
                mode.raw(),
            )
        })
    }

    fn get_object_float_parameter(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        param: ObjectFloatParam,
        mode: OpMode,
    ) -> SimxResult<f32> {
        let mut value = 0.0;
        // SAFETY: 输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_object_float_parameter)(
                client.0,
                handle.0,
                param.into(),
                &mut value,
                mode.raw(),
            )
        })?;
        Ok(value)
    }

    fn remove_object(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe { (self.symbols.remove_object)(client.0, handle.0, mode.raw()) })
    }

    fn copy_paste_objects(
        &self,
        client: ClientId,
        handles: &[ObjectHandle],
        mode: OpMode,
    ) -> SimxResult<Vec<ObjectHandle>> {
        let raw: Vec<i32> = handles.iter().map(|h| h.0).collect();
        let raw_len = i32::try_from(raw.len()).map_err(|_| ReturnCode::LOCAL_ERROR)?;
        let mut new_handles: *mut i32 = ptr::null_mut();
        let mut new_count = 0;
        // SAFETY: 输入缓冲区长度为 raw.len()；输出由客户端库持有
        ReturnCode::check(unsafe {
            (self.symbols.copy_paste_objects)(
                client.0,
                raw.as_ptr(),
                raw_len,
                &mut new_handles,
                &mut new_count,
                mode.raw(),
            )
        })?;
        // SAFETY: 成功时 new_handles 指向 new_count 个句柄
        let copied = unsafe { copy_buffer(new_handles, buffer_len(new_count)) };
        Ok(copied.into_iter().map(ObjectHandle).collect())
    }

    fn get_object_group_data(
        &self,
        client: ClientId,
        object_type: i32,
        data_type: GroupDataType,
        mode: OpMode,
    ) -> SimxResult<GroupData> {
        let mut handles_count = 0;
        let mut handles: *mut i32 = ptr::null_mut();
        let mut int_count = 0;
        let mut int_data: *mut i32 = ptr::null_mut();
        let mut float_count = 0;
        let mut float_data: *mut f32 = ptr::null_mut();
        let mut string_count = 0;
        let mut string_data: *mut c_char = ptr::null_mut();
        // SAFETY: 所有输出指针均指向栈上变量；返回的缓冲区由客户端库持有
        ReturnCode::check(unsafe {
            (self.symbols.get_object_group_data)(
                client.0,
                object_type,
                data_type.into(),
                &mut handles_count,
                &mut handles,
                &mut int_count,
                &mut int_data,
                &mut float_count,
                &mut float_data,
                &mut string_count,
                &mut string_data,
                mode.raw(),
            )
        })?;
        // SAFETY: 成功时各缓冲区长度与对应计数一致
        unsafe {
            Ok(GroupData {
                handles: copy_buffer(handles, buffer_len(handles_count)),
                int_data: copy_buffer(int_data, buffer_len(int_count)),
                float_data: copy_buffer(float_data, buffer_len(float_count)),
                string_data: split_strings(string_data, string_count),
            })
        }
    }

    fn read_proximity_sensor(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        mode: OpMode,
    ) -> SimxResult<ProximityReading> {
        let mut detected = 0u8;
        let mut point = [0.0f32; 3];
        let mut object = -1;
        let mut normal = [0.0f32; 3];
        // SAFETY: 输出缓冲区长度均满足要求
        ReturnCode::check(unsafe {
            (self.symbols.read_proximity_sensor)(
                client.0,
                handle.0,
                &mut detected,
                point.as_mut_ptr(),
                &mut object,
                normal.as_mut_ptr(),
                mode.raw(),
            )
        })?;
        Ok(ProximityReading {
            detected: detected != 0,
            point,
            object,
            surface_normal: normal,
        })
    }

    fn get_vision_sensor_image(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        format: ImageFormat,
        mode: OpMode,
    ) -> SimxResult<VisionImage> {
        let mut resolution = [0i32; 2];
        let mut image: *mut u8 = ptr::null_mut();
        // SAFETY: 分辨率缓冲区长度为 2；图像由客户端库持有
        ReturnCode::check(unsafe {
            (self.symbols.get_vision_sensor_image)(
                client.0,
                handle.0,
                resolution.as_mut_ptr(),
                &mut image,
                format.options(),
                mode.raw(),
            )
        })?;
        let (width, height) = (buffer_len(resolution[0]), buffer_len(resolution[1]));
        let len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(format.channels()))
            .ok_or(ReturnCode::LOCAL_ERROR)?;
        let resolution = [resolution[0].max(0) as u32, resolution[1].max(0) as u32];
        // SAFETY: 成功时 image 指向 宽 x 高 x 通道数 个字节
        let data = unsafe { copy_buffer(image, len) };
        Ok(VisionImage {
            resolution,
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
        let mut position = 0.0;
        // SAFETY: 输出指针指向栈上变量
        ReturnCode::check(unsafe {
            (self.symbols.get_joint_position)(client.0, handle.0, &mut position, mode.raw())
        })?;
        Ok(position)
    }

    fn set_joint_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        position: f32,
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe {
            (self.symbols.set_joint_position)(client.0, handle.0, position, mode.raw())
        })
    }

    fn set_joint_target_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        position: f32,
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe {
            (self.symbols.set_joint_target_position)(client.0, handle.0, position, mode.raw())
        })
    }

    fn set_joint_target_velocity(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        velocity: f32,
        mode: OpMode,
    ) -> SimxResult<()> {
        // SAFETY: 值类型参数
        ReturnCode::check(unsafe {
            (self.symbols.set_joint_target_velocity)(client.0, handle.0, velocity, mode.raw())
        })
    }
}
