//! # 数据交换桥
//!
//! 把外部按固定步长运行的仿真（例如神经网络仿真器）与 V-REP 同步模式仿真对接：
//! 外部仿真每走 `steps_per_sim_step` 步，桥就
//!
//! 1. 把输入向量 `x` 按注册顺序切片，依次交给输入处理函数（通常写入电机速度）
//! 2. 依次调用输出处理函数（通常读取传感器），拼接成输出向量
//! 3. 触发一个 V-REP 仿真步
//!
//! 其余步直接返回上一次的输出。第一次调用总会交换数据。
//!
//! # 示例
//!
//! ```rust,no_run
//! use vrepsim_client::{PioneerBot, SimulatorBuilder, StepExchange};
//! use std::sync::Arc;
//!
//! # fn main() -> vrepsim_client::Result<()> {
//! let sim = SimulatorBuilder::new().connect()?;
//! let bot = Arc::new(PioneerBot::with_default_names(&sim)?);
//!
//! let mut exchange = StepExchange::new(&sim, 10)?;
//! let wheels = Arc::clone(&bot);
//! exchange.add_input(move |x| wheels.set_wheel_velocities(x[0] as f32, x[1] as f32), 2);
//! let sonar = Arc::clone(&bot);
//! exchange.add_output(
//!     move || {
//!         Ok(sonar
//!             .get_sonar_distances()?
//!             .into_iter()
//!             .map(|d| d.map_or(0.0, f64::from))
//!             .collect())
//!     },
//!     16,
//! );
//!
//! sim.start_sim()?;
//! let output = exchange.update(0.001, &[1.0, 1.0])?;
//! assert_eq!(output.len(), 16);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, VrepError};
use crate::simulator::Simulator;
use std::fmt;
use tracing::trace;

type InputHandler = Box<dyn FnMut(&[f64]) -> Result<()> + Send>;
type OutputHandler = Box<dyn FnMut() -> Result<Vec<f64>> + Send>;

/// 步进数据交换桥
pub struct StepExchange {
    sim: Simulator,
    inputs: Vec<(InputHandler, usize)>,
    outputs: Vec<(OutputHandler, usize)>,
    size_in: usize,
    size_out: usize,
    output: Vec<f64>,
    steps_per_sim_step: u32,
    countdown: u32,
}

impl fmt::Debug for StepExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepExchange")
            .field("size_in", &self.size_in)
            .field("size_out", &self.size_out)
            .field("steps_per_sim_step", &self.steps_per_sim_step)
            .field("countdown", &self.countdown)
            .finish_non_exhaustive()
    }
}

impl StepExchange {
    /// `steps_per_sim_step`: 外部仿真每多少步对应一个 V-REP 仿真步，必须大于 0
    pub fn new(sim: &Simulator, steps_per_sim_step: u32) -> Result<Self> {
        if steps_per_sim_step == 0 {
            return Err(VrepError::InvalidArgument(
                "steps_per_sim_step must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            sim: sim.clone(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            size_in: 0,
            size_out: 0,
            output: Vec::new(),
            steps_per_sim_step,
            countdown: 1,
        })
    }

    /// 注册输入处理函数，占用输入向量中接下来的 `dimensions` 个元素
    pub fn add_input(
        &mut self,
        handler: impl FnMut(&[f64]) -> Result<()> + Send + 'static,
        dimensions: usize,
    ) {
        self.inputs.push((Box::new(handler), dimensions));
        self.size_in += dimensions;
    }

    /// 注册输出处理函数，必须每次返回 `dimensions` 个值
    ///
    /// 在第一次交换之前，对应的输出为 0。
    pub fn add_output(
        &mut self,
        handler: impl FnMut() -> Result<Vec<f64>> + Send + 'static,
        dimensions: usize,
    ) {
        self.outputs.push((Box::new(handler), dimensions));
        self.size_out += dimensions;
        self.output.resize(self.size_out, 0.0);
    }

    /// 输入向量维度
    pub fn size_in(&self) -> usize {
        self.size_in
    }

    /// 输出向量维度
    pub fn size_out(&self) -> usize {
        self.size_out
    }

    /// 最近一次交换得到的输出（第一次交换之前全为 0）
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn steps_per_sim_step(&self) -> u32 {
        self.steps_per_sim_step
    }

    /// 外部仿真走一步
    ///
    /// `t` 为外部仿真时间（秒），只用于日志。
    pub fn update(&mut self, t: f64, x: &[f64]) -> Result<&[f64]> {
        if x.len() < self.size_in {
            return Err(VrepError::InvalidArgument(format!(
                "expected {} input values, got {}",
                self.size_in,
                x.len()
            )));
        }

        if self.countdown > 1 {
            self.countdown -= 1;
            return Ok(&self.output);
        }

        let mut start = 0;
        for (handler, dimensions) in &mut self.inputs {
            handler(&x[start..start + *dimensions])?;
            start += *dimensions;
        }

        let mut output = Vec::with_capacity(self.size_out);
        for (index, (handler, dimensions)) in self.outputs.iter_mut().enumerate() {
            let values = handler()?;
            if values.len() != *dimensions {
                return Err(VrepError::InvalidArgument(format!(
                    "output handler {} returned {} values, expected {}",
                    index,
                    values.len(),
                    dimensions
                )));
            }
            output.extend(values);
        }
        self.output = output;

        self.sim.trig_sim_step()?;
        // 交换失败时保持计数，下一次调用重试
        self.countdown = self.steps_per_sim_step;
        trace!("Exchanged data at t = {:.4}s", t);

        Ok(&self.output)
    }
}
