// relhydro\crates\rh_physics\src/tasks/task_list.rs

//! 任务图
//!
//! 任务以整数句柄 [`TaskId`] 索引，前置任务只能引用已添加的任务，
//! 因此图在构造时即无环。每一轮调度基于轮初快照：
//! 只有前置任务在轮初全部完成的任务才会在本轮执行。
//! 若所有任务一次即完成，所需轮数恰为最长依赖链的长度。

use thiserror::Error;

use crate::driver::DriverContext;

/// 任务句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    /// 句柄下标
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    /// 尚未执行
    #[default]
    Pending,
    /// 已执行但未完成，下一轮重试
    Incomplete,
    /// 已完成
    Complete,
}

impl TaskStatus {
    /// 是否完成
    #[inline]
    pub fn is_complete(self) -> bool {
        self == TaskStatus::Complete
    }

    /// 两个状态的合取：都完成才算完成
    #[inline]
    pub fn and(self, other: TaskStatus) -> TaskStatus {
        if self.is_complete() && other.is_complete() {
            TaskStatus::Complete
        } else {
            TaskStatus::Incomplete
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        };
        write!(f, "{}", s)
    }
}

/// 任务图错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskGraphError {
    /// 前置任务句柄不存在
    #[error("任务 '{task}' 的前置任务 {prerequisite} 不存在")]
    UnknownPrerequisite {
        /// 任务名
        task: &'static str,
        /// 前置句柄下标
        prerequisite: usize,
    },
}

/// 任务函数：上下文、驱动信息、子步编号（从 1 开始）
pub type TaskFn<C> = fn(&mut C, &DriverContext, usize) -> TaskStatus;

struct Task<C> {
    name: &'static str,
    func: TaskFn<C>,
    prerequisites: Vec<TaskId>,
    status: TaskStatus,
}

/// 任务列表
pub struct TaskList<C> {
    tasks: Vec<Task<C>>,
}

impl<C> Default for TaskList<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for TaskList<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tasks.iter().map(|t| (t.name, t.status)))
            .finish()
    }
}

impl<C> TaskList<C> {
    /// 空列表
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// 添加任务
    pub fn add_task(
        &mut self,
        name: &'static str,
        func: TaskFn<C>,
        prerequisites: &[TaskId],
    ) -> Result<TaskId, TaskGraphError> {
        let id = TaskId(self.tasks.len());
        if let Some(bad) = prerequisites.iter().find(|p| p.0 >= id.0) {
            return Err(TaskGraphError::UnknownPrerequisite { task: name, prerequisite: bad.0 });
        }
        self.tasks.push(Task { name, func, prerequisites: prerequisites.to_vec(), status: TaskStatus::Pending });
        Ok(id)
    }

    /// 任务个数
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 任务名
    pub fn name(&self, id: TaskId) -> Option<&'static str> {
        self.tasks.get(id.0).map(|t| t.name)
    }

    /// 任务状态
    pub fn status(&self, id: TaskId) -> Option<TaskStatus> {
        self.tasks.get(id.0).map(|t| t.status)
    }

    /// 全部置为 Pending（每个子步开始时调用）
    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.status = TaskStatus::Pending;
        }
    }

    /// 是否全部完成
    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(|t| t.status.is_complete())
    }

    /// 执行一轮调度，返回本轮完成的任务数
    pub fn execute_pass(&mut self, ctx: &mut C, driver: &DriverContext, stage: usize) -> usize {
        let snapshot: Vec<bool> = self.tasks.iter().map(|t| t.status.is_complete()).collect();
        let mut completed = 0;
        for task in &mut self.tasks {
            if task.status.is_complete() {
                continue;
            }
            if !task.prerequisites.iter().all(|p| snapshot[p.0]) {
                continue;
            }
            task.status = (task.func)(ctx, driver, stage);
            if task.status.is_complete() {
                completed += 1;
            }
        }
        completed
    }

    /// 最长依赖链的任务数
    pub fn longest_chain(&self) -> usize {
        let mut depth = vec![0usize; self.tasks.len()];
        for (i, task) in self.tasks.iter().enumerate() {
            depth[i] = 1 + task.prerequisites.iter().map(|p| depth[p.0]).max().unwrap_or(0);
        }
        depth.into_iter().max().unwrap_or(0)
    }
}
