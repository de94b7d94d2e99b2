// relhydro\crates\rh_physics\src/tasks/mod.rs

//! 任务图与单块流体任务链

pub mod hydro_tasks;
pub mod task_list;

pub use hydro_tasks::{HydroBlock, HydroTaskIds};
pub use task_list::{TaskFn, TaskGraphError, TaskId, TaskList, TaskStatus};
