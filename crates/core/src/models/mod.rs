//! Record kinds managed by freshcache repositories.

mod log;
mod plant;
mod task;
mod title;

pub use log::Log;
pub use plant::{GrowZone, Plant};
pub use task::Task;
pub use title::Title;
