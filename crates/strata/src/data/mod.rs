//! Small containers used by the layout stages.

mod list;
mod priority_queue;

pub use list::{Handle, List};
pub use priority_queue::{PriorityQueue, QueueError};
