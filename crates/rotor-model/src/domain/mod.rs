mod task_handle;
pub use task_handle::TaskHandle;

mod task_spec;
pub use task_spec::{DEFAULT_INTERVAL_SECS, TaskSpec};

mod task_state;
pub use task_state::TaskState;

mod task_view;
pub use task_view::TaskView;

mod lines;
pub use lines::parse_lines;

/// Interval between attempts, in whole seconds.
pub type IntervalSecs = u64;
