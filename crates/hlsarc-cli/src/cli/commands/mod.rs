//! CLI command handlers. Each command is in its own file.

mod completions;
mod download;
mod fetch;
mod inspect;
mod resume;
mod status;

pub use completions::{run_completions, run_man};
pub use fetch::run_fetch;
pub use inspect::run_inspect;
pub use resume::run_resume;
pub use status::run_status;
