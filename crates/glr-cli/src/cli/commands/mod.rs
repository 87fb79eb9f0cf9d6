//! CLI command handlers. Each command is in its own file.

mod bump;
mod check;
mod checksum;
mod completions;
mod import;
mod install;
mod probe;
mod render;
mod smoke;
mod verify;

pub use bump::run_bump;
pub use check::run_check;
pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use import::run_import;
pub use install::{run_install, InstallArgs};
pub use probe::run_probe;
pub use render::run_render;
pub use smoke::run_smoke;
pub use verify::run_verify;
