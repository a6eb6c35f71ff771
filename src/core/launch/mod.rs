pub mod args;
pub mod script;

pub use args::{resolve_arguments, LaunchDefaults, ResolvedArgs};
pub use script::{render_launch_script, write_launch_script, ScriptKind, ScriptVars};
