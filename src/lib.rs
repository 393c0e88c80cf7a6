/// Crisis Command - Crisis-Management Training Engine
///
/// Core library providing the exercise orchestrator, crisis state tracking,
/// stakeholder memory, dynamic event generation, and the external LLM and
/// voice glue for crisis-management training sessions.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
