pub mod clock;
pub mod credentials;
pub mod escalation;
pub mod events;
pub mod exercise;
pub mod generator;
pub mod llm;
pub mod logging;
pub mod messages;
pub mod scenario;
pub mod stakeholder;
pub mod state;
pub mod timeline;
pub mod voice;
