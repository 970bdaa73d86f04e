// Application Layer - Use Cases and Business Logic

pub mod dispatch;
pub mod orchestrator;
pub mod submission;
pub mod worker;

// Re-exports
pub use dispatch::{BackendSet, Dispatcher};
pub use orchestrator::{JobSnapshot, Orchestrator};
pub use submission::SubmitRequest;
pub use worker::{shutdown_channel, ShutdownSender, ShutdownToken, Worker};
