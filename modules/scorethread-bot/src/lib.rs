pub mod app;
pub mod gateway;
pub mod scheduler;
pub mod sources;

pub use app::build_engine;
pub use gateway::DiscordGateway;
pub use scheduler::Scheduler;
