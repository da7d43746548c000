#![forbid(unsafe_code)]

pub mod achievement_service;
pub mod app_services;
pub mod attempt;
pub mod completion;
pub mod error;
pub mod fetched;
pub mod gate;
mod locks;
pub mod progress_service;
pub mod user_service;

pub use trilha_core::Clock;

pub use achievement_service::AchievementService;
pub use app_services::AppServices;
pub use attempt::AttemptTracker;
pub use completion::{CompletionService, ModuleCompletion, ModuleCompletionInput};
pub use error::CompletionError;
pub use fetched::{Fetched, Source};
pub use gate::GateService;
pub use progress_service::ProgressService;
pub use user_service::UserService;
