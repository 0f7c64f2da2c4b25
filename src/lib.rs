pub mod badges;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardState, OperationError, View};
pub use database::Database;
pub use models::{Habit, HabitLog, LogStatus, Task};
pub use store::{ErrorKind, HabitStore, Session, StoreError};
pub use utils::Profile;
