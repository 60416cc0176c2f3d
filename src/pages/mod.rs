mod active;
mod auth;
mod dashboard;
mod history;
mod routines;

pub use active::ActiveWorkout;
pub use auth::Login;
pub use dashboard::Dashboard;
pub use history::History;
pub use routines::Routines;
