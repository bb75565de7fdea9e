pub mod scheduler;

pub use scheduler::BackgroundScheduler;
