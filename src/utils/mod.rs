pub mod activity_log;
pub mod copy;
pub mod directory;
pub mod progress;
