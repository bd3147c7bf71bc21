/// Logging capability handed to the backup store at construction.
/// The host process owns the sink and its lifecycle.
pub trait ActivityLog {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

impl<L: ActivityLog + ?Sized> ActivityLog for &L {
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Forwards to the `log` facade under a fixed target
#[derive(Debug, Clone, Copy)]
pub struct LogFacade {
    target: &'static str,
}

impl LogFacade {
    pub fn new(target: &'static str) -> Self {
        LogFacade { target }
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        LogFacade::new("backup_store")
    }
}

impl ActivityLog for LogFacade {
    fn info(&self, message: &str) {
        log::info!(target: self.target, "{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!(target: self.target, "{}", message);
    }

    fn error(&self, message: &str) {
        log::error!(target: self.target, "{}", message);
    }
}

#[cfg(test)]
pub use recording::RecordingLog;
