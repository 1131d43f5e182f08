use crate::{Store, Subscription};

#[cfg(test)]
mod tests;

/// Severity the [`attach`] observers log at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Trace,
    Debug,
    Warn,
    Info,
}

impl LogLevel {
    pub fn log<S: AsRef<str>>(&self, message: S) {
        match self {
            LogLevel::Trace => log::trace!("{}", message.as_ref()),
            LogLevel::Debug => log::debug!("{}", message.as_ref()),
            LogLevel::Warn => log::warn!("{}", message.as_ref()),
            LogLevel::Info => log::info!("{}", message.as_ref()),
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

/// Logs `store` activity through the `log` facade.
///
/// Every write logs the incoming snapshot before it is committed, and every
/// flush logs the delivered snapshot. Dropping the returned subscription
/// stops the flush messages; the write-side hook stays for the life of the
/// store.
pub fn attach(store: &Store, level: LogLevel) -> Subscription {
    store.before_transform(move |next| level.log(format!("next snapshot: {next:?}")));
    store.watch(move |snapshot| level.log(format!("flush: {snapshot:?}")))
}
