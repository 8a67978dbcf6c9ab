/// Fire-and-forget hook the HTTP callers invoke after a successful commit
/// with the logical paths whose cached views went stale. The engine itself
/// never calls this.
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, paths: &[String]);
}

/// Default sink: record the paths in the log. Deployments with a real view
/// cache plug their own implementation into `AppState`.
#[derive(Debug, Default)]
pub struct LogViewInvalidator;

impl ViewInvalidator for LogViewInvalidator {
    fn invalidate(&self, paths: &[String]) {
        log::debug!("invalidating cached views: {paths:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    impl ViewInvalidator for Recording {
        fn invalidate(&self, paths: &[String]) {
            self.seen.lock().expect("lock").extend_from_slice(paths);
        }
    }

    #[test]
    fn custom_invalidators_receive_every_path() {
        let recorder = Recording::default();
        recorder.invalidate(&["/crm/leads/1".to_string(), "/crm/calendar".to_string()]);
        let seen = recorder.seen.lock().expect("lock");
        assert_eq!(seen.len(), 2);
    }
}
