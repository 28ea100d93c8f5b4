//! Hooks for watching tables as they move through a run.

use polars::prelude::DataFrame;

/// Receives each intermediate table of a pipeline run.
///
/// Stages never print; whatever a caller wants to see of the data goes
/// through an observer.
pub trait StageObserver {
    fn on_table(&self, label: &str, table: &DataFrame);
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_table(&self, _label: &str, _table: &DataFrame) {}
}

/// Logs row counts at debug level and full tables at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn on_table(&self, label: &str, table: &DataFrame) {
        tracing::debug!(label, rows = table.height(), "Stage output");
        tracing::trace!("{label}:\n{table}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records the labels it sees, in order.
    #[derive(Default)]
    pub(crate) struct LabelRecorder {
        pub labels: RefCell<Vec<(String, usize)>>,
    }

    impl StageObserver for LabelRecorder {
        fn on_table(&self, label: &str, table: &DataFrame) {
            self.labels
                .borrow_mut()
                .push((label.to_owned(), table.height()));
        }
    }

    #[test]
    fn test_recorder_collects_labels() {
        let recorder = LabelRecorder::default();
        let df = DataFrame::empty();
        recorder.on_table("a", &df);
        NoopObserver.on_table("b", &df);
        TracingObserver.on_table("c", &df);
        assert_eq!(recorder.labels.borrow().as_slice(), &[("a".to_owned(), 0)]);
    }
}
