use crate::error::{GanttError, GanttResult};

use super::{ColumnsManager, ColumnsObserver};

impl ColumnsManager {
    /// Registers an observer with unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn ColumnsObserver>) -> GanttResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(GanttError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(GanttError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        match self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            Some(position) => {
                self.observers.remove(position);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }
}
