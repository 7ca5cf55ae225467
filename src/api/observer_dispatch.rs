use super::{ColumnsContext, ColumnsEvent, ColumnsManager};

impl ColumnsManager {
    #[must_use]
    pub fn columns_context(&self) -> ColumnsContext {
        ColumnsContext {
            from: self.from,
            to: self.to,
            columns_len: self.columns.len(),
            previous_columns_len: self.previous_columns.len(),
            next_columns_len: self.next_columns.len(),
            width: self.width,
            original_width: self.original_width,
            width_factor: self.width_factor,
        }
    }

    pub(super) fn emit_columns_event(&mut self, event: ColumnsEvent) {
        let context = self.columns_context();
        for observer in &mut self.observers {
            observer.on_event(event, context);
        }
    }
}
