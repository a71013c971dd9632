use super::*;
use crate::rules::is_blank;

impl Page {
    fn feedback_field(&self, target: NodeId) -> Option<NodeId> {
        let tag = self.dom.tag_name(target)?;
        (is_field_tag(tag) && self.enclosing_form(target).is_some()).then_some(target)
    }

    /// Only presence is rechecked here; format and confirmation wait for
    /// the next submission.
    pub(super) fn required_on_blur(&mut self, event: &mut EventState) -> Result<()> {
        let Some(field) = self.feedback_field(event.target) else {
            return Ok(());
        };
        let value = self.dom.value(field)?;
        if self.dom.required(field) && is_blank(&value) {
            self.mark_invalid_class_only(field)
        } else {
            self.clear_invalid(field)
        }
    }

    pub(super) fn clear_on_input(&mut self, event: &mut EventState) -> Result<()> {
        let Some(field) = self.feedback_field(event.target) else {
            return Ok(());
        };
        let invalid_class = &self.enhancer.config.invalid_class;
        if !self.dom.class_contains(field, invalid_class) {
            return Ok(());
        }
        if is_blank(&self.dom.value(field)?) {
            return Ok(());
        }
        self.clear_invalid(field)
    }

    // blur flags the field without inserting an annotation
    fn mark_invalid_class_only(&mut self, field: NodeId) -> Result<()> {
        let invalid_class = self.enhancer.config.invalid_class.clone();
        if self.dom.class_contains(field, &invalid_class) {
            return Ok(());
        }
        self.dom.class_add(field, &invalid_class)?;
        let label = self.dom.node_label(field);
        self.trace_line(format!("[enhance] flag field={label} reason=blur"));
        Ok(())
    }
}
