use super::*;
use crate::rules::{FieldFacts, evaluate_form};

impl Page {
    pub(super) fn validate_submission(&mut self, event: &mut EventState) -> Result<()> {
        let form = event.target;
        if !self.dom.is_tag(form, "form") {
            return Ok(());
        }

        let facts = self.field_facts(form);
        let report = evaluate_form(&facts)?;

        for (field, verdict) in report.entries() {
            match verdict {
                Some(violation) => self.mark_invalid(*field, violation.message())?,
                None => self.clear_invalid(*field)?,
            }
        }

        let failed = report.violations().count();
        let label = self.dom.node_label(form);
        self.trace_line(format!(
            "[enhance] validate form={label} checked={} failed={failed}",
            report.len()
        ));

        if !report.is_valid() {
            event.default_prevented = true;
            event.propagation_stopped = true;
        }
        Ok(())
    }

    fn field_facts(&self, form: NodeId) -> Vec<FieldFacts<NodeId>> {
        self.form_fields(form)
            .into_iter()
            .filter_map(|field| {
                let element = self.dom.element(field)?;
                let value = self.dom.value(field).ok()?;
                let is_input = element.tag_name == "input";
                Some(FieldFacts {
                    key: field,
                    is_input,
                    required: element.attrs.contains_key("required"),
                    email: is_input && input_type(element) == "email",
                    name: element.attrs.get("name").cloned(),
                    value,
                })
            })
            .collect()
    }
}
