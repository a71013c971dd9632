use super::*;

impl Page {
    /// Prompts before a guarded control's default action and cancels the
    /// action when the prompt is declined. Propagation is left alone.
    pub(super) fn guard_destructive_click(&mut self, event: &mut EventState) -> Result<()> {
        let selector = self.enhancer.config.confirm_selector();
        let Some(control) = self.dom.closest(event.target, &selector)? else {
            return Ok(());
        };
        if self.dom.disabled(control) {
            return Ok(());
        }

        let marker = self.dom.attr(control, &self.enhancer.config.confirm_attribute);
        let message = self
            .enhancer
            .config
            .prompt_for(marker.as_deref())
            .to_string();
        let accepted = self.confirm_dialog(&message);
        let label = self.dom.node_label(control);
        self.trace_line(format!(
            "[enhance] confirm control={label} accepted={accepted}"
        ));

        if !accepted {
            event.default_prevented = true;
        }
        Ok(())
    }
}
