use super::*;

impl Page {
    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn tag_of(&self, node: NodeId) -> String {
        self.dom.tag_name(node).unwrap_or("#text").to_string()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let tag = self.tag_of(target);
        if !matches!(tag.as_str(), "input" | "textarea") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let tag = self.tag_of(target);
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }
        if self.dom.disabled(target) {
            return Ok(());
        }

        self.dom.set_value(target, value)?;
        self.dispatch_event(target, "input")?;
        self.dispatch_event(target, "change")?;
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.disabled(node) || self.dom.active_element == Some(node) {
            return Ok(());
        }
        if let Some(current) = self.dom.active_element {
            self.blur_node(current)?;
        }
        self.dom.active_element = Some(node);
        self.dispatch_event(node, "focusin")?;
        self.dispatch_event(node, "focus")?;
        Ok(())
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target)
    }

    pub(crate) fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.active_element != Some(node) {
            return Ok(());
        }
        self.dispatch_event(node, "focusout")?;
        self.dispatch_event(node, "blur")?;
        if self.dom.active_element == Some(node) {
            self.dom.active_element = None;
        }
        Ok(())
    }

    /// Focuses a field, replaces its text, and moves focus away: the usual
    /// way a user fills one field before the next.
    pub fn fill(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)?;
        self.type_text(selector, text)?;
        self.blur_node(target)
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }

        let event = self.dispatch_event(target, "click")?;
        if event.default_prevented {
            return Ok(());
        }

        let submit_control = self
            .dom
            .element(target)
            .is_some_and(is_submit_control);
        if submit_control {
            if let Some(form) = self.resolve_form(target) {
                self.request_submit(form)?;
            }
            return Ok(());
        }

        if let Some(anchor) = self.dom.closest(target, "a[href]")? {
            let href = self.dom.attr(anchor, "href").unwrap_or_default();
            self.outcomes.navigations.push(Navigation { href });
        }
        Ok(())
    }

    /// Submits the form matched by `selector`, or the form owning the
    /// matched control.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = self
            .resolve_form(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.tag_of(target),
            })?;
        self.request_submit(form)
    }

    fn request_submit(&mut self, form: NodeId) -> Result<()> {
        let event = self.dispatch_event(form, "submit")?;
        if event.default_prevented {
            return Ok(());
        }
        let submission = FormSubmission {
            form: self.form_label(form),
            fields: self.form_data(form)?,
        };
        self.outcomes.submissions.push(submission);
        Ok(())
    }

    pub(crate) fn resolve_form(&self, node: NodeId) -> Option<NodeId> {
        if self.dom.is_tag(node, "form") {
            return Some(node);
        }
        if let Some(form_id) = self.dom.attr(node, "form") {
            let owner = self
                .dom
                .all_element_nodes()
                .into_iter()
                .find(|candidate| {
                    self.dom.is_tag(*candidate, "form")
                        && self.dom.attr(*candidate, "id").as_deref() == Some(form_id.as_str())
                });
            if owner.is_some() {
                return owner;
            }
        }
        let mut cursor = self.dom.parent(node);
        while let Some(current) = cursor {
            if self.dom.is_tag(current, "form") {
                return Some(current);
            }
            cursor = self.dom.parent(current);
        }
        None
    }

    fn form_label(&self, form: NodeId) -> String {
        if let Some(id) = self.dom.attr(form, "id").filter(|id| !id.is_empty()) {
            return format!("#{id}");
        }
        if let Some(name) = self.dom.attr(form, "name").filter(|name| !name.is_empty()) {
            return format!("form[name={name}]");
        }
        "form".to_string()
    }

    /// Fields inside `form`, in document order.
    pub(crate) fn form_fields(&self, form: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        self.dom.collect_elements_descendants_dfs(form, &mut nodes);
        nodes
            .into_iter()
            .filter(|node| self.dom.tag_name(*node).is_some_and(is_field_tag))
            .collect()
    }

    fn form_data(&self, form: NodeId) -> Result<Vec<(String, String)>> {
        let mut data = Vec::new();
        for field in self.form_fields(form) {
            let Some(element) = self.dom.element(field) else {
                continue;
            };
            let Some(name) = element.attrs.get("name").filter(|name| !name.is_empty()) else {
                continue;
            };
            if self.dom.disabled(field) {
                continue;
            }
            if element.tag_name == "input" {
                let kind = input_type(element);
                if matches!(kind.as_str(), "submit" | "button" | "reset" | "image") {
                    continue;
                }
                if matches!(kind.as_str(), "checkbox" | "radio")
                    && !element.attrs.contains_key("checked")
                {
                    continue;
                }
            }
            data.push((name.clone(), self.dom.value(field)?));
        }
        Ok(data)
    }

    /// Answers a confirmation prompt from the queued responses, falling back
    /// to the default response.
    pub(crate) fn confirm_dialog(&mut self, message: &str) -> bool {
        self.platform_mocks
            .confirm_messages
            .push(message.to_string());
        self.platform_mocks
            .confirm_responses
            .pop_front()
            .unwrap_or(self.platform_mocks.default_confirm_response)
    }

    pub fn enqueue_confirm_response(&mut self, accepted: bool) {
        self.platform_mocks.confirm_responses.push_back(accepted);
    }

    pub fn set_default_confirm_response(&mut self, accepted: bool) {
        self.platform_mocks.default_confirm_response = accepted;
    }

    pub fn take_confirm_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.confirm_messages)
    }

    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.outcomes.submissions)
    }

    pub fn take_navigations(&mut self) -> Vec<Navigation> {
        std::mem::take(&mut self.outcomes.navigations)
    }
}
