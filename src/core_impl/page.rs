use super::*;

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, EnhancerConfig::default())
    }

    /// Parses `html` and installs the enhancer as if the document had just
    /// finished loading.
    pub fn from_html_with_config(html: &str, config: EnhancerConfig) -> Result<Self> {
        let enhancer = FormEnhancer::new(config)?;
        let dom = parse_html(html)?;
        let mut page = Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            platform_mocks: PlatformMockState::default(),
            outcomes: OutcomeState::default(),
            trace_state: TraceState::default(),
            enhancer,
        };
        page.install_enhancer()?;
        Ok(page)
    }

    /// Detaches the first element matching `selector`, the way page script
    /// removing a node would. Pending enhancer timers are left alone.
    pub fn remove_element(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.remove_node(target)
    }

    /// Sets an attribute on the first element matching `selector`, the way
    /// page script would after load.
    pub fn set_attribute(&mut self, selector: &str, name: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_attr(target, name, value)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector).map(|_| ())
    }

    pub fn assert_missing(&self, selector: &str) -> Result<()> {
        if let Some(found) = self.dom.query_selector(selector)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: "element found".into(),
                dom_snippet: self.node_snippet(found),
            });
        }
        Ok(())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str) -> Result<()> {
        self.assert_class_state(selector, class_name, true)
    }

    pub fn assert_lacks_class(&self, selector: &str, class_name: &str) -> Result<()> {
        self.assert_class_state(selector, class_name, false)
    }

    fn assert_class_state(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name);
        if actual != expected {
            let describe = |present: bool| {
                if present {
                    format!("class {class_name:?} present")
                } else {
                    format!("class {class_name:?} absent")
                }
            };
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe(expected),
                actual: describe(actual),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    /// Text of the error annotation following the matched field.
    pub fn feedback_for(&self, selector: &str) -> Result<Option<String>> {
        let field = self.select_one(selector)?;
        Ok(self
            .annotation_for(field)
            .map(|annotation| self.dom.text_content(annotation)))
    }

    /// Number of annotations directly following the matched field. More
    /// than one only happens if markup already carried them.
    pub fn annotation_count(&self, selector: &str) -> Result<usize> {
        let field = self.select_one(selector)?;
        let feedback_class = &self.enhancer.config().feedback_class;
        let mut count = 0;
        let mut cursor = self.dom.next_element_sibling(field);
        while let Some(sibling) = cursor {
            if !self.dom.class_contains(sibling, feedback_class) {
                break;
            }
            count += 1;
            cursor = self.dom.next_element_sibling(sibling);
        }
        Ok(count)
    }

    pub(crate) fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }
}
