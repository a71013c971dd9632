use super::html::is_void_tag;
use super::*;

// Recursive walks grow the stack on demand so deeply nested markup cannot
// overflow it.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            active_element: None,
        }
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let element = Element {
            tag_name,
            attrs,
            value,
        };
        self.create_node(Some(parent), NodeType::Element(element))
    }

    pub(crate) fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        let element = Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: HashMap::new(),
            value: String::new(),
        };
        self.create_node(None, NodeType::Element(element))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or_err(&self, node_id: NodeId, operation: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::Runtime(format!("{operation} target is not an element")))
    }

    fn element_mut_or_err(&mut self, node_id: NodeId, operation: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::Runtime(format!("{operation} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document | NodeType::Element(_) => self.nodes[node_id.0]
                    .children
                    .iter()
                    .map(|child| self.text_content(*child))
                    .collect(),
                NodeType::Text(text) => text.clone(),
            }
        })
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_or_err(node_id, "textContent")?;
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    /// Live value of a control. Checkboxes and radios without a `value`
    /// attribute read as `"on"`, checked or not.
    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self.element_or_err(node_id, "value")?;
        if is_checkbox_or_radio_input_element(element) && !element.attrs.contains_key("value") {
            return Ok("on".to_string());
        }
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.is_tag(node_id, "select") {
            return self.set_select_value(node_id, value);
        }
        self.element_mut_or_err(node_id, "value")?.value = value.to_string();
        Ok(())
    }

    /// Seeds live values that markup expresses as content rather than a
    /// `value` attribute.
    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            if self.is_tag(node, "textarea") {
                let text = self.text_content(node);
                self.element_mut_or_err(node, "textarea")?.value = text;
            } else if self.is_tag(node, "select") {
                let value = self.select_value_from_options(node)?;
                self.element_mut_or_err(node, "select")?.value = value;
            }
        }
        Ok(())
    }

    fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        self.collect_elements_descendants_dfs(select_node, &mut descendants);
        descendants
            .into_iter()
            .filter(|node| self.is_tag(*node, "option"))
            .collect()
    }

    fn option_value(&self, option_node: NodeId) -> String {
        self.attr(option_node, "value")
            .unwrap_or_else(|| self.text_content(option_node).trim().to_string())
    }

    fn select_value_from_options(&self, select_node: NodeId) -> Result<String> {
        let options = self.select_options(select_node);
        let selected = options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied());
        Ok(selected
            .map(|option| self.option_value(option))
            .unwrap_or_default())
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let options = self.select_options(select_node);
        let matched = options
            .iter()
            .copied()
            .find(|option| self.option_value(*option) == requested);
        for option in options {
            let element = self.element_mut_or_err(option, "option")?;
            if Some(option) == matched {
                element
                    .attrs
                    .insert("selected".to_string(), "true".to_string());
            } else {
                element.attrs.remove("selected");
            }
        }
        let value = matched
            .map(|option| self.option_value(option))
            .unwrap_or_default();
        self.element_mut_or_err(select_node, "select")?.value = value;
        Ok(())
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "setAttribute")?;
        let lowered = name.to_ascii_lowercase();
        if lowered == "value" {
            element.value = value.to_string();
        }
        element.attrs.insert(lowered, value.to_string());
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.has_attr(node_id, "disabled")
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.has_attr(node_id, "readonly")
    }

    pub(crate) fn required(&self, node_id: NodeId) -> bool {
        self.has_attr(node_id, "required")
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        self.nodes[parent.0]
            .children
            .iter()
            .skip_while(|child| **child != node_id)
            .skip(1)
            .copied()
            .find(|child| self.element(*child).is_some())
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId, operation: &str) -> Result<()> {
        if child == self.root || child == parent || child.0 >= self.nodes.len() {
            return Err(Error::Runtime(format!("invalid {operation} node")));
        }
        if matches!(self.nodes[parent.0].node_type, NodeType::Text(_)) {
            return Err(Error::Runtime(format!(
                "{operation} target cannot have children"
            )));
        }
        // Parent must not be inside child's subtree.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::Runtime(format!("{operation} would create a cycle")));
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = None;
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_insertable(parent, child, "appendChild")?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<()> {
        self.ensure_insertable(parent, child, "insertBefore")?;
        if self.parent(reference) != Some(parent) {
            return Err(Error::Runtime(
                "insertBefore reference is not a direct child".into(),
            ));
        }
        if child == reference {
            return Ok(());
        }
        self.detach(child);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
            .ok_or_else(|| Error::Runtime("insertBefore reference is missing".into()))?;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        Ok(())
    }

    /// Places `child` directly after `target`, ahead of any text node that
    /// follows it.
    pub(crate) fn insert_after(&mut self, target: NodeId, child: NodeId) -> Result<()> {
        let Some(parent) = self.parent(target) else {
            return Err(Error::Runtime("insertAfter target is detached".into()));
        };
        let next = self.nodes[parent.0]
            .children
            .iter()
            .skip_while(|id| **id != target)
            .nth(1)
            .copied();
        match next {
            Some(next) => self.insert_before(parent, child, next),
            None => self.append_child(parent, child),
        }
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Runtime("cannot remove document root".into()));
        }
        if self
            .active_element
            .is_some_and(|active| active == node || self.is_descendant_of(active, node))
        {
            self.active_element = None;
        }
        self.detach(node);
        Ok(())
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
                out.push(node_id);
            }
            for child in &self.nodes[node_id.0].children {
                self.collect_elements_dfs(*child, out);
            }
        })
    }

    pub(crate) fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.query_selector_all_from(self.root, selector)
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        let mut ids = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut ids);

        let mut seen = HashSet::new();
        Ok(ids
            .into_iter()
            .filter(|candidate| {
                groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(*candidate, steps))
                    && seen.insert(*candidate)
            })
            .collect())
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    pub(crate) fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        step.classes
            .iter()
            .all(|class_name| has_class(element, class_name))
            && step.attrs.iter().all(|cond| cond.matches(&element.attrs))
    }

    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        let Some(combinator) = last.combinator else {
            return true;
        };

        match combinator {
            SelectorCombinator::Child => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_selector_chain(parent, rest)),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.matches_selector_chain(ancestor, rest) {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document => self.nodes[node_id.0]
                    .children
                    .iter()
                    .map(|child| self.dump_node(*child))
                    .collect(),
                NodeType::Text(text) => escape_html_text_for_serialization(text),
                NodeType::Element(element) => {
                    let mut out = String::new();
                    out.push('<');
                    out.push_str(&element.tag_name);
                    let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                    attrs.sort_by(|(left, _), (right, _)| left.cmp(right));
                    for (k, v) in attrs {
                        out.push(' ');
                        out.push_str(k);
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr_for_serialization(v));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void_tag(&element.tag_name) {
                        return out;
                    }
                    for child in &self.nodes[node_id.0].children {
                        out.push_str(&self.dump_node(*child));
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                    out
                }
            }
        })
    }

    /// Short `tag#id.class` label used in trace output and form labels.
    pub(crate) fn node_label(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => "document".to_string(),
            NodeType::Text(_) => "#text".to_string(),
            NodeType::Element(element) => {
                let mut label = element.tag_name.clone();
                if let Some(id) = element.attrs.get("id").filter(|id| !id.is_empty()) {
                    label.push('#');
                    label.push_str(id);
                } else if let Some(name) = element.attrs.get("name").filter(|n| !n.is_empty()) {
                    label.push_str(&format!("[name={name}]"));
                }
                for class_name in class_tokens(element.attrs.get("class").map(String::as_str)) {
                    label.push('.');
                    label.push_str(&class_name);
                }
                label
            }
        }
    }
}
