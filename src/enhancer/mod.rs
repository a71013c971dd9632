//! The form enhancement controller.
//!
//! Installation registers one delegated listener per event type on the
//! document root and schedules the dismissal of every banner already in
//! the document. Each listener works out from the event target whether it
//! has anything to do, so fields, forms, and controls added later are
//! covered without further registration.

use super::*;

mod alerts;
mod config;
mod confirmation;
mod field_feedback;
mod submission;

pub(crate) use alerts::AlertHandle;
pub use config::{
    AnnotationPolicy, DEFAULT_CONFIRM_MESSAGE, DISMISS_SELECTOR, EnhancerConfig,
    LEGACY_CONFIRM_SELECTOR,
};

/// Root listeners: event type, capture flag, behavior.
const DELEGATED_LISTENERS: [(&str, bool, Behavior); 4] = [
    ("submit", true, Behavior::ValidateSubmission),
    ("blur", true, Behavior::RequiredOnBlur),
    ("input", false, Behavior::ClearOnInput),
    ("click", false, Behavior::ClickGuard),
];

#[derive(Debug, Clone)]
pub struct FormEnhancer {
    config: EnhancerConfig,
    alerts: HashMap<NodeId, AlertHandle>,
}

impl FormEnhancer {
    pub fn new(config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            alerts: HashMap::new(),
        })
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Banners whose dismissal is still pending.
    pub fn tracked_alerts(&self) -> usize {
        self.alerts.len()
    }
}

impl Page {
    pub(crate) fn install_enhancer(&mut self) -> Result<()> {
        let root = self.dom.root;
        for (event_type, capture, behavior) in DELEGATED_LISTENERS {
            self.listeners.add(
                root,
                event_type,
                Listener {
                    capture,
                    kind: ListenerKind::Behavior(behavior),
                },
            );
        }

        let banners = self.schedule_alert_dismissals()?;
        let mode = if self.enhancer.config.legacy_inline_confirm {
            "declarative+legacy"
        } else {
            "declarative"
        };
        self.trace_line(format!(
            "[enhance] install listeners={} banners={banners} confirm_mode={mode}",
            DELEGATED_LISTENERS.len()
        ));
        Ok(())
    }

    pub(crate) fn run_behavior(&mut self, behavior: Behavior, event: &mut EventState) -> Result<()> {
        match behavior {
            Behavior::ValidateSubmission => self.validate_submission(event),
            Behavior::RequiredOnBlur => self.required_on_blur(event),
            Behavior::ClearOnInput => self.clear_on_input(event),
            Behavior::ClickGuard => {
                self.guard_destructive_click(event)?;
                if !event.default_prevented {
                    self.dismiss_from_control(event.target)?;
                }
                Ok(())
            }
        }
    }

    /// The feedback element directly following `field`, if there is one.
    pub(crate) fn annotation_for(&self, field: NodeId) -> Option<NodeId> {
        let sibling = self.dom.next_element_sibling(field)?;
        self.dom
            .class_contains(sibling, &self.enhancer.config.feedback_class)
            .then_some(sibling)
    }

    /// Adds the invalid class and, unless one already follows the field,
    /// an annotation carrying `message`.
    pub(crate) fn mark_invalid(&mut self, field: NodeId, message: &str) -> Result<()> {
        let invalid_class = self.enhancer.config.invalid_class.clone();
        self.dom.class_add(field, &invalid_class)?;

        if self.annotation_for(field).is_some() {
            return Ok(());
        }
        let feedback_class = self.enhancer.config.feedback_class.clone();
        let annotation = self.dom.create_detached_element("div");
        self.dom.class_add(annotation, &feedback_class)?;
        self.dom.set_text_content(annotation, message)?;
        self.dom.insert_after(field, annotation)?;
        let label = self.dom.node_label(field);
        self.trace_line(format!("[enhance] annotate field={label} message={message:?}"));
        Ok(())
    }

    pub(crate) fn clear_invalid(&mut self, field: NodeId) -> Result<()> {
        let invalid_class = self.enhancer.config.invalid_class.clone();
        let was_invalid = self.dom.class_contains(field, &invalid_class);
        self.dom.class_remove(field, &invalid_class)?;

        if self.enhancer.config.annotation_policy == AnnotationPolicy::RemoveWhenValid {
            if let Some(annotation) = self.annotation_for(field) {
                self.dom.remove_node(annotation)?;
            }
        }
        if was_invalid {
            let label = self.dom.node_label(field);
            self.trace_line(format!("[enhance] clear field={label}"));
        }
        Ok(())
    }

    /// The form a field belongs to for the real-time behaviors: its nearest
    /// ancestor form.
    pub(crate) fn enclosing_form(&self, field: NodeId) -> Option<NodeId> {
        let mut cursor = self.dom.parent(field);
        while let Some(node) = cursor {
            if self.dom.is_tag(node, "form") {
                return Some(node);
            }
            cursor = self.dom.parent(node);
        }
        None
    }

    pub fn enhancer(&self) -> &FormEnhancer {
        &self.enhancer
    }
}
