#![forbid(unsafe_code)]

//! Progressive enhancement for server-rendered HTML forms.
//!
//! The crate installs a [`FormEnhancer`] on a document: required-field,
//! email, and password-confirmation checks on submit, real-time clearing of
//! error state on blur/input, two-phase auto-dismissal of alert banners, and
//! a confirmation prompt in front of destructive controls.
//!
//! [`Page`] hosts the enhancer on a deterministic in-memory document so the
//! behaviors can be driven and asserted from plain Rust tests. On `wasm32`
//! the `install` entry points attach the same behaviors to the live browser
//! document.

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod core_dom_utils;
mod core_impl;
mod email_pattern;
mod enhancer;
mod rules;
mod runtime_state;
mod selector;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(test)]
mod tests;

use core_dom_utils::*;
use runtime_state::*;
use selector::*;

pub use email_pattern::{EMAIL_PATTERN, PatternError, is_valid_email};
pub use enhancer::{
    AnnotationPolicy, DEFAULT_CONFIRM_MESSAGE, DISMISS_SELECTOR, EnhancerConfig, FormEnhancer,
    LEGACY_CONFIRM_SELECTOR,
};
pub use rules::{
    CONFIRMATION_FIELD_NAME, FieldFacts, FormReport, PASSWORD_FIELD_NAME, Violation,
    check_confirmation, check_email, check_presence, evaluate_form,
};
pub use runtime_state::{FormSubmission, Navigation, ObservedEvent, PendingTimer};

#[cfg(target_arch = "wasm32")]
pub use wasm::{install, install_with_delays};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    InvalidConfig(String),
    Runtime(String),
    Pattern(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid enhancer config: {msg}"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::Pattern(msg) => write!(f, "pattern error: {msg}"),
        }
    }
}

impl StdError for Error {}

impl From<PatternError> for Error {
    fn from(value: PatternError) -> Self {
        Self::Pattern(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) active_element: Option<NodeId>,
}

/// A document with the form enhancer installed.
///
/// Markup is parsed once, the enhancer is installed as if the
/// document-ready signal fired, and from then on the page only changes in
/// response to the user actions and clock advances the caller drives.
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) platform_mocks: PlatformMockState,
    pub(crate) outcomes: OutcomeState,
    pub(crate) trace_state: TraceState,
    pub(crate) enhancer: enhancer::FormEnhancer,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("nodes", &self.dom.nodes.len())
            .field("now_ms", &self.scheduler.now_ms)
            .field("pending_timers", &self.scheduler.task_queue.len())
            .finish()
    }
}
