use super::*;

/// Work a delegated root listener performs for one event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    ValidateSubmission,
    RequiredOnBlur,
    ClearOnInput,
    ClickGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListenerKind {
    Behavior(Behavior),
    Observer { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Listener {
    pub(crate) capture: bool,
    pub(crate) kind: ListenerKind,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        let listeners = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default();
        // addEventListener ignores exact duplicates
        if !listeners.contains(&listener) {
            listeners.push(listener);
        }
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self) -> usize {
        self.map
            .values()
            .flat_map(|events| events.values())
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventPhase {
    Capturing,
    AtTarget,
    Bubbling,
}

impl EventPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Capturing => "capture",
            Self::AtTarget => "target",
            Self::Bubbling => "bubble",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) phase: EventPhase,
    pub(crate) bubbles: bool,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            phase: EventPhase::AtTarget,
            bubbles: !matches!(event_type, "focus" | "blur"),
            default_prevented: false,
            propagation_stopped: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerTask {
    HideAlert(NodeId),
    RemoveAlert(NodeId),
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) task: TimerTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    pub(crate) next_timer_id: i64,
    pub(crate) next_task_order: i64,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PlatformMockState {
    pub(crate) confirm_responses: VecDeque<bool>,
    pub(crate) default_confirm_response: bool,
    pub(crate) confirm_messages: Vec<String>,
}

/// A form submission that was allowed to proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// `#id`, `form[name=..]`, or `form` for anonymous forms.
    pub form: String,
    pub fields: Vec<(String, String)>,
}

/// A link activation that was allowed to proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub href: String,
}

/// One event delivery seen by an observer registered with
/// [`Page::observe`](crate::Page::observe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEvent {
    pub label: String,
    pub event_type: String,
    pub phase: String,
    pub default_prevented: bool,
}

#[derive(Debug, Default)]
pub(crate) struct OutcomeState {
    pub(crate) submissions: Vec<FormSubmission>,
    pub(crate) navigations: Vec<Navigation>,
    pub(crate) observed_events: Vec<ObservedEvent>,
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}
