use super::*;

impl Page {
    /// Dispatches `event_type` at `target` through capture, target, and
    /// bubble phases. The returned state tells the caller whether the
    /// default action was prevented.
    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = Vec::new();
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();

        event.phase = EventPhase::Capturing;
        for node in &path {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, true)?;
            if event.propagation_stopped {
                return self.finish_dispatch(event, "propagation_stopped");
            }
        }

        event.phase = EventPhase::AtTarget;
        event.current_target = target;
        self.invoke_listeners(target, &mut event, true)?;
        if !event.propagation_stopped {
            self.invoke_listeners(target, &mut event, false)?;
        }
        if event.propagation_stopped {
            return self.finish_dispatch(event, "propagation_stopped");
        }

        if event.bubbles {
            event.phase = EventPhase::Bubbling;
            for node in path.iter().rev() {
                event.current_target = *node;
                self.invoke_listeners(*node, &mut event, false)?;
                if event.propagation_stopped {
                    return self.finish_dispatch(event, "propagation_stopped");
                }
            }
        }

        self.finish_dispatch(event, "completed")
    }

    fn finish_dispatch(&mut self, event: EventState, outcome: &str) -> Result<EventState> {
        if self.trace_state.enabled {
            let target = self.dom.node_label(event.target);
            self.trace_event_line(format!(
                "[event] done {} target={target} outcome={outcome} default_prevented={}",
                event.event_type, event.default_prevented
            ));
        }
        Ok(event)
    }

    fn invoke_listeners(
        &mut self,
        node: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        let listeners = self.listeners.get(node, &event.event_type, capture);
        for listener in listeners {
            if self.trace_state.enabled {
                let current = self.dom.node_label(event.current_target);
                self.trace_event_line(format!(
                    "[event] {} current={current} phase={}",
                    event.event_type,
                    event.phase.label()
                ));
            }
            match listener.kind {
                ListenerKind::Behavior(behavior) => self.run_behavior(behavior, event)?,
                ListenerKind::Observer { label } => {
                    self.outcomes.observed_events.push(ObservedEvent {
                        label,
                        event_type: event.event_type.clone(),
                        phase: event.phase.label().to_string(),
                        default_prevented: event.default_prevented,
                    });
                }
            }
        }
        Ok(())
    }

    /// Registers an observer on every element matching `selector`. Observed
    /// deliveries are labeled with the selector text.
    pub fn observe(&mut self, selector: &str, event_type: &str, capture: bool) -> Result<usize> {
        let targets = if selector == "document" {
            vec![self.dom.root]
        } else {
            self.dom.query_selector_all(selector)?
        };
        if targets.is_empty() {
            return Err(Error::SelectorNotFound(selector.to_string()));
        }
        for node in &targets {
            self.listeners.add(
                *node,
                event_type,
                Listener {
                    capture,
                    kind: ListenerKind::Observer {
                        label: selector.to_string(),
                    },
                },
            );
        }
        Ok(targets.len())
    }

    pub fn take_observed_events(&mut self) -> Vec<ObservedEvent> {
        std::mem::take(&mut self.outcomes.observed_events)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }
}
