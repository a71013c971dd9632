use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlertPhase {
    /// Waiting for the shown class to be removed.
    Shown,
    /// Shown class removed, waiting for detachment.
    Hiding,
}

impl AlertPhase {
    fn label(self) -> &'static str {
        match self {
            Self::Shown => "shown",
            Self::Hiding => "hiding",
        }
    }
}

/// Pending dismissal of one banner. Cancelling it clears the one timer
/// that is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AlertHandle {
    pub(crate) timer_id: i64,
    pub(crate) phase: AlertPhase,
}

impl Page {
    pub(super) fn schedule_alert_dismissals(&mut self) -> Result<usize> {
        let selector = self.enhancer.config.alert_selector.clone();
        let delay = self.enhancer.config.alert_hide_delay_ms;
        let banners = self.dom.query_selector_all(&selector)?;
        for banner in &banners {
            let timer_id = self.schedule_task(delay, TimerTask::HideAlert(*banner));
            self.enhancer.alerts.insert(
                *banner,
                AlertHandle {
                    timer_id,
                    phase: AlertPhase::Shown,
                },
            );
        }
        Ok(banners.len())
    }

    pub(crate) fn run_alert_task(&mut self, task: TimerTask) -> Result<()> {
        match task {
            TimerTask::HideAlert(banner) => self.hide_alert(banner),
            TimerTask::RemoveAlert(banner) => self.remove_alert(banner),
        }
    }

    fn hide_alert(&mut self, banner: NodeId) -> Result<()> {
        let label = self.dom.node_label(banner);
        if !self.dom.is_connected(banner) {
            self.enhancer.alerts.remove(&banner);
            self.trace_line(format!("[enhance] alert skip banner={label} phase=hide"));
            return Ok(());
        }

        let shown_class = self.enhancer.config.shown_class.clone();
        self.dom.class_remove(banner, &shown_class)?;
        let delay = self.enhancer.config.alert_remove_delay_ms;
        let timer_id = self.schedule_task(delay, TimerTask::RemoveAlert(banner));
        self.enhancer.alerts.insert(
            banner,
            AlertHandle {
                timer_id,
                phase: AlertPhase::Hiding,
            },
        );
        self.trace_line(format!("[enhance] alert hide banner={label}"));
        Ok(())
    }

    fn remove_alert(&mut self, banner: NodeId) -> Result<()> {
        self.enhancer.alerts.remove(&banner);
        let label = self.dom.node_label(banner);
        if !self.dom.is_connected(banner) {
            self.trace_line(format!("[enhance] alert skip banner={label} phase=remove"));
            return Ok(());
        }
        self.dom.remove_node(banner)?;
        self.trace_line(format!("[enhance] alert remove banner={label}"));
        Ok(())
    }

    /// Handles a click on a dismiss control: the enclosing tracked banner is
    /// detached at once and its pending timer cancelled.
    pub(super) fn dismiss_from_control(&mut self, target: NodeId) -> Result<()> {
        let Some(control) = self.dom.closest(target, DISMISS_SELECTOR)? else {
            return Ok(());
        };
        let selector = self.enhancer.config.alert_selector.clone();
        let Some(banner) = self.dom.closest(control, &selector)? else {
            return Ok(());
        };

        let phase = match self.enhancer.alerts.remove(&banner) {
            Some(handle) => {
                self.clear_timer(handle.timer_id);
                handle.phase.label()
            }
            None => "untracked",
        };
        if self.dom.is_connected(banner) {
            self.dom.remove_node(banner)?;
        }
        let label = self.dom.node_label(banner);
        self.trace_line(format!(
            "[enhance] alert dismiss banner={label} phase={phase}"
        ));
        Ok(())
    }
}
