use super::*;

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub(crate) fn schedule_task(&mut self, delay_ms: i64, task: TimerTask) -> i64 {
        let delay_ms = delay_ms.max(0);
        let id = self.scheduler.next_timer_id;
        self.scheduler.next_timer_id += 1;
        let order = self.scheduler.next_task_order;
        self.scheduler.next_task_order += 1;
        let due_at = self.scheduler.now_ms.saturating_add(delay_ms);
        self.scheduler.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            task,
        });
        self.trace_timer_line(format!(
            "[timer] schedule id={id} due_at={due_at} delay_ms={delay_ms}"
        ));
        id
    }

    pub fn clear_timer(&mut self, timer_id: i64) -> bool {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer_id);
        let existed = self.scheduler.task_queue.len() != before;
        self.trace_timer_line(format!("[timer] clear id={timer_id} existed={existed}"));
        existed
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .scheduler
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        let target = from.saturating_add(delta_ms);
        // Each task runs with the clock at its own due time.
        let ran = self.run_timer_queue(Some(target), true)?;
        self.scheduler.now_ms = target;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={} ran_due={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.scheduler.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.scheduler.now_ms
            )));
        }
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(Some(target_ms), true)?;
        self.scheduler.now_ms = target_ms;
        self.trace_timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs every pending task, moving the clock forward to each due time.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(None, true)?;
        self.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms), false)?;
        self.trace_timer_line(format!(
            "[timer] run_due now_ms={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.next_task_index(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(Error::Runtime(format!(
                    "timer run exceeded max task steps: limit={}, now_ms={}, pending_tasks={}",
                    self.scheduler.timer_step_limit,
                    self.scheduler.now_ms,
                    self.scheduler.task_queue.len()
                )));
            }
            let task = self.scheduler.task_queue.remove(next_idx);
            if advance_clock && task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.trace_timer_line(format!(
                "[timer] run id={} due_at={} now_ms={}",
                task.id, task.due_at, self.scheduler.now_ms
            ));
            self.run_alert_task(task.task)?;
        }
        Ok(steps)
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.scheduler
            .task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace_state.timers = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.timers {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if !self.trace_state.enabled {
            return;
        }
        if self.trace_state.to_stderr {
            eprintln!("{line}");
        }
        if self.trace_state.logs.len() >= self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        self.trace_state.logs.push_back(line);
    }
}
