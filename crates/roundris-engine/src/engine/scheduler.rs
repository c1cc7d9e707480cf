use std::time::Duration;

/// Shortest allowed period of a repeating task.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    task: T,
    due: Duration,
    period: Option<Duration>,
}

/// Cancelable one-shot and repeating tasks on a virtual clock.
///
/// The scheduler never looks at wall-clock time. The owner moves the clock
/// forward and drains due tasks with [`Scheduler::pop_due`], which makes
/// timing fully deterministic in tests.
///
/// Tasks fire in deadline order; ties fire in scheduling order.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use roundris_engine::engine::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// let tick = scheduler.schedule_repeating(Duration::from_millis(500), "tick");
/// scheduler.schedule_once(Duration::from_millis(200), "spawn");
///
/// let until = Duration::from_millis(1000);
/// let mut fired = vec![];
/// while let Some((_, task)) = scheduler.pop_due(until) {
///     fired.push(task);
/// }
/// assert_eq!(fired, ["spawn", "tick", "tick"]);
///
/// assert!(scheduler.cancel(tick));
/// assert_eq!(scheduler.next_deadline(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_handle: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            tasks: Vec::new(),
        }
    }

    /// Current time on the scheduler's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(ScheduledTask {
            handle,
            task,
            due: self.now.saturating_add(delay),
            period,
        });
        handle
    }

    /// Schedules `task` to fire once, `delay` from now.
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TaskHandle {
        self.push(delay, None, task)
    }

    /// Schedules `task` to fire every `period`, starting one period from now.
    pub fn schedule_repeating(&mut self, period: Duration, task: T) -> TaskHandle {
        let period = period.max(MIN_PERIOD);
        self.push(period, Some(period), task)
    }

    /// Cancels a task. Returns `false` if it already fired or was canceled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let len = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != len
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    #[must_use]
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Time left until the next task is due, zero if one is already overdue.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline().map(|due| due.saturating_sub(self.now))
    }

    /// Moves the clock forward to `time`. The clock never goes backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

impl<T> Scheduler<T>
where
    T: Clone,
{
    /// Removes and returns the earliest task due at or before `until`.
    ///
    /// The clock moves to that task's deadline. Repeating tasks are
    /// rescheduled one period later instead of being removed.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, T)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.tasks[index];
        self.now = self.now.max(entry.due);
        let fired = (entry.handle, entry.task.clone());
        // A repeating task whose next deadline is past `Duration::MAX` is dropped.
        match entry
            .period
            .and_then(|period| entry.due.checked_add(period))
        {
            Some(due) => entry.due = due,
            None => {
                self.tasks.remove(index);
            }
        }
        Some(fired)
    }
}
