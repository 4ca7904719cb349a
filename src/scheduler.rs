//! One-shot timers on a virtual millisecond clock.
//!
//! The host loop decides what "now" is and drains due timers with
//! [`Scheduler::pop_due`]. Before a timer is handed out the clock jumps to
//! its due time, so anything armed from inside a callback is measured from
//! the instant that callback was meant to run, not from the frame that
//! happened to notice it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Timer<T> {
    handle: TimerHandle,
    due: u64,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_handle: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self { now: 0, next_handle: 0, timers: Vec::new() }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer { handle, due: self.now.saturating_add(delay_ms), task });
        handle
    }

    /// Cancels a pending timer. Unknown or already fired handles are ignored.
    pub fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }

    /// Due time of a pending timer.
    #[cfg(test)]
    pub fn due(&self, handle: TimerHandle) -> Option<u64> {
        self.timers.iter().find(|t| t.handle == handle).map(|t| t.due)
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its due time. Ties go to the timer armed first.
    /// Once nothing is due the clock settles on `until`.
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, T)> {
        let pos = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle.0))
            .map(|(i, _)| i);

        match pos {
            Some(i) => {
                let timer = self.timers.swap_remove(i);
                self.now = self.now.max(timer.due);
                Some((timer.due, timer.task))
            }
            None => {
                self.now = self.now.max(until);
                None
            }
        }
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
