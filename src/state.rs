/// Transition lock of the slideshow.
///
/// `Transitioning` is left only when the release timer fires, never on a
/// paint or animation-finished signal, so a `transition_duration` shorter
/// or longer than the visible fade can desync the two.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum TransitionState {
    #[default]
    Idle,          // Navigation accepted
    Transitioning, // A slide change happened less than transition_duration ago
}

/// Work the slideshow schedules on its own timer queue.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Task {
    ReleaseLock,
    AutoAdvance,
}
