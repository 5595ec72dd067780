//! Step directives returned by a task on each resume.

use core::fmt;

/// The directive a task returns from each resume, telling the scheduler
/// what to do with the task next and whether the tick may go on.
///
/// | Variant | Queue effect | Tick effect |
/// |---------|--------------|-------------|
/// | `Continue` | none | re-resume the same task immediately |
/// | `Hold` | none | stop the tick entirely |
/// | `Wait` | none | advance to the next position |
/// | `Delay` | move to the back of the queue | the moved task is not revisited this tick |
/// | `Stall` | move to the front of the queue | stop the tick entirely |
/// | `Cancel` | remove from the queue | advance to the next position |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepResult {
    /// Resume the same task again immediately, with no scheduler-side
    /// budget check in between.
    ///
    /// `Continue` exists for helper-method delegation, not unbounded work:
    /// a task looping on `Continue` must consult
    /// [`TickContext::should_hold`](crate::slicer::TickContext::should_hold)
    /// itself, or it can occupy the tick indefinitely.
    Continue,
    /// Stop processing entirely for this tick. The task keeps its position
    /// and runs again next tick.
    Hold,
    /// Keep the task at its position and move on to the next one.
    Wait,
    /// Move the task to the back of the queue. It is not revisited within
    /// the tick that moved it.
    Delay,
    /// Move the task to the front of the queue and stop the tick. The task
    /// runs first on the next tick.
    Stall,
    /// Remove the task from the queue permanently, invalidating its handle.
    Cancel,
}

impl StepResult {
    /// Returns true if this result ends the current tick outright.
    #[must_use]
    pub const fn ends_tick(self) -> bool {
        matches!(self, Self::Hold | Self::Stall)
    }

    /// Returns true if this result removes the task from the queue.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancel)
    }

    /// Short lowercase name, used in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Hold => "hold",
            Self::Wait => "wait",
            Self::Delay => "delay",
            Self::Stall => "stall",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn ends_tick_only_for_hold_and_stall() {
        init_test("ends_tick_only_for_hold_and_stall");
        let ending: Vec<StepResult> = [
            StepResult::Continue,
            StepResult::Hold,
            StepResult::Wait,
            StepResult::Delay,
            StepResult::Stall,
            StepResult::Cancel,
        ]
        .into_iter()
        .filter(|r| r.ends_tick())
        .collect();
        crate::assert_with_log!(
            ending == vec![StepResult::Hold, StepResult::Stall],
            "tick-ending variants",
            vec![StepResult::Hold, StepResult::Stall],
            ending
        );
        crate::test_complete!("ends_tick_only_for_hold_and_stall");
    }

    #[test]
    fn cancel_is_the_only_terminal_result() {
        init_test("cancel_is_the_only_terminal_result");
        let terminal = StepResult::Cancel.is_terminal();
        crate::assert_with_log!(terminal, "cancel is terminal", true, terminal);
        let wait_terminal = StepResult::Wait.is_terminal();
        crate::assert_with_log!(!wait_terminal, "wait is not terminal", false, wait_terminal);
        crate::test_complete!("cancel_is_the_only_terminal_result");
    }

    #[test]
    fn display_matches_name() {
        init_test("display_matches_name");
        let rendered = format!("{}", StepResult::Delay);
        crate::assert_with_log!(rendered == "delay", "display", "delay", rendered);
        crate::test_complete!("display_matches_name");
    }
}
