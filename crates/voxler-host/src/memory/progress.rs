use crate::ProgressReporter;

/// Progress reporter that records every call and can press "cancel" once
/// progress reaches a given value.
#[derive(Default, Debug, Clone)]
pub struct ScriptedProgress {
    pub title: String,
    pub message: String,
    pub bounds: Option<(usize, usize)>,
    pub values: Vec<usize>,
    pub shows: usize,
    pub hides: usize,
    pub polls: usize,
    cancel_at: Option<usize>,
    visible: bool,
}

impl ScriptedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports cancellation on the first poll after `processed` items.
    pub fn cancel_after(processed: usize) -> Self {
        Self {
            cancel_at: Some(processed),
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn last_value(&self) -> Option<usize> {
        self.values.last().copied()
    }
}

impl ProgressReporter for ScriptedProgress {
    fn show(&mut self, title: &str, message: &str, min: usize, max: usize) {
        self.title = title.to_string();
        self.message = message.to_string();
        self.bounds = Some((min, max));
        self.shows += 1;
        self.visible = true;
    }

    fn set_progress(&mut self, value: usize) {
        self.values.push(value);
    }

    fn was_cancelled(&mut self) -> bool {
        self.polls += 1;
        match self.cancel_at {
            Some(k) => self.last_value().unwrap_or(0) >= k,
            None => false,
        }
    }

    fn hide(&mut self) {
        self.hides += 1;
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancels_once_threshold_reached() {
        let mut p = ScriptedProgress::cancel_after(2);
        p.show("t", "m", 0, 5);
        assert!(p.is_visible());
        assert!(!p.was_cancelled());
        p.set_progress(1);
        assert!(!p.was_cancelled());
        p.set_progress(2);
        assert!(p.was_cancelled());
        p.hide();
        assert!(!p.is_visible());
        assert_eq!(p.bounds, Some((0, 5)));
        assert_eq!(p.polls, 3);
    }

    #[test]
    fn cancel_after_zero_cancels_before_first_item() {
        let mut p = ScriptedProgress::cancel_after(0);
        assert!(p.was_cancelled());
        assert!(!ScriptedProgress::new().was_cancelled());
    }
}
