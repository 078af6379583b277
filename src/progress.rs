use voxler_host::ProgressReporter;

/// Progress "dialog" for the terminal: logs every tenth of the batch.
#[derive(Default)]
pub struct LogProgress {
    title: String,
    max: usize,
    last_decile: usize,
}

impl ProgressReporter for LogProgress {
    fn show(&mut self, title: &str, message: &str, min: usize, max: usize) {
        self.title = title.to_string();
        self.max = max;
        self.last_decile = 0;
        log::info!(target: "progress", "{title}: {message} [{min}..{max}]");
    }

    fn set_progress(&mut self, value: usize) {
        if self.max == 0 {
            return;
        }
        let decile = value * 10 / self.max;
        if decile > self.last_decile {
            self.last_decile = decile;
            log::info!(target: "progress", "{}: {value}/{}", self.title, self.max);
        }
    }

    fn was_cancelled(&mut self) -> bool {
        false
    }

    fn hide(&mut self) {
        log::debug!(target: "progress", "{} closed", self.title);
    }
}
