use std::{borrow::Cow, time::Duration};

use crate::util::progress_logger::{ProgressLogger, ProgressSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressMode {
    Hidden,
    Visible,
}

impl Default for ProgressMode {
    fn default() -> Self {
        ProgressMode::Hidden
    }
}

/// A progress logger for a single named pass.  Passes over one tree have no meaningful total, so
/// sessions started without a count render as a spinner with a running tally of rewrites.
#[derive(Clone, Debug)]
pub struct ProgressBarLogger {
    name: String,
    mode: ProgressMode,
}

pub fn bar(mode: ProgressMode, name: impl ToString) -> ProgressBarLogger {
    ProgressBarLogger {
        name: name.to_string(),
        mode,
    }
}

#[derive(Clone, Debug)]
pub struct ProgressBarSession {
    bar: indicatif::ProgressBar,
}

const TICK_STRINGS: &[&str] = &["⠉", "⠘", "⠰", "⠤", "⠆", "⠃", "✔"];

impl ProgressLogger for ProgressBarLogger {
    type Session = ProgressBarSession;

    fn start_session(self, count: Option<usize>) -> Self::Session {
        let bar = indicatif::ProgressBar::with_draw_target(
            count.map(|count| count as u64),
            match self.mode {
                ProgressMode::Hidden => indicatif::ProgressDrawTarget::hidden(),
                ProgressMode::Visible => indicatif::ProgressDrawTarget::stderr(),
            },
        );
        let template = if count.is_some() {
            "{spinner:.green} [{elapsed_precise}] [{bar:.green/white}] {pos}/{len} {msg}"
        } else {
            "{spinner:.green} [{elapsed_precise}] {msg} ({pos} rewrites)"
        };
        // The templates above are fixed, so a parse failure falls back to the default style.
        if let Ok(style) = indicatif::ProgressStyle::default_bar().template(template) {
            bar.set_style(style.progress_chars("=> ").tick_strings(TICK_STRINGS));
        }
        bar.set_message(Cow::Owned(self.name));
        if self.mode == ProgressMode::Visible {
            bar.enable_steady_tick(Duration::from_millis(100));
        }
        ProgressBarSession { bar }
    }
}

impl ProgressSession for ProgressBarSession {
    fn update(&mut self, inc: usize) {
        self.bar.inc(inc as u64);
    }

    fn finish(self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hidden_session_counts_updates() {
        let mut session = bar(ProgressMode::Hidden, "optimize").start_session(None);
        session.update(3);
        session.update(4);
        assert_eq!(session.bar.position(), 7);
        session.finish();
    }
}
