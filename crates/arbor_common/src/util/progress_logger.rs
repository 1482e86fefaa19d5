use std::cell::Cell;
use std::rc::Rc;

pub trait ProgressLogger {
    type Session: ProgressSession;
    fn start_session(self, total_count: Option<usize>) -> Self::Session;
}

/// A running pass.  Both passes report their work as rewrites: folds, pruned and merged branches,
/// or lets introduced.
pub trait ProgressSession {
    fn update(&mut self, rewrites: usize);
    fn finish(self);
}

#[derive(Clone, Copy, Debug)]
pub struct Hidden;

#[derive(Clone, Copy, Debug)]
pub struct HiddenSession;

impl ProgressLogger for Hidden {
    type Session = HiddenSession;
    fn start_session(self, _total_count: Option<usize>) -> Self::Session {
        HiddenSession
    }
}

impl ProgressSession for HiddenSession {
    fn update(&mut self, _rewrites: usize) {}
    fn finish(self) {}
}

/// Adds every reported rewrite to a counter shared by all clones.
#[derive(Clone, Debug, Default)]
pub struct Tally(Rc<Cell<usize>>);

impl Tally {
    pub fn total(&self) -> usize {
        self.0.get()
    }
}

impl ProgressLogger for Tally {
    type Session = Tally;
    fn start_session(self, _total_count: Option<usize>) -> Self::Session {
        self
    }
}

impl ProgressSession for Tally {
    fn update(&mut self, rewrites: usize) {
        self.0.set(self.0.get() + rewrites);
    }

    fn finish(self) {}
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tally_sums_across_sessions() {
        let tally = Tally::default();
        let mut first = tally.clone().start_session(None);
        first.update(2);
        first.update(3);
        first.finish();
        let mut second = tally.clone().start_session(Some(10));
        second.update(1);
        second.finish();
        assert_eq!(tally.total(), 6);
    }
}
