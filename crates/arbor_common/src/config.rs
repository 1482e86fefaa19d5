pub use crate::progress_ui::ProgressMode;

/// Which passes `arbor_transform::transform` runs.  The optimizer always runs before code motion,
/// so that duplicated sub-trees are folded to literals before they are considered for sharing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassOptions {
    pub optimize: bool,
    pub code_motion: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            code_motion: true,
        }
    }
}

impl PassOptions {
    pub fn only_optimize() -> Self {
        Self {
            optimize: true,
            code_motion: false,
        }
    }

    pub fn only_code_motion() -> Self {
        Self {
            optimize: false,
            code_motion: true,
        }
    }
}
