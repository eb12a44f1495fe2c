use anyhow::Result;

/// Frame driver state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    /// No window, GPU or driver resources yet.
    Uninitialized,
    /// Initialized; no frame has run.
    Ready,
    /// At least one frame has run.
    Rendering,
    /// Terminal. Reached on a stop request or a failed initialization.
    Stopped,
}

/// Tracks the `Uninitialized -> Ready -> Rendering` progression.
///
/// Frames are only admitted after a successful [`initialize`](Self::initialize).
#[derive(Debug, Clone)]
pub struct Lifecycle {
    stage: Stage,
    frames: u64,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            stage: Stage::Uninitialized,
            frames: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Number of frames admitted by [`begin_frame`](Self::begin_frame).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs `init` once.
    ///
    /// On success the state becomes `Ready`. On failure it becomes `Stopped`
    /// and the error is returned. Calling this in any other state than
    /// `Uninitialized` is an error and does not run `init`.
    pub fn initialize<T>(&mut self, init: impl FnOnce() -> Result<T>) -> Result<T> {
        anyhow::ensure!(
            self.stage == Stage::Uninitialized,
            "initialize called in stage {:?}",
            self.stage
        );

        match init() {
            Ok(v) => {
                self.transition(Stage::Ready);
                Ok(v)
            }
            Err(e) => {
                self.transition(Stage::Stopped);
                Err(e)
            }
        }
    }

    /// Admits one frame. Returns `false` unless initialized and not stopped.
    pub fn begin_frame(&mut self) -> bool {
        match self.stage {
            Stage::Ready => {
                self.transition(Stage::Rendering);
            }
            Stage::Rendering => {}
            Stage::Uninitialized | Stage::Stopped => return false,
        }
        self.frames += 1;
        true
    }

    pub fn stop(&mut self) {
        if self.stage != Stage::Stopped {
            self.transition(Stage::Stopped);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stage == Stage::Stopped
    }

    fn transition(&mut self, to: Stage) {
        log::debug!("lifecycle {:?} -> {:?}", self.stage, to);
        self.stage = to;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized_and_refuses_frames() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.stage(), Stage::Uninitialized);
        assert!(!lc.begin_frame());
        assert_eq!(lc.frames(), 0);
    }

    #[test]
    fn successful_init_leads_to_rendering() {
        let mut lc = Lifecycle::new();
        let v = lc.initialize(|| Ok(7)).unwrap();
        assert_eq!(v, 7);
        assert_eq!(lc.stage(), Stage::Ready);

        assert!(lc.begin_frame());
        assert_eq!(lc.stage(), Stage::Rendering);
        assert!(lc.begin_frame());
        assert_eq!(lc.frames(), 2);
    }

    #[test]
    fn failed_init_stops_before_any_frame() {
        let mut lc = Lifecycle::new();
        let mut draws = 0;

        let result: Result<()> = lc.initialize(|| anyhow::bail!("no GL context available"));
        assert!(result.is_err());
        assert_eq!(lc.stage(), Stage::Stopped);

        for _ in 0..3 {
            if lc.begin_frame() {
                draws += 1;
            }
        }
        assert_eq!(draws, 0);
        assert_eq!(lc.frames(), 0);
    }

    #[test]
    fn initialize_runs_only_once() {
        let mut lc = Lifecycle::new();
        lc.initialize(|| Ok(())).unwrap();

        let mut ran = false;
        let second = lc.initialize(|| {
            ran = true;
            Ok(())
        });
        assert!(second.is_err());
        assert!(!ran);
        assert_eq!(lc.stage(), Stage::Ready);
    }

    #[test]
    fn stop_is_terminal() {
        let mut lc = Lifecycle::new();
        lc.initialize(|| Ok(())).unwrap();
        assert!(lc.begin_frame());
        lc.stop();
        assert!(lc.is_stopped());
        assert!(!lc.begin_frame());
        assert_eq!(lc.frames(), 1);
    }
}
