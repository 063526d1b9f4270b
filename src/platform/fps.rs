//! Rolling frames-per-second estimate for the HUD readout

/// Frames averaged over
const WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; WINDOW],
    index: usize,
    filled: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; WINDOW],
            index: 0,
            filled: 0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame timestamp; returns the rate once a full window is seen
    pub fn record(&mut self, now_ms: f64) -> Option<u32> {
        let oldest = (self.filled == WINDOW).then(|| self.frame_times[self.index]);
        self.frame_times[self.index] = now_ms;
        self.index = (self.index + 1) % WINDOW;
        self.filled = (self.filled + 1).min(WINDOW);

        let elapsed = now_ms - oldest?;
        (elapsed > 0.0).then(|| (WINDOW as f64 * 1000.0 / elapsed).round() as u32)
    }

    /// Drop history (after the loop was idle)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
