const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner shown while a submission is in flight
#[derive(Debug, Default, Clone, Copy)]
pub struct Spinner {
    tick: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame for an arbitrary tick count
    pub fn frame_at(tick: usize) -> &'static str {
        FRAMES[tick % FRAMES.len()]
    }

    /// Advance to the next frame
    pub fn tick(&mut self) {
        self.tick = (self.tick + 1) % FRAMES.len();
    }

    pub fn position(&self) -> usize {
        self.tick
    }

    pub fn frame(&self) -> &'static str {
        Self::frame_at(self.tick)
    }
}
