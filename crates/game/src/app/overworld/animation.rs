/// Walk cycle timer. Yields an index into the active animation.
#[derive(Debug, Clone)]
pub(crate) struct AnimationClock {
    frame_duration_seconds: f32,
    elapsed_seconds: f32,
    frame: usize,
}

impl AnimationClock {
    pub(crate) fn new(frame_rate: u32) -> Self {
        Self {
            frame_duration_seconds: 1.0 / frame_rate.max(1) as f32,
            elapsed_seconds: 0.0,
            frame: 0,
        }
    }

    pub(crate) fn frame(&self) -> usize {
        self.frame
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
        self.frame = 0;
    }

    pub(crate) fn advance(&mut self, dt_seconds: f32, frame_count: usize) -> usize {
        if frame_count == 0 {
            self.reset();
            return 0;
        }
        self.elapsed_seconds += dt_seconds.max(0.0);
        while self.elapsed_seconds >= self.frame_duration_seconds {
            self.elapsed_seconds -= self.frame_duration_seconds;
            self.frame = (self.frame + 1) % frame_count;
        }
        // Switching to a shorter animation must not leave the index out of range.
        self.frame = self.frame.min(frame_count - 1);
        self.frame
    }
}
