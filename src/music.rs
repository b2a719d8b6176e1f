//! Step-driven background music sequencer
//!
//! A looping 32-note arpeggio progression (C - F - G - C). The sequencer owns
//! only timing and note selection; it is advanced once per frame and hands
//! frequencies back to the caller, so it stays pure and testable. Actual
//! synthesis happens in the audio layer.

/// Seconds between notes
pub const NOTE_INTERVAL: f32 = 0.15;

/// One bar per chord, each arpeggio played twice
const SEQUENCE: [f32; 32] = [
    // C major
    261.63, 329.63, 392.00, 523.25, //
    261.63, 329.63, 392.00, 523.25, //
    // F major
    349.23, 440.00, 523.25, 698.46, //
    349.23, 440.00, 523.25, 698.46, //
    // G major
    392.00, 493.88, 587.33, 783.99, //
    392.00, 493.88, 587.33, 783.99, //
    // C major
    261.63, 329.63, 392.00, 523.25, //
    261.63, 329.63, 392.00, 523.25, //
];

/// Background music state machine
#[derive(Debug, Clone, Default)]
pub struct MusicSequencer {
    playing: bool,
    index: usize,
    elapsed: f32,
}

impl MusicSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the sequence from the top; no-op while already playing
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.index = 0;
        // The first note fires on the next advance
        self.elapsed = NOTE_INTERVAL;
    }

    /// Halt playback; `start` resumes from the top
    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance by a frame's worth of seconds
    ///
    /// Returns the frequency of a note that became due, at most one per call.
    /// Frame times are far below the note interval, so notes never pile up.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if !self.playing {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < NOTE_INTERVAL {
            return None;
        }
        self.elapsed -= NOTE_INTERVAL;
        let freq = SEQUENCE[self.index];
        self.index = (self.index + 1) % SEQUENCE.len();
        Some(freq)
    }
}
