use std::time::{Duration, Instant};

/// Per-process play statistics shown in the header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            running: false,
        }
    }

    /// Advance the clock; it stands still outside of a game and while paused
    pub fn update(&mut self, now: Instant) {
        if self.running {
            self.elapsed_time = now.saturating_duration_since(self.start_time);
        }
    }

    pub fn on_game_start(&mut self, now: Instant) {
        self.start_time = now;
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    pub fn on_game_paused(&mut self, now: Instant) {
        self.update(now);
        self.running = false;
    }

    /// Pick the clock up where the pause left it
    pub fn on_game_resumed(&mut self, now: Instant) {
        self.start_time = now.checked_sub(self.elapsed_time).unwrap_or(now);
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// A game left through the pause menu still counts as started, not played
    pub fn on_game_abandoned(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
