//! Frame-stepped volume fader
//!
//! The fader level is a gain (0.0-1.0) applied on top of the base volume. Each
//! `step` moves it toward the target by a fixed amount per frame:
//!
//! ```text
//! |level - target| < speed  → level = target, fade ends
//! otherwise                 → level ± speed
//! ```

/// Default change in level per frame
pub const DEFAULT_FADE_SPEED: f32 = 0.05;

/// Slowest accepted fade speed per frame
pub const MIN_FADE_SPEED: f32 = 0.01;

/// Fastest accepted fade speed per frame
pub const MAX_FADE_SPEED: f32 = 0.2;

/// Targets closer than this to the current level do not start a fade
const FADE_THRESHOLD: f32 = 0.01;

/// Volume fader driven by the player tick
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeFader {
    level: f32,
    target: f32,
    speed: f32,
    fading: bool,
}

impl VolumeFader {
    /// Create fader resting at `level`
    pub fn new(level: f32) -> Self {
        let level = clamp_level(level);
        Self {
            level,
            target: level,
            speed: DEFAULT_FADE_SPEED,
            fading: false,
        }
    }

    /// Fade toward `target`, moving `speed` per frame
    ///
    /// Target is clamped to 0.0-1.0 and speed to 0.01-0.2.
    pub fn set_target(&mut self, target: f32, speed: f32) {
        self.target = clamp_level(target);
        self.speed = clamp_speed(speed);
        self.fading = (self.level - self.target).abs() > FADE_THRESHOLD;
    }

    pub fn fade_to_mute(&mut self, speed: f32) {
        self.set_target(0.0, speed);
    }

    pub fn fade_to_max(&mut self, speed: f32) {
        self.set_target(1.0, speed);
    }

    /// Jump to `level`, cancelling any fade
    pub fn set_immediate(&mut self, level: f32) {
        self.level = clamp_level(level);
        self.target = self.level;
        self.fading = false;
    }

    /// Advance one frame
    ///
    /// Returns true when the level changed.
    pub fn step(&mut self) -> bool {
        if !self.fading {
            return false;
        }

        if (self.level - self.target).abs() < self.speed {
            self.level = self.target;
            self.fading = false;
        } else if self.level < self.target {
            self.level += self.speed;
        } else {
            self.level -= self.speed;
        }
        true
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }
}

impl Default for VolumeFader {
    fn default() -> Self {
        Self::new(1.0)
    }
}

// max() discards NaN
fn clamp_level(level: f32) -> f32 {
    level.max(0.0).min(1.0)
}

fn clamp_speed(speed: f32) -> f32 {
    speed.max(MIN_FADE_SPEED).min(MAX_FADE_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step until the fade ends, returning the number of frames taken
    fn run_to_end(fader: &mut VolumeFader, limit: usize) -> usize {
        let mut frames = 0;
        while fader.step() {
            frames += 1;
            assert!(frames <= limit, "fade did not finish in {limit} frames");
        }
        frames
    }

    #[test]
    fn default_rests_at_full_level() {
        let fader = VolumeFader::default();
        assert_eq!(fader.level(), 1.0);
        assert_eq!(fader.target(), 1.0);
        assert!(!fader.is_fading());
    }

    #[test]
    fn new_clamps_level() {
        assert_eq!(VolumeFader::new(1.5).level(), 1.0);
        assert_eq!(VolumeFader::new(-0.3).level(), 0.0);
        assert_eq!(VolumeFader::new(f32::NAN).level(), 0.0);
    }

    #[test]
    fn speed_is_clamped() {
        let mut fader = VolumeFader::new(0.5);

        fader.set_target(0.0, 0.001);
        assert_eq!(fader.speed(), MIN_FADE_SPEED);

        fader.set_target(0.0, 0.9);
        assert_eq!(fader.speed(), MAX_FADE_SPEED);

        fader.set_target(0.0, f32::NAN);
        assert_eq!(fader.speed(), MIN_FADE_SPEED);
    }

    #[test]
    fn target_is_clamped() {
        let mut fader = VolumeFader::new(0.5);
        fader.set_target(4.0, 0.1);
        assert_eq!(fader.target(), 1.0);
        fader.set_target(-1.0, 0.1);
        assert_eq!(fader.target(), 0.0);
    }

    #[test]
    fn step_moves_by_speed() {
        let mut fader = VolumeFader::new(0.5);
        fader.set_target(1.0, 0.1);

        assert!(fader.step());
        assert!((fader.level() - 0.6).abs() < 1e-6);
        assert!(fader.is_fading());

        fader.set_target(0.0, 0.1);
        assert!(fader.step());
        assert!((fader.level() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn snaps_when_within_one_step() {
        let mut fader = VolumeFader::new(0.5);
        fader.set_target(0.53, 0.05);
        assert!(fader.is_fading());

        assert!(fader.step());
        assert_eq!(fader.level(), 0.53);
        assert!(!fader.is_fading());
        assert!(!fader.step());
    }

    #[test]
    fn tiny_target_change_does_not_fade() {
        let mut fader = VolumeFader::new(0.5);
        fader.set_target(0.505, 0.05);

        assert!(!fader.is_fading());
        assert!(!fader.step());
        assert_eq!(fader.level(), 0.5);
    }

    #[test]
    fn fade_to_mute_and_max_land_exactly() {
        let mut fader = VolumeFader::new(1.0);

        fader.fade_to_mute(0.2);
        let frames = run_to_end(&mut fader, 7);
        assert!(frames >= 5);
        assert_eq!(fader.level(), 0.0);

        fader.fade_to_max(DEFAULT_FADE_SPEED);
        run_to_end(&mut fader, 22);
        assert_eq!(fader.level(), 1.0);
    }

    #[test]
    fn set_immediate_cancels_fade() {
        let mut fader = VolumeFader::new(1.0);
        fader.fade_to_mute(0.05);
        fader.step();

        fader.set_immediate(0.3);
        assert_eq!(fader.level(), 0.3);
        assert_eq!(fader.target(), 0.3);
        assert!(!fader.is_fading());
        assert!(!fader.step());
    }
}
