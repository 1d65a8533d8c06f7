//! Audio feedback using Web Audio API
//!
//! Procedurally generated impact tones - no external files needed! Every
//! collision becomes a short sine blip whose pitch and loudness follow the
//! impact force. Native builds compute the same tones and log them instead.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Pitch of a zero-force impact (Hz)
pub const BASE_FREQUENCY: f32 = 150.0;
/// Added pitch per unit of impact force (Hz)
pub const FREQUENCY_PER_FORCE: f32 = 2.0;
/// Ceiling on the pitch (Hz)
pub const MAX_FREQUENCY: f32 = 4000.0;
/// Loudest a single tone gets before master volume
pub const MAX_GAIN: f32 = 0.3;
/// Length of every tone (seconds)
pub const TONE_DURATION: f64 = 0.2;

/// One impact tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Oscillator frequency in Hz
    pub frequency: f32,
    /// Peak gain, master volume applied
    pub gain: f32,
    /// Seconds
    pub duration: f64,
}

impl Tone {
    /// Tone for an impact of `force` at full volume
    pub fn for_impact(force: f64) -> Self {
        let force = force.max(0.0) as f32;
        Self {
            frequency: (BASE_FREQUENCY + FREQUENCY_PER_FORCE * force).min(MAX_FREQUENCY),
            gain: (force / 100.0).min(MAX_GAIN),
            duration: TONE_DURATION,
        }
    }

    /// Same tone scaled by a volume multiplier
    pub fn scaled(self, volume: f32) -> Self {
        Self {
            gain: self.gain * volume,
            ..self
        }
    }

    pub fn is_audible(&self) -> bool {
        self.gain > 0.0
    }
}

/// Turns collision impacts into tones
///
/// Silent until [`AudioFeedback::activate`] is called, since browsers only
/// allow an audio context to start after a user gesture.
pub struct AudioFeedback {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    active: bool,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioFeedback {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioFeedback {
    pub fn new(settings: &Settings) -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: None,
            active: false,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Enable playback (call once from a user gesture on the web)
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
                return;
            }
            self.ctx = ctx;
            self.resume();
        }
        self.active = true;
        log::debug!("Audio feedback activated");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play the tone for one impact. Returns the tone if one was produced.
    pub fn play_impact(&self, force: f64) -> Option<Tone> {
        if !self.active {
            return None;
        }
        let tone = Tone::for_impact(force).scaled(self.effective_volume());
        if !tone.is_audible() {
            return None;
        }

        #[cfg(target_arch = "wasm32")]
        self.play_tone(&tone);
        #[cfg(not(target_arch = "wasm32"))]
        log::trace!(
            "tone {:.0} Hz gain {:.3} for force {force}",
            tone.frequency,
            tone.gain
        );

        Some(tone)
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioFeedback {
    /// Resume audio context (required after user gesture)
    fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Impact blip - sine with a fast exponential decay
    fn play_tone(&self, tone: &Tone) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Some((osc, gain)) = self.create_osc(ctx, tone.frequency, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(tone.gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + tone.duration).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> AudioFeedback {
        let mut audio = AudioFeedback::new(&Settings {
            master_volume: 1.0,
            ..Default::default()
        });
        audio.activate();
        audio
    }

    #[test]
    fn tone_pitch_and_gain_follow_force() {
        let soft = Tone::for_impact(5.0);
        assert_eq!(soft.frequency, 160.0);
        assert!((soft.gain - 0.05).abs() < 1e-6);
        assert_eq!(soft.duration, 0.2);

        let hard = Tone::for_impact(5_000.0);
        assert_eq!(hard.frequency, MAX_FREQUENCY);
        assert_eq!(hard.gain, MAX_GAIN);
    }

    #[test]
    fn silent_until_activated() {
        let mut audio = AudioFeedback::default();
        assert!(!audio.is_active());
        assert_eq!(audio.play_impact(40.0), None);
        audio.activate();
        assert!(audio.is_active());
        assert!(audio.play_impact(40.0).is_some());
    }

    #[test]
    fn mute_and_volume() {
        let mut audio = active();
        let full = audio.play_impact(20.0).unwrap();

        audio.set_master_volume(0.5);
        let half = audio.play_impact(20.0).unwrap();
        assert!((half.gain - full.gain * 0.5).abs() < 1e-6);
        assert_eq!(half.frequency, full.frequency);

        audio.set_muted(true);
        assert_eq!(audio.play_impact(20.0), None);
    }

    #[test]
    fn zero_force_makes_no_sound() {
        let audio = active();
        assert_eq!(audio.play_impact(0.0), None);
    }
}
