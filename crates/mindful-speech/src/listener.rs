//! Energy-threshold listener for live capture.
//!
//! Frames whose RMS energy exceeds the threshold count as speech. The
//! listener calibrates the threshold against background noise, waits for
//! speech to start, then collects a phrase until the speaker pauses or the
//! phrase limit is reached. Timing is measured in audio samples, so behavior
//! is reproducible on synthetic sources. A wall clock only bounds how long a
//! live source may go without delivering a frame.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use mindful_core::config::ListenConfig;

use crate::error::CaptureError;
use crate::AudioData;

/// Damping base applied per second of audio when adapting the threshold.
const DYNAMIC_DAMPING: f64 = 0.15;
/// Target threshold as a multiple of the observed ambient energy.
const DYNAMIC_RATIO: f64 = 1.5;

// =============================================================================
// Sources
// =============================================================================

/// A stream of mono 16-bit PCM frames.
pub trait AudioSource: Send {
    /// Sample rate of the frames in Hz.
    fn sample_rate(&self) -> u32;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Result<Option<Vec<i16>>, CaptureError>> + Send;
}

/// In-memory source that replays a buffer in fixed-size frames.
#[derive(Debug, Clone)]
pub struct PcmSource {
    samples: Vec<i16>,
    sample_rate: u32,
    frame_len: usize,
    pos: usize,
}

impl PcmSource {
    pub fn new(samples: Vec<i16>, sample_rate: u32, frame_len: usize) -> Self {
        Self {
            samples,
            sample_rate,
            frame_len: frame_len.max(1),
            pos: 0,
        }
    }

    /// Samples not yet handed out.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.pos
    }
}

impl AudioSource for PcmSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn next_frame(&mut self) -> Result<Option<Vec<i16>>, CaptureError> {
        if self.pos >= self.samples.len() {
            return Ok(None);
        }
        let end = (self.pos + self.frame_len).min(self.samples.len());
        let frame = self.samples[self.pos..end].to_vec();
        self.pos = end;
        Ok(Some(frame))
    }
}

/// Result of waiting for one frame against a deadline.
enum Read {
    Frame(Vec<i16>),
    Exhausted,
    Stalled,
}

async fn read_frame<S: AudioSource>(
    source: &mut S,
    deadline: Instant,
) -> Result<Read, CaptureError> {
    match tokio::time::timeout_at(deadline, source.next_frame()).await {
        Ok(Ok(Some(frame))) => Ok(Read::Frame(frame)),
        Ok(Ok(None)) => Ok(Read::Exhausted),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(Read::Stalled),
    }
}

// =============================================================================
// Listener
// =============================================================================

/// Root-mean-square energy of a frame.
pub fn rms(frame: &[i16]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / frame.len() as f64).sqrt()
}

fn samples_for(duration: Duration, sample_rate: u32) -> u64 {
    (duration.as_secs_f64() * sample_rate as f64).round() as u64
}

fn checked_rate<S: AudioSource>(source: &S) -> Result<u32, CaptureError> {
    match source.sample_rate() {
        0 => Err(CaptureError::ServiceUnavailable(
            "audio source reports a zero sample rate".to_string(),
        )),
        rate => Ok(rate),
    }
}

/// Speech detector holding the current energy threshold.
#[derive(Debug, Clone)]
pub struct Listener {
    config: ListenConfig,
    energy_threshold: f64,
}

impl Listener {
    pub fn new(config: ListenConfig) -> Self {
        let energy_threshold = config.energy_threshold;
        Self {
            config,
            energy_threshold,
        }
    }

    pub fn energy_threshold(&self) -> f64 {
        self.energy_threshold
    }

    fn adapt(&mut self, energy: f64, frame_secs: f64) {
        let damping = DYNAMIC_DAMPING.powf(frame_secs);
        self.energy_threshold =
            self.energy_threshold * damping + energy * DYNAMIC_RATIO * (1.0 - damping);
    }

    /// Move the threshold towards the background level of `source`, reading
    /// audio for `duration`.
    pub async fn adjust_for_ambient_noise<S: AudioSource>(
        &mut self,
        source: &mut S,
        duration: Duration,
    ) -> Result<(), CaptureError> {
        let rate = checked_rate(source)?;
        let budget = samples_for(duration, rate);
        let deadline = Instant::now() + duration;
        let mut consumed = 0u64;

        while consumed < budget {
            let Read::Frame(frame) = read_frame(source, deadline).await? else {
                break;
            };
            consumed += frame.len() as u64;
            self.adapt(rms(&frame), frame.len() as f64 / rate as f64);
        }

        tracing::debug!(
            threshold = self.energy_threshold,
            calibrated_samples = consumed,
            "Calibrated for ambient noise"
        );
        Ok(())
    }

    /// Wait for speech and capture one phrase.
    ///
    /// Fails with [`CaptureError::Timeout`] if no speech starts within
    /// `timeout`, measured both in samples and on the clock, or if the source
    /// ends first. Once speech has started, a source that delivers nothing
    /// for `stall_ms` fails with [`CaptureError::ServiceUnavailable`]. The
    /// phrase ends after a pause
    /// of `pause_ms`, after `phrase_limit`, or when the source ends. Phrases
    /// with less than `phrase_min_ms` of speech are dropped and waiting
    /// resumes.
    pub async fn listen<S: AudioSource>(
        &mut self,
        source: &mut S,
        timeout: Option<Duration>,
        phrase_limit: Option<Duration>,
    ) -> Result<AudioData, CaptureError> {
        let rate = checked_rate(source)?;
        let wait_deadline = timeout.map(|t| Instant::now() + t);
        let timeout = timeout.map(|t| samples_for(t, rate));
        let phrase_limit = phrase_limit.map(|t| samples_for(t, rate));
        let pause = samples_for(Duration::from_millis(self.config.pause_ms), rate);
        let phrase_min = samples_for(Duration::from_millis(self.config.phrase_min_ms), rate);
        let non_speaking = samples_for(Duration::from_millis(self.config.non_speaking_ms), rate);
        let stall = Duration::from_millis(self.config.stall_ms);

        let mut elapsed = 0u64;

        loop {
            let mut frames: VecDeque<Vec<i16>> = VecDeque::new();
            let mut buffered = 0u64;

            // Wait for the first frame above the threshold, keeping a short
            // pre-roll so the start of the first word is not clipped.
            let trigger_len = loop {
                if let Some(limit) = timeout {
                    if elapsed >= limit {
                        return Err(CaptureError::Timeout);
                    }
                }
                let deadline = wait_deadline.unwrap_or_else(|| Instant::now() + stall);
                let Read::Frame(frame) = read_frame(source, deadline).await? else {
                    return Err(CaptureError::Timeout);
                };
                let len = frame.len() as u64;
                let energy = rms(&frame);
                elapsed += len;
                buffered += len;
                frames.push_back(frame);

                while frames.len() > 1 {
                    let front = frames.front().map_or(0, |f| f.len() as u64);
                    if buffered - front < non_speaking {
                        break;
                    }
                    buffered -= front;
                    frames.pop_front();
                }

                if energy > self.energy_threshold {
                    break len;
                }
                if self.config.dynamic_energy {
                    self.adapt(energy, len as f64 / rate as f64);
                }
            };

            let phrase_start = elapsed - trigger_len;
            let mut phrase = trigger_len;
            let mut pause_run = 0u64;
            let mut exhausted = false;

            loop {
                if let Some(limit) = phrase_limit {
                    if elapsed - phrase_start >= limit {
                        break;
                    }
                }
                let frame = match read_frame(source, Instant::now() + stall).await? {
                    Read::Frame(frame) => frame,
                    Read::Exhausted => {
                        exhausted = true;
                        break;
                    }
                    Read::Stalled => {
                        return Err(CaptureError::ServiceUnavailable(
                            "audio source stopped delivering frames".to_string(),
                        ))
                    }
                };
                let len = frame.len() as u64;
                let energy = rms(&frame);
                elapsed += len;
                phrase += len;
                frames.push_back(frame);

                if energy > self.energy_threshold {
                    pause_run = 0;
                } else {
                    pause_run += len;
                }
                if pause_run > pause {
                    break;
                }
            }

            if phrase - pause_run >= phrase_min || exhausted {
                // Keep only `non_speaking` worth of trailing silence.
                let mut excess = pause_run.saturating_sub(non_speaking);
                while frames.len() > 1 {
                    let back = frames.back().map_or(0, |f| f.len() as u64);
                    if back > excess {
                        break;
                    }
                    excess -= back;
                    frames.pop_back();
                }

                let samples: Vec<i16> = frames.into_iter().flatten().collect();
                let audio = AudioData::new(samples, rate);
                tracing::debug!(
                    duration_secs = audio.duration_secs(),
                    threshold = self.energy_threshold,
                    "Phrase captured"
                );
                return Ok(audio);
            }

            tracing::debug!(
                speech_samples = phrase - pause_run,
                "Phrase too short, waiting for speech again"
            );
        }
    }
}
