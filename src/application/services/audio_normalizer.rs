use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::domain::DecodedAudio;

pub const TARGET_SAMPLE_RATE: u32 = 16_000;

const RESAMPLE_CHUNK: usize = 1024;
const MAX_FLUSH_CHUNKS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResampleError {
    #[error("invalid sample rates: {from_rate} Hz -> {to_rate} Hz")]
    InvalidRate { from_rate: u32, to_rate: u32 },
    #[error("resampler init: {0}")]
    Init(String),
    #[error("resample: {0}")]
    Process(String),
}

/// Peak-normalizes and resamples decoded audio to a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct AudioNormalizer {
    target_rate: u32,
}

impl Default for AudioNormalizer {
    fn default() -> Self {
        Self::new(TARGET_SAMPLE_RATE)
    }
}

impl AudioNormalizer {
    pub fn new(target_rate: u32) -> Self {
        Self { target_rate }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    pub fn prepare(&self, audio: DecodedAudio) -> Result<DecodedAudio, ResampleError> {
        let from_rate = audio.sample_rate();
        let normalized = normalize_peak(audio.samples());
        let resampled = resample(&normalized, from_rate, self.target_rate)?;

        DecodedAudio::new(resampled, self.target_rate).map_err(|_| ResampleError::InvalidRate {
            from_rate,
            to_rate: self.target_rate,
        })
    }
}

/// Scales samples so the largest magnitude is 1.0. Silent or empty input is
/// returned unchanged.
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        samples.iter().map(|s| s / peak).collect()
    } else {
        samples.to_vec()
    }
}

/// Band-limited sinc resampling.
///
/// Parameters: sinc length 256, cutoff 0.95, linear interpolation with 256x
/// oversampling, Blackman-Harris² window, 1024-frame chunks. The filter delay
/// is trimmed so the output is `round(len * to_rate / from_rate)` samples.
pub fn resample(
    samples: &[f32],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, ResampleError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(ResampleError::InvalidRate { from_rate, to_rate });
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK, 1)
        .map_err(|e| ResampleError::Init(e.to_string()))?;

    let expected_len = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected_len + delay + RESAMPLE_CHUNK);

    for chunk in samples.chunks(RESAMPLE_CHUNK) {
        let mut input = chunk.to_vec();
        input.resize(RESAMPLE_CHUNK, 0.0);
        process_chunk(&mut resampler, input, &mut output)?;
    }

    // Push zeros through until the delayed tail has come out.
    let mut flushes = 0;
    while output.len() < delay + expected_len && flushes < MAX_FLUSH_CHUNKS {
        process_chunk(&mut resampler, vec![0.0; RESAMPLE_CHUNK], &mut output)?;
        flushes += 1;
    }

    Ok(output.into_iter().skip(delay).take(expected_len).collect())
}

fn process_chunk(
    resampler: &mut SincFixedIn<f32>,
    input: Vec<f32>,
    output: &mut Vec<f32>,
) -> Result<(), ResampleError> {
    let result = resampler
        .process(&[input], None)
        .map_err(|e| ResampleError::Process(e.to_string()))?;

    if let Some(channel) = result.first() {
        output.extend_from_slice(channel);
    }
    Ok(())
}
