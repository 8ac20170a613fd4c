//! WAV sample sources for offline analysis.
//!
//! The analyzer consumes signed 8-bit mono samples, so every file is mixed
//! down and quantized on load.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use specscope_core::Sample;
use std::path::Path;

/// Metadata of a loaded WAV file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    /// Channels in the file (before mixdown).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Whether samples were stored as IEEE float.
    pub float: bool,
    /// Sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// Read a WAV file as signed 8-bit mono samples.
///
/// Multi-channel files are averaged to mono, then each sample is scaled from
/// [-1.0, 1.0] to [-128, 127] and clamped.
pub fn read_wav_i8<P: AsRef<Path>>(path: P) -> Result<(Vec<Sample>, WavInfo)> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let quantized: Vec<Sample> = samples
        .chunks(channels)
        .map(|frame| quantize(frame.iter().sum::<f32>() / frame.len() as f32))
        .collect();

    let num_frames = quantized.len() as u64;
    let info = WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        float: spec.sample_format == SampleFormat::Float,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate.max(1)),
    };
    Ok((quantized, info))
}

/// Write signed 8-bit samples as a mono 8-bit PCM WAV file.
pub fn write_wav_i8<P: AsRef<Path>>(path: P, samples: &[Sample], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 8,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[inline]
fn quantize(value: f32) -> Sample {
    (value * 128.0).round().clamp(-128.0, 127.0) as Sample
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 127);
        assert_eq!(quantize(-1.0), -128);
        assert_eq!(quantize(4.0), 127);
        assert_eq!(quantize(0.5), 64);
        assert_eq!(quantize(f32::NAN), 0);
    }
}
