//! WAV decoding for uploaded recordings.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use mindful_core::error::MindfulError;

use crate::error::CaptureError;
use crate::AudioData;

/// Decode a WAV blob into mono 16-bit PCM.
///
/// Integer samples of any width are rescaled to 16 bits and float samples
/// are clipped to full scale. Multi-channel audio is averaged down to one
/// channel. Anything hound cannot parse is reported as
/// [`CaptureError::Unrecognized`]: the bytes were audio we cannot hear.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioData, CaptureError> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| {
        tracing::debug!("Rejected recording: {}", e);
        CaptureError::Unrecognized
    })?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(CaptureError::Unrecognized);
    }

    let interleaved = read_samples(reader, spec).map_err(|e| {
        tracing::debug!("Recording truncated or corrupt: {}", e);
        CaptureError::Unrecognized
    })?;

    let channels = spec.channels as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    };

    tracing::debug!(
        channels,
        bits = spec.bits_per_sample,
        sample_rate = spec.sample_rate,
        samples = samples.len(),
        "Decoded recording"
    );
    Ok(AudioData::new(samples, spec.sample_rate))
}

fn read_samples(
    mut reader: WavReader<Cursor<&[u8]>>,
    spec: WavSpec,
) -> Result<Vec<i16>, hound::Error> {
    match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect(),
        SampleFormat::Int => {
            let bits = spec.bits_per_sample as u32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| rescale(v, bits)))
                .collect()
        }
    }
}

fn rescale(sample: i32, bits: u32) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

/// Encode audio as a mono 16-bit WAV file.
pub fn encode_wav(audio: &AudioData) -> Result<Vec<u8>, MindfulError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut buffer, spec).map_err(|e| MindfulError::Audio(e.to_string()))?;
        for &sample in &audio.samples {
            writer
                .write_sample(sample)
                .map_err(|e| MindfulError::Audio(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| MindfulError::Audio(e.to_string()))?;
    }
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buffer, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_encoded_audio_decodes_unchanged() {
        let audio = AudioData::new(vec![0, 1_000, -1_000, i16::MAX, i16::MIN], 16_000);
        let bytes = encode_wav(&audio).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(decode_wav(&bytes).unwrap(), audio);
    }

    #[test]
    fn test_stereo_is_downmixed() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            for (l, r) in [(100i16, 300i16), (-200, 200), (1_000, 0)] {
                w.write_sample(l).unwrap();
                w.write_sample(r).unwrap();
            }
        });

        let audio = decode_wav(&bytes).unwrap();
        assert_eq!(audio.sample_rate, 44_100);
        assert_eq!(audio.samples, vec![200, 0, 500]);
    }

    #[test]
    fn test_eight_bit_is_rescaled() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            w.write_sample(64i8).unwrap();
            w.write_sample(-128i8).unwrap();
        });

        let audio = decode_wav(&bytes).unwrap();
        assert_eq!(audio.samples, vec![64 << 8, i16::MIN]);
    }

    #[test]
    fn test_float_is_clipped_to_full_scale() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            w.write_sample(0.5f32).unwrap();
            w.write_sample(2.0f32).unwrap();
            w.write_sample(-2.0f32).unwrap();
        });

        let audio = decode_wav(&bytes).unwrap();
        assert_eq!(audio.samples, vec![16_383, i16::MAX, -i16::MAX]);
    }

    #[test]
    fn test_garbage_is_unrecognized() {
        assert_eq!(
            decode_wav(b"definitely not a wav file"),
            Err(CaptureError::Unrecognized)
        );
        assert_eq!(decode_wav(&[]), Err(CaptureError::Unrecognized));
    }

    #[test]
    fn test_header_only_decodes_to_empty_audio() {
        let bytes = encode_wav(&AudioData::new(Vec::new(), 16_000)).unwrap();
        let audio = decode_wav(&bytes).unwrap();
        assert!(audio.is_empty());
    }
}
