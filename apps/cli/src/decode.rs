//! Audio file decoding with Symphonia
//!
//! Produces the mono, 16-bit-scale buffer the fingerprint pipeline expects.
//! Only the first channel of multi-channel files is kept.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use anchorprint_fingerprint::AudioSignal;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::{DecodeError, DecodeResult};

/// Decode an audio file, labelling the signal with its file name
pub fn decode_file(path: &Path) -> DecodeResult<AudioSignal> {
    let file = File::open(path)?;
    let source_id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path.extension().and_then(|ext| ext.to_str());

    decode_source(Box::new(file), extension, source_id)
}

/// Decode an in-memory audio file
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>, source_id: &str) -> DecodeResult<AudioSignal> {
    decode_source(Box::new(std::io::Cursor::new(bytes)), extension, source_id.to_string())
}

fn decode_source(
    source: Box<dyn MediaSource>,
    extension: Option<&str>,
    source_id: String,
) -> DecodeResult<AudioSignal> {
    let stream = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;
    let mut format = probed.format;

    let track = format.default_track().ok_or(DecodeError::NoTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::MissingSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channel_count = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!("Skipping undecodable packet in {}: {}", source_id, msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        channel_count = channels;

        let mut buffer = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(buffer.samples().iter().step_by(channels).map(|&s| s as f32));
    }

    if channel_count > 1 {
        debug!(
            "{}: kept first of {} channels",
            source_id, channel_count
        );
    }
    debug!(
        "Decoded {}: {} samples at {} Hz",
        source_id,
        samples.len(),
        sample_rate
    );

    Ok(AudioSignal::new(samples, sample_rate, source_id))
}
