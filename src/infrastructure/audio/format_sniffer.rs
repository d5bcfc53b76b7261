use crate::application::ports::FormatError;
use crate::domain::AudioFormat;

const MIN_SNIFF_LEN: usize = 12;

const EBML_MAGIC: &[u8] = &[0x1a, 0x45, 0xdf, 0xa3];
const MP3_FRAME_SYNCS: &[&[u8]] = &[&[0xff, 0xfb], &[0xff, 0xf3], &[0xff, 0xf2]];

/// Identifies the container from its leading magic bytes.
pub fn sniff(data: &[u8]) -> Result<AudioFormat, FormatError> {
    if data.len() < MIN_SNIFF_LEN {
        return Err(FormatError::TooShort(data.len()));
    }

    let head = &data[..MIN_SNIFF_LEN];

    if head.starts_with(b"RIFF") && contains(head, b"WAVE") {
        Ok(AudioFormat::Wav)
    } else if head.starts_with(b"ID3") || MP3_FRAME_SYNCS.iter().any(|s| head.starts_with(s)) {
        Ok(AudioFormat::Mp3)
    } else if head.starts_with(b"OggS") {
        Ok(AudioFormat::Ogg)
    } else if head.starts_with(EBML_MAGIC) {
        Ok(AudioFormat::Webm)
    } else if contains(head, b"ftyp") {
        Ok(AudioFormat::Mp4)
    } else if head.starts_with(b"fLaC") {
        Ok(AudioFormat::Flac)
    } else {
        Err(FormatError::Unrecognized)
    }
}

/// Same as [`sniff`], collapsing failures into [`AudioFormat::Unknown`].
pub fn detect(data: &[u8]) -> AudioFormat {
    sniff(data).unwrap_or(AudioFormat::Unknown)
}

/// Compressed container named by a signature headerless PCM cannot start with.
///
/// A bare MP3 frame sync does not count: `ff fb`, `ff f3` and `ff f2` are also
/// ordinary negative little-endian samples.
pub fn container_signature(data: &[u8]) -> Option<AudioFormat> {
    match sniff(data) {
        Ok(AudioFormat::Mp3) if !data.starts_with(b"ID3") => None,
        Ok(format) if format.is_compressed_container() => Some(format),
        _ => None,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
