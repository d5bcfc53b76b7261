use ascolto::application::ports::RawPcmError;
use ascolto::domain::AudioFormat;
use ascolto::infrastructure::audio::{RAW_PCM_SAMPLE_RATE, decode_raw_pcm};

#[test]
fn given_little_endian_samples_when_decoding_then_scales_to_unit_range() {
    let data = [0x00, 0x40, 0x00, 0xc0, 0x00, 0x00];

    let audio = decode_raw_pcm(&data).unwrap();

    assert_eq!(audio.sample_rate(), RAW_PCM_SAMPLE_RATE.get());
    assert_eq!(audio.samples(), &[0.5, -0.5, 0.0]);
}

#[test]
fn given_odd_length_buffer_when_decoding_then_drops_trailing_byte() {
    let audio = decode_raw_pcm(&[0x00, 0x40, 0x7f]).unwrap();

    assert_eq!(audio.len(), 1);
}

#[test]
fn given_single_byte_when_decoding_then_no_complete_sample() {
    assert_eq!(
        decode_raw_pcm(&[0x01]),
        Err(RawPcmError::NoCompleteSample(1))
    );
}

#[test]
fn given_compressed_container_when_decoding_then_refuses() {
    let mut data = b"fLaC".to_vec();
    data.resize(64, 0);

    let result = decode_raw_pcm(&data);

    assert_eq!(
        result,
        Err(RawPcmError::CompressedContainer(AudioFormat::Flac))
    );
}

#[test]
fn given_id3_tag_when_decoding_then_refuses() {
    let mut data = b"ID3\x04\x00".to_vec();
    data.resize(64, 0);

    assert_eq!(
        decode_raw_pcm(&data),
        Err(RawPcmError::CompressedContainer(AudioFormat::Mp3))
    );
}

#[test]
fn given_leading_samples_matching_mp3_frame_sync_when_decoding_then_reads_them_as_pcm() {
    for first in [-1025i16, -3073, -3329] {
        let data: Vec<u8> = std::iter::once(first)
            .chain((0..1_600).map(|i| (i % 200) as i16 - 100))
            .flat_map(i16::to_le_bytes)
            .collect();

        let audio = decode_raw_pcm(&data).unwrap();

        assert_eq!(audio.len(), 1_601);
        assert_eq!(audio.samples()[0], f32::from(first) / 32768.0);
    }
}
