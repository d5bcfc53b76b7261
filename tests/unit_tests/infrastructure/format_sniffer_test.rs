use ascolto::application::ports::FormatError;
use ascolto::domain::AudioFormat;
use ascolto::infrastructure::audio::{container_signature, detect, sniff};

fn padded(magic: &[u8]) -> Vec<u8> {
    let mut data = magic.to_vec();
    data.resize(16, 0);
    data
}

#[test]
fn given_fewer_than_twelve_bytes_when_sniffing_then_too_short() {
    assert_eq!(sniff(b"RIFF0000WAV"), Err(FormatError::TooShort(11)));
    assert_eq!(detect(b"RIFF"), AudioFormat::Unknown);
}

#[test]
fn given_riff_wave_header_when_sniffing_then_wav() {
    assert_eq!(detect(b"RIFF\x24\x00\x00\x00WAVEfmt "), AudioFormat::Wav);
}

#[test]
fn given_riff_without_wave_when_sniffing_then_unrecognized() {
    assert_eq!(sniff(b"RIFF\x24\x00\x00\x00AVI LIST"), Err(FormatError::Unrecognized));
}

#[test]
fn given_mp3_markers_when_sniffing_then_mp3() {
    assert_eq!(detect(&padded(b"ID3")), AudioFormat::Mp3);
    assert_eq!(detect(&padded(&[0xff, 0xfb])), AudioFormat::Mp3);
    assert_eq!(detect(&padded(&[0xff, 0xf3])), AudioFormat::Mp3);
    assert_eq!(detect(&padded(&[0xff, 0xf2])), AudioFormat::Mp3);
}

#[test]
fn given_container_magics_when_sniffing_then_identifies_each() {
    assert_eq!(detect(&padded(b"OggS")), AudioFormat::Ogg);
    assert_eq!(detect(&padded(&[0x1a, 0x45, 0xdf, 0xa3])), AudioFormat::Webm);
    assert_eq!(detect(&padded(b"fLaC")), AudioFormat::Flac);
}

#[test]
fn given_ftyp_box_at_offset_four_when_sniffing_then_mp4() {
    assert_eq!(detect(b"\x00\x00\x00\x20ftypM4A "), AudioFormat::Mp4);
}

#[test]
fn given_arbitrary_bytes_when_sniffing_then_unknown() {
    assert_eq!(detect(&[0x10; 32]), AudioFormat::Unknown);
}

#[test]
fn given_bare_mp3_frame_sync_when_checking_container_signature_then_none() {
    assert_eq!(container_signature(&padded(&[0xff, 0xfb])), None);
    assert_eq!(container_signature(&padded(&[0xff, 0xf2])), None);
    assert_eq!(container_signature(&padded(b"RIFF")), None);
}

#[test]
fn given_unambiguous_magic_when_checking_container_signature_then_names_container() {
    assert_eq!(container_signature(&padded(b"ID3")), Some(AudioFormat::Mp3));
    assert_eq!(container_signature(&padded(b"OggS")), Some(AudioFormat::Ogg));
    assert_eq!(container_signature(&padded(b"fLaC")), Some(AudioFormat::Flac));
    assert_eq!(
        container_signature(&padded(&[0x1a, 0x45, 0xdf, 0xa3])),
        Some(AudioFormat::Webm)
    );
    assert_eq!(
        container_signature(&padded(b"\x00\x00\x00\x20ftypM4A ")),
        Some(AudioFormat::Mp4)
    );
}
