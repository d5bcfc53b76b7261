mod audio_decoder;
mod ffmpeg_transcoder;
mod format_sniffer;
mod native_decoder;
mod raw_pcm;
mod wav_encoder;

pub use audio_decoder::CascadingAudioDecoder;
pub use ffmpeg_transcoder::{FfmpegTranscoder, check_ffmpeg_binary};
pub use format_sniffer::{container_signature, detect, sniff};
pub use native_decoder::decode_native;
pub use raw_pcm::{RAW_PCM_SAMPLE_RATE, decode_raw_pcm};
pub use wav_encoder::encode_wav_pcm16;
