//! Extension lists used to decide what counts as playable media.

use std::path::Path;

const ADLIB_EXTS: &[&str] = &[
    "a2m", "adl", "amd", "bam", "cff", "cmf", "d00", "dfm", "dmo", "dro", "dtm", "hsc", "hsp",
    "jbm", "ksm", "laa", "lds", "mad", "mkj", "msc", "mtk", "rad", "raw", "rix", "rol", "sat",
    "sa2", "sci", "sng", "imf", "wlf", "xad", "xsm", "m", "adlib",
];
const CONSOLE_EXTS: &[&str] = &[
    "adx", "gbs", "gym", "hes", "kss", "nsf", "nsfe", "ay", "psf", "sap", "sid", "spc", "vgm",
    "vgz", "vtx", "ym", "minipsf",
];
const MIDI_EXTS: &[&str] = &["mid", "rmi", "midi"];
const MODULE_EXTS: &[&str] = &["mod", "s3m", "stm", "xm", "it"];
const VIDEO_EXTS: &[&str] = &["avi", "flv", "m4v", "mov", "mp4", "webm", "rm"];
const WAVEFORM_EXTS: &[&str] = &[
    "aac", "ac3", "aif", "aiff", "ape", "au", "flac", "m4a", "mp2", "mp3", "mpc", "ogg", "shn",
    "snd", "tta", "voc", "wav", "wma", "wv",
];

// Playlists are left out on purpose; they can be enqueued directly.
const PLAYABLE: &[&[&str]] = &[
    WAVEFORM_EXTS,
    MODULE_EXTS,
    CONSOLE_EXTS,
    MIDI_EXTS,
    ADLIB_EXTS,
    VIDEO_EXTS,
];

/// Never picked by random selection: playlists, cover art, text, SIDs
/// (they tend to loop forever) and MIDI (needs the synth switched on).
const RANDOM_BLACKLIST: &[&str] = &[
    "m3u", "pls", "xspf", "jpg", "jpeg", "png", "gif", "bmp", "txt", "html", "htm", "sid", "mid",
    "midi", "rmi",
];

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

pub fn is_playable(path: &Path) -> bool {
    extension_lowercase(path)
        .is_some_and(|ext| PLAYABLE.iter().any(|group| group.contains(&ext.as_str())))
}

pub fn is_random_candidate(path: &Path) -> bool {
    !extension_lowercase(path).is_some_and(|ext| RANDOM_BLACKLIST.contains(&ext.as_str()))
}
