use std::path::PathBuf;

use fsa_core::{StartIn, WellKnownDirectory};

/// Platform path of a well-known directory, if the platform has one.
pub fn resolve_well_known(dir: WellKnownDirectory) -> Option<PathBuf> {
    match dir {
        WellKnownDirectory::Desktop => dirs::desktop_dir(),
        WellKnownDirectory::Documents => dirs::document_dir(),
        WellKnownDirectory::Downloads => dirs::download_dir(),
        WellKnownDirectory::Music => dirs::audio_dir(),
        WellKnownDirectory::Pictures => dirs::picture_dir(),
        WellKnownDirectory::Videos => dirs::video_dir(),
    }
}

pub fn resolve_start_in(start_in: &StartIn) -> Option<PathBuf> {
    match start_in {
        StartIn::WellKnown(dir) => resolve_well_known(*dir),
        StartIn::Directory(path) => Some(path.clone()),
    }
}
