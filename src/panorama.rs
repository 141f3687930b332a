// panorama.rs — viewer state shared by the input handlers and the UI

use crate::drop_gate::{self, DropOutcome, DropPayload};
use crate::loader::{LoadEvent, PanoramaLoader};
use crate::orbit::{OrbitController, OrbitSettings};
use crate::texture::PanoramaTexture;

/// Non-fatal message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub file: String,
    pub reason: String,
}

pub struct ViewerState {
    pub orbit: OrbitController,
    pub is_fullscreen: bool,
    /// File name of the panorama currently on the sphere.
    pub current: Option<String>,
    pub notice: Option<Notice>,
}

impl ViewerState {
    pub fn new(orbit: OrbitSettings) -> Self {
        Self {
            orbit: OrbitController::new(orbit),
            is_fullscreen: false,
            current: None,
            notice: None,
        }
    }

    /// Returns whether the drop completed.
    pub fn on_drop(&mut self, payload: &DropPayload, loader: &mut PanoramaLoader) -> bool {
        match drop_gate::evaluate(payload) {
            DropOutcome::Accepted(path) => {
                loader.request(path);
                true
            }
            DropOutcome::Rejected => {
                log::info!("Drop rejected: payload carried no files");
                false
            }
        }
    }

    /// Returns the texture to bind, if any. A failure leaves whatever is on
    /// the sphere in place and only raises a notice.
    pub fn on_load_event(&mut self, event: LoadEvent) -> Option<PanoramaTexture> {
        match event {
            LoadEvent::Loaded(tex) => {
                self.current = Some(tex.display_name());
                self.notice = None;
                Some(tex)
            }
            LoadEvent::Failed { path, error } => {
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let reason = match &error {
                    crate::error::DecodeError::Open { source, .. } => source.to_string(),
                    crate::error::DecodeError::Image { source, .. } => source.to_string(),
                };
                self.notice = Some(Notice { file, reason });
                None
            }
        }
    }

    pub fn reset_view(&mut self) {
        self.orbit.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TargetSize;
    use image::{Rgba, RgbaImage};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn write_png(dir: &Path, name: &str, left: [u8; 4], right: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_fn(4, 2, |x, _| if x < 2 { Rgba(left) } else { Rgba(right) })
            .save(&path)
            .unwrap();
        path
    }

    fn setup() -> (ViewerState, PanoramaLoader) {
        (
            ViewerState::new(OrbitSettings::default()),
            PanoramaLoader::new(TargetSize { width: 8, height: 4 }),
        )
    }

    #[test]
    fn empty_drop_does_not_complete_or_load() {
        let (mut state, mut loader) = setup();
        assert!(!state.on_drop(&DropPayload::default(), &mut loader));
        assert!(!loader.is_loading());
        assert!(state.current.is_none());
    }

    #[test]
    fn multi_file_drop_binds_only_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "first.png", [255, 0, 0, 255], [0, 0, 255, 255]);
        let second = write_png(dir.path(), "second.png", [0, 255, 0, 255], [0, 255, 0, 255]);

        let (mut state, mut loader) = setup();
        let payload = DropPayload {
            files: vec![first.clone(), second],
        };
        assert!(state.on_drop(&payload, &mut loader));

        let event = loader.wait(Duration::from_secs(10)).expect("load finished");
        let tex = state.on_load_event(event).expect("texture to bind");
        assert_eq!(tex.source, first);
        assert_eq!(tex.dimensions(), (8, 4));
        // mirrored: blue (right half of the source) now starts at the left edge
        assert_eq!(*tex.pixels.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*tex.pixels.get_pixel(7, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(state.current.as_deref(), Some("first.png"));
    }

    #[test]
    fn failed_load_keeps_current_and_raises_notice() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_png(dir.path(), "good.png", [1, 2, 3, 255], [1, 2, 3, 255]);
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"nope").unwrap();

        let (mut state, mut loader) = setup();
        state.on_drop(&DropPayload { files: vec![good] }, &mut loader);
        let event = loader.wait(Duration::from_secs(10)).unwrap();
        assert!(state.on_load_event(event).is_some());

        state.on_drop(&DropPayload { files: vec![bad] }, &mut loader);
        let event = loader.wait(Duration::from_secs(10)).unwrap();
        assert!(state.on_load_event(event).is_none());
        assert_eq!(state.current.as_deref(), Some("good.png"));
        assert_eq!(state.notice.as_ref().map(|n| n.file.as_str()), Some("bad.png"));
    }

    #[test]
    fn reset_view_recentres() {
        let (mut state, _) = setup();
        state.orbit.pointer_down(0.0, 0.0);
        state.orbit.pointer_drag(100.0, 100.0);
        state.reset_view();
        assert_eq!((state.orbit.yaw(), state.orbit.pitch()), (0.0, 0.0));
    }
}
