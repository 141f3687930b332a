// loader.rs — background panorama loading with a hand-off back to the UI thread

use crate::error::DecodeError;
use crate::texture::{load_panorama, PanoramaTexture, TargetSize};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

#[derive(Debug)]
pub enum LoadEvent {
    Loaded(PanoramaTexture),
    Failed { path: PathBuf, error: DecodeError },
}

struct Completed {
    generation: u64,
    result: Result<PanoramaTexture, DecodeError>,
}

/// Runs decodes off the event-loop thread. Workers write to the channel,
/// the UI thread is the only reader; only the newest request's result is
/// ever handed out.
pub struct PanoramaLoader {
    target: TargetSize,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    latest: u64,
    pending: bool,
}

impl PanoramaLoader {
    pub fn new(target: TargetSize) -> Self {
        let (tx, rx) = channel();
        Self {
            target,
            tx,
            rx,
            latest: 0,
            pending: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn request(&mut self, path: PathBuf) {
        self.latest += 1;
        self.pending = true;

        let generation = self.latest;
        let target = self.target;
        let tx = self.tx.clone();

        log::info!("Loading panorama in background: {}", path.display());
        thread::spawn(move || {
            let result = load_panorama(&path, target);
            // the loader may be gone if the window closed mid-decode
            let _ = tx.send(Completed { generation, result });
        });
    }

    /// Non-blocking; call once per event-loop iteration.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        while let Ok(done) = self.rx.try_recv() {
            if let Some(event) = self.accept(done) {
                return Some(event);
            }
        }
        None
    }

    fn accept(&mut self, done: Completed) -> Option<LoadEvent> {
        if done.generation != self.latest {
            log::debug!("Discarding superseded load #{}", done.generation);
            return None;
        }
        self.pending = false;

        Some(match done.result {
            Ok(tex) => {
                let (w, h) = tex.dimensions();
                log::info!("Loaded {} as {}x{}", tex.source.display(), w, h);
                LoadEvent::Loaded(tex)
            }
            Err(error) => {
                log::warn!("Panorama load failed: {error}");
                LoadEvent::Failed {
                    path: error.path().to_path_buf(),
                    error,
                }
            }
        })
    }

    #[cfg(test)]
    pub(crate) fn wait(&mut self, timeout: std::time::Duration) -> Option<LoadEvent> {
        let deadline = std::time::Instant::now() + timeout;
        while self.pending {
            let left = deadline.checked_duration_since(std::time::Instant::now())?;
            let done = self.rx.recv_timeout(left).ok()?;
            if let Some(event) = self.accept(done) {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::Path;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn write_png(dir: &Path, name: &str, color: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(4, 2, Rgba(color)).save(&path).unwrap();
        path
    }

    fn small() -> TargetSize {
        TargetSize { width: 4, height: 2 }
    }

    #[test]
    fn delivers_loaded_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", [9, 9, 9, 255]);

        let mut loader = PanoramaLoader::new(small());
        assert!(!loader.is_loading());
        loader.request(path.clone());
        assert!(loader.is_loading());

        match loader.wait(TIMEOUT) {
            Some(LoadEvent::Loaded(tex)) => {
                assert_eq!(tex.source, path);
                assert_eq!(tex.dimensions(), (4, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!loader.is_loading());
    }

    #[test]
    fn reports_failure_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"garbage").unwrap();

        let mut loader = PanoramaLoader::new(small());
        loader.request(path.clone());
        match loader.wait(TIMEOUT) {
            Some(LoadEvent::Failed { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!loader.is_loading());
    }

    #[test]
    fn only_latest_request_is_delivered() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "first.png", [255, 0, 0, 255]);
        let second = write_png(dir.path(), "second.png", [0, 255, 0, 255]);

        let mut loader = PanoramaLoader::new(small());
        loader.request(first);
        loader.request(second.clone());

        match loader.wait(TIMEOUT) {
            Some(LoadEvent::Loaded(tex)) => assert_eq!(tex.source, second),
            other => panic!("unexpected {other:?}"),
        }
        // the superseded result, whenever it arrives, is dropped
        std::thread::sleep(Duration::from_millis(200));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn poll_is_empty_when_idle() {
        let mut loader = PanoramaLoader::new(small());
        assert!(loader.poll().is_none());
    }
}
