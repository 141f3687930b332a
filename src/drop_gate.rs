// drop_gate.rs — which dropped file (if any) gets loaded
//
// winit reports a multi-file drop as one DroppedFile event per path, all
// delivered in the same event-loop iteration. DropCollector folds them back
// into a single payload that is evaluated once the iteration's events drain.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropPayload {
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing usable was dropped; the drop does not complete.
    Rejected,
    /// Load this path. Any further files in the payload are ignored.
    Accepted(PathBuf),
}

pub fn evaluate(payload: &DropPayload) -> DropOutcome {
    match payload.files.split_first() {
        None => DropOutcome::Rejected,
        Some((first, rest)) => {
            if !rest.is_empty() {
                log::info!("Ignoring {} extra dropped file(s)", rest.len());
            }
            DropOutcome::Accepted(first.clone())
        }
    }
}

#[derive(Debug, Default)]
pub struct DropCollector {
    hovering: bool,
    pending: Vec<PathBuf>,
}

impl DropCollector {
    /// A drag carrying files entered the window.
    pub fn hover(&mut self, _path: PathBuf) {
        self.hovering = true;
    }

    pub fn cancel_hover(&mut self) {
        self.hovering = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn drop_file(&mut self, path: PathBuf) {
        self.hovering = false;
        self.pending.push(path);
    }

    /// Hands out the files dropped since the last call, in arrival order.
    pub fn take_payload(&mut self) -> Option<DropPayload> {
        if self.pending.is_empty() {
            return None;
        }
        Some(DropPayload {
            files: std::mem::take(&mut self.pending),
        })
    }
}
