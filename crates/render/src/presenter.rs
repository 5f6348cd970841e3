use std::collections::VecDeque;

use tracing::debug;

use crate::error::FrameError;
use crate::frame::{FrameRing, FrameToken, SlotState};

/// The presentation side of the frame pipeline: consumes submitted frames
/// and reports when a slot may be written again.
pub trait FramePresenter {
    /// Block until `slot` is idle, retiring whatever frame occupied it.
    fn wait_for_slot(&mut self, ring: &mut FrameRing, slot: usize) -> Result<(), FrameError>;

    /// Queue a submitted frame for presentation.
    fn present(&mut self, token: FrameToken);

    /// Retire every outstanding frame.
    fn wait_idle(&mut self, ring: &mut FrameRing) -> Result<(), FrameError>;
}

/// Presenter without a device. Frames complete in submission order, and
/// only when the ring needs their slot back, so up to `frames_in_flight`
/// frames are outstanding at any time.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    queue: VecDeque<FrameToken>,
    presented: u64,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames handed to [`present`](FramePresenter::present).
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Frames presented but not yet retired.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl FramePresenter for HeadlessPresenter {
    fn wait_for_slot(&mut self, ring: &mut FrameRing, slot: usize) -> Result<(), FrameError> {
        loop {
            let state = ring
                .slot(slot)
                .map(|s| s.state())
                .ok_or(FrameError::NoSuchSlot { slot })?;
            if state != SlotState::InFlight {
                return Ok(());
            }
            let Some(oldest) = self.queue.pop_front() else {
                let frame = ring.slot(slot).and_then(|s| s.frame_number()).unwrap_or_default();
                return Err(FrameError::SlotInFlight { slot, frame });
            };
            debug!(frame = oldest.frame_number(), slot = oldest.slot_index(), "frame completed");
            ring.retire(oldest)?;
        }
    }

    fn present(&mut self, token: FrameToken) {
        self.presented += 1;
        self.queue.push_back(token);
    }

    fn wait_idle(&mut self, ring: &mut FrameRing) -> Result<(), FrameError> {
        while let Some(token) = self.queue.pop_front() {
            ring.retire(token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(ring: &mut FrameRing, frame: u64) -> FrameToken {
        let index = ring.slot_index_for(frame);
        ring.begin_write(index, frame).unwrap();
        ring.submit(index, 0.0).unwrap()
    }

    #[test]
    fn idle_slot_needs_no_wait() {
        let mut ring = FrameRing::new(2).unwrap();
        let mut presenter = HeadlessPresenter::new();
        presenter.wait_for_slot(&mut ring, 0).unwrap();
        assert_eq!(presenter.pending(), 0);
    }

    #[test]
    fn waiting_retires_oldest_frames_first() {
        let mut ring = FrameRing::new(2).unwrap();
        let mut presenter = HeadlessPresenter::new();
        presenter.present(submit(&mut ring, 0));
        presenter.present(submit(&mut ring, 1));
        assert_eq!(ring.in_flight(), 2);

        presenter.wait_for_slot(&mut ring, 0).unwrap();
        assert_eq!(ring.slot(0).unwrap().state(), SlotState::Idle);
        assert_eq!(ring.slot(1).unwrap().state(), SlotState::InFlight);
        assert_eq!(presenter.pending(), 1);
    }

    #[test]
    fn unpresented_frame_cannot_be_waited_on() {
        let mut ring = FrameRing::new(1).unwrap();
        let mut presenter = HeadlessPresenter::new();
        let _held = submit(&mut ring, 0);
        assert_eq!(
            presenter.wait_for_slot(&mut ring, 0),
            Err(FrameError::SlotInFlight { slot: 0, frame: 0 })
        );
    }

    #[test]
    fn wait_idle_drains_everything() {
        let mut ring = FrameRing::new(3).unwrap();
        let mut presenter = HeadlessPresenter::new();
        for frame in 0..3 {
            presenter.present(submit(&mut ring, frame));
        }
        presenter.wait_idle(&mut ring).unwrap();
        assert_eq!(ring.in_flight(), 0);
        assert_eq!(presenter.presented(), 3);
    }
}
