use std::sync::atomic::{AtomicU64, Ordering};

use lumen_common::MAX_FRAMES_IN_FLIGHT;
use tracing::trace;

use crate::error::FrameError;
use crate::ubo::GlobalUbo;

/// Lifecycle of a frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No pass holds the slot; its uniform block may be overwritten.
    Idle,
    /// The orchestrator is filling the uniform block.
    Writing,
    /// Handed to render passes and the presentation side.
    InFlight,
}

/// Per-slot binding state a backend attaches its descriptor or bind group
/// to. Headless backends only read the bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding {
    /// Uniform binding number within the global set.
    pub binding: u32,
    pub slot_index: usize,
    /// Number of times this slot's block has been written.
    pub writes: u64,
}

#[derive(Debug, Clone)]
pub struct FrameSlot {
    index: usize,
    state: SlotState,
    frame_number: Option<u64>,
    frame_time: f32,
    ubo: GlobalUbo,
    binding: SlotBinding,
}

impl FrameSlot {
    fn new(index: usize) -> Self {
        Self {
            index,
            state: SlotState::Idle,
            frame_number: None,
            frame_time: 0.0,
            ubo: GlobalUbo::default(),
            binding: SlotBinding {
                binding: 0,
                slot_index: index,
                writes: 0,
            },
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Frame that last used this slot, if any.
    pub fn frame_number(&self) -> Option<u64> {
        self.frame_number
    }

    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn ubo(&self) -> &GlobalUbo {
        &self.ubo
    }

    pub fn binding(&self) -> &SlotBinding {
        &self.binding
    }
}

/// Proof that a frame was submitted on a slot. Handing it back through
/// [`FrameRing::retire`] is the only way the slot returns to `Idle`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a slot stays in flight until its token is retired"]
pub struct FrameToken {
    ring: u64,
    frame_number: u64,
    slot_index: usize,
}

impl FrameToken {
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }
}

static NEXT_RING_ID: AtomicU64 = AtomicU64::new(0);

/// Fixed arena of frame slots, used round-robin by frame number.
///
/// Each ring only accepts the tokens it issued.
#[derive(Debug)]
pub struct FrameRing {
    id: u64,
    slots: Vec<FrameSlot>,
}

impl FrameRing {
    pub fn new(frames_in_flight: usize) -> Result<Self, FrameError> {
        if !(1..=MAX_FRAMES_IN_FLIGHT).contains(&frames_in_flight) {
            return Err(FrameError::InvalidFramesInFlight {
                got: frames_in_flight,
                max: MAX_FRAMES_IN_FLIGHT,
            });
        }
        Ok(Self {
            id: NEXT_RING_ID.fetch_add(1, Ordering::Relaxed),
            slots: (0..frames_in_flight).map(FrameSlot::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_index_for(&self, frame_number: u64) -> usize {
        (frame_number % self.slots.len() as u64) as usize
    }

    pub fn slot(&self, index: usize) -> Option<&FrameSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    pub fn in_flight(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state == SlotState::InFlight)
            .count()
    }

    /// `Idle -> Writing`. Returns the uniform block to fill.
    pub fn begin_write(
        &mut self,
        index: usize,
        frame_number: u64,
    ) -> Result<&mut GlobalUbo, FrameError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FrameError::NoSuchSlot { slot: index })?;
        match slot.state {
            SlotState::Idle => {}
            SlotState::Writing => return Err(FrameError::SlotBusy { slot: index }),
            SlotState::InFlight => {
                return Err(FrameError::SlotInFlight {
                    slot: index,
                    frame: slot.frame_number.unwrap_or_default(),
                });
            }
        }
        slot.state = SlotState::Writing;
        slot.frame_number = Some(frame_number);
        Ok(&mut slot.ubo)
    }

    /// `Writing -> InFlight`.
    pub fn submit(&mut self, index: usize, frame_time: f32) -> Result<FrameToken, FrameError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FrameError::NoSuchSlot { slot: index })?;
        if slot.state != SlotState::Writing {
            return Err(FrameError::NotWriting { slot: index });
        }
        slot.state = SlotState::InFlight;
        slot.frame_time = frame_time;
        slot.binding.writes += 1;
        Ok(FrameToken {
            ring: self.id,
            frame_number: slot.frame_number.unwrap_or_default(),
            slot_index: index,
        })
    }

    /// `InFlight -> Idle` once the consumer is done with the slot.
    pub fn retire(&mut self, token: FrameToken) -> Result<(), FrameError> {
        let index = self.in_flight_slot(&token)?.index;
        self.slots[index].state = SlotState::Idle;
        trace!(slot = index, frame = token.frame_number, "slot retired");
        Ok(())
    }

    /// The slot `token` refers to, provided it is still in flight with that
    /// frame.
    pub fn in_flight_slot(&self, token: &FrameToken) -> Result<&FrameSlot, FrameError> {
        if token.ring != self.id {
            return Err(FrameError::ForeignToken {
                slot: token.slot_index,
                frame: token.frame_number,
            });
        }
        let slot = self
            .slots
            .get(token.slot_index)
            .ok_or(FrameError::NoSuchSlot {
                slot: token.slot_index,
            })?;
        if slot.state != SlotState::InFlight {
            return Err(FrameError::NotInFlight { slot: slot.index });
        }
        let slot_frame = slot.frame_number.unwrap_or_default();
        if slot_frame != token.frame_number {
            return Err(FrameError::StaleToken {
                slot: slot.index,
                token_frame: token.frame_number,
                slot_frame,
            });
        }
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(ring: &mut FrameRing, frame: u64) -> FrameToken {
        let index = ring.slot_index_for(frame);
        ring.begin_write(index, frame).unwrap();
        ring.submit(index, 0.016).unwrap()
    }

    #[test]
    fn slot_count_is_bounded() {
        assert!(matches!(
            FrameRing::new(0),
            Err(FrameError::InvalidFramesInFlight { got: 0, .. })
        ));
        assert!(FrameRing::new(MAX_FRAMES_IN_FLIGHT + 1).is_err());
        assert_eq!(FrameRing::new(3).unwrap().len(), 3);
    }

    #[test]
    fn slots_cycle_through_states() {
        let mut ring = FrameRing::new(2).unwrap();
        assert_eq!(ring.slot(0).unwrap().state(), SlotState::Idle);
        ring.begin_write(0, 0).unwrap();
        assert_eq!(ring.slot(0).unwrap().state(), SlotState::Writing);
        let token = ring.submit(0, 0.01).unwrap();
        assert_eq!(ring.slot(0).unwrap().state(), SlotState::InFlight);
        assert_eq!(ring.in_flight(), 1);
        ring.retire(token).unwrap();
        assert_eq!(ring.slot(0).unwrap().state(), SlotState::Idle);
        assert_eq!(ring.slot(0).unwrap().binding().writes, 1);
    }

    #[test]
    fn writing_is_not_reentrant() {
        let mut ring = FrameRing::new(1).unwrap();
        ring.begin_write(0, 0).unwrap();
        assert!(matches!(
            ring.begin_write(0, 1),
            Err(FrameError::SlotBusy { slot: 0 })
        ));
    }

    #[test]
    fn reusing_an_unretired_slot_fails() {
        let mut ring = FrameRing::new(2).unwrap();
        let _t0 = cycle(&mut ring, 0);
        let _t1 = cycle(&mut ring, 1);
        assert_eq!(
            ring.begin_write(0, 2).unwrap_err(),
            FrameError::SlotInFlight { slot: 0, frame: 0 }
        );
    }

    #[test]
    fn stale_tokens_are_rejected() {
        let mut ring = FrameRing::new(1).unwrap();
        let t0 = cycle(&mut ring, 0);
        let forged = FrameToken {
            ring: ring.id,
            frame_number: 7,
            slot_index: 0,
        };
        assert!(matches!(
            ring.retire(forged),
            Err(FrameError::StaleToken { token_frame: 7, slot_frame: 0, .. })
        ));
        ring.retire(t0).unwrap();
        let again = FrameToken {
            ring: ring.id,
            frame_number: 0,
            slot_index: 0,
        };
        assert_eq!(ring.retire(again), Err(FrameError::NotInFlight { slot: 0 }));
    }

    #[test]
    fn tokens_only_retire_on_their_own_ring() {
        let mut a = FrameRing::new(2).unwrap();
        let mut b = FrameRing::new(2).unwrap();
        let from_a = cycle(&mut a, 0);
        let from_b = cycle(&mut b, 0);
        assert_eq!(
            b.retire(from_a),
            Err(FrameError::ForeignToken { slot: 0, frame: 0 })
        );
        assert_eq!(b.slot(0).unwrap().state(), SlotState::InFlight);
        assert_eq!(a.slot(0).unwrap().state(), SlotState::InFlight);
        b.retire(from_b).unwrap();
        assert_eq!(b.in_flight(), 0);
    }
}
