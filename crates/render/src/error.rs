use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frames in flight must be in 1..={max}, got {got}")]
    InvalidFramesInFlight { got: usize, max: usize },
    #[error("slot {slot} is still in flight with frame {frame}")]
    SlotInFlight { slot: usize, frame: u64 },
    #[error("no frame slot {slot}")]
    NoSuchSlot { slot: usize },
    #[error("slot {slot} is already being written")]
    SlotBusy { slot: usize },
    #[error("slot {slot} is not being written")]
    NotWriting { slot: usize },
    #[error("token for slot {slot} (frame {frame}) was issued by another frame ring")]
    ForeignToken { slot: usize, frame: u64 },
    #[error("slot {slot} is not in flight")]
    NotInFlight { slot: usize },
    #[error("token for frame {token_frame} does not match slot {slot} (holds frame {slot_frame})")]
    StaleToken {
        slot: usize,
        token_frame: u64,
        slot_frame: u64,
    },
}
