//! Frame codec for the length-prefixed wire unit.
//!
//! # Wire Format
//!
//! ```text
//! |------------------------------------|----------------------|
//! | Frame length N (big-endian)        | 4 bytes              |
//! |------------------------------------|----------------------|
//! | Payload                            | N bytes              |
//! |------------------------------------|----------------------|
//! ```
//!
//! A frame length of zero is the sentinel for a control frame: the real
//! control-frame length is carried inside the control payload itself, not in
//! the outer length field.

/// Maximum total size of a received frame, in bytes.
///
/// Applies to the reconstructed frame including the 4-byte control-length
/// prefix for control frames.
pub const DATA_FRAME_LENGTH_MAX: usize = 65536;

/// Size of the outer frame length field, in bytes.
pub const FRAME_HEADER_SIZE: usize = 4;

/// The raw wire unit: a payload tagged as data or control.
///
/// The tag is set at construction and never inferred from content. The
/// payload excludes the outer 4-byte length prefix; for control frames it
/// begins with the 4-byte control length field, exactly as downstream
/// [`ControlFrame::decode`](crate::control::ControlFrame::decode) expects.
///
/// Every frame returned by a receive path owns an independent copy of its
/// bytes: mutating one received frame never affects another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A data frame carrying opaque payload bytes.
    Data(Vec<u8>),
    /// A control frame; the payload begins with the control length field.
    Control(Vec<u8>),
}

impl Frame {
    /// Create a data frame with the given payload.
    pub fn data(payload: impl Into<Vec<u8>>) -> Self {
        Frame::Data(payload.into())
    }

    /// Create a control frame with the given payload.
    ///
    /// The payload must be a fully encoded control frame, beginning with the
    /// 4-byte control length field (see
    /// [`ControlFrame::encode`](crate::control::ControlFrame::encode)).
    pub fn control(payload: impl Into<Vec<u8>>) -> Self {
        Frame::Control(payload.into())
    }

    /// Whether this frame carries the control tag.
    pub fn is_control(&self) -> bool {
        matches!(self, Frame::Control(_))
    }

    /// The frame payload, without the outer length prefix.
    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Data(payload) | Frame::Control(payload) => payload,
        }
    }

    /// Consume the frame and return its payload.
    pub fn into_payload(self) -> Vec<u8> {
        match self {
            Frame::Data(payload) | Frame::Control(payload) => payload,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload().len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// Append bytes to the payload.
    ///
    /// Used to assemble a frame incrementally. The outer length prefix is
    /// derived from the payload at [`encode`](Self::encode) time, so it can
    /// never go stale.
    pub fn append(&mut self, extra: &[u8]) {
        match self {
            Frame::Data(payload) | Frame::Control(payload) => payload.extend_from_slice(extra),
        }
    }

    /// Encode the frame into wire-ready bytes.
    ///
    /// The output is the 4-byte big-endian outer length followed by the
    /// payload, allocating exactly `4 + payload.len()` bytes. For control
    /// frames the outer length is forced to zero, the wire-level sentinel
    /// meaning "what follows is a control frame".
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.payload();
        let outer_len: u32 = if self.is_control() {
            0
        } else {
            payload.len() as u32
        };

        let mut output = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        output.extend_from_slice(&outer_len.to_be_bytes());
        output.extend_from_slice(payload);
        output
    }
}
