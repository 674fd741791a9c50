//! Control frame field codec.
//!
//! A control frame rides inside a wire frame whose outer length is zero.
//! Its payload is encoded as:
//!
//! ```text
//! |------------------------------------|----------------------|
//! | Control frame length               | 4 bytes              |
//! |------------------------------------|----------------------|
//! | Control frame type                 | 4 bytes              |
//! |------------------------------------|----------------------|
//! | Field tag (CONTENT_TYPE)           | 4 bytes (optional)   |
//! |------------------------------------|----------------------|
//! | Field length L                     | 4 bytes (optional)   |
//! |------------------------------------|----------------------|
//! | Content type string                | L bytes              |
//! |------------------------------------|----------------------|
//! ```
//!
//! All integers are big-endian. The optional field block may repeat; the
//! only defined field tag is `CONTENT_TYPE`.

use crate::error::{FrameStreamError, Result};

/// Maximum value of the control frame length field, in bytes.
pub const CONTROL_FRAME_LENGTH_MAX: usize = 4064;

/// The only defined optional field tag: a content type entry.
pub const CONTROL_FIELD_CONTENT_TYPE: u32 = 0x01;

/// Control frame types, in handshake order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ControlType {
    /// Receiver accepts the offered content type.
    Accept = 0x01,
    /// Sender begins streaming data frames.
    Start = 0x02,
    /// Sender has no more data frames.
    Stop = 0x03,
    /// Sender offers its content type.
    Ready = 0x04,
    /// Receiver acknowledges the stop.
    Finish = 0x05,
}

impl ControlType {
    /// Decode a raw control type value.
    ///
    /// Zero is not an enumerated control type and is rejected along with
    /// values above [`ControlType::Finish`].
    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            0x01 => Ok(ControlType::Accept),
            0x02 => Ok(ControlType::Start),
            0x03 => Ok(ControlType::Stop),
            0x04 => Ok(ControlType::Ready),
            0x05 => Ok(ControlType::Finish),
            other => Err(FrameStreamError::UnsupportedControlFrame(other)),
        }
    }

    /// The wire value of this control type.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// A structured view of a control frame's payload.
///
/// Constructed in memory for sending or decoded from received bytes; never
/// mutated after decode. Content type entries keep their insertion order
/// through [`encode`](Self::encode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFrame {
    control_type: ControlType,
    content_types: Vec<Vec<u8>>,
}

impl ControlFrame {
    /// Create a control frame with no content type fields.
    pub fn new(control_type: ControlType) -> Self {
        Self {
            control_type,
            content_types: Vec::new(),
        }
    }

    /// Create a control frame carrying a single content type field.
    pub fn with_content_type(control_type: ControlType, content_type: impl Into<Vec<u8>>) -> Self {
        Self {
            control_type,
            content_types: vec![content_type.into()],
        }
    }

    /// Add a content type entry, preserving insertion order.
    pub fn push_content_type(&mut self, content_type: impl Into<Vec<u8>>) {
        self.content_types.push(content_type.into());
    }

    /// The control type of this frame.
    pub fn control_type(&self) -> ControlType {
        self.control_type
    }

    /// The decoded content type entries, in wire order.
    pub fn content_types(&self) -> &[Vec<u8>] {
        &self.content_types
    }

    /// Whether `candidate` is byte-exact equal to one of the entries.
    ///
    /// This is the handshake negotiation check; there is no substring or
    /// case-insensitive matching.
    pub fn has_content_type(&self, candidate: &[u8]) -> bool {
        self.content_types.iter().any(|ct| ct == candidate)
    }

    /// Decode a control frame from raw payload bytes.
    ///
    /// `data` is the control frame payload after the outer zero-length
    /// sentinel has been stripped, beginning with the control length field.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(FrameStreamError::MalformedControlFrame(
                "fewer than 8 bytes for control length and type",
            ));
        }

        let control_len = read_u32(&data[..4]) as usize;
        if control_len > CONTROL_FRAME_LENGTH_MAX {
            return Err(FrameStreamError::ControlFrameTooLarge {
                size: control_len,
                max: CONTROL_FRAME_LENGTH_MAX,
            });
        }

        let control_type = ControlType::from_u32(read_u32(&data[4..8]))?;

        let mut content_types = Vec::new();
        let mut fields = &data[8..];
        while fields.len() >= 8 {
            let tag = read_u32(&fields[..4]);
            if tag != CONTROL_FIELD_CONTENT_TYPE {
                return Err(FrameStreamError::MalformedControlFrame(
                    "unknown control field tag",
                ));
            }
            let field_len = read_u32(&fields[4..8]) as usize;
            if fields.len() < 8 + field_len {
                return Err(FrameStreamError::MalformedControlFrame(
                    "content type field truncated",
                ));
            }
            content_types.push(fields[8..8 + field_len].to_vec());
            fields = &fields[8 + field_len..];
        }

        if !fields.is_empty() {
            return Err(FrameStreamError::MalformedControlFrame(
                "trailing bytes after last control field",
            ));
        }

        Ok(Self {
            control_type,
            content_types,
        })
    }

    /// Encode the control frame into payload bytes.
    ///
    /// The output begins with the control length field and is the exact
    /// inverse of [`decode`](Self::decode). Fails with
    /// [`ControlFrameTooLarge`](FrameStreamError::ControlFrameTooLarge) if
    /// the control length would exceed [`CONTROL_FRAME_LENGTH_MAX`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        let control_len: usize = 4 + self
            .content_types
            .iter()
            .map(|ct| 8 + ct.len())
            .sum::<usize>();
        if control_len > CONTROL_FRAME_LENGTH_MAX {
            return Err(FrameStreamError::ControlFrameTooLarge {
                size: control_len,
                max: CONTROL_FRAME_LENGTH_MAX,
            });
        }

        let mut output = Vec::with_capacity(4 + control_len);
        output.extend_from_slice(&(control_len as u32).to_be_bytes());
        output.extend_from_slice(&self.control_type.as_u32().to_be_bytes());
        for content_type in &self.content_types {
            output.extend_from_slice(&CONTROL_FIELD_CONTENT_TYPE.to_be_bytes());
            output.extend_from_slice(&(content_type.len() as u32).to_be_bytes());
            output.extend_from_slice(content_type);
        }
        Ok(output)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
