//! Error types for the framestream crate.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::control::ControlType;

/// Framestream error type covering all possible failure modes.
///
/// No operation in this crate retries internally; every failure is returned
/// to the caller, who decides whether to close the session.
#[derive(Debug, Error)]
pub enum FrameStreamError {
    // Frame errors
    /// Frame exceeds the maximum allowed size.
    #[error("frame too large: {size} bytes exceeds maximum of {max} bytes")]
    FrameTooLarge {
        /// Declared total frame size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Control frame length field exceeds the maximum allowed size.
    #[error("control frame too large: {size} bytes exceeds maximum of {max} bytes")]
    ControlFrameTooLarge {
        /// Declared control frame length.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Structurally invalid control-field encoding.
    #[error("malformed control frame: {0}")]
    MalformedControlFrame(&'static str),

    /// Control type outside the enumerated range.
    #[error("unsupported control frame type: {0}")]
    UnsupportedControlFrame(u32),

    // Handshake errors
    /// A data frame arrived where a control frame was required.
    #[error("control frame expected, got data frame")]
    ControlFrameExpected,

    /// A control frame had the wrong type for the current handshake step.
    #[error("unexpected control frame: expected {expected:?}, got {got:?}")]
    UnexpectedControlFrame {
        /// The control type required by the current step.
        expected: ControlType,
        /// The control type actually received.
        got: ControlType,
    },

    /// The peer does not support the configured content type.
    #[error("content type not supported by peer")]
    ContentTypeUnsupported,

    // Precondition errors
    /// No reader is configured on this transport.
    #[error("reader not ready")]
    ReaderNotReady,

    /// No writer is configured on this transport.
    #[error("writer not ready")]
    WriterNotReady,

    // Compression errors
    /// The compression codec failed while compressing a frame.
    #[error("compression failed: {0}")]
    Compression(String),

    /// The compression codec failed while decompressing a frame.
    #[error("decompression failed: {0}")]
    Decompression(String),

    // I/O errors
    /// A read did not complete within the configured timeout.
    #[error("read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// The payload sink was closed while frames were still arriving.
    #[error("payload sink closed")]
    SinkClosed,

    /// An I/O error from the underlying stream.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for framestream operations.
pub type Result<T> = std::result::Result<T, FrameStreamError>;
