//! # Frame Streams Transport
//!
//! This crate implements the Frame Streams transport protocol: a
//! length-prefixed binary framing protocol over a duplex byte stream (TCP,
//! Unix socket, pipe), with an embedded control sub-protocol for
//! content-type negotiation and session handshake.
//!
//! ## Overview
//!
//! One side streams opaque binary records to the other, optionally after a
//! capability-negotiated handshake, and optionally with whole-frame
//! compression:
//!
//! - **Frame codec**: data frames carry a 4-byte big-endian length and a
//!   payload; a zero length is the sentinel for a control frame.
//! - **Control codec**: control frames carry a control type (ACCEPT, START,
//!   STOP, READY, FINISH) plus optional content-type fields.
//! - **Transport**: [`FrameStream`] reads and writes frames off the stream
//!   with length bounds, copy-out buffer discipline, and timeout handling,
//!   and runs the handshake/teardown exchange on top of control frames.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           Payload records               │  opaque bytes
//! ├─────────────────────────────────────────┤
//! │   Handshake (READY/ACCEPT/START/...)    │  control frames
//! ├─────────────────────────────────────────┤
//! │              Framing                    │  length-prefixed
//! ├─────────────────────────────────────────┤
//! │       Byte stream (TCP/Unix/pipe)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use framestream::{Frame, FrameStream};
//!
//! # async fn run() -> framestream::Result<()> {
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:6000").await?;
//! let (reader, writer) = tokio::io::split(stream);
//!
//! let mut fs = FrameStream::new(
//!     Some(reader),
//!     Some(writer),
//!     Duration::from_secs(5),
//!     "protobuf:dnstap.Dnstap",
//!     true,
//! );
//!
//! fs.init_sender().await?;
//! fs.send_frame(&Frame::data(b"record".to_vec())).await?;
//! fs.reset_sender().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`frame`]: the raw wire unit and its codec
//! - [`control`]: control frame types and field codec
//! - [`transport`]: the frame transport and handshake state machine
//! - [`compress`]: whole-frame compression codecs
//! - [`error`]: error types

pub mod compress;
pub mod control;
pub mod error;
pub mod frame;
pub mod transport;

pub use compress::{CompressionCodec, Gzip, Lz4};
pub use control::{
    ControlFrame, ControlType, CONTROL_FIELD_CONTENT_TYPE, CONTROL_FRAME_LENGTH_MAX,
};
pub use error::{FrameStreamError, Result};
pub use frame::{Frame, DATA_FRAME_LENGTH_MAX, FRAME_HEADER_SIZE};
pub use transport::FrameStream;
