//! Frame transport over a duplex byte stream.
//!
//! [`FrameStream`] owns buffered reader/writer halves of an underlying
//! stream, a reusable scratch buffer for receives, and the session
//! configuration (read timeout, content type, handshake flag). It implements
//! frame send/receive, compressed variants, and the handshake/teardown
//! exchange built from control frames.
//!
//! The transport introduces no concurrency of its own: it expects at most
//! one concurrent reader and one concurrent writer per instance, driven by
//! whatever tasks the caller supplies. Every [`Frame`] handed back by a
//! receive owns a fresh copy of its bytes, so callers may retain or mutate
//! frames freely without synchronizing against future receives.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tokio::time;

use crate::compress::CompressionCodec;
use crate::control::{ControlFrame, ControlType};
use crate::error::{FrameStreamError, Result};
use crate::frame::{Frame, DATA_FRAME_LENGTH_MAX};

/// A frame transport bound to one logical session over one stream.
///
/// Either half may be absent for one-directional use: a transport built
/// without a reader fails receives with
/// [`ReaderNotReady`](FrameStreamError::ReaderNotReady), and one built
/// without a writer fails sends with
/// [`WriterNotReady`](FrameStreamError::WriterNotReady).
pub struct FrameStream<R, W> {
    reader: Option<BufReader<R>>,
    writer: Option<BufWriter<W>>,
    scratch: Vec<u8>,
    read_timeout: Duration,
    content_type: Vec<u8>,
    handshake: bool,
}

impl<R, W> FrameStream<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a transport over the given stream halves.
    ///
    /// `read_timeout` bounds timeout-enabled receives; `Duration::ZERO`
    /// disables the bound. `content_type` is the session content type offered
    /// and required during the handshake. With `handshake` set, the full
    /// bidirectional READY/ACCEPT negotiation and STOP/FINISH teardown run;
    /// without it, the sender starts immediately and no acknowledgments are
    /// exchanged.
    pub fn new(
        reader: Option<R>,
        writer: Option<W>,
        read_timeout: Duration,
        content_type: impl Into<Vec<u8>>,
        handshake: bool,
    ) -> Self {
        Self {
            reader: reader.map(BufReader::new),
            writer: writer.map(BufWriter::new),
            scratch: vec![0u8; DATA_FRAME_LENGTH_MAX],
            read_timeout,
            content_type: content_type.into(),
            handshake,
        }
    }

    /// The session content type.
    pub fn content_type(&self) -> &[u8] {
        &self.content_type
    }

    /// Whether the bidirectional handshake is enabled.
    pub fn handshake_enabled(&self) -> bool {
        self.handshake
    }

    /// Receive one frame from the stream.
    ///
    /// With `use_timeout` set and a nonzero read timeout configured, the
    /// whole receive (header and body reads included) must complete within
    /// the timeout or the call fails with
    /// [`ReadTimeout`](FrameStreamError::ReadTimeout); the bound is dropped
    /// on every exit path.
    ///
    /// A zero outer length is the control sentinel: the next 4 bytes are the
    /// control length, and the returned control frame's payload starts with
    /// that control length field, as [`ControlFrame::decode`] expects.
    ///
    /// A frame whose total reconstructed size exceeds
    /// [`DATA_FRAME_LENGTH_MAX`] fails with
    /// [`FrameTooLarge`](FrameStreamError::FrameTooLarge) after the declared
    /// body has been read and discarded, so a subsequent receive does not
    /// misinterpret stale bytes as a frame header.
    pub async fn recv_frame(&mut self, use_timeout: bool) -> Result<Frame> {
        if self.reader.is_none() {
            return Err(FrameStreamError::ReaderNotReady);
        }
        if use_timeout && !self.read_timeout.is_zero() {
            let timeout = self.read_timeout;
            time::timeout(timeout, self.recv_frame_inner())
                .await
                .map_err(|_| FrameStreamError::ReadTimeout(timeout))?
        } else {
            self.recv_frame_inner().await
        }
    }

    async fn recv_frame_inner(&mut self) -> Result<Frame> {
        let reader = self
            .reader
            .as_mut()
            .ok_or(FrameStreamError::ReaderNotReady)?;

        let mut header = [0u8; 4];
        reader.read_exact(&mut header).await?;
        let outer_len = u32::from_be_bytes(header) as usize;

        // a zero outer length announces a control frame; its real length
        // follows in the next 4 bytes and is kept as the payload prefix
        let control = outer_len == 0;
        let (total, body_offset) = if control {
            reader.read_exact(&mut header).await?;
            let control_len = u32::from_be_bytes(header) as usize;
            (4 + control_len, 4usize)
        } else {
            (outer_len, 0usize)
        };

        if total > DATA_FRAME_LENGTH_MAX {
            // best effort: consume the declared body so the next receive
            // stays aligned; the peer may already have closed the stream
            if let Err(e) = Self::drain(reader, &mut self.scratch, total - body_offset).await {
                tracing::debug!("failed to drain oversized frame: {}", e);
            }
            return Err(FrameStreamError::FrameTooLarge {
                size: total,
                max: DATA_FRAME_LENGTH_MAX,
            });
        }

        if control {
            self.scratch[..4].copy_from_slice(&header);
        }
        reader.read_exact(&mut self.scratch[body_offset..total]).await?;

        // copy out of the scratch buffer; returned frames never alias it
        let payload = self.scratch[..total].to_vec();
        tracing::trace!(len = total, control, "received frame");

        Ok(if control {
            Frame::Control(payload)
        } else {
            Frame::Data(payload)
        })
    }

    async fn drain(reader: &mut BufReader<R>, scratch: &mut [u8], mut remaining: usize) -> Result<()> {
        while remaining > 0 {
            let chunk = remaining.min(scratch.len());
            reader.read_exact(&mut scratch[..chunk]).await?;
            remaining -= chunk;
        }
        Ok(())
    }

    /// Send one frame and flush it.
    ///
    /// Each send writes the frame's full wire encoding and flushes before
    /// returning; no cross-call write buffering is relied upon.
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or(FrameStreamError::WriterNotReady)?;
        writer.write_all(&frame.encode()).await?;
        writer.flush().await?;
        tracing::trace!(len = frame.len(), control = frame.is_control(), "sent frame");
        Ok(())
    }

    /// Encode and send a control frame.
    pub async fn send_control(&mut self, control: &ControlFrame) -> Result<()> {
        let frame = Frame::control(control.encode()?);
        self.send_frame(&frame).await
    }

    /// Receive a frame and decode it as a control frame.
    ///
    /// Fails with [`ControlFrameExpected`](FrameStreamError::ControlFrameExpected)
    /// if a data frame arrives instead.
    pub async fn recv_control(&mut self) -> Result<ControlFrame> {
        let frame = self.recv_frame(true).await?;
        match frame {
            Frame::Control(payload) => ControlFrame::decode(&payload),
            Frame::Data(_) => Err(FrameStreamError::ControlFrameExpected),
        }
    }

    async fn expect_control(&mut self, expected: ControlType) -> Result<ControlFrame> {
        let control = self.recv_control().await?;
        if control.control_type() != expected {
            return Err(FrameStreamError::UnexpectedControlFrame {
                expected,
                got: control.control_type(),
            });
        }
        Ok(control)
    }

    /// Compress a frame's full wire encoding and send it as a data frame.
    ///
    /// The compressor output is fully finalized before the wrapping frame is
    /// built; compressors may buffer until closed.
    pub async fn send_compressed_frame<C: CompressionCodec>(
        &mut self,
        codec: &C,
        frame: &Frame,
    ) -> Result<()> {
        let compressed = codec
            .compress(&frame.encode())
            .map_err(|e| FrameStreamError::Compression(format!("{} codec: {}", codec.name(), e)))?;
        self.send_frame(&Frame::data(compressed)).await
    }

    /// Receive a frame and decompress its payload.
    ///
    /// The returned frame is always tagged as data; its payload is the
    /// decompressed inner wire image, outer length prefix included, which
    /// the caller re-parses.
    pub async fn recv_compressed_frame<C: CompressionCodec>(
        &mut self,
        codec: &C,
        use_timeout: bool,
    ) -> Result<Frame> {
        let frame = self.recv_frame(use_timeout).await?;
        let decompressed = codec.decompress(frame.payload()).map_err(|e| {
            FrameStreamError::Decompression(format!("{} codec: {}", codec.name(), e))
        })?;
        Ok(Frame::data(decompressed))
    }

    /// Run the sender side of the session setup.
    ///
    /// With the handshake enabled: send READY with the session content type,
    /// require an ACCEPT confirming it, then send START. Without it: send
    /// START immediately.
    pub async fn init_sender(&mut self) -> Result<()> {
        if self.handshake {
            let ready =
                ControlFrame::with_content_type(ControlType::Ready, self.content_type.clone());
            self.send_control(&ready).await?;
            tracing::debug!("sent READY control frame");

            let accept = self.expect_control(ControlType::Accept).await?;
            if !accept.has_content_type(&self.content_type) {
                return Err(FrameStreamError::ContentTypeUnsupported);
            }
            tracing::debug!("received ACCEPT control frame");
        }

        let start = ControlFrame::with_content_type(ControlType::Start, self.content_type.clone());
        self.send_control(&start).await?;
        tracing::debug!("sent START control frame");
        Ok(())
    }

    /// Run the receiver side of the session setup.
    ///
    /// With the handshake enabled: require a READY carrying the session
    /// content type and answer with ACCEPT. Always: require a START carrying
    /// the session content type.
    pub async fn init_receiver(&mut self) -> Result<()> {
        if self.handshake {
            let ready = self.expect_control(ControlType::Ready).await?;
            if !ready.has_content_type(&self.content_type) {
                return Err(FrameStreamError::ContentTypeUnsupported);
            }
            tracing::debug!("received READY control frame");

            let accept =
                ControlFrame::with_content_type(ControlType::Accept, self.content_type.clone());
            self.send_control(&accept).await?;
            tracing::debug!("sent ACCEPT control frame");
        }

        let start = self.expect_control(ControlType::Start).await?;
        if !start.has_content_type(&self.content_type) {
            return Err(FrameStreamError::ContentTypeUnsupported);
        }
        tracing::debug!("received START control frame");
        Ok(())
    }

    /// Run the sender side of the session teardown.
    ///
    /// Sends STOP; with the handshake enabled, requires a FINISH
    /// acknowledgment from the peer.
    pub async fn reset_sender(&mut self) -> Result<()> {
        self.send_control(&ControlFrame::new(ControlType::Stop)).await?;
        tracing::debug!("sent STOP control frame");

        if self.handshake {
            self.expect_control(ControlType::Finish).await?;
            tracing::debug!("received FINISH control frame");
        }
        Ok(())
    }

    /// Run the receiver side of the session teardown on a received frame.
    ///
    /// The frame must be a STOP control frame; with the handshake enabled a
    /// FINISH acknowledgment is sent back. `Ok(())` means the peer closed the
    /// stream gracefully — the distinguished "stream ended" outcome, not a
    /// failure.
    pub async fn reset_receiver(&mut self, frame: &Frame) -> Result<()> {
        let Frame::Control(payload) = frame else {
            return Err(FrameStreamError::ControlFrameExpected);
        };
        let control = ControlFrame::decode(payload)?;
        if control.control_type() != ControlType::Stop {
            return Err(FrameStreamError::UnexpectedControlFrame {
                expected: ControlType::Stop,
                got: control.control_type(),
            });
        }
        tracing::debug!("received STOP control frame");

        if self.handshake {
            self.send_control(&ControlFrame::new(ControlType::Finish)).await?;
            tracing::debug!("sent FINISH control frame");
        }
        Ok(())
    }

    /// Receive frames in a loop, forwarding data payloads to `sink`.
    ///
    /// Runs until a control frame arrives — handled by
    /// [`reset_receiver`](Self::reset_receiver), terminating the loop with
    /// its "stream ended" outcome — or an error occurs. Receives are not
    /// bounded by the read timeout. Meant to occupy its own task for the
    /// lifetime of the session.
    pub async fn process_frame(&mut self, sink: &mpsc::Sender<Vec<u8>>) -> Result<()> {
        loop {
            let frame = self.recv_frame(false).await?;
            if frame.is_control() {
                self.reset_receiver(&frame).await?;
                return Ok(());
            }
            if sink.send(frame.into_payload()).await.is_err() {
                return Err(FrameStreamError::SinkClosed);
            }
        }
    }
}
