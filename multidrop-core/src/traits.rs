//! Seams between the frame driver and the bit engines.
//!
//! Implemented by the software engines in this crate and by the PIO
//! FIFO wrappers in `multidrop-rp2040`, so the same driver logic runs
//! against either.

/// Sink for raw frame words on the transmit side.
pub trait RawFrameTx {
    /// Offer one raw frame word (payload bits 0..=8, parity bit 9) to
    /// the transmitter.
    ///
    /// Returns `false` while the previous frame is still draining.
    /// That is backpressure, not an error: the caller retries once the
    /// transmitter has drained. Accepted words reach the wire in
    /// submission order.
    fn try_submit(&mut self, raw: u16) -> bool;
}

/// Source of completed raw frames on the receive side.
pub trait RawFrameRx {
    /// Take the most recently completed frame, if any.
    ///
    /// Single-slot semantics: if the host does not poll before the
    /// next frame completes, the earlier frame is silently overwritten.
    fn poll_frame(&mut self) -> Option<u16>;

    /// Take and clear the sticky framing-error flag.
    fn take_framing_error(&mut self) -> bool;
}
