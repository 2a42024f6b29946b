//! Host frame driver: parity, address filtering, sticky errors.
//!
//! This is the only user-facing surface. It builds outgoing frames
//! (address flag, parity) and interprets incoming raw words: address
//! frames update the listen state and are always reported; data frames
//! reach the caller only while this instance is the addressed
//! listener. Everything else is discarded silently, which is the
//! CPU-offload filtering a multidrop bus node exists to provide.

use multidrop_protocol::{decode, encode, LineError, ParityMode, PayloadWord};

use crate::traits::{RawFrameRx, RawFrameTx};

/// Per-instance configuration, fixed at initialization.
///
/// Reconfiguring while frames are in flight is a precondition
/// violation; build a new driver instead.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Parity polarity for both directions
    pub parity: ParityMode,
    /// The address this node answers to on the bus
    pub own_address: u8,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            parity: ParityMode::Odd,
            own_address: 0x00,
        }
    }
}

/// Transmit-side condition, never fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// Previous frame still draining; retry once it has. This is the
    /// single-frame backpressure of the transmit engine, not a fault.
    Busy,
}

/// One frame delivered to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Received {
    /// Address frame (listen state was just updated) or data frame
    pub is_address: bool,
    pub data: u8,
}

/// The 9-bit multidrop UART driver.
///
/// Generic over the transmit/receive seams so it runs unchanged over
/// the software engines (host tests) or the PIO FIFO wrappers
/// (target). Errors surface through a sticky flag, never by halting:
/// a multidrop listener that stops scanning on line noise is broken.
#[derive(Debug)]
pub struct Uart9<T: RawFrameTx, R: RawFrameRx> {
    tx: T,
    rx: R,
    parity: ParityMode,
    own_address: u8,
    listening: bool,
    last_error: Option<LineError>,
}

impl<T: RawFrameTx, R: RawFrameRx> Uart9<T, R> {
    pub fn new(tx: T, rx: R, config: UartConfig) -> Self {
        Self {
            tx,
            rx,
            parity: config.parity,
            own_address: config.own_address,
            listening: false,
            last_error: None,
        }
    }

    /// Build and submit one frame.
    ///
    /// Computes parity over all nine payload bits and hands the raw
    /// word to the transmitter. Frames reach the wire in submission
    /// order; `Busy` means the previous frame has not drained yet.
    pub fn send(&mut self, is_address: bool, data: u8) -> Result<(), SendError> {
        let raw = encode(PayloadWord { is_address, data }, self.parity);
        if self.tx.try_submit(raw) {
            Ok(())
        } else {
            Err(SendError::Busy)
        }
    }

    /// Send an address frame selecting `addr` as the bus listener.
    pub fn send_address(&mut self, addr: u8) -> Result<(), SendError> {
        self.send(true, addr)
    }

    /// Send a data frame for the currently addressed listener.
    pub fn send_data(&mut self, data: u8) -> Result<(), SendError> {
        self.send(false, data)
    }

    /// Poll for one received frame.
    ///
    /// - Framing or parity trouble raises the sticky [`last_error`]
    ///   flag and delivers nothing; the listen state is untouched.
    /// - An address frame always updates `listening` (true iff it
    ///   names this node) and is always reported, so callers can
    ///   observe bus addressing.
    /// - A data frame is reported only while listening; otherwise it
    ///   is discarded without error.
    ///
    /// [`last_error`]: Uart9::last_error
    pub fn receive(&mut self) -> Option<Received> {
        if self.rx.take_framing_error() {
            self.last_error = Some(LineError::Framing);
        }
        let raw = self.rx.poll_frame()?;
        let word = match decode(raw, self.parity) {
            Ok(word) => word,
            Err(err) => {
                self.last_error = Some(err);
                return None;
            }
        };

        if word.is_address {
            self.listening = word.data == self.own_address;
            Some(Received {
                is_address: true,
                data: word.data,
            })
        } else if self.listening {
            Some(Received {
                is_address: false,
                data: word.data,
            })
        } else {
            None
        }
    }

    /// Whether this node currently accepts data frames
    pub fn listening(&self) -> bool {
        self.listening
    }

    /// Sticky record of the most recent line error, if any
    pub fn last_error(&self) -> Option<LineError> {
        self.last_error
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Access the transmit engine, e.g. to tick a software engine
    pub fn tx_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    /// Access the receive engine
    pub fn rx_mut(&mut self) -> &mut R {
        &mut self.rx
    }
}
