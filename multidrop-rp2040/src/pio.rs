//! PIO programs and state machine wrappers for the 9-bit UART.
//!
//! Each direction runs on its own PIO state machine at 8 cycles per
//! bit, so the clock divider is `clk_sys / (8 * baud)` in 16.8 fixed
//! point. TX and RX are fully independent sequencers; one loaded
//! program can drive several state machines at different dividers,
//! which is how multiple bus instances coexist on one PIO block.
//!
//! The programs implement the parity-carrying wire profile (start,
//! 9 payload bits, parity, stop): ten shifted bits per frame. The
//! parity bit itself is computed and checked by the host frame driver
//! in `multidrop-core`; the state machines only move bits.

use fixed::traits::ToFixed;

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::Level;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, IrqFlags, LoadedProgram,
    PioPin, ShiftDirection, StateMachine,
};

use multidrop_core::{RawFrameRx, RawFrameTx};
use multidrop_protocol::{PARITY_BIT, PAYLOAD_MASK};

/// PIO instructions-per-bit budget of both programs
pub const CYCLES_PER_BIT: u32 = 8;

/// Mask for the ten shifted bits of a raw frame word
const RAW_FRAME_MASK: u32 = (PAYLOAD_MASK | PARITY_BIT) as u32;

/// The transmit program loaded into PIO instruction memory.
pub struct UartTxProgram<'a, PIO: Instance> {
    prg: LoadedProgram<'a, PIO>,
}

impl<'a, PIO: Instance> UartTxProgram<'a, PIO> {
    pub fn new(common: &mut Common<'a, PIO>) -> Self {
        let prg = pio_proc::pio_asm!(
            r#"
            .side_set 1 opt
                pull       side 1 [7]  ; assert stop bit, or stall with line idle
                set x, 9   side 0 [7]  ; preload bit counter, assert start bit for 8 clocks
            bitloop:                   ; runs ten times: 9 payload bits plus parity
                out pins, 1            ; shift one bit from the OSR onto the line
                jmp x-- bitloop   [6]  ; each iteration is 8 cycles
            "#
        );
        Self {
            prg: common.load_program(&prg.program),
        }
    }
}

/// A state machine running the TX program, exposed as a frame sink.
///
/// The four-deep TX FIFO gives the transmitter its backpressure: a
/// full FIFO refuses the word and the caller retries, matching the
/// blocking-send contract of the frame driver.
pub struct PioFrameTx<'a, PIO: Instance, const SM: usize> {
    sm: StateMachine<'a, PIO, SM>,
}

impl<'a, PIO: Instance, const SM: usize> PioFrameTx<'a, PIO, SM> {
    pub fn new(
        baud: u32,
        common: &mut Common<'a, PIO>,
        mut sm: StateMachine<'a, PIO, SM>,
        tx_pin: impl PioPin,
        program: &UartTxProgram<'a, PIO>,
    ) -> Self {
        let tx_pin = common.make_pio_pin(tx_pin);
        sm.set_pins(Level::High, &[&tx_pin]);
        sm.set_pin_dirs(PioDirection::Out, &[&tx_pin]);

        let mut cfg = Config::default();
        cfg.set_out_pins(&[&tx_pin]);
        cfg.use_program(&program.prg, &[&tx_pin]);
        cfg.shift_out.auto_fill = false;
        cfg.shift_out.direction = ShiftDirection::Right;
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.clock_divider = (clk_sys_freq() / (CYCLES_PER_BIT * baud)).to_fixed();
        sm.set_config(&cfg);
        sm.set_enable(true);

        Self { sm }
    }

    /// Push one raw frame word, waiting for FIFO space.
    pub async fn write_frame(&mut self, raw: u16) {
        self.sm.tx().wait_push(u32::from(raw)).await;
    }
}

impl<PIO: Instance, const SM: usize> RawFrameTx for PioFrameTx<'_, PIO, SM> {
    fn try_submit(&mut self, raw: u16) -> bool {
        self.sm.tx().try_push(u32::from(raw))
    }
}

/// The receive program loaded into PIO instruction memory.
pub struct UartRxProgram<'a, PIO: Instance> {
    prg: LoadedProgram<'a, PIO>,
}

impl<'a, PIO: Instance> UartRxProgram<'a, PIO> {
    pub fn new(common: &mut Common<'a, PIO>) -> Self {
        let prg = pio_proc::pio_asm!(
            r#"
            start:
                wait 0 pin 0        ; stall until the start bit pulls the line low
                set x, 9    [10]    ; preload bit counter, delay to the centre of D0
            bitloop:
                in pins, 1          ; sample one bit at its centre
                jmp x-- bitloop [6] ; ten bits, 8 cycles per iteration
                jmp pin good_stop   ; stop bit must be high
                irq 4 rel           ; framing error or break: raise the sticky flag,
                wait 1 pin 0        ; wait for the line to return to idle,
                jmp start           ; and never push the partial frame
            good_stop:
                in null, 22         ; right-justify the ten collected bits
                push
            "#
        );
        Self {
            prg: common.load_program(&prg.program),
        }
    }
}

/// A state machine running the RX program, exposed as a frame source.
///
/// The sequencer samples in real time and never blocks on the wire; if
/// the host stops draining, the joined RX FIFO absorbs a few frames
/// and then drops the newest ones on the floor. Framing errors arrive
/// out of band through the state machine's sticky IRQ flag.
pub struct PioFrameRx<'a, PIO: Instance, const SM: usize> {
    sm: StateMachine<'a, PIO, SM>,
    irq_flags: IrqFlags<'a, PIO>,
}

impl<'a, PIO: Instance, const SM: usize> PioFrameRx<'a, PIO, SM> {
    pub fn new(
        baud: u32,
        common: &mut Common<'a, PIO>,
        mut sm: StateMachine<'a, PIO, SM>,
        rx_pin: impl PioPin,
        irq_flags: IrqFlags<'a, PIO>,
        program: &UartRxProgram<'a, PIO>,
    ) -> Self {
        let mut cfg = Config::default();
        cfg.use_program(&program.prg, &[]);

        let rx_pin = common.make_pio_pin(rx_pin);
        sm.set_pins(Level::High, &[&rx_pin]);
        cfg.set_in_pins(&[&rx_pin]);
        cfg.set_jmp_pin(&rx_pin);
        sm.set_pin_dirs(PioDirection::In, &[&rx_pin]);

        cfg.clock_divider = (clk_sys_freq() / (CYCLES_PER_BIT * baud)).to_fixed();
        cfg.shift_in.auto_fill = false;
        cfg.shift_in.direction = ShiftDirection::Right;
        cfg.shift_in.threshold = 32;
        cfg.fifo_join = FifoJoin::RxOnly;
        sm.set_config(&cfg);
        sm.set_enable(true);

        Self { sm, irq_flags }
    }

    /// Wait for one raw frame word.
    pub async fn read_frame(&mut self) -> u16 {
        (self.sm.rx().wait_pull().await & RAW_FRAME_MASK) as u16
    }

    // `irq 4 rel` from state machine SM lands on flag 4 + SM
    fn framing_flag() -> u8 {
        4 + SM as u8
    }
}

impl<PIO: Instance, const SM: usize> RawFrameRx for PioFrameRx<'_, PIO, SM> {
    fn poll_frame(&mut self) -> Option<u16> {
        self.sm
            .rx()
            .try_pull()
            .map(|raw| (raw & RAW_FRAME_MASK) as u16)
    }

    fn take_framing_error(&mut self) -> bool {
        let flag = Self::framing_flag();
        if self.irq_flags.check(flag) {
            self.irq_flags.clear(flag);
            true
        } else {
            false
        }
    }
}
