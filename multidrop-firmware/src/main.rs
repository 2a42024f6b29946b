//! Demo node for the 9-bit multidrop UART.
//!
//! Runs the PIO-backed "9 Odd 1" UART on two pins: periodically
//! addresses a peer and hands it one data byte, while logging every
//! frame this node is allowed to see and every sticky line error.
//! Loop TX (GPIO0) back to RX (GPIO1) to watch the address filter at
//! work on a single board.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use multidrop_core::{Uart9, UartConfig};
use multidrop_protocol::ParityMode;
use multidrop_rp2040::{PioFrameRx, PioFrameTx, UartRxProgram, UartTxProgram};

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

/// Reference bit rate of the MDB-style bus
const BAUD: u32 = 250_000;
/// Address this node answers to
const OWN_ADDRESS: u8 = 0x05;
/// Peer this node periodically addresses
const PEER_ADDRESS: u8 = 0x05;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("multidrop node starting");

    let p = embassy_rp::init(Default::default());
    let Pio {
        mut common,
        irq_flags,
        sm0,
        sm1,
        ..
    } = Pio::new(p.PIO0, Irqs);

    let tx_program = UartTxProgram::new(&mut common);
    let rx_program = UartRxProgram::new(&mut common);

    let tx = PioFrameTx::new(BAUD, &mut common, sm0, p.PIN_0, &tx_program);
    let rx = PioFrameRx::new(BAUD, &mut common, sm1, p.PIN_1, irq_flags, &rx_program);

    let mut uart = Uart9::new(
        tx,
        rx,
        UartConfig {
            parity: ParityMode::Odd,
            own_address: OWN_ADDRESS,
        },
    );

    info!(
        "bus up: {} baud, own address {=u8:#x}",
        BAUD, OWN_ADDRESS
    );

    let mut counter: u8 = 0;
    loop {
        // Address the peer, then hand it one data byte. Busy just
        // means the previous frame has not drained yet.
        while uart.send_address(PEER_ADDRESS).is_err() {
            Timer::after_micros(50).await;
        }
        while uart.send_data(counter).is_err() {
            Timer::after_micros(50).await;
        }
        counter = counter.wrapping_add(1);

        // Drain the bus until the next beat
        for _ in 0..100 {
            while let Some(frame) = uart.receive() {
                if frame.is_address {
                    info!(
                        "address frame {=u8:#x}, listening={}",
                        frame.data,
                        uart.listening()
                    );
                } else {
                    info!("data frame {=u8:#x}", frame.data);
                }
            }
            if let Some(err) = uart.last_error() {
                warn!("line error: {}", err);
                uart.clear_error();
            }
            Timer::after_millis(5).await;
        }
    }
}
