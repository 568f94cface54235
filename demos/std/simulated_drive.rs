//! # Simulated drive
//!
//! Replays a short capture-like trace through the controller:
//! - parked with the doors unlocked
//! - pulling away (lock armed, then sent; the first attempt is NACKed)
//! - stopping, opening a door, driving off again with the door open
//!
//! This demo uses `std` and an in-memory bus.
//!
//! ```bash
//! cargo run --example simulated_drive
//! ```

use std::collections::VecDeque;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use prius_autolock::protocol::autolock::supervisor::{AutoLockService, LockEvent};
use prius_autolock::protocol::transport::{
    can_frame::CanFrame, can_id::CanId, traits::can_bus::CanBus,
};

/// Bus fed from a fixed trace. Rejects the first `nacks` transmissions.
struct TraceBus {
    trace: VecDeque<CanFrame>,
    nacks: usize,
    sent: Vec<CanFrame>,
}

impl CanBus for TraceBus {
    type Error = &'static str;

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if self.nacks > 0 {
            self.nacks -= 1;
            return Err("no acknowledge");
        }
        self.sent.push(*frame);
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        Ok(self.trace.pop_front())
    }
}

fn frame(id: u32, payload: &[u8]) -> CanFrame {
    CanFrame::new(CanId(id), payload).expect("valid trace frame")
}

fn main() {
    println!("=== prius-autolock simulated drive ===\n");

    let trace = [
        // Parked, doors unlocked and closed
        frame(0x5B6, &[0x64, 0xC5, 0x00]),
        frame(0x3CA, &[0x00, 0x00, 0x00, 0x00]),
        frame(0x3C8, &[0x00, 0x00, 0x00, 0x00, 0x00]),
        // Pulling away: 8 km/h -> 5 mph
        frame(0x3CA, &[0x00, 0x00, 0x08, 0x00]),
        frame(0x120, &[0x12, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
        frame(0x3C8, &[0x00, 0x00, 0x00, 0x00, 0x00]),
        // Body ECU reports locked
        frame(0x5B6, &[0x64, 0x00, 0x00]),
        // Stop, unlock, open the driver door
        frame(0x3CA, &[0x00, 0x00, 0x00, 0x00]),
        frame(0x5B6, &[0x64, 0xC5, 0x01]),
        // Crawling forward with the door open: never locks
        frame(0x3CA, &[0x00, 0x00, 0x06, 0x00]),
        frame(0x3C8, &[0x00, 0x00, 0x00, 0x00, 0x00]),
    ];

    let bus = TraceBus {
        trace: trace.into_iter().collect(),
        nacks: 1,
        sent: Vec::new(),
    };

    let channel = Channel::<NoopRawMutex, LockEvent, 16>::new();
    let parts = AutoLockService::new(bus, Some(&channel)).into_parts();
    let mut runner = parts.runner;
    let mut events = parts.events.expect("channel provided");

    let mut index = 0;
    while let Some(outcome) = runner.poll_once() {
        let vehicle = runner.vehicle();
        println!(
            "frame {:>2}: speed={:>3} mph lock={:#04X} open={:#04X} -> {:?}",
            index,
            vehicle.speed_mph,
            vehicle.doors_locked_status,
            vehicle.doors_closed_status,
            outcome
        );
        index += 1;
    }

    println!("\nEvents:");
    while let Some(event) = events.try_recv() {
        println!("   {:?}", event);
    }

    println!("\nFrames emitted:");
    for sent in &runner.bus_mut().sent {
        print!("   0x{:03X}:", sent.id.raw());
        for byte in sent.payload() {
            print!(" {:02X}", byte);
        }
        println!();
    }
}
