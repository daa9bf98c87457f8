//! Visual alarm
//!
//! Four LEDs wired as two interleaved pairs (pins 0 and 2, pins 1 and 3)
//! flash alternately, 100 ms per phase, forever. Used as the board's
//! "something is badly wrong" signal, so it needs nothing but GPIO and a
//! clock.

use log::error;
use pmodlink_hal::gpio::OutputPin;
use pmodlink_hal::time::Clock;

/// Duration of one phase
pub const PHASE_MS: u32 = 100;

/// Alternating four-LED blinker
pub struct Alarm<P, C> {
    pins: [P; 4],
    clock: C,
}

impl<P: OutputPin, C: Clock> Alarm<P, C> {
    /// Take the four pins and the clock; all LEDs start dark
    pub fn new(mut pins: [P; 4], clock: C) -> Self {
        for pin in pins.iter_mut() {
            pin.set_low();
        }
        Self { pins, clock }
    }

    /// One full cycle: first pair lit, then second pair lit
    pub fn blink_once(&mut self) {
        self.light(0);
        self.clock.sleep_ms(PHASE_MS);
        self.light(1);
        self.clock.sleep_ms(PHASE_MS);
    }

    /// Blink until reset
    pub fn sound(mut self) -> ! {
        error!("alarm sounding");
        loop {
            self.blink_once();
        }
    }

    pub fn release(self) -> ([P; 4], C) {
        (self.pins, self.clock)
    }

    // Darken the other pair before lighting `pair`
    fn light(&mut self, pair: usize) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if i % 2 != pair {
                pin.set_low();
            }
        }
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if i % 2 == pair {
                pin.set_high();
            }
        }
    }
}
