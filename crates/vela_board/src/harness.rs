//! A host-side driver for the board, the way a testbench drives it.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use vela_config::SimConfig;
use vela_ir::Design;
use vela_sim::{RomBindings, SimError, Simulator};

use crate::design::{self, BoardSignals, FONT_ROM};
use crate::rom::font_rom;

/// Board clock periods per pixel clock period.
pub const PIXEL_DIVIDER: u64 = 4;

/// One of the four push buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// B2, mirrored on LED2.
    B2,
    /// B3, mirrored on LED3.
    B3,
    /// B4, mirrored on LED4.
    B4,
    /// B5, mirrored on LED5.
    B5,
}

impl Button {
    fn index(self) -> usize {
        match self {
            Button::B2 => 0,
            Button::B3 => 1,
            Button::B4 => 2,
            Button::B5 => 3,
        }
    }
}

/// Everything visible on the board's connectors after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardOutputs {
    /// Horizontal sync level.
    pub h_sync: bool,
    /// Vertical sync level.
    pub v_sync: bool,
    /// RGB565 pixel.
    pub rgb: u16,
    /// LED1 to LED5.
    pub leds: [bool; 5],
}

/// A simulated board with its ROM bound and reset released.
#[derive(Debug)]
pub struct Board {
    sim: Simulator,
    signals: BoardSignals,
    ticks: u64,
}

impl Board {
    /// Builds and powers up a board with the default kernel configuration.
    pub fn new() -> Result<Self, SimError> {
        Self::with_config(SimConfig::default())
    }

    /// Builds and powers up a board.
    ///
    /// Reset starts released (high) so that asserting it later produces the
    /// falling edge the design resets on.
    pub fn with_config(config: SimConfig) -> Result<Self, SimError> {
        let (design, signals) = design::build()?;
        let mut roms = RomBindings::new();
        roms.bind(FONT_ROM, Arc::new(font_rom()));
        let mut sim = Simulator::new(Arc::new(design), config, &roms)?;
        sim.set_input(signals.reset, 1)?;
        sim.evaluate()?;
        Ok(Self {
            sim,
            signals,
            ticks: 0,
        })
    }

    /// The simulated design.
    pub fn design(&self) -> &Arc<Design> {
        self.sim.design()
    }

    /// Ids of the board's main signals.
    pub fn signals(&self) -> &BoardSignals {
        &self.signals
    }

    /// The underlying simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// The underlying simulator, for driving or depositing signals directly.
    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.sim
    }

    /// Asserts or releases the active-low reset and evaluates.
    pub fn set_reset(&mut self, asserted: bool) -> Result<(), SimError> {
        self.sim.set_input(self.signals.reset, u64::from(!asserted))?;
        self.sim.evaluate()?;
        Ok(())
    }

    /// Presses or releases a button and evaluates.
    pub fn press(&mut self, button: Button, pressed: bool) -> Result<(), SimError> {
        self.sim
            .set_input(self.signals.buttons[button.index()], u64::from(pressed))?;
        self.sim.evaluate()?;
        Ok(())
    }

    /// One full board clock period: rising edge, then falling edge.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.sim.set_input(self.signals.clk, 1)?;
        self.sim.evaluate()?;
        self.sim.set_input(self.signals.clk, 0)?;
        self.sim.evaluate()?;
        self.ticks += 1;
        Ok(())
    }

    /// Runs `n` board clock periods.
    pub fn run(&mut self, n: u64) -> Result<(), SimError> {
        for _ in 0..n {
            self.tick()?;
        }
        debug!(ticks = self.ticks, "board clock advanced");
        Ok(())
    }

    /// Ticks until the next rising edge of the pixel clock has been
    /// processed and returns the number of board clock periods taken, or
    /// `None` if it did not rise within one pixel period (reset held).
    pub fn pixel(&mut self) -> Result<Option<u64>, SimError> {
        for taken in 1..=PIXEL_DIVIDER {
            let before = self.sim.peek(self.signals.vga_clk).is_true();
            self.tick()?;
            if !before && self.sim.peek(self.signals.vga_clk).is_true() {
                return Ok(Some(taken));
            }
        }
        Ok(None)
    }

    /// Board clock periods since power-up.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reads the board outputs.
    pub fn outputs(&self) -> Result<BoardOutputs, SimError> {
        let s = &self.signals;
        let bit = |id| self.sim.output(id).map(|v| v.is_true());
        let mut leds = [false; 5];
        for (led, &id) in leds.iter_mut().zip(&s.leds) {
            *led = bit(id)?;
        }
        Ok(BoardOutputs {
            h_sync: bit(s.h_sync)?,
            v_sync: bit(s.v_sync)?,
            rgb: self.sim.output(s.rgb)?.as_u64() as u16,
            leds,
        })
    }
}
