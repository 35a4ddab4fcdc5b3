//! Reference development board for the Vela kernel.
//!
//! The board drives a VGA monitor with eight colour bars and a short text
//! overlay read from a character ROM, and mirrors its reset line and push
//! buttons on LEDs. It exercises every part of the kernel: input-only
//! combinational logic, a deep settle network, a ROM lookup, asynchronous
//! reset, and a clock derived from a register.
//!
//! # Usage
//!
//! ```ignore
//! use vela_board::Board;
//!
//! let mut board = Board::new()?;
//! board.set_reset(true)?;
//! board.set_reset(false)?;
//! board.run(400)?;
//! assert!(board.outputs()?.h_sync);
//! ```

#![warn(missing_docs)]

pub mod design;
pub mod harness;
pub mod rom;

pub use design::{build, BoardSignals};
pub use harness::{Board, BoardOutputs, Button, PIXEL_DIVIDER};
pub use rom::font_rom;
