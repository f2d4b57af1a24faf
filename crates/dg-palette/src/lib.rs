//! Constrained-palette quantization for ditherglass.
//!
//! `palette` holds the ordered color sets (parsing, built-in presets) and
//! `quantizer` the per-pixel nearest/second-nearest remap with checkerboard
//! dither on near-ties.

pub mod palette;
pub mod quantizer;

pub use palette::{Palette, PalettePreset, PRESETS};
pub use quantizer::PaletteQuantizer;
