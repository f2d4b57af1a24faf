//! Présentation terminal pour ditherglass : canvas half-block, FPS, statut.

pub mod canvas;
pub mod fps;
pub mod ui;
