pub mod colormap;
pub mod decibel;
pub mod terminal;
