//! Low-frequency oscillators for delay modulation.

pub mod lfo;
