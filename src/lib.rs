#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod filter;
pub mod fx;
pub mod oscillator;
pub mod utils;
