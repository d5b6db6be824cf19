#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod bank;
pub mod excitation;
pub mod filter;
pub mod frequency_table;
pub mod generators;
pub mod synth;
pub mod utils;
