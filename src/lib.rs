#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
extern crate alloc;
mod config;
mod error;
mod manager;
mod pool_allocator;
mod poolable;
mod prototype;

pub use config::*;
pub use error::*;
pub use manager::*;
pub use pool_allocator::*;
pub use poolable::*;
pub use prototype::*;
