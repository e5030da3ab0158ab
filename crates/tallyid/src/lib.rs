#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocator;
mod config;
mod encoding;
mod error;
mod generator;
mod store;

pub use crate::allocator::*;
pub use crate::config::*;
pub use crate::encoding::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::store::*;
