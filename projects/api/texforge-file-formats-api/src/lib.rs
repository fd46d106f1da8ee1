#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod traits;

pub use dispatch::{decode_with_handlers, handler_for_extension};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use traits::ContainerHandler;
