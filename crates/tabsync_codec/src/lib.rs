//! # tabsync Codec
//!
//! Text-level codecs used by the tabsync persistence engine.
//!
//! This crate provides:
//! - [`encode_serial`] / [`decode_serial`]: percent-escaping of a free-form
//!   workstation serial so it can travel as a single URL path segment
//! - [`inline_images`] / [`inline_buffer`]: rewriting of in-memory image
//!   references into self-contained `data:image/png;base64,...` URIs
//! - [`ImageNamer`]: collision-flagging names for freshly embedded images
//!
//! This is a pure codec crate with no I/O operations.
//!
//! ## Example
//!
//! ```
//! use tabsync_codec::{decode_serial, encode_serial};
//!
//! let token = encode_serial("desk/01 é");
//! assert_eq!(token, "desk%2F01%20%C3%A9");
//! assert_eq!(decode_serial(&token).unwrap(), "desk/01 é");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ident;
mod image;
mod naming;

pub use error::{CodecError, CodecResult};
pub use ident::{decode_serial, decode_serial_lossy, encode_serial};
pub use image::{
    decode_data_uri, inline_buffer, inline_images, png_data_uri, ImageResolver, RichTextBuffer,
    PNG_MEDIA_TYPE,
};
pub use naming::ImageNamer;
