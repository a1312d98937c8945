//! opsgen-transport - Wire contract between operations clients and the server
//!
//! This crate provides:
//! - [`RequestBody`] and [`ResponseBody`] for the `POST /operations/<name>` exchange
//! - [`Codec`] trait and [`JsonCodec`] implementation
//! - [`EventFramer`] for splitting streamed responses into events
//! - [`operation_url`] and the [`QueryFlag`] wire markers

mod codec;
mod envelope;
mod framing;
mod route;

pub use codec::{Codec, CodecError, JsonCodec};
pub use envelope::{GraphQLError, RequestBody, RequestMeta, ResponseBody};
pub use framing::EventFramer;
pub use route::{QueryFlag, operation_url};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Codec, CodecError, EventFramer, GraphQLError, JsonCodec, QueryFlag, RequestBody, ResponseBody,
        operation_url,
    };
}
