//! Request-level skin rendering: resolve, load, build, render, encode.

mod provider;
mod request;
mod service;


pub use provider::*;
pub use request::{
    BodyRequest, CapeRequest, DEFAULT_PHI, DEFAULT_THETA, HeadRequest, MAX_OUTPUT_SIZE,
    SpriteRequest,
};
pub use service::*;
