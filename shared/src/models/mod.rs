//! Data models shared by the server and the client library

pub mod client;
pub mod form;

pub use client::*;
pub use form::FormValue;
