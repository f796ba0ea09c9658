//! REST surface of the checkout proxy.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod page;
pub mod routes;
