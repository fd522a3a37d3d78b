pub mod classify;
pub mod error;
pub mod model;
pub mod ports;
pub mod service;
