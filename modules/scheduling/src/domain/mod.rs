pub mod book;
pub mod error;
pub mod model;
pub mod ports;
pub mod service;

#[cfg(test)]
mod service_test;
