pub mod cache;
pub mod gateway;
pub mod legacy;
pub(crate) mod wire;
