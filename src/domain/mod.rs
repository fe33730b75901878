//! Domain types and the ports through which the Elevate service is reached.

pub mod batch;
pub mod events;
pub mod gateway;
pub mod notice;
pub mod ports;
pub mod settings;
