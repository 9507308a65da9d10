mod client;

pub use client::{ClientFields, ClientRecord};
