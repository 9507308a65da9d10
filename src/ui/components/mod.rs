pub mod masked_input;
pub mod notice;
