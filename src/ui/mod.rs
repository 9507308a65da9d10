pub mod client_form;
pub mod clients;
pub mod components;
pub mod home;
