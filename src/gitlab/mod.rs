pub mod events;
pub mod webhook;
