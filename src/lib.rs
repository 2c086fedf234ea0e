// src/lib.rs
pub mod cli;
pub mod coach;
pub mod core;
pub mod forms;
pub mod guard;
pub mod render;
pub mod session;
pub mod types;
