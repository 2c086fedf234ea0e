// src/types/mod.rs
//! Wire types for the portal backend. The backend owns these shapes;
//! this layer only reads and writes them in transit.

pub mod application;
pub mod job;
pub mod response;
pub mod user;

pub use application::{Application, ApplicationStatus, ProfileSnapshot};
pub use job::{Eligibility, Job};
pub use response::{ApiErrorBody, AuthResponse, MessageResponse};
pub use user::{Experience, Links, Name, RegisterRequest, Role, User};
