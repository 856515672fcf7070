//! Login API: registration, password and passwordless sign-in, social
//! sign-in and the current user's profile.

pub mod client;
pub mod types;

pub use client::LoginClient;
