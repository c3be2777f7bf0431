//! OAuth2 refresh-token flow for the Smart Device Management API

mod token;

pub use token::*;
