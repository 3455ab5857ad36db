//! Auth-domain data types: consumer credentials and issued tokens.

pub mod credential;
pub mod token;

pub use credential::*;
pub use token::*;
