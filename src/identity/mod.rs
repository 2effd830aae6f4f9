//! Directory identity lookup
//!
//! Resolves usernames to the numeric identities the corrector applies.

pub mod directory;
pub mod resolver;

use std::fmt;

pub use directory::{DirectoryConnector, NssDirectory, StaticDirectory};
pub use resolver::{IdentityResolver, Resolution};

/// Directory-assigned numeric user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericIdentity(pub u32);

impl fmt::Display for NumericIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
