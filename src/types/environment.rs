//! Environment selection

use crate::{PayError, Result};
use std::str::FromStr;

/// Production or provider-operated sandbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Production,
    #[default]
    Sandbox,
}

impl Environment {
    /// Build from the `is_prod` flag used by merchant configuration
    pub fn from_is_prod(is_prod: bool) -> Self {
        if is_prod {
            Environment::Production
        } else {
            Environment::Sandbox
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Sandbox => "sandbox",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = PayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "sandbox" | "dev" | "test" => Ok(Environment::Sandbox),
            other => Err(PayError::config(format!("Unknown environment: {}", other))),
        }
    }
}
