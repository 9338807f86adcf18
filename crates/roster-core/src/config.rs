//! Configuration values shared across crates

use std::str::FromStr;

use crate::prelude::*;

/// How strictly new users are validated on creation.
///
/// `Strict` requires username, email, password and an organization reference and
/// rejects duplicates up front. `Loose` skips both checks, for system-created
/// ("ghost") users.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegistrationMode {
	#[default]
	Strict,
	Loose,
}

impl RegistrationMode {
	pub fn as_str(self) -> &'static str {
		match self {
			RegistrationMode::Strict => "strict",
			RegistrationMode::Loose => "loose",
		}
	}
}

impl FromStr for RegistrationMode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"strict" => Ok(RegistrationMode::Strict),
			"loose" => Ok(RegistrationMode::Loose),
			other => Err(Error::ConfigError(format!(
				"Invalid registration mode '{}': expected 'strict' or 'loose'",
				other
			))),
		}
	}
}

impl std::fmt::Display for RegistrationMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_registration_mode() {
		assert_eq!("strict".parse::<RegistrationMode>().unwrap(), RegistrationMode::Strict);
		assert_eq!(" Loose ".parse::<RegistrationMode>().unwrap(), RegistrationMode::Loose);
		assert!(matches!("open".parse::<RegistrationMode>(), Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_default_is_strict() {
		assert_eq!(RegistrationMode::default(), RegistrationMode::Strict);
	}
}

// vim: ts=4
