//! Platform detection for release asset selection.
//!
//! Maps the running operating system and CPU architecture to the naming
//! tokens used in SurrealDB release asset filenames. Detection is a pure
//! function of the build-target constants, computed once per run; an
//! unrecognized value is immediately fatal.

use crate::error::{Result, SetupError};
use std::fmt;

/// Operating system token used in asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Linux,
    Darwin,
}

impl Os {
    pub fn token(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }
}

/// CPU architecture token used in asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm64,
    Amd64,
}

impl Arch {
    pub fn token(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::Amd64 => "amd64",
        }
    }
}

/// Resolved platform tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the platform this process is running on.
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map raw OS and architecture names to their asset tokens.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let os = match os {
            "windows" => Os::Windows,
            "linux" => Os::Linux,
            "macos" => Os::Darwin,
            other => {
                return Err(SetupError::UnsupportedPlatform {
                    os: other.to_string(),
                })
            }
        };

        let arch = match arch {
            "aarch64" => Arch::Arm64,
            "x86_64" => Arch::Amd64,
            other => {
                return Err(SetupError::UnsupportedArch {
                    arch: other.to_string(),
                })
            }
        };

        Ok(Self { os, arch })
    }

    pub fn os_token(self) -> &'static str {
        self.os.token()
    }

    pub fn arch_token(self) -> &'static str {
        self.arch.token()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.token(), self.arch.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_pair_maps_to_documented_tokens() {
        let rows = [
            ("windows", "aarch64", "windows", "arm64"),
            ("windows", "x86_64", "windows", "amd64"),
            ("linux", "aarch64", "linux", "arm64"),
            ("linux", "x86_64", "linux", "amd64"),
            ("macos", "aarch64", "darwin", "arm64"),
            ("macos", "x86_64", "darwin", "amd64"),
        ];

        for (os, arch, os_token, arch_token) in rows {
            let platform = Platform::from_parts(os, arch).expect("supported pair");
            assert_eq!(platform.os_token(), os_token);
            assert_eq!(platform.arch_token(), arch_token);
        }
    }

    #[test]
    fn test_unknown_os_is_rejected() {
        let err = Platform::from_parts("freebsd", "x86_64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_unknown_arch_is_rejected() {
        let err = Platform::from_parts("linux", "riscv64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedArch { .. }));
    }

    #[test]
    fn test_display_joins_tokens() {
        let platform = Platform::from_parts("linux", "x86_64").unwrap();
        assert_eq!(platform.to_string(), "linux-amd64");
    }
}
