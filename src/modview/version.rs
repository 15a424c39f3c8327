//! Lexer versions and the capabilities they gate
//!
//! Lexer output changed shape across releases: export records only exist from `1.0.0`, and
//! the `hasModuleSyntax` flag only from `1.5.0`. Everything that depends on the lexer version
//! goes through [`Capabilities`], so the rest of the pipeline never compares versions itself.
//!
//! Version strings are strictly `MAJOR.MINOR.PATCH` with decimal components. Anything else
//! is rejected; a malformed version is never treated as the lowest or the highest one.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").expect("version regex is valid"));

/// Oldest release the viewer knows how to read.
pub const MIN_SUPPORTED: Version = Version::new(0, 5, 0);
/// First release that reports export records with spans.
pub const EXPORT_RECORDS_SINCE: Version = Version::new(1, 0, 0);
/// First release that reports `hasModuleSyntax`.
pub const MODULE_SYNTAX_FLAG_SINCE: Version = Version::new(1, 5, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version: {0:?}")]
    Malformed(String),

    #[error("version {version} is older than the minimum supported {minimum}")]
    Unsupported { version: Version, minimum: Version },
}

/// A three-part numeric version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || VersionError::Malformed(s.to_string());
        let caps = VERSION_RE.captures(s).ok_or_else(malformed)?;
        let component = |i: usize| -> Result<u64, VersionError> {
            caps[i].parse::<u64>().map_err(|_| malformed())
        };
        Ok(Version::new(component(1)?, component(2)?, component(3)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Returns true when `version` is strictly lower than `target`.
///
/// Both strings must be well-formed; there is no fallback ordering for bad input.
pub fn is_version_lower(version: &str, target: &str) -> Result<bool, VersionError> {
    let version: Version = version.parse()?;
    let target: Version = target.parse()?;
    Ok(version < target)
}

/// What a given lexer release reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The second element of the parse result is a list of `{s, e, ls, le, n, ln}` records.
    pub export_records: bool,
    /// The fourth element of the parse result is the `hasModuleSyntax` flag.
    pub module_syntax_flag: bool,
}

impl Capabilities {
    /// Capabilities of the newest known release.
    pub const LATEST: Capabilities = Capabilities {
        export_records: true,
        module_syntax_flag: true,
    };

    pub fn for_version(version: &str) -> Result<Self, VersionError> {
        let parsed: Version = version.parse()?;
        Self::of(parsed)
    }

    pub fn of(version: Version) -> Result<Self, VersionError> {
        if version < MIN_SUPPORTED {
            return Err(VersionError::Unsupported {
                version,
                minimum: MIN_SUPPORTED,
            });
        }
        Ok(Capabilities {
            export_records: version >= EXPORT_RECORDS_SINCE,
            module_syntax_flag: version >= MODULE_SYNTAX_FLAG_SINCE,
        })
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "export-records: {}", self.export_records)?;
        write!(f, "module-syntax-flag: {}", self.module_syntax_flag)
    }
}
