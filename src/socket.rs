//! Helper socket address resolution.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the base cache directory.
pub const CACHE_HOME_VAR: &str = "XDG_CACHE_HOME";

/// Cache directory used under the home directory when no override is set.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Location of the socket relative to the base cache directory.
pub const SOCKET_SUBPATH: [&str; 2] = ["sketchybar", "helper.sock"];

/// Path of the helper daemon's listening socket.
///
/// Resolved once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketAddress(PathBuf);

impl SocketAddress {
    /// Resolve the address from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::var_os(CACHE_HOME_VAR), dirs::home_dir())
    }

    /// Resolve the address from an optional cache override and home directory.
    ///
    /// A set override is used verbatim, even when empty or relative, so the
    /// relay agrees with the helper daemon on the same environment. Without
    /// one the base is `<home>/.cache`.
    pub fn resolve(cache_home: Option<OsString>, home: Option<PathBuf>) -> Result<Self> {
        let mut path = match (cache_home, home) {
            (Some(dir), _) => PathBuf::from(dir),
            (None, Some(home)) => home.join(DEFAULT_CACHE_DIR),
            (None, None) => {
                return Err(Error::SocketPathUnresolved(format!(
                    "{CACHE_HOME_VAR} is unset and no home directory is available"
                )));
            }
        };
        path.extend(SOCKET_SUBPATH);
        Ok(Self(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for SocketAddress {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
