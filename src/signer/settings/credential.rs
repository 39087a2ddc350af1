//! PFX credential passed through to signtool.

use std::fmt;
use std::path::{Path, PathBuf};

/// Certificate file and password used for one batch.
///
/// The PFX is opaque to this crate: it is only checked for existence and
/// handed to signtool. The password is never printed; [`fmt::Debug`] redacts it.
#[derive(Clone, Default)]
pub struct Credential {
    certificate_path: PathBuf,
    password: String,
}

impl Credential {
    /// Creates a credential from a certificate path and a (possibly empty) password.
    pub fn new(certificate_path: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self {
            certificate_path: certificate_path.into(),
            password: password.into(),
        }
    }

    /// Path to the PFX certificate.
    pub fn certificate_path(&self) -> &Path {
        &self.certificate_path
    }

    /// Password for the PFX. Only used to build the signtool argument list.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Whether no password was supplied.
    pub fn has_empty_password(&self) -> bool {
        self.password.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("certificate_path", &self.certificate_path)
            .field("password", &"<redacted>")
            .finish()
    }
}
