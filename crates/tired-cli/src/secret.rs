//! Jira credentials that were not given on the command line.
//!
//! A missing value is looked up in the OS keyring under the `tired` service.
//! If the keyring has nothing, the user is asked for it without echo and the
//! answer is saved for the next run.

use anyhow::{bail, Context};

/// Keyring service all secrets are stored under.
pub const SERVICE: &str = "tired";

pub trait SecretStore {
    /// `Ok(None)` when nothing is stored under `name`.
    fn get(&self, name: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, name: &str, value: &str) -> anyhow::Result<()>;
}

/// The platform keyring.
pub struct Keyring;

impl Keyring {
    fn entry(name: &str) -> anyhow::Result<keyring::Entry> {
        keyring::Entry::new(SERVICE, name)
            .with_context(|| format!("can't open keyring entry '{name}'"))
    }
}

impl SecretStore for Keyring {
    fn get(&self, name: &str) -> anyhow::Result<Option<String>> {
        match Self::entry(name)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("can't read '{name}' from keyring")),
        }
    }

    fn set(&self, name: &str, value: &str) -> anyhow::Result<()> {
        Self::entry(name)?
            .set_password(value)
            .with_context(|| format!("can't save '{name}' to keyring"))
    }
}

/// Ask on the terminal with input hidden.
pub fn prompt_hidden(name: &str) -> anyhow::Result<String> {
    rpassword::prompt_password(format!("New '{name}' value: "))
        .with_context(|| format!("can't read '{name}' from the terminal"))
}

/// Return `given` if set, else the stored value, else a prompted one.
///
/// A prompted value is saved to `store` before it is returned. A keyring that
/// cannot be read is treated as empty.
pub fn obtain(
    name: &str,
    given: Option<&str>,
    store: &dyn SecretStore,
    prompt: impl FnOnce(&str) -> anyhow::Result<String>,
) -> anyhow::Result<String> {
    if let Some(value) = given.filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    match store.get(name) {
        Ok(Some(value)) if !value.is_empty() => {
            tracing::info!(secret = name, "Got secret value from keyring.");
            return Ok(value);
        }
        Ok(_) => {}
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(secret = name, %error, "Keyring lookup failed.");
        }
    }

    let value = prompt(name)?;
    if value.is_empty() {
        bail!("no value given for '{name}'");
    }
    store.set(name, &value)?;
    tracing::info!(secret = name, "Secret saved to keyring.");
    Ok(value)
}
