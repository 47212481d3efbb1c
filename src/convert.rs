//! Export an encrypted database to a plaintext copy

use crate::binary::{self, ExtractedIdentity};
use crate::crypto::{self, CipherKey, DerivedKey, HexKey};
use crate::engine::{CipherEngine, CipherHandle, SqlCipher};
use crate::errors::{EngineError, Error, ExportError, KeyError, OpenError};
use crate::utils;
use log::{debug, error, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Schema name the plaintext output is attached under
const EXPORT_ALIAS: &str = "plaintext";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the database key comes from
pub enum KeySource {
    /// A raw key supplied by the user, applied verbatim
    Explicit(HexKey),
    /// A key derived from the device and account config files
    Derived {
        /// Path to `CompatibleInfo.cfg`
        device_config: PathBuf,
        /// Path to `systemInfo.cfg`
        account_config: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Options for a single conversion
pub struct Config {
    /// Encrypted source database
    pub source: PathBuf,
    /// Path the plaintext copy is written to
    pub output: PathBuf,
    /// How the key is obtained
    pub key_source: KeySource,
    /// Turn off per-page HMAC before reading, needed by files written without it
    pub disable_hmac: bool,
    /// `PRAGMA cipher_compatibility` version applied after the key, if any
    pub compatibility: Option<u8>,
    /// Replace an existing output file instead of failing
    pub overwrite: bool,
}

impl Config {
    /// Convert with a key derived from the config files next to `source`
    ///
    /// HMAC is disabled, as the client writes its databases without it.
    pub fn derived<P: Into<PathBuf>, Q: Into<PathBuf>>(source: P, output: Q) -> Config {
        let source = source.into();
        let (device_config, account_config) = utils::companion_paths(&source);
        Config {
            source,
            output: output.into(),
            key_source: KeySource::Derived {
                device_config,
                account_config,
            },
            disable_hmac: true,
            compatibility: None,
            overwrite: false,
        }
    }

    /// Convert with a user supplied raw key, leaving HMAC settings alone
    pub fn explicit<P: Into<PathBuf>, Q: Into<PathBuf>>(
        source: P,
        output: Q,
        key: HexKey,
    ) -> Config {
        Config {
            source: source.into(),
            output: output.into(),
            key_source: KeySource::Explicit(key),
            disable_hmac: false,
            compatibility: None,
            overwrite: false,
        }
    }

    /// Set the cipher compatibility version
    pub fn with_compatibility(mut self, compatibility: Option<u8>) -> Config {
        self.compatibility = compatibility;
        self
    }

    /// Set whether an existing output may be replaced
    pub fn with_overwrite(mut self, overwrite: bool) -> Config {
        self.overwrite = overwrite;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Steps of a conversion, in order
pub enum Stage {
    /// Source handle opened
    Opened,
    /// Key applied to the handle
    KeyApplied,
    /// Cipher compatibility version set
    CompatibilitySet,
    /// Per-page HMAC turned off
    HmacDisabled,
    /// Test query succeeded
    Verified,
    /// Output attached
    Attached,
    /// Data copied to the output
    Exported,
    /// Output detached
    Detached,
    /// Source handle released
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Opened => "open",
            Stage::KeyApplied => "apply key",
            Stage::CompatibilitySet => "set cipher compatibility",
            Stage::HmacDisabled => "disable hmac",
            Stage::Verified => "verify key",
            Stage::Attached => "attach output",
            Stage::Exported => "export",
            Stage::Detached => "detach output",
            Stage::Closed => "close",
        };
        f.write_str(name)
    }
}

/// Recover the key for `device_config` and `account_config`
///
/// The first account id found is used.
pub fn recover_key<P, Q>(device_config: P, account_config: Q) -> Result<DerivedKey, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let identity: ExtractedIdentity = binary::extract_identity(device_config, account_config)?;
    Ok(crypto::derive(identity.device_id(), identity.account_id()))
}

fn acquire_key(key_source: &KeySource) -> Result<CipherKey, Error> {
    match key_source {
        KeySource::Explicit(key) => Ok(CipherKey::from(key.clone())),
        KeySource::Derived {
            device_config,
            account_config,
        } => recover_key(device_config, account_config)
            .map(|key| CipherKey::from(&key))
            .map_err(|e| {
                error!("Could not recover key: {}", e);
                e
            }),
    }
}

fn reached(stage: Stage) {
    debug!("Reached stage: {}", stage);
}

/// Keeps the output attached until detached, detaching on drop otherwise
struct AttachedOutput<'a, H: CipherHandle> {
    handle: &'a mut H,
    attached: bool,
}

impl<'a, H: CipherHandle> AttachedOutput<'a, H> {
    fn attach(handle: &'a mut H, path: &Path) -> Result<AttachedOutput<'a, H>, ExportError> {
        handle
            .attach(path, EXPORT_ALIAS)
            .map_err(|source| ExportError::Attach {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(AttachedOutput {
            handle,
            attached: true,
        })
    }

    fn handle(&mut self) -> &mut H {
        &mut *self.handle
    }

    fn detach(mut self) -> Result<(), EngineError> {
        self.attached = false;
        self.handle.detach(EXPORT_ALIAS)
    }
}

impl<'a, H: CipherHandle> Drop for AttachedOutput<'a, H> {
    fn drop(&mut self) {
        if self.attached {
            if let Err(e) = self.handle.detach(EXPORT_ALIAS) {
                warn!("Failed to detach output after an error: {}", e);
            }
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn prepare_output(config: &Config) -> Result<(), ExportError> {
    if !config.output.exists() {
        return Ok(());
    }
    if same_file(&config.source, &config.output) {
        return Err(ExportError::OutputIsSource {
            path: config.output.clone(),
        });
    }
    if !config.overwrite {
        return Err(ExportError::OutputExists {
            path: config.output.clone(),
        });
    }
    info!("Removing existing output {}", config.output.display());
    fs::remove_file(&config.output).map_err(|source| ExportError::RemoveExisting {
        path: config.output.clone(),
        source,
    })
}

fn unlock<H: CipherHandle>(
    handle: &mut H,
    config: &Config,
    key: &CipherKey,
) -> Result<(), KeyError> {
    handle
        .execute(&format!("PRAGMA key = {};", key.pragma_value()))
        .map_err(KeyError::Apply)?;
    reached(Stage::KeyApplied);

    if let Some(version) = config.compatibility {
        handle
            .execute(&format!("PRAGMA cipher_compatibility = {};", version))
            .map_err(|source| KeyError::Compatibility { version, source })?;
        reached(Stage::CompatibilitySet);
    }

    if config.disable_hmac {
        handle
            .execute("PRAGMA cipher_use_hmac = OFF;")
            .map_err(KeyError::DisableHmac)?;
        reached(Stage::HmacDisabled);
    }

    handle
        .execute("SELECT count(1) FROM sqlite_master;")
        .map_err(KeyError::Rejected)?;
    reached(Stage::Verified);
    Ok(())
}

fn export<H: CipherHandle>(handle: &mut H, config: &Config) -> Result<(), ExportError> {
    prepare_output(config)?;
    info!(
        "Converting database {} to {}",
        config.source.display(),
        config.output.display()
    );

    let mut attached = AttachedOutput::attach(handle, &config.output)?;
    reached(Stage::Attached);

    attached
        .handle()
        .execute(&format!("SELECT sqlcipher_export('{}');", EXPORT_ALIAS))
        .map_err(ExportError::Export)?;
    reached(Stage::Exported);

    attached.detach().map_err(ExportError::Detach)?;
    reached(Stage::Detached);
    Ok(())
}

fn remove_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (),
        Err(e) => warn!("Could not remove partial output {}: {}", path.display(), e),
    }
}

fn convert_open<H: CipherHandle>(
    handle: &mut H,
    config: &Config,
    key: &CipherKey,
) -> Result<(), Error> {
    unlock(handle, config, key)?;
    match export(handle, config) {
        Ok(()) => Ok(()),
        Err(e) => {
            let created = matches!(
                e,
                ExportError::Attach { .. } | ExportError::Export(_) | ExportError::Detach(_)
            );
            if created {
                remove_partial_output(&config.output);
            }
            Err(e.into())
        }
    }
}

/// Export the database described by `config` through `engine`
///
/// Steps run strictly in order and stop at the first failure. The source
/// handle is closed on every path; a failed export leaves no output behind.
pub fn convert_with<E: CipherEngine>(engine: &E, config: &Config) -> Result<(), Error> {
    let key = acquire_key(&config.key_source)?;

    let mut handle = engine.open(&config.source).map_err(|source| {
        let e = OpenError::Engine {
            path: config.source.clone(),
            source,
        };
        error!("{}", e);
        e
    })?;
    reached(Stage::Opened);

    let result = convert_open(&mut handle, config, &key);
    if let Err(e) = &result {
        error!("{}", e);
    }

    let closed = handle.close();
    match (result, closed) {
        (Ok(()), Ok(())) => {
            reached(Stage::Closed);
            info!(
                "Successfully converted database {} to {}",
                config.source.display(),
                config.output.display()
            );
            Ok(())
        }
        (Ok(()), Err(e)) => {
            error!("Failed to close database: {}", e);
            Err(Error::Close(e))
        }
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Failed to close database: {}", close_err);
            Err(e)
        }
    }
}

/// Export the database described by `config` using SQLCipher
pub fn convert(config: &Config) -> Result<(), Error> {
    convert_with(&SqlCipher, config)
}
