//! Limiter state persistence.
//!
//! Saves and restores the exported limiter state across process restarts.
//! Writes are atomic (temp file + rename) and restricted to the owner on
//! Unix, since usage data reveals which providers an account is paying for.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::LimiterError;
use crate::limiter::RateLimiter;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default state directory.
///
/// - Linux: `~/.local/share/prospector`
/// - macOS: `~/Library/Application Support/prospector`
/// - Windows: `%APPDATA%\prospector`
pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("prospector"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default limiter state file path.
pub fn default_state_path() -> PathBuf {
    default_state_dir().join("limiter_state.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), LimiterError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600); // Owner read/write only
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), LimiterError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Saves the limiter's exported state to a file.
///
/// Creates parent directories if needed and writes atomically via a temp
/// file and rename.
pub async fn save_state(limiter: &RateLimiter, path: &Path) -> Result<(), LimiterError> {
    debug!(path = %path.display(), "Saving limiter state");

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let state = limiter.export_state().await?;
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &state).await?;
    tokio::fs::rename(&temp_path, path).await?;
    set_restrictive_permissions(path).await?;

    debug!(path = %path.display(), "Limiter state saved");
    Ok(())
}

/// Restores limiter state from a file.
///
/// A missing file is not an error (the limiter keeps its fresh state);
/// malformed content is logged and ignored by the import itself.
pub async fn load_state(limiter: &RateLimiter, path: &Path) -> Result<(), LimiterError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No saved limiter state, starting fresh");
            return Ok(());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read limiter state");
            return Err(e.into());
        }
    };

    limiter.import_state(&raw).await;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
