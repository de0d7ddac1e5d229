//! Privileged credential-file writes for 802.1x networks.
//!
//! iwd stores network credentials as flat files under `/var/lib/iwd`, a
//! root-owned directory. The blob is piped into `sudo -A tee <path>`; sudo
//! authenticates through its askpass hook, which points back at this very
//! executable running in password-relay mode. The relay prints the admin
//! password (carried in an environment variable, never on a command line)
//! to stdout for sudo to consume.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

use crate::error::{WmError, WmResult};
use crate::network::types::{EnterpriseLogin, Security};

/// Where iwd keeps per-network credential files.
pub const CREDENTIAL_DIR: &str = "/var/lib/iwd";

/// First argument that switches the binary into password-relay mode.
pub const ASKPASS_SENTINEL: &str = "--askpass-relay";

/// Environment variable carrying the admin password to the relay.
pub const ASKPASS_ENV: &str = "IWTUI_ASKPASS";

/// Fixed wait after restarting iwd before a connect is attempted.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Derive the credential-file path for an SSID.
///
/// SSIDs made entirely of `[A-Za-z0-9_-]` map straight to a filename; any
/// other SSID becomes `=` followed by the lowercase hex of every UTF-8 byte.
/// Both forms get the security class as suffix. This mirrors iwd's own
/// naming scheme, so the file lands where the daemon expects it.
pub fn credential_path(ssid: &str, security: &Security) -> PathBuf {
    let stem = if ssid
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        && !ssid.is_empty()
    {
        ssid.to_string()
    } else {
        let mut hex = String::with_capacity(1 + ssid.len() * 2);
        hex.push('=');
        for b in ssid.bytes() {
            hex.push_str(&format!("{b:02x}"));
        }
        hex
    };

    Path::new(CREDENTIAL_DIR).join(format!("{stem}.{}", security.as_str()))
}

/// Build the key=value credential blob iwd expects for PEAP/MSCHAPv2.
pub fn enterprise_blob(login: &EnterpriseLogin) -> String {
    format!(
        "[Security]\n\
         EAP-Method=PEAP\n\
         EAP-Identity={}\n\
         EAP-PEAP-Phase2-Method=MSCHAPV2\n\
         EAP-PEAP-Phase2-Identity={}\n\
         EAP-PEAP-Phase2-Password={}\n",
        login.anonymous_identity, login.username, login.password
    )
}

/// Pipe `blob` into `sudo -A tee <path>`, authenticating through the
/// askpass relay. All helper output goes to the null sink.
pub async fn write_credential_file(path: &Path, blob: &str, admin_password: &str) -> WmResult<()> {
    info!(path = %path.display(), "writing credential file");
    let mut child = sudo_command(admin_password)?
        .arg("tee")
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| WmError::Provision(format!("failed to spawn sudo: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| WmError::Provision("sudo stdin unavailable".into()))?;
    stdin.write_all(blob.as_bytes()).await?;
    drop(stdin);

    let status = child
        .wait()
        .await
        .map_err(|e| WmError::Provision(format!("sudo did not exit: {e}")))?;
    if !status.success() {
        return Err(WmError::Provision(format!(
            "credential write exited with {status}"
        )));
    }
    Ok(())
}

/// Restart iwd so it re-reads the credential store.
pub async fn restart_daemon(admin_password: &str) -> WmResult<()> {
    info!("restarting iwd");
    let status = sudo_command(admin_password)?
        .args(["systemctl", "restart", "iwd"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| WmError::Provision(format!("failed to spawn sudo: {e}")))?;
    if !status.success() {
        return Err(WmError::Provision(format!(
            "iwd restart exited with {status}"
        )));
    }
    Ok(())
}

fn sudo_command(admin_password: &str) -> WmResult<Command> {
    let exe = std::env::current_exe()?;
    let mut cmd = Command::new("sudo");
    cmd.arg("-A")
        .env("SUDO_ASKPASS", exe)
        .env(ASKPASS_ENV, admin_password);
    Ok(cmd)
}

/// Decide whether this invocation is the askpass relay.
///
/// Direct relay runs pass the sentinel as the sole argument. sudo itself
/// re-invokes the helper with a prompt string instead, so any lone argument
/// is accepted when the relay environment variable is present.
pub fn is_askpass_invocation() -> bool {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(first) if first == ASKPASS_SENTINEL => true,
        Some(_) => std::env::var(ASKPASS_ENV).is_ok() && args.next().is_none(),
        None => false,
    }
}

/// Print the relayed password to stdout and exit. Runs before any terminal
/// or runtime setup.
pub fn run_askpass_relay() -> ! {
    let password = std::env::var(ASKPASS_ENV).unwrap_or_default();
    println!("{password}");
    std::process::exit(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ssids_map_straight_to_filenames() {
        let path = credential_path("MyHome_1", &Security::Psk);
        assert_eq!(path, Path::new("/var/lib/iwd/MyHome_1.psk"));

        let path = credential_path("guest-net", &Security::Eap8021x);
        assert_eq!(path, Path::new("/var/lib/iwd/guest-net.8021x"));
    }

    #[test]
    fn special_ssids_are_hex_encoded() {
        // "Café WiFi" contains a space and a multibyte char; every UTF-8
        // byte is hex encoded behind a '=' prefix.
        let path = credential_path("Café WiFi", &Security::Psk);
        assert_eq!(path, Path::new("/var/lib/iwd/=436166c3a92057694669.psk"));
    }

    #[test]
    fn empty_ssid_is_hex_encoded() {
        let path = credential_path("", &Security::Psk);
        assert_eq!(path, Path::new("/var/lib/iwd/=.psk"));
    }

    #[test]
    fn blob_carries_all_credential_fields() {
        let login = EnterpriseLogin {
            anonymous_identity: "anon@example.org".into(),
            username: "user@example.org".into(),
            password: "hunter2".into(),
            admin_password: "root-pw".into(),
        };
        let blob = enterprise_blob(&login);
        assert!(blob.starts_with("[Security]\n"));
        assert!(blob.contains("EAP-Method=PEAP\n"));
        assert!(blob.contains("EAP-Identity=anon@example.org\n"));
        assert!(blob.contains("EAP-PEAP-Phase2-Identity=user@example.org\n"));
        assert!(blob.contains("EAP-PEAP-Phase2-Password=hunter2\n"));
        // The admin password authenticates sudo; it must never be written out
        assert!(!blob.contains("root-pw"));
    }
}
