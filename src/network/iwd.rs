//! Backend driver for iwd, shelling out to `iwctl`.
//!
//! Every operation is exactly one command invocation. Listing commands
//! capture stdout and go through the fixed-width table parser; everything
//! else discards its output and reports success purely from exit status.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{WmError, WmResult};
use crate::network::provision;
use crate::network::table::{self, Column};
use crate::network::types::{Device, EnterpriseLogin, Network, Security};

const IWCTL: &str = "iwctl";

const DEVICE_COLUMNS: &[Column] = &[
    Column::new("Name", 20),
    Column::new("Address", 20),
    Column::new("Powered", 10),
    Column::new("Adapter", 10),
    Column::new("Mode", 10),
];

const NETWORK_COLUMNS: &[Column] = &[Column::new("Network name", 32), Column::new("Security", 16)];

const KNOWN_COLUMNS: &[Column] = &[Column::new("Name", 32), Column::new("Security", 16)];

#[derive(Debug, Default)]
pub struct IwdBackend;

impl IwdBackend {
    pub fn new() -> Self {
        Self
    }

    /// Run a listing command and return its ANSI-stripped stdout.
    async fn run_table(&self, args: &[&str]) -> WmResult<String> {
        debug!(?args, "iwctl listing");
        let output = Command::new(IWCTL)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| WmError::Backend(format!("failed to spawn {IWCTL}: {e}")))?;

        if !output.status.success() {
            return Err(WmError::Backend(format!(
                "{IWCTL} {} exited with {}",
                args.join(" "),
                output.status
            )));
        }

        Ok(table::strip_ansi(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Run a fire-and-forget command; success is the exit status alone.
    async fn run_silent(&self, args: &[&str]) -> WmResult<()> {
        debug!(?args, "iwctl");
        let status = Command::new(IWCTL)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| WmError::Backend(format!("failed to spawn {IWCTL}: {e}")))?;

        if !status.success() {
            return Err(WmError::Backend(format!(
                "{IWCTL} {} exited with {status}",
                args.join(" ")
            )));
        }
        Ok(())
    }

    pub async fn devices(&self) -> WmResult<Vec<Device>> {
        let out = self.run_table(&["device", "list"]).await?;
        let rows = table::parse(&out, DEVICE_COLUMNS)?;
        Ok(rows
            .into_iter()
            .map(|row| Device {
                name: row.field(0).to_string(),
                address: row.field(1).to_string(),
                powered: row.field(2).trim().to_string(),
                adapter: row.field(3).trim().to_string(),
                mode: row.field(4).trim().to_string(),
            })
            .collect())
    }

    pub async fn networks(&self, device: &str) -> WmResult<Vec<Network>> {
        let out = self
            .run_table(&["station", device, "get-networks"])
            .await?;
        let rows = table::parse(&out, NETWORK_COLUMNS)?;
        Ok(rows
            .into_iter()
            .map(|row| Network {
                ssid: row.field(0).to_string(),
                security: Security::parse(row.field(1).trim()),
                connected: row.marked,
            })
            .collect())
    }

    pub async fn known_networks(&self) -> WmResult<Vec<Network>> {
        let out = self.run_table(&["known-networks", "list"]).await?;
        let rows = table::parse(&out, KNOWN_COLUMNS)?;
        Ok(rows
            .into_iter()
            .map(|row| Network {
                ssid: row.field(0).to_string(),
                security: Security::parse(row.field(1).trim()),
                connected: false,
            })
            .collect())
    }

    pub async fn scan(&self, device: &str) -> WmResult<()> {
        self.run_silent(&["station", device, "scan"]).await
    }

    pub async fn connect(
        &self,
        device: &str,
        ssid: &str,
        passphrase: Option<&str>,
    ) -> WmResult<()> {
        match passphrase {
            // --dont-ask keeps iwctl from blocking on an interactive prompt
            None => {
                self.run_silent(&["--dont-ask", "station", device, "connect", ssid])
                    .await
            }
            Some(p) => {
                self.run_silent(&["--passphrase", p, "station", device, "connect", ssid])
                    .await
            }
        }
    }

    pub async fn disconnect(&self, device: &str) -> WmResult<()> {
        self.run_silent(&["station", device, "disconnect"]).await
    }

    pub async fn forget(&self, ssid: &str) -> WmResult<()> {
        self.run_silent(&["known-networks", ssid, "forget"]).await
    }

    pub async fn power_on_adapter(&self, adapter: &str) -> WmResult<()> {
        self.run_silent(&["adapter", adapter, "set-property", "Powered", "on"])
            .await
    }

    pub async fn power_on_device(&self, device: &str) -> WmResult<()> {
        self.run_silent(&["device", device, "set-property", "Powered", "on"])
            .await
    }

    /// Write the 802.1x credential file for `network` through the privileged
    /// writer, restart iwd so it picks the file up, and wait out the settle
    /// delay. The caller follows with a normal connect.
    pub async fn provision_enterprise(
        &self,
        network: &Network,
        login: &EnterpriseLogin,
    ) -> WmResult<()> {
        let path = provision::credential_path(&network.ssid, &network.security);
        let blob = provision::enterprise_blob(login);
        provision::write_credential_file(&path, &blob, &login.admin_password).await?;
        provision::restart_daemon(&login.admin_password).await?;
        tokio::time::sleep(provision::SETTLE_DELAY).await;
        Ok(())
    }
}
