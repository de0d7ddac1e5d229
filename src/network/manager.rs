//! The single authoritative in-memory view of wireless state.
//!
//! Every mutation goes through the backend first and is mirrored into
//! memory only after the backend reports success — optimistically, without
//! a re-query. Local state can therefore lag backend truth until the next
//! scheduled refresh; the polling cadence in the app loop bounds that
//! window.

use tracing::{info, warn};

use crate::error::{WmError, WmResult};
use crate::network::backend::WirelessBackend;
use crate::network::types::{Device, EnterpriseLogin, Network};

pub struct WirelessManager {
    backend: WirelessBackend,
    devices: Vec<Device>,
    current: usize,
    networks: Vec<Network>,
    known_networks: Vec<Network>,
}

impl WirelessManager {
    /// Populate the device list and select the initial current device: the
    /// first powered-on one, or the first in the list if none is powered.
    /// Fails when the backend call fails or reports no devices.
    pub async fn init(backend: WirelessBackend) -> WmResult<Self> {
        let devices = backend.devices().await?;
        if devices.is_empty() {
            return Err(WmError::NoDevices);
        }

        let current = devices.iter().position(Device::is_powered).unwrap_or(0);
        info!(device = %devices[current].name, "wireless manager initialized");

        Ok(Self {
            backend,
            devices,
            current,
            networks: Vec::new(),
            known_networks: Vec::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn backend_for_tests(&self) -> &WirelessBackend {
        &self.backend
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn known_networks(&self) -> &[Network] {
        &self.known_networks
    }

    /// The current device. Always a member of the device list; `init`
    /// guarantees the list is non-empty.
    pub fn current_device(&self) -> &Device {
        &self.devices[self.current]
    }

    /// Switch the current-device selection, matching by name. On failure the
    /// selection is left unchanged.
    pub fn set_current_device(&mut self, name: &str) -> WmResult<()> {
        match self.devices.iter().position(|d| d.name == name) {
            Some(idx) => {
                self.current = idx;
                Ok(())
            }
            None => Err(WmError::DeviceNotFound(name.to_string())),
        }
    }

    /// Power on the current device's adapter, then the device. Both must
    /// succeed; the in-memory `powered` field is then flipped without a
    /// device-list re-fetch.
    pub async fn activate_device(&mut self) -> WmResult<()> {
        let (adapter, name) = {
            let dev = self.current_device();
            (dev.adapter.clone(), dev.name.clone())
        };
        self.backend.power_on_adapter(&adapter).await?;
        self.backend.power_on_device(&name).await?;
        self.devices[self.current].powered = "on".to_string();
        Ok(())
    }

    /// Trigger a scan on the current device. No list is updated as a side
    /// effect; callers follow up with `update_networks` once the backend has
    /// had time to settle.
    pub async fn scan(&self) -> WmResult<()> {
        self.backend.scan(&self.current_device().name).await
    }

    /// Replace the visible-network list wholesale. On backend failure the
    /// prior list is left untouched — stale data beats an empty screen.
    pub async fn update_networks(&mut self) -> WmResult<()> {
        let networks = self.backend.networks(&self.current_device().name).await?;
        self.networks = networks;
        Ok(())
    }

    /// Join `network` on the current device. On success exactly the matching
    /// SSID is flagged connected and every other entry cleared; the backend
    /// is not re-queried. A bare-connect failure on a secured network is the
    /// caller's cue to prompt for credentials.
    pub async fn connect(&mut self, network: &Network, passphrase: Option<&str>) -> WmResult<()> {
        self.backend
            .connect(&self.current_device().name, &network.ssid, passphrase)
            .await?;

        for n in &mut self.networks {
            n.connected = n.ssid == network.ssid;
        }
        Ok(())
    }

    /// The 802.1x flow: provision the credential file (privileged write,
    /// daemon restart, settle delay), then connect without a passphrase —
    /// the credential file makes the non-interactive connect succeed.
    pub async fn connect_enterprise(
        &mut self,
        network: &Network,
        login: &EnterpriseLogin,
    ) -> WmResult<()> {
        self.backend.provision_enterprise(network, login).await?;
        self.connect(network, None).await
    }

    /// Disconnect the current device; on success no visible network remains
    /// flagged connected.
    pub async fn disconnect(&mut self) -> WmResult<()> {
        self.backend
            .disconnect(&self.current_device().name)
            .await?;

        for n in &mut self.networks {
            n.connected = false;
        }
        Ok(())
    }

    /// Replace the known-network list wholesale.
    pub async fn update_known_networks(&mut self) -> WmResult<()> {
        let known = self.backend.known_networks().await?;
        self.known_networks = known;
        Ok(())
    }

    /// Remove a persisted network. The match key is the SSID alone — the
    /// backend addresses known networks by name, so two entries sharing an
    /// SSID with different security classes would both be pruned here.
    pub async fn forget_known_network(&mut self, network: &Network) -> WmResult<()> {
        if let Err(e) = self.backend.forget(&network.ssid).await {
            warn!(ssid = %network.ssid, "forget failed: {e}");
            return Err(e);
        }
        self.known_networks.retain(|n| n.ssid != network.ssid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::backend::mock::MockBackend;
    use crate::network::types::Security;

    fn device(name: &str, powered: &str) -> Device {
        Device {
            name: name.into(),
            address: "aa:bb:cc:dd:ee:ff".into(),
            powered: powered.into(),
            adapter: "phy0".into(),
            mode: "station".into(),
        }
    }

    fn network(ssid: &str, security: Security, connected: bool) -> Network {
        Network {
            ssid: ssid.into(),
            security,
            connected,
        }
    }

    fn mock() -> MockBackend {
        MockBackend {
            device_list: vec![device("wlan0", "off"), device("wlan1", "on")],
            network_list: vec![
                network("alpha", Security::Psk, false),
                network("beta", Security::Open, true),
                network("gamma", Security::Eap8021x, false),
            ],
            known_list: vec![
                network("alpha", Security::Psk, false),
                network("old-net", Security::Psk, false),
            ],
            ..Default::default()
        }
    }

    async fn manager(backend: MockBackend) -> WirelessManager {
        WirelessManager::init(WirelessBackend::Mock(backend))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn init_prefers_first_powered_device() {
        let m = manager(mock()).await;
        assert_eq!(m.current_device().name, "wlan1");
    }

    #[tokio::test]
    async fn init_falls_back_to_first_device() {
        let mut b = mock();
        b.device_list = vec![device("wlan0", "off"), device("wlan1", "off")];
        let m = manager(b).await;
        assert_eq!(m.current_device().name, "wlan0");
    }

    #[tokio::test]
    async fn init_fails_on_empty_device_list() {
        let mut b = mock();
        b.device_list.clear();
        let err = WirelessManager::init(WirelessBackend::Mock(b))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, WmError::NoDevices));
    }

    #[tokio::test]
    async fn connect_flags_exactly_one_network() {
        let mut m = manager(mock()).await;
        m.update_networks().await.unwrap();

        let target = m.networks()[0].clone();
        m.connect(&target, Some("secret")).await.unwrap();

        let connected: Vec<_> = m.networks().iter().filter(|n| n.connected).collect();
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].ssid, "alpha");
    }

    #[tokio::test]
    async fn failed_connect_leaves_state_unchanged() {
        let mut m = manager(mock().failing("connect")).await;
        m.update_networks().await.unwrap();

        let target = m.networks()[0].clone();
        assert!(m.connect(&target, None).await.is_err());

        // "beta" was connected in the backend listing and stays that way
        assert!(m.networks()[1].connected);
        assert!(!m.networks()[0].connected);
    }

    #[tokio::test]
    async fn disconnect_clears_every_flag() {
        let mut m = manager(mock()).await;
        m.update_networks().await.unwrap();
        m.disconnect().await.unwrap();
        assert!(m.networks().iter().all(|n| !n.connected));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_list() {
        let mut m = manager(mock()).await;
        m.update_networks().await.unwrap();
        assert_eq!(m.networks().len(), 3);

        // Swap in a backend that fails listings; the stale list survives
        m.backend = WirelessBackend::Mock(mock().failing("networks"));
        assert!(m.update_networks().await.is_err());
        assert_eq!(m.networks().len(), 3);
    }

    #[tokio::test]
    async fn forget_prunes_by_ssid_only() {
        let mut m = manager(mock()).await;
        m.update_known_networks().await.unwrap();

        let target = m.known_networks()[0].clone();
        m.forget_known_network(&target).await.unwrap();
        assert_eq!(m.known_networks().len(), 1);
        assert_eq!(m.known_networks()[0].ssid, "old-net");

        // Second forget against a list already missing the entry: the
        // backend call decides, the list never gains duplicates
        let _ = m.forget_known_network(&target).await;
        assert_eq!(m.known_networks().len(), 1);
    }

    #[tokio::test]
    async fn failed_forget_keeps_known_list() {
        let mut m = manager(mock().failing("forget")).await;
        m.update_known_networks().await.unwrap();
        let target = m.known_networks()[0].clone();
        assert!(m.forget_known_network(&target).await.is_err());
        assert_eq!(m.known_networks().len(), 2);
    }

    #[tokio::test]
    async fn set_current_device_matches_by_name() {
        let mut m = manager(mock()).await;
        m.set_current_device("wlan0").unwrap();
        assert_eq!(m.current_device().name, "wlan0");

        assert!(m.set_current_device("wlan9").is_err());
        assert_eq!(m.current_device().name, "wlan0");
    }

    #[tokio::test]
    async fn activate_device_powers_adapter_then_device() {
        let mut b = mock();
        b.device_list = vec![device("wlan0", "off")];
        let mut m = manager(b).await;

        assert_eq!(m.current_device().powered, "off");
        m.activate_device().await.unwrap();
        assert_eq!(m.current_device().powered, "on");

        let WirelessBackend::Mock(mock) = &m.backend else {
            unreachable!()
        };
        let calls = mock.calls.borrow();
        let adapter_pos = calls
            .iter()
            .position(|c| c == "power_on_adapter phy0")
            .unwrap();
        let device_pos = calls
            .iter()
            .position(|c| c == "power_on_device wlan0")
            .unwrap();
        assert!(adapter_pos < device_pos);
        // No device-list re-fetch after activation
        assert_eq!(calls.iter().filter(|c| *c == "devices").count(), 1);
    }

    #[tokio::test]
    async fn activate_stops_when_adapter_power_fails() {
        let mut b = mock().failing("power_on_adapter");
        b.device_list = vec![device("wlan0", "off")];
        let mut m = manager(b).await;

        assert!(m.activate_device().await.is_err());
        assert_eq!(m.current_device().powered, "off");

        let WirelessBackend::Mock(mock) = &m.backend else {
            unreachable!()
        };
        assert!(!mock
            .calls
            .borrow()
            .iter()
            .any(|c| c.starts_with("power_on_device")));
    }

    #[tokio::test]
    async fn enterprise_connect_provisions_then_connects() {
        let mut m = manager(mock()).await;
        m.update_networks().await.unwrap();

        let target = m.networks()[2].clone();
        let login = EnterpriseLogin {
            username: "user".into(),
            password: "pw".into(),
            ..Default::default()
        };
        m.connect_enterprise(&target, &login).await.unwrap();

        assert!(m.networks()[2].connected);
        let WirelessBackend::Mock(mock) = &m.backend else {
            unreachable!()
        };
        let calls = mock.calls.borrow();
        let provision_pos = calls
            .iter()
            .position(|c| c.starts_with("provision_enterprise"))
            .unwrap();
        let connect_pos = calls
            .iter()
            .position(|c| c == "connect wlan1 gamma bare")
            .unwrap();
        assert!(provision_pos < connect_pos);
    }
}
