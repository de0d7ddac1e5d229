//! The seam between the wireless manager and whatever daemon actually owns
//! the radio. One concrete driver exists today (iwd); dispatch is a tagged
//! union so a second daemon can be added without trait-object plumbing.

use crate::error::WmResult;
use crate::network::iwd::IwdBackend;
use crate::network::types::{Device, EnterpriseLogin, Network};

/// Which wireless daemon to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Iwd,
}

impl BackendKind {
    pub fn create(self) -> WirelessBackend {
        match self {
            Self::Iwd => WirelessBackend::Iwd(IwdBackend::new()),
        }
    }
}

/// A concrete backend driver.
#[derive(Debug)]
pub enum WirelessBackend {
    Iwd(IwdBackend),
    #[cfg(test)]
    Mock(mock::MockBackend),
}

impl WirelessBackend {
    pub async fn devices(&self) -> WmResult<Vec<Device>> {
        match self {
            Self::Iwd(b) => b.devices().await,
            #[cfg(test)]
            Self::Mock(b) => b.devices(),
        }
    }

    pub async fn networks(&self, device: &str) -> WmResult<Vec<Network>> {
        match self {
            Self::Iwd(b) => b.networks(device).await,
            #[cfg(test)]
            Self::Mock(b) => b.networks(device),
        }
    }

    pub async fn known_networks(&self) -> WmResult<Vec<Network>> {
        match self {
            Self::Iwd(b) => b.known_networks().await,
            #[cfg(test)]
            Self::Mock(b) => b.known_networks(),
        }
    }

    pub async fn scan(&self, device: &str) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.scan(device).await,
            #[cfg(test)]
            Self::Mock(b) => b.op("scan", device),
        }
    }

    pub async fn connect(
        &self,
        device: &str,
        ssid: &str,
        passphrase: Option<&str>,
    ) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.connect(device, ssid, passphrase).await,
            #[cfg(test)]
            Self::Mock(b) => b.connect(device, ssid, passphrase),
        }
    }

    pub async fn disconnect(&self, device: &str) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.disconnect(device).await,
            #[cfg(test)]
            Self::Mock(b) => b.op("disconnect", device),
        }
    }

    pub async fn forget(&self, ssid: &str) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.forget(ssid).await,
            #[cfg(test)]
            Self::Mock(b) => b.op("forget", ssid),
        }
    }

    pub async fn power_on_adapter(&self, adapter: &str) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.power_on_adapter(adapter).await,
            #[cfg(test)]
            Self::Mock(b) => b.op("power_on_adapter", adapter),
        }
    }

    pub async fn power_on_device(&self, device: &str) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.power_on_device(device).await,
            #[cfg(test)]
            Self::Mock(b) => b.op("power_on_device", device),
        }
    }

    pub async fn provision_enterprise(
        &self,
        network: &Network,
        login: &EnterpriseLogin,
    ) -> WmResult<()> {
        match self {
            Self::Iwd(b) => b.provision_enterprise(network, login).await,
            #[cfg(test)]
            Self::Mock(b) => b.op("provision_enterprise", &network.ssid),
        }
    }
}

#[cfg(test)]
pub mod mock {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use crate::error::{WmError, WmResult};
    use crate::network::types::{Device, Network};

    /// Scripted backend for manager tests. Listing results and per-operation
    /// failures are set up front; every invocation is recorded.
    #[derive(Debug, Default)]
    pub struct MockBackend {
        pub device_list: Vec<Device>,
        pub network_list: Vec<Network>,
        pub known_list: Vec<Network>,
        pub fail: HashSet<&'static str>,
        pub calls: RefCell<Vec<String>>,
    }

    impl MockBackend {
        pub fn failing(mut self, op: &'static str) -> Self {
            self.fail.insert(op);
            self
        }

        fn record(&self, what: String) {
            self.calls.borrow_mut().push(what);
        }

        fn check(&self, op: &'static str) -> WmResult<()> {
            if self.fail.contains(op) {
                Err(WmError::Backend(format!("mock {op} failure")))
            } else {
                Ok(())
            }
        }

        pub fn devices(&self) -> WmResult<Vec<Device>> {
            self.record("devices".into());
            self.check("devices")?;
            Ok(self.device_list.clone())
        }

        pub fn networks(&self, device: &str) -> WmResult<Vec<Network>> {
            self.record(format!("networks {device}"));
            self.check("networks")?;
            Ok(self.network_list.clone())
        }

        pub fn known_networks(&self) -> WmResult<Vec<Network>> {
            self.record("known_networks".into());
            self.check("known_networks")?;
            Ok(self.known_list.clone())
        }

        pub fn connect(&self, device: &str, ssid: &str, passphrase: Option<&str>) -> WmResult<()> {
            self.record(format!(
                "connect {device} {ssid} {}",
                if passphrase.is_some() { "with-passphrase" } else { "bare" }
            ));
            self.check("connect")
        }

        pub fn op(&self, name: &'static str, arg: &str) -> WmResult<()> {
            self.record(format!("{name} {arg}"));
            self.check(name)
        }
    }
}
