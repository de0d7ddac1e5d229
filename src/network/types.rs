use std::fmt;

/// Security class of a network, using the backend's own vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Security {
    Open,
    Psk,
    Eap8021x,
    Unknown(String),
}

impl Security {
    /// Parse the security column of a network listing. An empty field means
    /// an open network.
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "open" => Self::Open,
            "psk" => Self::Psk,
            "8021x" => Self::Eap8021x,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The backend's string for this class. Also used as the credential-file
    /// suffix, so it must round-trip with `parse`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Psk => "psk",
            Self::Eap8021x => "8021x",
            Self::Unknown(s) => s,
        }
    }

    pub fn needs_passphrase(&self) -> bool {
        !matches!(self, Self::Open)
    }

    pub fn is_enterprise(&self) -> bool {
        matches!(self, Self::Eap8021x)
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One wireless interface as reported by the backend.
///
/// `powered` is kept as the backend's own string ("on"/"off") rather than a
/// bool — the listing can carry other values and we echo them back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub address: String,
    pub powered: String,
    pub adapter: String,
    pub mode: String,
}

impl Device {
    pub fn is_powered(&self) -> bool {
        self.powered == "on"
    }
}

/// A visible or previously-joined SSID.
///
/// In the visible-network list at most one entry has `connected == true`;
/// entries in the known-network list never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub ssid: String,
    pub security: Security,
    pub connected: bool,
}

/// Credentials collected by the 802.1x login form.
///
/// `admin_password` is the local administrator password, relayed to the
/// privilege-escalation helper through the askpass hook; it is never part of
/// the credential file itself.
#[derive(Debug, Clone, Default)]
pub struct EnterpriseLogin {
    pub anonymous_identity: String,
    pub username: String,
    pub password: String,
    pub admin_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_round_trips_through_parse() {
        for s in ["psk", "8021x", "open"] {
            assert_eq!(Security::parse(s).as_str(), s);
        }
        assert_eq!(Security::parse(""), Security::Open);
        assert_eq!(Security::parse("wep").as_str(), "wep");
    }

    #[test]
    fn open_networks_need_no_passphrase() {
        assert!(!Security::Open.needs_passphrase());
        assert!(Security::Psk.needs_passphrase());
        assert!(Security::Eap8021x.needs_passphrase());
    }

    #[test]
    fn powered_is_a_verbatim_string() {
        let mut dev = Device {
            name: "wlan0".into(),
            address: "aa:bb:cc:dd:ee:ff".into(),
            powered: "off".into(),
            adapter: "phy0".into(),
            mode: "station".into(),
        };
        assert!(!dev.is_powered());
        dev.powered = "on".into();
        assert!(dev.is_powered());
    }
}
