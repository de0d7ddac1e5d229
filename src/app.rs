use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::network::types::{EnterpriseLogin, Network, Security};
use crate::network::WirelessManager;
use crate::ui::theme::Theme;

/// Visible-network list refresh cadence.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

/// Full rescan cadence.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Status message lifetime in ticks (~3 s at a 250 ms tick).
const STATUS_TICKS: u8 = 12;

// ── Modal state ───────────────────────────────────────────────────────

/// Passphrase prompt for a secured network. Holds owned copies of the
/// network's key fields — never a reference into the manager's lists, which
/// the next refresh would invalidate.
#[derive(Debug, Clone)]
pub struct PasswordPrompt {
    pub ssid: String,
    pub security: Security,
    pub input: String,
    pub hide: bool,
}

impl PasswordPrompt {
    fn for_network(network: &Network) -> Self {
        Self {
            ssid: network.ssid.clone(),
            security: network.security.clone(),
            input: String::new(),
            hide: true,
        }
    }
}

/// 802.1x login form: anonymous identity, username, password, and the local
/// admin password for the privileged credential write.
#[derive(Debug, Clone)]
pub struct EnterpriseForm {
    pub ssid: String,
    pub security: Security,
    pub fields: [String; 4],
    pub focus: usize,
    pub hide: bool,
}

impl EnterpriseForm {
    pub const LABELS: [&'static str; 4] =
        ["Anonymous identity", "Username", "Password", "Admin password"];

    fn for_network(network: &Network) -> Self {
        Self {
            ssid: network.ssid.clone(),
            security: network.security.clone(),
            fields: Default::default(),
            focus: 0,
            hide: true,
        }
    }

    /// Password and admin-password fields are masked while `hide` is on.
    pub fn is_masked(&self, idx: usize) -> bool {
        self.hide && idx >= 2
    }

    fn login(&self) -> EnterpriseLogin {
        EnterpriseLogin {
            anonymous_identity: self.fields[0].clone(),
            username: self.fields[1].clone(),
            password: self.fields[2].clone(),
            admin_password: self.fields[3].clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    /// Known-networks popup is open
    Known,
    Password(PasswordPrompt),
    Enterprise(EnterpriseForm),
}

#[derive(Debug, Clone)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

// ── Application state ─────────────────────────────────────────────────

pub struct App {
    pub manager: WirelessManager,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,

    /// Selection into the visible-network list
    pub selected: usize,
    /// Selection into the known-networks popup
    pub known_selected: usize,

    pub status: Option<Status>,
    status_ticks: u8,

    last_refresh: Instant,
    last_scan: Instant,
}

impl App {
    pub fn new(manager: WirelessManager, theme: Theme) -> Self {
        Self {
            manager,
            theme,
            mode: Mode::Normal,
            should_quit: false,
            selected: 0,
            known_selected: 0,
            status: None,
            status_ticks: 0,
            last_refresh: Instant::now(),
            last_scan: Instant::now(),
        }
    }

    /// A credential prompt is open; automatic polling is suspended so a
    /// list refresh cannot pull state out from under the prompt.
    pub fn prompt_open(&self) -> bool {
        matches!(self.mode, Mode::Password(_) | Mode::Enterprise(_))
    }

    // ── Polling ───────────────────────────────────────────────────────

    /// Timed polling, driven by render ticks: rescan every 10 s, refresh
    /// the network list every 2 s. Both are gated on the current device
    /// being powered on and on no credential prompt being open.
    pub async fn on_tick(&mut self) {
        self.tick_status();

        if self.prompt_open() || !self.manager.current_device().is_powered() {
            return;
        }

        if self.last_scan.elapsed() >= SCAN_INTERVAL {
            self.last_scan = Instant::now();
            if let Err(e) = self.manager.scan().await {
                warn!("scan failed: {e}");
            }
        }

        if self.last_refresh.elapsed() >= REFRESH_INTERVAL {
            self.last_refresh = Instant::now();
            if let Err(e) = self.manager.update_networks().await {
                warn!("network refresh failed: {e}");
            }
            self.clamp_selection();
        }
    }

    // ── Key handling ──────────────────────────────────────────────────

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode.clone() {
            Mode::Normal => self.handle_normal_key(key).await,
            Mode::Known => self.handle_known_key(key).await,
            Mode::Password(prompt) => self.handle_password_key(key, prompt).await,
            Mode::Enterprise(form) => self.handle_enterprise_key(key, form).await,
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        let count = self.manager.networks().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 && self.selected < count - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Tab => self.cycle_device(),
            KeyCode::Enter => self.connect_selected().await,
            KeyCode::Char('d') => {
                if let Err(e) = self.manager.disconnect().await {
                    self.show_status(format!("Disconnect failed: {e}"), true);
                }
            }
            KeyCode::Char('s') => {
                self.last_scan = Instant::now();
                match self.manager.scan().await {
                    Ok(()) => self.show_status("Scanning…", false),
                    Err(e) => self.show_status(format!("Scan failed: {e}"), true),
                }
            }
            KeyCode::Char('r') => {
                if let Err(e) = self.manager.update_networks().await {
                    self.show_status(format!("Refresh failed: {e}"), true);
                }
                self.clamp_selection();
            }
            KeyCode::Char('a') => match self.manager.activate_device().await {
                Ok(()) => self.show_status("Device powered on", false),
                Err(e) => self.show_status(format!("Power-on failed: {e}"), true),
            },
            KeyCode::Char('n') => {
                match self.manager.update_known_networks().await {
                    Ok(()) => {
                        self.known_selected = 0;
                        self.mode = Mode::Known;
                    }
                    Err(e) => self.show_status(format!("Known networks: {e}"), true),
                }
            }
            _ => {}
        }
    }

    async fn handle_known_key(&mut self, key: KeyEvent) {
        let count = self.manager.known_networks().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('n') => self.mode = Mode::Normal,
            KeyCode::Up | KeyCode::Char('k') => {
                self.known_selected = self.known_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 && self.known_selected < count - 1 {
                    self.known_selected += 1;
                }
            }
            KeyCode::Char('f') | KeyCode::Delete => {
                let Some(known) = self
                    .manager
                    .known_networks()
                    .get(self.known_selected)
                    .cloned()
                else {
                    return;
                };
                match self.manager.forget_known_network(&known).await {
                    Ok(()) => self.show_status(format!("Forgot \"{}\"", known.ssid), false),
                    Err(e) => self.show_status(format!("Forget failed: {e}"), true),
                }
                let count = self.manager.known_networks().len();
                if count > 0 && self.known_selected >= count {
                    self.known_selected = count - 1;
                }
            }
            _ => {}
        }
    }

    async fn handle_password_key(&mut self, key: KeyEvent, mut prompt: PasswordPrompt) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return;
            }
            KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.hide = !prompt.hide;
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            KeyCode::Enter => {
                if prompt.input.is_empty() {
                    self.mode = Mode::Password(prompt);
                    return;
                }
                // Re-look-up by SSID: the list may have been replaced since
                // the prompt opened
                let Some(network) = self.find_visible(&prompt.ssid) else {
                    self.show_status(
                        format!("\"{}\" is no longer visible", prompt.ssid),
                        true,
                    );
                    self.mode = Mode::Normal;
                    return;
                };
                match self
                    .manager
                    .connect(&network, Some(prompt.input.as_str()))
                    .await
                {
                    Ok(()) => {
                        self.show_status(format!("Connected to \"{}\"", network.ssid), false);
                        self.mode = Mode::Normal;
                        return;
                    }
                    Err(_) => {
                        self.show_status("Wrong passphrase?", true);
                        prompt.input.clear();
                    }
                }
            }
            _ => {}
        }
        self.mode = Mode::Password(prompt);
    }

    async fn handle_enterprise_key(&mut self, key: KeyEvent, mut form: EnterpriseForm) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return;
            }
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % form.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + form.fields.len() - 1) % form.fields.len();
            }
            KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.hide = !form.hide;
            }
            KeyCode::Backspace => {
                form.fields[form.focus].pop();
            }
            KeyCode::Char(c) => form.fields[form.focus].push(c),
            KeyCode::Enter => {
                let Some(network) = self.find_visible(&form.ssid) else {
                    self.show_status(format!("\"{}\" is no longer visible", form.ssid), true);
                    self.mode = Mode::Normal;
                    return;
                };
                match self
                    .manager
                    .connect_enterprise(&network, &form.login())
                    .await
                {
                    Ok(()) => {
                        self.show_status(format!("Connected to \"{}\"", network.ssid), false);
                        self.mode = Mode::Normal;
                        return;
                    }
                    Err(e) => {
                        self.show_status(format!("Login failed: {e}"), true);
                        form.fields[2].clear();
                        form.fields[3].clear();
                    }
                }
            }
            _ => {}
        }
        self.mode = Mode::Enterprise(form);
    }

    // ── Actions ───────────────────────────────────────────────────────

    async fn connect_selected(&mut self) {
        let Some(network) = self.manager.networks().get(self.selected).cloned() else {
            return;
        };

        if network.connected {
            if let Err(e) = self.manager.disconnect().await {
                self.show_status(format!("Disconnect failed: {e}"), true);
            }
            return;
        }

        // Bare connect first: known and open networks succeed without
        // credentials. A failure on a secured network means "prompt".
        match self.manager.connect(&network, None).await {
            Ok(()) => self.show_status(format!("Connected to \"{}\"", network.ssid), false),
            Err(e) => {
                if network.security.is_enterprise() {
                    self.mode = Mode::Enterprise(EnterpriseForm::for_network(&network));
                } else if network.security.needs_passphrase() {
                    self.mode = Mode::Password(PasswordPrompt::for_network(&network));
                } else {
                    self.show_status(format!("Connect failed: {e}"), true);
                }
            }
        }
    }

    fn cycle_device(&mut self) {
        let devices = self.manager.devices();
        if devices.len() < 2 {
            return;
        }
        let current = self.manager.current_device().name.clone();
        let idx = devices.iter().position(|d| d.name == current).unwrap_or(0);
        let next = devices[(idx + 1) % devices.len()].name.clone();
        if self.manager.set_current_device(&next).is_ok() {
            self.show_status(format!("Device: {next}"), false);
        }
    }

    fn find_visible(&self, ssid: &str) -> Option<Network> {
        self.manager
            .networks()
            .iter()
            .find(|n| n.ssid == ssid)
            .cloned()
    }

    fn clamp_selection(&mut self) {
        let count = self.manager.networks().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    // ── Status line ───────────────────────────────────────────────────

    pub fn show_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status = Some(Status {
            message: message.into(),
            is_error,
        });
        self.status_ticks = STATUS_TICKS;
    }

    fn tick_status(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status = None;
            }
        }
    }
}
