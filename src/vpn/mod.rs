//! Server picker for the "VPN Connect" section.
//!
//! This is a label only. Connecting opens no tunnel, performs no handshake,
//! exchanges no credentials and contacts no server: it changes the status
//! text and nothing else.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpnServerEntry {
    /// Two-letter region code, e.g. "FR".
    pub code: String,
    pub display_name: String,
}

impl VpnServerEntry {
    pub fn new(code: &str, display_name: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
        }
    }

    /// List label, e.g. "FR — France".
    pub fn label(&self) -> String {
        format!("{} — {}", self.code, self.display_name)
    }
}

/// The fixed server list, in display order.
pub fn default_servers() -> Vec<VpnServerEntry> {
    vec![
        VpnServerEntry::new("UK", "United Kingdom"),
        VpnServerEntry::new("FR", "France"),
        VpnServerEntry::new("DE", "Germany"),
        VpnServerEntry::new("BE", "Belgium"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    NotConnected,
    Connected(VpnServerEntry),
    NoSelection,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::NotConnected => write!(f, "Status: Not connected"),
            ConnectionStatus::Connected(entry) => write!(f, "Status: Connected to {}", entry.label()),
            ConnectionStatus::NoSelection => write!(f, "Status: choose a server first"),
        }
    }
}

/// Status transition for a press of "Connect". Cannot fail.
pub fn connect(selected: Option<&VpnServerEntry>) -> ConnectionStatus {
    match selected {
        Some(entry) => ConnectionStatus::Connected(entry.clone()),
        None => ConnectionStatus::NoSelection,
    }
}

#[derive(Debug, Clone)]
pub struct VpnSelector {
    servers: Vec<VpnServerEntry>,
    selected: Option<usize>,
    status: ConnectionStatus,
}

impl VpnSelector {
    pub fn new(servers: Vec<VpnServerEntry>) -> Self {
        Self {
            servers,
            selected: None,
            status: ConnectionStatus::NotConnected,
        }
    }

    pub fn servers(&self) -> &[VpnServerEntry] {
        &self.servers
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&VpnServerEntry> {
        self.selected.and_then(|i| self.servers.get(i))
    }

    /// Out-of-range indices leave the selection untouched.
    pub fn select(&mut self, index: usize) {
        if index < self.servers.len() {
            self.selected = Some(index);
        }
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn connect(&mut self) -> &ConnectionStatus {
        self.status = connect(self.selected_entry());
        &self.status
    }
}

impl Default for VpnSelector {
    fn default() -> Self {
        Self::new(default_servers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_servers_order() {
        let labels: Vec<String> = default_servers().iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "UK — United Kingdom",
                "FR — France",
                "DE — Germany",
                "BE — Belgium"
            ]
        );
    }

    #[test]
    fn test_initial_status() {
        let selector = VpnSelector::default();
        assert_eq!(selector.status(), &ConnectionStatus::NotConnected);
        assert_eq!(selector.status().to_string(), "Status: Not connected");
    }

    #[test]
    fn test_connect_without_selection() {
        let mut selector = VpnSelector::default();
        assert_eq!(selector.connect(), &ConnectionStatus::NoSelection);
        assert_eq!(selector.status().to_string(), "Status: choose a server first");
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut selector = VpnSelector::default();
        selector.select(1);
        let first = selector.connect().clone();
        let second = selector.connect().clone();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "Status: Connected to FR — France");
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut selector = VpnSelector::default();
        selector.select(2);
        selector.select(99);
        assert_eq!(selector.selected(), Some(2));
        assert_eq!(selector.selected_entry().unwrap().code, "DE");
    }

    #[test]
    fn test_pure_connect() {
        let be = VpnServerEntry::new("BE", "Belgium");
        assert_eq!(connect(Some(&be)), ConnectionStatus::Connected(be.clone()));
        assert_eq!(connect(None), ConnectionStatus::NoSelection);
    }
}
