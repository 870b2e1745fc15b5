use std::time::Duration;

use log::info;

use crate::clock;
use crate::command::CommandExecutor;
use crate::network::{NetworkFetcher, NetworkInfo};
use crate::vpn::{ConnectionStatus, VpnSelector, VpnServerEntry};

/// Everything the window shows, plus the actions its buttons trigger.
///
/// Every action runs inline on the caller's thread and returns once the
/// underlying operation finishes or times out.
pub struct PanelState {
    pub command_input: String,
    log: String,
    network: NetworkInfo,
    vpn: VpnSelector,
    executor: CommandExecutor,
    fetcher: NetworkFetcher,
    command_timeout: Duration,
}

impl PanelState {
    /// Does one network refresh before returning.
    pub fn new(
        executor: CommandExecutor,
        fetcher: NetworkFetcher,
        servers: Vec<VpnServerEntry>,
        command_timeout: Duration,
    ) -> Self {
        let network = fetcher.refresh();
        Self {
            command_input: String::new(),
            log: String::new(),
            network,
            vpn: VpnSelector::new(servers),
            executor,
            fetcher,
            command_timeout,
        }
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn network(&self) -> &NetworkInfo {
        &self.network
    }

    pub fn vpn(&self) -> &VpnSelector {
        &self.vpn
    }

    pub fn status(&self) -> &ConnectionStatus {
        self.vpn.status()
    }

    pub fn select_server(&mut self, index: usize) {
        self.vpn.select(index);
    }

    pub fn run_command(&mut self) {
        let Some(result) = self.executor.execute(&self.command_input, self.command_timeout) else {
            return;
        };
        for line in result.log_lines() {
            self.push_line(&line);
        }
    }

    pub fn refresh_network(&mut self) {
        self.network = self.fetcher.refresh();
    }

    pub fn connect(&mut self) {
        if let ConnectionStatus::Connected(entry) = self.vpn.connect() {
            let label = entry.label();
            info!("Cosmetic connect to {}", label);
            self.push_line(&format!("[{}] Connected to {}", clock::timestamp(), label));
        }
    }

    fn push_line(&mut self, line: &str) {
        if !self.log.is_empty() {
            self.log.push('\n');
        }
        self.log.push_str(line);
    }
}
