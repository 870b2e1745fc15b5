mod state;

pub use state::PanelState;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily, FontId, TextStyle};
use log::debug;
use std::sync::Arc;

use crate::command::CommandExecutor;
use crate::config::PanelConfig;
use crate::error::PanelResult;
use crate::network::{self, NetworkFetcher};
use crate::vpn;

pub struct CyberPanelApp {
    state: PanelState,
}

impl CyberPanelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: PanelConfig) -> PanelResult<Self> {
        Self::setup_fonts(&cc.egui_ctx, config.monospace_size);

        // All blocking work goes through this runtime from the UI thread.
        let runtime = Arc::new(
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?,
        );

        let echo = network::default_echo(runtime.clone(), &config.ip_echo_url, config.http_timeout());
        let fetcher = NetworkFetcher::new(runtime.clone(), config.resolve_timeout(), echo);
        let executor = CommandExecutor::new(runtime);

        let state = PanelState::new(executor, fetcher, vpn::default_servers(), config.command_timeout());
        Ok(Self { state })
    }

    fn setup_fonts(ctx: &egui::Context, size: f32) {
        let mut fonts = FontDefinitions::default();

        let font_paths = [
            "C:\\Windows\\Fonts\\consola.ttf",
            "/usr/share/fonts/truetype/firacode/FiraCode-Regular.ttf",
            "/usr/share/fonts/TTF/FiraCode-Regular.ttf",
            "/System/Library/Fonts/Menlo.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        ];

        for path in font_paths {
            if let Ok(font_data) = std::fs::read(path) {
                fonts
                    .font_data
                    .insert("system_mono".to_owned(), FontData::from_owned(font_data).into());
                fonts
                    .families
                    .entry(FontFamily::Monospace)
                    .or_default()
                    .insert(0, "system_mono".to_owned());
                ctx.set_fonts(fonts);
                debug!("Monospace font: {}", path);
                break;
            }
        }

        // egui's bundled monospace font is the fallback
        ctx.style_mut(|style| {
            style
                .text_styles
                .insert(TextStyle::Monospace, FontId::new(size, FontFamily::Monospace));
        });
    }
}

impl eframe::App for CyberPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_command_runner(ui);
                ui.add_space(10.0);
                self.render_network_info(ui);
                ui.add_space(10.0);
                self.render_vpn(ui);
            });
        });
    }
}

impl CyberPanelApp {
    fn render_command_runner(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("💻 Command Runner");
            ui.separator();

            // Taken before the text edit sees it, otherwise it becomes a newline.
            let run_shortcut =
                ui.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter));

            ui.add(
                egui::TextEdit::multiline(&mut self.state.command_input)
                    .font(TextStyle::Monospace)
                    .hint_text("Type a command, e.g. echo Hello or ipconfig")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            egui::ScrollArea::vertical()
                .id_salt("command_output")
                .max_height(220.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.state.log())
                            .font(TextStyle::Monospace)
                            .desired_rows(10)
                            .desired_width(f32::INFINITY),
                    );
                });

            if ui.button("Run Command").clicked() || run_shortcut {
                self.state.run_command();
            }
        });
    }

    fn render_network_info(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("🌐 Network Info");
            ui.separator();

            let info = self.state.network();
            egui::Grid::new("network_info")
                .num_columns(2)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Local IP:");
                    ui.add(
                        egui::TextEdit::singleline(&mut info.local_address.as_str())
                            .font(TextStyle::Monospace)
                            .desired_width(240.0),
                    );
                    ui.end_row();

                    ui.label("Public IP:");
                    ui.add(
                        egui::TextEdit::singleline(&mut info.public_address.as_str())
                            .font(TextStyle::Monospace)
                            .desired_width(240.0),
                    );
                    ui.end_row();
                });

            if ui.button("Refresh IP Info").clicked() {
                self.state.refresh_network();
            }
        });
    }

    fn render_vpn(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("🔒 VPN Connect");
            ui.separator();

            let mut clicked: Option<usize> = None;
            let selected = self.state.vpn().selected();
            for (i, server) in self.state.vpn().servers().iter().enumerate() {
                if ui.selectable_label(selected == Some(i), server.label()).clicked() {
                    clicked = Some(i);
                }
            }
            if let Some(i) = clicked {
                self.state.select_server(i);
            }

            if ui.button("Connect").clicked() {
                self.state.connect();
            }

            ui.label(self.state.status().to_string());
        });
    }
}
