use crate::application::desk::{PredictionDesk, ServiceStatus};
use crate::domain::types::{Decision, ModelId, PredictionResult};
use crate::interfaces::metrics_panel::metrics_panel;
use chrono::Utc;
use eframe::egui;

const PROBABILITY_LABELS: [&str; 3] = ["BUY", "HOLD", "SELL"];

fn decision_color(decision: Decision) -> egui::Color32 {
    match decision {
        Decision::Buy => egui::Color32::from_rgb(80, 200, 120),
        Decision::Hold => egui::Color32::from_rgb(255, 170, 60),
        Decision::Sell => egui::Color32::from_rgb(220, 60, 80),
    }
}

fn probability_cell(result: &PredictionResult, label: &str) -> String {
    result
        .probabilities
        .get(label)
        .map(|p| format!("{:.3}", p))
        .unwrap_or_else(|| "—".to_string())
}

impl eframe::App for PredictionDesk {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgb(10, 15, 20);
        visuals.panel_fill = egui::Color32::from_rgb(10, 15, 20);
        ctx.set_visuals(visuals);

        // Apply completions before drawing anything.
        self.pump();

        // --- Top status bar ---
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("📈 QuantDesk");
                ui.separator();
                ui.label(format!("Time (UTC): {}", Utc::now().format("%H:%M:%S")));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (text, color) = match self.service_status {
                        ServiceStatus::Connecting => {
                            ("● CONNECTING", egui::Color32::from_gray(160))
                        }
                        ServiceStatus::Online => ("● ONLINE", egui::Color32::GREEN),
                        ServiceStatus::Offline => ("● OFFLINE", egui::Color32::RED),
                    };
                    ui.label(egui::RichText::new(text).color(color).small());
                });
            });
        });

        // --- Left sidebar: activity feed ---
        egui::SidePanel::left("activity_panel")
            .default_width(320.0)
            .min_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Activity");
                ui.separator();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, true])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.activity {
                            let color = if line.contains("ERROR") {
                                egui::Color32::from_rgb(255, 80, 80)
                            } else if line.contains("WARN") {
                                egui::Color32::from_rgb(255, 255, 100)
                            } else {
                                egui::Color32::from_gray(180)
                            };
                            ui.label(egui::RichText::new(line).small().color(color));
                        }
                    });
            });

        // --- Central panel: decision desk ---
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Stock Decisions: Classical vs Quantum");
            ui.label("Select a ticker, date, and model to get a BUY / HOLD / SELL decision.");
            ui.add_space(10.0);

            if let Some(message) = self.tickers.error() {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 80, 80),
                    format!("Ticker directory unavailable: {}", message),
                );
                ui.add_space(5.0);
            }

            // Selection controls. The ticker list stays empty until the
            // directory load succeeds, which is the only guard against
            // selecting before then.
            let tickers: Vec<String> = self.tickers.data().cloned().unwrap_or_default();
            ui.horizontal(|ui| {
                egui::ComboBox::from_label("Ticker")
                    .selected_text(if self.selected_ticker.is_empty() {
                        "-- select --"
                    } else {
                        self.selected_ticker.as_str()
                    })
                    .show_ui(ui, |ui| {
                        for ticker in &tickers {
                            ui.selectable_value(
                                &mut self.selected_ticker,
                                ticker.clone(),
                                ticker,
                            );
                        }
                    });

                ui.separator();
                ui.label("Date:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.date_input)
                        .desired_width(100.0)
                        .hint_text("YYYY-MM-DD"),
                );
                ui.label(
                    egui::RichText::new("(trading day between 2015–2020)")
                        .small()
                        .color(egui::Color32::from_gray(140)),
                );

                ui.separator();
                egui::ComboBox::from_label("Model")
                    .selected_text(self.selected_model.label())
                    .show_ui(ui, |ui| {
                        for model in ModelId::ALL {
                            ui.selectable_value(&mut self.selected_model, model, model.label());
                        }
                    });
            });

            ui.add_space(8.0);

            let busy = self.prediction.busy();
            let button_text = if busy { "Predicting…" } else { "Get Decision" };
            if ui
                .add_enabled(!busy, egui::Button::new(button_text))
                .clicked()
            {
                self.predict();
            }

            if let Some(message) = self.prediction.error() {
                ui.add_space(5.0);
                ui.colored_label(egui::Color32::from_rgb(255, 80, 80), message);
            }

            if let Some(primary) = self.prediction.data().cloned() {
                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.heading("Decision:");
                    ui.heading(
                        egui::RichText::new(primary.decision.to_string())
                            .color(decision_color(primary.decision))
                            .strong(),
                    );
                });
                ui.label(format!(
                    "Ticker: {}  |  Date: {}  |  Model: {}",
                    primary.ticker,
                    primary.date,
                    primary.model_name.label()
                ));

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    for label in PROBABILITY_LABELS {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} {}",
                                label,
                                probability_cell(&primary, label)
                            ))
                            .monospace(),
                        );
                        ui.separator();
                    }
                });

                ui.add_space(10.0);
                self.comparison_section(ui, &primary);
            }

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(10.0);
            metrics_panel(ui, &self.metrics);
        });

        ctx.request_repaint();
    }
}

impl PredictionDesk {
    /// Compare-all controls and result grid, shown only under a primary
    /// result (a comparison session cannot exist without one).
    fn comparison_section(&mut self, ui: &mut egui::Ui, primary: &PredictionResult) {
        if self.comparing() {
            ui.horizontal(|ui| {
                if ui.button("Stop comparing").clicked() {
                    self.stop_comparing();
                    return;
                }
                if self.comparison.busy() {
                    ui.spinner();
                    ui.label("Fetching decisions from the other models…");
                }
            });
        } else if ui.button("Compare all models").clicked() {
            self.compare(&primary.ticker, &primary.date, primary.model_name);
        }

        if let Some(message) = self.comparison.error() {
            ui.add_space(5.0);
            ui.colored_label(egui::Color32::from_rgb(255, 80, 80), message);
        }

        if let Some(set) = self.comparison.data() {
            ui.add_space(10.0);
            egui::Grid::new("comparison_grid")
                .striped(true)
                .min_col_width(90.0)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("MODEL").strong());
                    ui.label(egui::RichText::new("DECISION").strong());
                    for label in PROBABILITY_LABELS {
                        ui.label(egui::RichText::new(label).strong());
                    }
                    ui.end_row();

                    for result in set {
                        ui.label(result.model_name.label());
                        ui.label(
                            egui::RichText::new(result.decision.to_string())
                                .color(decision_color(result.decision))
                                .strong(),
                        );
                        for label in PROBABILITY_LABELS {
                            ui.label(probability_cell(result, label));
                        }
                        ui.end_row();
                    }
                });
        }
    }
}
