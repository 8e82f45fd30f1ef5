use crate::application::operation::OperationState;
use crate::domain::types::ModelMetric;
use eframe::egui;

fn optional_cell(value: Option<String>) -> String {
    value.unwrap_or_else(|| "—".to_string())
}

/// Offline evaluation table. An empty metrics list is a valid state and gets
/// its own message rather than a blank table.
pub fn metrics_panel(ui: &mut egui::Ui, metrics: &OperationState<Vec<ModelMetric>>) {
    ui.heading("Model Performance & Quantum Metadata");
    ui.add_space(5.0);

    match metrics {
        OperationState::Idle | OperationState::Pending => {
            ui.label("Loading model metrics…");
        }
        OperationState::Failed(message) => {
            ui.colored_label(
                egui::Color32::from_rgb(255, 80, 80),
                format!("Error loading model metrics: {}", message),
            );
        }
        OperationState::Resolved(rows) if rows.is_empty() => {
            ui.label("No metrics found. Has the offline evaluation been run yet?");
        }
        OperationState::Resolved(rows) => {
            egui::Grid::new("metrics_grid")
                .striped(true)
                .min_col_width(80.0)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("MODEL").strong());
                    ui.label(egui::RichText::new("TYPE").strong());
                    ui.label(egui::RichText::new("ACC VS TRUE").strong());
                    ui.label(egui::RichText::new("AGREE W/ RF").strong());
                    ui.label(egui::RichText::new("TRAIN TIME (S)").strong());
                    ui.label(egui::RichText::new("LOGICAL DEPTH").strong());
                    ui.label(egui::RichText::new("SHOTS").strong());
                    ui.end_row();

                    for metric in rows {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(&metric.name).strong());
                            if metric.is_baseline {
                                ui.label(
                                    egui::RichText::new("baseline")
                                        .small()
                                        .color(egui::Color32::GOLD),
                                );
                            }
                        });
                        ui.label(metric.kind.to_string());
                        ui.label(format!("{:.3}", metric.accuracy_vs_true));
                        ui.label(format!("{:.3}", metric.agreement_with_rf));
                        ui.label(optional_cell(
                            metric.training_time_seconds.map(|t| format!("{:.3}", t)),
                        ));
                        ui.label(optional_cell(metric.logical_depth.map(|d| d.to_string())));
                        ui.label(optional_cell(
                            metric.anticipated_shots.map(|s| s.to_string()),
                        ));
                        ui.end_row();
                    }
                });

            ui.add_space(5.0);
            ui.label(
                egui::RichText::new(
                    "* Agreement with RF uses Random Forest as the baseline model.",
                )
                .small()
                .color(egui::Color32::from_gray(140)),
            );
        }
    }
}
