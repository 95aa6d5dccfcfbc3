//! Right-hand property panel for the selected node.

use std::collections::HashMap;

use egui::{Color32, RichText, Ui};

use crate::catalog::ParamKind;
use crate::frontend::state::AppAction;
use crate::graph::{NodeId, ParamValue};
use crate::properties::{PropertyField, PropertyForm};

/// Text buffers of the fields being edited, keyed by parameter name.
#[derive(Debug, Default)]
pub struct PropertiesPanelState {
    node: Option<NodeId>,
    drafts: HashMap<String, String>,
    errors: HashMap<String, String>,
}

impl PropertiesPanelState {
    fn sync(&mut self, form: &PropertyForm) {
        if self.node.as_ref() != Some(&form.node_id) {
            self.node = Some(form.node_id.clone());
            self.drafts.clear();
            self.errors.clear();
        }
    }
}

pub fn render_properties(
    ui: &mut Ui,
    state: &mut PropertiesPanelState,
    form: &PropertyForm,
) -> Vec<AppAction> {
    let mut actions = Vec::new();
    state.sync(form);

    ui.heading("Properties");
    ui.separator();

    egui::Grid::new("node_info")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Name");
            ui.label(RichText::new(&form.node_label).strong());
            ui.end_row();
            ui.label("Type");
            ui.label(&form.component_name);
            ui.end_row();
            ui.label("ID");
            ui.label(RichText::new(form.node_id.as_str()).monospace().weak());
            ui.end_row();
        });

    if let Some(message) = &form.message {
        ui.add_space(8.0);
        ui.colored_label(Color32::from_rgb(220, 80, 80), message);
        return actions;
    }

    ui.add_space(8.0);
    ui.label(RichText::new("Parameters").strong());

    if form.fields.is_empty() {
        ui.weak("No configurable parameters");
    }

    egui::ScrollArea::vertical()
        .id_salt("property_fields")
        .show(ui, |ui| {
            for field in &form.fields {
                render_field(ui, state, form, field, &mut actions);
                ui.add_space(4.0);
            }

            if form.inputs_summary().is_some() || form.outputs_summary().is_some() {
                ui.separator();
                ui.label(RichText::new("Connections").strong());
                if let Some(inputs) = form.inputs_summary() {
                    ui.label(format!("Inputs: {inputs}"));
                }
                if let Some(outputs) = form.outputs_summary() {
                    ui.label(format!("Outputs: {outputs}"));
                }
            }

            ui.add_space(12.0);
            if ui
                .button(RichText::new("🗑 Delete node").color(Color32::from_rgb(220, 80, 80)))
                .clicked()
            {
                actions.push(AppAction::DeleteNode(form.node_id.clone()));
            }
        });

    actions
}

fn render_field(
    ui: &mut Ui,
    state: &mut PropertiesPanelState,
    form: &PropertyForm,
    field: &PropertyField,
    actions: &mut Vec<AppAction>,
) {
    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    };
    let response = ui.label(label);
    if !field.description.is_empty() {
        response.on_hover_text(&field.description);
    }

    let mut set = |value: ParamValue| {
        actions.push(AppAction::SetParameter {
            node: form.node_id.clone(),
            name: field.name.clone(),
            value,
        })
    };

    match field.kind {
        ParamKind::Boolean => {
            let mut checked = field.checked();
            if ui.checkbox(&mut checked, "").changed() {
                set(ParamValue::Bool(checked));
            }
        }
        ParamKind::Select if !field.options.is_empty() => {
            let current = field.display_value();
            egui::ComboBox::from_id_salt(("param", &field.name))
                .selected_text(&current)
                .show_ui(ui, |ui| {
                    for option in &field.options {
                        if ui.selectable_label(*option == current, option).clicked() {
                            set(ParamValue::Text(option.clone()));
                        }
                    }
                });
        }
        _ => {
            let draft = state
                .drafts
                .entry(field.name.clone())
                .or_insert_with(|| field.display_value());
            let response = ui.add(egui::TextEdit::singleline(draft).desired_width(f32::INFINITY));

            if response.lost_focus() {
                match form.parse_field(&field.name, draft) {
                    Ok(value) => {
                        state.errors.remove(&field.name);
                        if value != field.value {
                            set(value);
                        }
                    }
                    Err(e) => {
                        state.errors.insert(field.name.clone(), e.to_string());
                    }
                }
            } else if !response.has_focus() && state.errors.get(&field.name).is_none() {
                // follow external changes such as undo
                *draft = field.display_value();
            }

            if field.kind.is_numeric() {
                if let (Some(min), Some(max)) = (field.min, field.max) {
                    ui.weak(format!("Range: {min} – {max}"));
                }
            }
        }
    }

    if let Some(error) = state.errors.get(&field.name) {
        ui.colored_label(Color32::from_rgb(220, 80, 80), error);
    }
}
