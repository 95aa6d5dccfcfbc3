//! Component palette: catalog grouped by category, with a search filter.

use egui::{RichText, Ui};

use crate::catalog::ComponentLibrary;
use crate::frontend::state::AppAction;

/// Payload carried by a palette drag.
#[derive(Debug, Clone)]
pub struct PaletteDrag(pub String);

#[derive(Debug, Default)]
pub struct PaletteState {
    pub filter: String,
}

pub fn render_palette(ui: &mut Ui, state: &mut PaletteState, library: &ComponentLibrary) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.heading("Components");
    ui.horizontal(|ui| {
        ui.label("🔍");
        ui.add(
            egui::TextEdit::singleline(&mut state.filter)
                .hint_text("Search components")
                .desired_width(f32::INFINITY),
        );
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if state.filter.trim().is_empty() {
                for (category, components) in library.by_category() {
                    egui::CollapsingHeader::new(RichText::new(category).strong())
                        .default_open(true)
                        .show(ui, |ui| {
                            for component in components {
                                palette_item(ui, component, &mut actions);
                            }
                        });
                }
            } else {
                let matches = library.search(&state.filter);
                if matches.is_empty() {
                    ui.weak("No components match");
                }
                for component in matches {
                    palette_item(ui, component, &mut actions);
                }
            }
        });

    actions
}

fn palette_item(ui: &mut Ui, component: &crate::catalog::Component, actions: &mut Vec<AppAction>) {
    let id = egui::Id::new(("palette", &component.id));
    ui.horizontal(|ui| {
        if ui
            .small_button("+")
            .on_hover_text("Add to canvas")
            .clicked()
        {
            actions.push(AppAction::AddComponent(component.id.clone()));
        }

        let response = ui
            .dnd_drag_source(id, PaletteDrag(component.id.clone()), |ui| {
                ui.label(format!("{} {}", component.icon, component.name));
            })
            .response;
        if !component.description.is_empty() {
            response.on_hover_text(&component.description);
        }
    });
}
