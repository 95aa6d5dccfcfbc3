//! Node canvas: paints the session's scene and feeds pointer input back.
//!
//! All geometry comes from the [`SceneBuffer`] in canvas units; this module
//! only maps it through the view transform into the allocated rect.

use egui::{Color32, Pos2, Rect, Stroke, Ui};

use crate::canvas::{
    CanvasSession, EdgePath, Point, PointerButton, SceneBuffer, Transform, Viewport,
};
use crate::frontend::palette::PaletteDrag;
use crate::frontend::state::AppAction;

const EDGE_SEGMENTS: usize = 32;

/// Frame-to-frame input state of the canvas widget.
#[derive(Debug, Default)]
pub struct CanvasViewState {
    /// Pointer was over the canvas last frame
    hovered: bool,
}

pub fn render_canvas(
    ui: &mut Ui,
    state: &mut CanvasViewState,
    session: &mut CanvasSession<SceneBuffer>,
) -> Vec<AppAction> {
    let mut actions = Vec::new();

    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
    let canvas_rect = response.rect;
    session.set_viewport(Viewport::new(
        canvas_rect.width() as f64,
        canvas_rect.height() as f64,
    ));

    let local = |p: Pos2| Point::new((p.x - canvas_rect.min.x) as f64, (p.y - canvas_rect.min.y) as f64);

    // ==================== Input ====================

    if response.drag_started_by(egui::PointerButton::Primary) {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            session.pointer_down(local(origin), PointerButton::Primary);
        }
    }
    if response.dragged_by(egui::PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            session.pointer_move(local(pos));
        }
    }
    if response.drag_stopped_by(egui::PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            session.pointer_up(local(pos));
        }
    }
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let p = local(pos);
            session.pointer_down(p, PointerButton::Primary);
            session.pointer_up(p);
            session.click(p);
        }
    }

    let pointer = ui.input(|i| i.pointer.hover_pos());
    let inside = pointer.is_some_and(|p| canvas_rect.contains(p));
    if state.hovered && !inside {
        session.pointer_leave();
    }
    state.hovered = inside;

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(p) = pointer {
                // egui scrolls positive upwards; the session expects wheel-down positive
                session.wheel(local(p), -scroll as f64);
            }
        }
    }

    if let Some(payload) = response.dnd_release_payload::<PaletteDrag>() {
        if let Some(p) = pointer {
            actions.push(AppAction::DropComponent {
                component_id: payload.0.clone(),
                at: local(p),
            });
        }
    }

    // ==================== Painting ====================

    painter.rect_filled(canvas_rect, 0.0, Color32::from_gray(30));

    let buffer = session.target();
    let transform = buffer.transform;
    let zoom = transform.scale as f32;
    let to_screen = |p: Point| screen_pos(&transform, canvas_rect, p);

    paint_grid(&painter, canvas_rect, &transform);

    for edge in &buffer.scene.edges {
        painter.add(egui::Shape::line(
            edge_points(&edge.path, &to_screen),
            Stroke::new(2.0 * zoom, Color32::from_gray(150)),
        ));
    }

    if let Some(guide) = &buffer.guide {
        painter.extend(egui::Shape::dashed_line(
            &edge_points(guide, &to_screen),
            Stroke::new(2.0 * zoom, Color32::YELLOW),
            6.0,
            4.0,
        ));
    }

    let handle_radius = (session.settings().handle_radius as f32 * zoom).max(3.0);
    for node in &buffer.scene.nodes {
        let rect = Rect::from_min_max(to_screen(node.rect.min), to_screen(node.rect.max));
        let is_selected = buffer.selected.as_ref() == Some(&node.id);
        let (stroke_width, stroke_color) = if is_selected {
            (3.0, Color32::WHITE)
        } else {
            (1.0, Color32::from_gray(80))
        };

        painter.rect_filled(rect, 6.0 * zoom, node_color(node.icon_name.as_deref()));
        painter.rect_stroke(
            rect,
            6.0 * zoom,
            Stroke::new(stroke_width * zoom, stroke_color),
            egui::StrokeKind::Outside,
        );

        painter.text(
            rect.center() - egui::vec2(0.0, 10.0 * zoom),
            egui::Align2::CENTER_CENTER,
            &node.icon,
            egui::FontId::proportional(16.0 * zoom),
            Color32::WHITE,
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 12.0 * zoom),
            egui::Align2::CENTER_CENTER,
            &node.label,
            egui::FontId::proportional(12.0 * zoom),
            Color32::WHITE,
        );

        for (handle, hover_color) in [
            (node.input, Color32::LIGHT_GREEN),
            (node.output, Color32::LIGHT_BLUE),
        ] {
            let center = to_screen(handle);
            let hovered = pointer.is_some_and(|p| (p - center).length() < handle_radius * 1.5);
            let color = if hovered {
                hover_color
            } else {
                Color32::from_gray(200)
            };
            painter.circle_filled(center, handle_radius, color);
        }
    }

    if buffer.scene.nodes.is_empty() {
        painter.text(
            canvas_rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drag components here or load a template",
            egui::FontId::proportional(16.0),
            Color32::from_gray(120),
        );
    }

    if !session.gesture().is_idle() {
        ui.ctx().request_repaint();
    }

    actions
}

fn screen_pos(transform: &Transform, canvas_rect: Rect, p: Point) -> Pos2 {
    let s = transform.canvas_to_screen(p);
    Pos2::new(canvas_rect.min.x + s.x as f32, canvas_rect.min.y + s.y as f32)
}

fn edge_points(path: &EdgePath, to_screen: &impl Fn(Point) -> Pos2) -> Vec<Pos2> {
    path.sample(EDGE_SEGMENTS).into_iter().map(to_screen).collect()
}

/// Dotted background grid that pans and zooms with the canvas.
fn paint_grid(painter: &egui::Painter, canvas_rect: Rect, transform: &Transform) {
    let spacing = 20.0 * transform.scale as f32;
    if spacing < 8.0 {
        return;
    }
    let offset_x = (transform.x as f32).rem_euclid(spacing);
    let offset_y = (transform.y as f32).rem_euclid(spacing);
    let color = Color32::from_gray(45);

    let mut y = canvas_rect.min.y + offset_y;
    while y < canvas_rect.max.y {
        let mut x = canvas_rect.min.x + offset_x;
        while x < canvas_rect.max.x {
            painter.circle_filled(Pos2::new(x, y), 1.0, color);
            x += spacing;
        }
        y += spacing;
    }
}

/// Fill colour by component family.
fn node_color(icon_name: Option<&str>) -> Color32 {
    match icon_name.unwrap_or_default() {
        "database" => Color32::from_rgb(60, 140, 60),
        "sliders-horizontal" | "split" => Color32::from_rgb(60, 100, 180),
        "brain" | "trending-up" | "circle-dot" => Color32::from_rgb(130, 80, 170),
        "bar-chart-3" => Color32::from_rgb(200, 120, 40),
        _ => Color32::from_rgb(100, 100, 100),
    }
}
