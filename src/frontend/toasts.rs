//! Transient notification popups, stacked in the bottom-right corner.

use std::time::{Duration, Instant};

use egui::{Color32, RichText};

use crate::canvas::{Notification, NotificationLevel};

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const MAX_TOASTS: usize = 5;

struct Toast {
    notification: Notification,
    shown_at: Instant,
}

#[derive(Default)]
pub struct Toasts {
    active: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, notification: Notification) {
        self.active.push(Toast {
            notification,
            shown_at: Instant::now(),
        });
        if self.active.len() > MAX_TOASTS {
            self.active.remove(0);
        }
    }

    pub fn extend(&mut self, notifications: impl IntoIterator<Item = Notification>) {
        for n in notifications {
            self.push(n);
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.active.retain(|t| t.shown_at.elapsed() < TOAST_LIFETIME);
        if self.active.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.active {
                    let color = level_color(toast.notification.level);
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, color))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&toast.notification.message).color(color));
                        });
                    ui.add_space(4.0);
                }
            });

        // keep repainting so expired toasts disappear
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

fn level_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Success => Color32::from_rgb(80, 180, 100),
        NotificationLevel::Info => Color32::from_rgb(90, 150, 220),
        NotificationLevel::Warning => Color32::from_rgb(230, 170, 50),
        NotificationLevel::Error => Color32::from_rgb(220, 80, 80),
    }
}
