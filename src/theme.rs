use eframe::egui;
use egui::{Color32, CornerRadius, Stroke};

pub struct AppTheme {
    pub background: Color32,
    pub card_background: Color32,
    pub card_border: Color32,
    pub placeholder: Color32,
    pub text: Color32,
    pub secondary_text: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub score_high: Color32,
    pub score_medium: Color32,
    pub button_background: Color32,
    pub button_foreground: Color32,
    pub button_hover_background: Color32,
}

impl AppTheme {
    /// Green-on-black terminal look.
    pub fn dark() -> Self {
        Self {
            background: Color32::BLACK,
            card_background: Color32::from_rgb(26, 26, 26),
            card_border: Color32::from_rgb(51, 51, 51),
            placeholder: Color32::from_rgb(51, 51, 51),
            text: Color32::from_rgb(0, 255, 0),
            secondary_text: Color32::from_rgb(136, 136, 136),
            accent: Color32::from_rgb(0, 255, 0),
            error: Color32::from_rgb(239, 68, 68),
            score_high: Color32::from_rgb(76, 175, 80),
            score_medium: Color32::from_rgb(255, 193, 7),
            button_background: Color32::from_rgb(0, 255, 0),
            button_foreground: Color32::BLACK,
            button_hover_background: Color32::from_rgb(0, 204, 0),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::WHITE,
            card_border: Color32::from_rgb(200, 200, 200),
            placeholder: Color32::from_rgb(220, 220, 220),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            accent: Color32::from_rgb(0, 120, 0),
            error: Color32::from_rgb(185, 28, 28),
            score_high: Color32::from_rgb(30, 110, 40),
            score_medium: Color32::from_rgb(190, 130, 0),
            button_background: Color32::from_rgb(0, 140, 0),
            button_foreground: Color32::WHITE,
            button_hover_background: Color32::from_rgb(0, 110, 0),
        }
    }

    pub fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        // egui's base palette covers the widgets not styled below
        let is_light_theme = self.background.r() > 128 && self.background.g() > 128 && self.background.b() > 128;
        style.visuals = if is_light_theme {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.extreme_bg_color = self.card_background;
        style.visuals.override_text_color = Some(self.text);
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.card_border);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;

        style.visuals.selection.bg_fill = self.accent.gamma_multiply(0.4);
        style.visuals.selection.stroke = Stroke::new(1.0, self.accent);

        style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }

    pub fn score_color(&self, points: i64) -> Color32 {
        if points >= 300 {
            self.score_high
        } else if points >= 100 {
            self.score_medium
        } else {
            self.secondary_text
        }
    }
}
