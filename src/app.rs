use chrono::{DateTime, Utc};
use eframe::egui;
use egui::{CornerRadius, Key, RichText, ScrollArea, Stroke, Ui};

use crate::hn_client::{HackerNewsClient, StoryFetcher};
use crate::models::{FetchState, Story};
use crate::theme::AppTheme;
use crate::view::{self, StoryListView};

const SEARCH_INPUT_ID: &str = "story_search_input";
const MAX_CONTENT_WIDTH: f32 = 768.0;
const SEARCH_BUTTON_WIDTH: f32 = 96.0;

// Card clicks are collected while drawing and applied afterwards
enum CardAction {
    Open(String),
    CopyLink(String),
}

pub struct HackerNewsReaderApp {
    hn_client: HackerNewsClient,
    fetcher: StoryFetcher,
    search_term: String,
    theme: AppTheme,
    is_dark_mode: bool,
    status: Option<String>,
}

impl HackerNewsReaderApp {
    pub fn new(ctx: &egui::Context, hn_client: HackerNewsClient) -> Self {
        let theme = AppTheme::dark();
        theme.apply_to_ctx(ctx);

        let fetcher = Self::start_fetch(ctx, &hn_client);

        Self {
            hn_client,
            fetcher,
            search_term: String::new(),
            theme,
            is_dark_mode: true,
            status: None,
        }
    }

    fn start_fetch(ctx: &egui::Context, client: &HackerNewsClient) -> StoryFetcher {
        tracing::info!(endpoint = client.endpoint(), "fetching front page");
        let ctx = ctx.clone();
        StoryFetcher::spawn(client.clone(), move || ctx.request_repaint())
    }

    /// Throws away the current result and issues a new request.
    fn refresh(&mut self, ctx: &egui::Context) {
        if self.fetcher.in_flight() {
            return;
        }
        self.status = None;
        self.fetcher = Self::start_fetch(ctx, &self.hn_client);
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
        self.theme.apply_to_ctx(ctx);
    }

    // The system browser is a separate process, so the page gets no handle back into the app
    fn open_link(&mut self, url: &str) {
        if let Err(err) = open::that(url) {
            tracing::warn!(url, "failed to open link: {err}");
            self.status = Some(format!("Could not open link: {err}"));
        }
    }

    fn copy_link(&mut self, url: &str) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.to_string())) {
            Ok(()) => self.status = Some("Link copied to clipboard".to_string()),
            Err(err) => {
                tracing::warn!(url, "failed to copy link: {err}");
                self.status = Some(format!("Could not copy link: {err}"));
            }
        }
    }

    fn apply_card_action(&mut self, action: CardAction) {
        match action {
            CardAction::Open(url) => self.open_link(&url),
            CardAction::CopyLink(url) => self.copy_link(&url),
        }
    }

    fn process_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let (refresh, clear, focus) = ctx.input(|i| {
            (
                i.key_pressed(Key::F5),
                i.key_pressed(Key::Escape),
                i.modifiers.command && i.key_pressed(Key::F),
            )
        });

        if refresh {
            self.refresh(ctx);
        }
        if clear && !self.search_term.is_empty() {
            self.search_term.clear();
        }
        if focus {
            ctx.memory_mut(|m| m.request_focus(egui::Id::new(SEARCH_INPUT_ID)));
        }
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        let mut toggle_theme = false;
        let mut refresh = false;

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(self.theme.background).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        RichText::new("Hacker News Top 100")
                            .size(32.0)
                            .strong()
                            .color(self.theme.accent),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = if self.is_dark_mode { "Light theme" } else { "Dark theme" };
                        if ui.button(theme_label).clicked() {
                            toggle_theme = true;
                        }

                        let refresh_btn = ui
                            .add_enabled(!self.fetcher.state().is_loading(), egui::Button::new("Refresh"))
                            .on_hover_text("Reload the front page (F5)");
                        if refresh_btn.clicked() {
                            refresh = true;
                        }
                    });
                });
            });

        if toggle_theme {
            self.toggle_theme(ctx);
        }
        if refresh {
            self.refresh(ctx);
        }
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        let Some(status) = &self.status else {
            return;
        };
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(RichText::new(status).size(13.0).color(self.theme.secondary_text));
        });
    }

    fn render_search_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let input_width = ui.available_width() - SEARCH_BUTTON_WIDTH - ui.spacing().item_spacing.x;
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.search_term)
                    .id(egui::Id::new(SEARCH_INPUT_ID))
                    .hint_text("Search stories...")
                    .desired_width(input_width),
            );
            if input.changed() {
                tracing::trace!(term = %self.search_term, "search term changed");
            }
            let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

            let search_btn = ui.add_sized(
                [SEARCH_BUTTON_WIDTH, 28.0],
                egui::Button::new(
                    RichText::new("Search")
                        .strong()
                        .color(self.theme.button_foreground),
                )
                .fill(self.theme.button_background)
                .corner_radius(CornerRadius::same(6)),
            );

            // Filtering is already live; submitting only hands focus back to the input
            if search_btn.clicked() || submitted {
                tracing::debug!(term = %self.search_term, "search submitted");
                input.request_focus();
            }
        });
    }

    fn card_frame(&self) -> egui::Frame {
        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(6))
            .stroke(Stroke::new(1.0, self.theme.card_border))
            .inner_margin(16.0)
            .outer_margin(egui::vec2(0.0, 8.0))
    }

    fn render_placeholders(&self, ui: &mut Ui, count: usize) {
        let time = ui.input(|i| i.time);
        let pulse = 0.6 + 0.4 * (((time * 2.0).sin() as f32) * 0.5 + 0.5);
        let fill = self.theme.placeholder.gamma_multiply(pulse);

        for index in 0..count {
            ui.push_id(("placeholder", index), |ui| {
                self.card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let width = ui.available_width();

                    let (title_rect, _) =
                        ui.allocate_exact_size(egui::vec2(width * 0.75, 24.0), egui::Sense::hover());
                    ui.painter().rect_filled(title_rect, CornerRadius::same(4), fill);
                    ui.add_space(8.0);
                    let (meta_rect, _) =
                        ui.allocate_exact_size(egui::vec2(width * 0.25, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(meta_rect, CornerRadius::same(4), fill);
                });
            });
        }

        // Keep the pulse animating until the fetch lands
        ui.ctx().request_repaint();
    }

    fn render_story_card(&self, ui: &mut Ui, story: &Story, now: DateTime<Utc>) -> Option<CardAction> {
        let mut action = None;

        self.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());

            let title = ui.add(
                egui::Label::new(
                    RichText::new(story.title.as_str())
                        .size(20.0)
                        .strong()
                        .color(self.theme.accent),
                )
                .sense(egui::Sense::click()),
            );
            if let Some(url) = &story.url {
                if title.clicked() {
                    action = Some(CardAction::Open(url.clone()));
                }
                if title.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }
            }

            if let Some(meta) = view::story_meta(story, now) {
                ui.label(RichText::new(meta).size(13.0).color(self.theme.secondary_text));
            }
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(view::upvotes_label(story.points))
                        .color(self.theme.score_color(story.points)),
                );

                if let Some(url) = &story.url {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let read_more = ui
                            .link(RichText::new("Read more").color(self.theme.accent))
                            .on_hover_text(url.as_str());
                        if read_more.clicked() {
                            action = Some(CardAction::Open(url.clone()));
                        }
                        if ui.small_button("Copy link").clicked() {
                            action = Some(CardAction::CopyLink(url.clone()));
                        }
                    });
                }
            });
        });

        action
    }

    fn render_story_list(&self, ui: &mut Ui) -> Option<CardAction> {
        match view::story_list_view(self.fetcher.state(), &self.search_term) {
            StoryListView::Placeholders(count) => {
                self.render_placeholders(ui, count);
                None
            }
            StoryListView::ErrorLine(message) => {
                ui.add_space(8.0);
                ui.label(RichText::new(view::error_line(message)).color(self.theme.error));
                None
            }
            StoryListView::Cards(stories) => {
                if let FetchState::Success(all) = self.fetcher.state() {
                    if let Some(summary) = view::match_summary(stories.len(), all.len(), &self.search_term) {
                        ui.label(RichText::new(summary).size(13.0).color(self.theme.secondary_text));
                    }
                }

                let now = Utc::now();
                let mut action = None;
                for story in stories {
                    // Keyed by story id, not position in the filtered list
                    let card_action = ui
                        .push_id(story.id.as_str(), |ui| self.render_story_card(ui, story, now))
                        .inner;
                    action = action.or(card_action);
                }
                action
            }
        }
    }
}

impl eframe::App for HackerNewsReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.fetcher.poll();
        self.process_keyboard_shortcuts(ctx);

        self.render_header(ctx);
        self.render_status_bar(ctx);

        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let width = ui.available_width().min(MAX_CONTENT_WIDTH);
            let margin = (ui.available_width() - width) / 2.0;

            ui.horizontal_top(|ui| {
                ui.add_space(margin);
                ui.vertical(|ui| {
                    ui.set_width(width);
                    self.render_search_bar(ui);
                    ui.add_space(12.0);

                    ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            action = self.render_story_list(ui);
                        });
                });
            });
        });

        if let Some(action) = action {
            self.apply_card_action(action);
        }
    }
}
