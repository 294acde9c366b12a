//! Nomflix - movie and TV discovery for the TMDB catalog
//! Paged carousels per category, a detail overlay and keyword search

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod api;
mod artwork;
mod cache;
mod carousel;
mod config;
mod console;
mod focus;
mod models;
mod router;
mod tasks;
mod view;

use api::{CatalogSource, FetchError, TmdbClient};
use artwork::{ArtworkCache, ImageSource};
use cache::QueryCache;
use carousel::PAGE_SIZE;
use config::AppConfig;
use console::{ConsoleLog, LogLevel};
use focus::Focus;
use models::{CatalogItem, Category, MediaKind, QueryKey, ResultSet, ViewKind};
use router::Route;
use tasks::{spawn_artwork, spawn_fetch, TaskResult, Ticket};
use view::{MountId, ViewState, ViewStatus};

const BOX_HEIGHT: f32 = 150.0;
const BOX_GAP: f32 = 5.0;
const ARROW_WIDTH: f32 = 28.0;

/// Smoothstep easing for the page slide
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

const BANNER_HEIGHT: f32 = 360.0;

/// Stand-in colour for a box, stable per item
fn placeholder_color(id: u64) -> egui::Color32 {
    let r = 40 + (id.wrapping_mul(37) % 120) as u8;
    let g = 30 + (id.wrapping_mul(61) % 90) as u8;
    let b = 50 + (id.wrapping_mul(97) % 140) as u8;
    egui::Color32::from_rgb(r, g, b)
}

/// Try the usual system emoji fonts so item titles render
fn install_emoji_fonts(ctx: &egui::Context) {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &["C:\\Windows\\Fonts\\seguiemj.ttf"]
    } else if cfg!(target_os = "macos") {
        &["/System/Library/Fonts/Apple Color Emoji.ttc"]
    } else {
        &[
            "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
            "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
            "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
        ]
    };

    let mut fonts = egui::FontDefinitions::default();
    if let Some(font_data) = candidates.iter().find_map(|path| std::fs::read(path).ok()) {
        fonts.font_data.insert(
            "emoji".to_owned(),
            egui::FontData::from_owned(font_data).into(),
        );
        fonts
            .families
            .entry(egui::FontFamily::Proportional)
            .or_default()
            .push("emoji".to_owned());
    }
    ctx.set_fonts(fonts);
}

fn apply_font_size(ctx: &egui::Context, size: u32) {
    let size = size.clamp(8, 32) as f32;
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Heading => size + 8.0,
                egui::TextStyle::Small => size - 4.0,
                _ => size,
            };
        }
    });
}

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        ..Default::default()
    };

    eframe::run_native(
        "Nomflix",
        options,
        Box::new(|cc| {
            install_emoji_fonts(&cc.egui_ctx);
            Ok(Box::new(NomflixApp::new(&cc.egui_ctx)))
        }),
    )
}

/// Deferred UI input, applied once rendering has released its borrows
enum UiAction {
    Navigate(Route),
    Advance(Category),
    Retreat(Category),
    Focus(u64),
    CloseOverlay,
    Retry,
    LoadArtwork(String),
    ApplySettings,
    SaveSettings,
}

struct NomflixApp {
    config: AppConfig,
    source: Arc<dyn CatalogSource>,
    images: Arc<dyn ImageSource>,
    cache: QueryCache,
    artwork: ArtworkCache,
    console: ConsoleLog,

    // Background task channel
    task_receiver: Receiver<TaskResult>,
    task_sender: Sender<TaskResult>,

    // Navigation
    route: Route,
    view: ViewState,
    next_mount: MountId,
    address_input: String,
    search_input: String,

    // Panels
    show_console: bool,
    show_settings: bool,
    close_handled: bool,
}

impl NomflixApp {
    fn new(ctx: &egui::Context) -> Self {
        let loaded = AppConfig::load();
        let config = loaded.config;
        let (task_sender, task_receiver) = channel();

        let mut console = ConsoleLog::default();
        console.info(&format!("Nomflix {} starting", env!("CARGO_PKG_VERSION")));
        if let Some(warning) = loaded.warning {
            console.warn(&warning);
        }

        let route = if config.save_state {
            Route::parse(&config.last_route).unwrap_or_default()
        } else {
            Route::default()
        };

        let client = TmdbClient::from_config(&config);
        if !client.is_configured() {
            console.warn("No TMDB credentials - set TMDB_API_KEY or open Settings");
        }

        let client = Arc::new(client);
        let mut app = Self {
            cache: QueryCache::new(Duration::from_secs(config.cache_ttl_secs)),
            artwork: ArtworkCache::default(),
            source: client.clone(),
            images: client,
            console,
            task_receiver,
            task_sender,
            view: ViewState::mount(&route, 0, config.transition_secs),
            address_input: route.path(),
            search_input: route.keyword().unwrap_or_default().to_string(),
            route,
            next_mount: 0,
            show_console: false,
            show_settings: false,
            close_handled: false,
            config,
        };

        ctx.set_visuals(if app.config.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        apply_font_size(ctx, app.config.font_size);
        app.mount_view(ctx);
        app
    }

    fn navigate(&mut self, route: Route, ctx: &egui::Context) {
        let remount = self.route.remounts(&route);
        self.console.info(&format!("Navigate to {}", route.path()));
        self.address_input = route.path();
        if let Some(keyword) = route.keyword() {
            self.search_input = keyword.to_string();
        }
        if self.config.save_state {
            self.config.last_route = route.path();
        }
        self.route = route;
        if remount {
            self.mount_view(ctx);
        }
    }

    /// Fresh view for the current route: cached rows apply at once, the rest are fetched
    fn mount_view(&mut self, ctx: &egui::Context) {
        self.next_mount += 1;
        let mount = self.next_mount;
        self.view = ViewState::mount(&self.route, mount, self.config.transition_secs);

        if self.view.is_blank_search() {
            self.console.info("Search without keyword - no request sent");
        }

        let now = Instant::now();
        self.cache.evict_stale(now);
        for key in self.view.pending_queries() {
            match self.cache.get_fresh(&key, now) {
                Some(set) => {
                    self.console.info(&format!("Cache hit: {} ({} items)", key, set.len()));
                    self.view.apply(mount, &key, Ok(set));
                }
                None => self.dispatch(key, ctx),
            }
        }
    }

    fn dispatch(&mut self, key: QueryKey, ctx: &egui::Context) {
        self.console.fetch(&format!("GET {}", key));
        let ctx = ctx.clone();
        let ticket = Ticket {
            mount: self.view.mount_id(),
            epoch: self.cache.epoch(),
        };
        spawn_fetch(
            Arc::clone(&self.source),
            ticket,
            key,
            self.task_sender.clone(),
            move || ctx.request_repaint(),
        );
    }

    fn retry(&mut self, ctx: &egui::Context) {
        let keys = self.view.retry_failed();
        self.console.info(&format!("Retrying {} failed request(s)", keys.len()));
        for key in keys {
            self.cache.invalidate(&key);
            self.dispatch(key, ctx);
        }
    }

    fn load_artwork(&mut self, url: String, ctx: &egui::Context) {
        if !self.artwork.begin(&url) {
            return;
        }
        let ctx = ctx.clone();
        spawn_artwork(
            Arc::clone(&self.images),
            url,
            self.task_sender.clone(),
            move || ctx.request_repaint(),
        );
    }

    /// Process background task results (non-blocking)
    fn drain_tasks(&mut self, ctx: &egui::Context) {
        while let Ok(task) = self.task_receiver.try_recv() {
            match task {
                TaskResult::Fetched { ticket, key, result } => self.on_fetched(ticket, key, result),
                TaskResult::Artwork { url, result } => {
                    if let Err(e) = &result {
                        self.console.warn(&format!("Image {}: {}", url, e));
                    }
                    self.artwork.finish(ctx, &url, result);
                }
            }
        }
    }

    fn on_fetched(&mut self, ticket: Ticket, key: QueryKey, result: Result<ResultSet, FetchError>) {
        let applied = match result {
            Ok(set) => {
                let count = set.len();
                let set = Arc::new(set);
                if !self.cache.insert_from(ticket.epoch, key.clone(), Arc::clone(&set), Instant::now()) {
                    self.console.warn(&format!("Not caching {} (requested before settings changed)", key));
                }
                let applied = self.view.apply(ticket.mount, &key, Ok(set));
                if applied {
                    self.console.fetch(&format!("Loaded {} items from {}", count, key));
                }
                applied
            }
            Err(e) => {
                self.console.error(&format!("{}: {}", key, e));
                self.view.apply(ticket.mount, &key, Err(e))
            }
        };
        if !applied {
            self.console.warn(&format!("Dropped result for {} (view no longer mounted)", key));
        }
    }

    fn rebuild_source(&mut self) {
        let client = TmdbClient::from_config(&self.config);
        if !client.is_configured() {
            self.console.warn("Settings applied without TMDB credentials");
        }
        let client = Arc::new(client);
        self.source = client.clone();
        self.images = client;
        self.cache.set_ttl(Duration::from_secs(self.config.cache_ttl_secs));
        self.cache.reset();
        self.artwork.clear();
        self.console.info("Settings applied");
    }

    fn save_settings(&mut self) {
        if self.config.save_state {
            self.config.last_route = self.route.path();
        }
        match self.config.save() {
            Ok(path) => self.console.info(&format!("Settings saved to {}", path.display())),
            Err(e) => self.console.error(&format!("Saving settings failed: {}", e)),
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>, ctx: &egui::Context, now: f64) {
        for action in actions {
            match action {
                UiAction::Navigate(route) => self.navigate(route, ctx),
                UiAction::Advance(category) => {
                    self.view.advance(category, now);
                }
                UiAction::Retreat(category) => {
                    self.view.retreat(category, now);
                }
                UiAction::Focus(id) => {
                    let route = self.route.with_focus(id);
                    self.navigate(route, ctx);
                }
                UiAction::CloseOverlay => {
                    let route = self.route.base();
                    self.navigate(route, ctx);
                }
                UiAction::Retry => self.retry(ctx),
                UiAction::LoadArtwork(url) => self.load_artwork(url, ctx),
                UiAction::ApplySettings => {
                    ctx.set_visuals(if self.config.dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    });
                    apply_font_size(ctx, self.config.font_size);
                    self.rebuild_source();
                    self.mount_view(ctx);
                }
                UiAction::SaveSettings => self.save_settings(),
            }
        }
    }
}

impl eframe::App for NomflixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_tasks(ctx);

        let now = ctx.input(|i| i.time);
        self.view.tick(now);
        if self.view.carousels().in_flight() {
            ctx.request_repaint();
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_top_bar(ui, &mut actions);
        });

        if self.show_console {
            egui::TopBottomPanel::bottom("console_panel")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| self.show_console_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_view(ui, now, &mut actions));
        });

        self.show_overlay(ctx, &mut actions);
        self.show_settings_window(ctx, &mut actions);

        self.apply_actions(actions, ctx, now);

        if ctx.input(|i| i.viewport().close_requested()) && !self.close_handled {
            self.close_handled = true;
            if self.config.save_state {
                self.save_settings();
            }
        }
    }
}

impl NomflixApp {
    fn show_top_bar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("NOMFLIX")
                    .size(24.0)
                    .strong()
                    .color(egui::Color32::from_rgb(229, 16, 19)),
            );
            ui.separator();

            let current = self.route.view_kind();
            for (kind, route) in [(ViewKind::Movies, Route::home()), (ViewKind::Tv, Route::Tv { tv_id: None })] {
                if ui.selectable_label(current == kind, kind.label()).clicked() && current != kind {
                    actions.push(UiAction::Navigate(route));
                }
            }
            ui.separator();

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search for movie or tv show...")
                    .desired_width(240.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("🔍 Search").clicked() || submitted {
                let keyword = self.search_input.trim();
                actions.push(UiAction::Navigate(Route::Search {
                    keyword: Some(keyword.to_string()).filter(|k| !k.is_empty()),
                }));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.selectable_label(self.show_console, "🖥 Console").clicked() {
                    self.show_console = !self.show_console;
                }
                if ui.button("⚙ Settings").clicked() {
                    self.show_settings = true;
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label("📍");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.address_input)
                    .desired_width(420.0)
                    .font(egui::TextStyle::Monospace),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Go").clicked() || submitted {
                match Route::parse(&self.address_input) {
                    Some(route) => actions.push(UiAction::Navigate(route)),
                    None => {
                        self.console.warn(&format!("Unknown path '{}', showing home", self.address_input));
                        actions.push(UiAction::Navigate(Route::home()));
                    }
                }
            }
        });
        ui.add_space(3.0);
    }

    fn show_view(&self, ui: &mut egui::Ui, now: f64, actions: &mut Vec<UiAction>) {
        match self.view.status() {
            ViewStatus::Loading => {
                ui.add_space(120.0);
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label(egui::RichText::new("Loading...").size(20.0));
                });
            }
            ViewStatus::Failed(failures) => {
                ui.add_space(80.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Could not load the catalog");
                    ui.add_space(10.0);
                    for (category, error) in &failures {
                        ui.label(
                            egui::RichText::new(format!("{}: {}", category.title(), error))
                                .color(egui::Color32::LIGHT_RED),
                        );
                    }
                    ui.add_space(10.0);
                    if ui.button("↻ Retry").clicked() {
                        actions.push(UiAction::Retry);
                    }
                });
            }
            ViewStatus::Ready => {
                if self.view.kind() == ViewKind::Search {
                    self.show_search_header(ui);
                } else {
                    self.show_banner(ui, actions);
                }
                if self.view.is_blank_search() {
                    return;
                }
                for (category, _) in self.view.rows() {
                    self.show_row(ui, *category, now, actions);
                    ui.add_space(24.0);
                }
            }
        }
    }

    fn show_search_header(&self, ui: &mut egui::Ui) {
        ui.add_space(20.0);
        match self.view.keyword().map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => {
                ui.label(egui::RichText::new(format!("Search for : {}", keyword)).size(32.0).strong());
            }
            None => {
                ui.label(egui::RichText::new("Type a keyword to search movies and shows").size(22.0));
            }
        }
        ui.add_space(20.0);
    }

    fn backdrop_url(&self, item: &CatalogItem, size: &str) -> String {
        artwork::make_image_path(&self.config.image_base_url, item.backdrop_path.as_deref(), Some(size))
    }

    /// Paint the image at `url` cropped to `rect`, or the item's colour tile
    /// while it loads. Unknown URLs are queued for download.
    fn paint_artwork(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        url: &str,
        fallback: egui::Color32,
        actions: &mut Vec<UiAction>,
    ) {
        match self.artwork.texture(url) {
            Some(texture) => {
                let uv = artwork::cover_uv(texture.size_vec2(), rect.size());
                painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, 4.0, fallback);
                if !url.is_empty() && self.artwork.get(url).is_none() {
                    actions.push(UiAction::LoadArtwork(url.to_string()));
                }
            }
        }
    }

    fn show_banner(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(hero) = self.view.hero() else {
            return;
        };
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), BANNER_HEIGHT),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        let url = self.backdrop_url(hero, &self.config.hero_size);
        self.paint_artwork(&painter, rect, &url, placeholder_color(hero.id), actions);

        // Darken the left side so the text stays readable over the image
        let shade = egui::Rect::from_min_max(rect.min, egui::pos2(rect.left() + rect.width() * 0.6, rect.bottom()));
        painter.rect_filled(shade, 0.0, egui::Color32::from_black_alpha(140));

        let text_width = shade.width() - 60.0;
        let title = painter.layout(
            hero.title.clone(),
            egui::FontId::proportional(48.0),
            egui::Color32::WHITE,
            text_width,
        );
        let title_height = title.size().y;
        let text_left = rect.left() + 30.0;
        painter.galley(egui::pos2(text_left, rect.top() + 60.0), title, egui::Color32::WHITE);

        let overview = painter.layout(
            hero.overview.clone(),
            egui::FontId::proportional(18.0),
            egui::Color32::from_gray(230),
            text_width,
        );
        painter.galley(
            egui::pos2(text_left, rect.top() + 80.0 + title_height),
            overview,
            egui::Color32::WHITE,
        );
        ui.add_space(24.0);
    }

    fn show_row(&self, ui: &mut egui::Ui, category: Category, now: f64, actions: &mut Vec<UiAction>) {
        let items = self.view.items(category).unwrap_or(&[]);
        let carousels = self.view.carousels();
        let page = carousels.page(category);
        let max_page = carousels.max_page_index(items);

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("{}...", category.title())).size(26.0).strong());
            ui.label(
                egui::RichText::new(format!("{} / {}", page.page_index + 1, max_page + 1))
                    .small()
                    .weak(),
            );
        });

        if items.len() <= 1 {
            ui.label(egui::RichText::new("Nothing to show").weak());
            return;
        }

        ui.horizontal(|ui| {
            if ui
                .add_sized([ARROW_WIDTH, BOX_HEIGHT], egui::Button::new("◀"))
                .clicked()
            {
                actions.push(UiAction::Retreat(category));
            }

            let width = (ui.available_width() - ARROW_WIDTH - BOX_GAP * 2.0).max(240.0);
            let (rect, _) = ui.allocate_exact_size(egui::vec2(width, BOX_HEIGHT), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            let incoming = carousels.window(category, items);

            match carousels.guard().slide().filter(|slide| slide.category == category) {
                Some(slide) => {
                    let t = ease_in_out(slide.progress(now));
                    let sign = slide.direction.exit_sign();
                    let outgoing = carousels.outgoing_window(category, items).unwrap_or(&[]);
                    self.paint_window(ui, &painter, rect, outgoing, rect.width() * sign * t, None, actions);
                    self.paint_window(ui, &painter, rect, incoming, -rect.width() * sign * (1.0 - t), None, actions);
                }
                None => {
                    self.paint_window(ui, &painter, rect, incoming, 0.0, Some(category), actions);
                }
            }

            if ui
                .add_sized([ARROW_WIDTH, BOX_HEIGHT], egui::Button::new("▶"))
                .clicked()
            {
                actions.push(UiAction::Advance(category));
            }
        });
    }

    /// Draw one page of boxes shifted by `offset_x`. Boxes are clickable only
    /// when `clickable` is given (no slide playing).
    #[allow(clippy::too_many_arguments)]
    fn paint_window(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        rect: egui::Rect,
        items: &[CatalogItem],
        offset_x: f32,
        clickable: Option<Category>,
        actions: &mut Vec<UiAction>,
    ) {
        let box_width = (rect.width() - BOX_GAP * (PAGE_SIZE as f32 - 1.0)) / PAGE_SIZE as f32;

        for (i, item) in items.iter().enumerate() {
            let left = rect.left() + offset_x + i as f32 * (box_width + BOX_GAP);
            let box_rect = egui::Rect::from_min_size(
                egui::pos2(left, rect.top()),
                egui::vec2(box_width, rect.height()),
            );

            let mut hovered = false;
            if let Some(category) = clickable {
                let response = ui
                    .interact(box_rect, ui.id().with((category, item.id)), egui::Sense::click())
                    .on_hover_text(self.box_tooltip(item));
                hovered = response.hovered();
                if response.clicked() && self.view.kind() != ViewKind::Search {
                    actions.push(UiAction::Focus(item.id));
                }
            }

            let url = self.backdrop_url(item, &self.config.backdrop_size);
            self.paint_artwork(painter, box_rect, &url, placeholder_color(item.id), actions);
            if hovered {
                painter.rect_filled(box_rect, 4.0, egui::Color32::from_white_alpha(24));
                painter.rect_stroke(
                    box_rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::WHITE),
                    egui::StrokeKind::Inside,
                );
            }

            let caption = egui::Rect::from_min_max(
                egui::pos2(box_rect.left(), box_rect.bottom() - 28.0),
                box_rect.max,
            );
            painter.rect_filled(caption, 0.0, egui::Color32::from_black_alpha(160));
            painter.text(
                caption.center(),
                egui::Align2::CENTER_CENTER,
                &item.title,
                egui::FontId::proportional(14.0),
                egui::Color32::WHITE,
            );
        }
    }

    fn box_tooltip(&self, item: &CatalogItem) -> String {
        format!("{}\n⭐ {:.1}  ({})", item.title, item.vote_average, item.release_or_air_date)
    }

    fn show_overlay(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let focus = self.view.focus(self.route.focus_param());
        if !focus.is_visible() {
            return;
        }

        let screen = ctx.content_rect();
        egui::Area::new(egui::Id::new("overlay_backdrop"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let response = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(screen, 0.0, egui::Color32::from_black_alpha(128));
                if response.clicked() {
                    actions.push(UiAction::CloseOverlay);
                }
            });

        egui::Area::new(egui::Id::new("overlay_detail"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_TOP, [0.0, 60.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).inner_margin(16.0).show(ui, |ui| {
                    ui.set_width((screen.width() * 0.4).max(420.0));
                    match focus {
                        Focus::Found(item) => self.show_detail(ui, item, actions),
                        Focus::Pending => {
                            ui.add_space(40.0);
                            ui.vertical_centered(|ui| {
                                ui.add(egui::Spinner::new().size(28.0));
                            });
                            ui.add_space(40.0);
                        }
                        Focus::NotFound | Focus::Hidden => {
                            ui.add_space(40.0);
                            ui.vertical_centered(|ui| {
                                ui.label(egui::RichText::new("No details available for this title").size(20.0));
                            });
                            ui.add_space(40.0);
                        }
                    }
                    ui.separator();
                    if ui.button("✕ Close").clicked() {
                        actions.push(UiAction::CloseOverlay);
                    }
                });
            });
    }

    fn show_detail(&self, ui: &mut egui::Ui, item: &CatalogItem, actions: &mut Vec<UiAction>) {
        let (cover_rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 240.0), egui::Sense::hover());
        let url = self.backdrop_url(item, &self.config.backdrop_size);
        self.paint_artwork(&ui.painter_at(cover_rect), cover_rect, &url, placeholder_color(item.id), actions);

        ui.label(egui::RichText::new(&item.title).size(34.0).strong());
        ui.add_space(6.0);
        ui.add(egui::Label::new(&item.overview).wrap());
        ui.add_space(10.0);

        let date_label = match item.kind {
            MediaKind::Movie => "Release Date",
            MediaKind::Tv => "First Air Date",
        };
        egui::Grid::new("detail_grid")
            .num_columns(2)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.label("Popular:");
                ui.label(format!("{}", item.popularity));
                ui.end_row();

                ui.label(format!("{}:", date_label));
                ui.label(&item.release_or_air_date);
                ui.end_row();

                ui.label("Rating:");
                ui.label(format!("⭐ {} / 🗳 {}", item.vote_average, item.vote_count));
                ui.end_row();
            });

        let original = self.backdrop_url(item, artwork::ORIGINAL_SIZE);
        if !original.is_empty() {
            ui.hyperlink_to("🖼 Full size backdrop", original);
        }
    }

    fn show_console_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Console Log");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.console.clear();
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in self.console.lines() {
                    let color = match line.level {
                        LogLevel::Error => egui::Color32::RED,
                        LogLevel::Warn => egui::Color32::YELLOW,
                        LogLevel::Info => egui::Color32::LIGHT_BLUE,
                        LogLevel::Fetch => egui::Color32::GREEN,
                    };
                    ui.label(egui::RichText::new(&line.text).monospace().color(color));
                }
            });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let mut open = self.show_settings;
        egui::Window::new("⚙ Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("API key:");
                        ui.add(egui::TextEdit::singleline(&mut self.config.api_key).password(true));
                        ui.end_row();

                        ui.label("Access token:");
                        ui.add(egui::TextEdit::singleline(&mut self.config.access_token).password(true));
                        ui.end_row();

                        ui.label("API URL:");
                        ui.text_edit_singleline(&mut self.config.api_base_url);
                        ui.end_row();

                        ui.label("Image URL:");
                        ui.text_edit_singleline(&mut self.config.image_base_url);
                        ui.end_row();

                        ui.label("Box image size:");
                        ui.text_edit_singleline(&mut self.config.backdrop_size);
                        ui.end_row();

                        ui.label("Banner image size:");
                        ui.text_edit_singleline(&mut self.config.hero_size);
                        ui.end_row();

                        ui.label("Cache (seconds):");
                        ui.add(egui::DragValue::new(&mut self.config.cache_ttl_secs).range(0..=86400));
                        ui.end_row();

                        ui.label("Slide (seconds):");
                        ui.add(egui::Slider::new(&mut self.config.transition_secs, 0.0..=3.0));
                        ui.end_row();

                        ui.label("Font size:");
                        ui.add(egui::Slider::new(&mut self.config.font_size, 10..=24));
                        ui.end_row();

                        ui.label("Theme:");
                        ui.checkbox(&mut self.config.dark_mode, "🌙 Dark");
                        ui.end_row();

                        ui.label("Session:");
                        ui.checkbox(&mut self.config.save_state, "💾 Remember last page");
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("✔ Apply").clicked() {
                        actions.push(UiAction::ApplySettings);
                    }
                    if ui.button("💾 Save").clicked() {
                        actions.push(UiAction::ApplySettings);
                        actions.push(UiAction::SaveSettings);
                    }
                });
            });
        self.show_settings = open;
    }
}
