use crate::app_ui;
use crate::media::UploadedImage;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use genimage::{
    build_provider, GeminiConfig, GenerationService, ImageData, ProviderConfig, ProviderError,
    DEFAULT_IMAGE_MODEL,
};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use storyboard::{Panel, RunEvent};
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkspaceView {
    SingleImage,
    Storyboard,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharacterMode {
    Upload,
    Describe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AlertKind {
    Info,
    Success,
    Warning,
}

pub(crate) struct Alert {
    pub message: String,
    pub kind: AlertKind,
    pub expires_at: Instant,
}

/// The one active character reference. `source_path` is absent when the
/// reference was generated from a description rather than uploaded.
pub(crate) struct CharacterReference {
    pub image: ImageData,
    pub source_path: Option<PathBuf>,
}

/// Results delivered by the single-shot worker threads.
pub(crate) enum StudioEvent {
    SingleImageFinished(Result<ImageData, ProviderError>),
    CharacterGenerated(Result<ImageData, ProviderError>),
}

pub(crate) const ASPECT_RATIO_OPTIONS: &[(&str, &str)] = &[
    ("Model default", ""),
    ("1 : 1 (1024 x 1024)", "1:1"),
    ("2 : 3 (832 x 1248)", "2:3"),
    ("3 : 2 (1248 x 832)", "3:2"),
    ("4 : 5 (896 x 1152)", "4:5"),
    ("5 : 4 (1152 x 896)", "5:4"),
    ("9 : 16 (768 x 1344)", "9:16"),
    ("16 : 9 (1344 x 768)", "16:9"),
];

pub(crate) struct App {
    pub workspace: WorkspaceView,

    // Generation settings; the key defaults from GEMINI_API_KEY and lives in
    // memory only.
    pub api_key: String,
    pub model: String,
    pub show_settings: bool,

    pub event_tx: Sender<StudioEvent>,
    event_rx: Receiver<StudioEvent>,
    pub panel_tx: Sender<RunEvent>,
    panel_rx: Receiver<RunEvent>,
    pub alerts: VecDeque<Alert>,

    // Single-image workflow
    pub single_prompt: String,
    pub single_input: Option<UploadedImage>,
    pub single_output: Option<ImageData>,
    pub single_error: Option<String>,
    pub single_busy: bool,
    pub single_aspect: &'static str,
    pub single_input_tex: Option<egui::TextureHandle>,
    pub single_output_tex: Option<egui::TextureHandle>,

    // Character workflow
    pub character: Option<CharacterReference>,
    pub character_mode: CharacterMode,
    pub character_description: String,
    pub character_error: Option<String>,
    pub character_busy: bool,
    pub character_tex: Option<egui::TextureHandle>,

    // Storyboard pipeline
    pub script: String,
    pub panels: Vec<Panel>,
    pub panel_textures: HashMap<Uuid, egui::TextureHandle>,
    pub storyboard_busy: bool,
    pub storyboard_error: Option<String>,
    pub run_total: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        let (event_tx, event_rx) = unbounded();
        let (panel_tx, panel_rx) = unbounded();
        Self {
            workspace: WorkspaceView::SingleImage,
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            show_settings: false,
            event_tx,
            event_rx,
            panel_tx,
            panel_rx,
            alerts: VecDeque::new(),
            single_prompt: String::new(),
            single_input: None,
            single_output: None,
            single_error: None,
            single_busy: false,
            single_aspect: "",
            single_input_tex: None,
            single_output_tex: None,
            character: None,
            character_mode: CharacterMode::Upload,
            character_description: String::new(),
            character_error: None,
            character_busy: false,
            character_tex: None,
            script: String::new(),
            panels: Vec::new(),
            panel_textures: HashMap::new(),
            storyboard_busy: false,
            storyboard_error: None,
            run_total: 0,
        }
    }

    /// Providers are built per submission from the current settings, so key
    /// and model edits apply to the next call without a restart.
    pub(crate) fn build_service(&self) -> Result<GenerationService, ProviderError> {
        let config = GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            ..GeminiConfig::default()
        };
        build_provider(ProviderConfig::Gemini(config)).map(GenerationService::new)
    }

    pub(crate) fn push_alert(
        &mut self,
        message: impl Into<String>,
        kind: AlertKind,
        duration: Duration,
    ) {
        let alert = Alert {
            message: message.into(),
            kind,
            expires_at: Instant::now() + duration,
        };
        self.alerts.push_back(alert);
        if self.alerts.len() > 8 {
            self.alerts.pop_front();
        }
    }

    fn prune_alerts(&mut self) {
        let now = Instant::now();
        while let Some(alert) = self.alerts.front() {
            if alert.expires_at <= now {
                self.alerts.pop_front();
            } else {
                break;
            }
        }
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: StudioEvent) {
        match event {
            StudioEvent::SingleImageFinished(result) => self.single_image_finished(ctx, result),
            StudioEvent::CharacterGenerated(result) => self.character_generated(ctx, result),
        }
    }

    /// One image file per drop; routed to whichever workflow is on screen.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Option<PathBuf> = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        let Some(path) = dropped else {
            return;
        };
        match self.workspace {
            WorkspaceView::SingleImage => self.single_image_set_input(ctx, path),
            WorkspaceView::Storyboard => {
                if self.character.is_none() && !self.character_busy && !self.storyboard_busy {
                    self.character_set_upload(ctx, path);
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(ctx, event);
        }
        while let Ok(event) = self.panel_rx.try_recv() {
            self.storyboard_handle_event(ctx, event);
        }
        self.prune_alerts();
        self.handle_dropped_files(ctx);

        app_ui::top_bar(self, ctx);
        app_ui::alerts_panel(self, ctx);
        match self.workspace {
            WorkspaceView::SingleImage => self.single_image_workspace(ctx),
            WorkspaceView::Storyboard => self.storyboard_workspace(ctx),
        }

        if self.single_busy || self.character_busy || self.storyboard_busy {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}
