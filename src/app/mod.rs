// SPDX-License-Identifier: MPL-2.0

//! Main application module
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, Page)
//! - `mood`: Emotion label store, color mapping and the mood page state machine
//! - `frame_processor`: Emotion model and classification task
//! - `camera_preview`: Live preview and held still display
//! - `controls`: Capture and clear buttons
//! - `settings`: Settings page
//! - `view`: Page rendering
//! - `update`: Message dispatch to `handlers`

mod camera_preview;
mod controls;
pub mod frame_processor;
mod handlers;
pub mod mood;
pub mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::{CaptureController, FrameReceiver, FrameSender};
use crate::backends::permission::PortalAuthorizer;
use crate::config::Config;
use crate::constants::{InputLayout, app_info, timing};
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About, nav_bar};
use cosmic::{Element, Task};
use frame_processor::{EmotionClassifier, ModelSettings};
use mood::{Emotion, MoodScreen};
pub use state::{AppModel, ContextPage, Message, Page, SessionTracker};
use std::sync::Arc;
use tracing::{debug, error, info};

const REPOSITORY: &str = "https://github.com/emotrack/emotrack";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.emotrack.EmoTrack.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_info::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = Config::load();

        // Required before any device enumeration
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let mut nav = nav_bar::Model::default();
        for page in Page::ALL {
            let id = nav
                .insert()
                .text(Self::page_title(page))
                .icon(widget::icon::from_name(page.icon_name()))
                .data::<Page>(page)
                .id();
            if page == Page::default() {
                nav.activate(id);
            }
        }

        let controller = CaptureController::new(Arc::new(PortalAuthorizer::new(Self::APP_ID)));
        controller.set_preferred_device(config.last_camera_path.clone());
        let classifier = EmotionClassifier::new(ModelSettings::from(&config));
        let mood = MoodScreen::new(config.default_emotion());

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            nav,
            config,
            config_handler,
            controller,
            classifier,
            mood,
            session: SessionTracker::default(),
            preview_sender: None,
            session_setup_pending: false,
            preview_handle: None,
            captured_handle: None,
            last_classification: None,
            theme_dropdown_options: vec![
                fl!("theme-system"),
                fl!("theme-dark"),
                fl!("theme-light"),
            ],
            layout_dropdown_options: InputLayout::ALL
                .iter()
                .map(|layout| layout.display_name().to_string())
                .collect(),
            emotion_dropdown_options: Emotion::ALL
                .iter()
                .map(|emotion| emotion.label().to_string())
                .collect(),
        };

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());
        let title_task = app.update_title();
        let session_task = app.activate_mood_page();
        info!(
            version = app_info::version(),
            runtime = app_info::runtime_environment(),
            "Application initialized"
        );

        (app, Task::batch([theme_task, title_task, session_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav)
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> Task<cosmic::Action<Self::Message>> {
        self.handle_nav_select(id)
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        if !self.session.is_active() {
            return config_sub;
        }

        // A new generation restarts the preview channel for the new session
        let generation = self.session.generation();
        let preview_sub = Subscription::run_with_id(
            ("preview", generation),
            cosmic::iced::stream::channel(
                timing::PREVIEW_CHANNEL_CAPACITY,
                move |mut output| async move {
                    let (sender, mut receiver): (FrameSender, FrameReceiver) =
                        futures::channel::mpsc::channel(timing::PREVIEW_CHANNEL_CAPACITY);
                    if output
                        .send(Message::PreviewChannel(generation, sender))
                        .await
                        .is_err()
                    {
                        return;
                    }
                    info!(generation, "Preview subscription started");

                    let mut frame_count = 0u64;
                    while let Some(frame) = receiver.next().await {
                        frame_count += 1;
                        if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                            debug!(
                                frame = frame_count,
                                width = frame.width,
                                height = frame.height,
                                latency_ms = frame.captured_at.elapsed().as_secs_f64() * 1000.0,
                                "Preview frame"
                            );
                        }

                        // A full channel drops the frame; only a closed one ends the loop
                        if let Err(e) =
                            output.try_send(Message::PreviewFrame(generation, Arc::new(frame)))
                            && e.is_disconnected()
                        {
                            break;
                        }
                    }
                    info!(generation, "Preview subscription ended");
                },
            ),
        );

        Subscription::batch([config_sub, preview_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    pub fn page_title(page: Page) -> String {
        match page {
            Page::Mood => fl!("page-mood"),
            Page::Journal => fl!("page-journal"),
            Page::History => fl!("page-history"),
            Page::Settings => fl!("page-settings"),
        }
    }

    pub fn active_page(&self) -> Page {
        self.nav.active_data::<Page>().copied().unwrap_or_default()
    }
}
