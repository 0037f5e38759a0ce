// SPDX-License-Identifier: GPL-3.0-only

//! Session handlers
//!
//! Handles page navigation, camera authorization, session setup and preview
//! frames. Every message tagged with a session generation is dropped when
//! the generation no longer matches, so late answers from a page the user
//! already left never touch the current session.

use crate::app::camera_preview;
use crate::app::state::{AppModel, Message, Page, SessionReadyAction};
use crate::backends::camera::{CameraDevice, CameraFrame, FrameSender};
use crate::errors::CameraError;
use crate::fl;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::widget::nav_bar;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Navigation
    // =========================================================================

    pub(crate) fn handle_nav_select(&mut self, id: nav_bar::Id) -> Task<cosmic::Action<Message>> {
        let previous = self.active_page();
        self.nav.activate(id);
        let page = self.active_page();

        if previous == page {
            return Task::none();
        }
        info!(?previous, ?page, "Page changed");

        let mut tasks = vec![self.update_title()];
        if previous == Page::Mood {
            tasks.push(self.deactivate_mood_page());
        }
        if page == Page::Mood {
            tasks.push(self.activate_mood_page());
        }
        Task::batch(tasks)
    }

    /// Set the window title to the app name and the active page
    pub(crate) fn update_title(&mut self) -> Task<cosmic::Action<Message>> {
        use cosmic::ApplicationExt;

        let window_title = format!(
            "{} - {}",
            fl!("app-title"),
            Self::page_title(self.active_page())
        );
        match self.core.main_window_id() {
            Some(id) => self.set_window_title(window_title, id),
            None => Task::none(),
        }
    }

    /// Start a new session: request permission, then wait for the preview channel
    pub(crate) fn activate_mood_page(&mut self) -> Task<cosmic::Action<Message>> {
        if self.active_page() != Page::Mood {
            return Task::none();
        }

        let generation = self.session.activate();
        self.session_setup_pending = false;
        self.preview_sender = None;
        self.preview_handle = None;
        self.mood.begin_authorization();

        let controller = self.controller.clone();
        info!(generation, "Activating mood page");

        Task::perform(
            async move { controller.request_authorization().await },
            move |granted| cosmic::Action::App(Message::AuthorizationResolved(generation, granted)),
        )
    }

    /// Leave the mood page: release the camera, keep the label
    pub(crate) fn deactivate_mood_page(&mut self) -> Task<cosmic::Action<Message>> {
        info!(generation = self.session.generation(), "Deactivating mood page");
        self.mood.teardown();
        self.session.deactivate();
        self.session_setup_pending = false;
        self.preview_sender = None;
        self.preview_handle = None;
        self.captured_handle = None;

        let controller = self.controller.clone();
        Task::perform(async move { controller.teardown().await }, |_| {
            cosmic::Action::App(Message::Noop)
        })
    }

    // =========================================================================
    // Authorization and setup
    // =========================================================================

    pub(crate) fn handle_authorization_resolved(
        &mut self,
        generation: u64,
        granted: bool,
    ) -> Task<cosmic::Action<Message>> {
        if !self.session.is_current(generation) {
            debug!(generation, "Ignoring authorization for stale session");
            return Task::none();
        }

        if !self.mood.on_authorization(granted) {
            warn!("Camera access denied");
            self.session.deactivate();
            self.preview_sender = None;
            return Task::none();
        }

        self.session_setup_pending = true;
        self.maybe_configure_session()
    }

    pub(crate) fn handle_preview_channel(
        &mut self,
        generation: u64,
        sender: FrameSender,
    ) -> Task<cosmic::Action<Message>> {
        if !self.session.is_current(generation) {
            debug!(generation, "Ignoring preview channel for stale session");
            return Task::none();
        }

        self.preview_sender = Some(sender);
        self.maybe_configure_session()
    }

    /// Configure once permission is granted and the preview channel exists
    fn maybe_configure_session(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.session_setup_pending || !self.mood.is_authorized() {
            return Task::none();
        }
        let Some(sender) = self.preview_sender.take() else {
            return Task::none();
        };
        self.session_setup_pending = false;

        let generation = self.session.generation();
        let controller = self.controller.clone();
        Task::perform(
            async move {
                let device = controller.configure_session(Some(sender)).await?;
                controller.start().await?;
                Ok::<_, CameraError>(device)
            },
            move |result| cosmic::Action::App(Message::SessionReady(generation, result)),
        )
    }

    pub(crate) fn handle_session_ready(
        &mut self,
        generation: u64,
        result: Result<CameraDevice, CameraError>,
    ) -> Task<cosmic::Action<Message>> {
        match self.session.on_session_ready(generation, result.is_ok()) {
            SessionReadyAction::Apply => {}
            SessionReadyAction::Ignore => {
                debug!(generation, "Session ready for stale generation");
                return Task::none();
            }
            SessionReadyAction::Teardown => {
                debug!(generation, "Session came up after the page was left");
                let controller = self.controller.clone();
                return Task::perform(async move { controller.teardown().await }, |_| {
                    cosmic::Action::App(Message::Noop)
                });
            }
        }

        match &result {
            Ok(device) => {
                info!(
                    name = %device.name,
                    path = %device.path,
                    api = %device.api,
                    "Camera session running"
                );
                self.remember_camera(device);
            }
            Err(e) => error!(error = %e, "Camera session setup failed"),
        }
        self.mood.on_session_ready(result);
        Task::none()
    }

    pub(crate) fn handle_session_resumed(
        &mut self,
        result: Result<(), CameraError>,
    ) -> Task<cosmic::Action<Message>> {
        if let Err(e) = result {
            error!(error = %e, "Failed to resume camera session");
            self.mood.set_error(e.to_string());
        }
        Task::none()
    }

    fn remember_camera(&mut self, device: &CameraDevice) {
        let unchanged = self.config.last_camera_path.as_deref() == Some(device.path.as_str());
        if device.path.is_empty() || unchanged {
            return;
        }

        self.config.last_camera_path = Some(device.path.clone());
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save last camera path");
        }
    }

    // =========================================================================
    // Preview
    // =========================================================================

    pub(crate) fn handle_preview_frame(
        &mut self,
        generation: u64,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.session.is_current(generation) {
            return Task::none();
        }

        match camera_preview::frame_handle(&frame, self.config.mirror_preview) {
            Ok(handle) => self.preview_handle = Some(handle),
            Err(e) => warn!(error = %e, "Dropping malformed preview frame"),
        }
        Task::none()
    }
}
