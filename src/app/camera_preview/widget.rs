// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview widget implementation

use crate::app::mood::PreviewStatus;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, ContentFit, Length, alignment};
use cosmic::widget;

impl AppModel {
    /// Build the camera preview widget
    ///
    /// Shows the held still while a capture is being classified or shown,
    /// the live preview otherwise, and a placeholder until the first frame.
    pub fn build_camera_preview(&self) -> Element<'_, Message> {
        let handle = self
            .captured_handle
            .as_ref()
            .or(self.preview_handle.as_ref());

        let content: Element<'_, Message> = match handle {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => {
                let status = match self.mood.preview_status() {
                    PreviewStatus::WaitingForAccess => fl!("preview-waiting"),
                    PreviewStatus::NoAccess => fl!("preview-no-access"),
                    PreviewStatus::SetupFailed => fl!("preview-failed"),
                    PreviewStatus::Starting => fl!("preview-starting"),
                };
                widget::text(status).size(16).into()
            }
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fixed(ui::PREVIEW_HEIGHT))
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .style(|theme: &cosmic::Theme| widget::container::Style {
                background: Some(Background::Color(cosmic::iced::Color::BLACK)),
                text_color: Some(theme.cosmic().on_bg_color().into()),
                border: cosmic::iced::Border {
                    radius: theme.cosmic().corner_radii.radius_s.into(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .into()
    }
}
