// SPDX-License-Identifier: MPL-2.0

//! Capture button widget implementation

use crate::app::mood::MoodPhase;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the capture button widget
    ///
    /// - Ready: white circle
    /// - Capture or classification in flight: smaller gray circle
    /// - No session: grayed out and non-interactive
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let is_enabled = self.mood.can_capture();
        let is_busy = matches!(
            self.mood.phase(),
            MoodPhase::Capturing | MoodPhase::Classifying
        );

        let capture_button_color = if is_busy {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else if is_enabled {
            Color::WHITE
        } else {
            Color::from_rgba(0.5, 0.5, 0.5, 0.3)
        };

        // Press down effect while busy
        let (inner_size, outer_size) = if is_busy {
            (
                ui::CAPTURE_BUTTON_INNER * 0.85,
                ui::CAPTURE_BUTTON_OUTER * 0.85,
            )
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(capture_button_color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let button = if is_enabled {
            widget::button::custom(button_inner)
                .on_press(Message::Capture)
                .padding(0)
                .width(Length::Fixed(outer_size))
                .height(Length::Fixed(outer_size))
        } else {
            // No on_press handler when disabled (non-clickable)
            widget::button::custom(button_inner)
                .padding(0)
                .width(Length::Fixed(outer_size))
                .height(Length::Fixed(outer_size))
        };

        // Fixed-size wrapper so the layout does not shift when the button shrinks
        let button_wrapper = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER);

        widget::container(button_wrapper)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding([spacing.space_xs, 0])
            .into()
    }

    /// Clear button, only while a still is held
    pub fn build_clear_button(&self) -> Option<Element<'_, Message>> {
        self.mood.captured_frame()?;

        Some(
            widget::button::standard(fl!("clear"))
                .on_press(Message::Clear)
                .into(),
        )
    }
}
