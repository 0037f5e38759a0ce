// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! This module composes the page selected in the navigation bar:
//! - Mood: camera preview (camera_preview module), mood card, capture controls
//! - Journal and History: placeholders
//! - Settings: settings module

use crate::app::mood::MoodPhase;
use crate::app::state::{AppModel, Message, Page};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        match self.active_page() {
            Page::Mood => self.mood_view(),
            Page::Journal => {
                placeholder_view(Page::Journal.icon_name(), fl!("journal-empty"))
            }
            Page::History => {
                placeholder_view(Page::History.icon_name(), fl!("history-empty"))
            }
            Page::Settings => self.settings_view(),
        }
    }

    fn mood_view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let mut controls = widget::row()
            .push(self.build_capture_button())
            .align_y(Alignment::Center);
        if let Some(clear) = self.build_clear_button() {
            controls = controls.push(clear).spacing(spacing.space_s);
        }

        let mut column = widget::column()
            .push(self.build_camera_preview())
            .push(controls)
            .push(self.build_mood_card());

        if let Some(message) = self.mood.error_message() {
            column = column.push(build_error_banner(message));
        }

        widget::scrollable(
            widget::container(column.spacing(spacing.space_s).max_width(720))
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(spacing.space_m),
        )
        .into()
    }

    /// Mood label with its color badge
    fn build_mood_card(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let label = self.mood.label();
        let color = self.mood.color().to_color();

        let badge = widget::container(widget::Space::new(
            Length::Fixed(ui::MOOD_BADGE_SIZE),
            Length::Fixed(ui::MOOD_BADGE_SIZE),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::MOOD_BADGE_SIZE / 2.0; 4].into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let status = match self.mood.phase() {
            MoodPhase::Capturing => Some(fl!("status-capturing")),
            MoodPhase::Classifying => Some(fl!("status-classifying")),
            MoodPhase::ShowingResult => self
                .last_classification
                .as_ref()
                .filter(|c| c.is_success())
                .and_then(|c| {
                    let confidence = c.confidence?;
                    Some(fl!(
                        "status-result",
                        confidence = format!("{:.0}", confidence * 100.0),
                        time = c.classified_at.format("%H:%M").to_string()
                    ))
                }),
            _ => None,
        };

        let mut text_column = widget::column()
            .push(widget::text(fl!("mood-heading")).size(14))
            .push(
                widget::text(label)
                    .size(ui::MOOD_TEXT_SIZE)
                    .font(cosmic::font::bold()),
            )
            .spacing(spacing.space_xxs);
        if let Some(status) = status {
            text_column = text_column.push(widget::text(status).size(12));
        }

        widget::container(
            widget::row()
                .push(badge)
                .push(text_column)
                .spacing(spacing.space_m)
                .align_y(Alignment::Center),
        )
        .width(Length::Fill)
        .padding(spacing.space_s)
        .class(cosmic::theme::Container::Card)
        .into()
    }
}

fn build_error_banner<'a>(message: &'a str) -> Element<'a, Message> {
    let spacing = cosmic::theme::spacing();

    widget::container(widget::text(message).size(14))
        .width(Length::Fill)
        .padding(spacing.space_s)
        .style(|theme: &cosmic::Theme| widget::container::Style {
            background: Some(Background::Color(Color::from_rgba(
                0.75,
                0.1,
                0.1,
                ui::OVERLAY_BACKGROUND_ALPHA,
            ))),
            text_color: Some(Color::WHITE),
            border: cosmic::iced::Border {
                radius: theme.cosmic().corner_radii.radius_s.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

fn placeholder_view<'a>(icon_name: &'static str, text: String) -> Element<'a, Message> {
    let spacing = cosmic::theme::spacing();

    widget::container(
        widget::column()
            .push(widget::icon::from_name(icon_name).size(64).icon())
            .push(widget::text(text).size(16))
            .spacing(spacing.space_s)
            .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
