// SPDX-License-Identifier: MPL-2.0

//! Settings page view

use crate::app::state::{AppModel, Message};
use crate::config::AppTheme;
use crate::constants::{InputLayout, app_info};
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Create the settings page
    ///
    /// Shows theme, camera and emotion model options.
    pub fn settings_view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = AppTheme::ALL
            .iter()
            .position(|theme| *theme == self.config.app_theme);
        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            theme_index,
            Message::SetAppTheme,
        );

        // Mirror preview toggle
        let mirror_toggle =
            widget::toggler(self.config.mirror_preview).on_toggle(|_| Message::ToggleMirrorPreview);

        let camera_name = self
            .mood
            .device()
            .map(|device| device.name.clone())
            .or_else(|| self.config.last_camera_path.clone())
            .unwrap_or_else(|| fl!("settings-camera-none"));

        let layout_index = InputLayout::ALL
            .iter()
            .position(|layout| *layout == self.config.model_input_layout);
        let layout_dropdown = widget::dropdown(
            &self.layout_dropdown_options,
            layout_index,
            Message::SetInputLayout,
        );

        let model_buttons = widget::row()
            .push(
                widget::button::standard(fl!("settings-model-choose"))
                    .on_press(Message::PickModelFile),
            )
            .push(widget::horizontal_space().width(spacing.space_xs))
            .push(
                widget::button::text(fl!("settings-model-reset")).on_press(Message::ResetModelPath),
            )
            .spacing(0);

        // Version info string
        let version_info = if app_info::is_flatpak() {
            format!("Version {} (Flatpak)", app_info::version())
        } else {
            format!("Version {}", app_info::version())
        };

        let mut settings_column = widget::column()
            .push(section_title(fl!("settings-appearance")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-camera")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(camera_name).size(14))
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(widget::text(fl!("settings-mirror-preview")).size(14))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(mirror_toggle)
                    .align_y(Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-model")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(
                widget::text(self.config.model_path.as_str())
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .push(widget::vertical_space().height(spacing.space_xs))
            .push(model_buttons)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("settings-model-layout")).size(14))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(layout_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("settings-model-labels")).size(14))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(self.config.model_labels.join(", ")).size(12));

        if cfg!(debug_assertions) {
            let current = self.mood.label();
            let emotion_index = self
                .emotion_dropdown_options
                .iter()
                .position(|label| label.eq_ignore_ascii_case(&current));

            settings_column = settings_column
                .push(widget::vertical_space().height(spacing.space_l))
                .push(widget::divider::horizontal::default())
                .push(widget::vertical_space().height(spacing.space_s))
                .push(section_title(fl!("settings-debug")))
                .push(widget::vertical_space().height(spacing.space_xxs))
                .push(widget::text(fl!("settings-debug-override")).size(14))
                .push(widget::vertical_space().height(spacing.space_xxs))
                .push(widget::dropdown(
                    &self.emotion_dropdown_options,
                    emotion_index,
                    Message::OverrideEmotion,
                ));
        }

        let settings_column = settings_column
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .max_width(600);

        widget::scrollable(
            widget::container(settings_column)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(spacing.space_m),
        )
        .into()
    }
}

fn section_title<'a>(text: String) -> Element<'a, Message> {
    widget::text(text).size(16).font(cosmic::font::bold()).into()
}
