use iced::widget::{column, horizontal_space, row, text, Image};
use iced::{Alignment, Color, Element, Length};

use crate::media::preview::PreviewHandle;
use crate::state::data::format_size;
use crate::Message;

/// Inline error color
const ERROR_COLOR: Color = Color::from_rgb(0.94, 0.27, 0.27);

/// A titled preview with an optional action button in the header
pub fn image_panel<'a>(
    title: &'a str,
    preview: &PreviewHandle,
    dimensions: Option<(u32, u32)>,
    action: Option<Element<'a, Message>>,
) -> Element<'a, Message> {
    let mut header = row![text(title).size(20), horizontal_space()]
        .spacing(10)
        .align_y(Alignment::Center);
    if let Some(action) = action {
        header = header.push(action);
    }

    let caption = match dimensions {
        Some((width, height)) => format!("{} x {} px, {}", width, height, format_size(preview.bytes().len())),
        None => format_size(preview.bytes().len()),
    };

    column![
        header,
        Image::new(preview.image().clone())
            .width(Length::Fill)
            .height(Length::Fixed(400.0)),
        text(caption).size(12),
    ]
    .spacing(8)
    .into()
}

/// Red inline error line
pub fn error_line<'a>(message: &'a str) -> Element<'a, Message> {
    text(message).size(16).color(ERROR_COLOR).into()
}
