use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::geometry::{CropRect, ZOOM_STEP};
use crate::Message;

/// Overlay for the primary editing surface.
///
/// Draws the active crop rectangle over the source image and turns raw
/// mouse events into application messages; no session state lives here.
pub struct CropCanvas {
    /// Rectangle currently under edit, in image pixel coordinates
    pub rect: CropRect,
}

impl Program<Message> for CropCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let top_left = Point::new(self.rect.left as f32, self.rect.top as f32);
        let size = Size::new(self.rect.width() as f32, self.rect.height() as f32);
        frame.stroke(
            &canvas::Path::rectangle(top_left, size),
            canvas::Stroke::default()
                .with_color(Color::from_rgb(1.0, 0.0, 0.0))
                .with_width(2.0),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Pointer tracking drives the rectangle and the live preview
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let Some(position) = cursor.position_in(bounds) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::PointerMoved(position.x as i32, position.y as i32)),
                    );
                }
            }

            // Left click confirms the active crop slot
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if cursor.position_in(bounds).is_some() {
                    return (canvas::event::Status::Captured, Some(Message::PrimaryClicked));
                }
            }

            // Right click navigates back to the previous image
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
                if cursor.position_in(bounds).is_some() {
                    return (canvas::event::Status::Captured, Some(Message::SecondaryClicked));
                }
            }

            // Wheel maps to the same 0.1 steps as the z/x keys.
            // Scroll up zooms in; swap the signs here to invert the wheel.
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                if y != 0.0 {
                    let step = if y > 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ZoomAdjusted(step)),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}
