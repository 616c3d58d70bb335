//! Frame planning and rendering.
//!
//! A [`Frame`] is everything one loop iteration produces from a joystick
//! reading and the control snapshot: the square position, the LED levels and
//! the border to draw. [`Frame::draw`] renders it onto any monochrome
//! `embedded-graphics` target; the caller flushes.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};

use crate::constants::{controls, display};
use crate::controls::ControlSnapshot;
use crate::joystick::{JoystickReading, LedLevels, SquarePosition};

/// Decoration drawn around the play area
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
#[repr(u8)]
pub enum BorderStyle {
    /// No border
    None = 0,
    /// Outline drawn with one rectangle primitive
    Rectangle = 1,
    /// The same outline drawn as four separate lines
    Lines = 2,
}

impl BorderStyle {
    /// Style for a stored index; out-of-range indices wrap
    pub const fn from_index(index: u8) -> Self {
        match index % controls::BORDER_STYLE_COUNT {
            0 => Self::None,
            1 => Self::Rectangle,
            _ => Self::Lines,
        }
    }

    pub const fn next(self) -> Self {
        Self::from_index(self as u8 + 1)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rectangle => "rectangle",
            Self::Lines => "lines",
        }
    }
}

/// One iteration's worth of output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Frame {
    pub reading: JoystickReading,
    pub square: SquarePosition,
    pub leds: LedLevels,
    pub border: BorderStyle,
}

impl Frame {
    pub fn plan(reading: JoystickReading, controls: ControlSnapshot) -> Self {
        Self {
            reading,
            square: reading.square_position(),
            leds: reading.led_levels(controls.pwm_active),
            border: controls.border_style,
        }
    }

    /// Clear the target, draw the square, then the border.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;

        Rectangle::new(
            Point::new(self.square.x, self.square.y),
            Size::new(display::SQUARE_SIZE, display::SQUARE_SIZE),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

        draw_border(target, self.border)
    }
}

fn draw_border<D>(target: &mut D, style: BorderStyle) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let top_left = Point::new(display::BORDER_LEFT, display::BORDER_TOP);
    let top_right = Point::new(display::BORDER_RIGHT, display::BORDER_TOP);
    let bottom_left = Point::new(display::BORDER_LEFT, display::BORDER_BOTTOM);
    let bottom_right = Point::new(display::BORDER_RIGHT, display::BORDER_BOTTOM);

    match style {
        BorderStyle::None => Ok(()),
        BorderStyle::Rectangle => Rectangle::with_corners(top_left, bottom_right)
            .into_styled(stroke)
            .draw(target),
        BorderStyle::Lines => {
            Line::new(top_left, top_right).into_styled(stroke).draw(target)?;
            Line::new(bottom_left, bottom_right)
                .into_styled(stroke)
                .draw(target)?;
            Line::new(top_left, bottom_left).into_styled(stroke).draw(target)?;
            Line::new(top_right, bottom_right)
                .into_styled(stroke)
                .draw(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    const W: usize = display::WIDTH as usize;
    const H: usize = display::HEIGHT as usize;

    /// 128x64 framebuffer that allows overdraw and records out-of-bounds draws
    struct TestFrame {
        pixels: [[bool; W]; H],
        out_of_bounds: usize,
    }

    impl TestFrame {
        fn new() -> Self {
            Self {
                pixels: [[false; W]; H],
                out_of_bounds: 0,
            }
        }

        fn filled() -> Self {
            Self {
                pixels: [[true; W]; H],
                out_of_bounds: 0,
            }
        }

        fn is_on(&self, x: i32, y: i32) -> bool {
            self.pixels[y as usize][x as usize]
        }

        fn lit(&self) -> usize {
            self.pixels.iter().flatten().filter(|on| **on).count()
        }
    }

    impl DrawTarget for TestFrame {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(coord, color) in pixels {
                if (0..display::WIDTH).contains(&coord.x) && (0..display::HEIGHT).contains(&coord.y)
                {
                    self.pixels[coord.y as usize][coord.x as usize] = color.is_on();
                } else {
                    self.out_of_bounds += 1;
                }
            }
            Ok(())
        }
    }

    impl OriginDimensions for TestFrame {
        fn size(&self) -> Size {
            Size::new(display::WIDTH as u32, display::HEIGHT as u32)
        }
    }

    fn snapshot(border_style: BorderStyle) -> ControlSnapshot {
        ControlSnapshot {
            pwm_active: true,
            border_style,
        }
    }

    fn render(reading: JoystickReading, border: BorderStyle) -> TestFrame {
        let mut target = TestFrame::new();
        Frame::plan(reading, snapshot(border))
            .draw(&mut target)
            .unwrap();
        target
    }

    fn is_border_pixel(x: i32, y: i32) -> bool {
        let on_vertical = (x == display::BORDER_LEFT || x == display::BORDER_RIGHT)
            && (display::BORDER_TOP..=display::BORDER_BOTTOM).contains(&y);
        let on_horizontal = (y == display::BORDER_TOP || y == display::BORDER_BOTTOM)
            && (display::BORDER_LEFT..=display::BORDER_RIGHT).contains(&x);
        on_vertical || on_horizontal
    }

    #[test]
    fn border_style_wraps() {
        assert_eq!(BorderStyle::None.next(), BorderStyle::Rectangle);
        assert_eq!(BorderStyle::Rectangle.next(), BorderStyle::Lines);
        assert_eq!(BorderStyle::Lines.next(), BorderStyle::None);
        assert_eq!(BorderStyle::from_index(4), BorderStyle::Rectangle);
    }

    #[test]
    fn centered_stick_draws_square_at_rest_position() {
        let frame = Frame::plan(JoystickReading::centered(0), snapshot(BorderStyle::None));
        assert_eq!(frame.square, SquarePosition { x: 64, y: 32 });
        assert_eq!(frame.leds, LedLevels::OFF);

        let mut target = TestFrame::new();
        frame.draw(&mut target).unwrap();
        assert_eq!(target.lit(), 64);
        for y in 32..40 {
            for x in 64..72 {
                assert!(target.is_on(x, y), "({x}, {y}) should be lit");
            }
        }
        assert!(!target.is_on(63, 32));
        assert!(!target.is_on(72, 39));
    }

    #[test]
    fn draw_clears_previous_contents() {
        let mut target = TestFrame::filled();
        Frame::plan(JoystickReading::centered(0), snapshot(BorderStyle::None))
            .draw(&mut target)
            .unwrap();
        assert_eq!(target.lit(), 64);
    }

    #[test]
    fn border_styles_light_the_same_outline() {
        // Square at rest sits clear of the outline
        let reading = JoystickReading::centered(0);
        let rectangle = render(reading, BorderStyle::Rectangle);
        let lines = render(reading, BorderStyle::Lines);
        assert_eq!(rectangle.pixels, lines.pixels);

        for y in 0..display::HEIGHT {
            for x in 0..display::WIDTH {
                if is_border_pixel(x, y) {
                    assert!(rectangle.is_on(x, y), "border pixel ({x}, {y}) missing");
                }
            }
        }
        // Rows above the inset stay dark
        for y in 0..display::BORDER_TOP {
            for x in 0..display::WIDTH {
                assert!(!rectangle.is_on(x, y));
            }
        }
    }

    #[test]
    fn no_border_draws_only_the_square() {
        let plain = render(JoystickReading::centered(0), BorderStyle::None);
        for y in 0..display::HEIGHT {
            for x in 0..display::WIDTH {
                if is_border_pixel(x, y) {
                    assert!(!plain.is_on(x, y));
                }
            }
        }
    }

    #[test]
    fn square_never_leaves_the_screen() {
        for (x_raw, y_raw) in [(0, 0), (0, 4095), (4095, 0), (4095, 4095), (1000, 3000)] {
            let target = render(JoystickReading::new(x_raw, y_raw, 0), BorderStyle::Lines);
            assert_eq!(target.out_of_bounds, 0, "({x_raw}, {y_raw})");
        }
    }

    #[test]
    fn disabled_pwm_keeps_square_moving() {
        let reading = JoystickReading::new(0, 4095, 0);
        let frame = Frame::plan(
            reading,
            ControlSnapshot {
                pwm_active: false,
                border_style: BorderStyle::Lines,
            },
        );
        assert_eq!(frame.leds, LedLevels::OFF);
        assert_eq!(frame.square, SquarePosition { x: 119, y: 56 });
        assert_eq!(frame.border, BorderStyle::Lines);

        let enabled = Frame::plan(reading, snapshot(BorderStyle::Lines));
        assert_eq!(enabled.leds, reading.led_levels(true));
    }
}
