use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::io::Cursor;
use tracing::warn;

use super::layout::{Anchor, Element, Icon, Scene};
use super::palette::{self, Rgb};
use crate::error::RenderError;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Rasterize `scene` and encode it as PNG.
///
/// Text that cannot be drawn (no usable system font) is skipped with a
/// warning; the canvas size never changes.
pub fn render_png(scene: &Scene) -> Result<Vec<u8>, RenderError> {
    let mut buffer = vec![0u8; scene.width as usize * scene.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        root.fill(&color(scene.background)).map_err(draw_err)?;

        let mut text_failed = false;
        for element in &scene.elements {
            if let Element::Text { .. } = element {
                if let Err(e) = draw_text(&root, element) {
                    if !text_failed {
                        warn!(error = %e, "Skipping text, glyph rendering unavailable");
                    }
                    text_failed = true;
                }
            } else {
                draw_shape(&root, element)?;
            }
        }
        root.present().map_err(draw_err)?;
    }

    let image = RgbImage::from_raw(scene.width, scene.height, buffer).ok_or(RenderError::Buffer)?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

fn draw_text(root: &Area<'_>, element: &Element) -> Result<(), RenderError> {
    let Element::Text {
        x,
        y,
        text,
        size,
        bold,
        color: c,
        alpha,
        anchor,
    } = element
    else {
        return Ok(());
    };
    let weight = if *bold { FontStyle::Bold } else { FontStyle::Normal };
    let h = match anchor {
        Anchor::Left => HPos::Left,
        Anchor::Right => HPos::Right,
    };
    let style = FontDesc::new(FontFamily::SansSerif, *size as f64, weight)
        .color(&color(*c).mix(*alpha))
        .pos(Pos::new(h, VPos::Center));
    root.draw(&Text::new(text.as_str(), (*x, *y), style))
        .map_err(draw_err)
}

fn draw_shape(root: &Area<'_>, element: &Element) -> Result<(), RenderError> {
    match element {
        Element::Rect { x, y, w, h, color: c } => root
            .draw(&Rectangle::new([(*x, *y), (x + w, y + h)], color(*c).filled()))
            .map_err(draw_err),
        Element::Circle {
            cx,
            cy,
            r,
            color: c,
            alpha,
        } => root
            .draw(&Circle::new((*cx, *cy), *r, color(*c).mix(*alpha).filled()))
            .map_err(draw_err),
        Element::Line { from, to, color: c } => root
            .draw(&PathElement::new(vec![*from, *to], color(*c).stroke_width(1)))
            .map_err(draw_err),
        Element::Icon {
            icon,
            cx,
            cy,
            size,
            color: c,
        } => draw_icon(root, *icon, (*cx, *cy), *size, color(*c)),
        Element::Text { .. } => Ok(()),
    }
}

// Icons are plain vector shapes so they never depend on emoji fonts
fn draw_icon(
    root: &Area<'_>,
    icon: Icon,
    (cx, cy): (i32, i32),
    size: i32,
    c: RGBColor,
) -> Result<(), RenderError> {
    let half = size / 2;
    match icon {
        Icon::Star => {
            let outer = half as f64;
            let inner = outer * 0.42;
            let points: Vec<(i32, i32)> = (0..10)
                .map(|i| {
                    let r = if i % 2 == 0 { outer } else { inner };
                    let angle = -PI / 2.0 + i as f64 * PI / 5.0;
                    (
                        cx + (r * angle.cos()).round() as i32,
                        cy + (r * angle.sin()).round() as i32,
                    )
                })
                .collect();
            root.draw(&Polygon::new(points, c.filled())).map_err(draw_err)
        }
        Icon::Fork => {
            let dot = (size / 8).max(2);
            let top = cy - half + dot;
            let bottom = cy + half - dot;
            let left = cx - half / 2;
            let right = cx + half / 2;
            let branches = [
                vec![(left, top), (left, cy), (cx, cy + dot), (cx, bottom)],
                vec![(right, top), (right, cy), (cx, cy + dot)],
            ];
            for path in branches {
                root.draw(&PathElement::new(path, c.stroke_width(2)))
                    .map_err(draw_err)?;
            }
            for point in [(left, top), (right, top), (cx, bottom)] {
                root.draw(&Circle::new(point, dot, c.filled())).map_err(draw_err)?;
            }
            Ok(())
        }
        Icon::Issue => {
            root.draw(&Circle::new((cx, cy), half - 1, c.stroke_width(2)))
                .map_err(draw_err)?;
            root.draw(&Circle::new((cx, cy), (size / 8).max(2), c.filled()))
                .map_err(draw_err)
        }
        Icon::GitHubMark => {
            root.draw(&Circle::new((cx, cy), half, c.filled()))
                .map_err(draw_err)?;
            root.draw(&Circle::new(
                (cx, cy),
                (half * 9 / 20).max(1),
                color(palette::BACKGROUND).filled(),
            ))
            .map_err(draw_err)
        }
        Icon::Folder => {
            let tab = [(cx - half, cy - half + 2), (cx - 2, cy - half + 6)];
            let body = [(cx - half, cy - half + 6), (cx + half, cy + half - 2)];
            root.draw(&Rectangle::new(tab, c.filled())).map_err(draw_err)?;
            root.draw(&Rectangle::new(body, c.filled())).map_err(draw_err)
        }
    }
}
