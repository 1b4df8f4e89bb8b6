//! Pure layout of the preview card.
//!
//! [`compose`] turns repository metadata into a [`Scene`]: a flat list of
//! shapes, text runs and icons on a fixed 1200×400 canvas. Nothing here
//! touches pixels, so the layout is deterministic and cheap to test.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::palette::{self, Rgb};
use crate::github::RepositoryMetadata;

pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 400;
const PADDING: i32 = 30;
const RIGHT_EDGE: i32 = WIDTH as i32 - PADDING;
const FOOTER_TOP: i32 = 300;

const MAX_TITLE_CHARS: usize = 48;
const MAX_DESCRIPTION_CHARS: usize = 90;
const MAX_LANGUAGE_CHARS: usize = 24;
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Folder,
    Star,
    Fork,
    Issue,
    GitHubMark,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgb,
    },
    Circle {
        cx: i32,
        cy: i32,
        r: i32,
        color: Rgb,
        alpha: f64,
    },
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Rgb,
    },
    // y is the vertical center of the run
    Text {
        x: i32,
        y: i32,
        text: String,
        size: u32,
        bold: bool,
        color: Rgb,
        alpha: f64,
        anchor: Anchor,
    },
    Icon {
        icon: Icon,
        cx: i32,
        cy: i32,
        size: i32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Lay out the card for `repo` with its already-ranked `languages`.
pub fn compose(repo: &RepositoryMetadata, languages: &[String], date_format: &str) -> Scene {
    let mut elements = Vec::new();

    // Header: avatar bubble and owner/name
    elements.push(Element::Circle {
        cx: PADDING + 25,
        cy: PADDING + 25,
        r: 25,
        color: palette::BORDER,
        alpha: 1.0,
    });
    elements.push(Element::Icon {
        icon: Icon::Folder,
        cx: PADDING + 25,
        cy: PADDING + 25,
        size: 24,
        color: palette::ACCENT,
    });
    elements.push(text(
        PADDING + 65,
        PADDING + 25,
        truncate(&repo.full_name(), MAX_TITLE_CHARS),
        32,
        true,
        palette::ACCENT,
        Anchor::Left,
    ));

    let mut y = PADDING + 80;
    if let Some(description) = repo.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        elements.push(text(
            PADDING,
            y,
            truncate(description, MAX_DESCRIPTION_CHARS),
            18,
            false,
            palette::MUTED,
            Anchor::Left,
        ));
        y += 40;
    }

    for (index, language) in languages.iter().enumerate() {
        let primary = index == 0;
        let (radius, size, alpha) = if primary { (7, 16, 1.0) } else { (5, 14, 0.7) };
        elements.push(Element::Circle {
            cx: PADDING + 7,
            cy: y,
            r: radius,
            color: palette::language_color(language),
            alpha,
        });
        elements.push(Element::Text {
            x: PADDING + 22,
            y,
            text: truncate(language, MAX_LANGUAGE_CHARS),
            size,
            bold: false,
            color: palette::TEXT,
            alpha,
            anchor: Anchor::Left,
        });
        y += 30;
    }

    // Stats column, right aligned with the icon last
    let stats = [
        (repo.stargazers_count, Icon::Star, palette::STAR),
        (repo.forks_count, Icon::Fork, palette::MUTED),
        (repo.open_issues_count, Icon::Issue, palette::MUTED),
    ];
    for (row, (value, icon, icon_color)) in stats.into_iter().enumerate() {
        let cy = 110 + row as i32 * 55;
        elements.push(text(
            RIGHT_EDGE - 36,
            cy,
            format_count(value),
            22,
            false,
            palette::TEXT,
            Anchor::Right,
        ));
        elements.push(Element::Icon {
            icon,
            cx: RIGHT_EDGE - 11,
            cy,
            size: 22,
            color: icon_color,
        });
    }

    // Footer
    elements.push(Element::Line {
        from: (PADDING, FOOTER_TOP),
        to: (RIGHT_EDGE, FOOTER_TOP),
        color: palette::BORDER,
    });
    elements.push(text(
        PADDING,
        FOOTER_TOP + 27,
        format!("Created: {}", format_date(repo.created_at, date_format)),
        14,
        false,
        palette::MUTED,
        Anchor::Left,
    ));
    elements.push(text(
        PADDING,
        FOOTER_TOP + 50,
        format!("Updated: {}", format_date(repo.updated_at, date_format)),
        14,
        false,
        palette::MUTED,
        Anchor::Left,
    ));
    elements.push(text(
        RIGHT_EDGE - 24,
        FOOTER_TOP + 38,
        "GitHub Repository".to_string(),
        14,
        false,
        palette::SUBTLE,
        Anchor::Right,
    ));
    elements.push(Element::Icon {
        icon: Icon::GitHubMark,
        cx: RIGHT_EDGE - 8,
        cy: FOOTER_TOP + 38,
        size: 16,
        color: palette::SUBTLE,
    });

    Scene {
        width: WIDTH,
        height: HEIGHT,
        background: palette::BACKGROUND,
        elements,
    }
}

fn text(x: i32, y: i32, text: String, size: u32, bold: bool, color: Rgb, anchor: Anchor) -> Element {
    Element::Text {
        x,
        y,
        text,
        size,
        bold,
        color,
        alpha: 1.0,
        anchor,
    }
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// 1234567 -> "1,234,567"
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format with a strftime pattern, falling back to ISO dates if the pattern
/// is unusable.
pub fn format_date(at: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(pattern)).is_ok() {
        return out;
    }
    at.format(FALLBACK_DATE_FORMAT).to_string()
}
