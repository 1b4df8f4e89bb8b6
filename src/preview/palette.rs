/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0x0d, 0x11, 0x17);
pub const TEXT: Rgb = Rgb(0xf0, 0xf6, 0xfc);
pub const ACCENT: Rgb = Rgb(0x58, 0xa6, 0xff);
pub const MUTED: Rgb = Rgb(0x8b, 0x94, 0x9e);
pub const SUBTLE: Rgb = Rgb(0x6e, 0x76, 0x81);
pub const BORDER: Rgb = Rgb(0x21, 0x26, 0x2d);
pub const STAR: Rgb = Rgb(0xe3, 0xb3, 0x41);
pub const UNKNOWN_LANGUAGE: Rgb = Rgb(0x58, 0x60, 0x69);

// GitHub linguist colors for the common languages
const LANGUAGE_COLORS: &[(&str, Rgb)] = &[
    ("JavaScript", Rgb(0xf1, 0xe0, 0x5a)),
    ("TypeScript", Rgb(0x31, 0x78, 0xc6)),
    ("Python", Rgb(0x35, 0x72, 0xa5)),
    ("Java", Rgb(0xb0, 0x72, 0x19)),
    ("Go", Rgb(0x00, 0xad, 0xd8)),
    ("Rust", Rgb(0xde, 0xa5, 0x84)),
    ("C", Rgb(0x55, 0x55, 0x55)),
    ("C++", Rgb(0xf3, 0x4b, 0x7d)),
    ("PHP", Rgb(0x4f, 0x5d, 0x95)),
    ("Ruby", Rgb(0x70, 0x15, 0x16)),
    ("Swift", Rgb(0xfa, 0x73, 0x43)),
    ("Kotlin", Rgb(0xa9, 0x7b, 0xff)),
    ("Dart", Rgb(0x00, 0xb4, 0xab)),
    ("HTML", Rgb(0xe3, 0x4c, 0x26)),
    ("CSS", Rgb(0x15, 0x72, 0xb6)),
    ("Shell", Rgb(0x89, 0xe0, 0x51)),
];

/// Swatch color for a language; unknown languages get neutral gray.
pub fn language_color(language: &str) -> Rgb {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_LANGUAGE)
}
