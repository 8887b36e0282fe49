use crate::models::outline::{BackgroundColor, Style};

/// Colors and typeface applied to every slide of one deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: [u8; 3],
    pub body: [u8; 3],
    pub accent: [u8; 3],
    pub font: &'static str,
}

const PINK_CREATIVE: Palette = Palette {
    title: [150, 30, 80],
    body: [60, 40, 50],
    accent: [200, 80, 150],
    font: "Trebuchet MS",
};

const BLUE_PROFESSIONAL: Palette = Palette {
    title: [10, 50, 120],
    body: [30, 30, 50],
    accent: [80, 130, 255],
    font: "Calibri",
};

const DARK_TITLE: [u8; 3] = [255, 255, 255];
const DARK_BODY: [u8; 3] = [240, 240, 240];

/// Named background presets offered to the UI.
pub const BACKGROUND_PRESETS: [(&str, &str); 10] = [
    ("Pure White", "#FFFFFF"),
    ("Soft Gray", "#F8FAFC"),
    ("Warm White", "#FEF7EE"),
    ("Ice Blue", "#F0F9FF"),
    ("Mint Cream", "#F0FDF4"),
    ("Lavender", "#FDF4FF"),
    ("Peach", "#FFF7ED"),
    ("Dark Mode", "#1E293B"),
    ("Professional Blue", "#F0F7FF"),
    ("Executive Gray", "#F8FAFC"),
];

/// Style palette, with text colors lifted for dark backgrounds.
pub fn palette(style: Style, background: BackgroundColor) -> Palette {
    let base = match style {
        Style::PinkCreative => PINK_CREATIVE,
        Style::BlueProfessional => BLUE_PROFESSIONAL,
    };
    if background.is_dark() {
        Palette {
            title: DARK_TITLE,
            body: DARK_BODY,
            ..base
        }
    } else {
        base
    }
}

/// `RRGGBB` as DrawingML `srgbClr` expects it.
pub fn srgb(rgb: [u8; 3]) -> String {
    hex::encode_upper(rgb)
}
