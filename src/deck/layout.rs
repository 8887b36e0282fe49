//! Slide geometry in EMU (914400 per inch) and text sizing rules.

pub const EMU_PER_INCH: i64 = 914_400;

/// 13.33 in x 7.5 in (16:9).
pub const SLIDE_WIDTH: i64 = 12_192_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

const MARGIN: i64 = EMU_PER_INCH / 2;
const GUTTER: i64 = EMU_PER_INCH / 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

pub const TITLE: Rect = Rect::new(MARGIN, 320_040, SLIDE_WIDTH - 2 * MARGIN, 1_005_840);
pub const ACCENT_BAR: Rect = Rect::new(MARGIN, 1_371_600, 1_828_800, 54_864);
pub const IMAGE: Rect = Rect::new(
    SLIDE_WIDTH - MARGIN - 4_419_600,
    1_600_200,
    4_419_600,
    3_474_720,
);

const BODY_X: i64 = 548_640;
const BODY_Y: i64 = 1_600_200;
const BODY_HEIGHT: i64 = 4_800_600;

/// Regions used by a content slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLayout {
    pub title: Rect,
    pub accent_bar: Rect,
    pub body: Rect,
    pub image: Option<Rect>,
}

/// The body narrows to the left of the picture when one is present.
pub fn content_layout(with_image: bool) -> ContentLayout {
    let body_right = if with_image {
        IMAGE.x - GUTTER
    } else {
        SLIDE_WIDTH - MARGIN
    };
    ContentLayout {
        title: TITLE,
        accent_bar: ACCENT_BAR,
        body: Rect::new(BODY_X, BODY_Y, body_right - BODY_X, BODY_HEIGHT),
        image: with_image.then_some(IMAGE),
    }
}

/// Body font size in points: 3 bullets -> 20, 4 -> 18, 5 -> 16.
pub fn body_font_pt(bullet_count: usize) -> u32 {
    (26_i64 - 2 * bullet_count as i64).clamp(14, 24) as u32
}

/// Space after each bullet in points: 3 bullets -> 8, 4 -> 6, 5 -> 4.
pub fn bullet_spacing_pt(bullet_count: usize) -> u32 {
    (2 * (7_i64 - bullet_count as i64)).clamp(2, 12) as u32
}

/// Content slide title size in points; long titles shrink so they stay on
/// two lines.
pub fn title_font_pt(title: &str) -> u32 {
    match title.chars().count() {
        n if n > 50 => 20,
        n if n > 35 => 22,
        n if n > 20 => 24,
        _ => 28,
    }
}

/// Cover slide title size in points.
pub fn cover_title_font_pt(title: &str) -> u32 {
    match title.chars().count() {
        n if n > 60 => 28,
        n if n > 40 => 32,
        n if n > 25 => 36,
        _ => 44,
    }
}
