//! Front elevation renderer.
//!
//! Draws the opening as a unit square (all parts as fractions of the opening, not
//! to scale) with shaded liners and dropdown, dashed doors, thickness labels and the
//! standard fixing notes. Output is a self-contained SVG document.

use serde::Serialize;

use crate::wardrobe::opening::Opening;
use crate::wardrobe::rules::{BASE_SIDE_LINER_THICKNESS_MM, BOTTOM_LINER_THICKNESS_MM};
use crate::wardrobe::solver::{FloorPlanGuidance, SolveResult};

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

/// Pixels per opening width/height.
const SCALE: f64 = 400.0;
const X_MIN: f64 = -0.55;
const X_MAX: f64 = 1.55;
const Y_MIN: f64 = -0.30;
const Y_MAX: f64 = 1.25;
const FONT_SIZE: f64 = 11.0;
/// Rough glyph advance at `FONT_SIZE`, used to size note boxes.
const CHAR_WIDTH: f64 = 6.2;
const LINE_HEIGHT: f64 = 14.0;

const SIDE_LINER_FIXINGS: &[&str] = &[
    "Side liners fixings -",
    "200mm in from either end",
    "and then two in the middle",
    "(equally spaced)",
    "so 4x fixings total.",
];
const SUB_CILL_FIXINGS: &[&str] = &[
    "Sub-cill to floor - fixing every 500mm",
    "Sub-cill to carpet - fixing every 200mm",
];
const TRACK_FIXINGS: &[&str] = &[
    "Bottom track fixing - 50-80mm in from ends",
    "and then every 800mm of track span.",
];

// ────────────────────────────────────────────────────────────────────────────
// Input and layout
// ────────────────────────────────────────────────────────────────────────────

/// Numbers the elevation needs. Anything else on the drawing is fixed text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramInput {
    pub opening_width_mm: f64,
    pub opening_height_mm: f64,
    pub bottom_liner_mm: f64,
    pub side_left_mm: f64,
    pub side_right_mm: f64,
    pub dropdown_height_mm: f64,
    pub door_height_mm: f64,
    pub door_count: u32,
    pub door_width_mm: f64,
}

impl DiagramInput {
    pub fn new(opening: &Opening, result: &SolveResult) -> Self {
        DiagramInput {
            opening_width_mm: f64::from(opening.width_mm),
            opening_height_mm: f64::from(opening.height_mm),
            bottom_liner_mm: BOTTOM_LINER_THICKNESS_MM,
            side_left_mm: result.side_left_mm,
            side_right_mm: result.side_right_mm,
            dropdown_height_mm: result.dropdown_height_mm,
            door_height_mm: result.door_height_mm,
            door_count: opening.door_count,
            door_width_mm: result.door_width_mm,
        }
    }
}

/// Elevation geometry in opening-relative units (0..1 on both axes, y up).
#[derive(Debug, Clone, PartialEq)]
pub struct Elevation {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub dropdown: f64,
    pub door_height: f64,
    pub door_width: f64,
    pub door_count: u32,
}

impl Elevation {
    pub fn from_input(input: &DiagramInput) -> Self {
        let width = input.opening_width_mm.max(1.0);
        let height = input.opening_height_mm.max(1.0);

        let left = (input.side_left_mm.max(0.0) / width).min(0.5);
        let right = (input.side_right_mm.max(0.0) / width).min(0.5);
        let bottom = (input.bottom_liner_mm.max(0.0) / height).min(1.0);
        let dropdown = (input.dropdown_height_mm.max(0.0) / height).min(1.0 - bottom);

        // Doors stop under the dropdown.
        let usable_height = (1.0 - bottom - dropdown).max(0.0);
        let door_height = (input.door_height_mm.max(0.0) / height).min(usable_height);

        let door_count = input.door_count.max(1);
        let available_span = (1.0 - left - right).max(0.0);
        let mut door_width = input.door_width_mm.max(0.0) / width;
        let run = door_width * f64::from(door_count);
        if run > available_span && run > 0.0 {
            door_width *= available_span / run;
        }

        Elevation {
            left,
            right,
            bottom,
            dropdown,
            door_height,
            door_width,
            door_count,
        }
    }

    fn span(&self) -> f64 {
        1.0 - self.left - self.right
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn render_elevation(input: &DiagramInput) -> String {
    let geo = Elevation::from_input(input);
    let mut svg = Svg::new();

    svg.rect(0.0, 0.0, 1.0, 1.0, Style::Outline);

    // Liners and dropdown
    svg.rect(0.0, geo.bottom, geo.left, 1.0 - geo.bottom, Style::Shaded);
    svg.rect(1.0 - geo.right, geo.bottom, geo.right, 1.0 - geo.bottom, Style::Shaded);
    svg.rect(geo.left, 0.0, geo.span(), geo.bottom, Style::Shaded);
    if geo.dropdown > 0.0 {
        svg.rect(geo.left, 1.0 - geo.dropdown, geo.span(), geo.dropdown, Style::Shaded);
    }

    let mut x = geo.left;
    for _ in 0..geo.door_count {
        svg.rect(x, geo.bottom, geo.door_width, geo.door_height, Style::Dashed);
        x += geo.door_width;
    }

    // Thickness labels
    if input.side_left_mm > 0.0 {
        let thickness = format!("{:.0}mm", input.side_left_mm);
        svg.label(
            geo.left / 2.0,
            geo.bottom + 0.06,
            &[thickness.as_str(), liner_name(input.side_left_mm)],
        );
    }
    if input.side_right_mm > 0.0 {
        let thickness = format!("{:.0}mm", input.side_right_mm);
        svg.label(
            1.0 - geo.right / 2.0,
            geo.bottom + 0.06,
            &[thickness.as_str(), liner_name(input.side_right_mm)],
        );
    }
    if input.bottom_liner_mm > 0.0 {
        let thickness = format!("{:.0}mm", input.bottom_liner_mm);
        svg.label(0.5, geo.bottom / 2.0, &[thickness.as_str(), "Sub-cill"]);
    }
    if input.dropdown_height_mm > 0.0 {
        let thickness = format!("{:.0}mm", input.dropdown_height_mm);
        svg.label(
            0.5,
            1.0 - geo.dropdown / 2.0,
            &[thickness.as_str(), "Dropdown"],
        );
    }

    // Fixing notes
    svg.note(-0.42, 0.78, Anchor::End, SIDE_LINER_FIXINGS);
    svg.note(0.5, -0.20, Anchor::Middle, SUB_CILL_FIXINGS);
    svg.note(1.08, geo.bottom + 0.20, Anchor::Start, TRACK_FIXINGS);
    svg.arrow((1.07, geo.bottom + 0.20), (0.5, geo.bottom + 0.02));

    // Overall dimensions
    svg.dimension((-0.22, 0.0), (-0.22, 1.0));
    svg.text(-0.30, 0.5, &format!("{:.0}mm", input.opening_height_mm), Anchor::Middle, true);
    svg.dimension((0.0, -0.08), (1.0, -0.08));
    svg.text(0.5, -0.13, &format!("{:.0}mm", input.opening_width_mm), Anchor::Middle, false);

    svg.finish()
}

/// Placeholder drawing for floor-plan-only housebuilders: the guidance text, no elevation.
pub fn render_guidance(guidance: &FloorPlanGuidance) -> String {
    let mut svg = Svg::new();
    let lines = [
        format!("{} - refer to floor plan", guidance.housebuilder),
        format!("Dropdown {:.0}mm", guidance.dropdown_height_mm),
        format!("Door height {:.0}mm", guidance.door_height_mm),
    ];
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    svg.rect(0.0, 0.0, 1.0, 1.0, Style::Outline);
    svg.note(0.5, 0.6, Anchor::Middle, &lines);
    svg.finish()
}

fn liner_name(thickness_mm: f64) -> &'static str {
    if thickness_mm > BASE_SIDE_LINER_THICKNESS_MM {
        "T-liner"
    } else {
        "Liner"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SVG builder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Style {
    Outline,
    Shaded,
    Dashed,
}

#[derive(Clone, Copy)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

struct Svg {
    body: String,
}

fn px(x: f64) -> f64 {
    (x - X_MIN) * SCALE
}

fn py(y: f64) -> f64 {
    (Y_MAX - y) * SCALE
}

impl Svg {
    fn new() -> Self {
        let w = (X_MAX - X_MIN) * SCALE;
        let h = (Y_MAX - Y_MIN) * SCALE;
        let mut body = String::new();
        body.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif" font-size="{FONT_SIZE}">
<defs><marker id="arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M0,0 L10,5 L0,10 z" fill="black"/></marker></defs>
<rect x="0" y="0" width="{w:.0}" height="{h:.0}" fill="white"/>
"#
        ));
        Svg { body }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: Style) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let attrs = match style {
            Style::Outline => r#"fill="none" stroke="black" stroke-width="2""#,
            Style::Shaded => r##"fill="#1f77b4" fill-opacity="0.25" stroke="none""##,
            Style::Dashed => r#"fill="none" stroke="black" stroke-width="1" stroke-dasharray="6 4""#,
        };
        self.body.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" {attrs}/>\n",
            px(x),
            py(y + h),
            w * SCALE,
            h * SCALE
        ));
    }

    fn text(&mut self, x: f64, y: f64, content: &str, anchor: Anchor, vertical: bool) {
        let (cx, cy) = (px(x), py(y));
        let rotate = if vertical {
            format!(" transform=\"rotate(-90 {cx:.1} {cy:.1})\"")
        } else {
            String::new()
        };
        self.body.push_str(&format!(
            "<text x=\"{cx:.1}\" y=\"{cy:.1}\" text-anchor=\"{}\" dominant-baseline=\"middle\"{rotate}>{}</text>\n",
            anchor.as_str(),
            escape(content)
        ));
    }

    /// Small boxed label centred on a point.
    fn label(&mut self, x: f64, y: f64, lines: &[&str]) {
        self.boxed_lines(px(x), py(y), Anchor::Middle, lines, 0.8);
    }

    /// Boxed multi-line note anchored at a point.
    fn note(&mut self, x: f64, y: f64, anchor: Anchor, lines: &[&str]) {
        self.boxed_lines(px(x), py(y), anchor, lines, 1.0);
    }

    fn boxed_lines(&mut self, cx: f64, cy: f64, anchor: Anchor, lines: &[&str], stroke: f64) {
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
        let box_w = longest * CHAR_WIDTH + 12.0;
        let box_h = lines.len() as f64 * LINE_HEIGHT + 8.0;
        let left = match anchor {
            Anchor::Start => cx,
            Anchor::Middle => cx - box_w / 2.0,
            Anchor::End => cx - box_w,
        };
        let top = cy - box_h / 2.0;
        self.body.push_str(&format!(
            "<rect x=\"{left:.1}\" y=\"{top:.1}\" width=\"{box_w:.1}\" height=\"{box_h:.1}\" rx=\"4\" fill=\"white\" stroke=\"black\" stroke-width=\"{stroke}\"/>\n"
        ));
        let text_x = left + box_w / 2.0;
        self.body.push_str(&format!(
            "<text x=\"{text_x:.1}\" y=\"{:.1}\" text-anchor=\"middle\">",
            top + 4.0 + LINE_HEIGHT * 0.8
        ));
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { LINE_HEIGHT };
            self.body.push_str(&format!(
                "<tspan x=\"{text_x:.1}\" dy=\"{dy:.0}\">{}</tspan>",
                escape(line)
            ));
        }
        self.body.push_str("</text>\n");
    }

    fn arrow(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.body.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"black\" stroke-width=\"1.3\" marker-end=\"url(#arrow)\"/>\n",
            px(from.0),
            py(from.1),
            px(to.0),
            py(to.1)
        ));
    }

    /// Double-headed dimension line.
    fn dimension(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.body.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"black\" stroke-width=\"1\" marker-start=\"url(#arrow)\" marker-end=\"url(#arrow)\"/>\n",
            px(from.0),
            py(from.1),
            px(to.0),
            py(to.1)
        ));
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>\n");
        self.body
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
