use circle_core::{CircleAnalysis, Point, grade_letter, score_color};
use png::{BitDepth, ColorType, Encoder};
use serde::{Deserialize, Serialize};

/// Report card pixel dimensions.
pub const REPORT_W: u32 = 640;
pub const REPORT_H: u32 = 800;

// Box the stroke gets rescaled into, and the text rows below it.
const PATH_BOX: (f64, f64, f64, f64) = (80.0, 110.0, 480.0, 360.0);
const GRADE_Y: f64 = 584.0;
const SCORE_Y: f64 = 640.0;
const METRICS_Y: f64 = 692.0;
const FOOTER_Y: f64 = 744.0;

const BG_COLOR: &str = "#0f172a";
const TITLE_COLOR: &str = "#94a3b8";
const BODY_COLOR: &str = "#e2e8f0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One primitive of the report card. The layout is computed here so the
/// browser side only has to replay items onto a 2D context in order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ReportItem {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    Polyline {
        points: Vec<[f64; 2]>,
        color: String,
        width: f64,
    },
    Text {
        x: f64,
        y: f64,
        size: f64,
        color: String,
        align: TextAlign,
        bold: bool,
        text: String,
    },
}

/// Fixed-layout report card: background, the stroke refit into its box,
/// grade, score, sub-scores and attempt count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportLayout {
    pub width: u32,
    pub height: u32,
    pub items: Vec<ReportItem>,
}

fn bounds_of(pts: &[Point]) -> (f64, f64, f64, f64) {
    let (mut minx, mut miny, mut maxx, mut maxy) = (
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for p in pts {
        minx = minx.min(p.x);
        miny = miny.min(p.y);
        maxx = maxx.max(p.x);
        maxy = maxy.max(p.y);
    }
    (minx, miny, maxx, maxy)
}

/// Rescales the stroke into the given box, preserving aspect ratio and
/// centering it. A stroke with no extent collapses to the box center.
pub fn fit_path_to_box(path: &[Point], bx: f64, by: f64, bw: f64, bh: f64) -> Vec<[f64; 2]> {
    if path.is_empty() {
        return Vec::new();
    }
    let (minx, miny, maxx, maxy) = bounds_of(path);
    let w = maxx - minx;
    let h = maxy - miny;
    let scale = (bw / w).min(bh / h);
    if !scale.is_finite() {
        let cx = bx + bw / 2.0;
        let cy = by + bh / 2.0;
        return path.iter().map(|_| [cx, cy]).collect();
    }
    let ox = bx + (bw - w * scale) / 2.0;
    let oy = by + (bh - h * scale) / 2.0;
    path.iter()
        .map(|p| [ox + (p.x - minx) * scale, oy + (p.y - miny) * scale])
        .collect()
}

pub fn build_report(
    analysis: &CircleAnalysis,
    attempts: u32,
    best_score: u32,
    path: &[Point],
) -> ReportLayout {
    let tier = score_color(analysis.score);
    let w = REPORT_W as f64;
    let mut items = vec![
        ReportItem::Rect {
            x: 0.0,
            y: 0.0,
            w,
            h: REPORT_H as f64,
            color: BG_COLOR.to_string(),
        },
        ReportItem::Text {
            x: w / 2.0,
            y: 64.0,
            size: 26.0,
            color: TITLE_COLOR.to_string(),
            align: TextAlign::Center,
            bold: true,
            text: "CIRCLE REPORT".to_string(),
        },
    ];
    let (bx, by, bw, bh) = PATH_BOX;
    let points = fit_path_to_box(path, bx, by, bw, bh);
    if !points.is_empty() {
        items.push(ReportItem::Polyline {
            points,
            color: tier.to_string(),
            width: 4.0,
        });
    }
    items.push(ReportItem::Text {
        x: w / 2.0,
        y: GRADE_Y,
        size: 96.0,
        color: tier.to_string(),
        align: TextAlign::Center,
        bold: true,
        text: grade_letter(Some(analysis.score)).to_string(),
    });
    items.push(ReportItem::Text {
        x: w / 2.0,
        y: SCORE_Y,
        size: 36.0,
        color: BODY_COLOR.to_string(),
        align: TextAlign::Center,
        bold: false,
        text: format!("{} / 100", analysis.score),
    });
    items.push(ReportItem::Text {
        x: w / 2.0,
        y: METRICS_Y,
        size: 22.0,
        color: TITLE_COLOR.to_string(),
        align: TextAlign::Center,
        bold: false,
        text: format!(
            "Roundness {}  ·  Completeness {}",
            analysis.roundness, analysis.completeness
        ),
    });
    items.push(ReportItem::Text {
        x: w / 2.0,
        y: FOOTER_Y,
        size: 20.0,
        color: TITLE_COLOR.to_string(),
        align: TextAlign::Center,
        bold: false,
        text: format!("Attempt #{attempts}  ·  Best {best_score}"),
    });
    ReportLayout {
        width: REPORT_W,
        height: REPORT_H,
        items,
    }
}

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        {
            let mut writer = enc.write_header()?;
            writer.write_image_data(rgba)?;
        }
        // enc drops here, releasing the &mut buf borrow
    }
    Ok(buf)
}
