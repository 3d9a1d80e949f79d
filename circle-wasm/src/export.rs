use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Url};

use report_core::{ReportItem, ReportLayout, TextAlign, build_report, encode_rgba_to_png_bytes};

use crate::canvas::{set_fill_style, set_stroke_style};
use crate::state::State;

/// Renders the report card for the current analysis onto an offscreen
/// canvas and triggers a PNG download. Callers guard the "no analysis yet"
/// case; an unavailable 2D context is a silent no-op.
pub fn export_report(state: &State) -> Result<(), JsValue> {
    let Some(analysis) = state.analysis else {
        return Ok(());
    };
    let layout = build_report(&analysis, state.attempts, state.best_score, &state.stroke);

    let Some(ctx) = offscreen_context(state, layout.width, layout.height) else {
        return Ok(());
    };
    render_items(&ctx, &layout);

    let image = ctx.get_image_data(0.0, 0.0, layout.width as f64, layout.height as f64)?;
    let bytes = encode_rgba_to_png_bytes(layout.width, layout.height, &image.data())
        .map_err(|e| JsValue::from_str(&format!("encode: {e}")))?;

    // Create Blob and trigger download
    let array = js_sys::Array::new();
    let u8 = js_sys::Uint8Array::from(bytes.as_slice());
    array.push(&u8);
    let blob = Blob::new_with_u8_array_sequence(&array)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = state.document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    // timestamped name so repeated downloads never collide
    let filename = format!("circle-report-{}.png", js_sys::Date::now() as u64);
    a.set_attribute("download", &filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

fn offscreen_context(state: &State, w: u32, h: u32) -> Option<CanvasRenderingContext2d> {
    let cv: HtmlCanvasElement = state
        .document
        .create_element("canvas")
        .ok()?
        .dyn_into()
        .ok()?;
    cv.set_width(w);
    cv.set_height(h);
    cv.get_context("2d").ok()??.dyn_into().ok()
}

/// Replays the precomputed layout items in order. All positioning decisions
/// live in report-core; this is a dumb interpreter.
fn render_items(ctx: &CanvasRenderingContext2d, layout: &ReportLayout) {
    for item in &layout.items {
        match item {
            ReportItem::Rect { x, y, w, h, color } => {
                set_fill_style(ctx, color);
                ctx.fill_rect(*x, *y, *w, *h);
            }
            ReportItem::Polyline {
                points,
                color,
                width,
            } => {
                if points.is_empty() {
                    continue;
                }
                ctx.begin_path();
                ctx.move_to(points[0][0], points[0][1]);
                for p in &points[1..] {
                    ctx.line_to(p[0], p[1]);
                }
                ctx.set_line_width(*width);
                ctx.set_line_cap("round");
                ctx.set_line_join("round");
                set_stroke_style(ctx, color);
                ctx.stroke();
            }
            ReportItem::Text {
                x,
                y,
                size,
                color,
                align,
                bold,
                text,
            } => {
                let weight = if *bold { "bold " } else { "" };
                ctx.set_font(&format!("{weight}{size}px sans-serif"));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                ctx.set_text_baseline("middle");
                set_fill_style(ctx, color);
                let _ = ctx.fill_text(text, *x, *y);
            }
        }
    }
}
