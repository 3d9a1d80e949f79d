use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

mod canvas;
mod constants;
mod events;
mod export;
mod notify;
mod state;
mod storage;
mod utils;

use canvas::{init_canvas, set_stroke_style, sync_canvas_size};
use constants::{GUIDE_COLOR, GUIDE_WIDTH, STROKE_COLOR, STROKE_WIDTH};
use notify::{Tier, toast};
use state::{Phase, State};
use utils::log;

/// Redraws the scene: the reference circle under an analyzed stroke, then
/// the stroke itself. Pure presentation; all geometry lives in circle-core.
pub(crate) fn draw(state: &State) {
    let width = state.canvas.width() as f64;
    let height = state.canvas.height() as f64;
    state.ctx.clear_rect(0.0, 0.0, width, height);

    if state.phase == Phase::Analyzed
        && let Some((ctr, radius)) = circle_core::fit_circle(&state.stroke)
        && radius > 0.0
    {
        state.ctx.begin_path();
        let _ = state
            .ctx
            .arc(ctr.x, ctr.y, radius, 0.0, std::f64::consts::TAU);
        state.ctx.set_line_width(GUIDE_WIDTH);
        set_stroke_style(&state.ctx, GUIDE_COLOR);
        state.ctx.stroke();
    }

    if state.stroke.len() > 1 {
        state.ctx.begin_path();
        state.ctx.move_to(state.stroke[0].x, state.stroke[0].y);
        for p in &state.stroke[1..] {
            state.ctx.line_to(p.x, p.y);
        }
        state.ctx.set_line_width(STROKE_WIDTH);
        state.ctx.set_line_cap("round");
        state.ctx.set_line_join("round");
        set_stroke_style(&state.ctx, STROKE_COLOR);
        state.ctx.stroke();
    }
}

fn set_text(state: &State, id: &str, text: &str) {
    if let Some(el) = state.document.get_element_by_id(id)
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(text);
    }
}

/// Pushes the current analysis, best score and attempt count into the
/// score panel. Missing panel nodes are skipped.
pub(crate) fn update_score_dom(state: &State) {
    let a = state.analysis;
    let fmt = |v: Option<u32>| v.map(|x| x.to_string()).unwrap_or_else(|| "–".to_string());
    set_text(state, "score", &fmt(a.map(|a| a.score)));
    set_text(state, "roundness", &fmt(a.map(|a| a.roundness)));
    set_text(state, "completeness", &fmt(a.map(|a| a.completeness)));
    set_text(state, "symmetry", &fmt(a.map(|a| a.symmetry)));
    set_text(state, "attempts", &state.attempts.to_string());
    set_text(state, "best", &state.best_score.to_string());

    let grade = circle_core::grade_letter(a.map(|a| a.score));
    set_text(state, "grade", grade);
    if let Some(el) = state.document.get_element_by_id("grade")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        // the placeholder glyph must not keep a stale tier color
        let style = el.style();
        match a {
            Some(a) => {
                let _ = style.set_property("color", circle_core::score_color(a.score));
            }
            None => {
                let _ = style.remove_property("color");
            }
        }
    }
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    // Clear button: back to Idle, attempts and best score survive
    if let Some(btn) = doc.get_element_by_id("clearCanvas") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.stroke.clear();
            s.analysis = None;
            s.phase = Phase::Idle;
            update_score_dom(&s);
            draw(&s);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Report download button
    if let Some(btn) = doc.get_element_by_id("downloadReport") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let s = st.borrow();
            if s.analysis.is_none() {
                toast(
                    &s,
                    "Nothing to report",
                    "Draw a circle first.",
                    Tier::Destructive,
                );
                return;
            }
            if let Err(e) = export::export_report(&s) {
                log(&format!("report export failed: {e:?}"));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;
    let best_score = storage::load_best_score(&window);

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        phase: Phase::Idle,
        stroke: Vec::new(),
        analysis: None,
        attempts: 0,
        best_score,
    }));

    {
        let mut s = state.borrow_mut();
        sync_canvas_size(&mut s);
        update_score_dom(&s);
        draw(&s);
    }
    events::attach_stroke_handlers(state.clone())?;
    events::attach_resize_handler(state.clone())?;
    attach_ui(state)?;
    Ok(())
}
