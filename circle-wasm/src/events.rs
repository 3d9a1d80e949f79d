use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Touch, TouchEvent};

use circle_core::{Point, close_stroke};

use crate::canvas::sync_canvas_size;
use crate::notify::{Tier, toast};
use crate::state::{Phase, State};
use crate::utils::log;
use crate::{draw, storage, update_score_dom};

/// Convert client coordinates into canvas backing-store coordinates so the
/// geometry is correct even if CSS scales the canvas element. The scale is
/// applied independently per axis.
fn client_to_canvas(cx: f64, cy: f64, cv: &HtmlCanvasElement) -> (f64, f64) {
    let rect = cv.get_bounding_client_rect();
    let x = (cx - rect.left()) * (cv.width() as f64) / rect.width().max(1.0);
    let y = (cy - rect.top()) * (cv.height() as f64) / rect.height().max(1.0);
    (x, y)
}

fn mouse_canvas_coords(e: &MouseEvent, cv: &HtmlCanvasElement) -> (f64, f64) {
    client_to_canvas(e.client_x() as f64, e.client_y() as f64, cv)
}

/// First active touch point; touchend events report no active touches, so
/// fall back to the first changed one.
fn first_touch(e: &TouchEvent) -> Option<Touch> {
    e.touches().item(0).or_else(|| e.changed_touches().item(0))
}

fn touch_canvas_coords(e: &TouchEvent, cv: &HtmlCanvasElement) -> Option<(f64, f64)> {
    let t = first_touch(e)?;
    Some(client_to_canvas(
        t.client_x() as f64,
        t.client_y() as f64,
        cv,
    ))
}

/// Pointer-down: a genuinely new attempt, so the previous analysis is
/// discarded here (and only here).
fn begin_stroke(state: &mut State, pt: (f64, f64)) {
    state.phase = Phase::Drawing;
    state.stroke.clear();
    state.analysis = None;
    state.stroke.push(Point { x: pt.0, y: pt.1 });
    update_score_dom(state);
    draw(state);
}

fn extend_stroke(state: &mut State, pt: (f64, f64)) {
    if state.phase != Phase::Drawing {
        return;
    }
    state.stroke.push(Point { x: pt.0, y: pt.1 });
    draw(state);
}

/// Pointer-up/leave: close the stroke. The counting/gating/best-score
/// policy lives in `circle_core::close_stroke`; this applies the outcome
/// to the UI. The minimum-length gate leaves any prior analysis untouched
/// (it was already cleared at stroke start).
fn end_stroke(state: &mut State) {
    if state.phase != Phase::Drawing {
        return;
    }
    let outcome = close_stroke(&state.stroke, state.attempts, state.best_score);
    state.attempts = outcome.attempts;
    match outcome.analysis {
        None => {
            state.phase = Phase::Idle;
            toast(
                state,
                "Too short",
                "Draw a full circle in one stroke.",
                Tier::Destructive,
            );
        }
        Some(analysis) => {
            if let Ok(json) = serde_json::to_string(&analysis) {
                log(&format!("analysis: {json}"));
            }
            if outcome.new_best {
                state.best_score = outcome.best_score;
                storage::store_best_score(&state.window, outcome.best_score);
                toast(
                    state,
                    "New best score",
                    &format!("{} beats your previous best.", analysis.score),
                    Tier::Normal,
                );
            }
            state.analysis = Some(analysis);
            state.phase = Phase::Analyzed;
        }
    }
    update_score_dom(state);
    draw(state);
}

pub fn attach_stroke_handlers(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let canvas = state.borrow().canvas.clone();
    let window = state.borrow().window.clone();

    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let pt = mouse_canvas_coords(&e, &s.canvas);
            begin_stroke(&mut s, pt);
        }));
        canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let pt = mouse_canvas_coords(&e, &s.canvas);
            extend_stroke(&mut s, pt);
        }));
        canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        // mouseup on the window so strokes released off-canvas still close
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            end_stroke(&mut st.borrow_mut());
        }));
        window.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }
    {
        let st = state.clone();
        let mouseleave = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            end_stroke(&mut st.borrow_mut());
        }));
        canvas
            .add_event_listener_with_callback("mouseleave", mouseleave.as_ref().unchecked_ref())?;
        mouseleave.forget();
    }

    {
        let st = state.clone();
        let touchstart = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            if let Some(pt) = touch_canvas_coords(&e, &s.canvas) {
                begin_stroke(&mut s, pt);
            }
        }));
        canvas
            .add_event_listener_with_callback("touchstart", touchstart.as_ref().unchecked_ref())?;
        touchstart.forget();
    }
    {
        let st = state.clone();
        let touchmove = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            if let Some(pt) = touch_canvas_coords(&e, &s.canvas) {
                extend_stroke(&mut s, pt);
            }
        }));
        canvas.add_event_listener_with_callback("touchmove", touchmove.as_ref().unchecked_ref())?;
        touchmove.forget();
    }
    {
        let st = state.clone();
        let touchend = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            let mut s = st.borrow_mut();
            if let Some(pt) = touch_canvas_coords(&e, &s.canvas) {
                extend_stroke(&mut s, pt);
            }
            end_stroke(&mut s);
        }));
        canvas.add_event_listener_with_callback("touchend", touchend.as_ref().unchecked_ref())?;
        touchend.forget();
    }

    Ok(())
}

/// Resizing is destructive: the bitmap's coordinate space changes with its
/// pixel dimensions, so the stroke and any displayed analysis are cleared.
pub fn attach_resize_handler(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let window = state.borrow().window.clone();
    let st = state.clone();
    let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let mut s = st.borrow_mut();
        sync_canvas_size(&mut s);
        s.stroke.clear();
        s.analysis = None;
        s.phase = Phase::Idle;
        update_score_dom(&s);
        draw(&s);
    }));
    window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
    onresize.forget();
    Ok(())
}
