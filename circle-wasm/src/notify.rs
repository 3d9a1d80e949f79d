use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlElement;

use crate::constants::TOAST_HIDE_MS;
use crate::state::State;

/// Severity of a toast. `Destructive` is used for user mistakes (stroke too
/// short, nothing to report), `Normal` for good news (new best score).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Normal,
    Destructive,
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn toast_element(state: &State) -> Option<HtmlElement> {
    if let Some(el) = state.document.get_element_by_id("toast") {
        return el.dyn_into().ok();
    }
    // Host page carries no toast node; create one lazily.
    let el: HtmlElement = state.document.create_element("div").ok()?.dyn_into().ok()?;
    el.set_id("toast");
    let style = el.style();
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("top", "16px");
    let _ = style.set_property("right", "16px");
    let _ = style.set_property("padding", "10px 14px");
    let _ = style.set_property("border-radius", "8px");
    let _ = style.set_property("color", "#fff");
    let _ = style.set_property("font-family", "sans-serif");
    let _ = style.set_property("display", "none");
    state.document.body()?.append_child(&el).ok()?;
    Some(el)
}

/// Fire-and-forget user notification. Not queryable, not persisted; an
/// earlier toast is simply overwritten by a later one.
pub fn toast(state: &State, title: &str, description: &str, tier: Tier) {
    let Some(el) = toast_element(state) else {
        return;
    };
    el.set_inner_html(&format!(
        "<strong>{}</strong><div style=\"opacity:.85;font-size:13px\">{}</div>",
        html_escape(title),
        html_escape(description)
    ));
    let bg = match tier {
        Tier::Normal => "#334155",
        Tier::Destructive => "#b91c1c",
    };
    let style = el.style();
    let _ = style.set_property("background", bg);
    let _ = style.set_property("display", "block");

    let el2 = el.clone();
    let hide = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let _ = el2.style().set_property("display", "none");
    }));
    let _ = state
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            hide.as_ref().unchecked_ref(),
            TOAST_HIDE_MS,
        );
    hide.forget();
}
