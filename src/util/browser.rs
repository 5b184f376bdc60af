//! Thin wrappers over browser APIs with callback-style completion.

use crate::models::THEMES;
use crate::util::hex_to_rgb;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ClipboardError {
    #[error("Clipboard is not available.")]
    Unavailable,
    #[error("Could not copy the note.")]
    Rejected(String),
    #[error("Could not copy the image.")]
    Image,
}

type Once<T> = Rc<RefCell<Option<Box<dyn FnOnce(T)>>>>;

fn once<T: 'static>(f: impl FnOnce(T) + 'static) -> Once<T> {
    Rc::new(RefCell::new(Some(Box::new(f))))
}

fn fire<T>(slot: &Once<T>, value: T) {
    if let Some(f) = slot.borrow_mut().take() {
        f(value);
    }
}

type Handler = Closure<dyn FnMut(JsValue)>;
type Held = Rc<RefCell<Option<(Handler, Handler)>>>;

/// A success and a failure handler for one browser callback. The first to
/// run settles the result and both are released with it.
struct Pending<T> {
    slot: Once<T>,
    held: Held,
}

impl<T: 'static> Pending<T> {
    fn new(
        done: impl FnOnce(T) + 'static,
        on_ok: impl Fn(JsValue) -> T + 'static,
        on_err: impl Fn(JsValue) -> T + 'static,
    ) -> Self {
        let pending = Self {
            slot: once(done),
            held: Rc::new(RefCell::new(None)),
        };
        let handlers = (pending.handler(on_ok), pending.handler(on_err));
        pending.held.replace(Some(handlers));
        pending
    }

    fn handler(&self, map: impl Fn(JsValue) -> T + 'static) -> Handler {
        let slot = self.slot.clone();
        let held = self.held.clone();
        Handler::new(move |value: JsValue| settle(&slot, &held, map(value)))
    }

    fn attach(&self, f: impl FnOnce(&Handler, &Handler)) {
        if let Some((ok, err)) = self.held.borrow().as_ref() {
            f(ok, err);
        }
    }

    fn settle(&self, value: T) {
        settle(&self.slot, &self.held, value);
    }

    fn is_settled(&self) -> bool {
        self.held.borrow().is_none()
    }
}

fn settle<T>(slot: &Once<T>, held: &Held, value: T) {
    fire(slot, value);
    let released = held.borrow_mut().take();
    drop(released);
}

fn clipboard() -> Option<web_sys::Clipboard> {
    web_sys::window().map(|w| w.navigator().clipboard())
}

/// Settles `done` with the outcome of a clipboard promise.
fn await_clipboard(
    promise: &js_sys::Promise,
    done: impl FnOnce(Result<(), ClipboardError>) + 'static,
) {
    let pending = Pending::new(
        done,
        |_| Ok(()),
        |e| Err(ClipboardError::Rejected(format!("{e:?}"))),
    );
    pending.attach(|ok, err| {
        let _ = promise.then2(ok, err);
    });
}

fn text_blob(contents: &str, mime: &str) -> Result<web_sys::Blob, JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
}

fn clipboard_item(parts: &[(&str, &web_sys::Blob)]) -> Result<web_sys::ClipboardItem, JsValue> {
    let record = js_sys::Object::new();
    for (mime, blob) in parts {
        js_sys::Reflect::set(&record, &JsValue::from_str(mime), blob)?;
    }
    web_sys::ClipboardItem::new_with_record_from_str_to_blob_promise(&record)
}

fn write_item(
    clipboard: &web_sys::Clipboard,
    item: &web_sys::ClipboardItem,
    done: impl FnOnce(Result<(), ClipboardError>) + 'static,
) {
    await_clipboard(&clipboard.write(&js_sys::Array::of1(item)), done);
}

pub(crate) fn write_clipboard(
    text: &str,
    done: impl FnOnce(Result<(), ClipboardError>) + 'static,
) {
    let Some(clipboard) = clipboard() else {
        return done(Err(ClipboardError::Unavailable));
    };
    await_clipboard(&clipboard.write_text(text), done);
}

/// Writes one clipboard item carrying both `text/html` and `text/plain`.
pub(crate) fn write_clipboard_rich(
    html: &str,
    text: &str,
    done: impl FnOnce(Result<(), ClipboardError>) + 'static,
) {
    let Some(clipboard) = clipboard() else {
        return done(Err(ClipboardError::Unavailable));
    };
    let item = text_blob(html, "text/html").and_then(|html| {
        let plain = text_blob(text, "text/plain")?;
        clipboard_item(&[("text/html", &html), ("text/plain", &plain)])
    });
    match item {
        Ok(item) => write_item(&clipboard, &item, done),
        Err(e) => done(Err(ClipboardError::Rejected(format!("{e:?}")))),
    }
}

/// Redraws the image at `src` on a canvas and copies it as `image/png`.
pub(crate) fn write_image_png(src: &str, done: impl FnOnce(Result<(), ClipboardError>) + 'static) {
    let Some(clipboard) = clipboard() else {
        return done(Err(ClipboardError::Unavailable));
    };
    let Ok(image) = web_sys::HtmlImageElement::new() else {
        return done(Err(ClipboardError::Image));
    };

    let done = once(done);
    let loaded = {
        let image = image.clone();
        move |ok: bool| {
            let failed = done.clone();
            let drawn = ok.then(|| {
                canvas_png(&image, move |blob| {
                    let item = blob.map(|b| clipboard_item(&[("image/png", &b)]));
                    match item {
                        Some(Ok(item)) => write_item(&clipboard, &item, move |r| fire(&done, r)),
                        _ => fire(&done, Err(ClipboardError::Image)),
                    }
                })
            });
            if !matches!(drawn, Some(Ok(()))) {
                fire(&failed, Err(ClipboardError::Image));
            }
        }
    };
    let pending = Pending::new(loaded, |_| true, |_| false);
    pending.attach(|ok, err| {
        image.set_onload(Some(ok.as_ref().unchecked_ref()));
        image.set_onerror(Some(err.as_ref().unchecked_ref()));
    });
    image.set_src(src);
}

fn canvas_png(
    image: &web_sys::HtmlImageElement,
    done: impl FnOnce(Option<web_sys::Blob>) + 'static,
) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: web_sys::HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(image.natural_width());
    canvas.set_height(image.natural_height());
    let context: web_sys::CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    context.draw_image_with_html_image_element(image, 0.0, 0.0)?;

    let callback = Closure::once_into_js(move |blob: JsValue| done(blob.dyn_into().ok()));
    canvas.to_blob_with_type(callback.unchecked_ref(), "image/png")
}

/// Offers `contents` as a file download.
pub(crate) fn download_text(file_name: &str, mime: &str, contents: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let blob = text_blob(contents, mime)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReadAs {
    Text,
    DataUrl,
}

/// Reads a user-picked file. `done` gets `None` when the read fails.
pub(crate) fn read_file(file: &web_sys::File, read_as: ReadAs, done: impl FnOnce(Option<String>) + 'static) {
    let Ok(reader) = web_sys::FileReader::new() else {
        return done(None);
    };
    let result = {
        let reader = reader.clone();
        move |_: JsValue| reader.result().ok().and_then(|v| v.as_string())
    };
    let pending = Pending::new(done, result, |_| None);
    pending.attach(|ok, err| {
        reader.set_onload(Some(ok.as_ref().unchecked_ref()));
        reader.set_onerror(Some(err.as_ref().unchecked_ref()));
    });

    let started = match read_as {
        ReadAs::Text => reader.read_as_text(file),
        ReadAs::DataUrl => reader.read_as_data_url(file),
    };
    if started.is_err() {
        pending.settle(None);
    }
}

/// Files picked in an `<input type="file">` change event.
pub(crate) fn picked_files(ev: &web_sys::Event) -> Vec<web_sys::File> {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
    else {
        return Vec::new();
    };
    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    // Allow picking the same file again.
    input.set_value("");
    files
}

/// Swaps the theme class on `<body>`.
pub(crate) fn apply_theme(theme_id: &str) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let classes = body.class_list();
    for (id, _) in THEMES {
        let _ = classes.remove_1(id);
    }
    let _ = classes.add_1(theme_id);
}

/// Sets or clears the `--glow-color-rgb` variable on the root element.
pub(crate) fn apply_glow(color: Option<&str>) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };
    let style = root.style();
    match color.and_then(hex_to_rgb) {
        Some((r, g, b)) => {
            let _ = style.set_property("--glow-color-rgb", &format!("{r}, {g}, {b}"));
        }
        None => {
            let _ = style.remove_property("--glow-color-rgb");
        }
    }
}

/// True when keyboard focus is in a text field.
pub(crate) fn is_typing_target(target: Option<web_sys::EventTarget>) -> bool {
    let Some(el) = target.and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) else {
        return false;
    };
    let tag = el.tag_name().to_lowercase();
    tag == "input" || tag == "textarea" || tag == "select" || el.is_content_editable()
}

pub(crate) fn focus_element(id: &str) {
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        let _ = el.focus();
    }
}

pub(crate) fn click_element(id: &str) {
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        el.click();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_pending_settles_once_and_releases_handlers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let pending = {
            let seen = seen.clone();
            Pending::new(move |v: u32| seen.borrow_mut().push(v), |_| 1, |_| 2)
        };
        assert!(!pending.is_settled());

        pending.settle(7);
        pending.settle(8);
        assert_eq!(*seen.borrow(), vec![7]);
        assert!(pending.is_settled());
    }

    #[wasm_bindgen_test]
    fn test_handler_run_releases_its_partner() {
        let seen = Rc::new(RefCell::new(None));
        let pending = {
            let seen = seen.clone();
            Pending::new(move |ok: bool| *seen.borrow_mut() = Some(ok), |_| true, |_| false)
        };
        let mut run_err = None;
        pending.attach(|_, err| run_err = Some(err.as_ref().clone()));
        let err: js_sys::Function = run_err.expect("handlers attached").unchecked_into();
        let _ = err.call1(&JsValue::NULL, &JsValue::from_str("denied"));

        assert_eq!(*seen.borrow(), Some(false));
        assert!(pending.is_settled());
    }

    #[wasm_bindgen_test]
    fn test_clipboard_item_carries_both_flavours() {
        let html = text_blob("<div>hi</div>", "text/html").expect("blob");
        let plain = text_blob("hi", "text/plain").expect("blob");
        let item = clipboard_item(&[("text/html", &html), ("text/plain", &plain)]).expect("item");
        let types: Vec<String> = item.types().iter().filter_map(|t| t.as_string()).collect();
        assert_eq!(types, vec!["text/html".to_string(), "text/plain".to_string()]);
    }

    #[wasm_bindgen_test]
    fn test_apply_glow_sets_variable() {
        apply_glow(Some("#ff8000"));
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            .expect("root element");
        let value = root
            .style()
            .get_property_value("--glow-color-rgb")
            .expect("style read");
        assert_eq!(value.trim(), "255, 128, 0");

        apply_glow(None);
        let value = root
            .style()
            .get_property_value("--glow-color-rgb")
            .expect("style read");
        assert!(value.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_apply_theme_replaces_class() {
        apply_theme("theme-mint");
        apply_theme("theme-onyx");
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .expect("body");
        assert!(body.class_list().contains("theme-onyx"));
        assert!(!body.class_list().contains("theme-mint"));
    }
}
