//! `LayoutStore` over the browser's `localStorage`.

use gd_editor::LayoutStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Reads and writes `window.localStorage`. Stateless: the storage object
/// is looked up on every access, so a page that revokes storage mid-session
/// gets an error instead of a stale handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

fn local_storage() -> Result<Storage, String> {
    let window = web_sys::window().ok_or("no window")?;
    window
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| "localStorage disabled".to_string())
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&value)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_string())
}

impl LayoutStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        local_storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        local_storage()?.set_item(key, value).map_err(js_error)
    }
}
