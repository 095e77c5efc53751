use fragment::{Fragment, FragmentBatch};
use fragment_codec::ScriptConfig;
use js_sys::{Array, Function, Object, Reflect};
use registry::{FragmentConsumer, RegistryError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

use crate::decode::{decode_map, RawEntries};
use crate::slot::PageSlot;

/// Hands each fragment to the page's render callback as
/// `callback(group, entries)`.
pub(crate) struct PageConsumer {
    callback: Function,
}

impl FragmentConsumer for PageConsumer {
    fn consume(&mut self, fragment: Fragment) {
        let (group, entries) = fragment.into_parts();
        let entries: Array = entries
            .iter()
            .map(|entry| JsValue::from_str(entry))
            .collect();
        if let Err(err) =
            self.callback
                .call2(&JsValue::NULL, &JsValue::from_str(group.as_str()), &entries)
        {
            console::error_2(&JsValue::from_str("fragment consumer threw:"), &err);
        }
    }
}

thread_local! {
    static PAGE: PageSlot<PageConsumer> = PageSlot::new();
}

fn js_error(msg: impl AsRef<str>) -> JsValue {
    JsValue::from_str(msg.as_ref())
}

fn warn(msg: impl AsRef<str>) {
    console::warn_1(&js_error(msg));
}

/// Converts one `{ group: [html, ...] }` object into a batch, warning on the
/// console about every group it skips.
pub(crate) fn batch_from_js(value: &JsValue) -> Result<FragmentBatch, JsValue> {
    if Array::is_array(value) {
        return Err(js_error("implementors value is an array, not a map"));
    }
    let object = value
        .dyn_ref::<Object>()
        .ok_or_else(|| js_error("implementors value is not an object"))?;

    let mut groups: Vec<(String, RawEntries)> = Vec::new();
    for key in Object::keys(object).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        let value = Reflect::get(object, &key)?;
        let entries = value
            .dyn_ref::<Array>()
            .map(|array| array.iter().map(|entry| entry.as_string()).collect());
        groups.push((name, entries));
    }

    let (batch, skipped) = decode_map(groups);
    for skip in skipped {
        warn(format!("skipping {skip}"));
    }
    Ok(batch)
}

/// Reads the pending variable: a queue of maps pushed by fragment scripts, or
/// the single map older scripts assign. Unreadable queue items are skipped.
pub(crate) fn pending_batches(value: &JsValue) -> Result<Vec<FragmentBatch>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    let Some(queue) = value.dyn_ref::<Array>() else {
        return Ok(vec![batch_from_js(value)?]);
    };

    let mut batches = Vec::with_capacity(queue.length() as usize);
    for map in queue.iter() {
        match batch_from_js(&map) {
            Ok(batch) => batches.push(batch),
            Err(err) => console::warn_2(&js_error("ignoring pending implementors:"), &err),
        }
    }
    Ok(batches)
}

fn submit_js(value: JsValue) {
    match batch_from_js(&value) {
        Ok(batch) => PAGE.with(|page| page.submit(batch)),
        Err(err) => console::warn_2(&js_error("ignoring implementors registration:"), &err),
    }
}

/// Installs `callback` as the page's fragment consumer.
///
/// Returns the number of pending fragments flushed into it. Fails if a
/// consumer was already installed on this page.
#[wasm_bindgen(js_name = installPageConsumer)]
pub fn install_page_consumer(callback: Function) -> Result<usize, JsValue> {
    let names = ScriptConfig::default();
    let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;

    if PAGE.with(PageSlot::is_installed) {
        return Err(js_error(RegistryError::ConsumerAlreadyInstalled.to_string()));
    }

    let pending_key = JsValue::from_str(&names.pending_var);
    let pending = pending_batches(&Reflect::get(&window, &pending_key)?)?;
    let drained = PAGE
        .with(|page| page.install(pending, PageConsumer { callback }))
        .map_err(|err| js_error(err.to_string()))?;
    Reflect::delete_property(&window, &pending_key)?;

    let hook = Closure::<dyn FnMut(JsValue)>::new(submit_js);
    Reflect::set(&window, &JsValue::from_str(&names.register_fn), hook.as_ref())?;
    hook.forget();

    console::log_1(&format!("installPageConsumer: flushed {drained} pending fragment(s)").into());
    Ok(drained)
}
