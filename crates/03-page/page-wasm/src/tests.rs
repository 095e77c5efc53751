//! Browser tests for the page hook, run through wasm-bindgen entry points.
//!
//! The page consumer can be installed once per instance, so the whole
//! lifecycle lives in a single entry point.

use fragment::GroupName;
use js_sys::{Array, Function, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::bridge::{batch_from_js, pending_batches};
use crate::install_page_consumer;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(JsValue::from_str(&format!($($arg)*)));
        }
    };
}

fn groups(batch: &fragment::FragmentBatch) -> Vec<String> {
    batch.groups().map(GroupName::to_string).collect()
}

#[wasm_bindgen]
pub fn wasm_page_skips_malformed_groups() -> Result<(), JsValue> {
    let map = JSON::parse(
        r#"{"ok": ["<ok>"], "": ["<x>"], "scalar": "<s>", "mixed": ["<m>", 1], "empty": []}"#,
    )?;
    let batch = batch_from_js(&map)?;
    ensure!(
        groups(&batch) == ["ok", "empty"],
        "unexpected groups {:?}",
        groups(&batch)
    );

    ensure!(
        batch_from_js(&JsValue::from_str("nope")).is_err(),
        "string payload accepted"
    );
    ensure!(
        batch_from_js(&Array::new().into()).is_err(),
        "array payload accepted as a map"
    );
    Ok(())
}

#[wasm_bindgen]
pub fn wasm_page_reads_queued_and_single_pending() -> Result<(), JsValue> {
    let queued = JSON::parse(r#"[{"rsx_dom": ["<a>"]}, 7, {"rsx_tree": ["<b>"]}]"#)?;
    let batches = pending_batches(&queued)?;
    let seen: Vec<_> = batches.iter().flat_map(groups).collect();
    ensure!(seen == ["rsx_dom", "rsx_tree"], "queued pending read as {:?}", seen);

    let single = JSON::parse(r#"{"rsx_arena": ["<c>"]}"#)?;
    let batches = pending_batches(&single)?;
    ensure!(batches.len() == 1, "single pending map read as {} batches", batches.len());

    ensure!(
        pending_batches(&JsValue::UNDEFINED)?.is_empty(),
        "undefined pending produced batches"
    );
    Ok(())
}

#[wasm_bindgen]
pub fn wasm_page_consumer_lifecycle() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let delivered = Array::new();
    Reflect::set(&window, &"__fragment_delivered".into(), &delivered)?;

    // Two scripts loaded before the consumer.
    let pending = JSON::parse(r#"[{"rsx_dom": ["<a>"]}, {"rsx_tree": ["<b>", "<c>"]}]"#)?;
    Reflect::set(&window, &"pending_implementors".into(), &pending)?;

    let callback = Function::new_with_args(
        "group, entries",
        "window.__fragment_delivered.push(group + ':' + entries.length);\n\
         if (group === 'echo_src') { window.register_implementors({echo: ['<e>']}); }",
    );
    let drained = install_page_consumer(callback.clone())?;
    ensure!(drained == 2, "drained {} pending fragments", drained);
    ensure!(
        !Reflect::has(&window, &"pending_implementors".into())?,
        "pending variable left behind"
    );

    let hook = Reflect::get(&window, &"register_implementors".into())?;
    let hook: Function = hook
        .dyn_into()
        .map_err(|_| JsValue::from_str("register_implementors is not a function"))?;
    hook.call1(&JsValue::NULL, &JSON::parse(r#"{"echo_src": ["<s>"]}"#)?)?;

    let seen: Vec<_> = delivered.iter().filter_map(|value| value.as_string()).collect();
    ensure!(
        seen == ["rsx_dom:1", "rsx_tree:2", "echo_src:1", "echo:1"],
        "delivery order {:?}",
        seen
    );

    ensure!(
        install_page_consumer(callback).is_err(),
        "second consumer installed"
    );
    Ok(())
}
