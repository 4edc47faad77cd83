//! Browser entry point: looks up page elements and wires DOM events to the
//! modal manager and page behaviors.
//!
//! Everything here is glue. Decisions live in [`crate::modal`] and
//! [`crate::page`]; this module only translates `web-sys` events into calls
//! and applies the returned [`Dispatch`] to the event.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlFormElement, HtmlScriptElement, IntersectionObserver,
    IntersectionObserverEntry, KeyboardEvent,
};

use crate::config::SiteConfig;
use crate::dom::browser::BrowserDom;
use crate::dom::{Dom, Key, is_natively_interactive};
use crate::modal::schedule::TimeoutScheduler;
use crate::modal::{Dispatch, ModalManager, Trigger};
use crate::page::{contact_form, document, lazy_images, nav, scroll_top, theme};
use crate::util::storage::LocalStorage;

type Manager = Rc<RefCell<ModalManager<BrowserDom, TimeoutScheduler>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(dom) = BrowserDom::current() else {
        return;
    };
    if dom.document().ready_state() == "loading" {
        let ready = dom.clone();
        let on_ready = Closure::once_into_js(move || init(&ready));
        let _ = dom
            .document()
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref());
    } else {
        init(&dom);
    }
}

fn init(dom: &BrowserDom) {
    let config = SiteConfig::load(dom);

    document::mark_scripted(dom);
    document::stamp_year(dom, document::current_year());
    bind_nav(dom);
    bind_accordions(dom);
    bind_theme(dom);
    bind_contact_form(dom);
    bind_lazy_images(dom);
    bind_scroll_top(dom, config.scroll_top_threshold_px);
    bind_modals(dom, &config);

    if config.analytics_opt_in {
        inject_analytics(dom, &config);
    }
    if let Some(path) = &config.service_worker_path {
        register_service_worker(dom, path);
    }
    log::info!("site initialized");
}

// =============================================================
// Event helpers
// =============================================================

fn listen<F>(target: &EventTarget, kind: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("failed to bind {kind} listener");
    }
    // Listeners live for the lifetime of the page.
    closure.forget();
}

fn event_target(ev: &Event) -> Option<Element> {
    ev.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn event_key(ev: &Event) -> Option<Key> {
    ev.dyn_ref::<KeyboardEvent>().map(|k| Key::from_key_name(&k.key()))
}

fn apply_dispatch(ev: &Event, dispatch: Dispatch) {
    if dispatch.prevent_default {
        ev.prevent_default();
    }
    if dispatch.stop_propagation {
        ev.stop_propagation();
    }
}

// =============================================================
// Modals
// =============================================================

fn bind_modals(dom: &BrowserDom, config: &SiteConfig) {
    let mut manager = ModalManager::new(
        dom.clone(),
        TimeoutScheduler,
        config.dialog.clone(),
        config.focus_delay_ms,
        config.escape_policy.clone(),
    );
    manager.register_delegated(&config.cards_container, &config.card_selector, &config.cards);
    manager.register_triggers(&config.triggers);
    let manager: Manager = Rc::new(RefCell::new(manager));

    let containers = manager.borrow().delegation_containers();
    for container in containers {
        let m = Rc::clone(&manager);
        listen(&container, "click", move |ev| {
            let Some(target) = event_target(&ev) else {
                return;
            };
            let dispatch = m.borrow_mut().on_card_click(&target);
            apply_dispatch(&ev, dispatch);
        });
        let m = Rc::clone(&manager);
        listen(&container, "keydown", move |ev| {
            let (Some(target), Some(key)) = (event_target(&ev), event_key(&ev)) else {
                return;
            };
            let dispatch = m.borrow_mut().on_card_key(&target, &key);
            apply_dispatch(&ev, dispatch);
        });
    }

    let ids = manager.borrow().dialog_ids().to_vec();
    for id in &ids {
        bind_dialog(dom, &manager, id);
    }

    let m = Rc::clone(&manager);
    listen(dom.document(), "keydown", move |ev| {
        if event_key(&ev) == Some(Key::Escape) {
            m.borrow_mut().on_escape();
        }
    });

    let m = Rc::clone(&manager);
    listen(dom.window(), "pagehide", move |_| m.borrow_mut().reset());

    log::info!("modals initialized: {}", ids.len());
}

fn bind_dialog(dom: &BrowserDom, manager: &Manager, id: &str) {
    let (trigger, dialog, close, content) = {
        let m = manager.borrow();
        (
            m.trigger_of(id).cloned(),
            m.dialog_element(id).cloned(),
            m.close_control(id).cloned(),
            m.content_element(id),
        )
    };

    if let Some(Trigger::Element(trigger_id)) = trigger {
        if let Some(el) = dom.element_by_id(&trigger_id) {
            let (m, dialog_id) = (Rc::clone(manager), id.to_owned());
            listen(&el, "click", move |ev| {
                let dispatch = m.borrow_mut().on_trigger_activate(&dialog_id);
                apply_dispatch(&ev, dispatch);
            });
            // Native controls already turn Enter/Space into a click.
            if !is_natively_interactive(dom, &el) {
                let (m, dialog_id) = (Rc::clone(manager), id.to_owned());
                listen(&el, "keydown", move |ev| {
                    let Some(key) = event_key(&ev) else {
                        return;
                    };
                    let dispatch = m.borrow_mut().on_trigger_key(&dialog_id, &key);
                    apply_dispatch(&ev, dispatch);
                });
            }
        }
    }

    if let Some(close) = close {
        let (m, dialog_id) = (Rc::clone(manager), id.to_owned());
        listen(&close, "click", move |ev| {
            let dispatch = m.borrow_mut().on_close_control(&dialog_id);
            apply_dispatch(&ev, dispatch);
        });
    }

    if let Some(dialog) = dialog {
        let (m, dialog_id) = (Rc::clone(manager), id.to_owned());
        listen(&dialog, "click", move |ev| {
            let Some(target) = event_target(&ev) else {
                return;
            };
            let dispatch = m.borrow_mut().on_dialog_click(&dialog_id, &target);
            apply_dispatch(&ev, dispatch);
        });
    }

    // Content clicks never reach the backdrop handler.
    if let Some(content) = content {
        listen(&content, "click", |ev| ev.stop_propagation());
    }
}

// =============================================================
// Page behaviors
// =============================================================

fn bind_nav(dom: &BrowserDom) {
    let (Some(toggle), Some(links)) = (dom.element_by_id(nav::MENU_TOGGLE_ID), dom.element_by_id(nav::NAV_LINKS_ID))
    else {
        return;
    };
    let (d, target) = (dom.clone(), toggle.clone());
    listen(&target, "click", move |_| {
        nav::toggle_menu(&d, &toggle, &links);
    });
}

fn bind_accordions(dom: &BrowserDom) {
    for button in dom.query_all(nav::ACCORDION_SELECTOR) {
        let (d, target) = (dom.clone(), button.clone());
        listen(&target, "click", move |_| {
            nav::toggle_accordion(&d, &button);
        });
    }
}

fn bind_theme(dom: &BrowserDom) {
    theme::init(dom, &LocalStorage, theme::system_prefers_dark());
    let Some(toggle) = dom.element_by_id(theme::TOGGLE_ID) else {
        return;
    };
    let d = dom.clone();
    listen(&toggle, "click", move |_| {
        theme::toggle(&d, &LocalStorage);
    });
}

fn bind_contact_form(dom: &BrowserDom) {
    let Some(form) = dom
        .element_by_id(contact_form::FORM_ID)
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };
    let (d, f) = (dom.clone(), form.clone());
    listen(&form, "submit", move |ev| {
        ev.prevent_default();
        if contact_form::submit(&d, f.report_validity()) == contact_form::Submission::Accepted {
            f.reset();
        }
    });
}

fn bind_lazy_images(dom: &BrowserDom) {
    let images = lazy_images::lazy_images(dom);
    if images.is_empty() {
        return;
    }
    let d = dom.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let img = entry.target();
                lazy_images::reveal(&d, &img);
                observer.unobserve(&img);
            }
        },
    );
    let Ok(observer) = IntersectionObserver::new(callback.as_ref().unchecked_ref()) else {
        log::warn!("IntersectionObserver unavailable; lazy images load natively");
        return;
    };
    callback.forget();
    for img in &images {
        observer.observe(img);
    }
}

fn bind_scroll_top(dom: &BrowserDom, threshold_px: f64) {
    let Some(button) = dom.element_by_id(scroll_top::BUTTON_ID) else {
        return;
    };
    let (d, b) = (dom.clone(), button.clone());
    listen(dom.window(), "scroll", move |_| {
        scroll_top::on_scroll(&d, &b, threshold_px);
    });
    let (d, b) = (dom.clone(), button.clone());
    listen(&button, "click", move |ev| {
        ev.prevent_default();
        scroll_top::activate(&d, &b);
    });
}

fn inject_analytics(dom: &BrowserDom, config: &SiteConfig) {
    let document = dom.document();
    let Some(script) = document
        .create_element("script")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
    else {
        return;
    };
    script.set_defer(true);
    let _ = script.set_attribute("data-domain", &config.analytics_domain);
    script.set_src(&config.analytics_src);
    if let Some(head) = document.head() {
        let _ = head.append_child(&script);
    }
}

fn register_service_worker(dom: &BrowserDom, path: &str) {
    let navigator = dom.window().navigator();
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        log::info!("service workers unsupported; offline cache disabled");
        return;
    }
    let promise = navigator.service_worker().register(path);
    let path = path.to_owned();
    wasm_bindgen_futures::spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => log::info!("service worker registered: {path}"),
            Err(e) => log::warn!("service worker registration failed: {e:?}"),
        }
    });
}
