use std::collections::HashMap;

use crate::config::{CardBinding, DialogSelectors, EscapePolicy, TriggerBinding};
use crate::dom::{Dom, Key, ensure_button_semantics};

use super::schedule::{PendingTasks, Scheduler};
use super::scroll_lock::ScrollLock;

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

const ARIA_HIDDEN: &str = "aria-hidden";
const NESTED_INTERACTIVE: &str = "a, button";

/// What activates a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// An element with its own listeners, looked up by id.
    Element(String),
    /// A card whose activations arrive through a delegated container.
    Card(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
}

/// Returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalHandle {
    id: String,
}

impl ModalHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// How the browser glue should treat the event it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Dispatch {
    pub const IGNORED: Self = Self { prevent_default: false, stop_propagation: false };
    pub const CONSUMED: Self = Self { prevent_default: true, stop_propagation: true };

    #[cfg(test)]
    pub fn is_consumed(self) -> bool {
        self.prevent_default
    }
}

/// One registered dialog.
struct Modal<E> {
    trigger: Trigger,
    /// Resolved element for [`Trigger::Element`] and [`Trigger::Card`].
    trigger_el: E,
    dialog: E,
    overlay: Option<E>,
    close_control: Option<E>,
    visibility: Visibility,
    return_focus: Option<E>,
}

/// A container whose card activations are resolved by event target.
struct Delegation<E> {
    container: E,
    card_selector: String,
    /// Card id → dialog id.
    cards: HashMap<String, String>,
}

/// Open/close lifecycle, focus handling and dismissal rules for every
/// dialog on the page.
pub struct ModalManager<D: Dom, S: Scheduler> {
    dom: D,
    scheduler: S,
    selectors: DialogSelectors,
    focus_delay_ms: u32,
    escape_policy: EscapePolicy,
    modals: HashMap<String, Modal<D::Element>>,
    registration_order: Vec<String>,
    /// Open dialogs, oldest first.
    open_order: Vec<String>,
    delegations: Vec<Delegation<D::Element>>,
    scroll_lock: ScrollLock,
    pending_focus: PendingTasks<S::Task>,
}

/// Borrowed view of one registered dialog.
pub struct ModalRef<'a, D: Dom, S: Scheduler> {
    manager: &'a mut ModalManager<D, S>,
    id: String,
}

impl<D: Dom, S: Scheduler> ModalRef<'_, D, S> {
    pub fn open(&mut self) -> bool {
        self.manager.open(&self.id)
    }

    pub fn close(&mut self) -> bool {
        self.manager.close(&self.id)
    }

    pub fn is_open(&self) -> bool {
        self.manager.is_open(&self.id)
    }
}

impl<D: Dom, S: Scheduler> ModalManager<D, S> {
    pub fn new(dom: D, scheduler: S, selectors: DialogSelectors, focus_delay_ms: u32, escape_policy: EscapePolicy) -> Self {
        Self {
            dom,
            scheduler,
            selectors,
            focus_delay_ms,
            escape_policy,
            modals: HashMap::new(),
            registration_order: Vec::new(),
            open_order: Vec::new(),
            delegations: Vec::new(),
            scroll_lock: ScrollLock::new(),
            pending_focus: PendingTasks::default(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    // --- Registration ---

    /// Bind `trigger` to the dialog with id `dialog_id`.
    ///
    /// Returns `None` and logs a warning when either element is missing or
    /// the dialog is already registered; other registrations are unaffected.
    pub fn register_modal(&mut self, trigger: Trigger, dialog_id: &str) -> Option<ModalHandle> {
        if self.modals.contains_key(dialog_id) {
            log::warn!("modal already registered: {dialog_id}");
            return None;
        }
        let trigger_id = match &trigger {
            Trigger::Element(id) | Trigger::Card(id) => id.as_str(),
        };
        let Some(trigger_el) = self.dom.element_by_id(trigger_id) else {
            log::warn!("modal trigger not found: {trigger_id}");
            return None;
        };
        let Some(dialog) = self.dom.element_by_id(dialog_id) else {
            log::warn!("modal not found: {dialog_id}");
            return None;
        };

        ensure_button_semantics(&self.dom, &trigger_el);
        self.dom.set_attribute(&dialog, ARIA_HIDDEN, "true");

        let modal = Modal {
            trigger,
            trigger_el,
            overlay: self.dom.query_within(&dialog, &self.selectors.overlay),
            close_control: self.dom.query_within(&dialog, &self.selectors.close),
            dialog,
            visibility: Visibility::Closed,
            return_focus: None,
        };
        self.modals.insert(dialog_id.to_owned(), modal);
        self.registration_order.push(dialog_id.to_owned());
        Some(ModalHandle { id: dialog_id.to_owned() })
    }

    /// Bind a family of cards through one delegated container.
    ///
    /// Returns the number of dialogs registered; zero when the container is
    /// missing.
    pub fn register_delegated(&mut self, container_selector: &str, card_selector: &str, bindings: &[CardBinding]) -> usize {
        let Some(container) = self.dom.query(container_selector) else {
            log::warn!("cards container not found: {container_selector}");
            return 0;
        };
        let mut cards = HashMap::new();
        for binding in bindings {
            if self.register_modal(Trigger::Card(binding.card.clone()), &binding.dialog).is_some() {
                cards.insert(binding.card.clone(), binding.dialog.clone());
            }
        }
        let bound = cards.len();
        self.delegations.push(Delegation { container, card_selector: card_selector.to_owned(), cards });
        bound
    }

    /// Bind standalone triggers looked up by id. Returns the number bound.
    pub fn register_triggers(&mut self, bindings: &[TriggerBinding]) -> usize {
        bindings
            .iter()
            .filter(|b| self.register_modal(Trigger::Element(b.trigger.clone()), &b.dialog).is_some())
            .count()
    }

    #[cfg(test)]
    pub fn handle(&self, dialog_id: &str) -> Option<ModalHandle> {
        self.modals.contains_key(dialog_id).then(|| ModalHandle { id: dialog_id.to_owned() })
    }

    /// Registered dialog ids, in registration order.
    pub fn dialog_ids(&self) -> &[String] {
        &self.registration_order
    }

    pub fn modal(&mut self, dialog_id: &str) -> Option<ModalRef<'_, D, S>> {
        if !self.modals.contains_key(dialog_id) {
            return None;
        }
        Some(ModalRef { manager: self, id: dialog_id.to_owned() })
    }

    pub fn trigger_of(&self, dialog_id: &str) -> Option<&Trigger> {
        self.modals.get(dialog_id).map(|m| &m.trigger)
    }

    pub fn dialog_element(&self, dialog_id: &str) -> Option<&D::Element> {
        self.modals.get(dialog_id).map(|m| &m.dialog)
    }

    pub fn close_control(&self, dialog_id: &str) -> Option<&D::Element> {
        self.modals.get(dialog_id).and_then(|m| m.close_control.as_ref())
    }

    pub fn content_element(&self, dialog_id: &str) -> Option<D::Element> {
        let modal = self.modals.get(dialog_id)?;
        self.dom.query_within(&modal.dialog, &self.selectors.content)
    }

    pub fn delegation_containers(&self) -> Vec<D::Element> {
        self.delegations.iter().map(|d| d.container.clone()).collect()
    }

    // --- State ---

    /// Open as tracked by the manager and as reported by `aria-hidden`.
    pub fn is_open(&self, dialog_id: &str) -> bool {
        self.modals.get(dialog_id).is_some_and(|m| {
            m.visibility == Visibility::Open
                && self.dom.attribute(&m.dialog, ARIA_HIDDEN).as_deref() == Some("false")
        })
    }

    #[cfg(test)]
    pub fn open_count(&self) -> usize {
        self.open_order.len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    #[cfg(test)]
    pub fn pending_focus_count(&self) -> usize {
        self.pending_focus.len()
    }

    // --- Lifecycle ---

    /// Open a dialog; focus returns to its registered trigger on close.
    pub fn open(&mut self, dialog_id: &str) -> bool {
        self.open_from(dialog_id, None)
    }

    /// Open a dialog on behalf of `opener`, which receives focus on close.
    ///
    /// Returns `false` if the dialog is unknown or already open. Either way a
    /// known dialog gets a fresh focus shift and any pending one is cancelled.
    pub fn open_from(&mut self, dialog_id: &str, opener: Option<D::Element>) -> bool {
        let Some(modal) = self.modals.get_mut(dialog_id) else {
            return false;
        };
        let changed = modal.visibility == Visibility::Closed;
        if changed {
            self.dom.set_attribute(&modal.dialog, ARIA_HIDDEN, "false");
            modal.visibility = Visibility::Open;
            modal.return_focus = Some(opener.unwrap_or_else(|| modal.trigger_el.clone()));
            self.scroll_lock.acquire(&self.dom);
            self.open_order.push(dialog_id.to_owned());
            log::debug!("modal opened: {dialog_id}");
        }

        match modal.close_control.clone() {
            Some(target) => {
                let dom = self.dom.clone();
                let task = self.scheduler.schedule(self.focus_delay_ms, Box::new(move || dom.focus(&target)));
                self.pending_focus.replace(dialog_id, task);
            }
            None => self.pending_focus.cancel(dialog_id),
        }
        changed
    }

    /// Close a dialog and hand focus back to whatever opened it, or to the
    /// close control of the most recently opened dialog still showing.
    ///
    /// Returns `false` if the dialog is unknown or already closed.
    pub fn close(&mut self, dialog_id: &str) -> bool {
        self.pending_focus.cancel(dialog_id);
        let Some(modal) = self.modals.get_mut(dialog_id) else {
            return false;
        };
        if modal.visibility == Visibility::Closed {
            return false;
        }
        self.dom.set_attribute(&modal.dialog, ARIA_HIDDEN, "true");
        modal.visibility = Visibility::Closed;
        self.scroll_lock.release(&self.dom);
        let return_focus = modal.return_focus.take();
        self.open_order.retain(|id| id != dialog_id);
        // A dialog still open on top keeps focus; the opener sits behind it.
        let target = match self.open_order.last() {
            Some(top) => self.modals.get(top).and_then(|m| m.close_control.clone()),
            None => return_focus,
        };
        if let Some(target) = target {
            self.dom.focus(&target);
        }
        log::debug!("modal closed: {dialog_id}");
        true
    }

    /// Full teardown: every dialog closed, no pending focus, scroll released.
    pub fn reset(&mut self) {
        self.pending_focus.cancel_all();
        for modal in self.modals.values_mut() {
            if modal.visibility == Visibility::Open {
                self.dom.set_attribute(&modal.dialog, ARIA_HIDDEN, "true");
                modal.visibility = Visibility::Closed;
            }
            modal.return_focus = None;
        }
        self.open_order.clear();
        self.scroll_lock.reset(&self.dom);
    }

    // --- Events ---

    /// Pointer activation inside a delegated card container.
    pub fn on_card_click(&mut self, target: &D::Element) -> Dispatch {
        match self.resolve_card(target) {
            Some((dialog_id, card)) => self.activate(&dialog_id, card),
            None => Dispatch::IGNORED,
        }
    }

    /// Keydown inside a delegated card container.
    pub fn on_card_key(&mut self, target: &D::Element, key: &Key) -> Dispatch {
        if !key.activates() {
            return Dispatch::IGNORED;
        }
        self.on_card_click(target)
    }

    /// Pointer activation of a directly bound trigger.
    pub fn on_trigger_activate(&mut self, dialog_id: &str) -> Dispatch {
        let Some(opener) = self.modals.get(dialog_id).map(|m| m.trigger_el.clone()) else {
            return Dispatch::IGNORED;
        };
        self.activate(dialog_id, opener)
    }

    /// Keydown on a directly bound trigger.
    pub fn on_trigger_key(&mut self, dialog_id: &str, key: &Key) -> Dispatch {
        if !key.activates() {
            return Dispatch::IGNORED;
        }
        self.on_trigger_activate(dialog_id)
    }

    /// Click anywhere inside a dialog. Only the backdrop dismisses.
    pub fn on_dialog_click(&mut self, dialog_id: &str, target: &D::Element) -> Dispatch {
        let Some(modal) = self.modals.get(dialog_id) else {
            return Dispatch::IGNORED;
        };
        let on_backdrop = self.dom.is_same(target, &modal.dialog)
            || modal.overlay.as_ref().is_some_and(|overlay| self.dom.is_same(target, overlay));
        if on_backdrop && self.close(dialog_id) {
            return Dispatch { prevent_default: false, stop_propagation: true };
        }
        Dispatch::IGNORED
    }

    /// Activation of the dialog's close control.
    pub fn on_close_control(&mut self, dialog_id: &str) -> Dispatch {
        if !self.modals.contains_key(dialog_id) {
            return Dispatch::IGNORED;
        }
        self.close(dialog_id);
        Dispatch::CONSUMED
    }

    /// Escape closes exactly one open dialog, chosen by the escape policy.
    pub fn on_escape(&mut self) -> Option<String> {
        let target = self.escape_candidates().into_iter().find(|id| self.is_open(id))?;
        self.close(&target);
        Some(target)
    }

    fn escape_candidates(&self) -> Vec<String> {
        let mut ordered: Vec<String> = match &self.escape_policy {
            EscapePolicy::MostRecent => self.open_order.iter().rev().cloned().collect(),
            EscapePolicy::Fixed(order) => order.clone(),
        };
        for id in &self.registration_order {
            if !ordered.contains(id) {
                ordered.push(id.clone());
            }
        }
        ordered
    }

    fn activate(&mut self, dialog_id: &str, opener: D::Element) -> Dispatch {
        self.open_from(dialog_id, Some(opener));
        Dispatch::CONSUMED
    }

    /// Resolve an event target to `(dialog id, card element)`.
    ///
    /// Targets inside an anchor or button nested in the card are ignored so
    /// embedded links stay independently clickable.
    fn resolve_card(&self, target: &D::Element) -> Option<(String, D::Element)> {
        let delegation = self.delegations.iter().find(|d| self.dom.contains(&d.container, target))?;
        let card = self.dom.closest(target, &delegation.card_selector)?;
        if !self.dom.contains(&delegation.container, &card) {
            return None;
        }
        if let Some(nested) = self.dom.closest(target, NESTED_INTERACTIVE) {
            if !self.dom.is_same(&nested, &card) && self.dom.contains(&card, &nested) {
                return None;
            }
        }
        let dialog_id = delegation.cards.get(&self.dom.id_of(&card))?;
        if !self.modals.contains_key(dialog_id) {
            log::warn!("modal not found: {dialog_id}");
            return None;
        }
        Some((dialog_id.clone(), card))
    }
}
