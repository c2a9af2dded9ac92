//! Event adapter.
//!
//! Hosts deliver document events through [`MultipleSelect::handle_event`],
//! which maps them onto the widget's named operations. Nothing here changes
//! state the public API could not change itself.

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{Dom, DomEvent, ElementId, EventKind, Key};

use super::{MultipleSelect, classes};
use crate::error::Result;

impl<D: Dom> MultipleSelect<D> {
    /// Handle an event dispatched to one of the widget's elements.
    ///
    /// Returns `true` if the event was consumed. Keys the widget acts on have
    /// their default action prevented. Events for other elements, or arriving
    /// before `initialize`, are ignored.
    pub fn handle_event(&mut self, event: &mut DomEvent) -> bool {
        let Some(view) = &self.view else {
            return false;
        };
        let input = view.searcher.input();
        let display = view.display;

        let _span = tracing::trace_span!(
            target: targets::MULTIPLE_SELECT,
            span_names::DISPATCH,
            kind = ?event.kind,
            key = ?event.key,
        )
        .entered();

        let outcome = match event.kind {
            EventKind::KeyDown if event.target == input => self.on_key_down(event),
            EventKind::KeyUp | EventKind::Input if event.target == input => {
                self.on_input_changed()
            }
            EventKind::Focus if event.target == input => self.on_focus(),
            EventKind::Blur if event.target == input => self.on_blur(),
            EventKind::Click if self.is_within(event.target, display) => {
                self.on_click(event.target)
            }
            EventKind::MouseOver if self.is_within(event.target, display) => {
                self.on_mouse_over(event.target)
            }
            _ => Ok(false),
        };

        outcome.unwrap_or_else(|err| {
            tracing::warn!(
                target: targets::MULTIPLE_SELECT,
                widget = %self.id,
                error = %err,
                "failed to handle event"
            );
            false
        })
    }

    fn on_key_down(&mut self, event: &mut DomEvent) -> Result<bool> {
        let Some(key) = event.key else {
            return Ok(false);
        };

        let consumed = match key {
            Key::ArrowDown => {
                if self.is_search_results_visible() {
                    self.highlight_next_search_result()?;
                } else {
                    let text = self.input_text();
                    self.run_search(&text)?;
                }
                true
            }
            Key::ArrowUp => {
                self.highlight_previous_search_result()?;
                true
            }
            Key::Enter => {
                self.is_search_results_visible() && self.select_highlighted_search_result()?
            }
            // Tab only completes typed text; an empty input lets focus move on.
            Key::Tab => {
                !self.input_text().trim().is_empty()
                    && self.is_search_results_visible()
                    && self.select_highlighted_search_result()?
            }
            Key::Escape => {
                self.close_search_results()?;
                self.unhighlight_option_for_unselect();
                true
            }
            Key::Backspace if self.input_text().is_empty() => {
                if self.is_last_option_highlighted_for_unselect() {
                    self.remove_highlighted_option()
                } else {
                    self.highlight_option_for_unselect()
                }
            }
            Key::Delete => self.remove_highlighted_option(),
            key if key.is_printable() && !event.modifiers.has_command() => {
                self.unhighlight_option_for_unselect();
                false
            }
            _ => false,
        };

        if consumed {
            event.prevent_default();
        }
        Ok(consumed)
    }

    fn on_input_changed(&mut self) -> Result<bool> {
        let text = self.input_text();
        if self.searcher().is_some_and(|s| s.query() != text) {
            if !text.is_empty() {
                self.unhighlight_option_for_unselect();
            }
            self.run_search(&text)?;
        }
        Ok(false)
    }

    fn on_focus(&mut self) -> Result<bool> {
        let text = self.input_text();
        self.run_search(&text)?;
        Ok(false)
    }

    fn on_blur(&mut self) -> Result<bool> {
        self.close_search_results()?;
        self.unhighlight_option_for_unselect();
        Ok(false)
    }

    fn on_click(&mut self, target: ElementId) -> Result<bool> {
        if self.dom.has_class(target, classes::REMOVE_OPTION)
            && let Some(chip) = self.dom.parent(target)
            && let Some(index) = self.chosen.position_by_element(chip)
        {
            self.remove_chip(index);
            self.refresh_search();
            return Ok(true);
        }

        if let Some(index) = self.row_at(target) {
            if let Some(view) = self.view.as_mut() {
                view.searcher.highlight(&mut self.dom, index);
            }
            self.select_highlighted_search_result()?;
            return Ok(true);
        }

        let input = self.require_view()?.searcher.input();
        self.dom.focus(input);
        Ok(true)
    }

    fn on_mouse_over(&mut self, target: ElementId) -> Result<bool> {
        let Some(index) = self.row_at(target) else {
            return Ok(false);
        };
        if let Some(view) = self.view.as_mut() {
            view.searcher.highlight(&mut self.dom, index);
        }
        Ok(true)
    }

    /// The interactive results row `target` is, or lies inside.
    fn row_at(&self, target: ElementId) -> Option<usize> {
        let searcher = self.searcher()?;
        let mut current = Some(target);
        while let Some(element) = current {
            if let Some(index) = searcher.row_index_of(element) {
                return Some(index);
            }
            if element == searcher.results_list() {
                return None;
            }
            current = self.dom.parent(element);
        }
        None
    }

    fn is_within(&self, element: ElementId, container: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == container {
                return true;
            }
            current = self.dom.parent(id);
        }
        false
    }

    fn input_text(&self) -> String {
        self.searcher()
            .map(|s| self.dom.value(s.input()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_trellis_core::{IdAllocator, KeyboardModifiers, MemoryDom};

    fn fruits() -> MultipleSelect<MemoryDom> {
        let mut dom = MemoryDom::new();
        let select = dom.create_element("select");
        dom.set_attribute(select, "id", "fruits");
        dom.set_attribute(select, "multiple", "");
        dom.append_child(dom.body(), select).unwrap();
        let mut widget = MultipleSelect::bind(dom, select, &IdAllocator::new()).unwrap();
        widget.initialize().unwrap();
        for (value, text) in [("one", "One"), ("two", "Two"), ("three", "Three")] {
            widget.add_option(value, text).unwrap();
        }
        widget
    }

    fn input(widget: &MultipleSelect<MemoryDom>) -> ElementId {
        widget.searcher().unwrap().input()
    }

    fn type_text(widget: &mut MultipleSelect<MemoryDom>, text: &str) {
        let input = input(widget);
        widget.dom_mut().set_value(input, text);
        widget.handle_event(&mut DomEvent::new(EventKind::Input, input));
    }

    fn press(widget: &mut MultipleSelect<MemoryDom>, key: Key) -> DomEvent {
        let mut event = DomEvent::key_down(input(widget), key);
        widget.handle_event(&mut event);
        event
    }

    #[test]
    fn test_typing_then_enter_selects() {
        let mut widget = fruits();
        type_text(&mut widget, "t");
        assert_eq!(widget.searcher().unwrap().results(), vec!["Three", "Two"]);

        press(&mut widget, Key::ArrowDown);
        let event = press(&mut widget, Key::Enter);
        assert!(event.is_default_prevented());
        assert_eq!(widget.get_selected_values(), vec!["two"]);
        assert_eq!(widget.dom().value(input(&widget)), "");
    }

    #[test]
    fn test_arrow_down_opens_closed_results() {
        let mut widget = fruits();
        assert!(!widget.is_search_results_visible());
        press(&mut widget, Key::ArrowDown);
        assert!(widget.is_search_results_visible());
        assert_eq!(widget.searcher().unwrap().highlighted_index(), Some(0));
    }

    #[test]
    fn test_tab_with_empty_input_is_not_consumed() {
        let mut widget = fruits();
        press(&mut widget, Key::ArrowDown);
        let event = press(&mut widget, Key::Tab);
        assert!(!event.is_default_prevented());
        assert!(widget.get_selected_values().is_empty());
    }

    #[test]
    fn test_backspace_highlights_then_removes() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        widget.select_option_with_value("two").unwrap();

        press(&mut widget, Key::Backspace);
        assert!(widget.is_last_option_highlighted_for_unselect());
        press(&mut widget, Key::Backspace);
        assert_eq!(widget.get_selected_values(), vec!["one"]);
        assert!(!widget.is_last_option_highlighted_for_unselect());
    }

    #[test]
    fn test_printable_key_clears_chip_highlight() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        press(&mut widget, Key::Backspace);

        let event = press(&mut widget, Key::Character('x'));
        assert!(!event.is_default_prevented());
        assert!(!widget.is_last_option_highlighted_for_unselect());
    }

    #[test]
    fn test_command_shortcut_keeps_chip_highlight() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        press(&mut widget, Key::Backspace);

        let mut event = DomEvent::key_down(input(&widget), Key::Character('c')).with_modifiers(
            KeyboardModifiers {
                control: true,
                ..KeyboardModifiers::NONE
            },
        );
        widget.handle_event(&mut event);
        assert!(widget.is_last_option_highlighted_for_unselect());
    }

    #[test]
    fn test_events_before_initialize_are_ignored() {
        let mut dom = MemoryDom::new();
        let select = dom.create_element("select");
        dom.set_attribute(select, "multiple", "");
        let mut widget = MultipleSelect::bind(dom, select, &IdAllocator::new()).unwrap();
        assert!(!widget.handle_event(&mut DomEvent::click(select)));
    }
}
