//! Visibility resolution.
//!
//! Hidden state only ever propagates downwards: once an ancestor is hidden by
//! `display:none`, `visibility:hidden`, the `hidden` attribute or
//! `aria-hidden="true"`, every descendant is hidden from assistive technology
//! no matter what it declares itself.

use crate::host::ComputedStyle;
use serde::{Deserialize, Serialize};

/// Visibility state of one element, including inherited flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Visibility {
    /// `hidden` attribute on this element or an ancestor.
    pub hidden: bool,
    /// `display: none` on this element or an ancestor.
    pub display_none: bool,
    /// `visibility: hidden | collapse` on this element or an ancestor.
    pub visibility_hidden: bool,
    /// `aria-hidden="true"` on this element or an ancestor.
    pub aria_hidden: bool,
    /// Rendered on screen.
    pub visible_on_screen: bool,
    /// Exposed to assistive technology.
    pub visible_to_at: bool,
}

impl Visibility {
    /// State of the (virtual) parent of a document root: everything visible.
    #[must_use]
    pub fn root() -> Self {
        Self {
            visible_on_screen: true,
            visible_to_at: true,
            ..Self::default()
        }
    }

    /// Resolves the visibility of an element from its own attributes and style
    /// and its parent's already-resolved state.
    ///
    /// `style` is `None` when the host could not compute a style; the element's
    /// own style is then treated as visible.
    #[must_use]
    pub fn resolve(
        tag_name: &str,
        hidden_attr: bool,
        aria_hidden_attr: Option<&str>,
        style: Option<&ComputedStyle>,
        parent: &Visibility,
    ) -> Self {
        // Area elements live inside a <map>, whose own box never renders.
        let is_area = tag_name == "area";

        let hidden = hidden_attr || (parent.hidden && !is_area);

        let own_display_none = style.is_some_and(|s| s.display.trim() == "none");
        let display_none = own_display_none || (parent.display_none && !is_area);

        let own_visibility_hidden = style.is_some_and(|s| {
            matches!(s.visibility.trim(), "hidden" | "collapse")
        });
        let visibility_hidden = own_visibility_hidden || parent.visibility_hidden;

        let own_aria_hidden =
            aria_hidden_attr.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        let aria_hidden = own_aria_hidden || parent.aria_hidden;

        let visible_on_screen = !(hidden || display_none || visibility_hidden);
        let visible_to_at = visible_on_screen && !aria_hidden;

        Self {
            hidden,
            display_none,
            visibility_hidden,
            aria_hidden,
            visible_on_screen,
            visible_to_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(display: &str, visibility: &str) -> ComputedStyle {
        ComputedStyle::default()
            .display(display)
            .visibility(visibility)
    }

    #[test]
    fn visible_by_default() {
        let v = Visibility::resolve("div", false, None, None, &Visibility::root());
        assert!(v.visible_on_screen);
        assert!(v.visible_to_at);
    }

    #[test]
    fn display_none_hides_from_screen_and_at() {
        let s = style("none", "visible");
        let v = Visibility::resolve("div", false, None, Some(&s), &Visibility::root());
        assert!(!v.visible_on_screen);
        assert!(!v.visible_to_at);
    }

    #[test]
    fn aria_hidden_keeps_on_screen() {
        let v = Visibility::resolve("div", false, Some("true"), None, &Visibility::root());
        assert!(v.visible_on_screen);
        assert!(!v.visible_to_at);
    }

    #[test]
    fn aria_hidden_false_is_not_hidden() {
        let v = Visibility::resolve("div", false, Some("false"), None, &Visibility::root());
        assert!(v.visible_to_at);
    }

    #[test]
    fn collapse_counts_as_hidden() {
        let s = style("block", "collapse");
        let v = Visibility::resolve("tr", false, None, Some(&s), &Visibility::root());
        assert!(!v.visible_to_at);
    }

    #[test]
    fn child_cannot_unhide_itself() {
        let parent = Visibility::resolve(
            "div",
            false,
            None,
            Some(&style("block", "hidden")),
            &Visibility::root(),
        );
        let child = Visibility::resolve(
            "span",
            false,
            Some("false"),
            Some(&style("inline", "visible")),
            &parent,
        );
        assert!(!child.visible_to_at);
    }

    #[test]
    fn area_ignores_inherited_hidden_and_map_display() {
        let map = Visibility::resolve(
            "map",
            true,
            None,
            Some(&style("none", "visible")),
            &Visibility::root(),
        );
        let area = Visibility::resolve("area", false, None, None, &map);
        assert!(area.visible_on_screen);
        assert!(area.visible_to_at);
    }

    /// Exhaustive check over every combination of hiding mechanisms on a chain
    /// of three ancestors: the leaf is hidden from AT iff any link is hidden.
    #[test]
    fn hiding_is_monotonic_over_ancestor_chains() {
        const MECHANISMS: usize = 5; // none, hidden attr, display, visibility, aria
        for a in 0..MECHANISMS {
            for b in 0..MECHANISMS {
                for c in 0..MECHANISMS {
                    let mut state = Visibility::root();
                    for m in [a, b, c] {
                        let s = match m {
                            2 => style("none", "visible"),
                            3 => style("block", "hidden"),
                            _ => style("block", "visible"),
                        };
                        let aria = if m == 4 { Some("true") } else { None };
                        state = Visibility::resolve("div", m == 1, aria, Some(&s), &state);
                    }
                    let leaf = Visibility::resolve(
                        "span",
                        false,
                        Some("false"),
                        Some(&style("inline", "visible")),
                        &state,
                    );
                    let any_hidden = [a, b, c].iter().any(|&m| m != 0);
                    assert_eq!(
                        leaf.visible_to_at, !any_hidden,
                        "chain ({a}, {b}, {c}) resolved to {leaf:?}"
                    );
                }
            }
        }
    }
}
