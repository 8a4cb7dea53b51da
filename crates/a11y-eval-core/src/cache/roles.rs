//! ARIA role resolution.

/// Landmark roles.
pub const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "complementary",
    "contentinfo",
    "form",
    "main",
    "navigation",
    "region",
    "search",
];

/// Interactive widget roles that need an accessible name.
pub const WIDGET_ROLES: &[&str] = &[
    "button",
    "checkbox",
    "combobox",
    "link",
    "listbox",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "radio",
    "scrollbar",
    "searchbox",
    "slider",
    "spinbutton",
    "switch",
    "tab",
    "tabpanel",
    "textbox",
    "treeitem",
];

/// Roles whose name may be computed from descendant content.
const NAME_FROM_CONTENT_ROLES: &[&str] = &[
    "button",
    "cell",
    "checkbox",
    "columnheader",
    "gridcell",
    "heading",
    "link",
    "listitem",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "radio",
    "row",
    "rowheader",
    "switch",
    "tab",
    "tooltip",
    "treeitem",
];

/// Elements that start a sectioning context; `header`/`footer` inside them
/// are not page landmarks.
const SECTIONING_TAGS: &[&str] = &["article", "aside", "main", "nav", "section"];

/// Returns `true` for landmark roles.
#[must_use]
pub fn is_landmark_role(role: &str) -> bool {
    LANDMARK_ROLES.contains(&role)
}

/// Returns `true` for widget roles.
#[must_use]
pub fn is_widget_role(role: &str) -> bool {
    WIDGET_ROLES.contains(&role)
}

/// Returns `true` when an element with `role` takes its name from content.
#[must_use]
pub fn allows_name_from_content(role: &str) -> bool {
    NAME_FROM_CONTENT_ROLES.contains(&role)
}

/// Returns `true` for tags that start a sectioning context.
#[must_use]
pub fn is_sectioning_tag(tag: &str) -> bool {
    SECTIONING_TAGS.contains(&tag)
}

fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

fn has_name_attribute(attributes: &[(String, String)]) -> bool {
    ["aria-label", "aria-labelledby", "title"]
        .iter()
        .any(|a| attribute(attributes, a).is_some_and(|v| !v.trim().is_empty()))
}

/// Resolves the role of an element: the first token of an explicit `role`
/// attribute, otherwise the implicit role of the tag.
///
/// Returns the role and whether it was explicit.
#[must_use]
pub fn resolve_role(
    tag: &str,
    attributes: &[(String, String)],
    in_sectioning: bool,
) -> (Option<String>, bool) {
    let explicit = attribute(attributes, "role")
        .and_then(|r| r.split_whitespace().next())
        .map(str::to_ascii_lowercase);
    if let Some(role) = explicit {
        return (Some(role), true);
    }
    (implicit_role(tag, attributes, in_sectioning).map(String::from), false)
}

fn implicit_role(
    tag: &str,
    attributes: &[(String, String)],
    in_sectioning: bool,
) -> Option<&'static str> {
    let attr = |name: &str| attribute(attributes, name);
    let role = match tag {
        "a" | "area" => return attr("href").map(|_| "link"),
        "article" => "article",
        "aside" => "complementary",
        "button" | "summary" => "button",
        "dd" => "definition",
        "details" | "fieldset" | "optgroup" => "group",
        "dialog" => "dialog",
        "dt" => "term",
        "figure" => "figure",
        "footer" if !in_sectioning => "contentinfo",
        "header" if !in_sectioning => "banner",
        "form" if has_name_attribute(attributes) => "form",
        "section" if has_name_attribute(attributes) => "region",
        "search" => "search",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "hr" => "separator",
        "img" => {
            return Some(if attr("alt") == Some("") {
                "presentation"
            } else {
                "img"
            })
        }
        "input" => return input_role(attr("type"), attr("list").is_some()),
        "li" => "listitem",
        "main" => "main",
        "menu" | "ol" | "ul" => "list",
        "nav" => "navigation",
        "option" => "option",
        "output" => "status",
        "progress" => "progressbar",
        "select" => {
            let size = attr("size")
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0);
            if attr("multiple").is_some() || size > 1 {
                "listbox"
            } else {
                "combobox"
            }
        }
        "table" => "table",
        "tbody" | "tfoot" | "thead" => "rowgroup",
        "td" => "cell",
        "textarea" => "textbox",
        "th" => {
            if attr("scope").is_some_and(|s| s.trim().eq_ignore_ascii_case("row")) {
                "rowheader"
            } else {
                "columnheader"
            }
        }
        "tr" => "row",
        _ => return None,
    };
    Some(role)
}

fn input_role(input_type: Option<&str>, has_list: bool) -> Option<&'static str> {
    let ty = input_type.map_or_else(|| "text".to_string(), |t| t.trim().to_ascii_lowercase());
    let role = match ty.as_str() {
        "button" | "image" | "reset" | "submit" => "button",
        "checkbox" => "checkbox",
        "radio" => "radio",
        "range" => "slider",
        "number" => "spinbutton",
        "hidden" | "file" | "color" | "date" | "datetime-local" | "month" | "time" | "week"
        | "password" => return None,
        "search" if !has_list => "searchbox",
        _ if has_list => "combobox",
        _ => "textbox",
    };
    Some(role)
}

/// Heading level of an element: `hN` gives `N`, role `heading` takes
/// `aria-level` (default 2). An `aria-level` on a native heading overrides
/// its tag level.
#[must_use]
pub fn heading_level(tag: &str, role: Option<&str>, aria_level: Option<&str>) -> Option<u8> {
    if role != Some("heading") {
        return None;
    }
    let explicit = aria_level
        .and_then(|l| l.trim().parse::<u8>().ok())
        .filter(|l| *l >= 1);
    let native = match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    };
    explicit.or(native).or(Some(2))
}
