use super::*;

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

pub(crate) fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

pub(crate) fn is_field_tag(tag_name: &str) -> bool {
    matches!(tag_name, "input" | "textarea" | "select")
}

pub(crate) fn is_checkbox_or_radio_input_element(element: &Element) -> bool {
    element.tag_name == "input" && matches!(input_type(element).as_str(), "checkbox" | "radio")
}

pub(crate) fn input_type(element: &Element) -> String {
    element
        .attrs
        .get("type")
        .map(|kind| kind.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "text".to_string())
}

pub(crate) fn is_submit_control(element: &Element) -> bool {
    match element.tag_name.as_str() {
        "button" => matches!(
            element
                .attrs
                .get("type")
                .map(|kind| kind.to_ascii_lowercase())
                .as_deref(),
            None | Some("submit")
        ),
        "input" => matches!(input_type(element).as_str(), "submit" | "image"),
        _ => false,
    }
}

pub(crate) fn escape_html_text_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_html_attr_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out: String = it.by_ref().take(max_chars).collect();
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
