use super::*;
use crate::core_impl::parse_html;

fn node(dom: &Dom, selector: &str) -> Result<NodeId> {
    dom.query_selector(selector)?
        .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
}

#[test]
fn insert_after_places_node_before_following_text() -> Result<()> {
    let mut dom = parse_html("<form><input id='a'> tail <input id='b'></form>")?;
    let a = node(&dom, "#a")?;
    let note = dom.create_detached_element("div");
    dom.set_attr(note, "id", "note")?;
    dom.insert_after(a, note)?;

    assert_eq!(dom.next_element_sibling(a), Some(note));
    let form = node(&dom, "form")?;
    assert_eq!(
        dom.dump_node(form),
        "<form><input id=\"a\"><div id=\"note\"></div> tail <input id=\"b\"></form>"
    );
    Ok(())
}

#[test]
fn removed_nodes_are_disconnected_with_their_subtree() -> Result<()> {
    let mut dom = parse_html("<div class='alert show' id='x'><span id='inner'>hi</span></div>")?;
    let banner = node(&dom, "#x")?;
    let inner = node(&dom, "#inner")?;
    assert!(dom.is_connected(inner));

    dom.remove_node(banner)?;
    assert!(!dom.is_connected(banner));
    assert!(!dom.is_connected(inner));
    assert!(dom.query_selector("#inner")?.is_none());
    // detached nodes still accept mutations
    dom.class_remove(banner, "show")?;
    assert!(!dom.class_contains(banner, "show"));
    Ok(())
}

#[test]
fn removing_the_root_is_rejected() -> Result<()> {
    let mut dom = parse_html("<p>x</p>")?;
    let root = dom.root;
    assert!(matches!(dom.remove_node(root), Err(Error::Runtime(_))));
    Ok(())
}

#[test]
fn append_child_rejects_cycles() -> Result<()> {
    let mut dom = parse_html("<div id='outer'><div id='inner'></div></div>")?;
    let outer = node(&dom, "#outer")?;
    let inner = node(&dom, "#inner")?;
    assert!(matches!(
        dom.append_child(inner, outer),
        Err(Error::Runtime(_))
    ));
    Ok(())
}

#[test]
fn class_list_edits_keep_other_tokens() -> Result<()> {
    let mut dom = parse_html("<input id='f' class='form-control  wide'>")?;
    let field = node(&dom, "#f")?;
    dom.class_add(field, "is-invalid")?;
    dom.class_add(field, "is-invalid")?;
    assert_eq!(
        dom.attr(field, "class").as_deref(),
        Some("form-control wide is-invalid")
    );
    dom.class_remove(field, "wide")?;
    dom.class_remove(field, "form-control")?;
    dom.class_remove(field, "is-invalid")?;
    assert_eq!(dom.attr(field, "class"), None);
    Ok(())
}

#[test]
fn closest_walks_up_from_nested_content() -> Result<()> {
    let dom = parse_html(
        "<form id='f'><button id='b' data-confirm><span id='icon'>x</span></button></form>",
    )?;
    let icon = node(&dom, "#icon")?;
    let button = node(&dom, "#b")?;
    assert_eq!(dom.closest(icon, "[data-confirm]")?, Some(button));
    assert_eq!(dom.closest(icon, "form > button")?, Some(button));
    assert_eq!(dom.closest(icon, ".alert")?, None);
    Ok(())
}

#[test]
fn select_value_follows_selected_option() -> Result<()> {
    let mut dom = parse_html(
        "<select id='s'><option>One</option><option value='2' selected>Two</option></select>",
    )?;
    let select = node(&dom, "#s")?;
    assert_eq!(dom.value(select)?, "2");
    dom.set_value(select, "One")?;
    assert_eq!(dom.value(select)?, "One");
    dom.set_value(select, "missing")?;
    assert_eq!(dom.value(select)?, "");
    Ok(())
}

#[test]
fn observers_see_capture_target_and_bubble_in_order() -> Result<()> {
    let mut page = Page::from_html(
        "<div id='outer'><form id='f'><input id='name' name='name'><button id='go'>Go</button></form></div>",
    )?;
    page.observe("#outer", "click", true)?;
    page.observe("#go", "click", false)?;
    page.observe("#outer", "click", false)?;
    page.click("#go")?;

    let phases = page
        .take_observed_events()
        .into_iter()
        .filter(|event| event.event_type == "click")
        .map(|event| format!("{}:{}", event.label, event.phase))
        .collect::<Vec<_>>();
    assert_eq!(
        phases,
        vec!["#outer:capture", "#go:target", "#outer:bubble"]
    );
    Ok(())
}

#[test]
fn blur_does_not_bubble_but_focusout_does() -> Result<()> {
    let mut page = Page::from_html("<form id='f'><input id='a'><input id='b'></form>")?;
    page.observe("#f", "blur", false)?;
    page.observe("#f", "focusout", false)?;
    page.focus("#a")?;
    page.focus("#b")?;

    let seen = page
        .take_observed_events()
        .into_iter()
        .map(|event| event.event_type)
        .collect::<Vec<_>>();
    assert_eq!(seen, vec!["focusout"]);
    Ok(())
}

#[test]
fn installation_registers_four_root_listeners() -> Result<()> {
    let page = Page::from_html("<p>no forms</p>")?;
    assert_eq!(page.listener_count(), 4);
    assert_eq!(page.enhancer().tracked_alerts(), 0);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn timers_run_in_due_then_schedule_order() -> Result<()> {
    let mut page = Page::from_html(
        "<div class='alert show' id='one'>1</div><div class='alert show' id='two'>2</div>",
    )?;
    let pending = page.pending_timers();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].due_at, 5000);
    assert!(pending[0].order < pending[1].order);

    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_trace_events(false);
    page.advance_time(5000)?;
    let logs = page.take_trace_logs();
    let hides = logs
        .iter()
        .filter(|line| line.starts_with("[enhance] alert hide"))
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(
        hides,
        vec![
            "[enhance] alert hide banner=div#one.alert.show",
            "[enhance] alert hide banner=div#two.alert.show",
        ]
    );
    Ok(())
}

#[test]
fn clock_rejects_going_backwards() -> Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    page.advance_time(10)?;
    assert!(matches!(page.advance_time(-1), Err(Error::Runtime(_))));
    assert!(matches!(page.advance_time_to(5), Err(Error::Runtime(_))));
    assert!(matches!(page.set_timer_step_limit(0), Err(Error::Runtime(_))));
    assert_eq!(page.now_ms(), 10);
    Ok(())
}

#[test]
fn timer_step_limit_stops_runaway_runs() -> Result<()> {
    let mut page = Page::from_html(
        "<div class='alert' id='a'></div><div class='alert' id='b'></div><div class='alert' id='c'></div>",
    )?;
    page.set_timer_step_limit(2)?;
    assert!(matches!(page.flush(), Err(Error::Runtime(_))));
    Ok(())
}

#[test]
fn trace_log_limit_keeps_newest_lines() -> Result<()> {
    let mut page = Page::from_html("<div class='alert show'></div>")?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_trace_log_limit(2)?;
    page.flush()?;
    let logs = page.take_trace_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[1].starts_with("[timer] flush"));
    assert!(matches!(
        page.set_trace_log_limit(0),
        Err(Error::Runtime(_))
    ));
    Ok(())
}

#[test]
fn submission_verdicts_are_traced() -> Result<()> {
    let mut page = Page::from_html("<form><input required id='n'></form>")?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.submit("form")?;
    let logs = page.take_trace_logs();
    assert!(
        logs.iter()
            .any(|line| line == "[enhance] validate form=form checked=1 failed=1")
    );
    assert!(logs.iter().any(|line| line.starts_with("[event] done submit")));
    Ok(())
}

#[test]
fn page_debug_is_compact() -> Result<()> {
    let page = Page::from_html("<div class='alert'></div>")?;
    let debug = format!("{page:?}");
    assert!(debug.starts_with("Page {"));
    assert!(debug.contains("pending_timers: 1"));
    Ok(())
}
