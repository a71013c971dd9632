use form_enhancer::{EnhancerConfig, Page, Result};

const FLASHES: &str = r#"
    <main id="main">
      <div id="saved" class="alert alert-success alert-dismissible fade show" role="alert">
        Saved.
        <button id="close-saved" type="button" class="btn-close" data-dismiss="alert">×</button>
      </div>
      <div id="warn" class="alert alert-warning fade show" role="alert">Check input.</div>
      <p id="body">content</p>
    </main>
"#;

#[test]
fn banner_hides_then_detaches_on_schedule() -> Result<()> {
    let mut page = Page::from_html(FLASHES)?;

    page.advance_time(4999)?;
    page.assert_has_class("#saved", "show")?;

    page.advance_time(1)?;
    page.assert_lacks_class("#saved", "show")?;
    page.assert_exists("#saved")?;

    page.advance_time(149)?;
    page.assert_exists("#saved")?;

    page.advance_time(1)?;
    page.assert_missing("#saved")?;
    page.assert_missing("#warn")?;
    page.assert_exists("#body")?;
    assert!(page.pending_timers().is_empty());
    assert_eq!(page.enhancer().tracked_alerts(), 0);
    Ok(())
}

#[test]
fn removal_is_scheduled_relative_to_hiding() -> Result<()> {
    let mut page = Page::from_html(FLASHES)?;
    page.advance_time(5000)?;
    let due = page
        .pending_timers()
        .into_iter()
        .map(|timer| timer.due_at)
        .collect::<Vec<_>>();
    assert_eq!(due, vec![5150, 5150]);
    Ok(())
}

#[test]
fn banner_removed_early_is_left_alone() -> Result<()> {
    let mut page = Page::from_html(FLASHES)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);

    page.advance_time(2000)?;
    page.remove_element("#warn")?;
    page.flush()?;

    page.assert_missing("#warn")?;
    page.assert_missing("#saved")?;
    let logs = page.take_trace_logs();
    assert!(
        logs.iter()
            .any(|line| line == "[enhance] alert skip banner=div#warn.alert.alert-warning.fade.show phase=hide")
    );
    assert_eq!(page.now_ms(), 5150);
    Ok(())
}

#[test]
fn banner_removed_between_phases_is_not_touched_again() -> Result<()> {
    let mut page = Page::from_html(FLASHES)?;
    page.advance_time(5000)?;
    page.remove_element("#saved")?;
    page.advance_time(150)?;
    page.assert_missing("#saved")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn dismiss_control_removes_banner_and_cancels_its_timer() -> Result<()> {
    let mut page = Page::from_html(FLASHES)?;
    assert_eq!(page.pending_timers().len(), 2);

    page.advance_time(1000)?;
    page.click("#close-saved")?;

    page.assert_missing("#saved")?;
    assert_eq!(page.pending_timers().len(), 1);
    assert_eq!(page.enhancer().tracked_alerts(), 1);

    page.flush()?;
    page.assert_missing("#warn")?;
    Ok(())
}

#[test]
fn dismissing_during_fade_cancels_the_removal_timer() -> Result<()> {
    let mut page = Page::from_html(FLASHES)?;
    page.advance_time(5050)?;
    page.click("#close-saved")?;
    page.assert_missing("#saved")?;
    let remaining = page.pending_timers();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].due_at, 5150);
    Ok(())
}

#[test]
fn banners_added_later_are_not_scheduled() -> Result<()> {
    let mut page = Page::from_html("<p id='empty'>no banners</p>")?;
    assert!(page.pending_timers().is_empty());
    page.flush()?;
    assert_eq!(page.now_ms(), 0);
    Ok(())
}

#[test]
fn delays_and_selector_are_configurable() -> Result<()> {
    let config = EnhancerConfig {
        alert_selector: ".flash".into(),
        shown_class: "visible".into(),
        alert_hide_delay_ms: 1000,
        alert_remove_delay_ms: 0,
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(
        r#"<div id="f" class="flash visible">Hi</div><div id="a" class="alert show">Stay</div>"#,
        config,
    )?;
    page.advance_time(1000)?;
    page.assert_missing("#f")?;
    page.advance_time(10_000)?;
    page.assert_has_class("#a", "show")?;
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_parsing() {
    let config = EnhancerConfig {
        alert_hide_delay_ms: -5,
        ..EnhancerConfig::default()
    };
    let err = Page::from_html_with_config("<p>", config).expect_err("negative delay");
    assert!(err.to_string().contains("alert_hide_delay_ms"));
}
