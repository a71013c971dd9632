use form_enhancer::{AnnotationPolicy, EnhancerConfig, Page, Result};

const CONTACT: &str = r#"
    <form id="contact">
      <input id="name" name="name" required>
      <input id="email" name="email" type="email">
      <textarea id="message" name="message" required></textarea>
      <button id="send">Send</button>
    </form>
    <input id="outside" required>
"#;

#[test]
fn blur_flags_empty_required_field() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.focus("#name")?;
    page.blur("#name")?;

    page.assert_has_class("#name", "is-invalid")?;
    // blur only toggles the class; annotations come from submission
    assert_eq!(page.feedback_for("#name")?, None);
    Ok(())
}

#[test]
fn blur_clears_when_value_present() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.submit("#contact")?;
    page.assert_has_class("#message", "is-invalid")?;

    page.focus("#message")?;
    page.type_text("#message", "hello")?;
    page.blur("#message")?;
    page.assert_lacks_class("#message", "is-invalid")?;
    Ok(())
}

#[test]
fn blur_clears_format_errors_without_rechecking() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.type_text("#email", "nope")?;
    page.submit("#contact")?;
    page.assert_has_class("#email", "is-invalid")?;

    // still malformed, but blur only checks presence
    page.focus("#email")?;
    page.blur("#email")?;
    page.assert_lacks_class("#email", "is-invalid")?;
    Ok(())
}

#[test]
fn typing_clears_invalid_state_without_resubmitting() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.submit("#contact")?;
    page.assert_has_class("#name", "is-invalid")?;

    page.type_text("#name", "   ")?;
    page.assert_has_class("#name", "is-invalid")?;

    page.type_text("#name", "Ada")?;
    page.assert_lacks_class("#name", "is-invalid")?;
    assert!(page.take_submissions().is_empty());
    Ok(())
}

#[test]
fn typing_does_not_revalidate_format() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.type_text("#email", "x@y")?;
    page.assert_lacks_class("#email", "is-invalid")?;
    Ok(())
}

#[test]
fn fields_outside_forms_are_ignored() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.focus("#outside")?;
    page.blur("#outside")?;
    page.assert_lacks_class("#outside", "is-invalid")?;
    Ok(())
}

#[test]
fn fill_moves_focus_through_the_field() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.observe("#contact", "focusout", false)?;
    page.fill("#name", "")?;
    page.assert_has_class("#name", "is-invalid")?;
    assert_eq!(page.take_observed_events().len(), 1);

    page.fill("#name", "Grace")?;
    page.assert_lacks_class("#name", "is-invalid")?;
    page.assert_value("#name", "Grace")?;
    Ok(())
}

#[test]
fn remove_when_valid_policy_detaches_stale_annotations() -> Result<()> {
    let config = EnhancerConfig {
        annotation_policy: AnnotationPolicy::RemoveWhenValid,
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(CONTACT, config)?;
    page.submit("#contact")?;
    assert_eq!(page.count(".invalid-feedback")?, 2);

    page.type_text("#name", "Ada")?;
    assert_eq!(page.feedback_for("#name")?, None);
    assert_eq!(page.count(".invalid-feedback")?, 1);

    page.type_text("#message", "Hi")?;
    page.submit("#contact")?;
    page.assert_missing(".invalid-feedback")?;
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn persist_policy_keeps_annotation_after_fix() -> Result<()> {
    let mut page = Page::from_html(CONTACT)?;
    page.submit("#contact")?;
    page.type_text("#name", "Ada")?;
    page.assert_lacks_class("#name", "is-invalid")?;
    assert_eq!(
        page.feedback_for("#name")?.as_deref(),
        Some("This field is required.")
    );
    Ok(())
}

#[test]
fn custom_class_names_are_honoured() -> Result<()> {
    let config = EnhancerConfig {
        invalid_class: "error".into(),
        feedback_class: "error-text".into(),
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(
        r#"<form id="f"><input id="n" required></form>"#,
        config,
    )?;
    page.submit("#f")?;
    page.assert_has_class("#n", "error")?;
    page.assert_lacks_class("#n", "is-invalid")?;
    page.assert_text(".error-text", "This field is required.")?;
    Ok(())
}

#[test]
fn readonly_fields_ignore_typing() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="f"><input id="code" name="code" value="A1" readonly></form>"#,
    )?;
    page.type_text("#code", "B2")?;
    page.assert_value("#code", "A1")?;
    Ok(())
}
