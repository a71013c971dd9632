use form_enhancer::{DEFAULT_CONFIRM_MESSAGE, EnhancerConfig, Navigation, Page, Result};

const ITEMS: &str = r#"
    <ul>
      <li>
        Item 1
        <form id="delete-1" action="/items/1/delete" method="post">
          <button id="del-1" type="submit" class="btn btn-danger" data-confirm>Delete</button>
        </form>
      </li>
      <li>
        Item 2
        <a id="del-2" href="/items/2/delete" data-confirm="Remove item 2 for good?">
          <span id="del-2-icon">🗑</span>
        </a>
      </li>
      <li>
        Item 3
        <form id="edit-3" action="/items/3/edit" method="post">
          <button id="save-3" type="submit">Save</button>
        </form>
      </li>
      <li>
        Legacy
        <form id="legacy" action="/items/4/delete" method="post">
          <button id="legacy-del" type="submit" onclick="return confirm('Sure?')">Delete</button>
        </form>
      </li>
    </ul>
"#;

#[test]
fn declined_prompt_blocks_form_submission() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.enqueue_confirm_response(false);
    page.click("#del-1")?;

    assert!(page.take_submissions().is_empty());
    assert_eq!(
        page.take_confirm_messages(),
        vec![DEFAULT_CONFIRM_MESSAGE.to_string()]
    );
    Ok(())
}

#[test]
fn accepted_prompt_lets_submission_through() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.enqueue_confirm_response(true);
    page.click("#del-1")?;

    let submissions = page.take_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].form, "#delete-1");
    Ok(())
}

#[test]
fn unanswered_prompts_default_to_declined() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.click("#del-1")?;
    page.click("#del-1")?;
    assert!(page.take_submissions().is_empty());
    assert_eq!(page.take_confirm_messages().len(), 2);

    page.set_default_confirm_response(true);
    page.click("#del-1")?;
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn marker_value_becomes_the_prompt_and_guards_links() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.enqueue_confirm_response(false);
    page.click("#del-2-icon")?;
    assert!(page.take_navigations().is_empty());

    page.enqueue_confirm_response(true);
    page.click("#del-2-icon")?;
    assert_eq!(
        page.take_navigations(),
        vec![Navigation {
            href: "/items/2/delete".into(),
        }]
    );
    assert_eq!(
        page.take_confirm_messages(),
        vec![
            "Remove item 2 for good?".to_string(),
            "Remove item 2 for good?".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn unmarked_controls_are_not_prompted() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.click("#save-3")?;
    assert!(page.take_confirm_messages().is_empty());
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn inline_handlers_are_ignored_unless_legacy_mode() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.click("#legacy-del")?;
    assert!(page.take_confirm_messages().is_empty());
    assert_eq!(page.take_submissions().len(), 1);

    let config = EnhancerConfig {
        legacy_inline_confirm: true,
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(ITEMS, config)?;
    page.enqueue_confirm_response(false);
    page.click("#legacy-del")?;
    assert!(page.take_submissions().is_empty());
    assert_eq!(
        page.take_confirm_messages(),
        vec![DEFAULT_CONFIRM_MESSAGE.to_string()]
    );
    Ok(())
}

#[test]
fn declining_does_not_stop_propagation() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.observe("#delete-1", "click", false)?;
    page.observe("document", "click", false)?;
    page.click("#del-1")?;

    let seen = page.take_observed_events();
    assert_eq!(seen.len(), 2);
    assert!(!seen[0].default_prevented);
    // the root observer was registered after the guard, so it sees the outcome
    assert_eq!(seen[1].label, "document");
    assert!(seen[1].default_prevented);
    Ok(())
}

#[test]
fn disabled_controls_are_not_prompted() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="f"><button id="d" data-confirm disabled>Delete</button></form>"#,
    )?;
    page.click("#d")?;
    assert!(page.take_confirm_messages().is_empty());
    assert!(page.take_submissions().is_empty());
    Ok(())
}

#[test]
fn custom_marker_attribute_and_message() -> Result<()> {
    let config = EnhancerConfig {
        confirm_attribute: "data-destructive".into(),
        confirm_message: "Really?".into(),
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(
        r#"<form id="f"><button id="x" data-destructive>Drop</button><button id="y" data-confirm>Keep</button></form>"#,
        config,
    )?;
    page.click("#x")?;
    page.click("#y")?;
    assert_eq!(page.take_confirm_messages(), vec!["Really?".to_string()]);
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn controls_marked_after_load_are_guarded() -> Result<()> {
    let mut page = Page::from_html(ITEMS)?;
    page.set_attribute("#save-3", "data-confirm", "Overwrite item 3?")?;
    page.enqueue_confirm_response(false);
    page.click("#save-3")?;

    assert!(page.take_submissions().is_empty());
    assert_eq!(
        page.take_confirm_messages(),
        vec!["Overwrite item 3?".to_string()]
    );
    Ok(())
}
