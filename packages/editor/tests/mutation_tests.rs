//! Field-scoped edits through the session

use serde_json::json;
use storefront_editor::{
    edit_section, Builder, Direction, EditSession, EditorError, Mutation, Section, SectionPatch,
    SectionType, StyleField,
};
use storefront_schema::settings::ImageLayout;
use storefront_schema::{SectionSettings, Side};

fn session_with(sections: Vec<Section>) -> EditSession {
    let mut builder = Builder::default();
    builder.pages[0].sections = sections;
    EditSession::new("client-1", "store-1", builder)
}

fn image_section() -> Section {
    Section::new("img", SectionType::Image, 0).with_settings(
        json!({ "layout": "grid", "images": [{ "url": "a" }, { "url": "b" }, { "url": "c" }] })
            .as_object()
            .unwrap(),
    )
}

fn image_urls(session: &EditSession) -> Vec<String> {
    match &session.selected().unwrap().settings {
        SectionSettings::Image(image) => image.images.iter().map(|i| i.url.clone()).collect(),
        other => panic!("Expected image settings, got {:?}", other),
    }
}

#[test]
fn test_edit_section_keeps_unrelated_keys() {
    let section = Section::new("t", SectionType::Text, 0).with_settings(
        json!({ "heading": "Old", "content": "<p>Body</p>" })
            .as_object()
            .unwrap(),
    );
    let patch: SectionPatch = serde_json::from_value(json!({ "settings": { "heading": "Hi" } })).unwrap();
    let edited = edit_section(&section, &patch);

    let after = edited.settings.to_map();
    assert_eq!(after["heading"], json!("Hi"));
    assert_eq!(after["content"], json!("<p>Body</p>"));
    assert_eq!(after["alignment"], json!("left"));
}

#[test]
fn test_image_single_layout_collapse_is_one_way() {
    let mut session = session_with(vec![image_section()]);
    session.select("img").unwrap();

    session.editor().update_setting("layout", json!("single")).unwrap();
    assert_eq!(image_urls(&session), vec!["a"]);

    session.editor().update_setting("layout", json!("grid")).unwrap();
    assert_eq!(image_urls(&session), vec!["a"]);
    match &session.selected().unwrap().settings {
        SectionSettings::Image(image) => assert_eq!(image.layout, ImageLayout::Grid),
        other => panic!("Expected image settings, got {:?}", other),
    }
}

#[test]
fn test_move_image() {
    let mut session = session_with(vec![image_section()]);
    session.select("img").unwrap();

    session.editor().move_image(1, Direction::Up).unwrap();
    assert_eq!(image_urls(&session), vec!["b", "a", "c"]);

    let result = session.editor().move_image(0, Direction::Up).unwrap();
    assert!(!result.changed);
    assert_eq!(image_urls(&session), vec!["b", "a", "c"]);

    let result = session.editor().move_image(2, Direction::Down).unwrap();
    assert!(!result.changed);
}

#[test]
fn test_non_numeric_input_keeps_stored_value() {
    let grid = Section::new("grid", SectionType::ProductGrid, 0)
        .with_settings(json!({ "maxProducts": 6 }).as_object().unwrap());
    let mut session = session_with(vec![grid]);
    session.select("grid").unwrap();
    let before = session.selected().unwrap().clone();

    let result = session.editor().update_setting("maxProducts", json!("six")).unwrap();
    assert!(!result.changed);
    assert_eq!(session.selected().unwrap(), &before);

    session
        .editor()
        .update_style(StyleField::Padding(Side::Top), json!("wide"))
        .unwrap();
    assert_eq!(session.selected().unwrap(), &before);
    assert_eq!(session.pending_count(), 0);
}

#[test]
fn test_list_entry_append_update_remove() {
    let mut session = session_with(vec![Section::new("c", SectionType::ProductCollection, 0)]);
    session.select("c").unwrap();
    {
        let mut editor = session.editor();
        editor.append_entry("collections").unwrap();
        editor.append_entry("collections").unwrap();
        editor.update_entry("collections", 0, "name", json!("Tees")).unwrap();
        editor.update_entry("collections", 0, "subcategoryId", json!("sub-1")).unwrap();
        editor.update_setting("filterBy", json!("category")).unwrap();
        editor.update_entry("collections", 0, "categoryId", json!("cat-1")).unwrap();
        editor.update_entry("collections", 1, "name", json!("Mugs")).unwrap();
        editor.remove_entry("collections", 0).unwrap();
    }

    match &session.selected().unwrap().settings {
        SectionSettings::ProductCollection(collection) => {
            assert_eq!(collection.collections.len(), 1);
            assert_eq!(collection.collections.get(0).unwrap().name, "Mugs");
        }
        other => panic!("Expected collection settings, got {:?}", other),
    }

    let result = session.editor().remove_entry("collections", 5);
    assert!(matches!(result, Err(EditorError::Mutation(_))));
}

#[test]
fn test_style_side_edit_keeps_other_sides() {
    let mut session = session_with(vec![Section::new("t", SectionType::Text, 0)]);
    session.select("t").unwrap();
    session
        .editor()
        .update_style(StyleField::Padding(Side::Top), json!("10"))
        .unwrap();

    let padding = session.selected().unwrap().styles.padding.unwrap();
    assert_eq!(padding.top, Some(10.0));
    assert_eq!(padding.right, Some(32.0));
    assert_eq!(padding.bottom, Some(48.0));
}

#[test]
fn test_toggle_and_duplicate_selected() {
    let mut session = session_with(vec![Section::new("t", SectionType::Text, 0)]);
    session.select("t").unwrap();

    session.editor().toggle_visible().unwrap();
    assert!(!session.selected().unwrap().visible);

    let copy = session.editor().duplicate().unwrap().section_id.unwrap();
    let page = session.page().unwrap();
    assert_eq!(page.sections.len(), 2);
    assert_eq!(page.sections[1].id, copy);
    assert!(!page.sections[1].visible);

    session.editor().remove().unwrap();
    assert!(session.selected().is_none());
    assert_eq!(session.page().unwrap().sections.len(), 1);
}

#[test]
fn test_set_visibility_mutation() {
    let mut session = session_with(vec![Section::new("t", SectionType::Text, 0)]);
    session
        .apply(Mutation::SetVisibility {
            section_id: "t".to_string(),
            visible: true,
        })
        .map(|result| assert!(!result.changed))
        .unwrap();
}
