use planner_core::db::open_db_in_memory;
use planner_core::{
    BlockType, Document, DocumentRepository, EditorSettings, KeyValueStore, KvDocumentRepository,
    Page, SqliteKvStore,
};
use serde_json::{json, Value};

fn store_raw(conn: &rusqlite::Connection, raw: &str) {
    SqliteKvStore::new(conn).set("notesDocument", raw).unwrap();
}

fn read_raw(conn: &rusqlite::Connection) -> Value {
    let raw = SqliteKvStore::new(conn)
        .get("notesDocument")
        .unwrap()
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn missing_document_loads_welcome_page() {
    let conn = open_db_in_memory().unwrap();
    let repo = KvDocumentRepository::new(SqliteKvStore::new(&conn));

    let document = repo.load();
    assert_eq!(document.pages().len(), 1);
    let page = document.active_page().unwrap();
    assert_eq!(page.title, "Welcome");
    assert_eq!(page.blocks.len(), 1);
    assert_eq!(page.blocks[0].kind, BlockType::Paragraph);
}

#[test]
fn malformed_or_empty_document_falls_back_to_initial() {
    let conn = open_db_in_memory().unwrap();
    let repo = KvDocumentRepository::new(SqliteKvStore::new(&conn));

    for raw in ["{not json", "[]", r#"{"pages":[],"activePageId":null}"#] {
        store_raw(&conn, raw);
        let document = repo.load();
        assert_eq!(document.pages().len(), 1, "raw {raw}");
        assert_eq!(document.active_page().unwrap().title, "Welcome");
    }
}

#[test]
fn legacy_content_page_migrates_to_single_paragraph() {
    let conn = open_db_in_memory().unwrap();
    store_raw(
        &conn,
        &json!({
            "pages": [{
                "id": "p1",
                "title": "Old",
                "content": "legacy <b>text</b>",
                "updated": 1
            }],
            "activePageId": "p1"
        })
        .to_string(),
    );
    let repo = KvDocumentRepository::new(SqliteKvStore::new(&conn));

    let document = repo.load();
    let page = document.active_page().unwrap();
    assert_eq!(page.id, "p1");
    assert_eq!(page.blocks.len(), 1);
    assert_eq!(page.blocks[0].kind, BlockType::Paragraph);
    assert_eq!(page.blocks[0].html, "legacy <b>text</b>");

    repo.save(&document).unwrap();
    let stored = read_raw(&conn);
    let stored_page = &stored["pages"][0];
    assert!(stored_page.get("content").is_none());
    assert_eq!(stored_page["blocks"][0]["type"], "paragraph");
    assert_eq!(stored_page["blocks"][0]["html"], "legacy <b>text</b>");
}

#[test]
fn dangling_active_page_id_is_cleared() {
    let conn = open_db_in_memory().unwrap();
    store_raw(
        &conn,
        &json!({
            "pages": [{ "id": "p1", "title": "Kept", "blocks": [], "updated": 5 }],
            "activePageId": "gone"
        })
        .to_string(),
    );
    let repo = KvDocumentRepository::new(SqliteKvStore::new(&conn));

    let document = repo.load();
    assert_eq!(document.active_page_id(), None);
    assert_eq!(document.pages()[0].blocks.len(), 1);
}

#[test]
fn save_writes_camel_case_wire_shape_and_reloads_equal() {
    let conn = open_db_in_memory().unwrap();
    let repo = KvDocumentRepository::new(SqliteKvStore::new(&conn));

    let mut document = Document::initial();
    let mut page = Page::new("Styled");
    page.editor_settings = Some(EditorSettings {
        font_family: Some("Georgia".to_string()),
        line_height_percent: Some(160),
        ..Default::default()
    });
    page.blocks[0].kind = BlockType::Todo;
    page.blocks[0].checked = true;
    page.blocks[0].html = "ship it".to_string();
    let page_id = document.push_page(page);
    document.set_active(&page_id);

    repo.save(&document).unwrap();
    let stored = read_raw(&conn);
    assert_eq!(stored["activePageId"], page_id.as_str());
    let settings = &stored["pages"][1]["editorSettings"];
    assert_eq!(settings["fontFamily"], "Georgia");
    assert_eq!(settings["lineHeightPercent"], 160);
    assert!(settings.get("fontSizePx").is_none());
    assert_eq!(stored["pages"][1]["blocks"][0]["type"], "todo");
    assert_eq!(stored["pages"][1]["blocks"][0]["checked"], true);
    assert!(stored["pages"][0]["blocks"][0].get("checked").is_none());

    assert_eq!(repo.load(), document);
}

#[test]
fn custom_key_keeps_documents_apart() {
    let conn = open_db_in_memory().unwrap();
    let main = KvDocumentRepository::new(SqliteKvStore::new(&conn));
    let scratch = KvDocumentRepository::with_key(SqliteKvStore::new(&conn), "scratchDocument");

    let mut document = Document::initial();
    document.push_page(Page::new("Only in scratch"));
    scratch.save(&document).unwrap();

    assert_eq!(scratch.load().pages().len(), 2);
    assert_eq!(main.load().pages().len(), 1);
    assert!(main.store().get("notesDocument").unwrap().is_none());
}
