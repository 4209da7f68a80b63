use content_listing::{
    ContentListingService, FileViewStore, ListingConfig, ListingError, ListingRequest,
    ListingResult, ListingSettings,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn demo_service() -> ContentListingService<FileViewStore> {
    ContentListingService::with_defaults(FileViewStore::new(demos_dir().join("views")))
}

fn strings(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

fn total_rows(result: &ListingResult) -> usize {
    match result {
        ListingResult::Page { total_rows, .. } => *total_rows,
        other => panic!("expected a page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_demo_settings_drive_the_listing() {
    let settings = ListingSettings::from_file(demos_dir().join("listing.toml")).unwrap();
    assert_eq!(settings.view_name(), "article_content_listing");

    // views_dir is relative to the crate root, where tests run
    let store = FileViewStore::new(settings.views_dir());
    let service = ContentListingService::from_settings(store, &settings);
    let result = service
        .get_content_listing(&settings.block(), &ListingRequest::result(0))
        .await
        .unwrap();

    // news (8) + sports (9)
    assert_eq!(total_rows(&result), 17);
    assert_eq!(result.rows().len(), 10);
}

#[tokio::test]
async fn test_csv_multi_value_tags_and_author_filter() {
    let service = demo_service();

    let featured_news = ListingConfig::new(strings(&["news,featured"]), None);
    let result = service
        .get_content_listing(&featured_news, &ListingRequest::result(0))
        .await
        .unwrap();
    assert_eq!(total_rows(&result), 1);
    assert_eq!(result.rows()[0].get("nid"), Some(&serde_json::json!(15)));

    let by_author = ListingConfig::new(None, strings(&["100"]));
    let result = service
        .get_content_listing(&by_author, &ListingRequest::result(0))
        .await
        .unwrap();
    assert_eq!(total_rows(&result), 12);
}

#[tokio::test]
async fn test_demo_render_mode() {
    let service = demo_service();

    let result = service
        .get_content_listing(&ListingConfig::default(), &ListingRequest::render())
        .await
        .unwrap();

    let html = result.fragment().unwrap().as_str();
    assert!(html.starts_with(
        r#"<div class="view view-article_content_listing view-display-id-block_1">"#
    ));
    assert!(html.contains("<h2>Latest articles</h2>"));
    assert_eq!(html.matches(r#"<div class="views-row">"#).count(), 10);
}

#[tokio::test]
async fn test_filter_without_matches_renders_empty_text() {
    let service = demo_service();
    let config = ListingConfig::new(strings(&["opinion"]), None);

    let result = service
        .get_content_listing(&config, &ListingRequest::render())
        .await
        .unwrap();

    assert!(result
        .fragment()
        .unwrap()
        .as_str()
        .contains(r#"<div class="view-empty">No content available.</div>"#));
}

#[tokio::test]
async fn test_missing_dataset_is_surfaced_as_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("article_content_listing.toml"),
        "csv = \"gone.csv\"\n\n[displays.block_1]\n",
    )
    .unwrap();

    let service = ContentListingService::with_defaults(FileViewStore::new(dir.path()));
    let err = service
        .get_content_listing(&ListingConfig::default(), &ListingRequest::result(0))
        .await
        .unwrap_err();

    assert!(matches!(err, ListingError::IoError(_)));
    assert!(!err.is_resolution_fault());
}

#[tokio::test]
async fn test_missing_definition_degrades_to_empty_json() {
    let dir = TempDir::new().unwrap();
    let service = ContentListingService::with_defaults(FileViewStore::new(dir.path()));

    let result = service
        .get_content_listing(&ListingConfig::default(), &ListingRequest::result(3))
        .await
        .unwrap();

    assert_eq!(result, ListingResult::Empty);
    assert_eq!(serde_json::to_string(&result).unwrap(), "[]");
}
