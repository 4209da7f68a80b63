use crate::adapters::definition::{DisplayDefinition, SortOrder, ViewDefinition};
use crate::core::arguments::DEFAULT_ARGUMENT;
use crate::domain::model::{RenderedFragment, Row};
use crate::domain::ports::QueryExecutable;
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

const MULTI_VALUE_SEPARATOR: char = '|';

/// Contextual filter decoded from one positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArgumentFilter {
    MatchAll,
    AnyOf(Vec<String>),
    AllOf(Vec<String>),
}

impl ArgumentFilter {
    fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token == DEFAULT_ARGUMENT {
            return ArgumentFilter::MatchAll;
        }

        let split = |sep: char| -> Vec<String> {
            token
                .split(sep)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        };

        if token.contains(',') {
            ArgumentFilter::AllOf(split(','))
        } else {
            ArgumentFilter::AnyOf(split('+'))
        }
    }

    fn matches(&self, values: &[String]) -> bool {
        match self {
            ArgumentFilter::MatchAll => true,
            ArgumentFilter::AnyOf(wanted) => wanted.iter().any(|w| values.contains(w)),
            ArgumentFilter::AllOf(wanted) => wanted.iter().all(|w| values.contains(w)),
        }
    }
}

/// In-process view engine over an inline or CSV dataset.
pub struct FixtureView {
    definition: ViewDefinition,
    base_dir: Option<PathBuf>,
    display_id: Option<String>,
    arguments: Vec<String>,
    current_page: usize,
    result: Vec<Row>,
    total_rows: usize,
    executed: bool,
}

impl FixtureView {
    pub fn new(definition: ViewDefinition) -> Self {
        Self {
            definition,
            base_dir: None,
            display_id: None,
            arguments: Vec::new(),
            current_page: 0,
            result: Vec::new(),
            total_rows: 0,
            executed: false,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Page actually shown after the last execute (clamped to the last page).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    fn display(&self, display_id: &str) -> Result<&DisplayDefinition> {
        self.definition
            .displays
            .get(display_id)
            .ok_or_else(|| ListingError::DisplayNotFound {
                view: self.definition.id.clone(),
                display: display_id.to_string(),
            })
    }

    fn selected_display(&self) -> Result<&DisplayDefinition> {
        let display_id = self
            .display_id
            .as_deref()
            .ok_or_else(|| ListingError::ExecutionError {
                message: format!("no display selected on view '{}'", self.definition.id),
            })?;
        self.display(display_id)
    }

    async fn dataset(&self) -> Result<Vec<Row>> {
        let mut rows = match &self.definition.csv {
            Some(csv_path) => {
                let path = match &self.base_dir {
                    Some(dir) => dir.join(csv_path),
                    None => PathBuf::from(csv_path),
                };
                tracing::debug!("Reading dataset {}", path.display());
                let bytes = tokio::fs::read(&path).await?;
                self.parse_csv(&bytes)?
            }
            None => Vec::new(),
        };
        rows.extend(self.definition.rows.iter().cloned());
        Ok(rows)
    }

    fn parse_csv(&self, bytes: &[u8]) -> Result<Vec<Row>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut data = HashMap::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                let value = if self.definition.multi_value_fields.iter().any(|f| f == header) {
                    Value::Array(
                        cell.split(MULTI_VALUE_SEPARATOR)
                            .map(str::trim)
                            .filter(|v| !v.is_empty())
                            .map(|v| Value::String(v.to_string()))
                            .collect(),
                    )
                } else if let Ok(number) = cell.parse::<i64>() {
                    Value::Number(number.into())
                } else {
                    Value::String(cell.to_string())
                };
                data.insert(header.to_string(), value);
            }
            rows.push(Row { data });
        }
        Ok(rows)
    }
}

fn value_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(scalar_string).collect(),
        Some(other) => vec![scalar_string(other)],
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>, order: SortOrder) -> Ordering {
    let a = value_strings(a).into_iter().next();
    let b = value_strings(b).into_iter().next();

    // 缺少欄位的資料一律排在最後
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(&b),
    };

    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl QueryExecutable for FixtureView {
    fn set_display(&mut self, display_id: &str) -> Result<()> {
        self.display(display_id)?;
        self.display_id = Some(display_id.to_string());
        Ok(())
    }

    fn set_arguments(&mut self, arguments: Vec<String>) {
        self.arguments = arguments;
    }

    fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
    }

    async fn execute(&mut self) -> Result<()> {
        // 直接建立的視圖未經過 store 驗證
        self.definition.validate()?;
        let dataset = self.dataset().await?;
        let display = self.selected_display()?;

        // 多出來的參數沒有對應的過濾欄位，直接忽略
        let filters: Vec<(&str, ArgumentFilter)> = display
            .arguments
            .iter()
            .zip(self.arguments.iter())
            .map(|(definition, token)| (definition.field.as_str(), ArgumentFilter::parse(token)))
            .collect();

        let mut rows: Vec<Row> = dataset
            .into_iter()
            .filter(|row| {
                filters
                    .iter()
                    .all(|(field, filter)| filter.matches(&value_strings(row.get(field))))
            })
            .collect();

        if let Some(sort) = &display.sort {
            rows.sort_by(|a, b| compare_values(a.get(&sort.field), b.get(&sort.field), sort.order));
        }

        let items_per_page = display.items_per_page;
        let total_rows = rows.len();
        let last_page = total_rows.saturating_sub(1) / items_per_page;
        let page = self.current_page.min(last_page);

        let result = rows
            .into_iter()
            .skip(page * items_per_page)
            .take(items_per_page)
            .collect();

        tracing::debug!(
            "View '{}' matched {} rows, showing page {}",
            self.definition.id,
            total_rows,
            page
        );

        self.current_page = page;
        self.total_rows = total_rows;
        self.result = result;
        self.executed = true;
        Ok(())
    }

    fn result(&self) -> &[Row] {
        &self.result
    }

    fn total_rows(&self) -> usize {
        self.total_rows
    }

    fn items_per_page(&self) -> usize {
        self.selected_display()
            .map(|display| display.items_per_page)
            .unwrap_or(0)
    }

    async fn build_renderable(&self, display_id: &str) -> Result<RenderedFragment> {
        if !self.executed {
            return Err(ListingError::ExecutionError {
                message: format!("view '{}' must be executed before rendering", self.definition.id),
            });
        }
        let display = self.display(display_id)?;

        let mut html = format!(
            r#"<div class="view view-{} view-display-id-{}">"#,
            encode_double_quoted_attribute(&self.definition.id),
            encode_double_quoted_attribute(display_id)
        );
        if let Some(title) = &display.title {
            html.push_str(&format!("<h2>{}</h2>", encode_text(title)));
        }

        if self.result.is_empty() {
            html.push_str(&format!(
                r#"<div class="view-empty">{}</div>"#,
                encode_text(display.empty_text.as_deref().unwrap_or(""))
            ));
        } else {
            html.push_str(r#"<div class="view-content">"#);
            for row in &self.result {
                html.push_str(r#"<div class="views-row">"#);
                let fields: Vec<&str> = if display.fields.is_empty() {
                    let mut keys: Vec<&str> = row.data.keys().map(String::as_str).collect();
                    keys.sort_unstable();
                    keys
                } else {
                    display.fields.iter().map(String::as_str).collect()
                };
                for field in fields {
                    html.push_str(&format!(
                        r#"<div class="views-field views-field-{}">{}</div>"#,
                        encode_double_quoted_attribute(field),
                        encode_text(&value_strings(row.get(field)).join(", "))
                    ));
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");

        Ok(RenderedFragment::new(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(nid: i64, tags: &[&str], author: &str) -> Row {
        let mut data = HashMap::new();
        data.insert("nid".to_string(), serde_json::json!(nid));
        data.insert("title".to_string(), serde_json::json!(format!("Article {}", nid)));
        data.insert("tags".to_string(), serde_json::json!(tags));
        data.insert("author".to_string(), serde_json::json!(author));
        Row { data }
    }

    fn view(items_per_page: usize) -> FixtureView {
        let rows = vec![
            article(1, &["news"], "12"),
            article(2, &["news", "sports"], "15"),
            article(3, &["sports"], "12"),
            article(4, &["culture"], "20"),
        ];
        let definition = ViewDefinition::new("articles").with_rows(rows).with_display(
            "block_1",
            DisplayDefinition::new(items_per_page)
                .with_arguments(&["tags", "author"])
                .with_sort("nid", SortOrder::Asc)
                .with_fields(&["title"]),
        );
        FixtureView::new(definition)
    }

    fn nids(view: &FixtureView) -> Vec<i64> {
        view.result()
            .iter()
            .map(|row| row.get("nid").and_then(Value::as_i64).unwrap())
            .collect()
    }

    #[test]
    fn test_argument_token_parsing() {
        assert_eq!(ArgumentFilter::parse("all"), ArgumentFilter::MatchAll);
        assert_eq!(ArgumentFilter::parse(""), ArgumentFilter::MatchAll);
        assert_eq!(
            ArgumentFilter::parse("a+b"),
            ArgumentFilter::AnyOf(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            ArgumentFilter::parse("a,b"),
            ArgumentFilter::AllOf(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[tokio::test]
    async fn test_any_of_tag_filter() {
        let mut view = view(10);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["news+culture".to_string(), "all".to_string()]);
        view.execute().await.unwrap();

        assert_eq!(nids(&view), vec![1, 2, 4]);
        assert_eq!(view.total_rows(), 3);
    }

    #[tokio::test]
    async fn test_all_of_filter_and_author_filter() {
        let mut view = view(10);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["news,sports".to_string(), "all".to_string()]);
        view.execute().await.unwrap();
        assert_eq!(nids(&view), vec![2]);

        let mut view = self::view(10);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["all".to_string(), "12".to_string()]);
        view.execute().await.unwrap();
        assert_eq!(nids(&view), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_missing_and_extra_arguments() {
        let mut view = view(10);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["sports".to_string()]);
        view.execute().await.unwrap();
        assert_eq!(nids(&view), vec![2, 3]);

        let mut view = self::view(10);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["all".to_string(), "all".to_string(), "ignored".to_string()]);
        view.execute().await.unwrap();
        assert_eq!(view.total_rows(), 4);
    }

    #[tokio::test]
    async fn test_page_beyond_last_is_clamped() {
        let mut view = view(3);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["all".to_string(), "all".to_string()]);
        view.set_current_page(7);
        view.execute().await.unwrap();

        assert_eq!(view.current_page(), 1);
        assert_eq!(nids(&view), vec![4]);
        assert_eq!(view.items_per_page(), 3);
    }

    #[tokio::test]
    async fn test_zero_page_size_is_malformed() {
        let definition =
            ViewDefinition::new("v").with_display("block_1", DisplayDefinition::new(0));
        let mut view = FixtureView::new(definition);
        view.set_display("block_1").unwrap();

        let err = view.execute().await.unwrap_err();
        assert!(matches!(err, ListingError::MalformedQuery { .. }));
    }

    #[tokio::test]
    async fn test_sort_descending() {
        let definition = ViewDefinition::new("articles")
            .with_rows(vec![article(2, &[], "1"), article(10, &[], "1"), article(1, &[], "1")])
            .with_display("block_1", DisplayDefinition::new(10).with_sort("nid", SortOrder::Desc));
        let mut view = FixtureView::new(definition);
        view.set_display("block_1").unwrap();
        view.execute().await.unwrap();

        assert_eq!(nids(&view), vec![10, 2, 1]);
    }

    #[tokio::test]
    async fn test_render_escapes_values_and_shows_empty_text() {
        let mut definition = ViewDefinition::new("articles")
            .with_rows(vec![article(1, &["news"], "<script>")])
            .with_display(
                "block_1",
                DisplayDefinition::new(10)
                    .with_arguments(&["tags"])
                    .with_fields(&["author"]),
            );
        if let Some(display) = definition.displays.get_mut("block_1") {
            display.title = Some("Latest".to_string());
            display.empty_text = Some("Nothing here".to_string());
        }

        let mut view = FixtureView::new(definition.clone());
        view.set_display("block_1").unwrap();
        view.execute().await.unwrap();
        let html = view.build_renderable("block_1").await.unwrap();
        assert!(html.as_str().starts_with(r#"<div class="view view-articles view-display-id-block_1">"#));
        assert!(html.as_str().contains("<h2>Latest</h2>"));
        assert!(html.as_str().contains("&lt;script&gt;"));
        assert!(!html.as_str().contains("<script>"));

        let quoted_id = ViewDefinition::new("a\"b")
            .with_rows(vec![article(1, &[], "x")])
            .with_display("block_1", DisplayDefinition::new(10).with_fields(&["title"]));
        let mut view = FixtureView::new(quoted_id);
        view.set_display("block_1").unwrap();
        view.execute().await.unwrap();
        let html = view.build_renderable("block_1").await.unwrap();
        assert!(html
            .as_str()
            .starts_with(r#"<div class="view view-a&quot;b view-display-id-block_1">"#));

        let mut view = FixtureView::new(definition);
        view.set_display("block_1").unwrap();
        view.set_arguments(vec!["sports".to_string()]);
        view.execute().await.unwrap();
        let html = view.build_renderable("block_1").await.unwrap();
        assert!(html.as_str().contains(r#"<div class="view-empty">Nothing here</div>"#));
    }

    #[tokio::test]
    async fn test_render_requires_execute() {
        let mut view = view(10);
        view.set_display("block_1").unwrap();
        assert!(matches!(
            view.build_renderable("block_1").await,
            Err(ListingError::ExecutionError { .. })
        ));
    }

    #[test]
    fn test_unknown_display_is_resolution_fault() {
        let mut view = view(10);
        let err = view.set_display("page_1").unwrap_err();
        assert!(err.is_resolution_fault());
    }

    #[test]
    fn test_parse_csv_multi_value_and_numbers() {
        let mut definition = ViewDefinition::new("articles");
        definition.multi_value_fields = vec!["tags".to_string()];
        let view = FixtureView::new(definition);

        let rows = view
            .parse_csv(b"nid,title,tags\n1,Hello,news|sports\n2,World,\n")
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("nid"), Some(&serde_json::json!(1)));
        assert_eq!(rows[0].get("tags"), Some(&serde_json::json!(["news", "sports"])));
        assert_eq!(rows[1].get("tags"), Some(&serde_json::json!([])));
        assert_eq!(rows[1].get("title"), Some(&serde_json::json!("World")));
    }
}
