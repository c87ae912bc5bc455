use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use shopping_list_core::config::{ExportConfig, PdfConfig};
use shopping_list_core::contract::{ArtifactFormat, CartError, CartLine, MockCartSource};
use shopping_list_core::export::{export, ExportError};
use shopping_list_core::render::RenderError;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

fn text_config() -> ExportConfig {
    ExportConfig {
        format: ArtifactFormat::Text,
        ..ExportConfig::default()
    }
}

#[tokio::test]
async fn exports_aggregated_text_list_for_user() {
    let mut source = MockCartSource::new();
    source
        .expect_cart_lines()
        .withf(|user| user == "alice")
        .times(1)
        .returning(|_| {
            Ok(vec![
                CartLine::new("Sugar", "g", 100),
                CartLine::new("Flour", "g", 200),
                CartLine::new("Sugar", "g", 50),
            ])
        });

    let report = export(&text_config(), &source, "alice")
        .await
        .expect("export should succeed");

    assert_eq!(report.user, "alice");
    assert_eq!(report.input_lines, 3);
    assert_eq!(report.distinct_lines, 2);
    assert_eq!(report.pages, 1);
    assert_eq!(report.artifact.filename, "shopping_cart.txt");
    assert_eq!(
        String::from_utf8(report.artifact.content).unwrap(),
        "Купить в магазине:\nSugar (g) - 150\nFlour (g) - 200"
    );
}

#[tokio::test]
async fn empty_cart_exports_header_only() {
    let mut source = MockCartSource::new();
    source.expect_cart_lines().returning(|_| Ok(Vec::new()));

    let report = export(&text_config(), &source, "bob").await.unwrap();

    assert_eq!(report.distinct_lines, 0);
    assert_eq!(report.pages, 1);
    assert_eq!(report.artifact.content, "Купить в магазине:".as_bytes());
}

#[tokio::test]
async fn cart_errors_are_surfaced_unchanged() {
    let mut source = MockCartSource::new();
    source.expect_cart_lines().returning(|_| {
        Err(CartError::InvalidCartLine {
            recipe: "Soup".into(),
            ingredient: "Water".into(),
            reason: "amount must be at least 1".into(),
        })
    });

    let err = export(&text_config(), &source, "alice").await.unwrap_err();
    assert!(
        matches!(err, ExportError::Cart(CartError::InvalidCartLine { .. })),
        "got {err:?}"
    );
}

#[tokio::test]
async fn missing_font_fails_pdf_export() {
    let mut source = MockCartSource::new();
    source
        .expect_cart_lines()
        .returning(|_| Ok(vec![CartLine::new("Salt", "g", 1)]));
    let config = ExportConfig {
        format: ArtifactFormat::Pdf,
        pdf: PdfConfig {
            font_path: PathBuf::from("/nonexistent/arial.ttf"),
            ..PdfConfig::default()
        },
    };

    let err = export(&config, &source, "alice").await.unwrap_err();
    assert!(
        matches!(err, ExportError::Render(RenderError::FontMissing { .. })),
        "got {err:?}"
    );
}

/// Collects the formatted debug output of every emitted event.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}

#[tokio::test]
async fn export_emits_pipeline_events() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        events: events.clone(),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut source = MockCartSource::new();
    source.expect_cart_lines().returning(|_| Ok(Vec::new()));
    export(&text_config(), &source, "alice").await.unwrap();

    let events = events.lock().unwrap();
    assert!(
        events.iter().any(|e| e.contains("Export complete")),
        "expected completion event, got: {events:?}"
    );
}
