//! End-to-end tests for frame assembly and rendering over generated stores.

use std::sync::Arc;

use async_trait::async_trait;
use depth_common::{DatasetMetadata, DepthFrameError, DepthFrameResult, ScanRow};
use frame_processor::{FrameAssembler, FrameService};
use renderer::{ColormapRegistry, Encoder};
use storage::{build_metadata, MemoryRowStore, RowStore};
use test_utils::{dataset, pixel_at, populated_sqlite_store, reference_memory_store};

// ============================================================================
// Helper functions
// ============================================================================

async fn reference_service() -> FrameService {
    let store: Arc<dyn RowStore> = reference_memory_store().await;
    FrameService::new(
        store,
        Arc::new(ColormapRegistry::with_defaults().unwrap()),
        Encoder::default(),
    )
}

/// Row index in the reference dataset for a depth.
fn row_index(depth: f64) -> usize {
    ((depth - dataset::DEPTH_MIN) / dataset::DEPTH_STEP).round() as usize
}

/// A store that returns whatever rows it was given, unsorted and unchecked.
struct VerbatimStore {
    rows: Vec<ScanRow>,
    width: usize,
}

#[async_trait]
impl RowStore for VerbatimStore {
    async fn rows_in_range(&self, min: f64, max: f64) -> DepthFrameResult<Vec<ScanRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.depth >= min && r.depth <= max)
            .cloned()
            .collect())
    }

    async fn get_metadata(&self) -> DepthFrameResult<DatasetMetadata> {
        let mut entries = std::collections::BTreeMap::new();
        entries.insert("resized_width".to_string(), self.width.to_string());
        build_metadata(entries, self.rows.len() as u64, self.depth_bounds().await?, None)
    }

    async fn depth_bounds(&self) -> DepthFrameResult<Option<(f64, f64)>> {
        let min = self.rows.iter().map(|r| r.depth).fold(f64::INFINITY, f64::min);
        let max = self.rows.iter().map(|r| r.depth).fold(f64::NEG_INFINITY, f64::max);
        Ok(if self.rows.is_empty() { None } else { Some((min, max)) })
    }

    async fn row_count(&self) -> DepthFrameResult<u64> {
        Ok(self.rows.len() as u64)
    }
}

// ============================================================================
// Assembly
// ============================================================================

#[tokio::test]
async fn test_assemble_range_outside_data_is_empty_range() {
    let store: Arc<dyn RowStore> = reference_memory_store().await;
    let assembler = FrameAssembler::new(store);

    let err = assembler.assemble(9999.0, 10000.0).await.unwrap_err();
    match err {
        DepthFrameError::EmptyRange { available, .. } => {
            assert_eq!(available, Some((dataset::DEPTH_MIN, dataset::DEPTH_MAX)));
        }
        other => panic!("expected EmptyRange, got {:?}", other),
    }
}

#[tokio::test]
async fn test_assemble_depths_strictly_ascending() {
    let store: Arc<dyn RowStore> = reference_memory_store().await;
    let frame = FrameAssembler::new(store).assemble(9000.0, 9546.0).await.unwrap();

    assert_eq!(frame.height(), dataset::ROW_COUNT);
    assert!(frame.depths().windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_assemble_single_depth() {
    let store: Arc<dyn RowStore> = reference_memory_store().await;
    let frame = FrameAssembler::new(store).assemble(9100.0, 9100.0).await.unwrap();
    assert_eq!(frame.height(), 1);
    assert_eq!(frame.depths(), &[9100.0]);
}

#[tokio::test]
async fn test_assemble_detects_out_of_order_store() {
    let store = VerbatimStore {
        rows: vec![
            ScanRow::new(2.0, vec![0; 4]),
            ScanRow::new(1.0, vec![0; 4]),
            ScanRow::new(3.0, vec![0; 4]),
        ],
        width: 4,
    };
    let assembler = FrameAssembler::new(Arc::new(store));

    let err = assembler.assemble(0.0, 10.0).await.unwrap_err();
    assert!(matches!(
        err,
        DepthFrameError::NonMonotonicDepth { previous, current } if previous == 2.0 && current == 1.0
    ));
    assert!(err.is_integrity_violation());
}

#[tokio::test]
async fn test_assemble_detects_width_drift() {
    let store = VerbatimStore {
        rows: vec![ScanRow::new(1.0, vec![0; 150]), ScanRow::new(2.0, vec![0; 149])],
        width: 150,
    };
    let err = FrameAssembler::new(Arc::new(store))
        .assemble(0.0, 10.0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DepthFrameError::InconsistentWidth { depth, expected: 150, actual: 149 } if depth == 2.0
    ));
}

#[tokio::test]
async fn test_assemble_over_sqlite_store() {
    let store = populated_sqlite_store(100.0, 0.5, 20, 150).await;
    let frame = FrameAssembler::new(Arc::new(store))
        .assemble(101.0, 103.0)
        .await
        .unwrap();
    assert_eq!(frame.height(), 5);
    assert_eq!(frame.width(), 150);
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_render_gray_png_matches_stored_bytes() {
    let service = reference_service().await;
    let out = service.render(9100.0, 9200.0, Some("gray"), "png").await.unwrap();

    assert_eq!(out.content_type, "image/png");
    assert_eq!(out.metadata.height, 1001);
    assert_eq!(out.metadata.width, 150);
    assert_eq!(out.metadata.colormap_name.as_deref(), Some("gray"));

    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
    let luma = decoded.to_luma8();
    assert_eq!(luma.dimensions(), (150, 1001));

    let first = row_index(9100.0);
    for (y, row) in luma.rows().enumerate() {
        for (x, px) in row.enumerate() {
            assert_eq!(px.0[0], pixel_at(first + y, x));
        }
    }
}

#[tokio::test]
async fn test_render_resistivity_jpeg() {
    let service = reference_service().await;
    let out = service
        .render(9100.0, 9200.0, Some("resistivity"), "jpeg")
        .await
        .unwrap();

    assert!(!out.bytes.is_empty());
    assert_eq!(out.content_type, "image/jpeg");
    assert_eq!(out.metadata.height, 1001);
    assert_eq!(out.metadata.width, 150);
    assert_eq!(out.metadata.colormap_name.as_deref(), Some("resistivity"));
    assert_eq!(out.metadata.depth_first, 9100.0);
    assert_eq!(out.metadata.depth_last, 9200.0);

    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (150, 1001));
}

#[tokio::test]
async fn test_render_colormapped_png_uses_lookup_table() {
    let service = reference_service().await;
    let out = service
        .render(9000.0, 9001.0, Some("viridis"), "png")
        .await
        .unwrap();

    let registry = ColormapRegistry::with_defaults().unwrap();
    let viridis = registry.get("viridis").unwrap();
    let rgb = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    assert_eq!(rgb.dimensions(), (150, 11));
    for (x, y, px) in rgb.enumerate_pixels() {
        assert_eq!(px.0, viridis.map(pixel_at(y as usize, x as usize)));
    }
}

#[tokio::test]
async fn test_render_raw_round_trip() {
    let service = reference_service().await;
    let out = service.render(9000.0, 9000.9, Some("viridis"), "raw").await.unwrap();

    assert_eq!(out.content_type, "application/octet-stream");
    assert_eq!(out.metadata.height, 10);
    assert_eq!(out.metadata.colormap_name, None);
    assert_eq!(out.bytes.len(), 10 * 150);
    for (y, row) in out.bytes.chunks(150).enumerate() {
        let expected: Vec<u8> = (0..150).map(|x| pixel_at(y, x)).collect();
        assert_eq!(row, expected.as_slice());
    }
}

#[tokio::test]
async fn test_render_without_colormap_is_grayscale() {
    let service = reference_service().await;
    let out = service.render(9000.0, 9000.5, None, "png").await.unwrap();
    assert_eq!(out.metadata.colormap_name, None);
    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
}

#[tokio::test]
async fn test_render_alias_reports_canonical_name() {
    let service = reference_service().await;
    let out = service
        .render(9000.0, 9000.5, Some("high-contrast"), "png")
        .await
        .unwrap();
    assert_eq!(out.metadata.colormap_name.as_deref(), Some("high_contrast"));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_render_bmp_is_unsupported() {
    let service = reference_service().await;
    let err = service.render(9100.0, 9200.0, None, "bmp").await.unwrap_err();
    assert!(matches!(err, DepthFrameError::UnsupportedFormat(_)));
    assert_eq!(err.http_status_code(), 400);
}

#[tokio::test]
async fn test_render_unknown_colormap() {
    let service = reference_service().await;
    let err = service
        .render(9100.0, 9200.0, Some("jet"), "png")
        .await
        .unwrap_err();
    assert!(matches!(err, DepthFrameError::UnknownColormap { .. }));
}

#[tokio::test]
async fn test_render_validates_before_store_access() {
    // Unknown colormap wins even when the store is empty
    let store: Arc<dyn RowStore> = Arc::new(MemoryRowStore::new());
    let service = FrameService::new(
        store,
        Arc::new(ColormapRegistry::with_defaults().unwrap()),
        Encoder::default(),
    );

    let err = service.render(1.0, 2.0, Some("jet"), "png").await.unwrap_err();
    assert!(matches!(err, DepthFrameError::UnknownColormap { .. }));

    let err = service.render(1.0, 2.0, None, "png").await.unwrap_err();
    assert!(matches!(err, DepthFrameError::StoreEmpty));
    assert_eq!(err.http_status_code(), 503);
}

#[tokio::test]
async fn test_render_inverted_range() {
    let service = reference_service().await;
    let err = service.render(9200.0, 9100.0, None, "png").await.unwrap_err();
    assert!(matches!(err, DepthFrameError::InvalidDepthRange { .. }));
}

#[tokio::test]
async fn test_list_colormaps() {
    let service = reference_service().await;
    let list = service.list_colormaps();
    assert_eq!(list.len(), 6);
    let names: Vec<_> = list.iter().map(|c| c.name.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_renders_match_sequential_output() {
    let service = reference_service().await;
    let requests: [(f64, f64, Option<&'static str>, &'static str); 6] = [
        (9000.0, 9100.0, Some("resistivity"), "png"),
        (9050.0, 9150.0, Some("viridis"), "png"),
        (9100.0, 9300.0, Some("geological"), "jpeg"),
        (9200.0, 9210.0, Some("high_contrast"), "png"),
        (9300.0, 9546.0, Some("gray"), "png"),
        (9000.0, 9546.0, None, "raw"),
    ];

    let mut tasks = tokio::task::JoinSet::new();
    for (i, (min, max, colormap, format)) in requests.into_iter().enumerate() {
        let service = service.clone();
        tasks.spawn(async move { (i, service.render(min, max, colormap, format).await) });
    }

    let mut concurrent = vec![None; requests.len()];
    while let Some(joined) = tasks.join_next().await {
        let (i, result) = joined.unwrap();
        concurrent[i] = Some(result.unwrap());
    }

    for (i, (min, max, colormap, format)) in requests.into_iter().enumerate() {
        let alone = service.render(min, max, colormap, format).await.unwrap();
        let together = concurrent[i].take().unwrap();
        assert_eq!(together.bytes, alone.bytes, "request {}", i);
        assert_eq!(together.metadata, alone.metadata, "request {}", i);
    }
}
