//! The `process` orchestration: validate -> resample -> annotate.
//!
//! Stages run strictly in order. Validation is a cheap in-line check;
//! resample and annotate each run on a blocking task racing a wall-clock
//! budget via `tokio::time::timeout`. When a budget elapses the call
//! resolves with `Timeout` immediately; the abandoned blocking task runs to
//! completion in the background and its buffers are dropped there, so
//! nothing leaks and no other in-flight photo is affected.

use std::time::Duration;

use log::{debug, warn};
use tokio::task;
use tokio::time::timeout;

use fieldstamp_core::{EncodedImage, ImageBlob};

use crate::config::{AnnotateFallback, PipelineConfig};
use crate::error::{PipelineError, Stage};
use crate::stages;

/// Process one captured photo: validate it, shrink it to the configured
/// bounds, and (if enabled) stamp the label text onto it.
///
/// Fails with the first stage's error; no partial output is ever returned.
/// The one exception is the explicit `AnnotateFallback::KeepUnannotated`
/// policy, which returns the resample output when annotation fails.
///
/// The input blob is consumed and never retained past the call. Concurrent
/// invocations are independent.
pub async fn process(
    blob: ImageBlob,
    config: &PipelineConfig,
) -> Result<EncodedImage, PipelineError> {
    stages::validate(&blob, &config.limits)?;
    debug!(
        "process: accepted {} upload of {} bytes",
        blob.media_type,
        blob.byte_len()
    );

    let cfg = config.clone();
    let bytes = blob.bytes;
    let resampled = run_stage(Stage::Resample, config.timeouts.resample, move || {
        stages::resample(&bytes, &cfg)
    })
    .await?;

    if !config.annotation.enabled {
        return Ok(resampled);
    }

    // Keep a copy to hand back only when the fallback policy asks for it
    let fallback = (config.annotation.on_failure == AnnotateFallback::KeepUnannotated)
        .then(|| resampled.clone());

    let text = config.annotation.text.clone();
    let style = config.annotation.style.clone();
    let quality = config.quality_u8();
    let stamped = run_stage(Stage::Annotate, config.timeouts.annotate, move || {
        stages::annotate(&resampled, &text, &style, quality)
    })
    .await;

    match (stamped, fallback) {
        (Ok(image), _) => Ok(image),
        (Err(err), Some(unannotated)) => {
            warn!("process: annotation failed ({err}); keeping unannotated image per fallback policy");
            Ok(unannotated)
        }
        (Err(err), None) => Err(err),
    }
}

/// Run one stage's work on a blocking task, racing its wall-clock budget.
async fn run_stage<T, F>(stage: Stage, budget: Duration, work: F) -> Result<T, PipelineError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
{
    match timeout(budget, task::spawn_blocking(work)).await {
        Ok(Ok(result)) => result,
        // A panicked or cancelled worker cannot produce output
        Ok(Err(join_err)) => Err(PipelineError::EncodeFailed {
            stage,
            reason: format!("stage worker failed: {join_err}"),
        }),
        Err(_elapsed) => {
            warn!("{stage} stage exceeded its {}ms budget", budget.as_millis());
            Err(PipelineError::timeout(stage, budget))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnnotationConfig, StageTimeouts};
    use fieldstamp_core::{decode_image, encode_jpeg, FilterType};

    /// Encode a gradient test image to JPEG bytes.
    fn test_jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        encode_jpeg(&pixels, width, height, 90).unwrap()
    }

    fn blob(width: u32, height: u32) -> ImageBlob {
        ImageBlob::new("image/jpeg", test_jpeg(width, height))
    }

    /// Bilinear filter and generous budgets keep debug-mode test runs well
    /// inside their stage timeouts.
    fn test_config() -> PipelineConfig {
        PipelineConfig {
            filter: FilterType::Bilinear,
            timeouts: StageTimeouts {
                resample: Duration::from_secs(120),
                annotate: Duration::from_secs(120),
            },
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_process_shrinks_oversize_photo() {
        let out = process(blob(4000, 3000), &test_config()).await.unwrap();
        assert_eq!(out.media_type, "image/jpeg");

        let decoded = decode_image(&out.bytes).unwrap();
        assert!(decoded.width <= 1920);
        assert!(decoded.height <= 1920);
        // 4:3 aspect preserved
        assert_eq!(decoded.width, 1920);
        assert_eq!(decoded.height, 1440);
    }

    #[tokio::test]
    async fn test_process_never_upscales() {
        let out = process(blob(500, 500), &test_config()).await.unwrap();

        let decoded = decode_image(&out.bytes).unwrap();
        assert_eq!(decoded.width, 500);
        assert_eq!(decoded.height, 500);
    }

    #[tokio::test]
    async fn test_process_rejects_unsupported_type_before_decode() {
        // Bytes that would also fail decoding: seeing UnsupportedType (not
        // DecodeFailed) proves validation ran first and no decode started
        let blob = ImageBlob::new("application/pdf", vec![0xDE, 0xAD, 0xBE, 0xEF]);
        let err = process(blob, &test_config()).await.unwrap_err();
        match err {
            PipelineError::UnsupportedType(t) => assert_eq!(t, "application/pdf"),
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_rejects_oversize_blob_size_first() {
        let mut config = test_config();
        config.limits.max_bytes = 10;

        // Both too large and of a disallowed type: size wins
        let blob = ImageBlob::new("application/pdf", vec![0u8; 100]);
        let err = process(blob, &config).await.unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge { actual: 100, max: 10 }));
    }

    #[tokio::test]
    async fn test_process_annotation_changes_output() {
        let mut config = test_config();
        config.annotation = AnnotationConfig::with_text("2024-05-01 08:30:00");

        let plain = process(blob(400, 300), &test_config()).await.unwrap();
        let stamped = process(blob(400, 300), &config).await.unwrap();

        assert_ne!(plain.bytes, stamped.bytes);

        // Annotation never changes dimensions
        let decoded = decode_image(&stamped.bytes).unwrap();
        assert_eq!(decoded.width, 400);
        assert_eq!(decoded.height, 300);
    }

    #[tokio::test]
    async fn test_process_annotate_timeout_fails_call() {
        let mut config = test_config();
        config.annotation = AnnotationConfig::with_text("2024-05-01 08:30:00");
        config.timeouts.annotate = Duration::ZERO;

        let err = process(blob(400, 300), &config).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Timeout {
                stage: Stage::Annotate,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_process_annotate_timeout_fallback_keeps_unannotated() {
        let mut config = test_config();
        config.annotation = AnnotationConfig::with_text("2024-05-01 08:30:00");
        config.annotation.on_failure = AnnotateFallback::KeepUnannotated;
        config.timeouts.annotate = Duration::ZERO;

        let out = process(blob(400, 300), &config).await.unwrap();

        // The encoder is deterministic, so the fallback output matches a
        // run with annotation disabled entirely
        let plain = process(blob(400, 300), &test_config()).await.unwrap();
        assert_eq!(out.bytes, plain.bytes);
    }

    #[tokio::test]
    async fn test_process_resample_timeout() {
        let mut config = test_config();
        config.timeouts.resample = Duration::ZERO;

        let err = process(blob(400, 300), &config).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Timeout {
                stage: Stage::Resample,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_process_garbage_bytes_decode_failed() {
        let blob = ImageBlob::new("image/jpeg", vec![0u8; 64]);
        let err = process(blob, &test_config()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DecodeFailed {
                stage: Stage::Resample,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_process_concurrent_calls_are_independent() {
        let config = test_config();
        let (a, b) = tokio::join!(
            process(blob(600, 400), &config),
            process(blob(300, 500), &config),
        );

        let a = decode_image(&a.unwrap().bytes).unwrap();
        let b = decode_image(&b.unwrap().bytes).unwrap();
        assert_eq!((a.width, a.height), (600, 400));
        assert_eq!((b.width, b.height), (300, 500));
    }

    #[tokio::test]
    async fn test_run_stage_budget_elapses() {
        let err = run_stage(Stage::Resample, Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(500));
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Timeout {
                stage: Stage::Resample,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_run_stage_timeout_releases_worker_buffers() {
        use std::sync::Arc;

        // Stand-in for the stage's intermediate buffers: the worker holds
        // the only other reference, so the strong count falls back to 1
        // exactly when the abandoned worker has dropped its state.
        let buffers = Arc::new(vec![0u8; 1 << 20]);
        let held = Arc::clone(&buffers);

        let err = run_stage(Stage::Annotate, Duration::from_millis(20), move || {
            std::thread::sleep(Duration::from_millis(200));
            drop(held);
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Timeout {
                stage: Stage::Annotate,
                ..
            }
        ));

        // The call resolved before the worker finished; wait for the
        // background worker to run to completion and release everything
        let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
        while Arc::strong_count(&buffers) > 1 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed-out worker never released its buffers"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(Arc::strong_count(&buffers), 1);
    }

    #[tokio::test]
    async fn test_run_stage_fast_work_succeeds() {
        let result = run_stage(Stage::Annotate, Duration::from_secs(5), || Ok(41 + 1)).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_run_stage_propagates_stage_error() {
        let err = run_stage::<(), _>(Stage::Resample, Duration::from_secs(5), || {
            Err(PipelineError::DecodeFailed {
                stage: Stage::Resample,
                reason: "synthetic".into(),
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::DecodeFailed { .. }));
    }
}
