//! The staged ingestion orchestrator (C11, spec §4.11).
//!
//! Drives one document through the ten-stage sequence — hash/dedup check,
//! upload, extraction, image processing, classification, metadata
//! extraction, persistence, chunking, embedding, finalization — emitting a
//! [`ProgressEvent`] after every stage and honoring the failure semantics
//! spec §4.11 assigns to each one. Concurrency is bounded at two
//! granularities (spec §5): an admission [`Semaphore`] caps documents in
//! flight, and a second, per-document semaphore bounds the fan-out inside
//! `process_images` and `generate_embeddings`, with a join barrier that
//! restores item order before anything is inserted.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use docforge_chunk::chunk_document;
use docforge_classify::{classifier, codes, model_extract, version};
use docforge_config::PatternConfigStore;
use docforge_core::document::ProcessingStatus;
use docforge_core::{Chunk, Document, DocumentMetadata, Embedding, Image, Stage};
use docforge_core::{ErrorKind, StageError};
use docforge_gateway::{GenerationOptions, ModelGateway};
use docforge_pdf::ExtractedImage;
use docforge_storage::{ObjectStore, RelationalStore};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::event::ProgressEvent;
use crate::manufacturer_names::display_name;
use crate::outcome::{ProcessOutcome, RunStats};
use crate::stats::PipelineStats;

const VISION_PROMPT: &str = "Describe this image from a printer/copier technical manual. \
Note any part labels, callouts, panel names, or diagrams visible.";

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    use std::fmt::Write;
    for byte in digest {
        write!(out, "{byte:02x}").expect("writing to a String never fails");
    }
    out
}

fn sniff_image_kind(bytes: &[u8]) -> (&'static str, &'static str) {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ("image/jpeg", "jpg")
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        ("image/png", "png")
    } else {
        ("application/octet-stream", "bin")
    }
}

/// Runs `items` through `work` with at most `concurrency` in flight at once,
/// returning results in the *original* `items` order once every task has
/// settled (spec §5: "insertion happens after a barrier that collects and
/// sorts results"). A task that panics contributes no entry to the output.
/// Returns `None` if `cancel` fires before every task has settled, having
/// first aborted whatever was still outstanding.
async fn fan_out<I, T, F, Fut>(items: Vec<I>, concurrency: usize, cancel: &CancellationToken, work: F) -> Option<Vec<T>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let n = items.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let work = Arc::new(work);
    let mut set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let work = work.clone();
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore is never closed");
            let value = work(item).await;
            (index, value)
        });
    }

    let mut slots: Vec<Option<T>> = (0..n).map(|_| None).collect();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                set.abort_all();
                return None;
            }
            next = set.join_next() => {
                match next {
                    Some(Ok((index, value))) => slots[index] = Some(value),
                    Some(Err(join_error)) if join_error.is_cancelled() => return None,
                    Some(Err(_)) => {}
                    None => break,
                }
            }
        }
    }
    Some(slots.into_iter().flatten().collect())
}

/// The staged, concurrency-controlled, idempotent document ingestion
/// orchestrator (C11).
#[derive(Debug)]
pub struct Orchestrator {
    patterns: Arc<PatternConfigStore>,
    gateway: Arc<ModelGateway>,
    objects: Arc<ObjectStore>,
    relational: Arc<RelationalStore>,
    config: PipelineConfig,
    stats: Arc<PipelineStats>,
    admission: Arc<Semaphore>,
    events: async_channel::Sender<ProgressEvent>,
}

impl Orchestrator {
    /// Builds an orchestrator over its four external collaborators (C1/C3/C4/C5)
    /// and a [`PipelineConfig`], returning it paired with the receiving end of
    /// its progress-event channel.
    #[must_use]
    pub fn new(
        patterns: Arc<PatternConfigStore>,
        gateway: ModelGateway,
        objects: ObjectStore,
        relational: RelationalStore,
        config: PipelineConfig,
    ) -> (Self, async_channel::Receiver<ProgressEvent>) {
        let (tx, rx) = async_channel::unbounded();
        let admission = Arc::new(Semaphore::new(config.max_concurrent_documents.max(1)));
        let orchestrator = Self {
            patterns,
            gateway: Arc::new(gateway),
            objects: Arc::new(objects),
            relational: Arc::new(relational),
            config,
            stats: Arc::new(PipelineStats::new()),
            admission,
            events: tx,
        };
        (orchestrator, rx)
    }

    /// Process-wide ingestion counters, shared across every in-flight document.
    #[must_use]
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    fn emit(&self, document_id: Uuid, stage: Stage, percent: u8, sub_operation: impl Into<String>) {
        let event = ProgressEvent::new(document_id, stage, percent, sub_operation);
        // The channel is unbounded and only ever dropped together with the
        // orchestrator; a send error means every receiver has already gone
        // away, which is not this stage's problem.
        let _ = self.events.try_send(event);
    }

    /// Runs a stage's work under the soft per-stage timeout and the caller's
    /// cancellation token (spec §5).
    async fn guarded<T>(&self, stage: Stage, cancel: &CancellationToken, fut: impl Future<Output = Result<T, StageError>>) -> Result<T, StageError> {
        tokio::select! {
            () = cancel.cancelled() => Err(StageError::new(stage, ErrorKind::Cancellation, "operation cancelled")),
            outcome = tokio::time::timeout(self.config.stage_timeout, fut) => match outcome {
                Ok(result) => result,
                Err(_) => Err(StageError::new(stage, ErrorKind::Cancellation, "stage exceeded its soft timeout")
                    .with_hint("increase PipelineConfig::stage_timeout or investigate the slow dependency")),
            },
        }
    }

    /// Ingests `bytes` (named `filename`), admitting it against
    /// `max_concurrent_documents` and running it to completion with no
    /// external cancellation point.
    pub async fn process(&self, bytes: &[u8], filename: &str) -> ProcessOutcome {
        self.process_cancelable(bytes, filename, CancellationToken::new()).await
    }

    /// As [`Self::process`], but `cancel` can abort the run at any
    /// suspension point; a fired token leaves the document in `failed` state
    /// with a [`ErrorKind::Cancellation`] error (spec §5, testable property 6).
    pub async fn process_cancelable(&self, bytes: &[u8], filename: &str, cancel: CancellationToken) -> ProcessOutcome {
        let _permit = match self.admission.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return ProcessOutcome::Error(StageError::new(Stage::UploadCheck, ErrorKind::Cancellation, "orchestrator is shutting down")),
        };

        match self.run(bytes, filename, &cancel).await {
            Ok(outcome) => outcome,
            Err(error) => {
                self.stats.record_failure();
                ProcessOutcome::Error(error)
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    async fn run(&self, bytes: &[u8], filename: &str, cancel: &CancellationToken) -> Result<ProcessOutcome, StageError> {
        let toggles = self.config.execution_mode.toggles();
        let snapshot = self.patterns.snapshot();

        // --- stage 1: upload_check ---
        let file_hash = sha256_hex(bytes);
        let existing = self
            .guarded(Stage::UploadCheck, cancel, async {
                self.relational
                    .find_document_by_hash(&file_hash)
                    .await
                    .map_err(|e| e.into_stage_error(Stage::UploadCheck))
            })
            .await?;

        if let Some(existing) = existing {
            self.emit(existing.id, Stage::UploadCheck, 100, "duplicate content hash");
            self.stats.record_duplicate();
            return Ok(ProcessOutcome::Duplicate { existing_document_id: existing.id });
        }

        let document_id = Uuid::new_v4();
        self.emit(document_id, Stage::UploadCheck, 10, "hash computed, no prior ingestion");

        // --- stage 2: upload_document ---
        let upload = self
            .guarded(Stage::UploadDocument, cancel, async {
                self.objects
                    .upload(&self.config.documents_bucket, filename, bytes, "application/pdf")
                    .await
                    .map_err(|e| e.into_stage_error(Stage::UploadDocument))
            })
            .await?;
        self.emit(document_id, Stage::UploadDocument, 20, "uploaded raw PDF bytes");

        // --- stage 3: extract_content ---
        let extracted = self
            .guarded(Stage::ExtractContent, cancel, async {
                docforge_pdf::extract(bytes).map_err(|e| StageError::new(Stage::ExtractContent, ErrorKind::PermanentInput, e.to_string()))
            })
            .await?;
        self.emit(document_id, Stage::ExtractContent, 30, format!("extracted {} pages", extracted.pages));

        // --- stage 4: process_images ---
        let images = if toggles.process_images {
            match self.process_images(document_id, &extracted.images, toggles.vision, cancel).await {
                Some(images) => images,
                None => return Err(StageError::new(Stage::ProcessImages, ErrorKind::Cancellation, "operation cancelled")),
            }
        } else {
            Vec::new()
        };
        self.emit(document_id, Stage::ProcessImages, 40, format!("{} images processed", images.len()));

        // --- stage 5: classify_document ---
        let classification = if toggles.classify {
            classifier::classify(filename, &extracted.text, &snapshot)
        } else {
            classifier::classify(filename, "", &snapshot)
        };
        self.emit(document_id, Stage::ClassifyDocument, 50, format!("classified as {}", classification.document_type));

        // --- stage 6: extract_metadata (C7 version, C8 models, C9 codes/parts) ---
        let (model_extraction, version_match, error_codes, parts) = if toggles.extract_metadata {
            let model_extraction = model_extract::extract(&extracted.text, classification.manufacturer.as_deref(), &snapshot);
            let version_match = version::extract(&extracted.text, classification.manufacturer.as_deref(), snapshot.versions());
            let (error_codes, parts) = match classification.manufacturer.as_deref() {
                Some(manufacturer) => (
                    codes::extract_error_codes(&extracted.text, manufacturer, &snapshot),
                    codes::extract_part_numbers(&extracted.text, manufacturer, &snapshot),
                ),
                None => (Vec::new(), Vec::new()),
            };
            (model_extraction, version_match, error_codes, parts)
        } else {
            Default::default()
        };
        self.emit(document_id, Stage::ExtractMetadata, 60, format!("{} models found", model_extraction.models.len()));

        // --- stage 7: store_document ---
        let mut document = Document::new(filename, file_hash, bytes.len() as u64);
        document.id = document_id;
        document.storage_url = upload.url;
        document.total_pages = extracted.pages as u32;
        document.document_type = classification.document_type;
        document.processing_status = ProcessingStatus::Processing;
        document.version_string = version_match.as_ref().map_or_else(String::new, |v| v.version.clone());

        let manufacturer_id = self
            .guarded(Stage::StoreDocument, cancel, async {
                match classification.manufacturer.as_deref() {
                    Some(key) => self
                        .relational
                        .upsert_manufacturer(key, &display_name(key))
                        .await
                        .map(|m| Some(m.id))
                        .map_err(|e| e.into_stage_error(Stage::StoreDocument)),
                    None => Ok(None),
                }
            })
            .await?;
        document.manufacturer_id = manufacturer_id;

        if let Some(manufacturer_id) = manufacturer_id {
            for model in &model_extraction.models {
                self.guarded(Stage::StoreDocument, cancel, async {
                    self.relational
                        .upsert_product(model, manufacturer_id)
                        .await
                        .map(|_| ())
                        .map_err(|e| e.into_stage_error(Stage::StoreDocument))
                })
                .await?;
            }
        }

        let mut confidences = HashMap::new();
        confidences.insert("document_type".to_string(), classification.document_type_confidence);
        confidences.insert("manufacturer".to_string(), classification.manufacturer_confidence);
        confidences.insert("series".to_string(), classification.series_confidence);
        confidences.insert(
            "version".to_string(),
            version_match.as_ref().map_or(0.0, |v| v.confidence),
        );
        confidences.insert("hybrid".to_string(), classification.hybrid_confidence);

        document.metadata = DocumentMetadata {
            models: model_extraction.models.clone(),
            series: classification.series.clone(),
            placeholders: model_extraction.placeholders.clone(),
            images: images.iter().map(|i| i.id).collect(),
            confidences: confidences.into_iter().collect(),
            error_codes,
            parts,
        };

        self.guarded(Stage::StoreDocument, cancel, async {
            self.relational.insert_document(&document).await.map_err(|e| e.into_stage_error(Stage::StoreDocument))
        })
        .await?;
        self.guarded(Stage::StoreDocument, cancel, async {
            self.relational.insert_images(&images).await.map_err(|e| e.into_stage_error(Stage::StoreDocument))
        })
        .await?;
        self.emit(document_id, Stage::StoreDocument, 70, "document row persisted");

        // --- stage 8: process_chunks ---
        let chunk_result = self
            .guarded(Stage::ProcessChunks, cancel, async {
                if !toggles.process_chunks {
                    return Ok(Vec::new());
                }
                let drafts = chunk_document(
                    &extracted.text,
                    document.document_type.as_str(),
                    classification.manufacturer.as_deref(),
                    &snapshot,
                )
                .map_err(|e| e.into_stage_error(Stage::ProcessChunks))?;
                Ok(drafts
                    .into_iter()
                    .enumerate()
                    .map(|(index, draft)| Chunk {
                        id: Uuid::new_v4(),
                        document_id: document.id,
                        chunk_index: index as u32,
                        page_start: draft.page_start,
                        page_end: draft.page_end,
                        text_chunk: draft.text,
                        token_count: draft.token_count,
                        fingerprint: draft.fingerprint,
                        section_title: draft.section_title,
                        processing_status: ProcessingStatus::Completed,
                    })
                    .collect::<Vec<_>>())
            })
            .await;

        let chunks = match chunk_result {
            Ok(chunks) => chunks,
            Err(error) => {
                document.processing_status = ProcessingStatus::Failed;
                let _ = self.relational.update_document(&document).await;
                return Err(error);
            }
        };

        if let Err(error) = self
            .guarded(Stage::ProcessChunks, cancel, async {
                self.relational.insert_chunks(&chunks).await.map_err(|e| e.into_stage_error(Stage::ProcessChunks))
            })
            .await
        {
            document.processing_status = ProcessingStatus::Failed;
            let _ = self.relational.update_document(&document).await;
            return Err(error);
        }
        self.emit(document_id, Stage::ProcessChunks, 80, format!("{} chunks persisted", chunks.len()));

        // --- stage 9: generate_embeddings ---
        let embeddings_degraded = if toggles.generate_embeddings && !chunks.is_empty() {
            match self.generate_embeddings(document.id, &chunks, cancel).await {
                Some(degraded) => degraded,
                None => {
                    document.processing_status = ProcessingStatus::Failed;
                    let _ = self.relational.update_document(&document).await;
                    return Err(StageError::new(Stage::GenerateEmbeddings, ErrorKind::Cancellation, "operation cancelled"));
                }
            }
        } else {
            0
        };
        let embeddings_count = if toggles.generate_embeddings { chunks.len() as u32 } else { 0 };
        self.emit(
            document_id,
            Stage::GenerateEmbeddings,
            90,
            format!("{embeddings_count} embeddings ({embeddings_degraded} degraded)"),
        );

        // --- stage 10: finalize ---
        document.processing_status = ProcessingStatus::Completed;
        document.advance_progress(100);
        document.processed_at = Some(OffsetDateTime::now_utc());
        self.guarded(Stage::Finalize, cancel, async {
            self.relational.update_document(&document).await.map_err(|e| e.into_stage_error(Stage::Finalize))
        })
        .await?;
        self.emit(document_id, Stage::Finalize, 100, "document completed");

        let stats = RunStats {
            pages: extracted.pages as u32,
            chunks: chunks.len() as u32,
            embeddings: embeddings_count,
            embeddings_degraded,
            images: images.len() as u32,
            models_found: model_extraction.models.len() as u32,
            confidence: classification.hybrid_confidence,
        };
        self.stats
            .record_success(u64::from(stats.chunks), u64::from(stats.embeddings), u64::from(stats.embeddings_degraded), u64::from(stats.images));

        Ok(ProcessOutcome::Success { document_id: document.id, stats })
    }

    /// Dedupes extracted images by content hash within the document (to skip
    /// redundant vision analysis), then fans out description+upload for every
    /// unique image bounded by `max_concurrent_chunks`, re-expanding the
    /// results back over every `(page, index)` occurrence in document order.
    /// Per-image failures drop that image from the result and are logged;
    /// returns `None` only if `cancel` fired before every job settled.
    async fn process_images(&self, document_id: Uuid, extracted: &[ExtractedImage], vision_enabled: bool, cancel: &CancellationToken) -> Option<Vec<Image>> {
        let mut unique_order: Vec<String> = Vec::new();
        let mut unique_bytes: HashMap<String, Vec<u8>> = HashMap::new();
        for image in extracted {
            let hash = sha256_hex(&image.bytes);
            if !unique_bytes.contains_key(&hash) {
                unique_order.push(hash.clone());
                unique_bytes.insert(hash, image.bytes.clone());
            }
        }

        let gateway = self.gateway.clone();
        let objects = self.objects.clone();
        let images_bucket = self.config.images_bucket.clone();
        let vision_model = gateway.config().vision_model.clone();

        let jobs: Vec<(String, Vec<u8>)> = unique_order
            .iter()
            .map(|hash| (hash.clone(), unique_bytes.remove(hash).expect("every order entry has bytes")))
            .collect();

        let job_results = fan_out(jobs, self.config.max_concurrent_chunks, cancel, move |(hash, bytes)| {
            let gateway = gateway.clone();
            let objects = objects.clone();
            let images_bucket = images_bucket.clone();
            let vision_model = vision_model.clone();
            async move {
                let description = if vision_enabled {
                    match gateway.vision(&vision_model, VISION_PROMPT, &bytes, GenerationOptions::default()).await {
                        Ok(text) => Some(text),
                        Err(error) => {
                            tracing::warn!(%error, hash, "vision analysis failed, continuing without a description");
                            None
                        }
                    }
                } else {
                    None
                };

                let (content_type, extension) = sniff_image_kind(&bytes);
                let logical_path = format!("{hash}.{extension}");
                match objects.upload(&images_bucket, &logical_path, &bytes, content_type).await {
                    Ok(result) => Some((hash, result.url, description)),
                    Err(error) => {
                        tracing::warn!(%error, hash, "image upload failed, dropping this image");
                        None
                    }
                }
            }
        })
        .await?;

        let mut results: HashMap<String, (String, Option<String>)> = HashMap::new();
        for entry in job_results.into_iter().flatten() {
            let (hash, url, description) = entry;
            results.insert(hash, (url, description));
        }

        let mut images = Vec::new();
        for extracted_image in extracted {
            let hash = sha256_hex(&extracted_image.bytes);
            let Some((url, description)) = results.get(&hash) else {
                continue;
            };
            let mut image = Image::new(
                document_id,
                extracted_image.page as u32,
                extracted_image.index as u32,
                hash,
                extracted_image.bytes.len() as u64,
            );
            image.storage_url = url.clone();
            image.width = extracted_image.width;
            image.height = extracted_image.height;
            image.colorspace = extracted_image.colorspace.clone();
            image.ai_description = description.clone();
            images.push(image);
        }
        self.emit(document_id, Stage::ProcessImages, 35, format!("{} unique images described/uploaded", results.len()));
        Some(images)
    }

    /// Embeds every chunk bounded by `max_concurrent_chunks`, honoring the
    /// skip-if-already-embedded optimization from spec §9: if the document
    /// already has one embedding row per chunk under the configured model,
    /// the stage is a no-op. Returns the degraded-embedding count, or `None`
    /// if cancelled mid-fan-out.
    async fn generate_embeddings(&self, document_id: Uuid, chunks: &[Chunk], cancel: &CancellationToken) -> Option<u32> {
        let model_name = self.gateway.config().embedding_model.clone();

        match self.relational.count_embeddings_for_document(document_id, &model_name).await {
            Ok(count) if count > 0 && count as usize == chunks.len() => {
                tracing::info!(document_id = %document_id, model = %model_name, "embeddings already present for every chunk, skipping");
                return Some(0);
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "failed to check for existing embeddings, proceeding to regenerate");
            }
        }

        let gateway = self.gateway.clone();
        let items: Vec<(Uuid, String)> = chunks.iter().map(|c| (c.id, c.text_chunk.clone())).collect();

        let outcomes = fan_out(items, self.config.max_concurrent_chunks, cancel, move |(chunk_id, text)| {
            let gateway = gateway.clone();
            let model_name = model_name.clone();
            async move {
                let outcome = gateway.embed(&model_name, &text).await;
                (chunk_id, model_name, outcome)
            }
        })
        .await?;

        let mut degraded_count = 0u32;
        let embeddings: Vec<Embedding> = outcomes
            .into_iter()
            .map(|(chunk_id, model_name, outcome)| {
                if outcome.degraded {
                    degraded_count += 1;
                    Embedding::degraded(chunk_id, outcome.vector.len(), model_name)
                } else {
                    Embedding::new(chunk_id, outcome.vector, model_name)
                }
            })
            .collect();

        if let Err(error) = self.relational.insert_embeddings(&embeddings).await {
            tracing::error!(%error, document_id = %document_id, "failed to persist embeddings");
        }

        Some(degraded_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sniff_image_kind_recognizes_jpeg_and_png_magic_bytes() {
        assert_eq!(sniff_image_kind(&[0xFF, 0xD8, 0xFF, 0xE0]).0, "image/jpeg");
        assert_eq!(sniff_image_kind(&[0x89, 0x50, 0x4E, 0x47]).0, "image/png");
        assert_eq!(sniff_image_kind(&[0x00, 0x01, 0x02]).0, "application/octet-stream");
    }

    #[tokio::test]
    async fn fan_out_preserves_input_order_despite_variable_completion_time() {
        let cancel = CancellationToken::new();
        let items = vec![30u64, 10, 20];
        let results = fan_out(items, 3, &cancel, |delay_ms| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            delay_ms
        })
        .await
        .expect("not cancelled");
        assert_eq!(results, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn fan_out_returns_none_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let items = vec![1, 2, 3];
        let results = fan_out(items, 2, &cancel, |n| async move { n }).await;
        assert!(results.is_none());
    }

    #[tokio::test]
    async fn fan_out_drops_panicked_items_but_keeps_the_rest() {
        let cancel = CancellationToken::new();
        let items = vec![1u32, 2, 3];
        let results = fan_out(items, 3, &cancel, |n| async move {
            if n == 2 {
                panic!("simulated failure");
            }
            n
        })
        .await
        .expect("not cancelled");
        assert_eq!(results, vec![1, 3]);
    }
}
