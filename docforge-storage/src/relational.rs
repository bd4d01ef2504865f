//! Pooled Postgres-compatible relational persistence (C5, spec §4.5).
//!
//! Every typed operation the orchestrator needs lives here so it never issues
//! raw SQL itself (spec §9's "consolidate repeated upload/insert logic into
//! the adapters" note). Multi-row inserts for one stage run inside a single
//! transaction, keeping a document row and its dependents consistent if the
//! stage fails partway through.

use std::str::FromStr;
use std::time::Duration;

use docforge_core::document::{DocumentType, ProcessingStatus};
use docforge_core::{Chunk, Document, DocumentMetadata, Embedding, Image, Manufacturer, Product};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Row, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::Result;

/// Bounded connection pool configuration (spec §4.5: min 2, max 10, configurable).
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    /// Minimum idle connections kept open.
    pub min_connections: u32,
    /// Maximum connections the pool will open.
    pub max_connections: u32,
    /// How long `acquire` waits before giving up.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Renders an `f32` vector as a pgvector literal, e.g. `[0.1,0.2,0.3]`.
#[must_use]
pub fn vector_literal(vector: &[f32]) -> String {
    let mut out = String::with_capacity(2 + vector.len() * 8);
    out.push('[');
    for (i, v) in vector.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push(']');
    out
}

fn parse_vector_literal(text: &str) -> Vec<f32> {
    text.trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Typed access to the entities in spec §3, over a bounded `PgPool`.
#[derive(Debug, Clone)]
pub struct RelationalStore {
    pool: sqlx::PgPool,
}

impl RelationalStore {
    /// Connects with the given [`PoolConfig`]. Honors `DATABASE_URL`-shaped
    /// connection strings (spec §6).
    pub async fn connect(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wraps an already-connected pool, for callers that build their own
    /// (e.g. tests against an ephemeral database).
    #[must_use]
    pub const fn from_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Testable property 1: looks up a document by its content hash so a
    /// second ingestion of identical bytes can be reported as a duplicate
    /// instead of reprocessed.
    pub async fn find_document_by_hash(&self, file_hash: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, file_name, file_hash, storage_url, size_bytes, total_pages, document_type, \
             manufacturer_id, language, processing_status, processing_progress, version_string, \
             metadata, created_at, processed_at FROM documents WHERE file_hash = $1",
        )
        .bind(file_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| document_from_row(&row)).transpose()
    }

    /// Inserts a new document row, as it exists the moment `upload_check`
    /// finds no existing hash match (`store_document`, spec §4.11 stage 7).
    pub async fn insert_document(&self, document: &Document) -> Result<()> {
        sqlx::query(
            "INSERT INTO documents (id, file_name, file_hash, storage_url, size_bytes, total_pages, \
             document_type, manufacturer_id, language, processing_status, processing_progress, \
             version_string, metadata, created_at, processed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(document.id)
        .bind(&document.file_name)
        .bind(&document.file_hash)
        .bind(&document.storage_url)
        .bind(document.size_bytes as i64)
        .bind(document.total_pages as i32)
        .bind(document.document_type.as_str())
        .bind(document.manufacturer_id)
        .bind(&document.language)
        .bind(document.processing_status.as_str())
        .bind(i32::from(document.processing_progress))
        .bind(&document.version_string)
        .bind(sqlx::types::Json(&document.metadata))
        .bind(document.created_at)
        .bind(document.processed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Updates the mutable fields of a document row (progress, status,
    /// classification results, `processed_at`). Called after `classify_document`,
    /// `extract_metadata`, and `finalize`.
    pub async fn update_document(&self, document: &Document) -> Result<()> {
        sqlx::query(
            "UPDATE documents SET document_type = $2, manufacturer_id = $3, language = $4, \
             processing_status = $5, processing_progress = $6, version_string = $7, metadata = $8, \
             processed_at = $9, storage_url = $10, total_pages = $11 WHERE id = $1",
        )
        .bind(document.id)
        .bind(document.document_type.as_str())
        .bind(document.manufacturer_id)
        .bind(&document.language)
        .bind(document.processing_status.as_str())
        .bind(i32::from(document.processing_progress))
        .bind(&document.version_string)
        .bind(sqlx::types::Json(&document.metadata))
        .bind(document.processed_at)
        .bind(&document.storage_url)
        .bind(document.total_pages as i32)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Finds a manufacturer by `name`, creating it if this is the first
    /// sighting (spec §3: "Created on first sighting").
    pub async fn upsert_manufacturer(&self, name: &str, display_name: &str) -> Result<Manufacturer> {
        if let Some(row) = sqlx::query("SELECT id, name, display_name, country FROM manufacturers WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
        {
            return manufacturer_from_row(&row);
        }

        let manufacturer = Manufacturer::new(name, display_name);
        sqlx::query("INSERT INTO manufacturers (id, name, display_name, country) VALUES ($1, $2, $3, $4) ON CONFLICT (name) DO NOTHING")
            .bind(manufacturer.id)
            .bind(&manufacturer.name)
            .bind(&manufacturer.display_name)
            .bind(&manufacturer.country)
            .execute(&self.pool)
            .await?;

        // Another concurrent ingestion may have won the race; re-read to get
        // the row that actually stuck.
        let row = sqlx::query("SELECT id, name, display_name, country FROM manufacturers WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        manufacturer_from_row(&row)
    }

    /// Finds a product by `(model_number, manufacturer_id)`, creating it if
    /// this is the first sighting.
    pub async fn upsert_product(&self, model_number: &str, manufacturer_id: Uuid) -> Result<Product> {
        if let Some(row) = sqlx::query(
            "SELECT id, model_number, display_name, manufacturer_id, product_type FROM products \
             WHERE model_number = $1 AND manufacturer_id = $2",
        )
        .bind(model_number)
        .bind(manufacturer_id)
        .fetch_optional(&self.pool)
        .await?
        {
            return product_from_row(&row);
        }

        let product = Product::new(model_number, manufacturer_id);
        sqlx::query(
            "INSERT INTO products (id, model_number, display_name, manufacturer_id, product_type) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (model_number, manufacturer_id) DO NOTHING",
        )
        .bind(product.id)
        .bind(&product.model_number)
        .bind(&product.display_name)
        .bind(product.manufacturer_id)
        .bind(&product.product_type)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT id, model_number, display_name, manufacturer_id, product_type FROM products \
             WHERE model_number = $1 AND manufacturer_id = $2",
        )
        .bind(model_number)
        .bind(manufacturer_id)
        .fetch_one(&self.pool)
        .await?;
        product_from_row(&row)
    }

    /// Inserts every image for a document in one transaction, in
    /// `(page_number, image_index)` order (spec §5 ordering guarantee).
    pub async fn insert_images(&self, images: &[Image]) -> Result<()> {
        if images.is_empty() {
            return Ok(());
        }
        let mut tx: Transaction<'_, sqlx::Postgres> = self.pool.begin().await?;
        for image in images {
            sqlx::query(
                "INSERT INTO images (id, document_id, page_number, image_index, storage_url, \
                 file_hash, width, height, colorspace, size_bytes, ai_description) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
                 ON CONFLICT (document_id, page_number, image_index) DO UPDATE SET \
                 storage_url = EXCLUDED.storage_url, ai_description = EXCLUDED.ai_description",
            )
            .bind(image.id)
            .bind(image.document_id)
            .bind(image.page_number as i32)
            .bind(image.image_index as i32)
            .bind(&image.storage_url)
            .bind(&image.file_hash)
            .bind(image.width as i32)
            .bind(image.height as i32)
            .bind(&image.colorspace)
            .bind(image.size_bytes as i64)
            .bind(&image.ai_description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Inserts every chunk for a document in one transaction, in
    /// `chunk_index` order (spec §5 ordering guarantee, testable property 2).
    pub async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let mut tx: Transaction<'_, sqlx::Postgres> = self.pool.begin().await?;
        for chunk in chunks {
            sqlx::query(
                "INSERT INTO chunks (id, document_id, chunk_index, page_start, page_end, text_chunk, \
                 token_count, fingerprint, section_title, processing_status) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 ON CONFLICT (document_id, chunk_index) DO UPDATE SET \
                 text_chunk = EXCLUDED.text_chunk, fingerprint = EXCLUDED.fingerprint, \
                 processing_status = EXCLUDED.processing_status",
            )
            .bind(chunk.id)
            .bind(chunk.document_id)
            .bind(chunk.chunk_index as i32)
            .bind(chunk.page_start as i32)
            .bind(chunk.page_end as i32)
            .bind(&chunk.text_chunk)
            .bind(chunk.token_count as i32)
            .bind(&chunk.fingerprint)
            .bind(&chunk.section_title)
            .bind(chunk.processing_status.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Inserts every embedding for a batch of chunks in one transaction, in
    /// the same order as the chunks they reference (spec §5 ordering
    /// guarantee). At most one row exists per `(chunk_id, model_name)`.
    pub async fn insert_embeddings(&self, embeddings: &[Embedding]) -> Result<()> {
        if embeddings.is_empty() {
            return Ok(());
        }
        let mut tx: Transaction<'_, sqlx::Postgres> = self.pool.begin().await?;
        for embedding in embeddings {
            sqlx::query(
                "INSERT INTO embeddings (id, chunk_id, vector, model_name, model_version, degraded, created_at) \
                 VALUES ($1, $2, $3::vector, $4, $5, $6, $7) \
                 ON CONFLICT (chunk_id, model_name) DO UPDATE SET \
                 vector = EXCLUDED.vector, degraded = EXCLUDED.degraded",
            )
            .bind(embedding.id)
            .bind(embedding.chunk_id)
            .bind(vector_literal(&embedding.vector))
            .bind(&embedding.model_name)
            .bind(&embedding.model_version)
            .bind(embedding.degraded)
            .bind(embedding.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Counts embeddings already stored for `document_id` under `model_name`,
    /// used by `generate_embeddings` to implement the "skip if embeddings
    /// already exist" optimization from spec §9 explicitly rather than
    /// silently.
    pub async fn count_embeddings_for_document(&self, document_id: Uuid, model_name: &str) -> Result<i64> {
        let row = sqlx::query(
            "SELECT count(*) AS n FROM embeddings e JOIN chunks c ON c.id = e.chunk_id \
             WHERE c.document_id = $1 AND e.model_name = $2",
        )
        .bind(document_id)
        .bind(model_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get::<i64, _>("n")?)
    }

    /// Returns the chunks for a document, ordered by `chunk_index`.
    pub async fn chunks_for_document(&self, document_id: Uuid) -> Result<Vec<Chunk>> {
        let rows = sqlx::query(
            "SELECT id, document_id, chunk_index, page_start, page_end, text_chunk, token_count, \
             fingerprint, section_title, processing_status FROM chunks WHERE document_id = $1 \
             ORDER BY chunk_index ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(chunk_from_row).collect()
    }
}

fn manufacturer_from_row(row: &PgRow) -> Result<Manufacturer> {
    Ok(Manufacturer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        display_name: row.try_get("display_name")?,
        country: row.try_get("country")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        model_number: row.try_get("model_number")?,
        display_name: row.try_get("display_name")?,
        manufacturer_id: row.try_get("manufacturer_id")?,
        product_type: row.try_get("product_type")?,
    })
}

fn chunk_from_row(row: &PgRow) -> Result<Chunk> {
    let status_text: String = row.try_get("processing_status")?;
    Ok(Chunk {
        id: row.try_get("id")?,
        document_id: row.try_get("document_id")?,
        chunk_index: row.try_get::<i32, _>("chunk_index")? as u32,
        page_start: row.try_get::<i32, _>("page_start")? as u32,
        page_end: row.try_get::<i32, _>("page_end")? as u32,
        text_chunk: row.try_get("text_chunk")?,
        token_count: row.try_get::<i32, _>("token_count")? as u32,
        fingerprint: row.try_get("fingerprint")?,
        section_title: row.try_get("section_title")?,
        processing_status: ProcessingStatus::from_str(&status_text).unwrap_or(ProcessingStatus::Pending),
    })
}

fn document_from_row(row: &PgRow) -> Result<Document> {
    let document_type_text: String = row.try_get("document_type")?;
    let status_text: String = row.try_get("processing_status")?;
    let metadata: sqlx::types::Json<DocumentMetadata> = row.try_get("metadata")?;
    let created_at: OffsetDateTime = row.try_get("created_at")?;
    let processed_at: Option<OffsetDateTime> = row.try_get("processed_at")?;

    Ok(Document {
        id: row.try_get("id")?,
        file_name: row.try_get("file_name")?,
        file_hash: row.try_get("file_hash")?,
        storage_url: row.try_get("storage_url")?,
        size_bytes: row.try_get::<i64, _>("size_bytes")? as u64,
        total_pages: row.try_get::<i32, _>("total_pages")? as u32,
        document_type: DocumentType::from_str(&document_type_text).unwrap_or(DocumentType::Unknown),
        manufacturer_id: row.try_get("manufacturer_id")?,
        language: row.try_get("language")?,
        processing_status: ProcessingStatus::from_str(&status_text).unwrap_or(ProcessingStatus::Pending),
        processing_progress: row.try_get::<i32, _>("processing_progress")? as u8,
        version_string: row.try_get("version_string")?,
        metadata: metadata.0,
        created_at,
        processed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_literal_formats_as_bracketed_csv() {
        assert_eq!(vector_literal(&[0.1, 0.2, 0.3]), "[0.1,0.2,0.3]");
        assert_eq!(vector_literal(&[]), "[]");
    }

    #[test]
    fn vector_literal_round_trips_through_parse() {
        let original = vec![1.0_f32, -2.5, 0.0, 3.25];
        let literal = vector_literal(&original);
        let parsed = parse_vector_literal(&literal);
        assert_eq!(parsed, original);
    }

    #[test]
    fn pool_config_defaults_match_spec_bounds() {
        let config = PoolConfig::default();
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.max_connections, 10);
    }
}
