//! StorageEngine: owns the ConnectionPool, implements IErrorGroupStorage +
//! ITagCatalog, runs migrations at startup.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use triage_core::config::{IngestConfig, TriageConfig};
use triage_core::errors::{TriageResult, ValidationError};
use triage_core::identity::extract_keywords;
use triage_core::models::{
    Comment, ErrorGroup, ErrorReport, IngestOutcome, Occurrence, Tag, UserRef, View,
};
use triage_core::traits::{IErrorGroupStorage, ITagCatalog};
use triage_core::{Fingerprint, TriageError};
use triage_observability::{events, ingest_span, query_span, triage_op_span};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::group_upsert::EncodedReport;
use crate::queries::{group_crud, group_query, group_upsert, occurrence_ops, tag_ops, triage_ops};

/// The main storage engine. Owns the connection pool and provides the full
/// IErrorGroupStorage + ITagCatalog interface.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode).
    use_read_pool: bool,
    ingest: IngestConfig,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk, with default config.
    pub fn open(path: &Path) -> TriageResult<Self> {
        Self::open_with_config(path, &TriageConfig::default())
    }

    /// Open the database named by `config.storage.db_path`.
    pub fn from_config(config: &TriageConfig) -> TriageResult<Self> {
        Self::open_with_config(Path::new(&config.storage.db_path), config)
    }

    pub fn open_with_config(path: &Path, config: &TriageConfig) -> TriageResult<Self> {
        config.validate()?;
        let mut pool = ConnectionPool::open_writer(path, &config.storage)?;
        pool.writer.with_conn(|conn| migrations::run_migrations(conn).map(|_| ()))?;
        pool.open_readers(&config.storage)?;
        Ok(Self {
            pool,
            use_read_pool: true,
            ingest: config.ingest.clone(),
        })
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> TriageResult<Self> {
        Self::open_in_memory_with_config(&TriageConfig::default())
    }

    pub fn open_in_memory_with_config(config: &TriageConfig) -> TriageResult<Self> {
        config.validate()?;
        let pool = ConnectionPool::open_in_memory(&config.storage)?;
        pool.writer.with_conn(|conn| migrations::run_migrations(conn).map(|_| ()))?;
        Ok(Self {
            pool,
            use_read_pool: false,
            ingest: config.ingest.clone(),
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer.
    fn with_reader<F, T>(&self, f: F) -> TriageResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> TriageResult<T>,
    {
        match (&self.pool.readers, self.use_read_pool) {
            (Some(readers), true) => readers.with_conn(f),
            _ => self.pool.writer.with_conn(f),
        }
    }

    fn tag_label<'a>(&self, raw: &'a str) -> Result<&'a str, ValidationError> {
        Tag::validate_label(raw, self.ingest.max_tag_length)
    }
}

impl IErrorGroupStorage for StorageEngine {
    fn ingest(&self, report: &ErrorReport) -> TriageResult<IngestOutcome> {
        let span = ingest_span!(report.project, report.error_type);
        let _guard = span.enter();

        report.validate()?;
        let fingerprint = report.fingerprint();
        let keywords = extract_keywords(&report.message);
        let encoded = EncodedReport::new(report)?;
        let ingest = &self.ingest;

        let (upsert, group) = self.pool.writer.with_immediate_tx(|conn| {
            let upsert = group_upsert::upsert_group(
                conn,
                &encoded,
                &fingerprint,
                &keywords,
                ingest.max_upsert_attempts,
            )?;
            if ingest.record_occurrences {
                let retention = ingest.occurrence_retention;
                let trimmed = occurrence_ops::record(conn, &fingerprint, &encoded, retention)?;
                if trimmed > 0 {
                    debug!(fingerprint = %fingerprint, trimmed, "occurrence log trimmed");
                }
            }
            let group = group_crud::get_group_by_id(conn, &upsert.group_id)?.ok_or_else(|| {
                TriageError::GroupNotFound {
                    id: upsert.group_id.clone(),
                }
            })?;
            Ok((upsert, group))
        })?;

        if upsert.created {
            events::group_created(&group.id, fingerprint.as_str(), &group.project);
        } else {
            events::group_recurred(&group.id, fingerprint.as_str(), group.count);
        }
        if upsert.unhidden {
            events::group_unhidden(&group.id, fingerprint.as_str());
        }

        Ok(IngestOutcome {
            fingerprint,
            group_id: upsert.group_id,
            count: group.count,
            created: upsert.created,
            group,
        })
    }

    fn get_group(&self, project: &str, group_id: &str) -> TriageResult<Option<ErrorGroup>> {
        self.with_reader(|conn| group_crud::get_group(conn, project, group_id))
    }

    fn get_by_fingerprint(&self, fingerprint: &Fingerprint) -> TriageResult<Option<ErrorGroup>> {
        self.with_reader(|conn| group_crud::get_group_by_fingerprint(conn, fingerprint))
    }

    fn count_groups(&self, project: &str) -> TriageResult<usize> {
        self.with_reader(|conn| group_crud::count_groups(conn, project))
    }

    fn occurrences(
        &self,
        fingerprint: &Fingerprint,
        limit: usize,
    ) -> TriageResult<Vec<Occurrence>> {
        self.with_reader(|conn| occurrence_ops::list(conn, fingerprint, limit))
    }

    fn tag(&self, project: &str, group_id: &str, tag: &str) -> TriageResult<bool> {
        let span = triage_op_span!("tag", group_id);
        let _guard = span.enter();

        let label = self.tag_label(tag)?;
        let attached = self
            .pool
            .writer
            .with_immediate_tx(|conn| triage_ops::attach_tag(conn, project, group_id, label))?;
        if attached {
            events::tag_attached(group_id, label);
        }
        Ok(attached)
    }

    fn untag(&self, project: &str, group_id: &str, tag: &str) -> TriageResult<bool> {
        let span = triage_op_span!("untag", group_id);
        let _guard = span.enter();

        let label = self.tag_label(tag)?;
        let detached = self
            .pool
            .writer
            .with_immediate_tx(|conn| triage_ops::detach_tag(conn, project, group_id, label))?;
        if detached {
            events::tag_detached(group_id, label);
        }
        Ok(detached)
    }

    fn comment(
        &self,
        project: &str,
        group_id: &str,
        author: &UserRef,
        text: &str,
    ) -> TriageResult<Comment> {
        let span = triage_op_span!("comment", group_id);
        let _guard = span.enter();

        if text.trim().is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }
        let comment = self.pool.writer.with_immediate_tx(|conn| {
            triage_ops::add_comment(conn, project, group_id, author, text, Utc::now())
        })?;
        events::comment_added(group_id, author.as_str());
        Ok(comment)
    }

    fn claim(&self, project: &str, group_id: &str, user: &UserRef) -> TriageResult<()> {
        let span = triage_op_span!("claim", group_id);
        let _guard = span.enter();
        self.pool
            .writer
            .with_conn(|conn| triage_ops::set_claim(conn, project, group_id, Some(user)))
    }

    fn unclaim(&self, project: &str, group_id: &str) -> TriageResult<()> {
        let span = triage_op_span!("unclaim", group_id);
        let _guard = span.enter();
        self.pool
            .writer
            .with_conn(|conn| triage_ops::set_claim(conn, project, group_id, None))
    }

    fn mark_seen(&self, project: &str, group_id: &str, user: &UserRef) -> TriageResult<bool> {
        let span = triage_op_span!("mark_seen", group_id);
        let _guard = span.enter();
        self.pool
            .writer
            .with_immediate_tx(|conn| triage_ops::mark_seen(conn, project, group_id, user))
    }

    fn hide(&self, project: &str, group_id: &str, user: &UserRef) -> TriageResult<()> {
        let span = triage_op_span!("hide", group_id);
        let _guard = span.enter();
        self.pool
            .writer
            .with_conn(|conn| triage_ops::set_hidden(conn, project, group_id, Some(user)))
    }

    fn unhide(&self, project: &str, group_id: &str) -> TriageResult<()> {
        let span = triage_op_span!("unhide", group_id);
        let _guard = span.enter();
        self.pool
            .writer
            .with_conn(|conn| triage_ops::set_hidden(conn, project, group_id, None))
    }

    fn list(&self, project: &str, view: View, viewer: &UserRef) -> TriageResult<Vec<ErrorGroup>> {
        let span = query_span!(project, view);
        let _guard = span.enter();
        self.with_reader(|conn| group_query::list_view(conn, project, view, viewer))
    }

    fn search(&self, project: &str, query: &str) -> TriageResult<Vec<ErrorGroup>> {
        let span = query_span!(project, "search");
        let _guard = span.enter();
        self.with_reader(|conn| group_query::search(conn, project, query))
    }
}

impl ITagCatalog for StorageEngine {
    fn increment(&self, tag: &str) -> TriageResult<Tag> {
        let label = self.tag_label(tag)?;
        self.pool.writer.with_conn(|conn| tag_ops::increment(conn, label))
    }

    fn decrement(&self, tag: &str) -> TriageResult<Option<Tag>> {
        let label = self.tag_label(tag)?;
        self.pool.writer.with_conn(|conn| tag_ops::decrement(conn, label))
    }

    fn get_tag(&self, tag: &str) -> TriageResult<Option<Tag>> {
        self.with_reader(|conn| tag_ops::get_tag(conn, tag.trim()))
    }

    fn list_tags(&self) -> TriageResult<Vec<Tag>> {
        self.with_reader(tag_ops::list_tags)
    }
}
