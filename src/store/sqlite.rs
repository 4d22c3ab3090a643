//! SQLite store backend
//!
//! One `links` table keyed by `custom_path`. The conditional insert is
//! `INSERT OR IGNORE`; zero affected rows means the path was already taken.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreError;
use crate::models::{LinkRecord, PlatformEntry, Provenance};

use super::LinkStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.into()))?;
            }
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new link database: {}", db_path.display());
        } else {
            info!("Opened existing link database: {}", db_path.display());
        }

        // WAL allows concurrent readers with one writer
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS links (
                custom_path TEXT PRIMARY KEY NOT NULL,
                display_title TEXT NOT NULL,
                thumbnail_url TEXT NOT NULL,
                platform_links TEXT NOT NULL,
                created_at TEXT,
                requester_ip TEXT,
                geo_country TEXT,
                geo_isp TEXT,
                user_agent TEXT
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    custom_path: String,
    display_title: String,
    thumbnail_url: String,
    platform_links: String,
    created_at: Option<DateTime<Utc>>,
    requester_ip: Option<String>,
    geo_country: Option<String>,
    geo_isp: Option<String>,
    user_agent: Option<String>,
}

impl LinkRow {
    fn into_record(self) -> Result<LinkRecord, StoreError> {
        let platform_links: Vec<PlatformEntry> = serde_json::from_str(&self.platform_links)
            .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(LinkRecord {
            custom_path: self.custom_path,
            display_title: self.display_title,
            thumbnail_url: self.thumbnail_url,
            platform_links,
            provenance: Provenance {
                created_at: self.created_at,
                requester_ip: self.requester_ip,
                geo_country: self.geo_country,
                geo_isp: self.geo_isp,
                user_agent: self.user_agent,
            },
        })
    }
}

const SELECT_COLUMNS: &str = "custom_path, display_title, thumbnail_url, platform_links, \
                              created_at, requester_ip, geo_country, geo_isp, user_agent";

#[async_trait]
impl LinkStore for SqliteStore {
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM links WHERE custom_path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn get(&self, path: &str) -> Result<Option<LinkRecord>, StoreError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM links WHERE custom_path = ?"
        ))
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LinkRow::into_record).transpose()
    }

    async fn put(&self, record: LinkRecord) -> Result<(), StoreError> {
        let platform_links = serde_json::to_string(&record.platform_links)
            .map_err(|e| StoreError::Backend(e.into()))?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO links (
                custom_path, display_title, thumbnail_url, platform_links,
                created_at, requester_ip, geo_country, geo_isp, user_agent
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.custom_path)
        .bind(&record.display_title)
        .bind(&record.thumbnail_url)
        .bind(&platform_links)
        .bind(record.provenance.created_at)
        .bind(&record.provenance.requester_ip)
        .bind(&record.provenance.geo_country)
        .bind(&record.provenance.geo_isp)
        .bind(&record.provenance.user_agent)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>, StoreError> {
        let rows: Vec<LinkRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM links"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(LinkRow::into_record).collect()
    }
}
