//! Versioned schema migrations.
//!
//! Each migration names its own revision and its predecessor; the registered
//! list must form a single linear chain starting at one base revision. The
//! applied head is stored in `recipez.recipez_schema_version`, and every
//! upgrade or downgrade step runs in its own transaction together with the
//! version-row update, so a failed step leaves the previous head in place.

mod versions;

pub use versions::drop_ingredient_unique::RESTORED_CONSTRAINT as RESTORED_INGREDIENT_CONSTRAINT;
pub use versions::require_recipe_image::{
    repair_recipe_image_refs, require_recipe_image, DEFAULT_RECIPE_IMAGE_URL,
};

use crate::raw_sql;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

pub const SCHEMA: &str = "recipez";
const VERSION_TABLE: &str = "recipez_schema_version";

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("broken migration chain: {0}")]
    BrokenChain(String),

    #[error("revision {0} is not part of the migration chain")]
    UnknownRevision(String),

    #[error("no migration has been applied")]
    NothingToDowngrade,

    #[error("cannot downgrade to {target}: it is not behind the current revision {current}")]
    NotBehindCurrent { target: String, current: String },
}

/// One step in the schema history.
pub trait Migration: Send + Sync {
    fn revision(&self) -> &'static str;

    /// The revision this one applies on top of; `None` for the base.
    fn down_revision(&self) -> Option<&'static str>;

    fn description(&self) -> &'static str;

    fn upgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError>;

    fn downgrade(&self, conn: &mut PgConnection) -> Result<(), MigrationError>;
}

pub struct MigrationChain {
    migrations: Vec<Box<dyn Migration>>,
}

impl std::fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.migrations.iter().map(|m| m.revision()))
            .finish()
    }
}

impl MigrationChain {
    /// Validate that `migrations`, in order, form one linear chain.
    pub fn new(migrations: Vec<Box<dyn Migration>>) -> Result<Self, MigrationError> {
        let mut seen = HashSet::new();
        let mut previous: Option<&'static str> = None;

        for (index, migration) in migrations.iter().enumerate() {
            let revision = migration.revision();
            if !seen.insert(revision) {
                return Err(MigrationError::BrokenChain(format!(
                    "revision {revision} is registered twice"
                )));
            }
            if migration.down_revision() != previous {
                return Err(MigrationError::BrokenChain(match (index, migration.down_revision()) {
                    (0, Some(parent)) => {
                        format!("base revision {revision} declares predecessor {parent}")
                    }
                    (_, None) => format!("revision {revision} declares no predecessor"),
                    (_, Some(parent)) => format!(
                        "revision {revision} revises {parent}, expected {}",
                        previous.unwrap_or("<base>")
                    ),
                }));
            }
            previous = Some(revision);
        }

        Ok(Self { migrations })
    }

    /// The chain shipped with this server.
    pub fn recipez() -> Result<Self, MigrationError> {
        Self::new(versions::all())
    }

    pub fn head(&self) -> Option<&'static str> {
        self.migrations.last().map(|m| m.revision())
    }

    pub fn history(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.iter().map(|m| m.as_ref())
    }

    fn position(&self, revision: &str) -> Result<usize, MigrationError> {
        self.migrations
            .iter()
            .position(|m| m.revision() == revision)
            .ok_or_else(|| MigrationError::UnknownRevision(revision.to_string()))
    }

    /// Revisions still to apply when the database sits at `current`.
    pub fn pending(&self, current: Option<&str>) -> Result<Vec<&dyn Migration>, MigrationError> {
        let start = match current {
            Some(rev) => self.position(rev)? + 1,
            None => 0,
        };
        Ok(self.migrations[start..].iter().map(|m| m.as_ref()).collect())
    }

    /// The applied revision, or `None` on an empty database.
    pub fn current(&self, conn: &mut PgConnection) -> Result<Option<String>, MigrationError> {
        if !raw_sql::table_exists(conn, SCHEMA, VERSION_TABLE)? {
            return Ok(None);
        }
        use crate::schema::recipez_schema_version::dsl::*;
        let version: Option<String> = recipez_schema_version
            .select(version_num)
            .first(conn)
            .optional()?;
        Ok(version)
    }

    pub fn is_at_head(&self, conn: &mut PgConnection) -> Result<bool, MigrationError> {
        Ok(self.current(conn)?.as_deref() == self.head())
    }

    /// Apply every pending migration. Returns the revisions applied.
    pub fn upgrade_to_head(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Vec<&'static str>, MigrationError> {
        match self.head() {
            Some(head) => self.upgrade_to(conn, head),
            None => Ok(Vec::new()),
        }
    }

    /// Apply pending migrations up to and including `target`.
    pub fn upgrade_to(
        &self,
        conn: &mut PgConnection,
        target: &str,
    ) -> Result<Vec<&'static str>, MigrationError> {
        let target_position = self.position(target)?;
        ensure_version_table(conn)?;
        let current = self.current(conn)?;
        let pending: Vec<&dyn Migration> = self
            .pending(current.as_deref())?
            .into_iter()
            .take_while(|m| self.position(m.revision()).is_ok_and(|p| p <= target_position))
            .collect();

        if pending.is_empty() {
            tracing::info!(current = ?current, target, "nothing to upgrade");
        }

        let mut applied = Vec::with_capacity(pending.len());
        for migration in pending {
            tracing::info!(
                revision = migration.revision(),
                down_revision = ?migration.down_revision(),
                "applying migration: {}",
                migration.description()
            );
            conn.transaction::<_, MigrationError, _>(|conn| {
                migration.upgrade(conn)?;
                set_version(conn, Some(migration.revision()))?;
                Ok(())
            })?;
            applied.push(migration.revision());
        }

        Ok(applied)
    }

    /// Revert the current head. Returns the revision that was reverted.
    pub fn downgrade_one(&self, conn: &mut PgConnection) -> Result<&'static str, MigrationError> {
        let current = self.current(conn)?.ok_or(MigrationError::NothingToDowngrade)?;
        let migration = &self.migrations[self.position(&current)?];

        tracing::info!(
            revision = migration.revision(),
            down_revision = ?migration.down_revision(),
            "reverting migration: {}",
            migration.description()
        );
        conn.transaction::<_, MigrationError, _>(|conn| {
            migration.downgrade(conn)?;
            set_version(conn, migration.down_revision())?;
            Ok(())
        })?;

        Ok(migration.revision())
    }

    /// Revert until `target` is the head, or until nothing is applied when
    /// `target` is `None`. A target at or ahead of the current revision is
    /// refused before anything is reverted.
    pub fn downgrade_to(
        &self,
        conn: &mut PgConnection,
        target: Option<&str>,
    ) -> Result<Vec<&'static str>, MigrationError> {
        if let Some(target) = target {
            let target_position = self.position(target)?;
            let current = self.current(conn)?.ok_or(MigrationError::NothingToDowngrade)?;
            if target_position >= self.position(&current)? {
                return Err(MigrationError::NotBehindCurrent {
                    target: target.to_string(),
                    current,
                });
            }
        }

        let mut reverted = Vec::new();
        while self.current(conn)?.as_deref() != target {
            reverted.push(self.downgrade_one(conn)?);
        }
        Ok(reverted)
    }
}

fn ensure_version_table(conn: &mut PgConnection) -> Result<(), MigrationError> {
    conn.batch_execute(
        "CREATE SCHEMA IF NOT EXISTS recipez;
         CREATE TABLE IF NOT EXISTS recipez.recipez_schema_version (
             version_num VARCHAR(32) NOT NULL PRIMARY KEY
         );",
    )?;
    Ok(())
}

fn set_version(conn: &mut PgConnection, revision: Option<&str>) -> Result<(), MigrationError> {
    use crate::schema::recipez_schema_version::dsl::*;
    diesel::delete(recipez_schema_version).execute(conn)?;
    if let Some(revision) = revision {
        diesel::insert_into(recipez_schema_version)
            .values(version_num.eq(revision))
            .execute(conn)?;
    }
    Ok(())
}
