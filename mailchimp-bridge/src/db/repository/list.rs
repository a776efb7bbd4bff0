//! List Repository

use shared::models::{ListAttributes, MailChimpEntity, MailChimpList};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::{
    RepoError, RepoResult, Repository, columns, new_id, now_millis, push_attribute_assignments,
    push_attribute_values, read_attributes,
};

const TABLE: &str = "mailchimp_list";

/// Lookup keys for a single list
#[derive(Debug, Clone, PartialEq)]
pub enum ListFilter {
    ListId(String),
    MailChimpId(String),
}

#[derive(Clone)]
pub struct ListRepository {
    pool: SqlitePool,
}

impl ListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn select() -> QueryBuilder<'static, Sqlite> {
        QueryBuilder::new(format!(
            "SELECT list_id, mail_chimp_id, {} FROM {TABLE}",
            columns(ListAttributes::FIELDS)
        ))
    }

    fn from_row(row: &SqliteRow) -> RepoResult<MailChimpList> {
        let mut attributes = ListAttributes::default();
        attributes.fill(&read_attributes(row, ListAttributes::FIELDS)?);

        Ok(MailChimpList::restore(
            row.try_get("list_id")?,
            row.try_get("mail_chimp_id")?,
            attributes,
        ))
    }
}

impl Repository<MailChimpList> for ListRepository {
    type Filter = ListFilter;

    async fn create(&self, list: &mut MailChimpList) -> RepoResult<()> {
        let list_id = list.ensure_id(new_id).to_string();
        let now = now_millis();

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {TABLE} (list_id, mail_chimp_id, {}, created_at, updated_at) VALUES (",
            columns(ListAttributes::FIELDS)
        ));
        builder.push_bind(list_id.clone());
        builder.push(", ").push_bind(list.mail_chimp_id().map(str::to_string));
        push_attribute_values(&mut builder, list.attributes.iter());
        builder.push(", ").push_bind(now);
        builder.push(", ").push_bind(now);
        builder.push(")");

        builder.build().execute(&self.pool).await?;
        tracing::debug!(list_id = %list_id, "List stored");
        Ok(())
    }

    async fn find(&self, id: &str) -> RepoResult<Option<MailChimpList>> {
        self.find_one_by(&ListFilter::ListId(id.to_string())).await
    }

    async fn find_one_by(&self, filter: &ListFilter) -> RepoResult<Option<MailChimpList>> {
        let mut builder = Self::select();
        match filter {
            ListFilter::ListId(id) => builder.push(" WHERE list_id = ").push_bind(id.clone()),
            ListFilter::MailChimpId(id) => builder.push(" WHERE mail_chimp_id = ").push_bind(id.clone()),
        };
        builder.push(" LIMIT 1");

        builder
            .build()
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn update(&self, list: &MailChimpList) -> RepoResult<()> {
        let list_id = list
            .id()
            .ok_or_else(|| RepoError::Validation("Cannot update a list that was never stored".into()))?;

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {TABLE} SET updated_at = "));
        builder.push_bind(now_millis());
        builder.push(", mail_chimp_id = ").push_bind(list.mail_chimp_id().map(str::to_string));
        push_attribute_assignments(&mut builder, list.attributes.iter());
        builder.push(" WHERE list_id = ").push_bind(list_id.to_string());

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("MailChimpList {list_id}")));
        }
        Ok(())
    }

    async fn delete(&self, list: &MailChimpList) -> RepoResult<bool> {
        let Some(list_id) = list.id() else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM mailchimp_list WHERE list_id = ?")
            .bind(list_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
