//! Member Repository

use shared::models::{MailChimpEntity, MailChimpMember, MemberAttributes};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::{
    RepoError, RepoResult, Repository, columns, new_id, now_millis, push_attribute_assignments,
    push_attribute_values, read_attributes,
};

const TABLE: &str = "mailchimp_member";

/// Conjunction of optional lookup keys; an empty filter matches any member
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFilter {
    pub member_id: Option<String>,
    pub list_id: Option<String>,
    pub mail_chimp_id: Option<String>,
}

impl MemberFilter {
    /// Member `member_id` belonging to list `list_id`
    pub fn in_list(member_id: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            member_id: Some(member_id.into()),
            list_id: Some(list_id.into()),
            mail_chimp_id: None,
        }
    }
}

#[derive(Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> RepoResult<MailChimpMember> {
        let mut attributes = MemberAttributes::default();
        attributes.fill(&read_attributes(row, MemberAttributes::FIELDS)?);

        Ok(MailChimpMember::restore(
            row.try_get("member_id")?,
            row.try_get("mail_chimp_id")?,
            row.try_get("list_id")?,
            attributes,
        ))
    }

    /// Members of a list, oldest first
    pub async fn find_by_list(&self, list_id: &str) -> RepoResult<Vec<MailChimpMember>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT member_id, mail_chimp_id, list_id, {} FROM {TABLE} WHERE list_id = ",
            columns(MemberAttributes::FIELDS)
        ));
        builder.push_bind(list_id.to_string());
        builder.push(" ORDER BY created_at, member_id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::from_row).collect()
    }
}

impl Repository<MailChimpMember> for MemberRepository {
    type Filter = MemberFilter;

    async fn create(&self, member: &mut MailChimpMember) -> RepoResult<()> {
        let list_id = member
            .list_id()
            .map(str::to_string)
            .ok_or_else(|| RepoError::Validation("Member must be assigned to a list".into()))?;
        let member_id = member.ensure_id(new_id).to_string();
        let now = now_millis();

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {TABLE} (member_id, mail_chimp_id, list_id, {}, created_at, updated_at) VALUES (",
            columns(MemberAttributes::FIELDS)
        ));
        builder.push_bind(member_id.clone());
        builder.push(", ").push_bind(member.mail_chimp_id().map(str::to_string));
        builder.push(", ").push_bind(list_id.clone());
        push_attribute_values(&mut builder, member.attributes.iter());
        builder.push(", ").push_bind(now);
        builder.push(", ").push_bind(now);
        builder.push(")");

        builder.build().execute(&self.pool).await?;
        tracing::debug!(member_id = %member_id, list_id = %list_id, "Member stored");
        Ok(())
    }

    async fn find(&self, id: &str) -> RepoResult<Option<MailChimpMember>> {
        let filter = MemberFilter {
            member_id: Some(id.to_string()),
            ..Default::default()
        };
        self.find_one_by(&filter).await
    }

    async fn find_one_by(&self, filter: &MemberFilter) -> RepoResult<Option<MailChimpMember>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT member_id, mail_chimp_id, list_id, {} FROM {TABLE} WHERE 1 = 1",
            columns(MemberAttributes::FIELDS)
        ));
        let keys = [
            ("member_id", &filter.member_id),
            ("list_id", &filter.list_id),
            ("mail_chimp_id", &filter.mail_chimp_id),
        ];
        for (column, value) in keys {
            if let Some(value) = value {
                builder
                    .push(" AND ")
                    .push(column)
                    .push(" = ")
                    .push_bind(value.clone());
            }
        }
        builder.push(" LIMIT 1");

        builder
            .build()
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn update(&self, member: &MailChimpMember) -> RepoResult<()> {
        let member_id = member
            .id()
            .ok_or_else(|| RepoError::Validation("Cannot update a member that was never stored".into()))?;

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {TABLE} SET updated_at = "));
        builder.push_bind(now_millis());
        builder.push(", mail_chimp_id = ").push_bind(member.mail_chimp_id().map(str::to_string));
        push_attribute_assignments(&mut builder, member.attributes.iter());
        builder.push(" WHERE member_id = ").push_bind(member_id.to_string());

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("MailChimpMember {member_id}")));
        }
        Ok(())
    }

    async fn delete(&self, member: &MailChimpMember) -> RepoResult<bool> {
        let Some(member_id) = member.id() else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM mailchimp_member WHERE member_id = ?")
            .bind(member_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
