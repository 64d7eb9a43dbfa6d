use super::{reminders_to_storage, IReminderRepo, OwnerReminders};
use memento_domain::{Owner, OwnerKind, Reminder, ID};
use sqlx::{types::Json, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OwnerRemindersRaw {
    owner_kind: String,
    owner_id: String,
    reminders: Json<serde_json::Value>,
}

impl OwnerRemindersRaw {
    fn into_domain(self) -> anyhow::Result<OwnerReminders> {
        let kind = self.owner_kind.parse::<OwnerKind>()?;
        let id = self.owner_id.parse::<ID>()?;
        let reminders = match self.reminders.0 {
            serde_json::Value::Array(reminders) => reminders,
            other => {
                return Err(anyhow::Error::msg(format!(
                    "Expected a list of reminders, found: {}",
                    other
                )))
            }
        };
        Ok(OwnerReminders {
            owner: Owner::new(kind, id),
            reminders,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn save(&self, owner: &Owner, reminders: &[Reminder]) -> anyhow::Result<()> {
        let values = reminders_to_storage(reminders)?;
        sqlx::query(
            r#"
            INSERT INTO owner_reminders(owner_kind, owner_id, reminders)
            VALUES($1, $2, $3)
            ON CONFLICT (owner_kind, owner_id) DO UPDATE
            SET reminders = EXCLUDED.reminders
            "#,
        )
        .bind(owner.kind().as_str())
        .bind(owner.id().as_str())
        .bind(Json(values))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<OwnerReminders>> {
        let rows = sqlx::query_as::<_, OwnerRemindersRaw>(
            r#"
            SELECT owner_kind, owner_id, reminders FROM owner_reminders
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let owner = format!("{}:{}", row.owner_kind, row.owner_id);
                match row.into_domain() {
                    Ok(list) => Some(list),
                    Err(e) => {
                        error!("Skipping stored reminders of owner: {}. Error: {}", owner, e);
                        None
                    }
                }
            })
            .collect())
    }
}
