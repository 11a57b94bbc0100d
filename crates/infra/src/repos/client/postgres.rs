use super::IClientRepo;
use salon_notifier_domain::{Client, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresClientRepo {
    pool: PgPool,
}

impl PostgresClientRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRaw {
    client_uid: Uuid,
    salon_uid: Uuid,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
}

impl From<ClientRaw> for Client {
    fn from(raw: ClientRaw) -> Self {
        Self {
            id: raw.client_uid.into(),
            salon_id: raw.salon_uid.into(),
            first_name: raw.first_name,
            last_name: raw.last_name,
            email: raw.email,
            phone: raw.phone,
        }
    }
}

#[async_trait::async_trait]
impl IClientRepo for PostgresClientRepo {
    async fn insert(&self, client: &Client) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients(client_uid, salon_uid, first_name, last_name, email, phone)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(client.id.inner_ref())
        .bind(client.salon_id.inner_ref())
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert client: {:?}. DB returned error: {:?}",
                client, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, client_id: &ID) -> Option<Client> {
        let raw: ClientRaw = sqlx::query_as(
            r#"
            SELECT * FROM clients
            WHERE client_uid = $1
            "#,
        )
        .bind(client_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find client with id: {} failed. DB returned error: {:?}",
                client_id, e
            );
            e
        })
        .ok()?;
        Some(raw.into())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Vec<Client>> {
        let rows: Vec<ClientRaw> = sqlx::query_as(
            r#"
            SELECT * FROM clients
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }
}
