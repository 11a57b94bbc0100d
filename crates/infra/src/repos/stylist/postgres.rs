use super::IStylistRepo;
use salon_notifier_domain::{Stylist, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresStylistRepo {
    pool: PgPool,
}

impl PostgresStylistRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StylistRaw {
    stylist_uid: Uuid,
    salon_uid: Uuid,
    name: String,
}

#[async_trait::async_trait]
impl IStylistRepo for PostgresStylistRepo {
    async fn insert(&self, stylist: &Stylist) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stylists(stylist_uid, salon_uid, name)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(stylist.id.inner_ref())
        .bind(stylist.salon_id.inner_ref())
        .bind(&stylist.name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert stylist: {:?}. DB returned error: {:?}",
                stylist, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, stylist_id: &ID) -> Option<Stylist> {
        let raw: StylistRaw = sqlx::query_as(
            r#"
            SELECT * FROM stylists
            WHERE stylist_uid = $1
            "#,
        )
        .bind(stylist_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find stylist with id: {} failed. DB returned error: {:?}",
                stylist_id, e
            );
            e
        })
        .ok()?;
        Some(Stylist {
            id: raw.stylist_uid.into(),
            salon_id: raw.salon_uid.into(),
            name: raw.name,
        })
    }
}
