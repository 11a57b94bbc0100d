mod inmemory;
mod postgres;

pub use inmemory::InMemorySalonRepo;
pub use postgres::PostgresSalonRepo;
use salon_notifier_domain::{Salon, ID};

#[async_trait::async_trait]
pub trait ISalonRepo: Send + Sync {
    async fn insert(&self, salon: &Salon) -> anyhow::Result<()>;
    async fn find(&self, salon_id: &ID) -> Option<Salon>;
}

#[cfg(test)]
mod tests {
    use crate::repos::tests::create_contexts;
    use salon_notifier_domain::Salon;

    #[tokio::test]
    async fn keeps_the_salon_timezone() {
        for ctx in create_contexts().await {
            let mut salon = Salon::new("HairPlay", chrono_tz::America::Montreal);
            salon.phone = Some("+15145550100".into());
            ctx.repos.salons.insert(&salon).await.unwrap();

            let res = ctx.repos.salons.find(&salon.id).await.unwrap();
            assert_eq!(res, salon);
            assert_eq!(res.timezone, chrono_tz::America::Montreal);
        }
    }
}
