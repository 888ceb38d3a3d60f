use crate::domain::{models::restaurant::{Restaurant, Table}, ports::RestaurantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRestaurantRepo {
    pool: PgPool,
}

impl PostgresRestaurantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantRepository for PostgresRestaurantRepo {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "SELECT id, name, slug, open_time, close_time, created_at FROM restaurants WHERE slug = $1",
        )
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let Some(mut restaurant) = restaurant else {
            return Ok(None);
        };

        restaurant.tables = sqlx::query_as::<_, Table>(
            "SELECT id, restaurant_id, seats FROM restaurant_tables WHERE restaurant_id = $1 ORDER BY seats ASC, id ASC",
        )
            .bind(&restaurant.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Some(restaurant))
    }
}
