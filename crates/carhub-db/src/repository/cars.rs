//! Car record operations

use sqlx::Row;
use tracing::info;

use crate::error::DbError;
use crate::models::{Car, NewCar};
use crate::repository::Database;

impl Database {
    /// Insert a new car
    pub async fn insert_car(&self, car: NewCar) -> Result<Car, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO cars (brand, model, year, color)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&car.brand)
        .bind(&car.model)
        .bind(car.year)
        .bind(&car.color)
        .fetch_one(self.pool())
        .await?;

        let id: i64 = result.get("id");

        Ok(Car {
            id,
            brand: car.brand,
            model: car.model,
            year: car.year,
            color: car.color,
        })
    }

    /// Get a car by ID
    pub async fn get_car_by_id(&self, id: i64) -> Result<Option<Car>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, brand, model, year, color
            FROM cars
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        result
            .map(|row| Car::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all cars
    pub async fn list_cars(&self) -> Result<Vec<Car>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, brand, model, year, color
            FROM cars
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| Car::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Delete a car by ID, returning the removed record if it existed.
    ///
    /// A single statement, so two racing deletes for the same ID cannot
    /// both claim the row.
    pub async fn delete_car_by_id(&self, id: i64) -> Result<Option<Car>, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM cars
            WHERE id = ?
            RETURNING id, brand, model, year, color
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        result
            .map(|row| Car::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Check if any cars exist
    pub async fn has_cars(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM cars")
            .fetch_one(self.pool())
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }

    /// Seed sample cars on first initialization.
    ///
    /// Cars have no natural unique key, so idempotence comes from only
    /// seeding into an empty table.
    pub async fn seed_cars(&self, samples: Vec<NewCar>) -> Result<(), DbError> {
        if self.has_cars().await? {
            return Ok(());
        }

        let count = samples.len();
        for car in samples {
            self.insert_car(car).await?;
        }

        info!("Seeded {} sample car(s)", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(brand: &str, model: &str) -> NewCar {
        NewCar {
            brand: brand.to_string(),
            model: model.to_string(),
            year: Some(2023),
            color: None,
        }
    }

    #[tokio::test]
    async fn test_insert_list_delete() {
        let db = Database::new_in_memory().await.unwrap();

        let car = db.insert_car(sample("Toyota", "Camry")).await.unwrap();
        db.insert_car(sample("Honda", "Civic")).await.unwrap();

        let cars = db.list_cars().await.unwrap();
        assert_eq!(cars.len(), 2);

        let deleted = db.delete_car_by_id(car.id).await.unwrap().unwrap();
        assert_eq!(deleted.brand, "Toyota");
        assert!(db.get_car_by_id(car.id).await.unwrap().is_none());

        // Only one caller can claim a row; a repeat delete gets nothing
        assert!(db.delete_car_by_id(car.id).await.unwrap().is_none());

        // Deleting a missing ID reports nothing removed
        assert!(db.delete_car_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let db = Database::new_in_memory().await.unwrap();

        db.seed_cars(vec![sample("Toyota", "Camry")]).await.unwrap();
        db.seed_cars(vec![sample("Ford", "Mustang")]).await.unwrap();

        let cars = db.list_cars().await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].brand, "Toyota");
    }
}
