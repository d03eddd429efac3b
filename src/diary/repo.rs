use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::diary::dto::{DaySummary, MealTypeBreakdown, Totals, TopFood};

/// One logged food item. Immutable once written; rollups only ever grow.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub date: Date,
    pub food_description: String,
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: Option<f64>,
    pub sugar_grams: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub quantity: f64,
    pub unit: String,
    pub confidence: f64,
    pub meal_type: String,
    pub source: String,
    pub external_id: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Fields for a new entry, already validated by the handler.
#[derive(Debug)]
pub struct NewEntry {
    pub date: Date,
    pub food_description: String,
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: Option<f64>,
    pub sugar_grams: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub quantity: f64,
    pub unit: String,
    pub confidence: f64,
    pub meal_type: String,
    pub source: String,
    pub external_id: Option<String>,
}

/// Inserts the entry and bumps the daily rollup in one transaction. The
/// rollup update is a single increment-or-insert statement, so concurrent
/// adds for the same (user, date) cannot lose updates.
pub async fn insert_entry(db: &PgPool, user_id: Uuid, entry: &NewEntry) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;

    sqlx::query(
        r#"
        INSERT INTO food_entries
            (user_id, date, food_description, calories, protein_grams, carb_grams, fat_grams,
             fiber_grams, sugar_grams, sodium_mg, quantity, unit, confidence, meal_type, source, external_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(user_id)
    .bind(entry.date)
    .bind(&entry.food_description)
    .bind(entry.calories)
    .bind(entry.protein_grams)
    .bind(entry.carb_grams)
    .bind(entry.fat_grams)
    .bind(entry.fiber_grams)
    .bind(entry.sugar_grams)
    .bind(entry.sodium_mg)
    .bind(entry.quantity)
    .bind(&entry.unit)
    .bind(entry.confidence)
    .bind(&entry.meal_type)
    .bind(&entry.source)
    .bind(&entry.external_id)
    .execute(&mut *tx)
    .await
    .context("insert food entry")?;

    sqlx::query(
        r#"
        INSERT INTO daily_nutrition (user_id, date, total_calories, total_protein, total_carbs, total_fat)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, date) DO UPDATE SET
            total_calories = daily_nutrition.total_calories + EXCLUDED.total_calories,
            total_protein  = daily_nutrition.total_protein  + EXCLUDED.total_protein,
            total_carbs    = daily_nutrition.total_carbs    + EXCLUDED.total_carbs,
            total_fat      = daily_nutrition.total_fat      + EXCLUDED.total_fat,
            updated_at     = now()
        "#,
    )
    .bind(user_id)
    .bind(entry.date)
    .bind(entry.calories)
    .bind(entry.protein_grams)
    .bind(entry.carb_grams)
    .bind(entry.fat_grams)
    .execute(&mut *tx)
    .await
    .context("upsert daily rollup")?;

    tx.commit().await.context("commit tx")?;
    Ok(())
}

/// Rollup for one day; zeros when no entry exists yet.
pub async fn daily_totals(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Totals> {
    #[derive(FromRow)]
    struct Row {
        total_calories: f64,
        total_protein: f64,
        total_carbs: f64,
        total_fat: f64,
    }

    let row = sqlx::query_as::<_, Row>(
        r#"
        SELECT total_calories, total_protein, total_carbs, total_fat
        FROM daily_nutrition
        WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await?;

    Ok(row
        .map(|r| Totals {
            calories: r.total_calories,
            protein: r.total_protein,
            carbs: r.total_carbs,
            fat: r.total_fat,
        })
        .unwrap_or_default())
}

/// Entries for one day, most recent first.
pub async fn entries_for_day(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<FoodEntry>> {
    let rows = sqlx::query_as::<_, FoodEntry>(
        r#"
        SELECT id, user_id, date, food_description, calories, protein_grams, carb_grams, fat_grams,
               fiber_grams, sugar_grams, sodium_mg, quantity, unit, confidence, meal_type, source,
               external_id, created_at
        FROM food_entries
        WHERE user_id = $1 AND date = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Per-day sums over the inclusive range, ascending by date. Days with no
/// entries produce no row.
pub async fn per_day_summaries(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<DaySummary>> {
    let rows = sqlx::query_as::<_, DaySummary>(
        r#"
        SELECT date,
               COALESCE(SUM(calories), 0)      AS calories,
               COALESCE(SUM(protein_grams), 0) AS protein,
               COALESCE(SUM(carb_grams), 0)    AS carbs,
               COALESCE(SUM(fat_grams), 0)     AS fat,
               COUNT(*)                        AS meal_count
        FROM food_entries
        WHERE user_id = $1 AND date BETWEEN $2 AND $3
        GROUP BY date
        ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Ten most frequently logged food names with their average calorie value.
pub async fn top_foods(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<TopFood>> {
    let rows = sqlx::query_as::<_, TopFood>(
        r#"
        SELECT food_description,
               COUNT(*)                   AS times_logged,
               COALESCE(AVG(calories), 0) AS avg_calories
        FROM food_entries
        WHERE user_id = $1 AND date BETWEEN $2 AND $3
        GROUP BY food_description
        ORDER BY times_logged DESC, food_description ASC
        LIMIT 10
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn meal_type_breakdown(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<MealTypeBreakdown>> {
    let rows = sqlx::query_as::<_, MealTypeBreakdown>(
        r#"
        SELECT meal_type,
               COUNT(*)                   AS entry_count,
               COALESCE(SUM(calories), 0) AS total_calories
        FROM food_entries
        WHERE user_id = $1 AND date BETWEEN $2 AND $3
        GROUP BY meal_type
        ORDER BY entry_count DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn add_water(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    amount_ml: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO water_intake (user_id, date, amount_ml)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(amount_ml)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn water_total(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<f64> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(amount_ml), 0)
        FROM water_intake
        WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(db)
    .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;
    use time::macros::date;

    fn rice_bowl(date: Date) -> NewEntry {
        NewEntry {
            date,
            food_description: "Rice bowl".into(),
            calories: 300.0,
            protein_grams: 15.0,
            carb_grams: 35.0,
            fat_grams: 12.0,
            fiber_grams: None,
            sugar_grams: None,
            sodium_mg: None,
            quantity: 1.0,
            unit: "serving".into(),
            confidence: 0.75,
            meal_type: "lunch".into(),
            source: "manual".into(),
            external_id: None,
        }
    }

    #[sqlx::test]
    async fn untouched_day_reads_as_zeros(db: PgPool) -> anyhow::Result<()> {
        let user = User::create(&db, "zeros@example.com", "hash").await?;
        let totals = daily_totals(&db, user.id, date!(2024 - 01 - 01)).await?;
        assert_eq!(totals, Totals::default());
        assert!(entries_for_day(&db, user.id, date!(2024 - 01 - 01))
            .await?
            .is_empty());
        Ok(())
    }

    #[sqlx::test]
    async fn double_add_reflects_in_totals_and_entries(db: PgPool) -> anyhow::Result<()> {
        let user = User::create(&db, "double@example.com", "hash").await?;
        let day = date!(2024 - 01 - 01);

        insert_entry(&db, user.id, &rice_bowl(day)).await?;
        insert_entry(&db, user.id, &rice_bowl(day)).await?;

        let totals = daily_totals(&db, user.id, day).await?;
        assert_eq!(totals.calories, 600.0);
        assert_eq!(totals.protein, 30.0);
        assert_eq!(totals.carbs, 70.0);
        assert_eq!(totals.fat, 24.0);

        let entries = entries_for_day(&db, user.id, day).await?;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.food_description == "Rice bowl"));
        Ok(())
    }

    #[sqlx::test]
    async fn concurrent_adds_do_not_lose_updates(db: PgPool) -> anyhow::Result<()> {
        let user = User::create(&db, "concurrent@example.com", "hash").await?;
        let day = date!(2024 - 02 - 02);

        let first = rice_bowl(day);
        let mut second = rice_bowl(day);
        second.food_description = "Protein shake".into();
        second.calories = 200.0;
        second.protein_grams = 30.0;
        second.carb_grams = 10.0;
        second.fat_grams = 4.0;

        let (a, b) = tokio::join!(
            insert_entry(&db, user.id, &first),
            insert_entry(&db, user.id, &second),
        );
        a?;
        b?;

        let totals = daily_totals(&db, user.id, day).await?;
        assert_eq!(totals.calories, 500.0);
        assert_eq!(totals.protein, 45.0);
        assert_eq!(totals.carbs, 45.0);
        assert_eq!(totals.fat, 16.0);
        assert_eq!(entries_for_day(&db, user.id, day).await?.len(), 2);
        Ok(())
    }

    #[sqlx::test]
    async fn rollups_are_scoped_per_user_and_date(db: PgPool) -> anyhow::Result<()> {
        let alice = User::create(&db, "alice@example.com", "hash").await?;
        let bob = User::create(&db, "bob@example.com", "hash").await?;
        let day = date!(2024 - 03 - 03);

        insert_entry(&db, alice.id, &rice_bowl(day)).await?;
        insert_entry(&db, bob.id, &rice_bowl(day)).await?;
        insert_entry(&db, alice.id, &rice_bowl(date!(2024 - 03 - 04))).await?;

        assert_eq!(daily_totals(&db, alice.id, day).await?.calories, 300.0);
        assert_eq!(daily_totals(&db, bob.id, day).await?.calories, 300.0);
        assert_eq!(
            daily_totals(&db, alice.id, date!(2024 - 03 - 04)).await?.calories,
            300.0
        );
        Ok(())
    }
}
