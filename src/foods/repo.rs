use sqlx::{FromRow, PgPool};

use super::dto::FoodHit;

#[derive(Debug, FromRow)]
struct CachedFood {
    external_id: String,
    name: String,
    calories: f64,
    protein_grams: f64,
    carb_grams: f64,
    fat_grams: f64,
    serving: String,
}

/// Stores successful external lookups so later searches survive an outage.
/// Keyed by the external product code; repeat lookups refresh the row.
pub async fn upsert_cached(db: &PgPool, hits: &[FoodHit]) -> anyhow::Result<()> {
    for hit in hits {
        let Some(external_id) = &hit.external_id else {
            continue;
        };
        sqlx::query(
            r#"
            INSERT INTO food_cache (external_id, name, calories, protein_grams, carb_grams, fat_grams, serving)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (external_id) DO UPDATE SET
                name = EXCLUDED.name,
                calories = EXCLUDED.calories,
                protein_grams = EXCLUDED.protein_grams,
                carb_grams = EXCLUDED.carb_grams,
                fat_grams = EXCLUDED.fat_grams,
                serving = EXCLUDED.serving,
                fetched_at = now()
            "#,
        )
        .bind(external_id)
        .bind(&hit.name)
        .bind(hit.calories)
        .bind(hit.protein_grams)
        .bind(hit.carb_grams)
        .bind(hit.fat_grams)
        .bind(&hit.serving)
        .execute(db)
        .await?;
    }
    Ok(())
}

/// Cached rows whose name matches the query, newest lookups first.
pub async fn search_cached(db: &PgPool, query: &str, limit: i64) -> anyhow::Result<Vec<FoodHit>> {
    let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
    let rows = sqlx::query_as::<_, CachedFood>(
        r#"
        SELECT external_id, name, calories, protein_grams, carb_grams, fat_grams, serving
        FROM food_cache
        WHERE name ILIKE $1
        ORDER BY fetched_at DESC
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| FoodHit {
            name: r.name,
            calories: r.calories,
            protein_grams: r.protein_grams,
            carb_grams: r.carb_grams,
            fat_grams: r.fat_grams,
            serving: r.serving,
            source: "cache",
            external_id: Some(r.external_id),
        })
        .collect())
}
