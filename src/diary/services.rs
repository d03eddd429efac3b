use crate::diary::dto::{Averages, DaySummary};

/// Averages of the per-day sums. A day with five small meals and a day
/// with one big meal carry equal weight.
pub fn averages(daily: &[DaySummary]) -> Averages {
    if daily.is_empty() {
        return Averages::default();
    }
    let n = daily.len() as f64;
    Averages {
        calories: daily.iter().map(|d| d.calories).sum::<f64>() / n,
        protein: daily.iter().map(|d| d.protein).sum::<f64>() / n,
        carbs: daily.iter().map(|d| d.carbs).sum::<f64>() / n,
        fat: daily.iter().map(|d| d.fat).sum::<f64>() / n,
        meals_per_day: daily.iter().map(|d| d.meal_count as f64).sum::<f64>() / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn day(date: time::Date, calories: f64, meal_count: i64) -> DaySummary {
        DaySummary {
            date,
            calories,
            protein: calories / 20.0,
            carbs: calories / 10.0,
            fat: calories / 30.0,
            meal_count,
        }
    }

    #[test]
    fn empty_range_gives_zeros() {
        assert_eq!(averages(&[]), Averages::default());
    }

    #[test]
    fn single_day_averages_to_itself() {
        let days = [day(date!(2024 - 01 - 01), 1800.0, 3)];
        let avg = averages(&days);
        assert_eq!(avg.calories, 1800.0);
        assert_eq!(avg.meals_per_day, 3.0);
    }

    #[test]
    fn days_weigh_equally_regardless_of_meal_count() {
        // five 200-kcal meals on day one, one 1000-kcal meal on day two:
        // each day sums to 1000, so the average must be 1000 either way
        let days = [
            day(date!(2024 - 01 - 01), 1000.0, 5),
            day(date!(2024 - 01 - 02), 1000.0, 1),
        ];
        let avg = averages(&days);
        assert_eq!(avg.calories, 1000.0);
        assert_eq!(avg.meals_per_day, 3.0);
    }

    #[test]
    fn mixed_days() {
        let days = [
            day(date!(2024 - 02 - 10), 1500.0, 2),
            day(date!(2024 - 02 - 11), 2100.0, 4),
            day(date!(2024 - 02 - 12), 1800.0, 3),
        ];
        let avg = averages(&days);
        assert_eq!(avg.calories, 1800.0);
        assert_eq!(avg.meals_per_day, 3.0);
    }
}
