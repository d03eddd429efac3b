/// Picks one advisory string from a fixed rule table, first match wins.
/// Pure and total: same macros always yield the same tip.
pub fn nutrition_tip(calories: f64, protein: f64, carbs: f64, fat: f64) -> &'static str {
    let total_macros = protein * 4.0 + carbs * 4.0 + fat * 9.0;

    if total_macros == 0.0 {
        return "Add more variety to your meals for better nutrition balance.";
    }

    let protein_pct = protein * 4.0 / total_macros * 100.0;
    let carbs_pct = carbs * 4.0 / total_macros * 100.0;
    let fat_pct = fat * 9.0 / total_macros * 100.0;

    if carbs > 100.0 && fat < 10.0 {
        "High in carbohydrates and low in fats. Great for pre-workout energy, but consider pairing with a protein or fat source for better macronutrient balance."
    } else if protein > 30.0 {
        "Rich in protein — excellent for muscle recovery and satiety! This will help keep you full longer."
    } else if fat > 25.0 {
        "High fat content — great for sustained energy, but keep portions moderate if managing calories."
    } else if (20.0..=35.0).contains(&protein_pct)
        && (45.0..=65.0).contains(&carbs_pct)
        && (20.0..=35.0).contains(&fat_pct)
    {
        "Well-balanced macronutrient profile! This combination supports steady energy and satiety."
    } else if protein < 10.0 {
        "Consider adding more protein to this meal for better muscle support and satiety."
    } else if calories > 600.0 {
        "High-calorie meal — great for active days or post-workout recovery. Balance with lighter meals if needed."
    } else if calories < 200.0 {
        "Light meal option — perfect for snacking or if you're managing portion sizes."
    } else {
        "Good nutritional choice! Try to include a variety of colorful foods for optimal micronutrient intake."
    }
}
