use std::fmt::Write;

use crate::models::Car;

pub const NO_RESULTS_MESSAGE: &str = "К сожалению, я не нашел автомобилей, соответствующих вашему запросу. \
     Попробуйте изменить параметры поиска или уточнить ваш запрос.";

pub const SINGLE_MATCH_CLOSING: &str = "Это единственный автомобиль, соответствующий вашему запросу. ";

pub const MULTIPLE_MATCHES_CLOSING: &str =
    "Выберите понравившийся вариант, и я могу рассказать о нем подробнее.";

/// Descriptions are cut to this many characters
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Render the chat reply for a final list of matches.
///
/// Optional fields (engine size, horsepower, price, description) are only
/// listed when the car has them.
pub fn render_response(cars: &[Car]) -> String {
    if cars.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut response = format!(
        "Я нашел {} автомобиль(ей), которые могут вам подойти:\n\n",
        cars.len()
    );

    for (i, car) in cars.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = write_car(&mut response, i + 1, car);
    }

    if cars.len() == 1 {
        response.push_str(SINGLE_MATCH_CLOSING);
    } else {
        response.push_str(MULTIPLE_MATCHES_CLOSING);
    }

    response
}

fn write_car(out: &mut String, position: usize, car: &Car) -> std::fmt::Result {
    writeln!(out, "{}. **{} {}** ({} г.)", position, car.make, car.model, car.year)?;
    writeln!(out, "   - Тип кузова: {}", car.body_type)?;
    writeln!(out, "   - Тип топлива: {}", car.fuel_type)?;
    writeln!(out, "   - Коробка передач: {}", car.transmission)?;

    if let Some(engine_size) = car.engine_size {
        writeln!(out, "   - Объем двигателя: {} л.", format_engine_size(engine_size))?;
    }
    if let Some(horsepower) = car.horsepower {
        writeln!(out, "   - Мощность: {} л.с.", horsepower)?;
    }
    if let Some(price) = car.price {
        writeln!(out, "   - Цена: {} руб.", format_price(price))?;
    }
    if let Some(description) = car.description.as_deref().filter(|d| !d.is_empty()) {
        let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        writeln!(out, "   - Описание: {}...", preview)?;
    }

    writeln!(out)
}

/// Litres with at least one decimal: 2.0, 2.5, 1.25
fn format_engine_size(litres: f64) -> String {
    if litres.fract() == 0.0 {
        format!("{:.1}", litres)
    } else {
        format!("{}", litres)
    }
}

/// Round to whole units and group thousands with commas: 2,800,000
///
/// Halves round to even, so 2.5 renders as 2.
pub fn format_price(price: f64) -> String {
    let digits = format!("{:.0}", price.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if price.is_sign_negative() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_car(model: &str) -> Car {
        Car {
            id: 1,
            make: "Toyota".to_string(),
            model: model.to_string(),
            year: 2022,
            body_type: "sedan".to_string(),
            fuel_type: "gasoline".to_string(),
            transmission: "automatic".to_string(),
            engine_size: None,
            horsepower: None,
            price: None,
            description: None,
            features: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_results() {
        assert_eq!(render_response(&[]), NO_RESULTS_MESSAGE);
    }

    #[test]
    fn test_single_match_closing() {
        let response = render_response(&[create_test_car("Camry")]);
        assert!(response.starts_with("Я нашел 1 автомобиль(ей)"));
        assert!(response.contains("1. **Toyota Camry** (2022 г.)"));
        assert!(response.ends_with(SINGLE_MATCH_CLOSING));
        assert!(response.ends_with("вашему запросу. "));
        assert!(!response.contains(MULTIPLE_MATCHES_CLOSING));
    }

    #[test]
    fn test_multiple_matches_closing() {
        let response = render_response(&[create_test_car("Camry"), create_test_car("RAV4")]);
        assert!(response.contains("2. **Toyota RAV4**"));
        assert!(response.ends_with(MULTIPLE_MATCHES_CLOSING));
        assert!(!response.contains(SINGLE_MATCH_CLOSING));
    }

    #[test]
    fn test_optional_fields_only_when_present() {
        let bare = render_response(&[create_test_car("Camry")]);
        assert!(bare.contains("Тип кузова: sedan"));
        assert!(bare.contains("Коробка передач: automatic"));
        assert!(!bare.contains("Объем двигателя"));
        assert!(!bare.contains("Мощность"));
        assert!(!bare.contains("Цена"));
        assert!(!bare.contains("Описание"));

        let mut car = create_test_car("Camry");
        car.engine_size = Some(2.5);
        car.horsepower = Some(203);
        car.price = Some(2_800_000.0);
        let full = render_response(&[car]);
        assert!(full.contains("Объем двигателя: 2.5 л."));
        assert!(full.contains("Мощность: 203 л.с."));
        assert!(full.contains("Цена: 2,800,000 руб."));
    }

    #[test]
    fn test_description_truncated() {
        let mut car = create_test_car("Camry");
        car.description = Some("я".repeat(150));
        let response = render_response(&[car]);
        let expected = format!("Описание: {}...", "я".repeat(100));
        assert!(response.contains(&expected));
        assert!(!response.contains(&"я".repeat(101)));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0");
        assert_eq!(format_price(999.0), "999");
        assert_eq!(format_price(1_000.0), "1,000");
        assert_eq!(format_price(2_800_000.4), "2,800,000");
        assert_eq!(format_price(1_234_567.5), "1,234,568");
        assert_eq!(format_price(-1_500.0), "-1,500");
    }

    #[test]
    fn test_format_price_rounds_half_to_even() {
        assert_eq!(format_price(1_234_566.5), "1,234,566");
        assert_eq!(format_price(2.5), "2");
        assert_eq!(format_price(3.5), "4");
        assert_eq!(format_price(0.5), "0");
    }

    #[test]
    fn test_format_engine_size() {
        assert_eq!(format_engine_size(2.0), "2.0");
        assert_eq!(format_engine_size(1.6), "1.6");
    }
}
