//! Seed the car inventory with a sample catalogue.
//!
//! Uses the same configuration as the server. Cars already listed (same
//! make, model and year) are skipped, so the tool can be rerun safely.

use car_advisor::config::Settings;
use car_advisor::models::CreateCarRequest;
use car_advisor::services::PostgresClient;
use tracing::{error, info};

#[allow(clippy::too_many_arguments)]
fn car(
    make: &str,
    model: &str,
    year: i32,
    body_type: &str,
    fuel_type: &str,
    transmission: &str,
    engine_size: f64,
    horsepower: i32,
    price: f64,
    description: &str,
    features: &str,
) -> CreateCarRequest {
    CreateCarRequest {
        make: make.to_string(),
        model: model.to_string(),
        year,
        body_type: body_type.to_string(),
        fuel_type: fuel_type.to_string(),
        transmission: transmission.to_string(),
        engine_size: Some(engine_size),
        horsepower: Some(horsepower),
        price: Some(price),
        description: Some(description.to_string()),
        features: Some(features.to_string()),
    }
}

fn sample_catalogue() -> Vec<CreateCarRequest> {
    vec![
        car(
            "Toyota", "Camry", 2022, "sedan", "gasoline", "automatic", 2.5, 203, 2_800_000.0,
            "Надежный седан бизнес-класса с отличной проходимостью и вместительным салоном.",
            "Круиз-контроль, кожаный салон, камера заднего вида, Bluetooth",
        ),
        car(
            "Toyota", "RAV4", 2023, "crossover", "hybrid", "automatic", 2.5, 219, 3_200_000.0,
            "Популярный кроссовер с гибридной силовой установкой и высоким уровнем комфорта.",
            "Полный привод, адаптивный круиз-контроль, камеры, беспроводная зарядка",
        ),
        car(
            "Toyota", "Land Cruiser Prado", 2021, "suv", "gasoline", "automatic", 4.0, 272, 4_500_000.0,
            "Внедорожник премиум-класса с отличной проходимостью и комфортным салоном.",
            "Пневмоподвеска, центральный замок, климат-контроль, подогрев сидений",
        ),
        car(
            "BMW", "X5", 2023, "suv", "gasoline", "automatic", 3.0, 340, 6_500_000.0,
            "Премиальный внедорожник с отличной динамикой и роскошным интерьером.",
            "Система полного привода xDrive, адаптивная подвеска, панорамная крыша",
        ),
        car(
            "BMW", "3 Series", 2022, "sedan", "gasoline", "automatic", 2.0, 184, 3_000_000.0,
            "Спортивный седан с отличной управляемостью и современным интерьером.",
            "Система iDrive, подогрев руля, датчики света и дождя, парктроник",
        ),
        car(
            "Mercedes-Benz", "E-Class", 2022, "sedan", "gasoline", "automatic", 2.0, 258, 5_200_000.0,
            "Бизнес-седан премиум-класса с передовыми технологиями и комфортным салоном.",
            "COMAND, подогрев сидений, ароматизатор воздуха, массаж сидений",
        ),
        car(
            "Mercedes-Benz", "GLC", 2023, "crossover", "gasoline", "automatic", 2.0, 258, 4_800_000.0,
            "Компактный кроссовер премиум-класса с отличной динамикой и вместительным салоном.",
            "4MATIC, COMAND, панорамная крыша, адаптивный круиз-контроль",
        ),
        car(
            "Honda", "CR-V", 2022, "crossover", "gasoline", "automatic", 1.5, 190, 2_600_000.0,
            "Надежный кроссовер с отличной вместимостью и экономичным двигателем.",
            "Honda Sensing, Apple CarPlay, Android Auto, камера заднего вида",
        ),
        car(
            "Honda", "Accord", 2021, "sedan", "gasoline", "automatic", 1.5, 192, 2_400_000.0,
            "Комфортный седан с отличной шумоизоляцией и современным интерьером.",
            "Honda Sensing, беспроводная зарядка, подогрев сидений, климат-контроль",
        ),
        car(
            "Kia", "Sportage", 2023, "crossover", "gasoline", "automatic", 1.6, 200, 2_200_000.0,
            "Современный кроссовер с привлекательным дизайном и богатой комплектацией.",
            "Панорамная крыша, беспроводная зарядка, подогрев руля, датчики света",
        ),
        car(
            "Kia", "Cerato", 2022, "sedan", "gasoline", "automatic", 1.6, 123, 1_800_000.0,
            "Компактный седан с отличным соотношением цены и качества.",
            "Apple CarPlay, Android Auto, камера заднего вида, климат-контроль",
        ),
        car(
            "Hyundai", "Tucson", 2023, "crossover", "gasoline", "automatic", 1.6, 180, 2_300_000.0,
            "Современный кроссовер с передовыми технологиями и стильным дизайном.",
            "SmartSense, панорамная крыша, беспроводная зарядка, подогрев сидений",
        ),
        car(
            "Hyundai", "Solaris", 2022, "sedan", "gasoline", "manual", 1.4, 100, 1_200_000.0,
            "Экономичный седан с просторным салоном и надежным двигателем.",
            "Bluetooth, USB, кондиционер, электростеклоподъемники",
        ),
        car(
            "Marussia", "B2", 2018, "coupe", "gasoline", "manual", 3.8, 300, 8_000_000.0,
            "Первый российский суперкар с кузовом из углепластика и спортивной подвеской.",
            "Карбоновый обвес, спортивная подвеска, кожаный салон, аудиосистема",
        ),
        car(
            "Koenigsegg", "CC850", 2022, "coupe", "gasoline", "manual", 5.0, 1060, 40_000_000.0,
            "Гиперкар с атмосферным двигателем V8 и ручной коробкой передач.",
            "Carbon fiber body, racing seats, advanced aerodynamics, premium audio",
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let settings = Settings::load()?;
    let postgres = PostgresClient::from_settings(&settings.database).await?;

    let catalogue = sample_catalogue();
    let mut added = 0usize;

    for car in &catalogue {
        if postgres.car_exists(&car.make, &car.model, car.year).await? {
            info!("Skipping {} {} {}, already listed", car.make, car.model, car.year);
            continue;
        }

        match postgres.create_car(car).await {
            Ok(created) => {
                info!("Added {} {} {} (id {})", created.make, created.model, created.year, created.id);
                added += 1;
            }
            Err(e) => error!("Failed to add {} {}: {}", car.make, car.model, e),
        }
    }

    let total = postgres.count_cars().await?;
    info!("Added {} of {} sample cars, inventory now holds {}", added, catalogue.len(), total);

    Ok(())
}
