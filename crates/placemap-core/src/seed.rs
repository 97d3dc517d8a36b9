use anyhow::Result;
use tracing::info;

use crate::places::{NewPlace, PlaceCategory, PlaceStore};

/// Sample places around Mexico City.
pub fn sample_places() -> Vec<NewPlace> {
    vec![
        NewPlace {
            name: "Museo Frida Kahlo".to_string(),
            description: "La Casa Azul donde vivió la famosa pintora mexicana Frida Kahlo. Un museo dedicado a su vida y obra.".to_string(),
            latitude: 19.3554,
            longitude: -99.1625,
            category: PlaceCategory::Museo,
            image_url: None,
            rating: Some(4.6),
            address: Some("Londres 247, Del Carmen, Coyoacán, 04100 Ciudad de México, CDMX".to_string()),
            website: Some("https://www.museofridakahlo.org.mx/".to_string()),
            phone_number: Some("+52 55 5554 5999".to_string()),
        },
        NewPlace {
            name: "Mercado de San Juan".to_string(),
            description: "Mercado gourmet famoso por sus ingredientes exóticos y alta calidad. Un paraíso para los amantes de la gastronomía.".to_string(),
            latitude: 19.4267,
            longitude: -99.1419,
            category: PlaceCategory::Tienda,
            image_url: None,
            rating: Some(4.3),
            address: Some("Ernesto Pugibet 21, Centro Histórico, 06000 Ciudad de México, CDMX".to_string()),
            website: None,
            phone_number: Some("+52 55 5512 0575".to_string()),
        },
        NewPlace {
            name: "Parque México".to_string(),
            description: "Hermoso parque en el corazón de la Condesa con arquitectura art déco y ambiente bohemio.".to_string(),
            latitude: 19.4110,
            longitude: -99.1696,
            category: PlaceCategory::Parque,
            image_url: None,
            rating: Some(4.4),
            address: Some("Av. México, Hipódromo Condesa, 06100 Ciudad de México, CDMX".to_string()),
            website: None,
            phone_number: None,
        },
        NewPlace {
            name: "Azul Histórico".to_string(),
            description: "Restaurante de alta cocina mexicana ubicado en un hermoso patio colonial en el Centro Histórico.".to_string(),
            latitude: 19.4285,
            longitude: -99.1332,
            category: PlaceCategory::Restaurante,
            image_url: None,
            rating: Some(4.5),
            address: Some("Isabel la Católica 30, Centro Histórico, 06000 Ciudad de México, CDMX".to_string()),
            website: Some("https://azulhistorico.com/".to_string()),
            phone_number: Some("+52 55 5510 1316".to_string()),
        },
        NewPlace {
            name: "Roma Norte".to_string(),
            description: "Barrio trendy conocido por sus cafeterías, galerías de arte, boutiques y vida nocturna vibrante.".to_string(),
            latitude: 19.4145,
            longitude: -99.1565,
            category: PlaceCategory::Entretenimiento,
            image_url: None,
            rating: Some(4.7),
            address: Some("Roma Norte, Ciudad de México, CDMX".to_string()),
            website: None,
            phone_number: None,
        },
    ]
}

/// Inserts the sample places into an empty table. Returns how many were
/// written; zero when places already exist.
pub async fn run(store: &dyn PlaceStore) -> Result<usize> {
    if !store.list().await?.is_empty() {
        info!("Places already present; skipping seed");
        return Ok(0);
    }

    let mut created = 0;
    for place in sample_places() {
        let place = store.create(place).await?;
        info!(name = %place.name, "Seeded place");
        created += 1;
    }
    Ok(created)
}
