use routehazard_core::model::RawPlace;
use routehazard_core::services::{PlacesQuery, PlacesService, ServiceError};
use serde::Deserialize;
use serde_json::json;

use super::{GoogleMapsClient, LatLng, read_json};

const FIELD_MASK: &str = "places.displayName,places.location,places.formattedAddress";

#[derive(Debug, Default, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    #[serde(default)]
    display_name: Option<LocalizedText>,
    #[serde(default)]
    location: Option<LatLng>,
    #[serde(default)]
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    #[serde(default)]
    text: Option<String>,
}

impl PlacesService for GoogleMapsClient {
    fn search_nearby(&self, query: &PlacesQuery) -> Result<Vec<RawPlace>, ServiceError> {
        let body = json!({
            "includedTypes": [query.category.places_type()],
            "maxResultCount": query.max_results,
            "locationRestriction": {
                "circle": {
                    "center": {
                        "latitude": query.center.y(),
                        "longitude": query.center.x(),
                    },
                    "radius": query.radius_m,
                }
            }
        });
        let response = self
            .http
            .post(&self.places_url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send();
        Ok(raw_places(read_json(response)?))
    }
}

fn raw_places(response: NearbyResponse) -> Vec<RawPlace> {
    response
        .places
        .into_iter()
        .map(|place| RawPlace {
            name: place.display_name.and_then(|n| n.text),
            latitude: place.location.map(|l| l.latitude),
            longitude: place.location.map(|l| l.longitude),
            address: place.formatted_address,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_places_keep_missing_fields_empty() {
        let response: NearbyResponse = serde_json::from_str(
            r#"{
                "places": [
                    {
                        "displayName": {"text": "City Hospital", "languageCode": "en"},
                        "location": {"latitude": 12.98, "longitude": 77.6},
                        "formattedAddress": "1 Main Rd"
                    },
                    {"location": {"latitude": 12.99, "longitude": 77.61}}
                ]
            }"#,
        )
        .unwrap();
        let places = raw_places(response);

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name.as_deref(), Some("City Hospital"));
        assert_eq!(places[0].address.as_deref(), Some("1 Main Rd"));
        assert_eq!(places[1].name, None);
        assert_eq!(places[1].latitude, Some(12.99));
        assert_eq!(places[1].address, None);
    }

    #[test]
    fn test_no_places_key() {
        let response: NearbyResponse = serde_json::from_str("{}").unwrap();
        assert!(raw_places(response).is_empty());
    }
}
