//! Fixed sample property catalog used by idempotent seeding.
//!
//! `Storage::initialize_properties` inserts these exactly once: if any
//! property already exists the call is a no-op, so it is safe to run
//! at every process start.

use crate::models::property::{NewProperty, PropertyFilter};

fn base(title: &str, location: &str, filter: PropertyFilter) -> NewProperty {
    NewProperty {
        title: title.into(),
        location: location.into(),
        city: "Dubai".into(),
        bedrooms: 0,
        price: String::new(),
        image_url: String::new(),
        property_type: "Balanced".into(),
        funding_percentage: 0,
        yearly_return: 0.0,
        total_return: 0.0,
        projected_yield: 0.0,
        property_code: String::new(),
        status: "Ready".into(),
        filter,
        floor_area: None,
        year_built: None,
        parking_spaces: None,
        monthly_rent: None,
        service_charges: None,
        maintenance_fees: None,
        occupancy_rate: None,
        admin_id: None,
    }
}

/// The six-property sample catalog.
pub fn sample_properties() -> Vec<NewProperty> {
    vec![
        NewProperty {
            bedrooms: 2,
            price: "AED 1,823,000".into(),
            image_url: "https://images.unsplash.com/photo-1582407947304-fd6169a9d7e0?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&h=400&q=80".into(),
            funding_percentage: 80,
            yearly_return: 10.08,
            total_return: 50.42,
            projected_yield: 5.40,
            property_code: "908".into(),
            ..base(
                "2 Bed in Princess Tower, Dubai Marina",
                "Princess Tower",
                PropertyFilter::Available,
            )
        },
        NewProperty {
            bedrooms: 1,
            price: "AED 1,867,000".into(),
            image_url: "https://images.unsplash.com/photo-1560448204-603b3fc33ddc?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&h=400&q=80".into(),
            funding_percentage: 79,
            yearly_return: 9.71,
            total_return: 48.54,
            projected_yield: 5.16,
            property_code: "2711".into(),
            status: "Rented".into(),
            ..base("1 Bed in Sky Gardens, DIFC", "Sky Gardens", PropertyFilter::Available)
        },
        NewProperty {
            bedrooms: 0,
            price: "AED 1,010,000".into(),
            image_url: "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&h=400&q=80".into(),
            property_type: "Capital Growth".into(),
            funding_percentage: 46,
            yearly_return: 9.70,
            total_return: 48.51,
            projected_yield: 5.32,
            property_code: "4112".into(),
            status: "Rented".into(),
            ..base(
                "Studio in Hartland Greens, MBR City",
                "Hartland Greens",
                PropertyFilter::Available,
            )
        },
        NewProperty {
            bedrooms: 3,
            price: "AED 2,650,000".into(),
            image_url: "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&h=400&q=80".into(),
            property_type: "Capital Growth".into(),
            funding_percentage: 100,
            yearly_return: 8.50,
            total_return: 42.50,
            projected_yield: 4.20,
            property_code: "5243".into(),
            status: "Rented".into(),
            ..base("3 Bed Townhouse, The Villa", "The Villa", PropertyFilter::Funded)
        },
        NewProperty {
            bedrooms: 2,
            price: "AED 2,100,000".into(),
            image_url: "https://images.unsplash.com/photo-1493809842364-78817add7ffb?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&h=400&q=80".into(),
            funding_percentage: 100,
            yearly_return: 10.20,
            total_return: 51.00,
            projected_yield: 5.50,
            property_code: "3651".into(),
            status: "Rented".into(),
            ..base("2 Bed in JBR, Dubai Marina", "JBR", PropertyFilter::Funded)
        },
        NewProperty {
            bedrooms: 1,
            price: "AED 1,950,000".into(),
            image_url: "https://images.unsplash.com/photo-1577495508326-19a1b3cf65b9?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&h=400&q=80".into(),
            funding_percentage: 0,
            yearly_return: 9.80,
            total_return: 49.00,
            projected_yield: 5.10,
            property_code: "7823".into(),
            status: "Exited".into(),
            ..base("1 Bed in Downtown, Burj Khalifa", "Downtown", PropertyFilter::Exited)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_entries() {
        assert_eq!(sample_properties().len(), 6);
    }

    #[test]
    fn catalog_covers_all_lifecycle_buckets() {
        let props = sample_properties();
        for filter in [
            PropertyFilter::Available,
            PropertyFilter::Funded,
            PropertyFilter::Exited,
        ] {
            assert!(props.iter().any(|p| p.filter == filter));
        }
    }
}
