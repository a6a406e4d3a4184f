//! SurrealDB implementation of [`PropertyStore`].

use brickvest_core::error::CoreResult;
use brickvest_core::models::property::{
    AdminUpdateProperty, NewProperty, Property, PropertyFilter,
};
use brickvest_core::seed::sample_properties;
use brickvest_core::storage::PropertyStore;
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use super::{SurrealStorage, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PropertyRow {
    title: String,
    location: String,
    city: String,
    bedrooms: i64,
    price: String,
    image_url: String,
    property_type: String,
    funding_percentage: i64,
    yearly_return: f64,
    total_return: f64,
    projected_yield: f64,
    property_code: String,
    status: String,
    filter: String,
    floor_area: Option<String>,
    year_built: Option<i64>,
    parking_spaces: Option<i64>,
    monthly_rent: Option<String>,
    service_charges: Option<String>,
    maintenance_fees: Option<String>,
    occupancy_rate: Option<f64>,
    admin_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PropertyRowWithId {
    record_id: String,
    title: String,
    location: String,
    city: String,
    bedrooms: i64,
    price: String,
    image_url: String,
    property_type: String,
    funding_percentage: i64,
    yearly_return: f64,
    total_return: f64,
    projected_yield: f64,
    property_code: String,
    status: String,
    filter: String,
    floor_area: Option<String>,
    year_built: Option<i64>,
    parking_spaces: Option<i64>,
    monthly_rent: Option<String>,
    service_charges: Option<String>,
    maintenance_fees: Option<String>,
    occupancy_rate: Option<f64>,
    admin_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_filter(s: &str) -> Result<PropertyFilter, DbError> {
    PropertyFilter::parse(s)
        .ok_or_else(|| DbError::Corrupt(format!("unknown property filter: {s}")))
}

fn to_u32(value: i64, what: &str) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|_| DbError::Corrupt(format!("negative {what}: {value}")))
}

fn to_u8(value: i64, what: &str) -> Result<u8, DbError> {
    u8::try_from(value).map_err(|_| DbError::Corrupt(format!("out-of-range {what}: {value}")))
}

impl PropertyRow {
    fn into_property(self, id: Uuid) -> Result<Property, DbError> {
        Ok(Property {
            id,
            title: self.title,
            location: self.location,
            city: self.city,
            bedrooms: to_u32(self.bedrooms, "bedroom count")?,
            price: self.price,
            image_url: self.image_url,
            property_type: self.property_type,
            funding_percentage: to_u8(self.funding_percentage, "funding percentage")?,
            yearly_return: self.yearly_return,
            total_return: self.total_return,
            projected_yield: self.projected_yield,
            property_code: self.property_code,
            status: self.status,
            filter: parse_filter(&self.filter)?,
            floor_area: self.floor_area,
            year_built: self
                .year_built
                .map(|v| to_u32(v, "year built"))
                .transpose()?,
            parking_spaces: self
                .parking_spaces
                .map(|v| to_u32(v, "parking spaces"))
                .transpose()?,
            monthly_rent: self.monthly_rent,
            service_charges: self.service_charges,
            maintenance_fees: self.maintenance_fees,
            occupancy_rate: self.occupancy_rate,
            admin_id: self
                .admin_id
                .as_deref()
                .map(|s| parse_uuid(s, "property admin"))
                .transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PropertyRowWithId {
    fn try_into_property(self) -> Result<Property, DbError> {
        let id = parse_uuid(&self.record_id, "property")?;
        let row = PropertyRow {
            title: self.title,
            location: self.location,
            city: self.city,
            bedrooms: self.bedrooms,
            price: self.price,
            image_url: self.image_url,
            property_type: self.property_type,
            funding_percentage: self.funding_percentage,
            yearly_return: self.yearly_return,
            total_return: self.total_return,
            projected_yield: self.projected_yield,
            property_code: self.property_code,
            status: self.status,
            filter: self.filter,
            floor_area: self.floor_area,
            year_built: self.year_built,
            parking_spaces: self.parking_spaces,
            monthly_rent: self.monthly_rent,
            service_charges: self.service_charges,
            maintenance_fees: self.maintenance_fees,
            occupancy_rate: self.occupancy_rate,
            admin_id: self.admin_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_property(id)
    }
}

impl<C: Connection> SurrealStorage<C> {
    async fn insert_property(&self, input: NewProperty) -> Result<Property, DbError> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db()
            .query(
                "CREATE type::record('property', $id) SET \
                 title = $title, \
                 location = $location, \
                 city = $city, \
                 bedrooms = $bedrooms, \
                 price = $price, \
                 image_url = $image_url, \
                 property_type = $property_type, \
                 funding_percentage = $funding_percentage, \
                 yearly_return = $yearly_return, \
                 total_return = $total_return, \
                 projected_yield = $projected_yield, \
                 property_code = $property_code, \
                 status = $status, \
                 filter = $filter, \
                 floor_area = $floor_area, \
                 year_built = $year_built, \
                 parking_spaces = $parking_spaces, \
                 monthly_rent = $monthly_rent, \
                 service_charges = $service_charges, \
                 maintenance_fees = $maintenance_fees, \
                 occupancy_rate = $occupancy_rate, \
                 admin_id = $admin_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("location", input.location))
            .bind(("city", input.city))
            .bind(("bedrooms", i64::from(input.bedrooms)))
            .bind(("price", input.price))
            .bind(("image_url", input.image_url))
            .bind(("property_type", input.property_type))
            .bind(("funding_percentage", i64::from(input.funding_percentage)))
            .bind(("yearly_return", input.yearly_return))
            .bind(("total_return", input.total_return))
            .bind(("projected_yield", input.projected_yield))
            .bind(("property_code", input.property_code))
            .bind(("status", input.status))
            .bind(("filter", input.filter.as_str().to_string()))
            .bind(("floor_area", input.floor_area))
            .bind(("year_built", input.year_built.map(i64::from)))
            .bind(("parking_spaces", input.parking_spaces.map(i64::from)))
            .bind(("monthly_rent", input.monthly_rent))
            .bind(("service_charges", input.service_charges))
            .bind(("maintenance_fees", input.maintenance_fees))
            .bind(("occupancy_rate", input.occupancy_rate))
            .bind(("admin_id", input.admin_id.map(|id| id.to_string())))
            .await?;

        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "property".into(),
            id: id_str,
        })?;

        row.into_property(id)
    }
}

impl<C: Connection> PropertyStore for SurrealStorage<C> {
    async fn get_properties(&self, filter: PropertyFilter) -> CoreResult<Vec<Property>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property \
                 WHERE filter = $filter \
                 ORDER BY created_at ASC",
            )
            .bind(("filter", filter.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRowWithId> = result.take(0).map_err(DbError::from)?;
        let properties = rows
            .into_iter()
            .map(|row| row.try_into_property())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(properties)
    }

    async fn get_property(&self, id: Uuid) -> CoreResult<Property> {
        let id_str = id.to_string();

        let mut result = self
            .db()
            .query("SELECT * FROM type::record('property', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "property".into(),
            id: id_str,
        })?;

        Ok(row.into_property(id)?)
    }

    async fn create_property(&self, input: NewProperty) -> CoreResult<Property> {
        Ok(self.insert_property(input).await?)
    }

    async fn initialize_properties(&self) -> CoreResult<()> {
        let mut result = self
            .db()
            .query("SELECT count() FROM property GROUP ALL")
            .await
            .map_err(DbError::from)?;

        #[derive(Debug, SurrealValue)]
        struct CountRow {
            count: i64,
        }

        let counts: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        if counts.first().map(|c| c.count).unwrap_or(0) > 0 {
            return Ok(());
        }

        let catalog = sample_properties();
        let total = catalog.len();
        for input in catalog {
            self.insert_property(input).await?;
        }
        info!(count = total, "Seeded sample property catalog");
        Ok(())
    }

    async fn get_all_properties(&self) -> CoreResult<Vec<Property>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRowWithId> = result.take(0).map_err(DbError::from)?;
        let properties = rows
            .into_iter()
            .map(|row| row.try_into_property())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(properties)
    }

    async fn update_property_by_admin(
        &self,
        id: Uuid,
        input: AdminUpdateProperty,
    ) -> CoreResult<Property> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.city.is_some() {
            sets.push("city = $city");
        }
        if input.bedrooms.is_some() {
            sets.push("bedrooms = $bedrooms");
        }
        if input.price.is_some() {
            sets.push("price = $price");
        }
        if input.image_url.is_some() {
            sets.push("image_url = $image_url");
        }
        if input.property_type.is_some() {
            sets.push("property_type = $property_type");
        }
        if input.funding_percentage.is_some() {
            sets.push("funding_percentage = $funding_percentage");
        }
        if input.yearly_return.is_some() {
            sets.push("yearly_return = $yearly_return");
        }
        if input.total_return.is_some() {
            sets.push("total_return = $total_return");
        }
        if input.projected_yield.is_some() {
            sets.push("projected_yield = $projected_yield");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.filter.is_some() {
            sets.push("filter = $filter");
        }
        if input.floor_area.is_some() {
            sets.push("floor_area = $floor_area");
        }
        if input.year_built.is_some() {
            sets.push("year_built = $year_built");
        }
        if input.parking_spaces.is_some() {
            sets.push("parking_spaces = $parking_spaces");
        }
        if input.monthly_rent.is_some() {
            sets.push("monthly_rent = $monthly_rent");
        }
        if input.service_charges.is_some() {
            sets.push("service_charges = $service_charges");
        }
        if input.maintenance_fees.is_some() {
            sets.push("maintenance_fees = $maintenance_fees");
        }
        if input.occupancy_rate.is_some() {
            sets.push("occupancy_rate = $occupancy_rate");
        }

        if sets.is_empty() {
            return self.get_property(id).await;
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('property', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db().query(&query).bind(("id", id_str.clone()));
        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(city) = input.city {
            builder = builder.bind(("city", city));
        }
        if let Some(bedrooms) = input.bedrooms {
            builder = builder.bind(("bedrooms", i64::from(bedrooms)));
        }
        if let Some(price) = input.price {
            builder = builder.bind(("price", price));
        }
        if let Some(image_url) = input.image_url {
            builder = builder.bind(("image_url", image_url));
        }
        if let Some(property_type) = input.property_type {
            builder = builder.bind(("property_type", property_type));
        }
        if let Some(funding_percentage) = input.funding_percentage {
            builder = builder.bind(("funding_percentage", i64::from(funding_percentage)));
        }
        if let Some(yearly_return) = input.yearly_return {
            builder = builder.bind(("yearly_return", yearly_return));
        }
        if let Some(total_return) = input.total_return {
            builder = builder.bind(("total_return", total_return));
        }
        if let Some(projected_yield) = input.projected_yield {
            builder = builder.bind(("projected_yield", projected_yield));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status));
        }
        if let Some(filter) = input.filter {
            builder = builder.bind(("filter", filter.as_str().to_string()));
        }
        if let Some(floor_area) = input.floor_area {
            builder = builder.bind(("floor_area", floor_area));
        }
        if let Some(year_built) = input.year_built {
            builder = builder.bind(("year_built", i64::from(year_built)));
        }
        if let Some(parking_spaces) = input.parking_spaces {
            builder = builder.bind(("parking_spaces", i64::from(parking_spaces)));
        }
        if let Some(monthly_rent) = input.monthly_rent {
            builder = builder.bind(("monthly_rent", monthly_rent));
        }
        if let Some(service_charges) = input.service_charges {
            builder = builder.bind(("service_charges", service_charges));
        }
        if let Some(maintenance_fees) = input.maintenance_fees {
            builder = builder.bind(("maintenance_fees", maintenance_fees));
        }
        if let Some(occupancy_rate) = input.occupancy_rate {
            builder = builder.bind(("occupancy_rate", occupancy_rate));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "property".into(),
            id: id_str,
        })?;

        Ok(row.into_property(id)?)
    }
}
