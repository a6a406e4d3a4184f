//! SurrealDB implementation of [`MediaStore`].

use brickvest_core::error::CoreResult;
use brickvest_core::models::media::{
    NewPropertyDocument, NewPropertyImage, PropertyDocument, PropertyImage,
};
use brickvest_core::storage::MediaStore;
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{SurrealStorage, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ImageRow {
    property_id: String,
    image_url: String,
    caption: Option<String>,
    display_order: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ImageRowWithId {
    record_id: String,
    property_id: String,
    image_url: String,
    caption: Option<String>,
    display_order: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct DocumentRow {
    property_id: String,
    title: String,
    document_url: String,
    document_type: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct DocumentRowWithId {
    record_id: String,
    property_id: String,
    title: String,
    document_url: String,
    document_type: String,
    created_at: DateTime<Utc>,
}

impl ImageRow {
    fn into_image(self, id: Uuid) -> Result<PropertyImage, DbError> {
        Ok(PropertyImage {
            id,
            property_id: parse_uuid(&self.property_id, "image property")?,
            image_url: self.image_url,
            caption: self.caption,
            display_order: self.display_order as i32,
            created_at: self.created_at,
        })
    }
}

impl ImageRowWithId {
    fn try_into_image(self) -> Result<PropertyImage, DbError> {
        let id = parse_uuid(&self.record_id, "image")?;
        let row = ImageRow {
            property_id: self.property_id,
            image_url: self.image_url,
            caption: self.caption,
            display_order: self.display_order,
            created_at: self.created_at,
        };
        row.into_image(id)
    }
}

impl DocumentRow {
    fn into_document(self, id: Uuid) -> Result<PropertyDocument, DbError> {
        Ok(PropertyDocument {
            id,
            property_id: parse_uuid(&self.property_id, "document property")?,
            title: self.title,
            document_url: self.document_url,
            document_type: self.document_type,
            created_at: self.created_at,
        })
    }
}

impl DocumentRowWithId {
    fn try_into_document(self) -> Result<PropertyDocument, DbError> {
        let id = parse_uuid(&self.record_id, "document")?;
        let row = DocumentRow {
            property_id: self.property_id,
            title: self.title,
            document_url: self.document_url,
            document_type: self.document_type,
            created_at: self.created_at,
        };
        row.into_document(id)
    }
}

impl<C: Connection> MediaStore for SurrealStorage<C> {
    async fn add_property_image(&self, input: NewPropertyImage) -> CoreResult<PropertyImage> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db()
            .query(
                "CREATE type::record('property_image', $id) SET \
                 property_id = $property_id, \
                 image_url = $image_url, \
                 caption = $caption, \
                 display_order = $display_order",
            )
            .bind(("id", id_str.clone()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("image_url", input.image_url))
            .bind(("caption", input.caption))
            .bind(("display_order", i64::from(input.display_order)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ImageRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "property_image".into(),
            id: id_str,
        })?;

        Ok(row.into_image(id)?)
    }

    async fn get_property_images(&self, property_id: Uuid) -> CoreResult<Vec<PropertyImage>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property_image \
                 WHERE property_id = $property_id \
                 ORDER BY display_order ASC",
            )
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRowWithId> = result.take(0).map_err(DbError::from)?;
        let images = rows
            .into_iter()
            .map(|row| row.try_into_image())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(images)
    }

    async fn delete_property_image(&self, id: Uuid) -> CoreResult<()> {
        self.db()
            .query("DELETE type::record('property_image', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;
        Ok(())
    }

    async fn add_property_document(
        &self,
        input: NewPropertyDocument,
    ) -> CoreResult<PropertyDocument> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db()
            .query(
                "CREATE type::record('property_document', $id) SET \
                 property_id = $property_id, \
                 title = $title, \
                 document_url = $document_url, \
                 document_type = $document_type",
            )
            .bind(("id", id_str.clone()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("title", input.title))
            .bind(("document_url", input.document_url))
            .bind(("document_type", input.document_type))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "property_document".into(),
            id: id_str,
        })?;

        Ok(row.into_document(id)?)
    }

    async fn get_property_documents(
        &self,
        property_id: Uuid,
    ) -> CoreResult<Vec<PropertyDocument>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property_document \
                 WHERE property_id = $property_id \
                 ORDER BY created_at ASC",
            )
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRowWithId> = result.take(0).map_err(DbError::from)?;
        let documents = rows
            .into_iter()
            .map(|row| row.try_into_document())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(documents)
    }

    async fn delete_property_document(&self, id: Uuid) -> CoreResult<()> {
        self.db()
            .query("DELETE type::record('property_document', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;
        Ok(())
    }
}
