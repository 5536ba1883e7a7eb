use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A directory entry for an organization offering services.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub city: String,

    /// Image location relative to the storage root.
    pub image_path: String,

    /// Service tag name -> description/value. Only the keys take part in search ranking.
    pub services: Json,
    /// Free-form extra fields shown on the resource page.
    pub dynamic_data: Json,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Editable attributes of a resource, already normalised by the caller.
#[derive(Debug, Clone)]
pub struct ResourceFields {
    pub title: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub city: String,
    pub services: Json,
    pub dynamic_data: Json,
}

impl Model {
    /// The service tags this resource offers (keys of `services`).
    pub fn service_tags(&self) -> HashSet<&str> {
        match &self.services {
            Json::Object(map) => map.keys().map(String::as_str).collect(),
            _ => HashSet::new(),
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        fields: ResourceFields,
        image_path: &str,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let resource = ActiveModel {
            title: Set(fields.title),
            address: Set(fields.address),
            phone: Set(fields.phone),
            website: Set(fields.website),
            city: Set(fields.city),
            image_path: Set(image_path.to_owned()),
            services: Set(fields.services),
            dynamic_data: Set(fields.dynamic_data),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        resource.insert(db).await
    }

    /// Overwrites every editable field. The image only changes when `image_path` is given.
    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        fields: ResourceFields,
        image_path: Option<String>,
    ) -> Result<Self, DbErr> {
        let mut resource = ActiveModel {
            id: Set(id),
            title: Set(fields.title),
            address: Set(fields.address),
            phone: Set(fields.phone),
            website: Set(fields.website),
            city: Set(fields.city),
            services: Set(fields.services),
            dynamic_data: Set(fields.dynamic_data),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Some(path) = image_path {
            resource.image_path = Set(path);
        }

        resource.update(db).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// All resources in `city`, or every resource when `city` is `None`.
    ///
    /// Rows come back in insertion order so that ties in search ranking are
    /// broken the same way on every request.
    pub async fn find_by_city(
        db: &DatabaseConnection,
        city: Option<&str>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = Entity::find();
        if let Some(city) = city {
            query = query.filter(Column::City.eq(city));
        }
        query.order_by_asc(Column::Id).all(db).await
    }
}
