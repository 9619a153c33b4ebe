//! SeaORM implementation of ContactRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{ContactChanges, ContactRepository, DomainError, NewContact};
use crate::models::contact::{ActiveModel, Column, Contact, Entity as ContactEntity};

/// SeaORM-based implementation of ContactRepository
pub struct SeaOrmContactRepository {
    db: DatabaseConnection,
}

impl SeaOrmContactRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::Validation(format!("{} is required", field))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl ContactRepository for SeaOrmContactRepository {
    async fn create(&self, contact: NewContact) -> Result<Contact, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            name: Set(required("name", contact.name)?),
            phone: Set(required("phone", contact.phone)?),
            email: Set(required("email", contact.email)?),
            address: Set(required("address", contact.address)?),
            facebook: Set(optional(contact.facebook)),
            instagram: Set(optional(contact.instagram)),
            image: Set(optional(contact.image)),
            favorite: Set(contact.favorite),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        tracing::debug!("Created contact {}", saved.id);

        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<Contact>, DomainError> {
        let contacts = ContactEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(contacts)
    }

    async fn get_by_id(&self, id: i32) -> Result<Contact, DomainError> {
        ContactEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)
    }

    async fn update_by_id(&self, id: i32, changes: ContactChanges) -> Result<u64, DomainError> {
        let mut query = ContactEntity::update_many().filter(Column::Id.eq(id));

        if changes.name.is_some() {
            query = query.col_expr(Column::Name, Expr::value(required("name", changes.name)?));
        }
        if changes.phone.is_some() {
            query = query.col_expr(Column::Phone, Expr::value(required("phone", changes.phone)?));
        }
        if changes.email.is_some() {
            query = query.col_expr(Column::Email, Expr::value(required("email", changes.email)?));
        }
        if changes.address.is_some() {
            query = query.col_expr(
                Column::Address,
                Expr::value(required("address", changes.address)?),
            );
        }
        // An empty social handle clears the column
        if changes.facebook.is_some() {
            query = query.col_expr(Column::Facebook, Expr::value(optional(changes.facebook)));
        }
        if changes.instagram.is_some() {
            query = query.col_expr(Column::Instagram, Expr::value(optional(changes.instagram)));
        }
        if let Some(image) = changes.image {
            query = query.col_expr(Column::Image, Expr::value(image));
        }
        if let Some(favorite) = changes.favorite {
            query = query.col_expr(Column::Favorite, Expr::value(favorite));
        }

        let result = query
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().to_rfc3339()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            tracing::debug!("Update matched no contact with id {}", id);
        }

        Ok(result.rows_affected)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError> {
        let result = ContactEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            tracing::debug!("Delete matched no contact with id {}", id);
        }

        Ok(())
    }
}
