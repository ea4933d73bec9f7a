use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder,
    Set, TransactionTrait,
};

use crate::{
    entities::{movie, user},
    error::AppResult,
    password,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdminOutcome {
    Created,
    Updated,
}

#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn list_movies(&self) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?;
        Ok(movies)
    }

    pub async fn count_movies(&self) -> AppResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    pub async fn find_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create_movie(&self, title: &str, year: &str) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(title.to_string()),
            year: Set(year.to_string()),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn update_movie(
        &self,
        movie: movie::Model,
        title: &str,
        year: &str,
    ) -> AppResult<movie::Model> {
        let mut active: movie::ActiveModel = movie.into();
        active.title = Set(title.to_string());
        active.year = Set(year.to_string());
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_movie(&self, movie: movie::Model) -> AppResult<()> {
        movie.delete(&self.db).await?;
        Ok(())
    }

    /// Insert all fixtures or none of them.
    pub async fn seed_movies(&self, movies: &[(&str, &str)]) -> AppResult<()> {
        let txn = self.db.begin().await?;

        for (title, year) in movies {
            let model = movie::ActiveModel {
                id: Default::default(),
                title: Set(title.to_string()),
                year: Set(year.to_string()),
            };
            movie::Entity::insert(model).exec(&txn).await?;
        }

        txn.commit().await?;

        Ok(())
    }

    /// The admin account: the login flow and the `admin` command only ever use the first row.
    pub async fn first_user(&self) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find().order_by_asc(user::Column::Id).one(&self.db).await?)
    }

    pub async fn find_user(&self, id: i32) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn count_users(&self) -> AppResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    pub async fn create_user(
        &self,
        name: &str,
        username: &str,
        password: &str,
    ) -> AppResult<user::Model> {
        let password_hash = hash_blocking(password).await?;
        let model = user::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(Some(password_hash)),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn rename_user(&self, user: user::Model, name: &str) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = user.into();
        active.name = Set(name.to_string());
        Ok(active.update(&self.db).await?)
    }

    /// Point the singleton admin at new credentials, creating it as "Admin" if absent.
    pub async fn upsert_admin(&self, username: &str, password: &str) -> AppResult<AdminOutcome> {
        let Some(existing) = self.first_user().await? else {
            self.create_user("Admin", username, password).await?;
            return Ok(AdminOutcome::Created);
        };

        let password_hash = hash_blocking(password).await?;
        let mut active: user::ActiveModel = existing.into();
        active.username = Set(username.to_string());
        active.password_hash = Set(Some(password_hash));
        active.update(&self.db).await?;

        Ok(AdminOutcome::Updated)
    }

    /// Returns the user only when both the login name and the password match.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<user::Model>> {
        let Some(user) = self.first_user().await? else {
            return Ok(None);
        };
        if user.username != username {
            return Ok(None);
        }
        let Some(hash) = user.password_hash.clone() else {
            return Ok(None);
        };

        let raw = password.to_string();
        let valid =
            tokio::task::spawn_blocking(move || password::verify_password(&raw, &hash)).await?;

        Ok(valid.then_some(user))
    }
}

async fn hash_blocking(password: &str) -> AppResult<String> {
    let raw = password.to_string();
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&raw)).await??;
    Ok(hash)
}
