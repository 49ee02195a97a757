//! An in-process [`Persistence`] implementation, used for local development
//! without a database and throughout the test suites.
//!
//! It enforces the same uniqueness and foreign key constraints as the
//! PostgreSQL schema, so constraint violations surface the same way.

use async_trait::async_trait;
use blogql_common_types::Id;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::entity::Entity;
use crate::models::{
    Blog, BlogChanges, BlogComment, BlogCommentChanges, BlogPost, BlogPostChanges, NewBlog,
    NewBlogComment, NewBlogPost, NewProfile, NewUser, Profile, ProfileChanges, User, UserChanges,
};
use crate::persistence::{EntityStore, Filter, Persistence, StoreError};

/// Rows of every entity type, each in insertion order.
#[derive(Debug, Default)]
pub struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
    blogs: Vec<Blog>,
    blog_posts: Vec<BlogPost>,
    blog_comments: Vec<BlogComment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed record, keeping its id and timestamps. Meant
    /// for fixtures that need well-known ids.
    pub async fn insert<E: MemoryRecord>(&self, record: E) -> Result<E, StoreError> {
        let mut tables = self.tables.write().await;

        if E::rows(&tables).iter().any(|row| row.id() == record.id()) {
            return Err(StoreError::Constraint(format!(
                "{} with id {:?} already exists",
                E::SCHEMA.name,
                record.id()
            )));
        }
        record.check(&tables)?;
        E::rows_mut(&mut tables).push(record.clone());

        Ok(record)
    }
}

/// Glue between an entity type and its table in [`Tables`].
pub trait MemoryRecord: Entity {
    fn rows(tables: &Tables) -> &Vec<Self>;
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;
    fn from_new(id: Id, now: DateTime<Utc>, new: Self::New) -> Self;
    /// Merges `changes` and stamps `updated_at` with `now`.
    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>);
    /// Checks this record's constraints against every *other* row.
    fn check(&self, tables: &Tables) -> Result<(), StoreError>;
}

fn require<E: Entity>(rows: &[E], id: &str, field: &str) -> Result<(), StoreError> {
    if rows.iter().any(|row| row.id() == id) {
        Ok(())
    } else {
        Err(StoreError::Constraint(format!(
            "{} {:?} references a missing {}",
            field,
            id,
            E::SCHEMA.name
        )))
    }
}

fn unique<'a, E: Entity>(
    rows: &'a [E],
    this: &E,
    field: &str,
    value: &str,
    get: impl Fn(&'a E) -> Option<&'a str>,
) -> Result<(), StoreError> {
    let taken = rows
        .iter()
        .any(|row| row.id() != this.id() && get(row) == Some(value));
    if taken {
        Err(StoreError::Constraint(format!(
            "{}.{} {:?} is already taken",
            E::SCHEMA.name,
            field,
            value
        )))
    } else {
        Ok(())
    }
}

impl MemoryRecord for User {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.users
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.users
    }

    fn from_new(id: Id, now: DateTime<Utc>, new: NewUser) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            username: new.username,
            email: new.email,
        }
    }

    fn apply(&mut self, changes: UserChanges, now: DateTime<Utc>) {
        self.updated_at = now;
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(username) = changes.username {
            self.username = Some(username);
        }
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        unique(&tables.users, self, "email", &self.email, |u| {
            Some(u.email.as_str())
        })?;
        if let Some(username) = &self.username {
            unique(&tables.users, self, "username", username, |u| {
                u.username.as_deref()
            })?;
        }
        Ok(())
    }
}

impl MemoryRecord for Profile {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.profiles
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.profiles
    }

    fn from_new(id: Id, now: DateTime<Utc>, new: NewProfile) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            user_id: new.user_id,
            bio: new.bio,
        }
    }

    fn apply(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        self.updated_at = now;
        if let Some(bio) = changes.bio {
            self.bio = bio;
        }
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        require(&tables.users, &self.user_id, "userId")?;
        unique(&tables.profiles, self, "userId", &self.user_id, |p| {
            Some(p.user_id.as_str())
        })
    }
}

impl MemoryRecord for Blog {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.blogs
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.blogs
    }

    fn from_new(id: Id, now: DateTime<Utc>, new: NewBlog) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            author_id: new.author_id,
            name: new.name,
            description: new.description,
        }
    }

    fn apply(&mut self, changes: BlogChanges, now: DateTime<Utc>) {
        self.updated_at = now;
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        require(&tables.users, &self.author_id, "authorId")
    }
}

impl MemoryRecord for BlogPost {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.blog_posts
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.blog_posts
    }

    fn from_new(id: Id, now: DateTime<Utc>, new: NewBlogPost) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            author_id: new.author_id,
            blog_id: new.blog_id,
            title: new.title,
            content: new.content,
            published: new.published,
        }
    }

    fn apply(&mut self, changes: BlogPostChanges, now: DateTime<Utc>) {
        self.updated_at = now;
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(published) = changes.published {
            self.published = published;
        }
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        require(&tables.users, &self.author_id, "authorId")?;
        require(&tables.blogs, &self.blog_id, "blogId")
    }
}

impl MemoryRecord for BlogComment {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.blog_comments
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.blog_comments
    }

    fn from_new(id: Id, now: DateTime<Utc>, new: NewBlogComment) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            author_id: new.author_id,
            blog_post_id: new.blog_post_id,
            parent_id: new.parent_id,
            content: new.content,
        }
    }

    fn apply(&mut self, changes: BlogCommentChanges, now: DateTime<Utc>) {
        self.updated_at = now;
        if let Some(content) = changes.content {
            self.content = content;
        }
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        require(&tables.users, &self.author_id, "authorId")?;
        require(&tables.blog_posts, &self.blog_post_id, "blogPostId")?;
        if let Some(parent_id) = &self.parent_id {
            require(&tables.blog_comments, parent_id, "parentId")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<E: MemoryRecord> EntityStore<E> for InMemoryStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        let tables = self.tables.read().await;
        Ok(E::rows(&tables).iter().find(|row| row.id() == id).cloned())
    }

    async fn find_many(&self, filter: Option<Filter<E::Column>>) -> Result<Vec<E>, StoreError> {
        let tables = self.tables.read().await;
        let rows = E::rows(&tables);

        Ok(match filter {
            Some(Filter { column, value }) => rows
                .iter()
                .filter(|row| row.column(column) == Some(value.as_str()))
                .cloned()
                .collect(),
            None => rows.clone(),
        })
    }

    async fn create(&self, new: E::New) -> Result<E, StoreError> {
        let record = E::from_new(uuid::Uuid::new_v4().to_string(), Utc::now(), new);

        let mut tables = self.tables.write().await;
        record.check(&tables)?;
        E::rows_mut(&mut tables).push(record.clone());

        debug!(entity = E::SCHEMA.name, id = record.id(), "Created record");
        Ok(record)
    }

    async fn update(&self, id: &str, changes: E::Changes) -> Result<E, StoreError> {
        let mut tables = self.tables.write().await;

        let index = E::rows(&tables)
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| StoreError::not_found::<E>(id))?;

        let mut record = E::rows(&tables)[index].clone();
        record.apply(changes, Utc::now());
        record.check(&tables)?;
        E::rows_mut(&mut tables)[index] = record.clone();

        Ok(record)
    }
}

impl Persistence for InMemoryStore {
    fn users(&self) -> &dyn EntityStore<User> {
        self
    }

    fn profiles(&self) -> &dyn EntityStore<Profile> {
        self
    }

    fn blogs(&self) -> &dyn EntityStore<Blog> {
        self
    }

    fn blog_posts(&self) -> &dyn EntityStore<BlogPost> {
        self
    }

    fn blog_comments(&self) -> &dyn EntityStore<BlogComment> {
        self
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::entity::{BlogCommentColumn, UserColumn};

    fn new_user(email: &str, username: Option<&str>) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.map(str::to_string),
        }
    }

    async fn seeded() -> (InMemoryStore, User, BlogPost) {
        let store = InMemoryStore::new();
        let user: User = store
            .users()
            .create(new_user("ada@example.com", Some("ada")))
            .await
            .unwrap();
        let blog: Blog = store
            .blogs()
            .create(NewBlog {
                author_id: user.id.clone(),
                name: "Notes".to_string(),
                description: "Engine notes".to_string(),
            })
            .await
            .unwrap();
        let post: BlogPost = store
            .blog_posts()
            .create(NewBlogPost {
                author_id: user.id.clone(),
                blog_id: blog.id.clone(),
                title: "On numbers".to_string(),
                content: "...".to_string(),
                published: false,
            })
            .await
            .unwrap();
        (store, user, post)
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids_and_timestamps() {
        let store = InMemoryStore::new();
        let a = store
            .users()
            .create(new_user("a@example.com", None))
            .await
            .unwrap();
        let b = store
            .users()
            .create(new_user("b@example.com", None))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);

        let found: Option<User> = store.users().get_by_id(&a.id).await.unwrap();
        assert_eq!(found, Some(a));
    }

    #[tokio::test]
    async fn find_many_keeps_insertion_order() {
        let store = InMemoryStore::new();
        let mut created = vec![];
        for i in 0..5 {
            let user: User = store
                .users()
                .create(new_user(&format!("user{i}@example.com"), None))
                .await
                .unwrap();
            created.push(user);
        }

        let all: Vec<User> = store.users().find_many(None).await.unwrap();
        assert_eq!(all, created);
    }

    #[tokio::test]
    async fn find_many_filters_on_column() {
        let (store, user, post) = seeded().await;
        let top: BlogComment = store
            .blog_comments()
            .create(NewBlogComment {
                author_id: user.id.clone(),
                blog_post_id: post.id.clone(),
                parent_id: None,
                content: "First".to_string(),
            })
            .await
            .unwrap();
        let reply: BlogComment = store
            .blog_comments()
            .create(NewBlogComment {
                author_id: user.id.clone(),
                blog_post_id: post.id.clone(),
                parent_id: Some(top.id.clone()),
                content: "Reply".to_string(),
            })
            .await
            .unwrap();

        let replies: Vec<BlogComment> = store
            .blog_comments()
            .find_many(Some(Filter::eq(BlogCommentColumn::ParentId, top.id.clone())))
            .await
            .unwrap();
        assert_eq!(replies, vec![reply]);

        let by_username: Vec<User> = store
            .users()
            .find_many(Some(Filter::eq(UserColumn::Username, "ada")))
            .await
            .unwrap();
        assert_eq!(by_username, vec![user]);
    }

    #[tokio::test]
    async fn unique_email_is_enforced() {
        let store = InMemoryStore::new();
        store
            .users()
            .create(new_user("a@example.com", None))
            .await
            .unwrap();

        let res = store
            .users()
            .create(new_user("a@example.com", None))
            .await;
        assert!(matches!(res, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn missing_references_are_rejected() {
        let (store, user, _post) = seeded().await;

        let res: Result<BlogPost, _> = store
            .blog_posts()
            .create(NewBlogPost {
                author_id: user.id.clone(),
                blog_id: "nope".to_string(),
                title: "Orphan".to_string(),
                content: String::new(),
                published: false,
            })
            .await;
        assert!(matches!(res, Err(StoreError::Constraint(_))));

        let res: Result<Profile, _> = store
            .profiles()
            .create(NewProfile {
                user_id: "nope".to_string(),
                bio: String::new(),
            })
            .await;
        assert!(matches!(res, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let (store, _user, post) = seeded().await;

        let updated: BlogPost = store
            .blog_posts()
            .update(
                &post.id,
                BlogPostChanges {
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.published);
        assert_eq!(updated.title, post.title);
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = InMemoryStore::new();
        let res = store.blogs().update("nope", BlogChanges::default()).await;
        assert!(matches!(res, Err(StoreError::NotFound { entity: "Blog", .. })));
    }

    #[tokio::test]
    async fn insert_keeps_fixture_ids() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let user = User {
            id: "u1".to_string(),
            created_at: now,
            updated_at: now,
            username: None,
            email: "u1@example.com".to_string(),
        };

        store.insert(user.clone()).await.unwrap();
        assert!(store.insert(user.clone()).await.is_err());

        let found: Option<User> = store.users().get_by_id("u1").await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[traced_test]
    #[tokio::test]
    async fn creates_are_logged() {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .create(new_user("a@example.com", None))
            .await
            .unwrap();

        assert!(logs_contain("Created record"));
        assert!(logs_contain(&user.id));
    }
}
