//! [`EntityStore`] implementations for the PostgreSQL [`Store`]. Each call
//! checks out its own pooled connection and runs a single statement, so no
//! transactions are needed.

use async_trait::async_trait;
use blogql_common_types::Id;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::Store;
use crate::entity::{BlogColumn, BlogCommentColumn, BlogPostColumn, ProfileColumn, UserColumn};
use crate::models::{
    Blog, BlogChanges, BlogComment, BlogCommentChanges, BlogPost, BlogPostChanges, NewBlog,
    NewBlogComment, NewBlogPost, NewProfile, NewUser, Profile, ProfileChanges, User, UserChanges,
};
use crate::persistence::{EntityStore, Filter, StoreError};
use crate::schema;

fn new_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl EntityStore<User> for Store {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        use schema::users;

        Ok(users::table
            .find(id)
            .select(User::as_select())
            .first(&mut self.conn().await?)
            .await
            .optional()?)
    }

    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<User>, StoreError> {
        use schema::users;

        Ok(users::table
            .filter(users::id.eq_any(ids))
            .select(User::as_select())
            .load(&mut self.conn().await?)
            .await?)
    }

    async fn find_many(&self, filter: Option<Filter<UserColumn>>) -> Result<Vec<User>, StoreError> {
        use schema::users;

        let mut query = users::table
            .select(User::as_select())
            .order_by(users::seq.asc())
            .into_boxed();

        if let Some(Filter { column, value }) = filter {
            query = match column {
                UserColumn::Email => query.filter(users::email.eq(value)),
                UserColumn::Username => query.filter(users::username.eq(value)),
            };
        }

        Ok(query.load(&mut self.conn().await?).await?)
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values((users::id.eq(new_id()), &new))
            .returning(User::as_select())
            .get_result(&mut self.conn().await?)
            .await?;

        debug!(id = %user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<User, StoreError> {
        use schema::users;

        diesel::update(users::table.find(id))
            .set((users::updated_at.eq(Utc::now()), &changes))
            .returning(User::as_select())
            .get_result(&mut self.conn().await?)
            .await
            .optional()?
            .ok_or_else(|| StoreError::not_found::<User>(id))
    }
}

#[async_trait]
impl EntityStore<Profile> for Store {
    async fn get_by_id(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        use schema::profiles;

        Ok(profiles::table
            .find(id)
            .select(Profile::as_select())
            .first(&mut self.conn().await?)
            .await
            .optional()?)
    }

    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<Profile>, StoreError> {
        use schema::profiles;

        Ok(profiles::table
            .filter(profiles::id.eq_any(ids))
            .select(Profile::as_select())
            .load(&mut self.conn().await?)
            .await?)
    }

    async fn find_many(
        &self,
        filter: Option<Filter<ProfileColumn>>,
    ) -> Result<Vec<Profile>, StoreError> {
        use schema::profiles;

        let mut query = profiles::table
            .select(Profile::as_select())
            .order_by(profiles::seq.asc())
            .into_boxed();

        if let Some(Filter { column, value }) = filter {
            query = match column {
                ProfileColumn::UserId => query.filter(profiles::user_id.eq(value)),
            };
        }

        Ok(query.load(&mut self.conn().await?).await?)
    }

    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError> {
        use schema::profiles;

        let profile = diesel::insert_into(profiles::table)
            .values((profiles::id.eq(new_id()), &new))
            .returning(Profile::as_select())
            .get_result(&mut self.conn().await?)
            .await?;

        debug!(id = %profile.id, user_id = %profile.user_id, "Created profile");
        Ok(profile)
    }

    async fn update(&self, id: &str, changes: ProfileChanges) -> Result<Profile, StoreError> {
        use schema::profiles;

        diesel::update(profiles::table.find(id))
            .set((profiles::updated_at.eq(Utc::now()), &changes))
            .returning(Profile::as_select())
            .get_result(&mut self.conn().await?)
            .await
            .optional()?
            .ok_or_else(|| StoreError::not_found::<Profile>(id))
    }
}

#[async_trait]
impl EntityStore<Blog> for Store {
    async fn get_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        use schema::blogs;

        Ok(blogs::table
            .find(id)
            .select(Blog::as_select())
            .first(&mut self.conn().await?)
            .await
            .optional()?)
    }

    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<Blog>, StoreError> {
        use schema::blogs;

        Ok(blogs::table
            .filter(blogs::id.eq_any(ids))
            .select(Blog::as_select())
            .load(&mut self.conn().await?)
            .await?)
    }

    async fn find_many(&self, filter: Option<Filter<BlogColumn>>) -> Result<Vec<Blog>, StoreError> {
        use schema::blogs;

        let mut query = blogs::table
            .select(Blog::as_select())
            .order_by(blogs::seq.asc())
            .into_boxed();

        if let Some(Filter { column, value }) = filter {
            query = match column {
                BlogColumn::AuthorId => query.filter(blogs::author_id.eq(value)),
            };
        }

        Ok(query.load(&mut self.conn().await?).await?)
    }

    async fn create(&self, new: NewBlog) -> Result<Blog, StoreError> {
        use schema::blogs;

        let blog = diesel::insert_into(blogs::table)
            .values((blogs::id.eq(new_id()), &new))
            .returning(Blog::as_select())
            .get_result(&mut self.conn().await?)
            .await?;

        debug!(id = %blog.id, author_id = %blog.author_id, "Created blog");
        Ok(blog)
    }

    async fn update(&self, id: &str, changes: BlogChanges) -> Result<Blog, StoreError> {
        use schema::blogs;

        diesel::update(blogs::table.find(id))
            .set((blogs::updated_at.eq(Utc::now()), &changes))
            .returning(Blog::as_select())
            .get_result(&mut self.conn().await?)
            .await
            .optional()?
            .ok_or_else(|| StoreError::not_found::<Blog>(id))
    }
}

#[async_trait]
impl EntityStore<BlogPost> for Store {
    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        use schema::blog_posts;

        Ok(blog_posts::table
            .find(id)
            .select(BlogPost::as_select())
            .first(&mut self.conn().await?)
            .await
            .optional()?)
    }

    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<BlogPost>, StoreError> {
        use schema::blog_posts;

        Ok(blog_posts::table
            .filter(blog_posts::id.eq_any(ids))
            .select(BlogPost::as_select())
            .load(&mut self.conn().await?)
            .await?)
    }

    async fn find_many(
        &self,
        filter: Option<Filter<BlogPostColumn>>,
    ) -> Result<Vec<BlogPost>, StoreError> {
        use schema::blog_posts;

        let mut query = blog_posts::table
            .select(BlogPost::as_select())
            .order_by(blog_posts::seq.asc())
            .into_boxed();

        if let Some(Filter { column, value }) = filter {
            query = match column {
                BlogPostColumn::AuthorId => query.filter(blog_posts::author_id.eq(value)),
                BlogPostColumn::BlogId => query.filter(blog_posts::blog_id.eq(value)),
            };
        }

        Ok(query.load(&mut self.conn().await?).await?)
    }

    async fn create(&self, new: NewBlogPost) -> Result<BlogPost, StoreError> {
        use schema::blog_posts;

        let post = diesel::insert_into(blog_posts::table)
            .values((blog_posts::id.eq(new_id()), &new))
            .returning(BlogPost::as_select())
            .get_result(&mut self.conn().await?)
            .await?;

        debug!(id = %post.id, blog_id = %post.blog_id, "Created blog post");
        Ok(post)
    }

    async fn update(&self, id: &str, changes: BlogPostChanges) -> Result<BlogPost, StoreError> {
        use schema::blog_posts;

        diesel::update(blog_posts::table.find(id))
            .set((blog_posts::updated_at.eq(Utc::now()), &changes))
            .returning(BlogPost::as_select())
            .get_result(&mut self.conn().await?)
            .await
            .optional()?
            .ok_or_else(|| StoreError::not_found::<BlogPost>(id))
    }
}

#[async_trait]
impl EntityStore<BlogComment> for Store {
    async fn get_by_id(&self, id: &str) -> Result<Option<BlogComment>, StoreError> {
        use schema::blog_comments;

        Ok(blog_comments::table
            .find(id)
            .select(BlogComment::as_select())
            .first(&mut self.conn().await?)
            .await
            .optional()?)
    }

    async fn get_many_by_ids(&self, ids: &[Id]) -> Result<Vec<BlogComment>, StoreError> {
        use schema::blog_comments;

        Ok(blog_comments::table
            .filter(blog_comments::id.eq_any(ids))
            .select(BlogComment::as_select())
            .load(&mut self.conn().await?)
            .await?)
    }

    async fn find_many(
        &self,
        filter: Option<Filter<BlogCommentColumn>>,
    ) -> Result<Vec<BlogComment>, StoreError> {
        use schema::blog_comments;

        let mut query = blog_comments::table
            .select(BlogComment::as_select())
            .order_by(blog_comments::seq.asc())
            .into_boxed();

        if let Some(Filter { column, value }) = filter {
            query = match column {
                BlogCommentColumn::AuthorId => query.filter(blog_comments::author_id.eq(value)),
                BlogCommentColumn::BlogPostId => {
                    query.filter(blog_comments::blog_post_id.eq(value))
                }
                BlogCommentColumn::ParentId => query.filter(blog_comments::parent_id.eq(value)),
            };
        }

        Ok(query.load(&mut self.conn().await?).await?)
    }

    async fn create(&self, new: NewBlogComment) -> Result<BlogComment, StoreError> {
        use schema::blog_comments;

        let comment = diesel::insert_into(blog_comments::table)
            .values((blog_comments::id.eq(new_id()), &new))
            .returning(BlogComment::as_select())
            .get_result(&mut self.conn().await?)
            .await?;

        debug!(
            id = %comment.id,
            blog_post_id = %comment.blog_post_id,
            parent_id = ?comment.parent_id,
            "Created blog comment"
        );
        Ok(comment)
    }

    async fn update(
        &self,
        id: &str,
        changes: BlogCommentChanges,
    ) -> Result<BlogComment, StoreError> {
        use schema::blog_comments;

        diesel::update(blog_comments::table.find(id))
            .set((blog_comments::updated_at.eq(Utc::now()), &changes))
            .returning(BlogComment::as_select())
            .get_result(&mut self.conn().await?)
            .await
            .optional()?
            .ok_or_else(|| StoreError::not_found::<BlogComment>(id))
    }
}
