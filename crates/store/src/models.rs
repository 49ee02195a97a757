//! Database rows, insertable payloads and changesets for each entity.

use blogql_common_types::{inputs, Id};
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};

use super::schema::*;

#[derive(Queryable, Selectable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: Option<String>,
    pub email: String,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
}

#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Queryable, Selectable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Id,
    pub bio: String,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub user_id: Id,
    pub bio: String,
}

#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = profiles)]
pub struct ProfileChanges {
    pub bio: Option<String>,
}

#[derive(Queryable, Selectable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = blogs)]
pub struct Blog {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Id,
    pub name: String,
    pub description: String,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = blogs)]
pub struct NewBlog {
    pub author_id: Id,
    pub name: String,
    pub description: String,
}

#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = blogs)]
pub struct BlogChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Queryable, Selectable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = blog_posts)]
pub struct BlogPost {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Id,
    pub blog_id: Id,
    pub title: String,
    pub content: String,
    pub published: bool,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = blog_posts)]
pub struct NewBlogPost {
    pub author_id: Id,
    pub blog_id: Id,
    pub title: String,
    pub content: String,
    pub published: bool,
}

#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = blog_posts)]
pub struct BlogPostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

#[derive(Queryable, Selectable, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = blog_comments)]
pub struct BlogComment {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Id,
    pub blog_post_id: Id,
    /// `None` for top-level comments.
    pub parent_id: Option<Id>,
    pub content: String,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = blog_comments)]
pub struct NewBlogComment {
    pub author_id: Id,
    pub blog_post_id: Id,
    pub parent_id: Option<Id>,
    pub content: String,
}

#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = blog_comments)]
pub struct BlogCommentChanges {
    pub content: Option<String>,
}

// Conversions from API inputs. Update inputs drop their `id`, which callers
// pass separately.

impl From<inputs::CreateUserInput> for NewUser {
    fn from(input: inputs::CreateUserInput) -> Self {
        Self {
            email: input.email,
            username: input.username,
        }
    }
}

impl From<inputs::UpdateUserInput> for UserChanges {
    fn from(input: inputs::UpdateUserInput) -> Self {
        Self {
            email: input.email,
            username: input.username,
        }
    }
}

impl From<inputs::CreateProfileInput> for NewProfile {
    fn from(input: inputs::CreateProfileInput) -> Self {
        Self {
            user_id: input.user_id,
            bio: input.bio,
        }
    }
}

impl From<inputs::UpdateProfileInput> for ProfileChanges {
    fn from(input: inputs::UpdateProfileInput) -> Self {
        Self { bio: input.bio }
    }
}

impl From<inputs::CreateBlogInput> for NewBlog {
    fn from(input: inputs::CreateBlogInput) -> Self {
        Self {
            author_id: input.author_id,
            name: input.name,
            description: input.description,
        }
    }
}

impl From<inputs::UpdateBlogInput> for BlogChanges {
    fn from(input: inputs::UpdateBlogInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
        }
    }
}

impl From<inputs::CreateBlogPostInput> for NewBlogPost {
    fn from(input: inputs::CreateBlogPostInput) -> Self {
        Self {
            author_id: input.author_id,
            blog_id: input.blog_id,
            title: input.title,
            content: input.content,
            published: input.published,
        }
    }
}

impl From<inputs::UpdateBlogPostInput> for BlogPostChanges {
    fn from(input: inputs::UpdateBlogPostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
            published: input.published,
        }
    }
}

impl From<inputs::CreateBlogCommentInput> for NewBlogComment {
    fn from(input: inputs::CreateBlogCommentInput) -> Self {
        Self {
            author_id: input.author_id,
            blog_post_id: input.blog_post_id,
            parent_id: input.parent_id,
            content: input.content,
        }
    }
}

impl From<inputs::UpdateBlogCommentInput> for BlogCommentChanges {
    fn from(input: inputs::UpdateBlogCommentInput) -> Self {
        Self {
            content: input.content,
        }
    }
}
