//! GraphQL object types. Each wraps a store row and exposes its scalars plus
//! one resolver per relation declared in [`blogql_store::entity`].

use async_graphql::{Context, ErrorExtensions, Object, Result};
use blogql_store::entity::{BlogColumn, BlogCommentColumn, BlogPostColumn, ProfileColumn};
use blogql_store::models;
use chrono::{DateTime, Utc};

use super::resolution::{
    many_by_inverse_key, one_by_inverse_key, one_by_local_key, one_by_optional_local_key,
};
use super::{ctx_data, ApiSchemaContext};
use crate::errors::ApiError;

fn wrap<T, U: From<T>>(res: Result<Option<T>, ApiError>) -> Result<Option<U>> {
    res.map(|opt| opt.map(Into::into)).map_err(|e| e.extend())
}

fn wrap_many<T, U: From<T>>(res: Result<Vec<T>, ApiError>) -> Result<Option<Vec<U>>> {
    res.map(|rows| Some(rows.into_iter().map(Into::into).collect()))
        .map_err(|e| e.extend())
}

/// A registered user of the app.
#[derive(Clone, Debug, derive_more::From)]
pub struct User {
    model: models::User,
}

impl User {
    pub fn model(&self) -> &models::User {
        &self.model
    }

    pub async fn profile(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Option<models::Profile>, ApiError> {
        one_by_inverse_key::<models::Profile>(
            ctx,
            "User.profile",
            ProfileColumn::UserId,
            &self.model.id,
        )
        .await
    }

    pub async fn blogs(&self, ctx: &ApiSchemaContext) -> Result<Vec<models::Blog>, ApiError> {
        many_by_inverse_key::<models::Blog>(
            ctx,
            "User.blogs",
            BlogColumn::AuthorId,
            &self.model.id,
        )
        .await
    }

    pub async fn blog_posts(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Vec<models::BlogPost>, ApiError> {
        many_by_inverse_key::<models::BlogPost>(
            ctx,
            "User.blogPosts",
            BlogPostColumn::AuthorId,
            &self.model.id,
        )
        .await
    }

    pub async fn blog_comments(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Vec<models::BlogComment>, ApiError> {
        many_by_inverse_key::<models::BlogComment>(
            ctx,
            "User.blogComments",
            BlogCommentColumn::AuthorId,
            &self.model.id,
        )
        .await
    }
}

#[Object]
impl User {
    /// Unique id of the user.
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> &str {
        &self.model.id
    }

    #[graphql(name = "createdAt")]
    async fn graphql_created_at(&self) -> DateTime<Utc> {
        self.model.created_at
    }

    #[graphql(name = "updatedAt")]
    async fn graphql_updated_at(&self) -> DateTime<Utc> {
        self.model.updated_at
    }

    /// Unique handle of the user, if they picked one.
    #[graphql(name = "username")]
    async fn graphql_username(&self) -> Option<&str> {
        self.model.username.as_deref()
    }

    /// Unique email address of the user.
    #[graphql(name = "email")]
    async fn graphql_email(&self) -> &str {
        &self.model.email
    }

    /// The user's profile, if they created one.
    #[graphql(name = "profile")]
    async fn graphql_profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        wrap(self.profile(ctx_data(ctx)).await)
    }

    /// Blogs authored by the user.
    #[graphql(name = "blogs")]
    async fn graphql_blogs(&self, ctx: &Context<'_>) -> Result<Option<Vec<Blog>>> {
        wrap_many(self.blogs(ctx_data(ctx)).await)
    }

    /// Blog posts authored by the user, across all blogs.
    #[graphql(name = "blogPosts")]
    async fn graphql_blog_posts(&self, ctx: &Context<'_>) -> Result<Option<Vec<BlogPost>>> {
        wrap_many(self.blog_posts(ctx_data(ctx)).await)
    }

    /// Comments written by the user, across all posts.
    #[graphql(name = "blogComments")]
    async fn graphql_blog_comments(&self, ctx: &Context<'_>) -> Result<Option<Vec<BlogComment>>> {
        wrap_many(self.blog_comments(ctx_data(ctx)).await)
    }
}

/// Public profile information of a user.
#[derive(Clone, Debug, derive_more::From)]
pub struct Profile {
    model: models::Profile,
}

impl Profile {
    pub fn model(&self) -> &models::Profile {
        &self.model
    }

    pub async fn user(&self, ctx: &ApiSchemaContext) -> Result<Option<models::User>, ApiError> {
        one_by_local_key::<models::User>(ctx, "Profile.user", &self.model.user_id).await
    }
}

#[Object]
impl Profile {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> &str {
        &self.model.id
    }

    #[graphql(name = "createdAt")]
    async fn graphql_created_at(&self) -> DateTime<Utc> {
        self.model.created_at
    }

    #[graphql(name = "updatedAt")]
    async fn graphql_updated_at(&self) -> DateTime<Utc> {
        self.model.updated_at
    }

    /// Id of the user this profile belongs to.
    #[graphql(name = "userId")]
    async fn graphql_user_id(&self) -> &str {
        &self.model.user_id
    }

    #[graphql(name = "bio")]
    async fn graphql_bio(&self) -> &str {
        &self.model.bio
    }

    #[graphql(name = "user")]
    async fn graphql_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        wrap(self.user(ctx_data(ctx)).await)
    }
}

/// A blog, i.e. a named collection of posts by a single author.
#[derive(Clone, Debug, derive_more::From)]
pub struct Blog {
    model: models::Blog,
}

impl Blog {
    pub fn model(&self) -> &models::Blog {
        &self.model
    }

    pub async fn author(&self, ctx: &ApiSchemaContext) -> Result<Option<models::User>, ApiError> {
        one_by_local_key::<models::User>(ctx, "Blog.author", &self.model.author_id).await
    }

    pub async fn blog_posts(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Vec<models::BlogPost>, ApiError> {
        many_by_inverse_key::<models::BlogPost>(
            ctx,
            "Blog.blogPosts",
            BlogPostColumn::BlogId,
            &self.model.id,
        )
        .await
    }
}

#[Object]
impl Blog {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> &str {
        &self.model.id
    }

    #[graphql(name = "createdAt")]
    async fn graphql_created_at(&self) -> DateTime<Utc> {
        self.model.created_at
    }

    #[graphql(name = "updatedAt")]
    async fn graphql_updated_at(&self) -> DateTime<Utc> {
        self.model.updated_at
    }

    #[graphql(name = "authorId")]
    async fn graphql_author_id(&self) -> &str {
        &self.model.author_id
    }

    #[graphql(name = "name")]
    async fn graphql_name(&self) -> &str {
        &self.model.name
    }

    #[graphql(name = "description")]
    async fn graphql_description(&self) -> &str {
        &self.model.description
    }

    #[graphql(name = "author")]
    async fn graphql_author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        wrap(self.author(ctx_data(ctx)).await)
    }

    /// Posts of this blog, oldest first.
    #[graphql(name = "blogPosts")]
    async fn graphql_blog_posts(&self, ctx: &Context<'_>) -> Result<Option<Vec<BlogPost>>> {
        wrap_many(self.blog_posts(ctx_data(ctx)).await)
    }
}

/// A post within a blog.
#[derive(Clone, Debug, derive_more::From)]
pub struct BlogPost {
    model: models::BlogPost,
}

impl BlogPost {
    pub fn model(&self) -> &models::BlogPost {
        &self.model
    }

    pub async fn author(&self, ctx: &ApiSchemaContext) -> Result<Option<models::User>, ApiError> {
        one_by_local_key::<models::User>(ctx, "BlogPost.author", &self.model.author_id).await
    }

    pub async fn blog(&self, ctx: &ApiSchemaContext) -> Result<Option<models::Blog>, ApiError> {
        one_by_local_key::<models::Blog>(ctx, "BlogPost.blog", &self.model.blog_id).await
    }

    pub async fn blog_comments(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Vec<models::BlogComment>, ApiError> {
        many_by_inverse_key::<models::BlogComment>(
            ctx,
            "BlogPost.blogComments",
            BlogCommentColumn::BlogPostId,
            &self.model.id,
        )
        .await
    }
}

#[Object]
impl BlogPost {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> &str {
        &self.model.id
    }

    #[graphql(name = "createdAt")]
    async fn graphql_created_at(&self) -> DateTime<Utc> {
        self.model.created_at
    }

    #[graphql(name = "updatedAt")]
    async fn graphql_updated_at(&self) -> DateTime<Utc> {
        self.model.updated_at
    }

    #[graphql(name = "authorId")]
    async fn graphql_author_id(&self) -> &str {
        &self.model.author_id
    }

    #[graphql(name = "blogId")]
    async fn graphql_blog_id(&self) -> &str {
        &self.model.blog_id
    }

    #[graphql(name = "title")]
    async fn graphql_title(&self) -> &str {
        &self.model.title
    }

    #[graphql(name = "content")]
    async fn graphql_content(&self) -> &str {
        &self.model.content
    }

    /// Whether the post is visible to readers.
    #[graphql(name = "published")]
    async fn graphql_published(&self) -> bool {
        self.model.published
    }

    #[graphql(name = "author")]
    async fn graphql_author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        wrap(self.author(ctx_data(ctx)).await)
    }

    #[graphql(name = "blog")]
    async fn graphql_blog(&self, ctx: &Context<'_>) -> Result<Option<Blog>> {
        wrap(self.blog(ctx_data(ctx)).await)
    }

    /// All comments on this post, top-level and replies alike.
    #[graphql(name = "blogComments")]
    async fn graphql_blog_comments(&self, ctx: &Context<'_>) -> Result<Option<Vec<BlogComment>>> {
        wrap_many(self.blog_comments(ctx_data(ctx)).await)
    }
}

/// A comment on a blog post. Comments can reply to other comments of the
/// same post, forming a tree.
#[derive(Clone, Debug, derive_more::From)]
pub struct BlogComment {
    model: models::BlogComment,
}

impl BlogComment {
    pub fn model(&self) -> &models::BlogComment {
        &self.model
    }

    pub async fn author(&self, ctx: &ApiSchemaContext) -> Result<Option<models::User>, ApiError> {
        one_by_local_key::<models::User>(ctx, "BlogComment.author", &self.model.author_id).await
    }

    pub async fn blog_post(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Option<models::BlogPost>, ApiError> {
        one_by_local_key::<models::BlogPost>(
            ctx,
            "BlogComment.blogPost",
            &self.model.blog_post_id,
        )
        .await
    }

    pub async fn parent(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Option<models::BlogComment>, ApiError> {
        one_by_optional_local_key::<models::BlogComment>(
            ctx,
            "BlogComment.parent",
            self.model.parent_id.as_deref(),
        )
        .await
    }

    /// Direct replies only. Deeper replies hang off those.
    pub async fn replies(
        &self,
        ctx: &ApiSchemaContext,
    ) -> Result<Vec<models::BlogComment>, ApiError> {
        many_by_inverse_key::<models::BlogComment>(
            ctx,
            "BlogComment.blogComments",
            BlogCommentColumn::ParentId,
            &self.model.id,
        )
        .await
    }
}

#[Object]
impl BlogComment {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> &str {
        &self.model.id
    }

    #[graphql(name = "createdAt")]
    async fn graphql_created_at(&self) -> DateTime<Utc> {
        self.model.created_at
    }

    #[graphql(name = "updatedAt")]
    async fn graphql_updated_at(&self) -> DateTime<Utc> {
        self.model.updated_at
    }

    #[graphql(name = "authorId")]
    async fn graphql_author_id(&self) -> &str {
        &self.model.author_id
    }

    #[graphql(name = "blogPostId")]
    async fn graphql_blog_post_id(&self) -> &str {
        &self.model.blog_post_id
    }

    /// Id of the comment this one replies to. Null for top-level comments.
    #[graphql(name = "parentId")]
    async fn graphql_parent_id(&self) -> Option<&str> {
        self.model.parent_id.as_deref()
    }

    #[graphql(name = "content")]
    async fn graphql_content(&self) -> &str {
        &self.model.content
    }

    #[graphql(name = "author")]
    async fn graphql_author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        wrap(self.author(ctx_data(ctx)).await)
    }

    #[graphql(name = "blogPost")]
    async fn graphql_blog_post(&self, ctx: &Context<'_>) -> Result<Option<BlogPost>> {
        wrap(self.blog_post(ctx_data(ctx)).await)
    }

    /// The comment this one replies to. Null for top-level comments.
    #[graphql(name = "parent")]
    async fn graphql_parent(&self, ctx: &Context<'_>) -> Result<Option<BlogComment>> {
        wrap(self.parent(ctx_data(ctx)).await)
    }

    /// Direct replies to this comment.
    #[graphql(name = "blogComments")]
    async fn graphql_blog_comments(&self, ctx: &Context<'_>) -> Result<Option<Vec<BlogComment>>> {
        wrap_many(self.replies(ctx_data(ctx)).await)
    }
}
